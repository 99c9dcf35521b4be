use std::io;
use std::path::PathBuf;

use gonv_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Fs(#[from] gonv_fs::Error),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },

    #[error("cannot determine the home directory; set GONV_ROOT")]
    NoHome,

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("version '{0}' is not installed")]
    NotInstalled(String),

    #[error("alias name '{0}' is reserved")]
    ReservedAlias(String),

    #[error("invalid alias name {name:?}: {reason}")]
    InvalidAliasName { name: String, reason: &'static str },

    #[error("invalid alias target {target:?}: {source}")]
    InvalidAliasTarget {
        target: String,
        #[source]
        source: VersionError,
    },

    #[error("alias '{0}' not found")]
    AliasNotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
