use std::io;
use std::path::PathBuf;

use gonv_fetch::FetchError;
use gonv_platform::GoTarget;
use gonv_store::StoreError;
use gonv_verify::VerificationError;
use gonv_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("version '{name}' is already installed (use --force to reinstall or --skip-existing to ignore)")]
    AlreadyInstalled { name: String },

    #[error("version '{0}' is not installed")]
    NotInstalled(String),

    #[error("no Go release matches '{0}'")]
    NoSuchRelease(String),

    #[error("Go {version} has no archive for {target}")]
    NoArchive { version: String, target: GoTarget },

    #[error("extracted archive for {name} has no bin/ directory")]
    InvalidLayout { name: String },

    #[error("{name} was installed concurrently by another process; retry the install")]
    Conflict {
        name:   String,
        #[source]
        source: gonv_fs::Error,
    },

    #[error("invalid definition file {}: {message}", path.display())]
    Definition { path: PathBuf, message: String },

    #[error("release index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("malformed release index: {0}")]
    MalformedIndex(#[from] serde_json::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] gonv_archive::Error),

    #[error(transparent)]
    Fs(#[from] gonv_fs::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Verify(#[from] VerificationError),
}

/// Failure of a post-install or post-uninstall hook. Never fails the
/// operation it follows.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HookError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl From<gonv_shim::ShimError> for HookError {
    fn from(e: gonv_shim::ShimError) -> Self { Self(Box::new(e)) }
}

pub type Result<T> = std::result::Result<T, InstallError>;
