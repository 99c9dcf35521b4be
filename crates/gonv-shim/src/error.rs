//! Error types for shim operations.

use std::io;
use std::path::PathBuf;

use gonv_resolve::ResolveError;
use gonv_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("cannot create shims directory {}: {source}", path.display())]
    ShimsDir { path: PathBuf, source: io::Error },

    #[error("failed to write shim {}: {source}", path.display())]
    WriteShim {
        path:   PathBuf,
        #[source]
        source: gonv_fs::Error,
    },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },

    #[error("{command}: command not found (active version: {spec})")]
    CommandNotFound { command: String, spec: String },

    #[error(
        "{command}: command not found in the active version\n\nThe '{command}' command exists in these Go versions:\n  {}",
        versions.join("\n  ")
    )]
    ExistsElsewhere { command: String, versions: Vec<String> },

    #[error("failed to execute {}: {source}", path.display())]
    Spawn { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Platform(#[from] gonv_platform::Error),
}

pub type Result<T> = std::result::Result<T, ShimError>;
