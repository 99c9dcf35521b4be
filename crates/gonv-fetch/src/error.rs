//! Error types for gonv-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download {url}: {message}")]
    Network { url: String, message: String },

    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url:      String,
        expected: String,
        actual:   String,
    },

    #[error("all download sources failed:\n  {}", attempts.join("\n  "))]
    AllSourcesFailed { attempts: Vec<String> },

    #[error("no download sources given")]
    NoSources,

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },

    #[error("cannot build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool { matches!(self, Self::Network { .. }) }

    pub(crate) fn network(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url:     url.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
