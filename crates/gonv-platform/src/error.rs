use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported architecture: {0}")]
    UnknownArch(String),

    #[error("unsupported operating system: {0}")]
    UnknownOS(String),

    #[error("PATH entry contains a separator: {0}")]
    JoinPaths(#[from] std::env::JoinPathsError),
}
