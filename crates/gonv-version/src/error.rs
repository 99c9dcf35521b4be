use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid Go version: {0}")]
    Invalid(String),

    #[error("invalid partial version: {0}")]
    Partial(String),

    #[error("invalid version name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("version spec is empty")]
    EmptySpec,
}

pub type Result<T> = std::result::Result<T, VersionError>;
