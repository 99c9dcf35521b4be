use gonv_store::StoreError;
use thiserror::Error;

use crate::VersionSource;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("version '{requested}' is not installed (set by {set_by})")]
    VersionNotInstalled {
        requested: String,
        set_by:    VersionSource,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
