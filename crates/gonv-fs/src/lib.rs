//! Filesystem primitives for the gonv root.
//!
//! # Architecture
//!
//! Every mutation of shared state goes through one of two operations:
//!
//! - [`atomic_write`] for small files (version files, aliases, shims, caches):
//!   content is written to a temporary sibling and renamed into place.
//! - [`Workspace`] + [`publish_dir`] for whole trees: a toolchain is staged in
//!   a hidden sibling directory and published with a single rename that
//!   refuses to overwrite an existing installation.
//!
//! Concurrent readers therefore see either the old state or the new state.

mod error;
pub mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, PublishOptions, atomic_write, create_dir_all, publish_dir,
    read_optional, remove_dir_all_if_exists, remove_file_if_exists, rename,
};
pub use workspace::{Workspace, unique_sibling};
