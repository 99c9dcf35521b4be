//! Installing and removing Go distributions.
//!
//! # Pipeline
//!
//! 1. Existence check (nothing on disk changes on the "already installed" path).
//! 2. Download into `<root>/cache` with streaming SHA-256 verification.
//! 3. Extract into a hidden sibling of `versions/<name>`.
//! 4. Publish with one rename that refuses to merge into an existing tree.
//! 5. Post-install hooks, by default a shim rehash.
//!
//! What to install comes either from the official [`ReleaseIndex`] or from a
//! [`Definition`] file.

pub use definition::Definition;
pub use error::{HookError, InstallError, Result};
pub use hooks::{InstallContext, InstallHook, RehashHook};
pub use index::{CachedIndex, INDEX_CACHE_FILE, INDEX_MAX_AGE, IndexCache, RELEASE_INDEX_URL, load_release_index};
pub use installer::{InstallOptions, InstallOutcome, InstallTarget, Installer, uninstall};
pub use release::{DOWNLOAD_BASE_URL, Release, ReleaseFile, ReleaseIndex};

mod definition;
mod error;
mod hooks;
mod index;
mod installer;
mod release;
