//! The gonv install root.
//!
//! # Architecture
//!
//! ```text
//! $GONV_ROOT/
//!   versions/<name>/   one tree per installed distribution
//!   shims/             generated proxies, see gonv-shim
//!   cache/             kept archives, release index
//!   version            global version file
//!   aliases            name=version lines
//!   config.toml        optional settings
//! ```
//!
//! [`VersionStore`] is the only writer of this tree apart from the installer
//! and the shim registry. Every file write goes through
//! [`gonv_fs::atomic_write`].

mod alias;
mod config;
mod error;
mod store;
pub mod version_file;

pub use alias::{MAX_ALIAS_LEN, validate_alias_name};
pub use config::{CONFIG_FILE, Config, is_truthy};
pub use error::{Result, StoreError};
pub use store::VersionStore;
pub use version_file::{
    GO_MOD_FILE, LEGACY_LOCAL_FILE, LOCAL_FILE, VersionFileKind, read_version_file, unset_local,
    write_local, write_version_file,
};
