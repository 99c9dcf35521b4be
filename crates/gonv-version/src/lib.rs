//! Go version parsing, ordering and selection.
//!
//! # Version names
//!
//! Installed distributions are directory names such as `1.21.0` or `1.22rc1`.
//! [`GoVersion`] parses them (an optional `go` prefix is accepted) and orders
//! them numerically: `1.9.10 > 1.9.9`, and pre-releases sort before their
//! release (`1.21rc1 < 1.21.0`).
//!
//! # Selection
//!
//! [`select_latest`] expands a user-supplied spec (`1.21`, `21`, `1`) to the
//! newest installed match. [`VersionSpec`] is the ordered list of active
//! versions read from the environment or a version file.

pub use self::error::{Result, VersionError};
pub use self::go_version::{
    GoVersion, PreRelease, compare_names, max_version, normalize, sort_names,
};
pub use self::name::{MAX_NAME_LEN, validate_version_name};
pub use self::partial::{Partial, select_latest};
pub use self::spec::{LATEST, SYSTEM, VersionSpec};

mod error;
pub mod go_version;
mod name;
mod partial;
mod spec;
