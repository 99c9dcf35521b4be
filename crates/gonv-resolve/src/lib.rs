//! Which Go toolchain applies to an invocation.
//!
//! [`VersionResolver::resolve`] walks the precedence chain and reports the
//! [`VersionSource`] it stopped at. [`VersionResolver::resolve_installed`]
//! additionally maps every entry onto an installed distribution, expanding
//! aliases and partial versions (`1.21` selects the newest `1.21.x`).

mod error;
mod resolver;
mod source;

pub use error::{ResolveError, Result};
pub use resolver::{VersionResolver, resolve_token};
pub use source::{Resolution, ResolvedVersions, VersionSource};
