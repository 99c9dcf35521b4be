use std::fmt;
use std::path::{Path, PathBuf};

use gonv_version::VersionSpec;

/// Where the active version came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// `GONV_VERSION`
    Environment,
    /// `.go-version` or `.tool-versions`
    LocalFile(PathBuf),
    /// `go.mod`
    Manifest(PathBuf),
    GlobalFile(PathBuf),
    /// Nothing set anywhere; the system toolchain applies.
    Default,
}

impl VersionSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::LocalFile(p) | Self::Manifest(p) | Self::GlobalFile(p) => Some(p),
            Self::Environment | Self::Default => None,
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("GONV_VERSION environment variable"),
            Self::LocalFile(p) | Self::Manifest(p) | Self::GlobalFile(p) => write!(f, "{}", p.display()),
            Self::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub spec:   VersionSpec,
    pub source: VersionSource,
}

/// A resolution whose every entry maps to an installed name (or `system`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersions {
    pub resolution: Resolution,
    pub names:      Vec<String>,
}
