use std::fmt;

use once_cell::sync::Lazy;

use crate::{Error, Result, arch, os};

static HOST: Lazy<Result<GoTarget>> = Lazy::new(GoTarget::detect);

/// A `GOOS`/`GOARCH` pair identifying a release archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoTarget {
    pub os:   String,
    pub arch: String,
}

impl GoTarget {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os:   os.into(),
            arch: arch.into(),
        }
    }

    fn detect() -> Result<Self> {
        let os = os::detect();
        let goos = os.goos().ok_or_else(|| Error::UnknownOS(std::env::consts::OS.to_string()))?;
        let arch = arch::detect();
        let goarch = arch
            .goarch()
            .ok_or_else(|| Error::UnknownArch(std::env::consts::ARCH.to_string()))?;
        Ok(Self::new(goos, goarch))
    }

    /// The host target, detected once per process.
    pub fn host() -> Result<Self> {
        match &*HOST {
            Ok(t) => Ok(t.clone()),
            Err(Error::UnknownOS(s)) => Err(Error::UnknownOS(s.clone())),
            Err(Error::UnknownArch(s)) => Err(Error::UnknownArch(s.clone())),
            Err(_) => Err(Error::UnknownOS(std::env::consts::OS.to_string())),
        }
    }

    pub fn is_windows(&self) -> bool { self.os == "windows" }
}

impl fmt::Display for GoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}-{}", self.os, self.arch) }
}
