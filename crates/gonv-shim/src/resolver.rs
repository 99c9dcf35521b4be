//! Command lookup policies.
//!
//! # Architecture
//!
//! Dispatch is mechanism: it maps a command name to an absolute path and runs
//! it. Where to look is policy, expressed as a [`TargetResolver`]: one per
//! active version, chained in spec order.

use std::ffi::OsString;
use std::path::PathBuf;

use gonv_platform::exe::{binary_file_name, is_executable};

pub trait TargetResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf>;
}

/// Looks in a distribution's `bin` directory, then its GOPATH tools.
#[derive(Debug, Clone)]
pub struct DistributionResolver {
    dirs: Vec<PathBuf>,
}

impl DistributionResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self { Self { dirs } }
}

impl TargetResolver for DistributionResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        let mut names = vec![binary_file_name(command)];
        if cfg!(windows) {
            names.extend([format!("{command}.bat"), format!("{command}.cmd")]);
        }
        self.dirs
            .iter()
            .flat_map(|dir| names.iter().map(move |n| dir.join(n)))
            .find(|candidate| is_executable(candidate))
    }
}

/// Looks on `PATH` with the shims directory removed, so `system` never
/// dispatches back into a shim.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    path: OsString,
    cwd:  PathBuf,
}

impl SystemResolver {
    pub fn new(path: OsString, cwd: impl Into<PathBuf>) -> Self { Self { path, cwd: cwd.into() } }

    pub fn path(&self) -> &OsString { &self.path }
}

impl TargetResolver for SystemResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        which::which_in(command, Some(&self.path), &self.cwd).ok()
    }
}

/// Tries labelled resolvers in order; the first hit wins.
#[derive(Default)]
pub struct ChainResolver {
    entries: Vec<(String, Box<dyn TargetResolver>)>,
}

impl ChainResolver {
    pub fn new() -> Self { Self::default() }

    pub fn push(mut self, label: impl Into<String>, resolver: impl TargetResolver + 'static) -> Self {
        self.entries.push((label.into(), Box::new(resolver)));
        self
    }

    /// The label of the resolver that found `command`, and the path it found.
    pub fn resolve_labelled(&self, command: &str) -> Option<(&str, PathBuf)> {
        self.entries
            .iter()
            .find_map(|(label, r)| r.resolve(command).map(|p| (label.as_str(), p)))
    }
}

impl TargetResolver for ChainResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf> { self.resolve_labelled(command).map(|(_, p)| p) }
}
