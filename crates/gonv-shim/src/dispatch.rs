//! Shim execution path: resolve the active version, locate the binary, run it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use gonv_platform::env::PathModifier;
use gonv_resolve::{Resolution, ResolveError, VersionResolver, resolve_token};
use gonv_store::{Config, VersionStore};
use gonv_version::SYSTEM;
use tracing::debug;

use crate::resolver::{ChainResolver, DistributionResolver, SystemResolver, TargetResolver};
use crate::{Result, ShimError};

/// A command mapped to a concrete binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub command:    String,
    pub path:       PathBuf,
    /// Installed name that provided the binary, or `system`.
    pub version:    String,
    pub resolution: Resolution,
}

impl Located {
    pub fn is_system(&self) -> bool { self.version == SYSTEM }
}

pub struct Dispatcher<'a> {
    store:    &'a VersionStore,
    resolver: &'a VersionResolver<'a>,
    config:   &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a VersionStore, resolver: &'a VersionResolver<'a>, config: &'a Config) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    /// ResolveVersion then LocateBinary.
    ///
    /// Entries of a multi-entry spec are searched in order and the first one
    /// that provides `command` wins. Entries that are not installed are
    /// skipped as long as at least one entry is.
    pub fn locate(&self, command: &str, cwd: &Path) -> Result<Located> {
        let resolution = self.resolver.resolve(cwd)?;
        let expanded = self.resolver.expand_aliases(&resolution.spec)?;
        let installed = self.store.installed()?;

        let mut chain = ChainResolver::new();
        let mut names: Vec<String> = Vec::new();
        let mut first_missing: Option<ResolveError> = None;

        for token in &expanded {
            let name = match resolve_token(token, &installed, &resolution.source) {
                Ok(name) => name,
                Err(e @ ResolveError::VersionNotInstalled { .. }) => {
                    debug!(%token, "skipping entry that is not installed");
                    first_missing.get_or_insert(e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if names.contains(&name) {
                continue;
            }
            chain = if name == SYSTEM {
                chain.push(name.clone(), SystemResolver::new(self.system_path()?, cwd))
            } else {
                chain.push(name.clone(), DistributionResolver::new(self.store.bin_dirs(&name)))
            };
            names.push(name);
        }

        if names.is_empty()
            && let Some(e) = first_missing
        {
            return Err(e.into());
        }

        if let Some((version, path)) = chain.resolve_labelled(command) {
            debug!(command, version, path = %path.display(), "located");
            return Ok(Located {
                command: command.to_string(),
                path,
                version: version.to_string(),
                resolution,
            });
        }

        let versions: Vec<String> = self.providers(command, installed).into_iter().map(|(v, _)| v).collect();
        if versions.is_empty() {
            Err(ShimError::CommandNotFound {
                command: command.to_string(),
                spec:    resolution.spec.to_string(),
            })
        } else {
            Err(ShimError::ExistsElsewhere {
                command: command.to_string(),
                versions,
            })
        }
    }

    /// Run `command` under the version active in `cwd` and return its exit
    /// code. The child inherits the process working directory.
    pub fn exec(&self, command: &str, args: &[OsString], cwd: &Path) -> Result<i32> {
        let located = self.locate(command, cwd)?;
        let mut cmd = Command::new(&located.path);
        cmd.args(args);

        if !located.is_system() {
            let version = located.version.as_str();
            let path = PathModifier::from_value(self.config.path.as_deref().unwrap_or_default())
                .prepend_all(self.store.bin_dirs(version))
                .build()?;
            cmd.env("PATH", path);

            if self.config.goroot {
                cmd.env("GOROOT", self.store.version_dir(version));
            }
            if let Some(gopath) = self.store.gopath_dir(version) {
                cmd.env("GOPATH", gopath);
            }
        }

        debug!(path = %located.path.display(), args = args.len(), "exec");
        let status = cmd.status().map_err(|source| ShimError::Spawn {
            path: located.path.clone(),
            source,
        })?;
        Ok(exit_code(status))
    }

    /// Installed versions that provide `command`, in version order.
    pub fn whence(&self, command: &str) -> Result<Vec<String>> {
        Ok(self.whence_paths(command)?.into_iter().map(|(v, _)| v).collect())
    }

    pub fn whence_paths(&self, command: &str) -> Result<Vec<(String, PathBuf)>> {
        Ok(self.providers(command, self.store.installed()?))
    }

    fn providers(&self, command: &str, installed: Vec<String>) -> Vec<(String, PathBuf)> {
        installed
            .into_iter()
            .filter_map(|version| {
                let path = DistributionResolver::new(self.store.bin_dirs(&version)).resolve(command)?;
                Some((version, path))
            })
            .collect()
    }

    fn system_path(&self) -> Result<OsString> {
        let shims = self.store.shims_dir();
        Ok(PathModifier::from_value(self.config.path.as_deref().unwrap_or_default())
            .remove(&shims)
            .build()?)
    }
}

/// Whether a successful run may have installed new tools, so shims should be
/// regenerated: `go install ...`.
pub fn should_auto_rehash(command: &str, args: &[OsString]) -> bool {
    command == "go"
        && args
            .iter()
            .map(|a| a.to_string_lossy())
            .find(|a| !a.starts_with('-'))
            .is_some_and(|a| a == "install")
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.code().or_else(|| status.signal().map(|s| 128 + s)).unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 { status.code().unwrap_or(1) }

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> { list.iter().map(OsString::from).collect() }

    #[test]
    fn test_should_auto_rehash() {
        assert!(should_auto_rehash("go", &args(&["install", "golang.org/x/tools/gopls@latest"])));
        assert!(should_auto_rehash("go", &args(&["-C", "install"])));
        assert!(!should_auto_rehash("go", &args(&["build", "./..."])));
        assert!(!should_auto_rehash("gofmt", &args(&["install"])));
        assert!(!should_auto_rehash("go", &[]));
    }
}
