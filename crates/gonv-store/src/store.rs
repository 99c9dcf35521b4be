use std::path::{Path, PathBuf};

use gonv_fs::{AtomicWriteOptions, atomic_write, create_dir_all, read_optional, remove_dir_all_if_exists};
use gonv_version::{VersionSpec, sort_names, validate_version_name};
use tracing::debug;

use crate::version_file::{self, VersionFileKind};
use crate::{Config, Result, StoreError};

pub const VERSIONS_DIR: &str = "versions";
pub const SHIMS_DIR: &str = "shims";
pub const CACHE_DIR: &str = "cache";
pub const GLOBAL_FILE: &str = "version";
pub const LEGACY_GLOBAL_FILES: [&str; 2] = ["global", "default"];
pub const ALIASES_FILE: &str = "aliases";

/// Handle on the install root.
///
/// Directory existence under `versions/` is the only record of what is
/// installed; there is no index file to keep in sync.
#[derive(Debug, Clone)]
pub struct VersionStore {
    root:          PathBuf,
    gopath_prefix: Option<PathBuf>,
}

impl VersionStore {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root:          config.root.clone(),
            gopath_prefix: config.gopath.then(|| config.gopath_prefix.clone()),
        }
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn versions_dir(&self) -> PathBuf { self.root.join(VERSIONS_DIR) }
    pub fn version_dir(&self, name: &str) -> PathBuf { self.versions_dir().join(name) }
    pub fn bin_dir(&self, name: &str) -> PathBuf { self.version_dir(name).join("bin") }
    pub fn shims_dir(&self) -> PathBuf { self.root.join(SHIMS_DIR) }
    pub fn cache_dir(&self) -> PathBuf { self.root.join(CACHE_DIR) }
    pub fn global_file(&self) -> PathBuf { self.root.join(GLOBAL_FILE) }
    pub fn aliases_file(&self) -> PathBuf { self.root.join(ALIASES_FILE) }

    /// `GOPATH` for a version, when GOPATH management is on.
    pub fn gopath_dir(&self, name: &str) -> Option<PathBuf> {
        self.gopath_prefix.as_ref().map(|p| p.join(name))
    }

    /// Tools installed with `go install` under the version's GOPATH.
    pub fn tools_dir(&self, name: &str) -> Option<PathBuf> { self.gopath_dir(name).map(|p| p.join("bin")) }

    /// Directories searched for a version's executables, in order.
    pub fn bin_dirs(&self, name: &str) -> Vec<PathBuf> {
        let mut dirs = vec![self.bin_dir(name)];
        dirs.extend(self.tools_dir(name));
        dirs
    }

    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.versions_dir(), self.shims_dir(), self.cache_dir()] {
            create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Installed distribution names, in version order.
    ///
    /// Hidden entries (staging and aside directories of in-flight installs)
    /// and plain files are skipped.
    pub fn installed(&self) -> Result<Vec<String>> {
        let dir = self.versions_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    action: "list",
                    path: dir,
                    source,
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                action: "list",
                path: dir.clone(),
                source,
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        sort_names(&mut names);
        Ok(names)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        validate_version_name(name).is_ok() && self.version_dir(name).is_dir()
    }

    /// Recursively delete an installed distribution.
    pub fn remove_version(&self, name: &str) -> Result<()> {
        validate_version_name(name)?;
        if !remove_dir_all_if_exists(self.version_dir(name))? {
            return Err(StoreError::NotInstalled(name.to_string()));
        }
        debug!(version = name, "removed distribution");
        Ok(())
    }

    /// The global version and the file it came from.
    ///
    /// `version` is authoritative when it exists, even if empty; the legacy
    /// `global` and `default` files are only read in its absence.
    pub fn read_global(&self) -> Result<Option<(PathBuf, VersionSpec)>> {
        let primary = self.global_file();
        let candidates = std::iter::once(primary).chain(LEGACY_GLOBAL_FILES.iter().map(|f| self.root.join(f)));
        for path in candidates {
            if path.is_file() {
                let spec = version_file::read_version_file(&path, VersionFileKind::Plain)?;
                return Ok(spec.map(|s| (path, s)));
            }
        }
        Ok(None)
    }

    pub fn write_global(&self, spec: &VersionSpec) -> Result<()> {
        create_dir_all(&self.root)?;
        version_file::write_version_file(self.global_file(), spec)
    }

    pub(crate) fn read_root_file(&self, path: &Path) -> Result<Option<String>> { Ok(read_optional(path)?) }

    pub(crate) fn write_root_file(&self, path: &Path, content: &str) -> Result<()> {
        create_dir_all(&self.root)?;
        atomic_write(path, content.as_bytes(), AtomicWriteOptions::new())?;
        Ok(())
    }
}
