use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use gonv_fs::{AtomicWriteOptions, atomic_write};
use gonv_platform::exe::{executable_name, is_executable};
use gonv_store::VersionStore;
use tracing::{debug, warn};

use crate::{Result, ShimError};

/// A best-effort failure that did not stop the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub path:    PathBuf,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Default)]
pub struct ManagedExecutables {
    pub names:    BTreeSet<String>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Default)]
pub struct RehashReport {
    pub written:   Vec<String>,
    pub unchanged: Vec<String>,
    pub removed:   Vec<String>,
    pub warnings:  Vec<Warning>,
}

/// Maintains `shims/`: one proxy per executable name found in any installed
/// distribution.
pub struct ShimRegistry<'a> {
    store:   &'a VersionStore,
    program: PathBuf,
}

impl<'a> ShimRegistry<'a> {
    /// `program` is the `gonv` binary the shims re-invoke.
    pub fn new(store: &'a VersionStore, program: PathBuf) -> Self { Self { store, program } }

    /// Union of executable names across every installed distribution.
    ///
    /// An unreadable distribution `bin` directory is reported as a warning; a
    /// missing GOPATH tools directory is normal and skipped.
    pub fn list_managed_executables(&self) -> Result<ManagedExecutables> {
        let mut managed = ManagedExecutables::default();
        for version in self.store.installed()? {
            collect_executables(&self.store.bin_dir(&version), true, &mut managed);
            if let Some(tools) = self.store.tools_dir(&version) {
                collect_executables(&tools, false, &mut managed);
            }
        }
        Ok(managed)
    }

    /// Regenerate `shims/`.
    ///
    /// New and changed shims are written first and stale ones removed last,
    /// so a concurrent invocation sees either the old or the new set.
    pub fn rehash(&self) -> Result<RehashReport> {
        let ManagedExecutables { names, warnings } = self.list_managed_executables()?;
        let shims_dir = self.store.shims_dir();
        std::fs::create_dir_all(&shims_dir).map_err(|source| ShimError::ShimsDir {
            path: shims_dir.clone(),
            source,
        })?;

        let mut report = RehashReport {
            warnings,
            ..Default::default()
        };
        let mut keep = BTreeSet::new();

        for name in &names {
            let file_name = shim_file_name(name);
            let path = shims_dir.join(&file_name);
            let content = self.render(name);
            keep.insert(file_name);

            if std::fs::read(&path).is_ok_and(|existing| existing == content.as_bytes()) {
                report.unchanged.push(name.clone());
                continue;
            }
            atomic_write(&path, content.as_bytes(), AtomicWriteOptions::new().permissions(0o755))
                .map_err(|source| ShimError::WriteShim {
                    path: path.clone(),
                    source,
                })?;
            report.written.push(name.clone());
        }

        for path in self.list_shims()? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if keep.contains(&file_name) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed.push(file_name),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(ShimError::Io {
                        action: "remove stale shim",
                        path,
                        source,
                    });
                }
            }
        }

        for w in &report.warnings {
            warn!("{w}");
        }
        debug!(
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            removed = report.removed.len(),
            "rehash complete"
        );
        Ok(report)
    }

    /// Shim files currently present, sorted. In-flight temporary files are
    /// not listed.
    pub fn list_shims(&self) -> Result<Vec<PathBuf>> {
        let dir = self.store.shims_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ShimError::Io {
                    action: "list",
                    path: dir,
                    source,
                });
            }
        };
        let mut shims: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.path())
            .collect();
        shims.sort();
        Ok(shims)
    }

    /// Shim contents: a pure function of the program, the root and the name.
    pub fn render(&self, name: &str) -> String {
        if cfg!(windows) {
            render_cmd(&self.program, self.store.root(), name)
        } else {
            render_bash(&self.program, self.store.root(), name)
        }
    }
}

fn collect_executables(dir: &Path, required: bool, managed: &mut ManagedExecutables) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => return,
        Err(e) => {
            managed.warnings.push(Warning {
                path:    dir.to_path_buf(),
                message: format!("cannot read directory: {e}"),
            });
            return;
        }
    };

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if is_executable(&path)
                    && let Some(name) = executable_name(&path)
                {
                    managed.names.insert(name);
                }
            }
            Err(e) => managed.warnings.push(Warning {
                path:    dir.to_path_buf(),
                message: format!("cannot read entry: {e}"),
            }),
        }
    }
}

pub fn shim_file_name(name: &str) -> String {
    if cfg!(windows) { format!("{name}.cmd") } else { name.to_string() }
}

fn sh_quote(s: &str) -> String { format!("'{}'", s.replace('\'', r"'\''")) }

fn render_bash(program: &Path, root: &Path, name: &str) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         # gonv shim for {name}\n\
         set -e\n\
         [ -n \"$GONV_DEBUG\" ] && set -x\n\
         export GONV_ROOT={root}\n\
         exec {program} exec {quoted} \"$@\"\n",
        root = sh_quote(&root.to_string_lossy()),
        program = sh_quote(&program.to_string_lossy()),
        quoted = sh_quote(name),
    )
}

fn render_cmd(program: &Path, root: &Path, name: &str) -> String {
    [
        "@echo off".to_string(),
        format!("rem gonv shim for {name}"),
        "setlocal".to_string(),
        format!("set \"GONV_ROOT={}\"", root.display()),
        format!("\"{}\" exec \"{name}\" %*", program.display()),
        "exit /b %ERRORLEVEL%".to_string(),
        String::new(),
    ]
    .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bash() {
        let script = render_bash(Path::new("/opt/gonv/bin/gonv"), Path::new("/home/u/.gonv"), "gofmt");
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains("export GONV_ROOT='/home/u/.gonv'\n"));
        assert!(script.ends_with("exec '/opt/gonv/bin/gonv' exec 'gofmt' \"$@\"\n"));
    }

    #[test]
    fn test_sh_quote_escapes() {
        assert_eq!(sh_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_render_cmd() {
        let script = render_cmd(Path::new("C:/gonv/gonv.exe"), Path::new("C:/u/.gonv"), "go");
        assert!(script.starts_with("@echo off\r\n"));
        assert!(script.contains("\"C:/gonv/gonv.exe\" exec \"go\" %*\r\n"));
    }
}
