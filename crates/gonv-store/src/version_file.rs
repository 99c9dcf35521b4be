//! Per-directory version files.

use std::path::{Path, PathBuf};

use gonv_fs::{AtomicWriteOptions, atomic_write, read_optional, remove_file_if_exists};
use gonv_version::{VersionSpec, normalize, validate_version_name};
use tracing::debug;

use crate::Result;

/// Canonical local version file.
pub const LOCAL_FILE: &str = ".go-version";

/// asdf-compatible file, read when `.go-version` is absent.
pub const LEGACY_LOCAL_FILE: &str = ".tool-versions";

pub const GO_MOD_FILE: &str = "go.mod";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFileKind {
    /// One version per line (`.go-version`, the global file).
    Plain,
    /// `golang 1.21.0` / `go 1.21.0` entries.
    ToolVersions,
    /// `toolchain go1.21.3` or `go 1.21` directives.
    GoMod,
}

impl VersionFileKind {
    pub fn for_path(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(LEGACY_LOCAL_FILE) => Self::ToolVersions,
            Some(GO_MOD_FILE) => Self::GoMod,
            _ => Self::Plain,
        }
    }
}

/// Read a version file. Missing files and files without a usable entry
/// yield `None`.
pub fn read_version_file(path: impl AsRef<Path>, kind: VersionFileKind) -> Result<Option<VersionSpec>> {
    let path = path.as_ref();
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };

    let entries = match kind {
        VersionFileKind::Plain => parse_plain(&content),
        VersionFileKind::ToolVersions => parse_tool_versions(&content),
        VersionFileKind::GoMod => parse_go_mod(&content).into_iter().collect(),
    };

    let valid: Vec<String> = entries
        .into_iter()
        .filter(|entry| match validate_version_name(entry) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %path.display(), "skipping entry: {e}");
                false
            }
        })
        .collect();

    Ok(VersionSpec::new(valid).ok())
}

fn parse_plain(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn parse_tool_versions(content: &str) -> Vec<String> {
    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        if matches!(fields.next(), Some("golang" | "go")) {
            return fields.map(str::to_string).collect();
        }
    }
    Vec::new()
}

/// The toolchain a `go.mod` asks for. A `toolchain goX` directive wins over
/// the `go X` line; `toolchain default` defers to the `go` line.
pub fn parse_go_mod(content: &str) -> Option<String> {
    let mut go_line = None;
    for line in content.lines() {
        let line = line.split("//").next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some("toolchain"), Some(tc)) if tc.starts_with("go") => {
                return Some(normalize(tc).to_string());
            }
            (Some("go"), Some(v)) if go_line.is_none() => go_line = Some(v.to_string()),
            _ => {}
        }
    }
    go_line
}

/// Write one entry per line, atomically.
pub fn write_version_file(path: impl AsRef<Path>, spec: &VersionSpec) -> Result<()> {
    for entry in spec {
        validate_version_name(entry)?;
    }
    atomic_write(path.as_ref(), spec.to_lines().as_bytes(), AtomicWriteOptions::new())?;
    Ok(())
}

pub fn local_file(dir: &Path) -> PathBuf { dir.join(LOCAL_FILE) }

pub fn write_local(dir: &Path, spec: &VersionSpec) -> Result<PathBuf> {
    let path = local_file(dir);
    write_version_file(&path, spec)?;
    Ok(path)
}

/// Remove `.go-version` from `dir`. Returns whether a file was removed.
pub fn unset_local(dir: &Path) -> Result<bool> { Ok(remove_file_if_exists(local_file(dir))?) }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plain_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCAL_FILE);
        std::fs::write(&path, "# comment\r\n1.21.0\r\n\r\n../../etc\n1.20.0\n").unwrap();

        let spec = read_version_file(&path, VersionFileKind::Plain).unwrap().unwrap();
        assert_eq!(spec.entries(), &["1.21.0", "1.20.0"]);
    }

    #[test]
    fn test_empty_file_is_unset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCAL_FILE);
        std::fs::write(&path, " \n\t\n").unwrap();
        assert!(read_version_file(&path, VersionFileKind::Plain).unwrap().is_none());
        assert!(read_version_file(dir.path().join("nope"), VersionFileKind::Plain).unwrap().is_none());
    }

    #[test]
    fn test_tool_versions() {
        let content = "nodejs 20.1.0\ngolang 1.21.5 1.20.0 # pinned\npython 3.12\n";
        assert_eq!(parse_tool_versions(content), vec!["1.21.5", "1.20.0"]);
        assert_eq!(parse_tool_versions("go 1.22.0\n"), vec!["1.22.0"]);
        assert!(parse_tool_versions("nodejs 20\n").is_empty());
    }

    #[test]
    fn test_go_mod() {
        let content = "module example.com/m\n\ngo 1.21\n\ntoolchain go1.21.3\n";
        assert_eq!(parse_go_mod(content).as_deref(), Some("1.21.3"));
        assert_eq!(parse_go_mod("module m\ngo 1.22.0\n").as_deref(), Some("1.22.0"));
        assert_eq!(parse_go_mod("go 1.20\ntoolchain default\n").as_deref(), Some("1.20"));
        assert_eq!(parse_go_mod("// go 1.19\nmodule m\n").as_deref(), None);
        assert_eq!(parse_go_mod("go 1.21 // minimum\n").as_deref(), Some("1.21"));
    }

    #[test]
    fn test_kind_for_path() {
        assert_eq!(VersionFileKind::for_path(Path::new("/p/.tool-versions")), VersionFileKind::ToolVersions);
        assert_eq!(VersionFileKind::for_path(Path::new("/p/go.mod")), VersionFileKind::GoMod);
        assert_eq!(VersionFileKind::for_path(Path::new("/p/.go-version")), VersionFileKind::Plain);
    }

    #[test]
    fn test_write_read_preserves_order() {
        let dir = tempdir().unwrap();
        let spec = VersionSpec::new(["1.22.1", "1.20.0", "system"]).unwrap();
        let path = write_local(dir.path(), &spec).unwrap();

        assert_eq!(read_version_file(&path, VersionFileKind::Plain).unwrap(), Some(spec));
        assert!(unset_local(dir.path()).unwrap());
        assert!(!unset_local(dir.path()).unwrap());
    }

    #[test]
    fn test_write_rejects_invalid_entry() {
        let dir = tempdir().unwrap();
        let spec = VersionSpec::new(["../escape"]).unwrap();
        assert!(write_local(dir.path(), &spec).is_err());
        assert!(!local_file(dir.path()).exists());
    }
}
