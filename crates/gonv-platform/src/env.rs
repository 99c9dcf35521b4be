use crate::error::Result;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Compare `PATH` entries, ignoring trailing separators (and case on Windows).
pub fn paths_equal(p1: &Path, p2: &Path) -> bool {
    fn normalize(p: &Path) -> String {
        let s = p.to_string_lossy();
        let s = s.trim_end_matches(['/', '\\']);
        if cfg!(windows) { s.to_lowercase() } else { s.to_string() }
    }
    normalize(p1) == normalize(p2)
}

/// Builder over the entries of a `PATH`-style variable.
#[derive(Debug, Clone, Default)]
pub struct PathModifier {
    paths: Vec<PathBuf>,
}

impl PathModifier {
    /// Start from the current process `PATH`.
    pub fn new() -> Self { Self { paths: path_env().unwrap_or_default() } }

    pub fn from_value(value: impl AsRef<OsStr>) -> Self {
        Self {
            paths: env::split_paths(value.as_ref()).filter(|p| !p.as_os_str().is_empty()).collect(),
        }
    }

    /// Put `path` first. An existing equal entry is moved rather than duplicated.
    pub fn prepend(mut self, path: PathBuf) -> Self {
        self.paths.retain(|p| !paths_equal(p, &path));
        self.paths.insert(0, path);
        self
    }

    /// Prepend several entries keeping their relative order.
    pub fn prepend_all<I: IntoIterator<Item = PathBuf>>(self, paths: I) -> Self {
        let mut paths: Vec<PathBuf> = paths.into_iter().collect();
        paths.reverse();
        paths.into_iter().fold(self, |m, p| m.prepend(p))
    }

    pub fn remove(mut self, path: &Path) -> Self {
        self.paths.retain(|p| !paths_equal(p, path));
        self
    }

    pub fn build(self) -> Result<OsString> { Ok(env::join_paths(self.paths)?) }

    pub fn contains(&self, path: &Path) -> bool { self.paths.iter().any(|p| paths_equal(p, path)) }

    pub fn paths(&self) -> &[PathBuf] { &self.paths }
}

pub fn path_env() -> Option<Vec<PathBuf>> {
    env::var_os("PATH").map(|val| env::split_paths(&val).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(parts: &[&str]) -> OsString { env::join_paths(parts).unwrap() }

    #[test]
    fn test_from_value_skips_empty() {
        let m = PathModifier::from_value(joined(&["/usr/bin", "", "/bin"]));
        assert_eq!(m.paths(), &[PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
    }

    #[test]
    fn test_prepend_moves_existing() {
        let m = PathModifier::from_value(joined(&["/usr/bin", "/opt/go/bin"]))
            .prepend(PathBuf::from("/opt/go/bin/"));
        assert_eq!(m.paths().len(), 2);
        assert_eq!(m.paths()[0], PathBuf::from("/opt/go/bin/"));
    }

    #[test]
    fn test_prepend_all_keeps_order() {
        let m = PathModifier::from_value(joined(&["/usr/bin"]))
            .prepend_all([PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(
            m.paths(),
            &[PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/usr/bin")]
        );
    }

    #[test]
    fn test_remove_shims() {
        let m = PathModifier::from_value(joined(&["/home/u/.gonv/shims", "/usr/bin"]))
            .remove(Path::new("/home/u/.gonv/shims/"));
        assert!(!m.contains(Path::new("/home/u/.gonv/shims")));
        assert!(m.contains(Path::new("/usr/bin")));
    }

    #[test]
    fn test_build_round_trips() {
        let value = joined(&["/a", "/b"]);
        assert_eq!(PathModifier::from_value(&value).build().unwrap(), value);
    }

    #[test]
    fn test_paths_equal() {
        assert!(paths_equal(Path::new("/path/"), Path::new("/path")));
        assert!(!paths_equal(Path::new("/path1"), Path::new("/path2")));
    }
}
