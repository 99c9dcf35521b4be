use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, PublishOptions, Result, create_dir_all, publish_dir};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// `.<name>.<tag>-<pid>-<n>` next to `path`, distinct for every call in
/// every process.
pub fn unique_sibling(path: &Path, tag: &str) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(
        ".{name}.{tag}-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}

/// A staging directory next to its final destination.
///
/// Dropping an uncommitted workspace removes the staging tree, so an
/// interrupted install never leaves a half-populated directory behind.
#[derive(Debug)]
pub struct Workspace {
    staging_path:     PathBuf,
    destination_path: PathBuf,
    committed:        bool,
}

impl Workspace {
    /// Create a uniquely named staging directory in the parent of `destination`.
    pub fn sibling(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref();
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::NoParent { path: destination.to_path_buf() })?;
        create_dir_all(parent)?;

        let staging_path = unique_sibling(destination, "staging");

        std::fs::create_dir(&staging_path).map_err(|source| Error::CreateDir {
            path: staging_path.clone(),
            source,
        })?;

        Ok(Self {
            staging_path,
            destination_path: destination.to_path_buf(),
            committed: false,
        })
    }

    pub fn path(&self) -> &Path { &self.staging_path }

    pub fn destination(&self) -> &Path { &self.destination_path }

    /// Publish the staging tree at the destination in one rename.
    pub fn commit(mut self) -> Result<PathBuf> {
        publish_dir(&self.staging_path, &self.destination_path, PublishOptions::new())?;
        self.committed = true;
        Ok(self.destination_path.clone())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_dir_all(&self.staging_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_commit() -> std::io::Result<()> {
        let dir = tempdir()?;
        let dest = dir.path().join("versions").join("1.21.0");
        let workspace = Workspace::sibling(&dest).unwrap();
        assert!(workspace.path().starts_with(dir.path().join("versions")));
        std::fs::write(workspace.path().join("VERSION"), "go1.21.0")?;

        let published = workspace.commit().unwrap();
        assert_eq!(published, dest);
        assert_eq!(std::fs::read_to_string(dest.join("VERSION"))?, "go1.21.0");
        Ok(())
    }

    #[test]
    fn test_workspace_cleanup_on_drop() -> std::io::Result<()> {
        let dir = tempdir()?;
        let dest = dir.path().join("1.21.0");
        let workspace = Workspace::sibling(&dest).unwrap();
        let staging = workspace.path().to_path_buf();
        std::fs::write(staging.join("file"), "data")?;
        drop(workspace);

        assert!(!staging.exists());
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_workspace_names_are_unique() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("1.21.0");
        let a = Workspace::sibling(&dest).unwrap();
        let b = Workspace::sibling(&dest).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_workspace_commit_conflict_cleans_staging() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("1.21.0");
        std::fs::create_dir_all(&dest).unwrap();

        let workspace = Workspace::sibling(&dest).unwrap();
        let staging = workspace.path().to_path_buf();
        let err = workspace.commit().unwrap_err();
        assert!(err.is_conflict());
        assert!(!staging.exists());
        assert!(dest.exists());
    }
}
