use crate::{Error, Result};
use std::io;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct PublishOptions {
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            retry_count: 5,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl PublishOptions {
    pub fn new() -> Self { Self::default() }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Move a fully prepared directory to `dest` with a single rename.
///
/// `dest` must not exist. If it does, or if another process wins the race
/// for it, [`Error::Conflict`] is returned and `src` is left in place.
pub fn publish_dir(src: impl AsRef<Path>, dest: impl AsRef<Path>, options: PublishOptions) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    // rename(2) happily replaces an empty directory, so check first.
    if dest.exists() {
        return Err(Error::Conflict { path: dest.to_path_buf() });
    }

    let mut attempts = 0;
    loop {
        match std::fs::rename(src, dest) {
            Ok(()) => return Ok(()),
            Err(e) if is_conflict(&e) => {
                return Err(Error::Conflict { path: dest.to_path_buf() });
            }
            Err(e) => {
                attempts += 1;
                // Windows reports sharing violations while scanners hold handles.
                if !cfg!(windows) || attempts >= options.retry_count {
                    return Err(Error::Rename {
                        from:   src.to_path_buf(),
                        to:     dest.to_path_buf(),
                        source: e,
                    });
                }
                std::thread::sleep(options.retry_delay * attempts);
            }
        }
    }
}

fn is_conflict(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty)
}

/// Plain rename with path context.
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::rename(from, to).map_err(|source| Error::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

pub fn remove_dir_all_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_publish_dir() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("staging");
        let dest = dir.path().join("1.21.0");
        std::fs::create_dir_all(src.join("bin")).unwrap();
        std::fs::write(src.join("bin").join("go"), "go").unwrap();

        publish_dir(&src, &dest, PublishOptions::new()).unwrap();
        assert!(!src.exists());
        assert!(dest.join("bin").join("go").exists());
    }

    #[test]
    fn test_publish_dir_conflict_keeps_both() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("staging");
        let dest = dir.path().join("1.21.0");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("new"), "new").unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("old"), "old").unwrap();

        let err = publish_dir(&src, &dest, PublishOptions::new()).unwrap_err();
        assert!(err.is_conflict());
        assert!(src.join("new").exists());
        assert!(dest.join("old").exists());
        assert!(!dest.join("new").exists());
    }

    #[test]
    fn test_publish_dir_refuses_empty_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("staging");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dest).unwrap();

        assert!(publish_dir(&src, &dest, PublishOptions::new()).unwrap_err().is_conflict());
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        assert!(!remove_dir_all_if_exists(&sub).unwrap());
        std::fs::create_dir_all(sub.join("a")).unwrap();
        assert!(remove_dir_all_if_exists(&sub).unwrap());
        assert!(!sub.exists());

        let file = dir.path().join("f");
        assert!(!remove_file_if_exists(&file).unwrap());
        std::fs::write(&file, "").unwrap();
        assert!(remove_file_if_exists(&file).unwrap());
    }
}
