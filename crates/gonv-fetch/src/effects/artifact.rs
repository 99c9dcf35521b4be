use std::path::{Path, PathBuf};

use tracing::debug;

/// A verified download on disk.
///
/// The file is deleted when the artifact is dropped unless it was fetched
/// with `keep` or [`Artifact::persist`] is called.
#[derive(Debug)]
pub struct Artifact {
    path:   PathBuf,
    sha256: [u8; 32],
    keep:   bool,
}

impl Artifact {
    /// Wrap a file that was verified by other means, e.g. a cached archive.
    pub fn from_verified(path: impl Into<PathBuf>, sha256: [u8; 32], keep: bool) -> Self {
        Self {
            path: path.into(),
            sha256,
            keep,
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn sha256(&self) -> &[u8; 32] { &self.sha256 }

    pub fn sha256_hex(&self) -> String { hex::encode(self.sha256) }

    pub fn is_kept(&self) -> bool { self.keep }

    pub fn persist(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = gonv_fs::remove_file_if_exists(&self.path) {
            debug!(path = %self.path.display(), error = %e, "failed to discard artifact");
        }
    }
}
