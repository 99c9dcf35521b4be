use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} is not a zip, tar.gz or tar archive", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("zip-slip attack detected: entry '{}' resolves to '{}'", entry.display(), resolved.display())]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("symlink target escapes the destination: '{}' -> '{}'", target.display(), resolved.display())]
    SymlinkEscape { target: PathBuf, resolved: PathBuf },

    #[error("strip_components({count}) removed every component of '{}'", original.display())]
    NoComponentsRemaining { original: PathBuf, count: usize },

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
