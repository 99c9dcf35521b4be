//! Extraction pipeline.
//!
//! Each format module walks its entries and hands them to [`EntryWriter`],
//! which sanitizes paths, writes to disk and applies permissions.
//!
//! On non-Unix platforms mode bits are ignored.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::detect::{ArchiveFormat, detect_from_reader};
use crate::error::{Error, Result};
use crate::options::{ExtractOptions, Progress};
use crate::sanitize::{sanitize_path, sanitize_symlink_target};

mod tar;
mod zip;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractReport {
    pub format:      ArchiveFormat,
    pub entry_count: usize,
    pub total_bytes: u64,
    /// Entries left with no path after stripping, and unsupported kinds.
    pub skipped:     usize,
}

/// Extract the archive at `path` into `destination`, creating it if needed.
pub fn extract_file(path: impl AsRef<Path>, destination: impl AsRef<Path>, options: &ExtractOptions) -> Result<ExtractReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        action: "open",
        path: path.to_path_buf(),
        source,
    })?;
    extract_from_reader(BufReader::new(file), destination, options).map_err(|e| match e {
        Error::UnsupportedFormat { .. } => Error::UnsupportedFormat { path: path.to_path_buf() },
        e => e,
    })
}

pub fn extract_from_reader<R: Read + Seek>(
    mut reader: R,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let destination = destination.as_ref();
    let format = detect_from_reader(&mut reader)
        .map_err(|e| Error::Corrupted(e.to_string()))?
        .ok_or_else(|| Error::UnsupportedFormat { path: PathBuf::new() })?;

    fs::create_dir_all(destination).map_err(|source| Error::Io {
        action: "create directory",
        path: destination.to_path_buf(),
        source,
    })?;

    debug!(%format, destination = %destination.display(), "extracting");
    let mut writer = EntryWriter::new(destination, options, format);
    match format {
        ArchiveFormat::Zip => zip::extract(reader, &mut writer)?,
        ArchiveFormat::TarGz => tar::extract(flate2::read::GzDecoder::new(reader), &mut writer)?,
        ArchiveFormat::Tar => tar::extract(reader, &mut writer)?,
    }
    Ok(writer.report)
}

pub(crate) struct EntryWriter<'a> {
    destination: &'a Path,
    options:     &'a ExtractOptions,
    report:      ExtractReport,
}

impl<'a> EntryWriter<'a> {
    fn new(destination: &'a Path, options: &'a ExtractOptions, format: ArchiveFormat) -> Self {
        Self {
            destination,
            options,
            report: ExtractReport {
                format,
                entry_count: 0,
                total_bytes: 0,
                skipped: 0,
            },
        }
    }

    fn target(&mut self, raw: &Path) -> Result<Option<PathBuf>> {
        let target = sanitize_path(raw, self.destination, self.options.strip_components)?;
        if target.is_none() {
            self.report.skipped += 1;
        }
        Ok(target)
    }

    pub(crate) fn directory(&mut self, raw: &Path) -> Result<()> {
        let Some(target) = self.target(raw)? else {
            return Ok(());
        };
        create_dir_all(&target)?;
        self.processed(raw, 0);
        Ok(())
    }

    pub(crate) fn file(&mut self, raw: &Path, mode: Option<u32>, content: &mut dyn Read) -> Result<()> {
        let Some(target) = self.target(raw)? else {
            return Err(Error::NoComponentsRemaining {
                original: raw.to_path_buf(),
                count:    self.options.strip_components,
            });
        };
        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }

        let io_err = |action: &'static str| {
            let path = target.clone();
            move |source| Error::Io { action, path, source }
        };
        let mut file = File::create(&target).map_err(io_err("create"))?;
        let written = io::copy(content, &mut file).map_err(io_err("write"))?;
        drop(file);

        if self.options.preserve_permissions
            && let Some(mode) = mode
        {
            set_mode(&target, mode)?;
        }
        self.processed(raw, written);
        Ok(())
    }

    pub(crate) fn symlink(&mut self, raw: &Path, link_target: &Path) -> Result<()> {
        let Some(link) = self.target(raw)? else {
            return Ok(());
        };
        sanitize_symlink_target(link_target, &link, self.destination)?;
        if let Some(parent) = link.parent() {
            create_dir_all(parent)?;
        }
        write_symlink(link_target, &link)?;
        self.processed(raw, 0);
        Ok(())
    }

    pub(crate) fn skip(&mut self, raw: &Path, kind: &str) {
        debug!(entry = %raw.display(), kind, "skipping unsupported entry");
        self.report.skipped += 1;
    }

    fn processed(&mut self, raw: &Path, bytes: u64) {
        self.report.entry_count += 1;
        self.report.total_bytes += bytes;
        if let Some(callback) = &self.options.on_progress {
            callback(&Progress {
                entries_processed: self.report.entry_count,
                bytes_processed:   self.report.total_bytes,
                current_file:      raw.to_path_buf(),
            });
        }
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Io {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)).map_err(|source| Error::Io {
        action: "set permissions on",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> { Ok(()) }

fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    let io_err = |source| Error::Io {
        action: "create symlink",
        path: link.to_path_buf(),
        source,
    };
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).map_err(io_err)
    }
    #[cfg(windows)]
    {
        let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
        if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(target, link).map_err(io_err)
        } else {
            std::os::windows::fs::symlink_file(target, link).map_err(io_err)
        }
    }
}
