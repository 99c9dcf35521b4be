use std::io::{Read, Seek};
use std::path::PathBuf;

use super::EntryWriter;
use crate::error::{Error, Result};

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

pub(super) fn extract<R: Read + Seek>(reader: R, writer: &mut EntryWriter<'_>) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| Error::Corrupted(e.to_string()))?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(|e| Error::Corrupted(e.to_string()))?;
        // Raw name, not `enclosed_name`: escapes must surface as errors
        // rather than be silently dropped.
        let raw = PathBuf::from(file.name().replace('\\', "/"));
        let mode = file.unix_mode();

        if file.is_dir() {
            writer.directory(&raw)?;
        } else if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            file.read_to_string(&mut target)
                .map_err(|e| Error::Corrupted(format!("symlink {}: {e}", raw.display())))?;
            writer.symlink(&raw, &PathBuf::from(target))?;
        } else {
            writer.file(&raw, mode, &mut file)?;
        }
    }
    Ok(())
}
