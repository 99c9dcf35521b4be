use std::io::Read;

use tar::EntryType;

use super::EntryWriter;
use crate::error::{Error, Result};

pub(super) fn extract<R: Read>(reader: R, writer: &mut EntryWriter<'_>) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive.entries().map_err(|e| Error::Corrupted(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::Corrupted(e.to_string()))?;
        let raw = entry.path().map_err(|e| Error::Corrupted(e.to_string()))?.into_owned();
        let mode = entry.header().mode().ok();
        let kind = entry.header().entry_type();

        match kind {
            EntryType::Directory => writer.directory(&raw)?,
            EntryType::Regular | EntryType::Continuous => writer.file(&raw, mode, &mut entry)?,
            EntryType::Symlink => {
                let target = entry
                    .link_name()
                    .map_err(|e| Error::Corrupted(e.to_string()))?
                    .ok_or_else(|| Error::Corrupted(format!("symlink {} has no target", raw.display())))?
                    .into_owned();
                writer.symlink(&raw, &target)?;
            }
            // PAX and GNU long-name headers are consumed by the tar reader.
            other => writer.skip(&raw, &format!("{other:?}")),
        }
    }
    Ok(())
}
