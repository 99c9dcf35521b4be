use std::fmt;
use std::io::{self, Read, Seek};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
    Tar,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
        })
    }
}

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::TarGz),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool { data.len() >= 512 && data[257..262] == *b"ustar" }

/// Sniff the first block and rewind.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = Vec::with_capacity(512);
    reader.by_ref().take(512).read_to_end(&mut header)?;
    reader.rewind()?;
    Ok(detect_format(&header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_zip_format() {
        assert_eq!(detect_format(&[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn detect_tar_gz_format() {
        assert_eq!(detect_format(&[0x1F, 0x8B, 0x08, 0x00]), Some(ArchiveFormat::TarGz));
    }

    #[test]
    fn detect_tar_plain_format() {
        let mut header = [0u8; 512];
        header[257..263].copy_from_slice(b"ustar\0");
        assert_eq!(detect_format(&header), Some(ArchiveFormat::Tar));
    }

    #[test]
    fn detect_unknown_and_truncated() {
        assert_eq!(detect_format(&[0xDE, 0xAD, 0xBE, 0xEF]), None);
        assert_eq!(detect_format(&[0u8; 256]), None);
        assert_eq!(detect_format(&[]), None);
    }

    #[test]
    fn detect_from_reader_rewinds() {
        let mut cursor = io::Cursor::new(vec![0x1F, 0x8B, 0x08, 0x00, 0x01]);
        assert_eq!(detect_from_reader(&mut cursor).unwrap(), Some(ArchiveFormat::TarGz));
        assert_eq!(cursor.position(), 0);
    }
}
