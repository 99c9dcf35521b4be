use std::io::{self, Read};

use crate::{Hasher, Result};

/// Reader that hashes bytes as they pass through.
pub struct VerifiedReader<R, H> {
    reader: R,
    hasher: H,
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self { Self { reader, hasher } }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

impl<R: Read, H: Hasher> VerifiedReader<R, H> {
    /// Finalize against an expected hex digest.
    pub fn finish(self, expected_hex: &str) -> Result<()> {
        crate::verify_hex(&self.hasher.finalize(), expected_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sha256Hasher, VerificationError};
    use std::io::Cursor;

    #[test]
    fn test_verified_reader_success() {
        let data = b"go1.21.0.linux-amd64.tar.gz contents";
        let expected = hex::encode(Sha256Hasher::digest(data));

        let mut verified = VerifiedReader::new(Cursor::new(data), Sha256Hasher::new());
        let mut sink = Vec::new();
        io::copy(&mut verified, &mut sink).unwrap();

        assert_eq!(sink, data);
        verified.finish(&expected).unwrap();
    }

    #[test]
    fn test_verified_reader_hash_mismatch() {
        let mut verified = VerifiedReader::new(Cursor::new(b"tampered"), Sha256Hasher::new());
        io::copy(&mut verified, &mut io::sink()).unwrap();

        match verified.finish(&"00".repeat(32)) {
            Err(VerificationError::Mismatch { expected, actual }) => {
                assert_eq!(expected, "00".repeat(32));
                assert_ne!(actual, expected);
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }
}
