use sha2::Digest;

/// Incremental digest over a byte stream.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha256::digest(data).to_vec() }

    pub fn finalize_hex(self) -> String { hex::encode(Hasher::finalize(self)) }

    pub fn finalize_array(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.finalize());
        out
    }
}

/// Parse a lowercase or uppercase hex SHA-256 digest.
pub fn parse_sha256_hex(s: &str) -> crate::Result<[u8; 32]> {
    let trimmed = s.trim();
    let mut out = [0u8; 32];
    hex::decode_to_slice(trimmed, &mut out)
        .map_err(|_| crate::VerificationError::InvalidDigest(trimmed.to_string()))?;
    Ok(out)
}

/// Compare a computed digest against an expected hex string.
pub fn verify_hex(actual: &[u8], expected_hex: &str) -> crate::Result<()> {
    let expected = parse_sha256_hex(expected_hex)?;
    if actual == expected {
        Ok(())
    } else {
        Err(crate::VerificationError::Mismatch {
            expected: hex::encode(expected),
            actual:   hex::encode(actual),
        })
    }
}
