use crate::{Result, VersionError};

pub const MAX_NAME_LEN: usize = 255;

/// Check that a version token is safe to use as a directory name under `versions/`.
pub fn validate_version_name(name: &str) -> Result<()> {
    let fail = |reason| {
        Err(VersionError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return fail("empty");
    }
    if name.len() > MAX_NAME_LEN {
        return fail("longer than 255 bytes");
    }
    if name.contains("..") {
        return fail("contains '..'");
    }
    if name.starts_with('.') {
        return fail("starts with '.'");
    }
    if name.starts_with('/') || name.starts_with('\\') {
        return fail("absolute path");
    }
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return fail("drive letter");
    }
    if name.contains('/') || name.contains('\\') {
        return fail("contains a path separator");
    }
    if name.contains('\0') {
        return fail("contains NUL");
    }
    if name.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return fail("contains whitespace or control characters");
    }
    Ok(())
}
