//! Content verification for downloaded archives.
//!
//! Digests are computed incrementally while bytes stream to disk, so an
//! archive is read exactly once.
//!
//! # Example
//!
//! ```
//! use gonv_verify::{Sha256Hasher, VerifiedReader};
//!
//! let data = b"hello world";
//! let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
//!
//! let mut reader = VerifiedReader::new(&data[..], Sha256Hasher::new());
//! std::io::copy(&mut reader, &mut std::io::sink()).unwrap();
//! reader.finish(expected).unwrap();
//! ```

pub use self::error::{Result, VerificationError};
pub use self::hasher::{Hasher, Sha256Hasher, parse_sha256_hex, verify_hex};
pub use self::reader::VerifiedReader;

mod error;
mod hasher;
mod reader;
