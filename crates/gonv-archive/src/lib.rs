//! Extraction of Go distribution archives.
//!
//! - `detect.rs` - format detection by magic bytes
//! - `sanitize.rs` - path normalization and zip-slip prevention
//! - `extract/` - per-format readers feeding one writer
//!
//! Official archives wrap everything in a top-level `go/` directory; use
//! [`ExtractOptions::strip_components`] to drop it.

pub use detect::{ArchiveFormat, detect_format, detect_from_reader};
pub use error::{Error, Result};
pub use extract::{ExtractReport, extract_file, extract_from_reader};
pub use options::{ExtractOptions, Progress};
pub use sanitize::{sanitize_path, sanitize_symlink_target};

mod detect;
mod error;
mod extract;
mod options;
mod sanitize;
