//! Archive downloads with streaming verification.
//!
//! # Architecture
//!
//! - [`data`] - options, progress and source descriptions
//! - [`core`] - pure helpers such as the retry schedule
//! - [`effects`] - the [`HttpClient`] seam and the [`Fetcher`]
//!
//! Bytes are hashed as they are written to `<destination>.part`; nothing is
//! buffered in memory and the file is never read back. A digest mismatch is
//! terminal: both the partial and the final file are removed and no further
//! source is tried.

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use core::retry_delay;
pub use data::{DownloadSource, FetchOptions, FetchPhase, Progress, mirror_url};
pub use effects::{Artifact, BoxStream, Fetcher, HttpClient};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
