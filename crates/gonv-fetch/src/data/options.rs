use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;

/// Phases of a download, in order:
/// Connecting → Downloading → Verifying → Committing → Completed.
///
/// A retry goes back to `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Connecting,
    /// Streaming chunks into the `.part` file.
    Downloading,
    Verifying,
    /// Renaming the `.part` file into place.
    Committing,
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Downloading => "downloading",
            Self::Verifying => "verifying",
            Self::Committing => "committing",
            Self::Completed => "completed",
        })
    }
}

/// Configuration for a fetch.
///
/// ```
/// use std::time::Duration;
/// use gonv_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .max_retries(5)
///     .retry_backoff(Duration::from_millis(200))
///     .header("Accept", "application/octet-stream")
///     .keep(true);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Expected SHA-256 of the body. A source may carry its own, which wins.
    pub checksum:      Option<[u8; 32]>,
    /// Retries per source after the first attempt. Only network failures
    /// are retried.
    pub max_retries:   u32,
    /// Base of the exponential backoff, see [`crate::retry_delay`].
    pub retry_backoff: Duration,
    pub headers:       Arc<[(String, String)]>,
    /// Called on every phase change and after every chunk.
    pub on_progress:   Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
    /// Keep the file after the returned [`crate::Artifact`] is dropped.
    pub keep:          bool,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("checksum", &self.checksum.map(hex::encode))
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .field("keep", &self.keep)
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            checksum:      None,
            max_retries:   3,
            retry_backoff: Duration::from_millis(100),
            headers:       Arc::new([]),
            on_progress:   None,
            keep:          false,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn checksum(mut self, checksum: Option<[u8; 32]>) -> Self {
        self.checksum = checksum;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    #[must_use]
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }
}
