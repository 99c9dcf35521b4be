use super::options::FetchPhase;

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase:            FetchPhase,
    pub bytes_downloaded: u64,
    /// From `Content-Length`, when the server sends one.
    pub total_bytes:      Option<u64>,
    /// 0 on the first attempt against a source.
    pub retry_count:      u32,
    /// Index into the source list being tried.
    pub source_index:     usize,
}

impl Progress {
    /// `None` when the total is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| match total {
            0 if self.is_completed() => 100.0,
            0 => 0.0,
            total => self.bytes_downloaded as f64 / total as f64 * 100.0,
        })
    }

    #[must_use]
    pub fn is_completed(&self) -> bool { self.phase == FetchPhase::Completed }

    #[must_use]
    pub fn is_retrying(&self) -> bool { self.retry_count > 0 }
}
