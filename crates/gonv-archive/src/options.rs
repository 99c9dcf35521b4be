use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct ExtractOptions {
    pub strip_components:     usize,
    /// Apply Unix mode bits recorded in the archive. No effect elsewhere.
    pub preserve_permissions: bool,
    pub on_progress:          Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub entries_processed: usize,
    pub bytes_processed:   u64,
    pub current_file:      PathBuf,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strip_components:     0,
            preserve_permissions: true,
            on_progress:          None,
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("strip_components", &self.strip_components)
            .field("preserve_permissions", &self.preserve_permissions)
            .finish_non_exhaustive()
    }
}

impl ExtractOptions {
    pub fn strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }

    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }
}
