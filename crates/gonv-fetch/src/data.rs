mod options;
mod progress;
mod sources;

pub use options::{FetchOptions, FetchPhase};
pub use progress::Progress;
pub use sources::{DownloadSource, mirror_url};
