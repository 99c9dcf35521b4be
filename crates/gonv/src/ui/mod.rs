pub mod prompt;
pub mod table;
pub mod tracker;

pub use prompt::confirm;
pub use table::{FormatConfig, Formatter};
pub use tracker::DownloadTracker;
