use std::sync::Arc;

use gonv_fetch::{FetchPhase, Progress};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str =
    "{spinner:.blue} {msg:>11} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Progress bar on standard error fed by fetch progress events.
///
/// Draws nothing when standard error is not a terminal.
#[derive(Clone)]
pub struct DownloadTracker {
    pb: ProgressBar,
}

impl DownloadTracker {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Some(style) = PB_TEMPLATE.as_ref() {
            pb.set_style(style.clone());
        }
        Self { pb }
    }

    pub fn update(&self, progress: &Progress) {
        if let Some(total) = progress.total_bytes {
            self.pb.set_length(total);
        }
        self.pb.set_position(progress.bytes_downloaded);
        let msg = if progress.is_retrying() && progress.phase == FetchPhase::Connecting {
            format!("retry {}", progress.retry_count)
        } else {
            progress.phase.to_string()
        };
        self.pb.set_message(msg);
    }

    pub fn callback(&self) -> Arc<dyn Fn(&Progress) + Send + Sync> {
        let tracker = self.clone();
        Arc::new(move |progress: &Progress| tracker.update(progress))
    }

    pub fn finish(&self) { self.pb.finish_and_clear(); }
}
