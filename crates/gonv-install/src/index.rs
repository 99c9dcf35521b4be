use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gonv_fetch::{FetchOptions, Fetcher, HttpClient};
use gonv_fs::{AtomicWriteOptions, atomic_write, read_optional};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{InstallError, Release, ReleaseIndex, Result};

pub const RELEASE_INDEX_URL: &str = "https://go.dev/dl/?mode=json&include=all";
pub const INDEX_CACHE_FILE: &str = "releases.json";
/// Age after which a cached index is reported as stale.
pub const INDEX_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIndex {
    /// Seconds since the Unix epoch.
    pub fetched_at: u64,
    pub releases:   Vec<Release>,
}

impl CachedIndex {
    pub fn age(&self, now: SystemTime) -> Duration {
        let now = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.fetched_at))
    }

    pub fn is_stale(&self, now: SystemTime) -> bool { self.age(now) > INDEX_MAX_AGE }

    pub fn into_index(self) -> ReleaseIndex { ReleaseIndex::new(self.releases) }
}

/// The last successfully downloaded release index, kept under `<root>/cache`.
pub struct IndexCache {
    path: PathBuf,
}

impl IndexCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(INDEX_CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// The cached index, or `None` when absent or unreadable.
    pub fn read(&self) -> Option<CachedIndex> {
        let content = match read_optional(&self.path) {
            Ok(content) => content?,
            Err(e) => {
                debug!(error = %e, "release index cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring corrupt release index cache");
                None
            }
        }
    }

    pub fn write(&self, releases: &[Release], now: SystemTime) -> Result<()> {
        let cached = CachedIndex {
            fetched_at: now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0),
            releases:   releases.to_vec(),
        };
        if let Some(parent) = self.path.parent() {
            gonv_fs::create_dir_all(parent)?;
        }
        atomic_write(&self.path, &serde_json::to_vec(&cached)?, AtomicWriteOptions::new())?;
        Ok(())
    }
}

/// Load the release index.
///
/// Online, the index is downloaded and the cache refreshed; if the download
/// fails the cached copy is used, with a warning once it is older than
/// [`INDEX_MAX_AGE`]. Offline, only the cache is consulted.
pub async fn load_release_index<C: HttpClient>(
    fetcher: &Fetcher<C>,
    cache: &IndexCache,
    offline: bool,
    options: &FetchOptions,
) -> Result<ReleaseIndex> {
    if offline {
        return cache.read().map(CachedIndex::into_index).ok_or_else(|| {
            InstallError::IndexUnavailable(format!(
                "offline mode and no cached index at {}",
                cache.path().display()
            ))
        });
    }

    let err = match fetcher.fetch_bytes(RELEASE_INDEX_URL, options).await {
        Ok(body) => {
            let index = ReleaseIndex::from_json(&body)?;
            if let Err(e) = cache.write(index.releases(), SystemTime::now()) {
                warn!(error = %e, "failed to cache release index");
            }
            return Ok(index);
        }
        Err(e) => e,
    };

    let Some(cached) = cache.read() else {
        return Err(err.into());
    };
    let age = cached.age(SystemTime::now());
    if cached.is_stale(SystemTime::now()) {
        warn!(error = %err, age_hours = age.as_secs() / 3600, "release index download failed; using stale cache");
    } else {
        debug!(error = %err, "release index download failed; using cache");
    }
    Ok(cached.into_index())
}
