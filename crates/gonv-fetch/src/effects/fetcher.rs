use std::io;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use gonv_verify::{Hasher, Sha256Hasher};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::retry_delay;
use crate::data::{DownloadSource, FetchOptions, FetchPhase, Progress};
use crate::effects::artifact::Artifact;
use crate::effects::http::HttpClient;
use crate::{FetchError, Result};

pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    pub fn client(&self) -> &C { &self.client }

    /// Download `destination` from the first source that delivers it.
    ///
    /// Sources are tried strictly in order. Network failures are retried per
    /// source with exponential backoff, then the next source is tried. A
    /// checksum mismatch ends the fetch immediately.
    pub async fn fetch_sources(
        &self,
        sources: &[DownloadSource],
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<Artifact> {
        if sources.is_empty() {
            return Err(FetchError::NoSources);
        }

        // Private to this fetch, so concurrent fetches of the same file
        // never share a partial download.
        let part = part_path(destination);
        let mut attempts = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            let mut retry_count = 0;
            loop {
                debug!(url = %source.url, retry_count, "trying source");
                match self.fetch_once(source, destination, &part, options, index, retry_count).await {
                    Ok(artifact) => return Ok(artifact),
                    Err(e) if e.is_retryable() => {
                        discard(&part);
                        if retry_count < options.max_retries {
                            let delay = retry_delay(retry_count, options.retry_backoff);
                            debug!(error = %e, ?delay, "retrying");
                            tokio::time::sleep(delay).await;
                            retry_count += 1;
                            continue;
                        }
                        warn!(url = %source.url, error = %e, "source failed");
                        attempts.push(e.to_string());
                        break;
                    }
                    Err(e) => {
                        discard(&part);
                        return Err(e);
                    }
                }
            }
        }

        Err(FetchError::AllSourcesFailed { attempts })
    }

    async fn fetch_once(
        &self,
        source: &DownloadSource,
        destination: &Path,
        part: &Path,
        options: &FetchOptions,
        source_index: usize,
        retry_count: u32,
    ) -> Result<Artifact> {
        let url = source.url.as_str();
        let mut progress = Progress {
            retry_count,
            source_index,
            ..Default::default()
        };
        report(options, &progress);

        // Servers that refuse HEAD still serve GET; only the total is lost.
        progress.total_bytes = self.client.head(url).await.ok().flatten();
        let mut stream = self
            .client
            .stream(url, &options.headers)
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let mut file = tokio::fs::File::create(part).await.map_err(io_error("create", part))?;
        let mut hasher = Sha256Hasher::new();

        progress.phase = FetchPhase::Downloading;
        report(options, &progress);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::network(url, e))?;
            hasher.update(&chunk);
            file.write_all(&chunk).await.map_err(io_error("write", part))?;
            progress.bytes_downloaded += chunk.len() as u64;
            report(options, &progress);
        }
        file.flush().await.map_err(io_error("write", part))?;
        drop(file);

        progress.phase = FetchPhase::Verifying;
        report(options, &progress);
        let digest = hasher.finalize_array();
        if let Some(expected) = source.checksum.or(options.checksum)
            && digest != expected
        {
            discard(part);
            return Err(FetchError::ChecksumMismatch {
                url:      url.to_string(),
                expected: hex::encode(expected),
                actual:   hex::encode(digest),
            });
        }

        progress.phase = FetchPhase::Committing;
        report(options, &progress);
        tokio::fs::rename(part, destination)
            .await
            .map_err(io_error("move download to", destination))?;

        progress.phase = FetchPhase::Completed;
        report(options, &progress);
        debug!(url, bytes = progress.bytes_downloaded, "download complete");
        Ok(Artifact::from_verified(destination, digest, options.keep))
    }

    /// A whole response body, for small documents such as the release index.
    pub async fn fetch_bytes(&self, url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
        let mut retry_count = 0;
        loop {
            match self.read_body(url, options).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && retry_count < options.max_retries => {
                    tokio::time::sleep(retry_delay(retry_count, options.retry_backoff)).await;
                    retry_count += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn read_body(&self, url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
        let mut stream = self
            .client
            .stream(url, &options.headers)
            .await
            .map_err(|e| FetchError::network(url, e))?;
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.map_err(|e| FetchError::network(url, e))?);
        }
        Ok(body)
    }
}

fn report(options: &FetchOptions, progress: &Progress) {
    if let Some(callback) = &options.on_progress {
        callback(progress);
    }
}

fn part_path(destination: &Path) -> PathBuf { gonv_fs::unique_sibling(destination, "part") }

fn discard(path: &Path) {
    if let Err(e) = gonv_fs::remove_file_if_exists(path) {
        warn!(path = %path.display(), error = %e, "failed to remove download");
    }
}

fn io_error<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> FetchError + 'a {
    move |source| FetchError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
