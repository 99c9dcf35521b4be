/// One place an artifact can be downloaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadSource {
    pub url:      String,
    /// Overrides [`crate::FetchOptions::checksum`] for this source.
    pub checksum: Option<[u8; 32]>,
}

impl DownloadSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url:      url.into(),
            checksum: None,
        }
    }

    pub fn checksum(mut self, checksum: [u8; 32]) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// The official URL, then each mirror in order, all sharing one digest.
    ///
    /// Mirrors are base URLs; the official file name is appended to each.
    pub fn with_mirrors<S: AsRef<str>>(official: &str, mirrors: &[S], checksum: Option<[u8; 32]>) -> Vec<Self> {
        std::iter::once(official.to_string())
            .chain(mirrors.iter().map(|m| mirror_url(m.as_ref(), official)))
            .map(|url| Self { url, checksum })
            .collect()
    }
}

/// Where `base` serves the file named by the last segment of `official`.
pub fn mirror_url(base: &str, official: &str) -> String {
    let file_name = official.rsplit('/').next().unwrap_or(official);
    format!("{}/{file_name}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_mirrors() {
        let sources = DownloadSource::with_mirrors(
            "https://dl.google.com/go/go1.21.0.linux-amd64.tar.gz",
            &["https://mirror.example/go/"],
            None,
        );
        let urls: Vec<_> = sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, [
            "https://dl.google.com/go/go1.21.0.linux-amd64.tar.gz",
            "https://mirror.example/go/go1.21.0.linux-amd64.tar.gz",
        ]);

        let official_only = DownloadSource::with_mirrors::<&str>("https://go.dev/dl/x.zip", &[], None);
        assert_eq!(official_only, vec![DownloadSource::new("https://go.dev/dl/x.zip")]);
    }
}
