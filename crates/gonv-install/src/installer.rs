use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use gonv_archive::{ExtractOptions, extract_file};
use gonv_fetch::{Artifact, DownloadSource, FetchOptions, Fetcher, HttpClient, mirror_url};
use gonv_fs::{Workspace, remove_dir_all_if_exists, remove_file_if_exists, unique_sibling};
use gonv_platform::GoTarget;
use gonv_store::VersionStore;
use gonv_verify::{Sha256Hasher, VerifiedReader, parse_sha256_hex};
use gonv_version::validate_version_name;
use tracing::{debug, info, warn};

use crate::{Definition, InstallContext, InstallError, InstallHook, Release, Result};

/// Everything needed to download and publish one distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Directory name under `versions/`.
    pub name:             String,
    pub url:              String,
    pub sha256:           [u8; 32],
    /// Base URL tried before `url`.
    pub preferred_mirror: Option<String>,
    /// Base URLs tried after `url`.
    pub mirrors:          Vec<String>,
}

impl InstallTarget {
    pub fn from_release<S: AsRef<str>>(release: &Release, target: &GoTarget, mirrors: &[S]) -> Result<Self> {
        let file = release.archive_for(target).ok_or_else(|| InstallError::NoArchive {
            version: release.name().to_string(),
            target:  target.clone(),
        })?;
        Ok(Self {
            name:             release.name().to_string(),
            url:              file.url(),
            sha256:           parse_sha256_hex(&file.sha256)?,
            preferred_mirror: None,
            mirrors:          mirrors.iter().map(|m| m.as_ref().to_string()).collect(),
        })
    }

    /// Definition mirrors come first, then `extra_mirrors`.
    pub fn from_definition<S: AsRef<str>>(definition: &Definition, extra_mirrors: &[S]) -> Result<Self> {
        let mut mirrors = definition.mirrors.clone();
        mirrors.extend(extra_mirrors.iter().map(|m| m.as_ref().to_string()));
        Ok(Self {
            name: definition.version.clone(),
            url: definition.url.clone(),
            sha256: parse_sha256_hex(&definition.sha256)?,
            preferred_mirror: None,
            mirrors,
        })
    }

    #[must_use]
    pub fn preferred_mirror(mut self, base: Option<String>) -> Self {
        self.preferred_mirror = base;
        self
    }

    /// Last path segment of the download URL.
    pub fn file_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(&self.name)
    }

    pub fn sha256_hex(&self) -> String { hex::encode(self.sha256) }

    /// The preferred mirror, then `url`, then the remaining mirrors.
    pub fn sources(&self) -> Vec<DownloadSource> {
        let preferred = self
            .preferred_mirror
            .iter()
            .map(|base| DownloadSource::new(mirror_url(base, &self.url)).checksum(self.sha256));
        preferred
            .chain(DownloadSource::with_mirrors(&self.url, &self.mirrors, Some(self.sha256)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    /// Replace an existing installation.
    pub force:         bool,
    /// Succeed without doing anything when already installed.
    pub skip_existing: bool,
    /// Keep the downloaded archive in the cache.
    pub keep:          bool,
    /// Run post-install hooks.
    pub rehash:        bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            force:         false,
            skip_existing: false,
            keep:          false,
            rehash:        true,
        }
    }
}

impl InstallOptions {
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn rehash(mut self, rehash: bool) -> Self {
        self.rehash = rehash;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { name: String, path: PathBuf },
    Skipped { name: String },
}

pub struct Installer<'a, C: HttpClient> {
    store:           &'a VersionStore,
    fetcher:         &'a Fetcher<C>,
    fetch_options:   FetchOptions,
    extract_options: ExtractOptions,
    hooks:           Vec<Box<dyn InstallHook>>,
}

impl<'a, C: HttpClient> Installer<'a, C> {
    pub fn new(store: &'a VersionStore, fetcher: &'a Fetcher<C>) -> Self {
        Self {
            store,
            fetcher,
            fetch_options: FetchOptions::default(),
            extract_options: ExtractOptions::default().strip_components(1),
            hooks: Vec::new(),
        }
    }

    /// Retry policy, headers and progress reporting for downloads. The
    /// checksum and `keep` are set per install.
    #[must_use]
    pub fn fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    #[must_use]
    pub fn extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    #[must_use]
    pub fn hook(mut self, hook: impl InstallHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub async fn install(&self, target: &InstallTarget, options: InstallOptions) -> Result<InstallOutcome> {
        validate_version_name(&target.name)?;
        let dest = self.store.version_dir(&target.name);

        if dest.exists() {
            if options.skip_existing {
                info!(version = %target.name, "already installed, skipping");
                return Ok(InstallOutcome::Skipped { name: target.name.clone() });
            }
            if !options.force {
                return Err(InstallError::AlreadyInstalled { name: target.name.clone() });
            }
        }

        self.store.ensure_layout()?;
        let archive = self.download(target, options.keep).await?;

        let workspace = Workspace::sibling(&dest)?;
        let report = extract_file(archive.path(), workspace.path(), &self.extract_options)?;
        debug!(
            version = %target.name,
            format = %report.format,
            entries = report.entry_count,
            "extracted archive"
        );
        if !workspace.path().join("bin").is_dir() {
            return Err(InstallError::InvalidLayout { name: target.name.clone() });
        }

        let path = publish(workspace, &dest, &target.name, options.force)?;
        if archive.is_kept() {
            debug!(archive = %archive.path().display(), "archive kept");
        }
        drop(archive);
        info!(version = %target.name, path = %path.display(), "installed");

        if options.rehash {
            let ctx = InstallContext {
                name:  &target.name,
                path:  &path,
                store: self.store,
            };
            for hook in &self.hooks {
                if let Err(e) = hook.post_install(&ctx) {
                    warn!(hook = hook.name(), error = %e, "post-install hook failed");
                }
            }
        }

        Ok(InstallOutcome::Installed { name: target.name.clone(), path })
    }

    /// Remove an installed distribution, then run post-uninstall hooks.
    pub fn uninstall(&self, name: &str) -> Result<PathBuf> {
        let hooks: Vec<&dyn InstallHook> = self.hooks.iter().map(|h| h.as_ref()).collect();
        uninstall(self.store, name, &hooks)
    }

    /// A previously kept archive is reused when its digest still matches,
    /// and stays in the cache. Archives that are not kept are downloaded
    /// under a name private to this install.
    async fn download(&self, target: &InstallTarget, keep: bool) -> Result<Artifact> {
        let cached = self.store.cache_dir().join(target.file_name());
        if cached.is_file() {
            match verify_file(&cached, &target.sha256_hex()) {
                Ok(()) => {
                    debug!(archive = %cached.display(), "using cached archive");
                    return Ok(Artifact::from_verified(cached, target.sha256, true));
                }
                Err(e) => {
                    debug!(archive = %cached.display(), error = %e, "cached archive rejected");
                    remove_file_if_exists(&cached)?;
                }
            }
        }

        let path = if keep { cached } else { unique_sibling(&cached, "download") };
        let options = self.fetch_options.clone().checksum(Some(target.sha256)).keep(keep);
        Ok(self.fetcher.fetch_sources(&target.sources(), &path, &options).await?)
    }
}

/// Remove an installed distribution, then run `hooks`. Needs no network
/// client, unlike [`Installer`].
pub fn uninstall(store: &VersionStore, name: &str, hooks: &[&dyn InstallHook]) -> Result<PathBuf> {
    validate_version_name(name)?;
    if !store.is_installed(name) {
        return Err(InstallError::NotInstalled(name.to_string()));
    }
    let path = store.version_dir(name);
    store.remove_version(name)?;
    info!(version = name, "uninstalled");

    let ctx = InstallContext { name, path: &path, store };
    for hook in hooks {
        if let Err(e) = hook.post_uninstall(&ctx) {
            warn!(hook = hook.name(), error = %e, "post-uninstall hook failed");
        }
    }
    Ok(path)
}

fn verify_file(path: &Path, expected_hex: &str) -> Result<()> {
    let io_err = |source| InstallError::Io {
        action: "read cached archive",
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let mut reader = VerifiedReader::new(file, Sha256Hasher::new());
    io::copy(&mut reader, &mut io::sink()).map_err(io_err)?;
    Ok(reader.finish(expected_hex)?)
}

/// Commit the workspace, moving an existing tree aside first when forcing.
/// The old tree is restored if the commit fails. Without `force` a tree that
/// appeared since the existence check is a conflict.
fn publish(workspace: Workspace, dest: &Path, name: &str, force: bool) -> Result<PathBuf> {
    let aside = if force && dest.exists() {
        let aside = dest.with_file_name(format!(".{name}.replaced-{}", std::process::id()));
        remove_dir_all_if_exists(&aside)?;
        gonv_fs::rename(dest, &aside)?;
        Some(aside)
    } else {
        None
    };

    match workspace.commit() {
        Ok(path) => {
            if let Some(aside) = aside
                && let Err(e) = remove_dir_all_if_exists(&aside)
            {
                warn!(path = %aside.display(), error = %e, "failed to remove replaced installation");
            }
            Ok(path)
        }
        Err(e) => {
            if let Some(aside) = aside
                && let Err(restore) = gonv_fs::rename(&aside, dest)
            {
                warn!(path = %aside.display(), error = %restore, "failed to restore previous installation");
            }
            if e.is_conflict() {
                Err(InstallError::Conflict {
                    name:   name.to_string(),
                    source: e,
                })
            } else {
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "e330e5d977bf4f3bdc157bc46cf41afa5b13d66c914e12fd6b694ccda65fcf92";

    fn release() -> Release {
        serde_json::from_str(&format!(
            r#"{{"version": "go1.21.0", "stable": true, "files": [
                {{"filename": "go1.21.0.linux-amd64.tar.gz", "os": "linux", "arch": "amd64",
                  "version": "go1.21.0", "sha256": "{SHA}", "size": 1, "kind": "archive"}}]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_target_from_release() {
        let target = InstallTarget::from_release(&release(), &GoTarget::new("linux", "amd64"), &["https://mirror.example/go"])
            .unwrap();
        assert_eq!(target.name, "1.21.0");
        assert_eq!(target.file_name(), "go1.21.0.linux-amd64.tar.gz");
        assert_eq!(target.sha256_hex(), SHA);

        let urls: Vec<_> = target.sources().into_iter().map(|s| s.url).collect();
        assert_eq!(
            urls,
            [
                "https://go.dev/dl/go1.21.0.linux-amd64.tar.gz",
                "https://mirror.example/go/go1.21.0.linux-amd64.tar.gz",
            ]
        );

        let preferred = target.preferred_mirror(Some("https://env.example/go/".into()));
        let first = preferred.sources().remove(0);
        assert_eq!(first.url, "https://env.example/go/go1.21.0.linux-amd64.tar.gz");
        assert_eq!(first.checksum, Some(preferred.sha256));
        assert_eq!(preferred.sources().len(), 3);
    }

    #[test]
    fn test_target_without_archive() {
        let err = InstallTarget::from_release(&release(), &GoTarget::new("darwin", "arm64"), &[] as &[&str]).unwrap_err();
        assert!(matches!(err, InstallError::NoArchive { .. }));
        assert!(err.to_string().contains("darwin-arm64"));
    }

    #[test]
    fn test_target_from_definition() {
        let definition = Definition {
            version: "1.21.0-custom".into(),
            url:     "https://example.com/dl/go-custom.tar.gz?token=1".into(),
            sha256:  SHA.into(),
            mirrors: vec!["https://a.example".into()],
        };
        let target = InstallTarget::from_definition(&definition, &["https://b.example"]).unwrap();
        assert_eq!(target.file_name(), "go-custom.tar.gz");
        assert_eq!(target.mirrors, ["https://a.example", "https://b.example"]);
    }
}
