use std::path::Path;

use gonv_store::{
    Config, GO_MOD_FILE, LEGACY_LOCAL_FILE, LOCAL_FILE, VersionFileKind, VersionStore, read_version_file,
};
use gonv_version::{LATEST, SYSTEM, VersionSpec, max_version, select_latest};
use tracing::debug;

use crate::{ResolveError, Resolution, ResolvedVersions, Result, VersionSource};

/// Precedence chain over the environment, version files and the global file.
pub struct VersionResolver<'a> {
    store:  &'a VersionStore,
    config: &'a Config,
}

impl<'a> VersionResolver<'a> {
    pub fn new(store: &'a VersionStore, config: &'a Config) -> Self { Self { store, config } }

    /// Determine the active spec for an invocation started in `start_dir`.
    ///
    /// First match wins: `GONV_VERSION`, the nearest `.go-version` /
    /// `.tool-versions`, the nearest `go.mod` (when enabled), the global
    /// file, then `system`. A source that exists but names nothing falls
    /// through to the next level.
    pub fn resolve(&self, start_dir: &Path) -> Result<Resolution> {
        if let Some(spec) = &self.config.version_override {
            debug!(%spec, "version from environment");
            return Ok(Resolution {
                spec:   spec.clone(),
                source: VersionSource::Environment,
            });
        }

        if let Some(resolution) = self.find_local(start_dir)? {
            return Ok(resolution);
        }

        if self.config.gomod
            && let Some(resolution) = self.find_manifest(start_dir)?
        {
            return Ok(resolution);
        }

        if let Some((path, spec)) = self.store.read_global()? {
            debug!(%spec, path = %path.display(), "version from global file");
            return Ok(Resolution {
                spec,
                source: VersionSource::GlobalFile(path),
            });
        }

        debug!("no version set, using system");
        Ok(Resolution {
            spec:   VersionSpec::single(SYSTEM).map_err(gonv_store::StoreError::from)?,
            source: VersionSource::Default,
        })
    }

    fn find_local(&self, start_dir: &Path) -> Result<Option<Resolution>> {
        for dir in start_dir.ancestors() {
            let modern = dir.join(LOCAL_FILE);
            let legacy = dir.join(LEGACY_LOCAL_FILE);
            let (path, kind) = if modern.is_file() {
                (modern, VersionFileKind::Plain)
            } else if legacy.is_file() {
                (legacy, VersionFileKind::ToolVersions)
            } else {
                continue;
            };

            let spec = read_version_file(&path, kind)?;
            debug!(path = %path.display(), found = spec.is_some(), "local version file");
            return Ok(spec.map(|spec| Resolution {
                spec,
                source: VersionSource::LocalFile(path),
            }));
        }
        Ok(None)
    }

    fn find_manifest(&self, start_dir: &Path) -> Result<Option<Resolution>> {
        let Some(path) = start_dir.ancestors().map(|d| d.join(GO_MOD_FILE)).find(|p| p.is_file()) else {
            return Ok(None);
        };
        let spec = read_version_file(&path, VersionFileKind::GoMod)?;
        debug!(path = %path.display(), found = spec.is_some(), "go.mod");
        Ok(spec.map(|spec| Resolution {
            spec,
            source: VersionSource::Manifest(path),
        }))
    }

    /// Replace alias tokens with their targets. A `:`-joined target expands
    /// to several entries; unknown tokens pass through.
    pub fn expand_aliases(&self, spec: &VersionSpec) -> Result<VersionSpec> {
        let aliases = self.store.aliases()?;
        let entries = spec.iter().flat_map(|token| match aliases.get(token) {
            Some(target) => target.split(':').map(str::to_string).collect::<Vec<_>>(),
            None => vec![token.clone()],
        });
        Ok(VersionSpec::new(entries).map_err(gonv_store::StoreError::from)?)
    }

    /// Map one user-supplied token to an installed name.
    ///
    /// Aliases are consulted first (a multi-entry alias yields its primary
    /// entry), `system` passes through, `latest` is the newest installed
    /// distribution, anything else goes through partial matching.
    pub fn resolve_version_spec(&self, token: &str, source: &VersionSource) -> Result<String> {
        let expanded = self.expand_aliases(&VersionSpec::single(token).map_err(gonv_store::StoreError::from)?)?;
        let installed = self.store.installed()?;
        resolve_token(expanded.primary(), &installed, source)
    }

    /// Resolve and require every entry to be installed.
    pub fn resolve_installed(&self, start_dir: &Path) -> Result<ResolvedVersions> {
        let resolution = self.resolve(start_dir)?;
        let expanded = self.expand_aliases(&resolution.spec)?;
        let installed = self.store.installed()?;

        let mut names: Vec<String> = Vec::with_capacity(expanded.len());
        for token in &expanded {
            let name = resolve_token(token, &installed, &resolution.source)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(ResolvedVersions { resolution, names })
    }
}

/// Map one alias-expanded token onto `installed`. Callers expand aliases
/// exactly once, so an alias target naming another alias is not followed.
pub fn resolve_token(token: &str, installed: &[String], source: &VersionSource) -> Result<String> {
    let not_installed = || ResolveError::VersionNotInstalled {
        requested: token.to_string(),
        set_by:    source.clone(),
    };

    let resolved = match token {
        SYSTEM => Some(SYSTEM.to_string()),
        LATEST => max_version(installed.iter().map(String::as_str)).map(str::to_string),
        _ => select_latest(token, installed),
    };
    let name = resolved.ok_or_else(not_installed)?;
    debug!(token, name = %name, "resolved version");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _dir:    TempDir,
        root:    PathBuf,
        project: PathBuf,
        config:  Config,
    }

    impl Fixture {
        fn new(installed: &[&str]) -> Self {
            let dir = tempdir().unwrap();
            let root = dir.path().join("root");
            let project = dir.path().join("work").join("project");
            std::fs::create_dir_all(&project).unwrap();
            for name in installed {
                std::fs::create_dir_all(root.join("versions").join(name).join("bin")).unwrap();
            }
            let mut config = Config::with_root(&root);
            config.gopath = false;
            Self { _dir: dir, root, project, config }
        }

        fn store(&self) -> VersionStore { VersionStore::from_config(&self.config) }
    }

    #[test]
    fn test_default_is_system() {
        let fx = Fixture::new(&[]);
        let store = fx.store();
        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "system");
        assert_eq!(r.source, VersionSource::Default);
    }

    #[test]
    fn test_env_beats_everything() {
        let mut fx = Fixture::new(&["1.21.0"]);
        std::fs::write(fx.project.join(".go-version"), "1.20.0\n").unwrap();
        fx.config.version_override = VersionSpec::parse_joined("1.21.0");
        let store = fx.store();

        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.21.0");
        assert_eq!(r.source, VersionSource::Environment);
    }

    #[test]
    fn test_modern_file_beats_legacy_in_same_dir() {
        let fx = Fixture::new(&[]);
        std::fs::write(fx.project.join(".go-version"), "1.22.0\n").unwrap();
        std::fs::write(fx.project.join(".tool-versions"), "golang 1.19.0\n").unwrap();
        let store = fx.store();

        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.22.0");
        assert_eq!(r.source, VersionSource::LocalFile(fx.project.join(".go-version")));
    }

    #[test]
    fn test_nearest_directory_wins() {
        let fx = Fixture::new(&[]);
        let parent = fx.project.parent().unwrap().to_path_buf();
        std::fs::write(parent.join(".go-version"), "1.20.0\n").unwrap();
        std::fs::write(fx.project.join(".tool-versions"), "golang 1.21.5\n").unwrap();
        let store = fx.store();

        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.21.5");
        assert_eq!(r.source, VersionSource::LocalFile(fx.project.join(".tool-versions")));

        let nested = fx.project.join("cmd").join("tool");
        std::fs::create_dir_all(&nested).unwrap();
        let r = VersionResolver::new(&store, &fx.config).resolve(&nested).unwrap();
        assert_eq!(r.spec.primary(), "1.21.5");
    }

    #[test]
    fn test_empty_local_file_falls_through() {
        let fx = Fixture::new(&[]);
        std::fs::write(fx.project.join(".go-version"), "\n   \n").unwrap();
        std::fs::create_dir_all(&fx.root).unwrap();
        std::fs::write(fx.root.join("version"), "1.20.0\n").unwrap();
        let store = fx.store();

        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.20.0");
        assert_eq!(r.source, VersionSource::GlobalFile(fx.root.join("version")));
    }

    #[test]
    fn test_manifest_between_local_and_global() {
        let mut fx = Fixture::new(&[]);
        std::fs::write(fx.project.join("go.mod"), "module m\n\ngo 1.21\ntoolchain go1.21.4\n").unwrap();
        std::fs::create_dir_all(&fx.root).unwrap();
        std::fs::write(fx.root.join("version"), "1.20.0\n").unwrap();

        let store = fx.store();
        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.21.4");
        assert_eq!(r.source, VersionSource::Manifest(fx.project.join("go.mod")));

        fx.config.gomod = false;
        let r = VersionResolver::new(&store, &fx.config).resolve(&fx.project).unwrap();
        assert_eq!(r.spec.primary(), "1.20.0");
    }

    #[test]
    fn test_local_file_scenario() {
        let fx = Fixture::new(&["1.21.0"]);
        std::fs::write(fx.project.join(".go-version"), "1.21.0\n").unwrap();
        std::fs::create_dir_all(&fx.root).unwrap();
        std::fs::write(fx.root.join("version"), "1.20.0\n").unwrap();
        let store = fx.store();

        let resolved = VersionResolver::new(&store, &fx.config).resolve_installed(&fx.project).unwrap();
        assert_eq!(resolved.names, vec!["1.21.0"]);
        assert_eq!(
            resolved.resolution.source,
            VersionSource::LocalFile(fx.project.join(".go-version"))
        );
    }

    #[test]
    fn test_partial_resolves_to_latest_patch() {
        let fx = Fixture::new(&["1.9.2", "1.9.9", "1.9.10", "1.10.0"]);
        let store = fx.store();
        let resolver = VersionResolver::new(&store, &fx.config);
        assert_eq!(resolver.resolve_version_spec("1.9", &VersionSource::Default).unwrap(), "1.9.10");
        assert_eq!(resolver.resolve_version_spec("latest", &VersionSource::Default).unwrap(), "1.10.0");
        assert_eq!(resolver.resolve_version_spec("system", &VersionSource::Default).unwrap(), "system");
    }

    #[test]
    fn test_not_installed_names_source() {
        let mut fx = Fixture::new(&["1.20.0"]);
        fx.config.version_override = VersionSpec::parse_joined("1.22");
        let store = fx.store();

        let err = VersionResolver::new(&store, &fx.config).resolve_installed(&fx.project).unwrap_err();
        assert_eq!(
            err.to_string(),
            "version '1.22' is not installed (set by GONV_VERSION environment variable)"
        );
    }

    #[test]
    fn test_aliases_expand_before_lookup() {
        let mut fx = Fixture::new(&["1.20.14", "1.21.5"]);
        let store = fx.store();
        store.set_alias("stable", "1.21").unwrap();
        store.set_alias("both", "1.21.5:1.20").unwrap();

        fx.config.version_override = VersionSpec::parse_joined("both");
        let resolver = VersionResolver::new(&store, &fx.config);
        assert_eq!(resolver.resolve_version_spec("stable", &VersionSource::Default).unwrap(), "1.21.5");
        let resolved = resolver.resolve_installed(&fx.project).unwrap();
        assert_eq!(resolved.names, vec!["1.21.5", "1.20.14"]);
    }

    #[test]
    fn test_latest_with_nothing_installed() {
        let fx = Fixture::new(&[]);
        let store = fx.store();
        let resolver = VersionResolver::new(&store, &fx.config);
        assert!(matches!(
            resolver.resolve_version_spec("latest", &VersionSource::Default),
            Err(ResolveError::VersionNotInstalled { .. })
        ));
    }
}
