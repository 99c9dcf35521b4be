use std::path::PathBuf;

use anyhow::{Context as _, Result};
use gonv_platform::env::PathModifier;
use gonv_resolve::{ResolveError, VersionResolver, VersionSource};
use gonv_shim::{SystemResolver, TargetResolver};
use gonv_store::{Config, VersionStore};

/// Per-process state handed to every command.
pub struct Context {
    pub config: Config,
    pub store:  VersionStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load().context("failed to load configuration")?;
        let store = VersionStore::from_config(&config);
        Ok(Self { config, store })
    }

    pub fn resolver(&self) -> VersionResolver<'_> { VersionResolver::new(&self.store, &self.config) }

    /// Where version-file lookup starts.
    pub fn search_dir(&self) -> Result<PathBuf> {
        self.config.search_dir().context("cannot determine the working directory")
    }

    /// The gonv executable shims re-invoke.
    pub fn program(&self) -> Result<PathBuf> {
        std::env::current_exe().context("cannot locate the gonv executable")
    }

    /// Resolve a version given on the command line to an installed name.
    pub fn resolve_argument(&self, token: &str) -> Result<String> {
        match self.resolver().resolve_version_spec(token, &VersionSource::Default) {
            Ok(name) => Ok(name),
            Err(ResolveError::VersionNotInstalled { requested, .. }) => {
                anyhow::bail!("version '{requested}' is not installed")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `command` on `PATH` with the shims directory removed.
    pub fn system_command(&self, command: &str) -> Result<Option<PathBuf>> {
        let path = PathModifier::from_value(self.config.path.as_deref().unwrap_or_default())
            .remove(&self.store.shims_dir())
            .build()?;
        Ok(SystemResolver::new(path, self.search_dir()?).resolve(command))
    }
}
