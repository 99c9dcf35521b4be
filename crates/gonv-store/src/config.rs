//! Settings from `<root>/config.toml` and the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gonv_platform::dir;
use gonv_version::VersionSpec;
use serde::Deserialize;

use crate::{Result, StoreError};

pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_INSTALL_RETRIES: u32 = 3;
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Everything a command needs to know about its environment.
///
/// Built once per process and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub root:             PathBuf,
    /// `GONV_VERSION`
    pub version_override: Option<VersionSpec>,
    pub debug:            bool,
    /// `GONV_DIR`
    pub search_dir:       Option<PathBuf>,
    pub hook_path:        Vec<PathBuf>,
    pub gomod:            bool,
    pub gopath:           bool,
    pub goroot:           bool,
    pub gopath_prefix:    PathBuf,
    pub auto_rehash:      bool,
    /// `GONV_MIRROR_URL`, tried before the official download site.
    pub preferred_mirror: Option<String>,
    /// Mirror base URLs from `config.toml`, tried after the official site.
    pub mirrors:          Vec<String>,
    pub install_retries:  u32,
    pub install_timeout:  Duration,
    pub offline:          bool,
    /// The `PATH` the process was started with.
    pub path:             Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    mirrors:     Vec<String>,
    gomod:       Option<bool>,
    gopath:      Option<bool>,
    auto_rehash: Option<bool>,
    install:     InstallSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InstallSection {
    retries:      Option<u32>,
    timeout_secs: Option<u64>,
}

/// Boolean environment convention: set and not `""`, `0`, `false` or `no`.
pub fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no")
}

impl Config {
    /// Defaults for `root`, ignoring the environment and `config.toml`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            gopath_prefix: dir::default_gopath_prefix().unwrap_or_else(|| root.join("go")),
            root,
            version_override: None,
            debug: false,
            search_dir: None,
            hook_path: Vec::new(),
            gomod: true,
            gopath: true,
            goroot: true,
            auto_rehash: true,
            preferred_mirror: None,
            mirrors: Vec::new(),
            install_retries: DEFAULT_INSTALL_RETRIES,
            install_timeout: DEFAULT_INSTALL_TIMEOUT,
            offline: false,
            path: None,
        }
    }

    pub fn load() -> Result<Self> { Self::load_with(|key| std::env::var(key).ok()) }

    /// Build from an arbitrary variable lookup. Precedence: environment,
    /// then `config.toml`, then built-in defaults.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let flag = |key: &str| var(key).is_some_and(|v| is_truthy(&v));

        let root = match var("GONV_ROOT") {
            Some(root) => PathBuf::from(root),
            None => dir::default_root().ok_or(StoreError::NoHome)?,
        };
        let mut config = Self::with_root(root);
        let file = read_file_config(&config.root.join(CONFIG_FILE))?;

        config.version_override = var("GONV_VERSION").and_then(|v| VersionSpec::parse_joined(&v));
        config.debug = flag("GONV_DEBUG");
        config.search_dir = var("GONV_DIR").map(PathBuf::from);
        config.hook_path = var("GONV_HOOK_PATH")
            .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();

        config.gomod = !flag("GONV_DISABLE_GOMOD") && file.gomod.unwrap_or(true);
        config.gopath = !flag("GONV_DISABLE_GOPATH") && file.gopath.unwrap_or(true);
        config.goroot = !flag("GONV_DISABLE_GOROOT");
        if let Some(prefix) = var("GONV_GOPATH_PREFIX") {
            config.gopath_prefix = PathBuf::from(prefix);
        }
        config.auto_rehash = !flag("GONV_NO_AUTO_REHASH") && file.auto_rehash.unwrap_or(true);

        config.preferred_mirror = var("GONV_MIRROR_URL")
            .or_else(|| var("GO_BUILD_MIRROR_URL"))
            .map(|m| m.trim_end_matches('/').to_string());
        config.mirrors = file.mirrors.iter().map(|m| m.trim_end_matches('/').to_string()).collect();

        config.install_retries = match var("GONV_INSTALL_RETRIES") {
            Some(v) => parse_setting("GONV_INSTALL_RETRIES", &v)?,
            None => file.install.retries.unwrap_or(DEFAULT_INSTALL_RETRIES),
        };
        let timeout_secs = match var("GONV_INSTALL_TIMEOUT") {
            Some(v) => Some(parse_setting::<u64>("GONV_INSTALL_TIMEOUT", &v)?),
            None => file.install.timeout_secs,
        };
        if let Some(secs) = timeout_secs {
            config.install_timeout = Duration::from_secs(secs);
        }

        config.offline = flag("GONV_OFFLINE");
        config.path = lookup("PATH");
        Ok(config)
    }

    /// Start directory for the version-file search: `GONV_DIR` or the
    /// working directory.
    pub fn search_dir(&self) -> std::io::Result<PathBuf> {
        match &self.search_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}

fn parse_setting<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| StoreError::InvalidSetting {
        name,
        value: value.to_string(),
    })
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let Some(content) = gonv_fs::read_optional(path)? else {
        return Ok(FileConfig::default());
    };
    toml::from_str(&content).map_err(|e| StoreError::Config {
        path:    path.to_path_buf(),
        message: e.message().to_string(),
    })
}
