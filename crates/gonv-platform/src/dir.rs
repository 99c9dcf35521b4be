use std::path::PathBuf;

pub fn user_home() -> Option<PathBuf> { home::home_dir() }

/// `~/.gonv`
pub fn default_root() -> Option<PathBuf> { user_home().map(|h| h.join(".gonv")) }

/// `~/go`
pub fn default_gopath_prefix() -> Option<PathBuf> { user_home().map(|h| h.join("go")) }
