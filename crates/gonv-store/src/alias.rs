//! User-defined version aliases, stored as `name=version` lines.

use std::collections::BTreeMap;

use gonv_version::{LATEST, SYSTEM, validate_version_name};

use crate::{Result, StoreError, VersionStore};

pub const MAX_ALIAS_LEN: usize = 64;

const ALIAS_HEADER: &str = "# gonv aliases\n# Format: alias_name=target_version\n";
const INVALID_ALIAS_CHARS: &[char] = &['=', '/', '\\', ':', ';', '"', '\'', '`', ' ', '\t', '\n', '\r'];

pub fn validate_alias_name(name: &str) -> Result<()> {
    let fail = |reason| {
        Err(StoreError::InvalidAliasName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return fail("empty");
    }
    if name == SYSTEM || name == LATEST {
        return Err(StoreError::ReservedAlias(name.to_string()));
    }
    if name.contains(INVALID_ALIAS_CHARS) {
        return fail("contains an invalid character");
    }
    if name.contains("..") || name.starts_with('.') {
        return fail("path traversal");
    }
    if name.len() > MAX_ALIAS_LEN {
        return fail("longer than 64 bytes");
    }
    Ok(())
}

fn parse_aliases(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .map(|(name, target)| (name.trim(), target.trim()))
        .filter(|(name, target)| !name.is_empty() && !target.is_empty())
        .map(|(name, target)| (name.to_string(), target.to_string()))
        .collect()
}

fn render_aliases(aliases: &BTreeMap<String, String>) -> String {
    let mut out = String::from(ALIAS_HEADER);
    for (name, target) in aliases {
        out.push_str(name);
        out.push('=');
        out.push_str(target);
        out.push('\n');
    }
    out
}

impl VersionStore {
    pub fn aliases(&self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .read_root_file(&self.aliases_file())?
            .map(|c| parse_aliases(&c))
            .unwrap_or_default())
    }

    pub fn alias(&self, name: &str) -> Result<Option<String>> { Ok(self.aliases()?.remove(name)) }

    /// Create or replace an alias. Each `:`-separated target entry must be a
    /// valid version name.
    pub fn set_alias(&self, name: &str, target: &str) -> Result<()> {
        validate_alias_name(name)?;
        let target = target.trim();
        if target.is_empty() {
            return Err(StoreError::InvalidAliasTarget {
                target: target.to_string(),
                source: gonv_version::VersionError::EmptySpec,
            });
        }
        for entry in target.split(':') {
            validate_version_name(entry).map_err(|source| StoreError::InvalidAliasTarget {
                target: target.to_string(),
                source,
            })?;
        }

        let mut aliases = self.aliases()?;
        aliases.insert(name.to_string(), target.to_string());
        self.write_root_file(&self.aliases_file(), &render_aliases(&aliases))
    }

    pub fn remove_alias(&self, name: &str) -> Result<()> {
        let mut aliases = self.aliases()?;
        if aliases.remove(name).is_none() {
            return Err(StoreError::AliasNotFound(name.to_string()));
        }
        self.write_root_file(&self.aliases_file(), &render_aliases(&aliases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use tempfile::tempdir;

    fn store(root: &std::path::Path) -> VersionStore { VersionStore::from_config(&Config::with_root(root)) }

    #[test]
    fn test_reserved_names_rejected() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(store.set_alias("system", "1.21.0"), Err(StoreError::ReservedAlias(_))));
        assert!(matches!(store.set_alias("latest", "1.21.0"), Err(StoreError::ReservedAlias(_))));
        assert!(!store.aliases_file().exists());
    }

    #[test]
    fn test_invalid_names() {
        for bad in ["", "a=b", "a/b", "a b", "a:b", ".x", "a..b", "back`tick"] {
            assert!(validate_alias_name(bad).is_err(), "{bad:?}");
        }
        assert!(validate_alias_name(&"a".repeat(65)).is_err());
        assert!(validate_alias_name("stable-1.21").is_ok());
    }

    #[test]
    fn test_set_and_list_sorted() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        store.set_alias("work", "1.21.0").unwrap();
        store.set_alias("legacy", "1.19.13:1.18.10").unwrap();
        store.set_alias("work", "1.22.1").unwrap();

        let content = std::fs::read_to_string(store.aliases_file()).unwrap();
        assert_eq!(
            content,
            "# gonv aliases\n# Format: alias_name=target_version\nlegacy=1.19.13:1.18.10\nwork=1.22.1\n"
        );
        assert_eq!(store.alias("work").unwrap().as_deref(), Some("1.22.1"));
        assert_eq!(store.aliases().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_target() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(
            store.set_alias("x", "1.21.0:../up"),
            Err(StoreError::InvalidAliasTarget { .. })
        ));
        assert!(store.set_alias("x", " ").is_err());
    }

    #[test]
    fn test_remove_alias() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        store.set_alias("work", "1.21.0").unwrap();
        store.remove_alias("work").unwrap();
        assert!(store.aliases().unwrap().is_empty());
        assert!(matches!(store.remove_alias("work"), Err(StoreError::AliasNotFound(_))));
    }

    #[test]
    fn test_parse_skips_garbage() {
        let parsed = parse_aliases("# c\nno-equals\n=1.2\nname=\n ok = 1.21.0 \n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ok"], "1.21.0");
    }
}
