//! Partial version matching (`1`, `1.21`, `21`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{GoVersion, Result, VersionError, go_version};

static PARTIAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?<major>[0-9]+)(?:\.(?<minor>[0-9]+))?(?:\.(?<patch>[0-9]+))?$").unwrap());

/// A numeric prefix of a release, e.g. `1.21`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partial {
    parts: Vec<u64>,
}

impl Partial {
    pub fn parse(s: &str) -> Result<Self> {
        let norm = go_version::normalize(s);
        let caps = PARTIAL_REGEX
            .captures(norm)
            .ok_or_else(|| VersionError::Partial(s.to_string()))?;

        let parts = ["major", "minor", "patch"]
            .iter()
            .filter_map(|name| caps.name(name))
            .map(|m| m.as_str().parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| VersionError::Partial(s.to_string()))?;

        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[u64] { &self.parts }

    pub fn is_single(&self) -> bool { self.parts.len() == 1 }

    /// Component-prefix match.
    ///
    /// `1.21` matches `1.21` and `1.21.x` (including `1.21.3rc1`), but not
    /// `1.21rc1`, whose release components are exactly `1.21`.
    pub fn matches(&self, version: &GoVersion) -> bool {
        let comps = version.components();
        if comps.len() < self.parts.len() || comps[..self.parts.len()] != self.parts[..] {
            return false;
        }
        comps.len() > self.parts.len() || version.is_stable()
    }

    /// For a single-component partial, match it against the minor component.
    pub fn matches_minor(&self, version: &GoVersion) -> bool {
        self.is_single() && version.components().len() > 1 && version.minor() == self.parts[0]
    }
}

impl std::str::FromStr for Partial {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> { Partial::parse(s) }
}

impl std::fmt::Display for Partial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        f.write_str(&joined.join("."))
    }
}

/// Pick the installed name a requested version refers to.
///
/// An exact name wins. Otherwise the request is read as a [`Partial`]: a single
/// component matches on the major component, falling back to the minor one
/// (`21` selects the newest `1.21.x`); longer requests match by component prefix.
/// The greatest match under [`go_version::compare_names`] is returned.
pub fn select_latest<S: AsRef<str>>(spec: &str, installed: &[S]) -> Option<String> {
    let installed: Vec<&str> = installed.iter().map(|s| s.as_ref()).collect();
    let spec = spec.trim();
    let norm = go_version::normalize(spec);
    if let Some(exact) = installed.iter().find(|n| **n == spec || **n == norm) {
        return Some(exact.to_string());
    }

    let partial = Partial::parse(spec).ok()?;
    let parsed: Vec<(&str, GoVersion)> = installed
        .iter()
        .filter_map(|n| GoVersion::parse(n).ok().map(|v| (*n, v)))
        .collect();

    let mut matches: Vec<&str> =
        parsed.iter().filter(|(_, v)| partial.matches(v)).map(|(n, _)| *n).collect();
    if matches.is_empty() && partial.is_single() {
        matches = parsed
            .iter()
            .filter(|(_, v)| partial.matches_minor(v))
            .map(|(n, _)| *n)
            .collect();
    }

    go_version::max_version(matches).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_parse() {
        assert_eq!(Partial::parse("1.21").unwrap().parts(), &[1, 21]);
        assert_eq!(Partial::parse("go1").unwrap().parts(), &[1]);
        assert!(Partial::parse("1.21rc1").is_err());
        assert!(Partial::parse("1.2.3.4").is_err());
        assert!(Partial::parse("").is_err());
    }

    #[test]
    fn test_partial_matches() {
        let p = Partial::parse("1.21").unwrap();
        assert!(p.matches(&"1.21.0".parse().unwrap()));
        assert!(p.matches(&"1.21".parse().unwrap()));
        assert!(!p.matches(&"1.21rc1".parse().unwrap()));
        assert!(!p.matches(&"1.2.1".parse().unwrap()));
        assert!(!p.matches(&"1.210.0".parse().unwrap()));
    }

    #[test]
    fn test_select_latest_by_version_order() {
        let installed = ["1.9.2", "1.9.9", "1.9.10", "1.10.1"];
        assert_eq!(select_latest("1.9", &installed).as_deref(), Some("1.9.10"));
    }

    #[test]
    fn test_select_latest_exact_wins() {
        let installed = ["1.21", "1.21.5"];
        assert_eq!(select_latest("1.21", &installed).as_deref(), Some("1.21"));
        assert_eq!(select_latest("go1.21.5", &installed).as_deref(), Some("1.21.5"));
    }

    #[test]
    fn test_select_latest_single_component() {
        let installed = ["1.20.14", "1.21.5", "1.22.1"];
        assert_eq!(select_latest("1", &installed).as_deref(), Some("1.22.1"));
        assert_eq!(select_latest("21", &installed).as_deref(), Some("1.21.5"));
        assert_eq!(select_latest("2", &installed), None);
    }

    #[test]
    fn test_select_latest_misses() {
        let installed = ["1.21.5", "custom"];
        assert_eq!(select_latest("1.22", &installed), None);
        assert_eq!(select_latest("custom", &installed).as_deref(), Some("custom"));
        assert_eq!(select_latest("cust", &installed), None);
    }
}
