//! Go release names and their ordering.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, VersionError};

static GO_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:go)?(?<major>[0-9]+)(?:\.(?<minor>[0-9]+))?(?:\.(?<patch>[0-9]+))?(?:-?(?<pre>alpha|beta|rc)(?<pre_num>[0-9]+)?)?$").unwrap()
});

/// Pre-release stage. Variant order is the release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha(u64),
    Beta(u64),
    Rc(u64),
    Release,
}

/// A parsed Go toolchain version such as `1.21.0`, `go1.22rc1` or `1.9`.
///
/// Field order matters: the derived ordering compares release components,
/// then the pre-release stage, then the raw text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoVersion {
    release:    [u64; 3],
    pre:        PreRelease,
    raw:        String,
    components: usize,
}

impl GoVersion {
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let caps = GO_VERSION_REGEX
            .captures(trimmed)
            .ok_or_else(|| VersionError::Invalid(s.to_string()))?;

        let num = |name: &str| -> Result<Option<u64>> {
            caps.name(name)
                .map(|m| m.as_str().parse().map_err(|_| VersionError::Invalid(s.to_string())))
                .transpose()
        };

        let major = num("major")?.unwrap_or(0);
        let minor = num("minor")?;
        let patch = num("patch")?;
        let pre_num = num("pre_num")?.unwrap_or(0);

        let pre = match caps.name("pre").map(|m| m.as_str()) {
            Some("alpha") => PreRelease::Alpha(pre_num),
            Some("beta") => PreRelease::Beta(pre_num),
            Some("rc") => PreRelease::Rc(pre_num),
            _ => PreRelease::Release,
        };

        let components = 1 + usize::from(minor.is_some()) + usize::from(patch.is_some());

        Ok(Self {
            release: [major, minor.unwrap_or(0), patch.unwrap_or(0)],
            pre,
            raw: normalize(trimmed).to_string(),
            components,
        })
    }

    pub fn major(&self) -> u64 { self.release[0] }
    pub fn minor(&self) -> u64 { self.release[1] }
    pub fn patch(&self) -> u64 { self.release[2] }
    pub fn pre_release(&self) -> PreRelease { self.pre }
    pub fn is_stable(&self) -> bool { self.pre == PreRelease::Release }

    /// Release components as written, without padding.
    pub fn components(&self) -> &[u64] { &self.release[..self.components] }

    /// Name without the `go` prefix, as used for `versions/<name>`.
    pub fn as_str(&self) -> &str { &self.raw }

    /// Name with the `go` prefix, as used by the release index.
    pub fn tag(&self) -> String { format!("go{}", self.raw) }
}

impl std::str::FromStr for GoVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> { GoVersion::parse(s) }
}

impl std::fmt::Display for GoVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.raw) }
}

/// Strip a leading `go` from a version name.
pub fn normalize(s: &str) -> &str {
    let s = s.trim();
    match s.strip_prefix("go") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => s,
    }
}

/// Total order over installed directory names.
///
/// Parsable names compare as [`GoVersion`]s. Unparsable names sort before
/// every parsable one and compare lexically among themselves.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (GoVersion::parse(a), GoVersion::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Err(_), Ok(_)) => Ordering::Less,
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
}

/// The greatest name under [`compare_names`].
pub fn max_version<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().max_by(|a, b| compare_names(a, b))
}
