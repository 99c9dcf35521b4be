use std::fmt;

use crate::{Result, VersionError};

/// The system sentinel: whatever `PATH` provides without the shims.
pub const SYSTEM: &str = "system";

/// Pseudo-version selecting the newest installed distribution.
pub const LATEST: &str = "latest";

/// An ordered, non-empty list of simultaneously active versions.
///
/// The first entry is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSpec(Vec<String>);

impl VersionSpec {
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if entries.is_empty() {
            return Err(VersionError::EmptySpec);
        }
        Ok(Self(entries))
    }

    pub fn single(entry: impl Into<String>) -> Result<Self> { Self::new([entry.into()]) }

    /// Parse the `:`-joined environment form. Blank input yields `None`.
    pub fn parse_joined(s: &str) -> Option<Self> { Self::new(s.split(':')).ok() }

    /// Parse file contents: one entry per line, `#` comment lines ignored.
    /// Whitespace-only content yields `None`.
    pub fn from_lines(content: &str) -> Option<Self> {
        let entries = content.lines().map(str::trim).filter(|l| !l.starts_with('#'));
        Self::new(entries).ok()
    }

    /// One entry per line, newline-terminated.
    pub fn to_lines(&self) -> String {
        let mut out = String::new();
        for entry in &self.0 {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    pub fn primary(&self) -> &str { &self.0[0] }
    pub fn entries(&self) -> &[String] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { false }
    pub fn iter(&self) -> std::slice::Iter<'_, String> { self.0.iter() }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0.join(":")) }
}

impl<'a> IntoIterator for &'a VersionSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_joined() {
        let spec = VersionSpec::parse_joined("1.21.0:1.20.0").unwrap();
        assert_eq!(spec.entries(), &["1.21.0", "1.20.0"]);
        assert_eq!(spec.primary(), "1.21.0");
        assert_eq!(spec.to_string(), "1.21.0:1.20.0");
        assert!(VersionSpec::parse_joined("").is_none());
        assert!(VersionSpec::parse_joined(" : ").is_none());
    }

    #[test]
    fn test_from_lines() {
        let spec = VersionSpec::from_lines("# pinned\n1.21.0\n\n  1.20.0 \r\n").unwrap();
        assert_eq!(spec.entries(), &["1.21.0", "1.20.0"]);
        assert!(VersionSpec::from_lines("  \n\t\n").is_none());
        assert!(VersionSpec::from_lines("# only a comment\n").is_none());
    }

    #[test]
    fn test_lines_preserve_order() {
        let spec = VersionSpec::new(["1.22.1", "system", "1.20.0"]).unwrap();
        assert_eq!(VersionSpec::from_lines(&spec.to_lines()).unwrap(), spec);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(VersionSpec::new(Vec::<String>::new()), Err(VersionError::EmptySpec));
    }
}
