use gonv_platform::GoTarget;
use gonv_version::{GoVersion, LATEST, max_version, normalize, select_latest};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DOWNLOAD_BASE_URL: &str = "https://go.dev/dl";

/// One entry of `https://go.dev/dl/?mode=json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// `go1.21.0`
    pub version: String,
    pub stable:  bool,
    #[serde(default)]
    pub files:   Vec<ReleaseFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFile {
    pub filename: String,
    pub os:       String,
    pub arch:     String,
    pub version:  String,
    pub sha256:   String,
    pub size:     u64,
    /// `archive`, `installer` or `source`.
    pub kind:     String,
}

impl Release {
    /// Installed-directory name: the version without its `go` prefix.
    pub fn name(&self) -> &str { normalize(&self.version) }

    /// The `archive` download for `target`, if the release ships one.
    pub fn archive_for(&self, target: &GoTarget) -> Option<&ReleaseFile> {
        self.files
            .iter()
            .find(|f| f.kind == "archive" && f.os == target.os && f.arch == target.arch)
    }
}

impl ReleaseFile {
    pub fn url(&self) -> String { format!("{DOWNLOAD_BASE_URL}/{}", self.filename) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseIndex {
    releases: Vec<Release>,
}

impl ReleaseIndex {
    pub fn new(releases: Vec<Release>) -> Self { Self { releases } }

    pub fn from_json(body: &[u8]) -> Result<Self> { Ok(Self::new(serde_json::from_slice(body)?)) }

    pub fn releases(&self) -> &[Release] { &self.releases }

    /// Releases newest first.
    pub fn sorted(&self) -> Vec<&Release> {
        let mut releases: Vec<&Release> = self.releases.iter().collect();
        releases.sort_by(|a, b| gonv_version::compare_names(b.name(), a.name()));
        releases
    }

    /// Resolve a requested version.
    ///
    /// An exact name may be any release, pre-releases included. `latest` and
    /// partial specs only consider stable releases.
    pub fn find(&self, spec: &str) -> Option<&Release> {
        let spec = normalize(spec.trim());
        if let Some(exact) = self.releases.iter().find(|r| r.name() == spec) {
            return Some(exact);
        }

        let stable: Vec<&str> = self
            .releases
            .iter()
            .filter(|r| r.stable && GoVersion::parse(r.name()).is_ok_and(|v| v.is_stable()))
            .map(Release::name)
            .collect();
        let name = if spec == LATEST {
            max_version(stable.iter().copied()).map(str::to_string)
        } else {
            select_latest(spec, &stable)
        }?;
        self.releases.iter().find(|r| r.name() == name)
    }
}
