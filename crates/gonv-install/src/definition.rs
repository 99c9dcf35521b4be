use std::path::{Path, PathBuf};

use gonv_version::{normalize, validate_version_name};
use serde::Deserialize;

use crate::{InstallError, Result};

/// A locally authored install recipe, for builds the release index does
/// not carry.
///
/// ```toml
/// version = "1.21.0-custom"
/// url = "https://example.com/go1.21.0-custom.linux-amd64.tar.gz"
/// sha256 = "e330e5d977bf4f3bdc157bc46cf41afa5b13d66c914e12fd6b694ccda65fcf92"
/// mirrors = ["https://mirror.example.com/go"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definition {
    pub version: String,
    pub url:     String,
    pub sha256:  String,
    #[serde(default)]
    pub mirrors: Vec<String>,
}

impl Definition {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| InstallError::Io {
            action: "read definition",
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let invalid = |message: String| InstallError::Definition {
            path: PathBuf::from(path),
            message,
        };

        let mut definition: Self = toml::from_str(content).map_err(|e| invalid(e.message().to_string()))?;
        definition.version = normalize(definition.version.trim()).to_string();
        validate_version_name(&definition.version).map_err(|e| invalid(e.to_string()))?;
        if definition.url.trim().is_empty() {
            return Err(invalid("url must not be empty".into()));
        }
        gonv_verify::parse_sha256_hex(&definition.sha256).map_err(|e| invalid(e.to_string()))?;
        Ok(definition)
    }
}
