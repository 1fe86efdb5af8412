use serde::{Deserialize, Serialize};
use std::path::Path;

use quiver_util::errors::GraphError;

use crate::scope::ArtifactScope;

/// Resolver configuration loaded from `quiver.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub classpath: ClasspathConfig,
}

/// Conflict policy settings from `[policy]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Prefer the edge with fewer hops from the entry vertex.
    #[serde(default = "default_true", rename = "closer-first")]
    pub closer_first: bool,
    /// At equal depth, prefer the greater version.
    #[serde(default = "default_true", rename = "newer-first")]
    pub newer_first: bool,
    #[serde(default, rename = "version-ordering")]
    pub version_ordering: VersionOrdering,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            closer_first: true,
            newer_first: true,
            version_ordering: VersionOrdering::default(),
        }
    }
}

/// How two requested version strings are compared at equal depth.
///
/// `Lexicographic` is the compatible default: versions compare byte-wise, so
/// `"1.10"` sorts before `"1.9"`. `Maven` opts into Maven version ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    #[default]
    Lexicographic,
    Maven,
}

/// Classpath settings from `[classpath]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathConfig {
    #[serde(default, rename = "default-scope")]
    pub default_scope: ArtifactScope,
}

fn default_true() -> bool {
    true
}

impl ResolverConfig {
    /// Load configuration from `path`, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GraphError> {
        toml::from_str(content).map_err(|e| GraphError::Config {
            message: format!("Failed to parse resolver config: {e}"),
        })
    }

    /// Serialize the configuration to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
