//! Dependency declarations as supplied by the model-building layer, and the
//! exclusion filters they carry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactMetadata;
use crate::scope::ArtifactScope;

/// A single `<dependency>` entry of an artifact, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub scope: Option<ArtifactScope>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl DependencyDeclaration {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            scope: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    /// Parse the shorthand `"group:artifact:version"`.
    pub fn parse(s: &str) -> Option<Self> {
        let md = ArtifactMetadata::parse(s)?;
        let version = md.version?;
        Some(Self::new(md.group, md.artifact, version))
    }

    pub fn with_scope(mut self, scope: ArtifactScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Versionless metadata for the declared artifact.
    pub fn metadata(&self) -> ArtifactMetadata {
        ArtifactMetadata::new(&self.group, &self.artifact)
    }

    pub fn exclusion_filter(&self) -> Option<ExclusionFilter> {
        if self.exclusions.is_empty() {
            return None;
        }
        Some(self.exclusions.iter().collect())
    }
}

/// A transitive dependency to exclude. A missing artifact excludes the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub group: String,
    #[serde(default)]
    pub artifact: Option<String>,
}

impl Exclusion {
    pub fn artifact(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: Some(artifact.into()),
        }
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: None,
        }
    }

    fn pattern(&self) -> String {
        match self.artifact.as_deref() {
            None | Some("*") => self.group.clone(),
            Some(a) => format!("{}:{}", self.group, a),
        }
    }
}

/// Set of exclusion patterns matched against versionless `group:artifact` keys.
///
/// Patterns are `group:artifact`, a bare `group`, `*:artifact` for an
/// artifact id in any group, or `*` for everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionFilter {
    patterns: BTreeSet<String>,
}

impl ExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if pattern == "*:*" {
            self.patterns.insert("*".to_string());
        } else {
            self.patterns.insert(pattern);
        }
    }

    pub fn extend(&mut self, other: &ExclusionFilter) {
        self.patterns.extend(other.patterns.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, group: &str, artifact: &str) -> bool {
        self.patterns.contains("*")
            || self.patterns.contains(group)
            || self.patterns.contains(&format!("{group}:{artifact}"))
            || self.patterns.contains(&format!("*:{artifact}"))
    }

    /// Match a `group:artifact` key.
    pub fn matches_key(&self, key: &str) -> bool {
        match key.split_once(':') {
            Some((group, artifact)) => self.matches(group, artifact),
            None => self.patterns.contains("*") || self.patterns.contains(key),
        }
    }
}

impl<'a> FromIterator<&'a Exclusion> for ExclusionFilter {
    fn from_iter<I: IntoIterator<Item = &'a Exclusion>>(iter: I) -> Self {
        let mut filter = ExclusionFilter::new();
        for excl in iter {
            filter.insert(excl.pattern());
        }
        filter
    }
}
