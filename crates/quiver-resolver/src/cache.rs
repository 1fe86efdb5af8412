//! Resolution session state.
//!
//! Plugin versions resolved during a session are cached on an explicit
//! [`PluginVersionCache`] owned by the [`ResolutionSession`] instead of a
//! process-wide map, so two sessions never observe each other's answers.

use std::collections::HashMap;

use quiver_core::config::ResolverConfig;
use quiver_core::scope::ArtifactScope;

use crate::policy::DefaultPolicy;
use crate::resolver::GraphConflictResolver;

/// Cache key: plugin coordinates plus the repositories consulted, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginKey {
    pub group: String,
    pub artifact: String,
    pub repositories: Vec<String>,
}

impl PluginKey {
    pub fn new(group: &str, artifact: &str, repositories: &[String]) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            repositories: repositories.to_vec(),
        }
    }
}

/// Resolved plugin versions keyed by [`PluginKey`].
#[derive(Debug, Clone, Default)]
pub struct PluginVersionCache {
    versions: HashMap<PluginKey, String>,
}

impl PluginVersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: &str, artifact: &str, repositories: &[String]) -> Option<&str> {
        self.versions
            .get(&PluginKey::new(group, artifact, repositories))
            .map(String::as_str)
    }

    /// Store a version, returning the one it replaced.
    pub fn insert(
        &mut self,
        group: &str,
        artifact: &str,
        repositories: &[String],
        version: impl Into<String>,
    ) -> Option<String> {
        self.versions
            .insert(PluginKey::new(group, artifact, repositories), version.into())
    }

    /// Return the cached version, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        group: &str,
        artifact: &str,
        repositories: &[String],
        resolve: impl FnOnce() -> String,
    ) -> &str {
        self.versions
            .entry(PluginKey::new(group, artifact, repositories))
            .or_insert_with(resolve)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn clear(&mut self) {
        self.versions.clear();
    }
}

/// Per-request context carrying configuration and session caches.
#[derive(Debug, Clone, Default)]
pub struct ResolutionSession {
    pub config: ResolverConfig,
    pub plugin_versions: PluginVersionCache,
}

impl ResolutionSession {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            plugin_versions: PluginVersionCache::new(),
        }
    }

    /// A resolver using this session's conflict policy.
    pub fn resolver(&self) -> GraphConflictResolver<DefaultPolicy> {
        GraphConflictResolver::from_config(&self.config)
    }

    pub fn default_scope(&self) -> ArtifactScope {
        self.config.classpath.default_scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_includes_repository_list() {
        let mut cache = PluginVersionCache::new();
        let central = repos(&["https://repo.maven.apache.org/maven2"]);
        cache.insert("org.apache.maven.plugins", "maven-jar-plugin", &central, "3.3.0");

        assert_eq!(
            cache.get("org.apache.maven.plugins", "maven-jar-plugin", &central),
            Some("3.3.0")
        );
        let mirror = repos(&["https://mirror.example/maven2"]);
        assert!(cache
            .get("org.apache.maven.plugins", "maven-jar-plugin", &mirror)
            .is_none());
    }

    #[test]
    fn get_or_insert_computes_once() {
        let mut cache = PluginVersionCache::new();
        let r = repos(&["a", "b"]);
        let mut calls = 0;
        let v = cache
            .get_or_insert_with("g", "p", &r, || {
                calls += 1;
                "1.0".to_string()
            })
            .to_string();
        let again = cache
            .get_or_insert_with("g", "p", &r, || {
                calls += 1;
                "2.0".to_string()
            })
            .to_string();
        assert_eq!((v.as_str(), again.as_str(), calls), ("1.0", "1.0", 1));
    }

    #[test]
    fn sessions_do_not_share_caches() {
        let mut first = ResolutionSession::default();
        let second = ResolutionSession::default();
        first.plugin_versions.insert("g", "p", &[], "1.0");
        assert_eq!(first.plugin_versions.len(), 1);
        assert!(second.plugin_versions.is_empty());
    }
}
