use quiver_core::config::{ResolverConfig, VersionOrdering};
use quiver_core::scope::ArtifactScope;

#[test]
fn test_default_policy() {
    let config = ResolverConfig::default();
    assert!(config.policy.closer_first);
    assert!(config.policy.newer_first);
    assert_eq!(config.policy.version_ordering, VersionOrdering::Lexicographic);
    assert_eq!(config.classpath.default_scope, ArtifactScope::Compile);
}

#[test]
fn test_empty_toml_matches_default() {
    let config = ResolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, ResolverConfig::default());
}

#[test]
fn test_parse_from_toml() {
    let toml = r#"
[policy]
closer-first = false
version-ordering = "maven"

[classpath]
default-scope = "runtime"
"#;
    let config = ResolverConfig::from_toml_str(toml).unwrap();
    assert!(!config.policy.closer_first);
    assert!(config.policy.newer_first);
    assert_eq!(config.policy.version_ordering, VersionOrdering::Maven);
    assert_eq!(config.classpath.default_scope, ArtifactScope::Runtime);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = ResolverConfig::from_toml_str("[policy]\nversion-ordering = \"semantic\"").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"), "got: {err}");
}

#[test]
fn test_load_missing_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = ResolverConfig::load(&dir.path().join("quiver.toml")).unwrap();
    assert_eq!(config, ResolverConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.toml");
    std::fs::write(&path, "[policy]\nnewer-first = false\n").unwrap();
    let config = ResolverConfig::load(&path).unwrap();
    assert!(!config.policy.newer_first);
}

#[test]
fn test_pretty_roundtrip() {
    let mut config = ResolverConfig::default();
    config.policy.version_ordering = VersionOrdering::Maven;
    let text = config.to_string_pretty().unwrap();
    assert!(text.contains("version-ordering = \"maven\""));
    assert_eq!(ResolverConfig::from_toml_str(&text).unwrap(), config);
}
