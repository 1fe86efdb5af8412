use quiver_core::artifact::ArtifactMetadata;
use quiver_core::scope::ArtifactScope;

#[test]
fn parse_with_version() {
    let md = ArtifactMetadata::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(md.group, "com.example");
    assert_eq!(md.artifact, "my-lib");
    assert_eq!(md.version.as_deref(), Some("1.0.0"));
}

#[test]
fn parse_versionless() {
    let md = ArtifactMetadata::parse("com.example:my-lib").unwrap();
    assert!(md.version.is_none());
    assert_eq!(md.key(), "com.example:my-lib");
}

#[test]
fn parse_rejects_malformed() {
    assert!(ArtifactMetadata::parse("").is_none());
    assert!(ArtifactMetadata::parse("group").is_none());
    assert!(ArtifactMetadata::parse("group::1.0").is_none());
    assert!(ArtifactMetadata::parse("g:a:v:extra").is_none());
}

#[test]
fn display_roundtrip() {
    let s = "com.example:my-lib:1.0.0";
    assert_eq!(ArtifactMetadata::parse(s).unwrap().to_string(), s);
    assert_eq!(ArtifactMetadata::new("g", "a").to_string(), "g:a");
}

#[test]
fn key_ignores_version() {
    let a = ArtifactMetadata::new("g", "a").with_version("1.0");
    let b = ArtifactMetadata::new("g", "a").with_version("2.0");
    assert_eq!(a.key(), b.key());
}

#[test]
fn defaults() {
    let md = ArtifactMetadata::new("g", "a");
    assert_eq!(md.kind, "jar");
    assert!(!md.resolved);
    assert_eq!(md.effective_scope(), ArtifactScope::Compile);
    assert_eq!(
        md.with_scope(ArtifactScope::Test).effective_scope(),
        ArtifactScope::Test
    );
}
