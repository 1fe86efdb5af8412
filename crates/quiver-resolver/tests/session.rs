use quiver_core::artifact::ArtifactMetadata;
use quiver_core::config::ResolverConfig;
use quiver_core::declaration::DependencyDeclaration;
use quiver_core::scope::ArtifactScope;
use quiver_resolver::builder::GraphBuilder;
use quiver_resolver::cache::ResolutionSession;
use quiver_resolver::classpath::transform;

fn builder() -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    builder
        .declare(
            "com.example:app",
            vec![
                DependencyDeclaration::new("org.lib", "a", "1.0"),
                DependencyDeclaration::new("org.lib", "core", "1.0"),
                DependencyDeclaration::new("org.lib", "driver", "5.0")
                    .with_scope(ArtifactScope::Runtime),
            ],
        )
        .declare(
            "org.lib:a",
            vec![DependencyDeclaration::new("org.lib", "core", "2.0")],
        );
    builder
}

#[test]
fn session_from_config_file_drives_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.toml");
    std::fs::write(
        &path,
        r#"
[policy]
closer-first = false

[classpath]
default-scope = "runtime"
"#,
    )
    .unwrap();

    let session = ResolutionSession::new(ResolverConfig::load(&path).unwrap());
    assert_eq!(session.default_scope(), ArtifactScope::Runtime);

    let graph = builder()
        .build(ArtifactMetadata::new("com.example", "app").with_version("1.0"))
        .graph;
    let scope = session.default_scope();
    let resolution = session.resolver().resolve(&graph, scope).unwrap();
    let cp = transform(&resolution.graph, scope).unwrap();

    assert_eq!(cp.find("org.lib:core").unwrap().version.as_deref(), Some("2.0"));
    assert!(cp.find("org.lib:driver").is_some());
}

#[test]
fn default_session_uses_compile_and_nearest_wins() {
    let session = ResolutionSession::default();
    assert_eq!(session.default_scope(), ArtifactScope::Compile);

    let graph = builder()
        .build(ArtifactMetadata::new("com.example", "app"))
        .graph;
    let resolution = session
        .resolver()
        .resolve(&graph, session.default_scope())
        .unwrap();
    let cp = transform(&resolution.graph, session.default_scope()).unwrap();
    assert_eq!(cp.find("org.lib:core").unwrap().version.as_deref(), Some("1.0"));
    assert!(cp.find("org.lib:driver").is_none());
}

#[test]
fn plugin_versions_are_per_session() {
    let repos = vec!["https://repo.maven.apache.org/maven2".to_string()];
    let mut first = ResolutionSession::default();
    first
        .plugin_versions
        .insert("org.apache.maven.plugins", "maven-surefire-plugin", &repos, "3.2.5");

    let second = ResolutionSession::default();
    assert_eq!(
        first
            .plugin_versions
            .get("org.apache.maven.plugins", "maven-surefire-plugin", &repos),
        Some("3.2.5")
    );
    assert!(second
        .plugin_versions
        .get("org.apache.maven.plugins", "maven-surefire-plugin", &repos)
        .is_none());

    first.plugin_versions.clear();
    assert!(first.plugin_versions.is_empty());
}

#[test]
fn missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ResolverConfig::load(&dir.path().join("quiver.toml")).unwrap();
    assert_eq!(config, ResolverConfig::default());
}
