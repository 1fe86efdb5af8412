use quiver_util::errors::GraphError;

#[test]
fn test_cycle_error_display() {
    let err = GraphError::Cycle {
        cycle: vec!["g:b".into(), "g:a".into(), "g:b".into()],
    };
    assert_eq!(err.to_string(), "Dependency cycle detected: g:b -> g:a -> g:b");
}

#[test]
fn test_cycle_accessor() {
    let err = GraphError::Cycle {
        cycle: vec!["g:a".into(), "g:a".into()],
    };
    assert_eq!(err.cycle().map(|c| c.len()), Some(2));
    assert!(GraphError::MissingEntry.cycle().is_none());
}

#[test]
fn test_missing_entry_display() {
    assert_eq!(
        GraphError::MissingEntry.to_string(),
        "Graph has no entry vertex"
    );
}

#[test]
fn test_unknown_vertex_display() {
    let err = GraphError::UnknownVertex {
        label: "org.example:lib".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown vertex: org.example:lib");
}

#[test]
fn test_config_error_display() {
    let err = GraphError::Config {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad syntax");
}

#[test]
fn test_generic_error_display() {
    let err = GraphError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_into_miette_report() {
    let report: miette::Report = GraphError::MissingEntry.into();
    assert!(report.to_string().contains("entry vertex"));
}
