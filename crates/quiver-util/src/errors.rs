use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for graph construction, resolution and classpath assembly.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Adding an edge would close a directed cycle. The edge was rolled back.
    ///
    /// `cycle` lists vertex labels from the edge's child back to itself.
    #[error("Dependency cycle detected: {}", cycle.join(" -> "))]
    #[diagnostic(help("Remove or exclude one of the dependencies on this path"))]
    Cycle { cycle: Vec<String> },

    /// The graph has no designated entry vertex.
    #[error("Graph has no entry vertex")]
    #[diagnostic(help("Call `set_entry` before resolving or transforming the graph"))]
    MissingEntry,

    /// A vertex label was not found in the graph.
    #[error("Unknown vertex: {label}")]
    UnknownVertex { label: String },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your quiver.toml for syntax errors"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl GraphError {
    /// The offending cycle, if this is a cycle error.
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            GraphError::Cycle { cycle } => Some(cycle),
            _ => None,
        }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type QuiverResult<T> = miette::Result<T>;
