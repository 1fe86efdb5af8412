//! Builds a [`MetadataGraph`] from per-artifact dependency declarations.
//!
//! Artifacts are expanded breadth-first from the root, each once. Every
//! declaration becomes an edge whose depth is one more than its parent's and
//! whose `pom_order` is its 1-based position in the parent's list. Edges that
//! would close a cycle are skipped and reported.

use std::collections::{HashMap, HashSet, VecDeque};

use quiver_core::artifact::ArtifactMetadata;
use quiver_core::declaration::DependencyDeclaration;

use crate::graph::{MetadataEdge, MetadataGraph, VertexId};

/// Declarations keyed by the declaring artifact's `group:artifact`.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    declarations: HashMap<String, Vec<DependencyDeclaration>>,
}

/// The graph plus the declarations that were dropped because of cycles.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub graph: MetadataGraph,
    pub rejected: Vec<RejectedEdge>,
}

/// A declaration left out of the graph because it closed a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEdge {
    pub parent: String,
    pub child: String,
    pub version: String,
    pub cycle: Vec<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the ordered dependency list of `artifact` (`group:artifact`).
    ///
    /// A second call for the same artifact replaces the first.
    pub fn declare(
        &mut self,
        artifact: impl Into<String>,
        dependencies: Vec<DependencyDeclaration>,
    ) -> &mut Self {
        self.declarations.insert(artifact.into(), dependencies);
        self
    }

    pub fn declarations(&self, artifact: &str) -> &[DependencyDeclaration] {
        self.declarations
            .get(artifact)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Build the graph rooted at `root`.
    ///
    /// Optional declarations are only followed from the root itself.
    pub fn build(&self, root: ArtifactMetadata) -> BuildOutcome {
        let mut graph = MetadataGraph::with_entry(root);
        let mut rejected = Vec::new();
        let Some(entry) = graph.entry() else {
            return BuildOutcome { graph, rejected };
        };

        let mut seen: HashSet<VertexId> = HashSet::from([entry]);
        let mut queue: VecDeque<(VertexId, u32)> = VecDeque::from([(entry, 0)]);

        while let Some((parent, depth)) = queue.pop_front() {
            let parent_key = graph.vertex(parent).key();
            for (i, decl) in self.declarations(&parent_key).iter().enumerate() {
                if decl.optional && parent != entry {
                    continue;
                }
                let child = graph.add_vertex(decl.metadata());
                let mut edge = MetadataEdge::new(&decl.version, depth + 1, i as u32 + 1);
                edge.scope = decl.scope;
                edge.exclusions = decl.exclusion_filter();

                match graph.add_edge(parent, child, edge) {
                    Ok(_) => {
                        if seen.insert(child) {
                            queue.push_back((child, depth + 1));
                        }
                    }
                    Err(err) => {
                        let cycle = err.cycle().map(<[String]>::to_vec).unwrap_or_default();
                        tracing::warn!(
                            "Skipping {} -> {}:{}: {err}",
                            parent_key,
                            decl.key(),
                            decl.version
                        );
                        rejected.push(RejectedEdge {
                            parent: parent_key.clone(),
                            child: decl.key(),
                            version: decl.version.clone(),
                            cycle,
                        });
                    }
                }
            }
        }

        BuildOutcome { graph, rejected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_and_order_follow_declarations() {
        let mut builder = GraphBuilder::new();
        builder
            .declare(
                "g:app",
                vec![
                    DependencyDeclaration::new("g", "a", "1.0"),
                    DependencyDeclaration::new("g", "b", "2.0"),
                ],
            )
            .declare("g:a", vec![DependencyDeclaration::new("g", "c", "3.0")]);

        let outcome = builder.build(ArtifactMetadata::new("g", "app"));
        assert!(outcome.rejected.is_empty());
        let graph = outcome.graph;
        assert_eq!(graph.vertex_count(), 4);

        let a = graph.find("g:a").unwrap();
        let b = graph.find("g:b").unwrap();
        let c = graph.find("g:c").unwrap();
        let root = graph.entry().unwrap();
        let to_b = graph.edges_between(root, b);
        assert_eq!((to_b[0].weight.depth, to_b[0].weight.pom_order), (1, 2));
        let to_c = graph.edges_between(a, c);
        assert_eq!((to_c[0].weight.depth, to_c[0].weight.pom_order), (2, 1));
    }

    #[test]
    fn optional_only_followed_from_root() {
        let mut builder = GraphBuilder::new();
        builder
            .declare("g:app", vec![DependencyDeclaration::new("g", "a", "1.0").optional()])
            .declare("g:a", vec![DependencyDeclaration::new("g", "b", "1.0").optional()]);
        let graph = builder.build(ArtifactMetadata::new("g", "app")).graph;
        assert!(graph.find("g:a").is_some());
        assert!(graph.find("g:b").is_none());
    }
}
