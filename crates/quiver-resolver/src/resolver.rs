//! Conflict resolution over a metadata graph: breadth-first from the entry
//! vertex, one winning edge per vertex, scope pruning and exclusions.

use std::collections::{HashMap, HashSet, VecDeque};

use quiver_core::artifact::ArtifactMetadata;
use quiver_core::config::ResolverConfig;
use quiver_core::declaration::ExclusionFilter;
use quiver_core::scope::ArtifactScope;
use quiver_util::errors::GraphError;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{EdgeId, GraphEdge, MetadataGraph, VertexId};
use crate::policy::{ConflictResolutionPolicy, DefaultPolicy};

/// The output of conflict resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Reachable vertices only, entry first, each non-entry vertex entered by
    /// exactly one edge. Vertex metadata carries the winning version.
    pub graph: MetadataGraph,
    pub conflicts: ConflictReport,
}

/// Collapses a multigraph into a tree of winning edges for one target scope.
#[derive(Debug, Clone, Default)]
pub struct GraphConflictResolver<P = DefaultPolicy> {
    policy: P,
}

impl GraphConflictResolver<DefaultPolicy> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::with_policy(DefaultPolicy::from_config(config))
    }
}

impl<P: ConflictResolutionPolicy> GraphConflictResolver<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Resolve `graph` for `scope`.
    ///
    /// Edges whose scope `scope` does not enclose are ignored, as are children
    /// excluded along the winning path. Vertices left without a usable edge
    /// are absent from the result; that is not an error.
    ///
    /// Candidates are gathered breadth-first from the entry, then each vertex
    /// picks its winner in topological order, so the exclusions in force below
    /// a vertex always come from the edge that finally won it.
    #[tracing::instrument(skip_all, fields(scope = %scope))]
    pub fn resolve(
        &self,
        graph: &MetadataGraph,
        scope: ArtifactScope,
    ) -> Result<Resolution, GraphError> {
        let entry = graph.entry().ok_or(GraphError::MissingEntry)?;
        let (order, candidates) = discover(graph, entry, scope);

        let mut conflicts = ConflictReport::new();
        let mut winners: HashMap<VertexId, EdgeId> = HashMap::new();
        let mut active: HashMap<VertexId, ExclusionFilter> =
            HashMap::from([(entry, ExclusionFilter::new())]);

        for vertex in graph.topological_order()? {
            let Some(edges) = candidates.get(&vertex) else {
                continue;
            };
            let md = graph.vertex(vertex);
            let winner = edges
                .iter()
                .copied()
                .filter(|e| {
                    active
                        .get(&e.source)
                        .is_some_and(|filter| !filter.matches(&md.group, &md.artifact))
                })
                .reduce(|first, second| self.settle(md, first, second, &mut conflicts));
            let Some(winner) = winner else {
                tracing::debug!("{} excluded on every path", md.key());
                continue;
            };

            let mut filter = active.get(&winner.source).cloned().unwrap_or_default();
            if let Some(own) = &winner.weight.exclusions {
                filter.extend(own);
            }
            active.insert(vertex, filter);
            winners.insert(vertex, winner.id);
        }

        tracing::debug!(
            "resolved {} of {} vertices, {} conflicts",
            winners.len() + 1,
            graph.vertex_count(),
            conflicts.len()
        );

        let graph = build_resolved_graph(graph, entry, &order, &winners)?;
        Ok(Resolution { graph, conflicts })
    }

    /// Pick between two competing edges into the vertex described by `md`.
    fn settle<'g>(
        &self,
        md: &ArtifactMetadata,
        first: GraphEdge<'g>,
        second: GraphEdge<'g>,
        conflicts: &mut ConflictReport,
    ) -> GraphEdge<'g> {
        let winner = self.policy.apply(first.weight, second.weight);
        let (winner, loser) = if std::ptr::eq(winner, first.weight) {
            (first, second)
        } else {
            (second, first)
        };
        if winner.weight.version != loser.weight.version {
            tracing::debug!(
                "{}: {} wins over {}",
                md.key(),
                winner.weight.version,
                loser.weight.version
            );
            conflicts.add(VersionConflict::between(
                &md.group,
                &md.artifact,
                winner.weight,
                loser.weight,
            ));
        }
        winner
    }
}

/// Breadth-first walk over enclosed edges, ignoring exclusions.
///
/// Returns the discovery order (entry first) and, per reached vertex, every
/// enclosed incoming edge: parents in expansion order, parallel edges in
/// insertion order.
fn discover(
    graph: &MetadataGraph,
    entry: VertexId,
    scope: ArtifactScope,
) -> (Vec<VertexId>, HashMap<VertexId, Vec<GraphEdge<'_>>>) {
    let mut candidates: HashMap<VertexId, Vec<GraphEdge<'_>>> = HashMap::new();
    let mut seen = HashSet::from([entry]);
    let mut order = vec![entry];
    let mut queue = VecDeque::from([entry]);

    while let Some(vertex) = queue.pop_front() {
        for child in graph.children(vertex) {
            if child == entry {
                continue;
            }
            let enclosed: Vec<GraphEdge<'_>> = graph
                .edges_between(vertex, child)
                .into_iter()
                .filter(|e| scope.encloses(e.weight.scope))
                .collect();
            if enclosed.is_empty() {
                continue;
            }
            candidates.entry(child).or_default().extend(enclosed);
            if seen.insert(child) {
                order.push(child);
                queue.push_back(child);
            }
        }
    }
    (order, candidates)
}

fn build_resolved_graph(
    source: &MetadataGraph,
    entry: VertexId,
    order: &[VertexId],
    winners: &HashMap<VertexId, EdgeId>,
) -> Result<MetadataGraph, GraphError> {
    let mut out = MetadataGraph::with_entry(source.vertex(entry).clone());
    let mut mapped: HashMap<VertexId, VertexId> = HashMap::new();
    if let Some(root) = out.entry() {
        mapped.insert(entry, root);
    }

    let edges: Vec<GraphEdge<'_>> = order
        .iter()
        .filter_map(|v| winners.get(v))
        .filter_map(|&id| source.edge(id))
        .collect();

    for edge in &edges {
        let md = resolved_metadata(source, edge);
        mapped.insert(edge.target, out.add_vertex(md));
    }
    for edge in &edges {
        if let (Some(&from), Some(&to)) = (mapped.get(&edge.source), mapped.get(&edge.target)) {
            out.add_edge(from, to, edge.weight.clone())?;
        }
    }
    Ok(out)
}

/// Vertex metadata with the version, scope and origin of its winning edge.
fn resolved_metadata(graph: &MetadataGraph, edge: &GraphEdge<'_>) -> ArtifactMetadata {
    let md = graph.vertex(edge.target);
    ArtifactMetadata {
        version: Some(edge.weight.version.clone()),
        scope: edge.weight.scope.or(md.scope),
        uri: edge.weight.uri.clone().or_else(|| md.uri.clone()),
        resolved: edge.weight.resolved,
        why: Some(graph.vertex(edge.source).key()),
        ..md.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MetadataEdge;

    fn md(artifact: &str) -> ArtifactMetadata {
        ArtifactMetadata::new("g", artifact)
    }

    #[test]
    fn entry_only_graph_resolves_to_itself() {
        let graph = MetadataGraph::with_entry(md("app").with_version("1.0"));
        let res = GraphConflictResolver::new()
            .resolve(&graph, ArtifactScope::Compile)
            .unwrap();
        assert_eq!(res.graph.vertex_count(), 1);
        assert!(res.graph.is_empty_edges());
        assert!(res.conflicts.is_empty());
    }

    #[test]
    fn missing_entry_is_an_error() {
        let mut graph = MetadataGraph::new();
        graph.add_vertex(md("app"));
        let err = GraphConflictResolver::new()
            .resolve(&graph, ArtifactScope::Compile)
            .unwrap_err();
        assert_eq!(err, GraphError::MissingEntry);
    }

    #[test]
    fn resolved_vertex_records_origin() {
        let mut graph = MetadataGraph::with_entry(md("app"));
        let root = graph.entry().unwrap();
        let lib = graph.add_vertex(md("lib"));
        graph
            .add_edge(root, lib, MetadataEdge::new("1.0", 1, 1).with_uri("file:lib.jar").resolved(true))
            .unwrap();

        let res = GraphConflictResolver::new()
            .resolve(&graph, ArtifactScope::Compile)
            .unwrap();
        let lib = res.graph.vertex(res.graph.find("g:lib").unwrap());
        assert_eq!(lib.version.as_deref(), Some("1.0"));
        assert_eq!(lib.why.as_deref(), Some("g:app"));
        assert_eq!(lib.uri.as_deref(), Some("file:lib.jar"));
        assert!(lib.resolved);
    }
}
