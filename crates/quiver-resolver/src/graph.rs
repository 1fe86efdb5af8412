//! Metadata graph: versionless artifact vertices joined by directed
//! multi-edges that carry the requested version, scope and depth.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Write as _;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use quiver_core::artifact::ArtifactMetadata;
use quiver_core::declaration::ExclusionFilter;
use quiver_core::scope::ArtifactScope;
use quiver_util::errors::GraphError;

pub type VertexId = NodeIndex;
pub type EdgeId = EdgeIndex;

/// One dependency declaration between two vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEdge {
    /// Requested version.
    pub version: String,
    pub resolved: bool,
    pub scope: Option<ArtifactScope>,
    /// Artifacts pruned from everything reached through this edge.
    pub exclusions: Option<ExclusionFilter>,
    /// Distance from the entry vertex along the path that declared this edge.
    pub depth: u32,
    /// Position in the parent's dependency list.
    pub pom_order: u32,
    pub uri: Option<String>,
}

impl MetadataEdge {
    pub fn new(version: impl Into<String>, depth: u32, pom_order: u32) -> Self {
        Self {
            version: version.into(),
            resolved: false,
            scope: None,
            exclusions: None,
            depth,
            pom_order,
            uri: None,
        }
    }

    pub fn with_scope(mut self, scope: ArtifactScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionFilter) -> Self {
        self.exclusions = Some(exclusions);
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    pub fn effective_scope(&self) -> ArtifactScope {
        ArtifactScope::check(self.scope)
    }
}

/// A borrowed edge together with its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct GraphEdge<'a> {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub weight: &'a MetadataEdge,
}

/// Directed acyclic multigraph of artifact requirements.
///
/// Vertices are keyed by `group:artifact`; any number of parallel edges may
/// join the same pair. Adding an edge that would close a cycle is rejected.
#[derive(Debug, Clone, Default)]
pub struct MetadataGraph {
    graph: DiGraph<ArtifactMetadata, MetadataEdge>,
    index: HashMap<String, VertexId>,
    entry: Option<VertexId>,
}

impl MetadataGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph whose entry vertex is `md`.
    pub fn with_entry(md: ArtifactMetadata) -> Self {
        let mut graph = Self::new();
        let entry = graph.add_vertex(md);
        graph.set_entry(entry);
        graph
    }

    /// Add or retrieve a vertex. If the key already exists, returns the existing vertex.
    pub fn add_vertex(&mut self, md: ArtifactMetadata) -> VertexId {
        let key = md.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(md);
        self.index.insert(key, idx);
        idx
    }

    /// Set the entry vertex of the graph (the project itself).
    pub fn set_entry(&mut self, idx: VertexId) {
        self.entry = Some(idx);
    }

    pub fn entry(&self) -> Option<VertexId> {
        self.entry
    }

    /// Add a dependency edge from `parent` to `child`.
    ///
    /// The edge is inserted first and the graph is then searched for a cycle
    /// through `child`. On a cycle the edge is removed again and the cycle is
    /// returned as labels from `child` back to `child`.
    pub fn add_edge(
        &mut self,
        parent: VertexId,
        child: VertexId,
        edge: MetadataEdge,
    ) -> Result<EdgeId, GraphError> {
        let id = self.graph.add_edge(parent, child, edge);
        if let Some(cycle) = self.find_cycle_from(child) {
            // `id` is the newest edge, so removal does not renumber any other edge
            self.graph.remove_edge(id);
            tracing::debug!("rejected edge {} -> {}: cycle", self.graph[parent], self.graph[child]);
            return Err(GraphError::Cycle { cycle });
        }
        Ok(id)
    }

    /// Look up a vertex by `group:artifact`.
    pub fn find(&self, key: &str) -> Option<VertexId> {
        self.index.get(key).copied()
    }

    /// Like [`find`](Self::find), but a missing key is an error.
    pub fn require(&self, key: &str) -> Result<VertexId, GraphError> {
        self.find(key).ok_or_else(|| GraphError::UnknownVertex {
            label: key.to_string(),
        })
    }

    /// Get the artifact metadata for a vertex.
    pub fn vertex(&self, idx: VertexId) -> &ArtifactMetadata {
        &self.graph[idx]
    }

    pub fn edge(&self, id: EdgeId) -> Option<GraphEdge<'_>> {
        let (source, target) = self.graph.edge_endpoints(id)?;
        Some(GraphEdge {
            id,
            source,
            target,
            weight: &self.graph[id],
        })
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.node_indices()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<GraphEdge<'_>> {
        self.graph
            .edge_indices()
            .filter_map(|id| self.edge(id))
            .collect()
    }

    /// Edges leaving `idx`, in insertion order.
    pub fn excident_edges(&self, idx: VertexId) -> Vec<GraphEdge<'_>> {
        self.directed_edges(idx, Direction::Outgoing)
    }

    /// Edges entering `idx`, in insertion order.
    pub fn incident_edges(&self, idx: VertexId) -> Vec<GraphEdge<'_>> {
        self.directed_edges(idx, Direction::Incoming)
    }

    fn directed_edges(&self, idx: VertexId, dir: Direction) -> Vec<GraphEdge<'_>> {
        let mut edges: Vec<GraphEdge<'_>> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| GraphEdge {
                id: e.id(),
                source: e.source(),
                target: e.target(),
                weight: e.weight(),
            })
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// Parallel edges from `parent` to `child`, in insertion order.
    pub fn edges_between(&self, parent: VertexId, child: VertexId) -> Vec<GraphEdge<'_>> {
        let mut edges: Vec<GraphEdge<'_>> = self
            .graph
            .edges_connecting(parent, child)
            .map(|e| GraphEdge {
                id: e.id(),
                source: e.source(),
                target: e.target(),
                weight: e.weight(),
            })
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// Distinct children of `idx`, ordered by their first edge.
    pub fn children(&self, idx: VertexId) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        self.excident_edges(idx)
            .into_iter()
            .map(|e| e.target)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn is_empty_edges(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Search for a directed path from `start` back to itself.
    ///
    /// Depth-first with an explicit stack; each vertex is visited once.
    pub fn find_cycle_from(&self, start: VertexId) -> Option<Vec<String>> {
        let mut came_from: HashMap<VertexId, VertexId> = HashMap::new();
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            for child in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if child == start {
                    let mut path = self.trace_back(current, start, &came_from);
                    path.push(start);
                    return Some(path.iter().map(|&idx| self.graph[idx].key()).collect());
                }
                if visited.insert(child) {
                    came_from.insert(child, current);
                    stack.push(child);
                }
            }
        }
        None
    }

    /// Path from `from` to `to`, following `came_from` links backwards.
    fn trace_back(
        &self,
        to: VertexId,
        from: VertexId,
        came_from: &HashMap<VertexId, VertexId>,
    ) -> Vec<VertexId> {
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            match came_from.get(&current) {
                Some(&prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Vertices in dependency-first topological order (parents before children).
    pub fn topological_order(&self) -> Result<Vec<VertexId>, GraphError> {
        toposort(&self.graph, None).map_err(|c| {
            let node = c.node_id();
            GraphError::Cycle {
                cycle: self
                    .find_cycle_from(node)
                    .unwrap_or_else(|| vec![self.graph[node].key()]),
            }
        })
    }

    /// Find the shortest path from the entry vertex to a specific vertex.
    ///
    /// Accepts either `group:artifact` or just `artifact` (partial match).
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&ArtifactMetadata>> {
        let entry = self.entry?;
        let target = self.resolve_key(target_key)?;

        let mut came_from: HashMap<VertexId, VertexId> = HashMap::new();
        let mut visited = HashSet::from([entry]);
        let mut queue = VecDeque::from([entry]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                let path = self.trace_back(target, entry, &came_from);
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
            for child in self.children(current) {
                if visited.insert(child) {
                    came_from.insert(child, current);
                    queue.push_back(child);
                }
            }
        }
        None
    }

    /// Resolve a user-provided key to a vertex.
    ///
    /// Tries exact `group:artifact` first, then falls back to the first
    /// vertex (in insertion order) whose artifact name matches.
    pub fn resolve_key(&self, key: &str) -> Option<VertexId> {
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].artifact == key)
    }

    /// Render the graph from the entry vertex, one line per edge.
    ///
    /// Each line shows the child and the version requested by that edge,
    /// followed by its scope when it is not `compile`.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let Some(entry) = self.entry else {
            return output;
        };
        let _ = writeln!(output, "{}", self.graph[entry]);

        let mut on_path = HashSet::new();
        on_path.insert(entry);
        let edges = self.excident_edges(entry);
        let count = edges.len();
        for (i, edge) in edges.iter().enumerate() {
            self.print_subtree(&mut output, edge, "", i == count - 1, 1, max_depth, &mut on_path);
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        edge: &GraphEdge<'_>,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        on_path: &mut HashSet<VertexId>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let child = &self.graph[edge.target];
        let _ = write!(output, "{prefix}{connector}{}:{}", child.key(), edge.weight.version);
        match edge.weight.effective_scope() {
            ArtifactScope::Compile => output.push('\n'),
            scope => {
                let _ = writeln!(output, " ({scope})");
            }
        }

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !on_path.insert(edge.target) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let edges = self.excident_edges(edge.target);
        let count = edges.len();
        for (i, next) in edges.iter().enumerate() {
            self.print_subtree(
                output,
                next,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                on_path,
            );
        }

        on_path.remove(&edge.target);
    }

    /// Render everything that pulls in a single vertex (reverse edges).
    ///
    /// Accepts either `group:artifact` or just `artifact` (partial match).
    pub fn print_inverted_tree(&self, target_key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(target_key) else {
            return output;
        };
        let _ = writeln!(output, "{}", self.graph[idx]);

        let mut visited = HashSet::new();
        visited.insert(idx);
        let parents = self.parents(idx);
        let count = parents.len();
        for (i, parent) in parents.iter().enumerate() {
            self.print_inverted_subtree(&mut output, *parent, "", i == count - 1, &mut visited);
        }
        output
    }

    fn parents(&self, idx: VertexId) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        self.incident_edges(idx)
            .into_iter()
            .map(|e| e.source)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: VertexId,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<VertexId>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let _ = writeln!(output, "{prefix}{connector}{}", self.graph[idx]);

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let parents = self.parents(idx);
        let count = parents.len();
        for (i, parent) in parents.iter().enumerate() {
            self.print_inverted_subtree(output, *parent, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }
}
