//! Classpath assembly from a resolved graph.
//!
//! The transformer walks the resolved graph breadth-first from the entry
//! vertex and keeps every artifact whose edge scope the target scope
//! encloses. The walk re-applies the scope filter so that one resolved graph
//! can be transformed for several target scopes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use quiver_core::artifact::ArtifactMetadata;
use quiver_core::scope::ArtifactScope;
use quiver_util::errors::GraphError;

use crate::graph::MetadataGraph;
use crate::policy::{ConflictResolutionPolicy, DefaultPolicy};
use crate::resolver::GraphConflictResolver;

/// Ordered classpath for one target scope.
///
/// The first element is the entry artifact (the project being built);
/// [`dependencies`](Self::dependencies) returns everything after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathContainer {
    pub scope: ArtifactScope,
    #[serde(default, rename = "artifact")]
    classpath: Vec<ArtifactMetadata>,
}

/// A node of the classpath rebuilt as a tree from the `why` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathNode {
    pub artifact: ArtifactMetadata,
    pub children: Vec<ClasspathNode>,
}

impl ClasspathContainer {
    pub fn new(scope: ArtifactScope) -> Self {
        Self {
            scope,
            classpath: Vec::new(),
        }
    }

    /// Append an artifact unless one with the same key is already present.
    pub fn add(&mut self, md: ArtifactMetadata) -> bool {
        if self.find(&md.key()).is_some() {
            return false;
        }
        self.classpath.push(md);
        true
    }

    pub fn len(&self) -> usize {
        self.classpath.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classpath.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArtifactMetadata> {
        self.classpath.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtifactMetadata> {
        self.classpath.iter()
    }

    pub fn as_slice(&self) -> &[ArtifactMetadata] {
        &self.classpath
    }

    pub fn entry(&self) -> Option<&ArtifactMetadata> {
        self.classpath.first()
    }

    /// The classpath without the entry artifact.
    pub fn dependencies(&self) -> &[ArtifactMetadata] {
        self.classpath.get(1..).unwrap_or(&[])
    }

    /// Look up an artifact by `group:artifact`.
    pub fn find(&self, key: &str) -> Option<&ArtifactMetadata> {
        self.classpath.iter().find(|md| md.key() == key)
    }

    /// Rebuild the tree of who pulled in what.
    ///
    /// An artifact whose `why` names no earlier artifact hangs off the entry.
    pub fn as_tree(&self) -> Option<ClasspathNode> {
        if self.classpath.is_empty() {
            return None;
        }
        let position: HashMap<String, usize> = self
            .classpath
            .iter()
            .enumerate()
            .map(|(i, md)| (md.key(), i))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.classpath.len()];
        for (i, md) in self.classpath.iter().enumerate().skip(1) {
            let parent = md
                .why
                .as_ref()
                .and_then(|why| position.get(why))
                .copied()
                .filter(|&p| p < i)
                .unwrap_or(0);
            children[parent].push(i);
        }

        fn build(cp: &[ArtifactMetadata], children: &[Vec<usize>], i: usize) -> ClasspathNode {
            ClasspathNode {
                artifact: cp[i].clone(),
                children: children[i].iter().map(|&c| build(cp, children, c)).collect(),
            }
        }
        Some(build(&self.classpath, &children, 0))
    }

    /// Render [`as_tree`](Self::as_tree) with box-drawing connectors.
    pub fn print_tree(&self) -> String {
        let mut output = String::new();
        let Some(tree) = self.as_tree() else {
            return output;
        };
        let _ = writeln!(output, "{}", tree.artifact);
        let count = tree.children.len();
        for (i, child) in tree.children.iter().enumerate() {
            print_node(&mut output, child, "", i == count - 1);
        }
        output
    }

    /// Serialize the classpath to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String, GraphError> {
        toml::to_string_pretty(self).map_err(|e| GraphError::Generic {
            message: format!("Failed to serialize classpath: {e}"),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GraphError> {
        toml::from_str(content).map_err(|e| GraphError::Generic {
            message: format!("Failed to parse classpath: {e}"),
        })
    }
}

fn print_node(output: &mut String, node: &ClasspathNode, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let _ = write!(output, "{prefix}{connector}{}", node.artifact);
    match node.artifact.effective_scope() {
        ArtifactScope::Compile => output.push('\n'),
        scope => {
            let _ = writeln!(output, " ({scope})");
        }
    }
    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        print_node(output, child, &child_prefix, i == count - 1);
    }
}

impl<'a> IntoIterator for &'a ClasspathContainer {
    type Item = &'a ArtifactMetadata;
    type IntoIter = std::slice::Iter<'a, ArtifactMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.classpath.iter()
    }
}

/// Turns graphs into classpaths, resolving conflicts first when asked to.
#[derive(Debug, Clone, Default)]
pub struct ClasspathTransformer<P = DefaultPolicy> {
    resolver: GraphConflictResolver<P>,
}

impl ClasspathTransformer<DefaultPolicy> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ConflictResolutionPolicy> ClasspathTransformer<P> {
    pub fn with_resolver(resolver: GraphConflictResolver<P>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &GraphConflictResolver<P> {
        &self.resolver
    }

    /// Resolve conflicts in `graph` for `scope`, then transform the result.
    pub fn transform_graph(
        &self,
        graph: &MetadataGraph,
        scope: ArtifactScope,
    ) -> Result<ClasspathContainer, GraphError> {
        let resolution = self.resolver.resolve(graph, scope)?;
        transform(&resolution.graph, scope)
    }

    /// Transform an already resolved graph.
    pub fn transform(
        &self,
        resolved: &MetadataGraph,
        scope: ArtifactScope,
    ) -> Result<ClasspathContainer, GraphError> {
        transform(resolved, scope)
    }
}

/// Walk a resolved graph breadth-first and collect the classpath for `scope`.
///
/// Each vertex appears once, at its first discovery. Vertices reached only
/// through edges `scope` does not enclose are skipped.
#[tracing::instrument(skip_all, fields(scope = %scope))]
pub fn transform(
    resolved: &MetadataGraph,
    scope: ArtifactScope,
) -> Result<ClasspathContainer, GraphError> {
    resolved.topological_order()?;
    let entry = resolved.entry().ok_or(GraphError::MissingEntry)?;

    let mut container = ClasspathContainer::new(scope);
    container.add(resolved.vertex(entry).clone());

    let mut visited: HashSet<_> = HashSet::from([entry]);
    let mut queue = VecDeque::from([entry]);
    while let Some(vertex) = queue.pop_front() {
        for edge in resolved.excident_edges(vertex) {
            if !scope.encloses(edge.weight.scope) || !visited.insert(edge.target) {
                continue;
            }
            let mut md = resolved.vertex(edge.target).clone();
            if md.version.is_none() {
                md.version = Some(edge.weight.version.clone());
            }
            if md.scope.is_none() {
                md.scope = edge.weight.scope;
            }
            if md.why.is_none() {
                md.why = Some(resolved.vertex(vertex).key());
            }
            container.add(md);
            queue.push_back(edge.target);
        }
    }

    tracing::debug!("classpath for {scope}: {} entries", container.len());
    Ok(container)
}
