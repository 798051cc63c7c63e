//! Dependency graph builder
//!
//! Builds the name-level require graph of a source tree: one node per model,
//! one edge from each model to every parent it requires. Nothing is merged;
//! the graph is a read model for analysis and rendering.
//!
//! A model reached a second time is skipped whether it was reached through a
//! cycle or through a shared ancestor. Unlike the resolver, the builder only
//! cares about reachability.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::domain::document::{Document, RequireRef};
use crate::domain::ports::{DocumentSource, LoadError};
use crate::domain::value::Value;

use super::resolver::DEFAULT_EXTENSION;

/// Colour of nodes that do not declare one.
pub const DEFAULT_NODE_COLOR: &str = "white";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub label: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub color: String,
    pub sections: Option<Value>,
    pub path: Option<PathBuf>,
}

impl ModelNode {
    /// Node known only as the target of an edge so far.
    fn stub(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            symbol: None,
            description: None,
            color: DEFAULT_NODE_COLOR.to_string(),
            sections: None,
            path: None,
        }
    }

    fn fill_from(&mut self, document: &Document) {
        self.label = document.attribute("label").map(str::to_string);
        self.symbol = document.attribute("symbol").map(str::to_string);
        self.description = document.attribute("description").map(str::to_string);
        self.color = document
            .attribute("color")
            .unwrap_or(DEFAULT_NODE_COLOR)
            .to_string();
        self.sections = document.body().get("sections").cloned();
        self.path = Some(document.path().to_path_buf());
    }

    /// `label` and `symbol` joined for display, falling back to the name.
    pub fn display_label(&self) -> String {
        let text = [self.label.as_deref(), self.symbol.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            self.name.clone()
        } else {
            text
        }
    }

    /// False for nodes that were referenced but never loaded.
    pub fn is_loaded(&self) -> bool {
        self.path.is_some()
    }
}

impl std::fmt::Display for ModelNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireEdge {
    /// Directory of the parent reference, e.g. `direct` for `irradiance/direct/normal`.
    pub category: Option<String>,
}

impl std::fmt::Display for RequireEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    MissingParent {
        parent: RequireRef,
        required_by: String,
    },
    Unloadable {
        path: PathBuf,
        message: String,
    },
}

impl std::fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphWarning::MissingParent {
                parent,
                required_by,
            } => write!(f, "{} requires missing definition '{}'", required_by, parent),
            GraphWarning::Unloadable { path, message } => {
                write!(f, "skipped {}: {}", path.display(), message)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("cannot scan {path}: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<ModelNode, RequireEdge>,
    index: HashMap<String, NodeIndex>,
    warnings: Vec<GraphWarning>,
}

impl DependencyGraph {
    pub fn graph(&self) -> &DiGraph<ModelNode, RequireEdge> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&ModelNode> {
        self.index_of(name).map(|index| &self.graph[index])
    }

    /// Model names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|index| self.graph[index].name.as_str())
            .collect()
    }

    /// Models `name` requires.
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Models that require `name`.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    pub fn has_edge(&self, child: &str, parent: &str) -> bool {
        match (self.index_of(child), self.index_of(parent)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(index) = self.index_of(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|n| self.graph[n].name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(index) = self.index.get(name) {
            return *index;
        }
        let index = self.graph.add_node(ModelNode::stub(name));
        self.index.insert(name.to_string(), index);
        index
    }
}

pub struct GraphBuilder<S: DocumentSource> {
    source: S,
    source_root: PathBuf,
    extension: String,
}

impl<S: DocumentSource> GraphBuilder<S> {
    pub fn new(source: S, source_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            source_root: source_root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Build the graph of `target`, a single definition file or a directory.
    pub fn build(&self, target: &Path) -> Result<DependencyGraph, GraphError> {
        let files = self
            .source
            .discover(target)
            .map_err(|source| GraphError::Discover {
                path: target.to_path_buf(),
                source,
            })?;

        let mut graph = DependencyGraph::default();
        let mut visited: HashMap<RequireRef, String> = HashMap::new();
        let mut queue: VecDeque<Pending> = files
            .into_iter()
            .map(|path| Pending::new(RequireRef::from_path(&self.source_root, &path), path))
            .collect();

        while let Some(pending) = queue.pop_front() {
            if visited.contains_key(&pending.reference) {
                tracing::trace!(reference = %pending.reference, "already processed");
                continue;
            }
            self.process(&mut graph, &mut visited, &mut queue, pending);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );
        Ok(graph)
    }

    fn process(
        &self,
        graph: &mut DependencyGraph,
        visited: &mut HashMap<RequireRef, String>,
        queue: &mut VecDeque<Pending>,
        pending: Pending,
    ) {
        let Pending {
            reference,
            path,
            loaded,
        } = pending;
        let document = match loaded.unwrap_or_else(|| self.source.load(&path)) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = %path.display(), "{}", err);
                graph.warnings.push(GraphWarning::Unloadable {
                    path,
                    message: err.to_string(),
                });
                visited.insert(reference, String::new());
                return;
            }
        };

        let name = document.name().as_str().to_string();
        visited.insert(reference, name.clone());
        let node = graph.ensure_node(&name);
        graph.graph[node].fill_from(&document);

        for parent in document.requires() {
            let parent_path = parent.to_path(&self.source_root, &self.extension);
            if !self.source.exists(&parent_path) {
                tracing::warn!(parent = %parent, child = %name, "missing parent");
                graph.warnings.push(GraphWarning::MissingParent {
                    parent: parent.clone(),
                    required_by: name.clone(),
                });
                continue;
            }

            let parent_name = match visited.get(parent) {
                Some(known) if !known.is_empty() => known.clone(),
                Some(_) => continue,
                None => self.peek_parent(queue, parent, parent_path),
            };

            let parent_node = graph.ensure_node(&parent_name);
            graph.graph.update_edge(
                node,
                parent_node,
                RequireEdge {
                    category: parent.category().map(str::to_string),
                },
            );
        }
    }

    /// Name of a parent not processed yet. The load is kept on its queue
    /// entry, so the parent is read once.
    fn peek_parent(
        &self,
        queue: &mut VecDeque<Pending>,
        reference: &RequireRef,
        path: PathBuf,
    ) -> String {
        let position = match queue.iter().position(|p| &p.reference == reference) {
            Some(position) => position,
            None => {
                queue.push_back(Pending::new(reference.clone(), path));
                queue.len() - 1
            }
        };
        let Pending { path, loaded, .. } = &mut queue[position];
        match loaded.get_or_insert_with(|| self.source.load(path)) {
            Ok(document) => document.name().as_str().to_string(),
            Err(_) => reference.as_str().to_string(),
        }
    }
}

/// A queued definition, with its load result once a child has peeked at it.
struct Pending {
    reference: RequireRef,
    path: PathBuf,
    loaded: Option<Result<Document, LoadError>>,
}

impl Pending {
    fn new(reference: RequireRef, path: PathBuf) -> Self {
        Self {
            reference,
            path,
            loaded: None,
        }
    }
}
