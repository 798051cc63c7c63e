//! Visualise use case
//!
//! Renders the require graph as Graphviz DOT or as a node-link JSON
//! document. Layout and drawing are left to external tools.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::domain::services::{DependencyGraph, ModelNode, RequireEdge};
use crate::error::FactoryResult;

/// Which rendering to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphView {
    /// Plain DOT, one labelled node per model.
    Graph,
    /// DOT with colour, tooltip and category attributes.
    Attributed,
    /// Node-link JSON.
    NodeLink,
    /// DOT ranked by require depth, roots at the bottom.
    Hierarchical,
}

pub fn render_graph(graph: &DependencyGraph, view: GraphView) -> FactoryResult<String> {
    let rendered = match view {
        GraphView::Graph => format!(
            "{}",
            Dot::with_config(graph.graph(), &[Config::EdgeNoLabel])
        ),
        GraphView::Attributed => render_attributed(graph),
        GraphView::NodeLink => {
            let mut json = serde_json::to_string_pretty(&NodeLink::from_graph(graph))?;
            json.push('\n');
            json
        }
        GraphView::Hierarchical => render_hierarchical(graph),
    };
    Ok(rendered)
}

fn render_attributed(graph: &DependencyGraph) -> String {
    let g = graph.graph();
    let node_attributes = |_: &DiGraph<ModelNode, RequireEdge>,
                           (_, node): (NodeIndex, &ModelNode)|
     -> String {
        let mut attributes = format!("style = filled fillcolor = \"{}\" ", escape(&node.color));
        if let Some(description) = &node.description {
            let _ = write!(attributes, "tooltip = \"{}\" ", escape(description));
        }
        if !node.is_loaded() {
            attributes.push_str("shape = box ");
        }
        attributes
    };
    let edge_attributes = |_: &DiGraph<ModelNode, RequireEdge>,
                           edge: EdgeReference<'_, RequireEdge>|
     -> String {
        match edge.weight().category.as_deref() {
            Some(category) => format!("label = \"{}\" ", escape(category)),
            None => String::new(),
        }
    };
    format!(
        "{}",
        Dot::with_attr_getters(g, &[Config::EdgeNoLabel], &edge_attributes, &node_attributes)
    )
}

fn render_hierarchical(graph: &DependencyGraph) -> String {
    let g = graph.graph();
    let depth = require_depths(graph);

    let mut ranks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in g.node_indices() {
        ranks.entry(depth[node.index()]).or_default().push(node.index());
    }

    let mut out = String::from("digraph {\n    rankdir = BT\n");
    for node in g.node_indices() {
        let weight = &g[node];
        let _ = writeln!(
            out,
            "    {} [ label = \"{}\" fillcolor = \"{}\" style = filled ]",
            node.index(),
            escape(&weight.display_label()),
            escape(&weight.color)
        );
    }
    for (rank, members) in &ranks {
        let ids: Vec<String> = members.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "    subgraph rank_{} {{ rank = same; {}; }}",
            rank,
            ids.join("; ")
        );
    }
    for edge in g.edge_references() {
        let _ = writeln!(
            out,
            "    {} -> {}",
            edge.source().index(),
            edge.target().index()
        );
    }
    out.push_str("}\n");
    out
}

/// Length of the longest require chain above each model; roots are 0.
///
/// Cycles stop growing once every model has been relaxed `n` times.
fn require_depths(graph: &DependencyGraph) -> Vec<usize> {
    let g = graph.graph();
    let n = g.node_count();
    let mut depth = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for node in g.node_indices() {
            let deepest_parent = g
                .neighbors_directed(node, Direction::Outgoing)
                .map(|parent| depth[parent.index()] + 1)
                .max()
                .unwrap_or(0)
                .min(n);
            if deepest_parent > depth[node.index()] {
                depth[node.index()] = deepest_parent;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    depth
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Node-link document in the layout graph tools commonly read.
#[derive(Debug, Serialize)]
struct NodeLink<'a> {
    directed: bool,
    multigraph: bool,
    nodes: Vec<NodeEntry<'a>>,
    links: Vec<LinkEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeEntry<'a> {
    id: &'a str,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct LinkEntry<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

impl<'a> NodeLink<'a> {
    fn from_graph(graph: &'a DependencyGraph) -> Self {
        let g = graph.graph();
        let nodes = g
            .node_weights()
            .map(|node| NodeEntry {
                id: &node.name,
                label: node.display_label(),
                symbol: node.symbol.as_deref(),
                description: node.description.as_deref(),
                color: &node.color,
                path: node.path.as_ref().map(|p| p.display().to_string()),
            })
            .collect();
        let links = g
            .edge_references()
            .map(|edge| LinkEntry {
                source: &g[edge.source()].name,
                target: &g[edge.target()].name,
                category: edge.weight().category.as_deref(),
            })
            .collect();
        Self {
            directed: true,
            multigraph: false,
            nodes,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::GraphBuilder;
    use crate::infrastructure::source::InMemoryDocumentSource;
    use std::path::Path;

    fn graph() -> DependencyGraph {
        let source = InMemoryDocumentSource::new()
            .with_document(
                "defs/base.yaml",
                "name: base\nlabel: Base\nsymbol: B\ncolor: lightblue\n",
            )
            .with_document(
                "defs/solar/mid.yaml",
                "name: mid\nrequire: base\ndescription: Say \"hi\"\n",
            )
            .with_document("defs/leaf.yaml", "name: leaf\nrequire: solar/mid\n");
        GraphBuilder::new(&source, "defs")
            .build(Path::new("defs"))
            .unwrap()
    }

    #[test]
    fn plain_dot_labels_nodes() {
        let dot = render_graph(&graph(), GraphView::Graph).unwrap();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label = \"Base B\""));
        assert_eq!(dot.matches("->").count(), 2);
    }

    #[test]
    fn attributed_dot_carries_colour_and_tooltips() {
        let dot = render_graph(&graph(), GraphView::Attributed).unwrap();

        assert!(dot.contains("fillcolor = \"lightblue\""));
        assert!(dot.contains("tooltip = \"Say \\\"hi\\\"\""));
        assert!(dot.contains("label = \"solar\""));
    }

    #[test]
    fn node_link_lists_nodes_and_links() {
        let json = render_graph(&graph(), GraphView::NodeLink).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["directed"], true);
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
        let links = value["links"].as_array().unwrap();
        assert!(links
            .iter()
            .any(|link| link["source"] == "leaf" && link["target"] == "mid"));
    }

    #[test]
    fn hierarchy_ranks_by_depth() {
        let graph = graph();
        let depth = require_depths(&graph);
        let depth_of = |name: &str| depth[graph.index_of(name).unwrap().index()];

        assert_eq!(depth_of("base"), 0);
        assert_eq!(depth_of("mid"), 1);
        assert_eq!(depth_of("leaf"), 2);

        let dot = render_graph(&graph, GraphView::Hierarchical).unwrap();
        assert!(dot.contains("rankdir = BT"));
        assert!(dot.contains("rank = same"));
    }

    #[test]
    fn cyclic_depths_terminate() {
        let source = InMemoryDocumentSource::new()
            .with_document("defs/a.yaml", "name: a\nrequire: b\n")
            .with_document("defs/b.yaml", "name: b\nrequire: a\n");
        let graph = GraphBuilder::new(&source, "defs")
            .build(Path::new("defs"))
            .unwrap();

        let depth = require_depths(&graph);

        assert!(depth.iter().all(|&d| d <= graph.node_count()));
    }
}
