//! Analyse use case
//!
//! Runs one of the graph analytics and packages the answer as a report
//! that the presentation layer prints as text or as one NDJSON event.

use std::path::Path;

use serde::Serialize;

use crate::domain::ports::DocumentSource;
use crate::domain::services::analysis;
use crate::domain::services::{DependencyGraph, GraphBuilder};
use crate::error::FactoryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Graph,
    Cycles,
    Structure,
    Centrality,
    PathLength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisReport {
    Graph {
        nodes: usize,
        edges: usize,
        density: f64,
        is_dag: bool,
        warnings: Vec<String>,
    },
    Cycles {
        cycles: Vec<Vec<String>>,
        /// Components with more than one model.
        components: Vec<Vec<String>>,
    },
    Structure {
        /// Models nothing requires.
        leaves: Vec<String>,
        /// Models that require nothing.
        roots: Vec<String>,
        topological_order: Option<Vec<String>>,
        longest_path: Option<Vec<String>>,
    },
    Centrality {
        in_degree: Vec<(String, usize)>,
        out_degree: Vec<(String, usize)>,
        betweenness: Vec<(String, f64)>,
        pagerank: Vec<(String, f64)>,
    },
    PathLength {
        component_size: usize,
        average_shortest_path: f64,
    },
}

/// Build the require graph of `target` against `source_root`.
pub fn load_graph<S: DocumentSource>(
    source: S,
    source_root: &Path,
    extension: &str,
    target: &Path,
) -> FactoryResult<DependencyGraph> {
    let graph = GraphBuilder::new(source, source_root)
        .with_extension(extension)
        .build(target)?;
    Ok(graph)
}

pub fn analyse(graph: &DependencyGraph, kind: AnalysisKind) -> AnalysisReport {
    match kind {
        AnalysisKind::Graph => {
            let summary = analysis::summary(graph);
            AnalysisReport::Graph {
                nodes: summary.nodes,
                edges: summary.edges,
                density: summary.density,
                is_dag: summary.is_dag,
                warnings: graph.warnings().iter().map(ToString::to_string).collect(),
            }
        }
        AnalysisKind::Cycles => AnalysisReport::Cycles {
            cycles: analysis::cycles(graph),
            components: analysis::strongly_connected_components(graph)
                .into_iter()
                .filter(|component| component.len() > 1)
                .collect(),
        },
        AnalysisKind::Structure => {
            let mut leaves = Vec::new();
            let mut roots = Vec::new();
            for name in graph.names() {
                if graph.children(name).is_empty() {
                    leaves.push(name.to_string());
                }
                if graph.parents(name).is_empty() {
                    roots.push(name.to_string());
                }
            }
            AnalysisReport::Structure {
                leaves,
                roots,
                topological_order: analysis::topological_order(graph),
                longest_path: analysis::longest_path(graph),
            }
        }
        AnalysisKind::Centrality => {
            let centrality = analysis::centrality(graph);
            AnalysisReport::Centrality {
                in_degree: centrality.in_degree,
                out_degree: centrality.out_degree,
                betweenness: centrality.betweenness,
                pagerank: centrality.pagerank,
            }
        }
        AnalysisKind::PathLength => AnalysisReport::PathLength {
            component_size: analysis::strongly_connected_components(graph)
                .first()
                .map_or(0, Vec::len),
            average_shortest_path: analysis::average_path_length(graph),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::source::InMemoryDocumentSource;

    fn graph(documents: &[(&str, &str)]) -> DependencyGraph {
        let source = documents
            .iter()
            .fold(InMemoryDocumentSource::new(), |source, (path, yaml)| {
                source.with_document(path, *yaml)
            });
        load_graph(&source, Path::new("defs"), "yaml", Path::new("defs")).unwrap()
    }

    fn chain() -> DependencyGraph {
        graph(&[
            ("defs/a.yaml", "name: A\n"),
            ("defs/b.yaml", "name: B\nrequire: a\n"),
            ("defs/c.yaml", "name: C\nrequire: b\n"),
        ])
    }

    #[test]
    fn graph_summary_reports_warnings() {
        let graph = graph(&[("defs/a.yaml", "name: A\nrequire: gone\n")]);

        let AnalysisReport::Graph {
            nodes, warnings, ..
        } = analyse(&graph, AnalysisKind::Graph)
        else {
            panic!("expected a graph report");
        };

        assert_eq!(nodes, 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("gone"));
    }

    #[test]
    fn structure_of_a_chain() {
        let report = analyse(&chain(), AnalysisKind::Structure);

        assert_eq!(
            report,
            AnalysisReport::Structure {
                leaves: vec!["C".to_string()],
                roots: vec!["A".to_string()],
                topological_order: Some(vec!["C".into(), "B".into(), "A".into()]),
                longest_path: Some(vec!["C".into(), "B".into(), "A".into()]),
            }
        );
    }

    #[test]
    fn cycles_are_listed_with_their_component() {
        let graph = graph(&[
            ("defs/a.yaml", "name: A\nrequire: b\n"),
            ("defs/b.yaml", "name: B\nrequire: a\n"),
            ("defs/c.yaml", "name: C\nrequire: a\n"),
        ]);

        let AnalysisReport::Cycles { cycles, components } = analyse(&graph, AnalysisKind::Cycles)
        else {
            panic!("expected a cycles report");
        };

        assert_eq!(cycles.len(), 1);
        assert_eq!(components, vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn path_length_of_an_acyclic_graph_is_zero() {
        let report = analyse(&chain(), AnalysisKind::PathLength);

        assert_eq!(
            report,
            AnalysisReport::PathLength {
                component_size: 1,
                average_shortest_path: 0.0,
            }
        );
    }

    #[test]
    fn report_serializes_with_its_kind() {
        let json = serde_json::to_value(analyse(&chain(), AnalysisKind::Graph)).unwrap();

        assert_eq!(json["analysis"], "graph");
        assert_eq!(json["edges"], 2);
    }
}
