//! Dependency graph analytics
//!
//! Read-only measures over a [`DependencyGraph`]: size and density, cycles
//! and strongly connected components, topological structure, and node
//! centrality.

use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

use petgraph::algo::{page_rank, tarjan_scc, toposort};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::graph::DependencyGraph;

pub const PAGERANK_DAMPING: f64 = 0.85;
pub const PAGERANK_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub is_dag: bool,
}

pub fn summary(graph: &DependencyGraph) -> GraphSummary {
    let nodes = graph.node_count();
    let edges = graph.edge_count();
    let density = if nodes < 2 {
        0.0
    } else {
        edges as f64 / (nodes * (nodes - 1)) as f64
    };
    GraphSummary {
        nodes,
        edges,
        density,
        is_dag: toposort(graph.graph(), None).is_ok(),
    }
}

/// Strongly connected components, largest first.
///
/// Names inside a component are sorted; ties between components of the same
/// size are broken by their first name.
pub fn strongly_connected_components(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut components: Vec<Vec<String>> = tarjan_scc(graph.graph())
        .into_iter()
        .map(|component| {
            let mut names = names_of(graph, &component);
            names.sort();
            names
        })
        .collect();
    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    components
}

/// Elementary cycles, each starting at its lowest-indexed node.
pub fn cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let g = graph.graph();
    let mut found = Vec::new();

    for start in g.node_indices() {
        let mut path = vec![start];
        let mut on_path = BTreeSet::from([start]);
        let mut stack = vec![successors_from(graph, start, start)];

        while let Some(frontier) = stack.last_mut() {
            let Some(next) = frontier.pop() else {
                stack.pop();
                if let Some(left) = path.pop() {
                    on_path.remove(&left);
                }
                continue;
            };
            if next == start {
                found.push(names_of(graph, &path));
            } else if !on_path.contains(&next) {
                path.push(next);
                on_path.insert(next);
                stack.push(successors_from(graph, next, start));
            }
        }
    }
    found
}

/// Models in dependency order (each before the parents it requires), or
/// `None` when the graph has a cycle.
pub fn topological_order(graph: &DependencyGraph) -> Option<Vec<String>> {
    toposort(graph.graph(), None)
        .ok()
        .map(|order| names_of(graph, &order))
}

/// Longest require chain, or `None` when the graph has a cycle.
pub fn longest_path(graph: &DependencyGraph) -> Option<Vec<String>> {
    let g = graph.graph();
    let order = toposort(g, None).ok()?;
    let mut length = vec![0usize; g.node_count()];
    let mut previous: Vec<Option<NodeIndex>> = vec![None; g.node_count()];

    for &node in &order {
        for edge in g.edges_directed(node, Direction::Outgoing) {
            let target = edge.target();
            if length[node.index()] + 1 > length[target.index()] {
                length[target.index()] = length[node.index()] + 1;
                previous[target.index()] = Some(node);
            }
        }
    }

    let Some(mut end) = order
        .iter()
        .copied()
        .max_by(|a, b| length[a.index()].cmp(&length[b.index()]).then(b.cmp(a)))
    else {
        return Some(Vec::new());
    };

    let mut path = vec![end];
    while let Some(before) = previous[end.index()] {
        path.push(before);
        end = before;
    }
    path.reverse();
    Some(names_of(graph, &path))
}

/// Average shortest-path length inside the largest strongly connected
/// component.
pub fn average_path_length(graph: &DependencyGraph) -> f64 {
    let Some(component) = tarjan_scc(graph.graph())
        .into_iter()
        .max_by_key(|component| component.len())
    else {
        return 0.0;
    };
    let members: BTreeSet<NodeIndex> = component.iter().copied().collect();
    let k = members.len();
    if k < 2 {
        return 0.0;
    }

    let g = graph.graph();
    let mut total = 0usize;
    for &source in &members {
        let mut distance = vec![usize::MAX; g.node_count()];
        distance[source.index()] = 0;
        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            for next in g.neighbors_directed(node, Direction::Outgoing) {
                if members.contains(&next) && distance[next.index()] == usize::MAX {
                    distance[next.index()] = distance[node.index()] + 1;
                    total += distance[next.index()];
                    queue.push_back(next);
                }
            }
        }
    }
    total as f64 / (k * (k - 1)) as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct Centrality {
    /// How many models require each model.
    pub in_degree: Vec<(String, usize)>,
    /// How many parents each model requires.
    pub out_degree: Vec<(String, usize)>,
    pub betweenness: Vec<(String, f64)>,
    pub pagerank: Vec<(String, f64)>,
}

/// Centrality measures, each ranked highest first (ties by name).
pub fn centrality(graph: &DependencyGraph) -> Centrality {
    let g = graph.graph();
    let name = |index: NodeIndex| g[index].name.clone();

    let in_degree = ranked(
        g.node_indices()
            .map(|n| (name(n), g.neighbors_directed(n, Direction::Incoming).count()))
            .collect(),
    );
    let out_degree = ranked(
        g.node_indices()
            .map(|n| (name(n), g.neighbors_directed(n, Direction::Outgoing).count()))
            .collect(),
    );

    let between = betweenness(graph);
    let betweenness = ranked_f64(g.node_indices().map(|n| (name(n), between[n.index()])).collect());

    let ranks = if g.node_count() == 0 {
        Vec::new()
    } else {
        page_rank(g, PAGERANK_DAMPING, PAGERANK_ITERATIONS)
    };
    let pagerank = ranked_f64(g.node_indices().map(|n| (name(n), ranks[n.index()])).collect());

    Centrality {
        in_degree,
        out_degree,
        betweenness,
        pagerank,
    }
}

/// Normalized betweenness centrality of every node (Brandes, unweighted).
pub fn betweenness(graph: &DependencyGraph) -> Vec<f64> {
    let g = graph.graph();
    let n = g.node_count();
    let mut score = vec![0.0f64; n];

    for source in g.node_indices() {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut paths = vec![0.0f64; n];
        let mut distance = vec![-1i64; n];
        paths[source.index()] = 1.0;
        distance[source.index()] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for w in g.neighbors_directed(v, Direction::Outgoing) {
                if distance[w.index()] < 0 {
                    distance[w.index()] = distance[v.index()] + 1;
                    queue.push_back(w);
                }
                if distance[w.index()] == distance[v.index()] + 1 {
                    paths[w.index()] += paths[v.index()];
                    predecessors[w.index()].push(v);
                }
            }
        }

        let mut dependency = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w.index()] {
                dependency[v.index()] +=
                    paths[v.index()] / paths[w.index()] * (1.0 + dependency[w.index()]);
            }
            if w != source {
                score[w.index()] += dependency[w.index()];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in &mut score {
            *value *= scale;
        }
    }
    score
}

fn successors_from(graph: &DependencyGraph, node: NodeIndex, start: NodeIndex) -> Vec<NodeIndex> {
    let mut next: Vec<NodeIndex> = graph
        .graph()
        .neighbors_directed(node, Direction::Outgoing)
        .filter(|n| *n >= start)
        .collect();
    next.sort_unstable_by(|a, b| b.cmp(a));
    next.dedup();
    next
}

fn names_of(graph: &DependencyGraph, nodes: &[NodeIndex]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| graph.graph()[*n].name.clone())
        .collect()
}

fn ranked(mut values: Vec<(String, usize)>) -> Vec<(String, usize)> {
    values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    values
}

fn ranked_f64(mut values: Vec<(String, f64)>) -> Vec<(String, f64)> {
    values.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    values
}
