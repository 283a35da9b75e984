use super::interactions::residue_pairs;
use crate::core::models::interaction::{Bridge, Interaction};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Undirected residue graph: one node per residue label, one edge per distinct
/// (aromatic, methionine) pair.
pub fn build_graph(interactions: &[Interaction]) -> UnGraph<String, ()> {
    let edges = residue_pairs(interactions);
    let labels: BTreeSet<&String> = edges.iter().flat_map(|(a, m)| [a, m]).collect();

    let mut graph = UnGraph::with_capacity(labels.len(), edges.len());
    let indices: BTreeMap<&String, NodeIndex> = labels
        .into_iter()
        .map(|label| (label, graph.add_node(label.clone())))
        .collect();
    for (aromatic, methionine) in &edges {
        graph.add_edge(indices[aromatic], indices[methionine], ());
    }
    graph
}

/// Connected components whose node count is exactly `size`.
///
/// Components are selected by size alone, so a hub (one residue bonded to `size - 1`
/// others) is reported alongside true chains. The result is sorted.
pub fn run(interactions: &[Interaction], size: usize) -> Vec<Bridge> {
    let graph = build_graph(interactions);
    // Every edge of an undirected graph is traversable both ways, so strongly connected
    // components are the connected components.
    let components = tarjan_scc(&graph);
    let total = components.len();

    let mut bridges: Vec<Bridge> = components
        .into_iter()
        .filter(|component| component.len() == size)
        .map(|component| Bridge::new(component.into_iter().map(|index| graph[index].clone())))
        .collect();
    bridges.sort();

    debug!(
        components = total,
        size,
        bridges = bridges.len(),
        "Bridge extraction complete."
    );
    bridges
}
