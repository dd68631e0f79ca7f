//! Structural statistics over a keyword graph

use crate::report::{round1, MostConnected, NetworkStats};
use chatgalaxy_records::Graph;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Link endpoint degrees in the order endpoints are first met while scanning
/// links (source before target)
fn endpoint_degrees(graph: &Graph) -> Vec<(&str, u64)> {
    let mut degrees: Vec<(&str, u64)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for link in &graph.links {
        for id in [link.source.as_str(), link.target.as_str()] {
            match slots.get(id) {
                Some(&slot) => degrees[slot].1 += 1,
                None => {
                    slots.insert(id, degrees.len());
                    degrees.push((id, 1));
                }
            }
        }
    }
    degrees
}

/// Undirected weighted view over the node set. Links naming unknown nodes
/// are left out.
fn to_petgraph(graph: &Graph) -> UnGraph<(), u64> {
    let mut g = UnGraph::with_capacity(graph.nodes.len(), graph.links.len());
    let mut node_indices: HashMap<&str, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        let idx = g.add_node(());
        node_indices.insert(node.id.as_str(), idx);
    }
    for link in &graph.links {
        let source = node_indices.get(link.source.as_str());
        let target = node_indices.get(link.target.as_str());
        if let (Some(&s), Some(&t)) = (source, target) {
            g.add_edge(s, t, link.value.max(1));
        }
    }
    g
}

/// Newman modularity of a partition, weighted by link value
fn modularity(g: &UnGraph<(), u64>, communities: &[Vec<NodeIndex>]) -> f64 {
    let total_weight: u64 = g.edge_weights().sum();
    if total_weight == 0 {
        return 0.0;
    }
    let mut community_of = vec![0usize; g.node_count()];
    for (c, members) in communities.iter().enumerate() {
        for idx in members {
            community_of[idx.index()] = c;
        }
    }

    let mut internal = vec![0u64; communities.len()];
    let mut degree = vec![0u64; communities.len()];
    for edge in g.raw_edges() {
        let (a, b) = (edge.source().index(), edge.target().index());
        degree[community_of[a]] += edge.weight;
        degree[community_of[b]] += edge.weight;
        if community_of[a] == community_of[b] {
            internal[community_of[a]] += edge.weight;
        }
    }

    let m = total_weight as f64;
    internal
        .iter()
        .zip(&degree)
        .map(|(&l, &d)| l as f64 / m - (d as f64 / (2.0 * m)).powi(2))
        .sum()
}

/// Node/edge totals, degree summary and the component partition
pub fn network_stats(graph: &Graph) -> NetworkStats {
    let mut stats = NetworkStats {
        total_nodes: graph.nodes.len(),
        total_edges: graph.links.len(),
        ..NetworkStats::default()
    };

    let g = to_petgraph(graph);
    let components = kosaraju_scc(&g);
    stats.clusters = components.len();

    if graph.nodes.is_empty() || graph.links.is_empty() {
        return stats;
    }

    let degrees = endpoint_degrees(graph);
    let total: u64 = degrees.iter().map(|&(_, d)| d).sum();
    stats.avg_connections = round1(total as f64 / graph.nodes.len() as f64);

    let mut best: Option<(&str, u64)> = None;
    let mut max_connections = 0;
    for &(id, connections) in &degrees {
        if connections > max_connections {
            max_connections = connections;
            best = Some((id, connections));
        }
    }
    if let Some((id, connections)) = best {
        let name = graph
            .node(id)
            .map(|n| n.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(id);
        stats.most_connected = MostConnected {
            node: name.to_string(),
            connections,
        };
    }

    stats.modularity = (modularity(&g, &components) * 1000.0).round() / 1000.0;
    stats
}
