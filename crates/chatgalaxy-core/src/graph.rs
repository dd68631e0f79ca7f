//! Keyword co-occurrence graph construction
//!
//! Nodes are the most frequent keywords; an edge counts the messages in
//! which two node keywords appear together. The caps below are display
//! policy, kept as named constants because downstream layouts depend on the
//! exact counts they produce.

use crate::config::EngineConfig;
use crate::keywords::KeywordFrequency;
use chatgalaxy_records::{Graph, GraphLink, GraphNode, Message, NodeRef};
use std::collections::HashMap;

/// Node cap
pub const DEFAULT_MAX_NODES: usize = 500;
/// Pairs seen fewer times are dropped
pub const DEFAULT_MIN_EDGE_WEIGHT: u64 = 2;
/// Matched keywords considered per message, bounding pair increments to C(10, 2) = 45
pub const MAX_KEYWORDS_PER_MESSAGE: usize = 10;
/// Edge cap is this many times the node count
pub const EDGE_DENSITY_FACTOR: usize = 3;

const MIN_NODE_SIZE: f64 = 5.0;
const MAX_NODE_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLimits {
    pub max_nodes: usize,
    pub min_edge_weight: u64,
    pub max_keywords_per_message: usize,
    pub edge_density_factor: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            min_edge_weight: DEFAULT_MIN_EDGE_WEIGHT,
            max_keywords_per_message: MAX_KEYWORDS_PER_MESSAGE,
            edge_density_factor: EDGE_DENSITY_FACTOR,
        }
    }
}

impl From<&EngineConfig> for GraphLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_nodes: config.max_nodes,
            min_edge_weight: config.min_edge_weight,
            max_keywords_per_message: config.max_keywords_per_message,
            edge_density_factor: config.edge_density_factor,
        }
    }
}

/// Display size: `ln(count + 1) * 3`, clamped to [5, 20]
pub fn node_size(count: u64) -> f64 {
    ((count as f64 + 1.0).ln() * 3.0).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// Pair counter that remembers the order pairs were first seen in
#[derive(Debug, Default)]
struct PairCounts {
    pairs: Vec<((usize, usize), u64)>,
    index: HashMap<(usize, usize), usize>,
}

impl PairCounts {
    fn bump(&mut self, a: usize, b: usize) {
        let key = if a < b { (a, b) } else { (b, a) };
        match self.index.get(&key) {
            Some(&i) => self.pairs[i].1 += 1,
            None => {
                self.index.insert(key, self.pairs.len());
                self.pairs.push((key, 1));
            }
        }
    }
}

/// Build the bounded co-occurrence graph.
///
/// Deterministic for a given message order and frequency map: node ties fall
/// back to first-seen keyword order and edge ties to first-seen pair order.
pub fn build_graph(keywords: &KeywordFrequency, messages: &[Message], limits: &GraphLimits) -> Graph {
    let top = keywords.top(limits.max_nodes);

    let nodes: Vec<GraphNode> = top
        .iter()
        .enumerate()
        .map(|(i, stat)| GraphNode {
            id: i.to_string(),
            name: stat.keyword.clone(),
            count: stat.count,
            val: node_size(stat.count),
            first_seen: stat.first_seen,
        })
        .collect();

    let node_index: HashMap<&str, usize> = top
        .iter()
        .enumerate()
        .map(|(i, stat)| (stat.keyword.as_str(), i))
        .collect();

    let mut counts = PairCounts::default();
    let mut matched: Vec<usize> = Vec::with_capacity(limits.max_keywords_per_message);
    for msg in messages {
        matched.clear();
        for kw in &msg.keywords {
            if matched.len() >= limits.max_keywords_per_message {
                break;
            }
            if let Some(&idx) = node_index.get(kw.as_str()) {
                if !matched.contains(&idx) {
                    matched.push(idx);
                }
            }
        }
        for i in 0..matched.len() {
            for j in (i + 1)..matched.len() {
                counts.bump(matched[i], matched[j]);
            }
        }
    }

    let mut links: Vec<GraphLink> = counts
        .pairs
        .into_iter()
        .filter(|&(_, weight)| weight >= limits.min_edge_weight)
        .map(|((a, b), weight)| GraphLink {
            source: NodeRef::from(a),
            target: NodeRef::from(b),
            value: weight,
            count: weight,
        })
        .collect();

    links.sort_by_key(|l| std::cmp::Reverse(l.value));
    links.truncate(nodes.len() * limits.edge_density_factor);

    tracing::debug!(
        "built graph: {} nodes, {} links from {} keywords",
        nodes.len(),
        links.len(),
        keywords.len()
    );

    Graph { nodes, links }
}
