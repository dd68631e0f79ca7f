//! Time-travel view of a keyword graph
//!
//! [`filter_as_of`] derives the part of a graph that existed at a cutoff
//! instant. It is a linear scan over the capped node and link lists, cheap
//! enough to run every replay frame. [`ReplayTimeline`] turns slider
//! positions and wall-clock deltas into cutoffs.

use chatgalaxy_records::{Graph, GraphLink, GraphNode};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Playback speeds offered by the replay driver
pub const SPEEDS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// Nodes and links visible at one cutoff
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub cutoff: i64,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphSnapshot {
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Nodes with `first_seen <= cutoff`, and links whose endpoints are both
/// visible. The source graph is left untouched.
pub fn filter_as_of(graph: &Graph, cutoff: i64) -> GraphSnapshot {
    let nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| n.first_seen <= cutoff)
        .cloned()
        .collect();

    let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links = graph
        .links
        .iter()
        .filter(|l| visible.contains(l.source.as_str()) && visible.contains(l.target.as_str()))
        .cloned()
        .collect();

    GraphSnapshot {
        cutoff,
        nodes,
        links,
    }
}

/// Replay range `[start, end]` in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayTimeline {
    pub start: i64,
    pub end: i64,
}

impl ReplayTimeline {
    /// Range spanned by the nodes' first-seen instants; `None` for a graph
    /// without nodes
    pub fn from_graph(graph: &Graph) -> Option<Self> {
        let start = graph.nodes.iter().map(|n| n.first_seen).min()?;
        let end = graph.nodes.iter().map(|n| n.first_seen).max()?;
        Some(Self { start, end })
    }

    /// Saturates on extreme first-seen values from a stored graph
    pub fn span(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Exact span; i128 holds any difference of two i64 values
    fn full_span(&self) -> i128 {
        i128::from(self.end) - i128::from(self.start)
    }

    /// Cutoff for a slider position in percent, clamped to 0..=100
    pub fn cutoff_at(&self, percent: f64) -> i64 {
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        let offset = (self.full_span() as f64 * fraction).round() as i128;
        let (start, end) = (i128::from(self.start), i128::from(self.end));
        (start + offset).clamp(start, end) as i64
    }

    /// Slider position of a cutoff
    pub fn percent_at(&self, cutoff: i64) -> f64 {
        let full = self.full_span();
        if full <= 0 {
            return 100.0;
        }
        let clamped = cutoff.clamp(self.start, self.end);
        (i128::from(clamped) - i128::from(self.start)) as f64 / full as f64 * 100.0
    }

    /// Move `cutoff` forward by `elapsed` wall-clock time scaled by `speed`.
    /// Returns the new cutoff and whether playback reached the end.
    pub fn advance(&self, cutoff: i64, elapsed: Duration, speed: f64) -> (i64, bool) {
        let step = (elapsed.as_secs_f64() * speed.max(0.0)).round() as i64;
        let next = cutoff.saturating_add(step).max(self.start);
        if next >= self.end {
            (self.end, true)
        } else {
            (next, false)
        }
    }
}
