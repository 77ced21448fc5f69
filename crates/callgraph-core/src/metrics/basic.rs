//! Degree-based metrics: fan-in/out averages, hotspots, and call depth.
//!
//! All metrics read the builder's forward/reverse adjacency, so parallel
//! call sites between the same pair count once.

use serde::{Deserialize, Serialize};

use crate::graph::{GraphBuilder, TraversalOptions, Visitor};
use crate::model::NodeId;

/// A node with many distinct callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub node_id: NodeId,
    pub name: String,
    pub fan_in: usize,
    pub fan_out: usize,
}

/// Mean number of distinct callees per node. Zero for an empty graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_fan_out(graph: &GraphBuilder) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }
    let total: usize = graph.nodes().map(|node| graph.fan_out(node.id.as_str())).sum();
    total as f64 / n as f64
}

/// Mean number of distinct callers per node. Zero for an empty graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_fan_in(graph: &GraphBuilder) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }
    let total: usize = graph.nodes().map(|node| graph.fan_in(node.id.as_str())).sum();
    total as f64 / n as f64
}

/// Top `limit` nodes by fan-in, ties broken by insertion order.
///
/// Nodes nobody calls are never hotspots.
#[must_use]
pub fn hotspots(graph: &GraphBuilder, limit: usize) -> Vec<Hotspot> {
    let mut ranked: Vec<Hotspot> = graph
        .nodes()
        .filter_map(|node| {
            let fan_in = graph.fan_in(node.id.as_str());
            (fan_in > 0).then(|| Hotspot {
                node_id: node.id.clone(),
                name: node.name.clone(),
                fan_in,
                fan_out: graph.fan_out(node.id.as_str()),
            })
        })
        .collect();

    // Stable sort keeps insertion order among equal fan-in.
    ranked.sort_by(|a, b| b.fan_in.cmp(&a.fan_in));
    ranked.truncate(limit);
    ranked
}

/// Ids of nodes with no callers.
#[must_use]
pub fn pseudo_roots(graph: &GraphBuilder) -> Vec<&NodeId> {
    graph
        .nodes()
        .filter(|node| graph.fan_in(node.id.as_str()) == 0)
        .map(|node| &node.id)
        .collect()
}

#[derive(Default)]
struct DeepestVisit(usize);

impl Visitor for DeepestVisit {
    fn on_node(&mut self, _id: &NodeId, depth: usize) {
        self.0 = self.0.max(depth);
    }
}

/// Largest DFS depth reached from any pseudo-root.
///
/// When every node has a caller (the graph is one big tangle of cycles),
/// every node is used as a root instead. Depth is DFS tree depth, so it is
/// a lower bound on the longest simple call chain.
#[must_use]
pub fn max_depth(graph: &GraphBuilder) -> usize {
    let mut roots = pseudo_roots(graph);
    if roots.is_empty() {
        roots = graph.nodes().map(|node| &node.id).collect();
    }

    let options = TraversalOptions::unbounded();
    roots
        .into_iter()
        .map(|root| {
            let mut deepest = DeepestVisit::default();
            graph.traverse_dfs(root.as_str(), &options, &mut deepest);
            deepest.0
        })
        .max()
        .unwrap_or(0)
}
