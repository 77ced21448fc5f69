//! Whole-graph complexity scores.

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::graph::GraphBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    /// `max(1, E - V + 2C)` over the whole call graph.
    pub cyclomatic_complexity: usize,
    /// `2 * cycles + floor(average fan-out)`.
    pub cognitive_complexity: usize,
}

/// Number of weakly connected components (edge direction ignored).
#[must_use]
pub fn weakly_connected_components(graph: &GraphBuilder) -> usize {
    let n = graph.node_count();
    if n == 0 {
        return 0;
    }

    let mut sets: UnionFind<usize> = UnionFind::new(n);
    for edge in graph.edges() {
        let (Some(a), Some(b)) = (
            graph.position_of(edge.source.as_str()),
            graph.position_of(edge.target.as_str()),
        ) else {
            continue;
        };
        sets.union(a, b);
    }

    let labels = sets.into_labeling();
    labels
        .iter()
        .enumerate()
        .filter(|&(index, &label)| index == label)
        .count()
}

/// McCabe-style complexity generalized to `C` components, floored at 1.
#[must_use]
pub fn cyclomatic_complexity(graph: &GraphBuilder) -> usize {
    let components = weakly_connected_components(graph);
    (graph.edge_count() + 2 * components)
        .saturating_sub(graph.node_count())
        .max(1)
}

#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn cognitive_complexity(cycle_count: usize, average_fan_out: f64) -> usize {
    cycle_count * 2 + average_fan_out.floor().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallKind, Edge, Node, NodeKind, SourceLocation};

    fn build(nodes: &[&str], edges: &[(&str, &str)]) -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        for &id in nodes {
            builder
                .add_node(Node::new(
                    id,
                    id,
                    SourceLocation::new("src/c.ts", 1),
                    NodeKind::Function,
                ))
                .expect("add node");
        }
        for (i, &(from, to)) in edges.iter().enumerate() {
            builder
                .add_edge(Edge::new(
                    format!("e{i}"),
                    from,
                    to,
                    CallKind::Sync,
                    SourceLocation::new("src/c.ts", 2),
                ))
                .expect("add edge");
        }
        builder
    }

    #[test]
    fn components_ignore_direction() {
        // a -> b <- c   (one component), d (isolated)
        let graph = build(&["a", "b", "c", "d"], &[("a", "b"), ("c", "b")]);
        assert_eq!(weakly_connected_components(&graph), 2);
    }

    #[test]
    fn empty_graph_has_no_components_and_unit_complexity() {
        let graph = build(&[], &[]);
        assert_eq!(weakly_connected_components(&graph), 0);
        assert_eq!(cyclomatic_complexity(&graph), 1);
    }

    #[test]
    fn cyclomatic_counts_independent_paths() {
        // Diamond: a -> b -> d, a -> c -> d  => 4 - 4 + 2 = 2
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert_eq!(cyclomatic_complexity(&graph), 2);
    }

    #[test]
    fn cyclomatic_scales_with_components() {
        // Two separate chains: 2 edges, 4 nodes, 2 components => 2 - 4 + 4 = 2
        let graph = build(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        assert_eq!(cyclomatic_complexity(&graph), 2);
    }

    #[test]
    fn cognitive_floors_fan_out() {
        assert_eq!(cognitive_complexity(0, 1.9), 1);
        assert_eq!(cognitive_complexity(3, 0.5), 6);
        assert_eq!(cognitive_complexity(0, 0.0), 0);
    }
}
