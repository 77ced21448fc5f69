//! Depth- and filter-bounded subgraph extraction.
//!
//! The extractor walks the source graph with a depth-bounded DFS, collects
//! visited nodes and tree edges, and replays the survivors into a fresh
//! [`GraphBuilder`] so the result obeys the same dedup rules as any other
//! graph.
//!
//! Filters are applied to nodes the walk has already reached. A node that
//! fails a filter is left out of the result but its descendants are still
//! explored, at the depth they would have had anyway. Edges are kept only
//! when their kind passes and both endpoints made it into the result, so a
//! filtered-out node never comes back as a placeholder.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::builder::GraphBuilder;
use super::traversal::{TraversalOptions, Visitor};
use crate::error::GraphError;
use crate::model::{CallGraph, CallKind, Edge, Node, NodeId, NodeKind};
use crate::pattern::Pattern;

/// Node and edge filters for [`GraphBuilder::subgraph`].
#[derive(Debug, Clone, Default)]
pub struct SubgraphFilters {
    /// Allowed node kinds. `None` allows every kind.
    pub node_kinds: Option<Vec<NodeKind>>,
    /// When non-empty, a node's file must match at least one pattern.
    pub include_files: Vec<Pattern>,
    /// A node whose file matches any of these is dropped.
    pub exclude_files: Vec<Pattern>,
    /// Allowed call kinds. `None` allows every kind.
    pub edge_kinds: Option<Vec<CallKind>>,
}

impl SubgraphFilters {
    #[must_use]
    pub fn admits_node(&self, node: &Node) -> bool {
        if self
            .node_kinds
            .as_ref()
            .is_some_and(|kinds| !kinds.contains(&node.kind))
        {
            return false;
        }

        let file = node.location.file.as_str();
        if !self.include_files.is_empty()
            && !self.include_files.iter().any(|pattern| pattern.matches(file))
        {
            return false;
        }

        !self.exclude_files.iter().any(|pattern| pattern.matches(file))
    }

    #[must_use]
    pub fn admits_edge(&self, edge: &Edge) -> bool {
        self.edge_kinds
            .as_ref()
            .is_none_or(|kinds| kinds.contains(&edge.kind))
    }
}

#[derive(Default)]
struct Collector<'a> {
    nodes: Vec<&'a NodeId>,
    edges: Vec<&'a Edge>,
}

impl GraphBuilder {
    /// Extract the part of the graph reachable from `entry` within
    /// `max_depth` hops, keeping only nodes and edges that pass `filters`.
    ///
    /// The result is an independent [`CallGraph`] whose entry point is
    /// `entry` when that node survived the filters. An unknown `entry`
    /// yields an empty graph.
    ///
    /// # Errors
    ///
    /// Propagates insertion errors from the fresh builder. Records that are
    /// already in this builder always pass validation, so this only fails if
    /// that invariant is broken.
    #[instrument(skip(self, filters))]
    pub fn subgraph(
        &self,
        entry: &str,
        max_depth: usize,
        filters: Option<&SubgraphFilters>,
    ) -> Result<CallGraph, GraphError> {
        let default_filters = SubgraphFilters::default();
        let filters = filters.unwrap_or(&default_filters);

        let mut collector = Collector::default();
        self.traverse_dfs(
            entry,
            &TraversalOptions::with_max_depth(max_depth),
            &mut CollectVisitor {
                graph: self,
                collector: &mut collector,
            },
        );

        let mut result = GraphBuilder::new();
        let mut admitted: HashSet<&str> = HashSet::new();
        for &id in &collector.nodes {
            let Some(node) = self.node(id.as_str()) else {
                continue;
            };
            if filters.admits_node(node) {
                result.add_node(node.clone())?;
                admitted.insert(id.as_str());
            }
        }

        for &edge in &collector.edges {
            if filters.admits_edge(edge)
                && admitted.contains(edge.source.as_str())
                && admitted.contains(edge.target.as_str())
            {
                result.add_edge(edge.clone())?;
            }
        }

        debug!(
            visited = collector.nodes.len(),
            nodes = result.node_count(),
            edges = result.edge_count(),
            "subgraph extracted"
        );

        let entry_point = admitted.contains(entry).then_some(entry);
        Ok(result.build(entry_point))
    }
}

struct CollectVisitor<'a, 'c> {
    graph: &'a GraphBuilder,
    collector: &'c mut Collector<'a>,
}

impl Visitor for CollectVisitor<'_, '_> {
    fn on_node(&mut self, id: &NodeId, _depth: usize) {
        if let Some(node) = self.graph.node(id.as_str()) {
            self.collector.nodes.push(&node.id);
        }
    }

    fn on_edge(&mut self, edge: &Edge, _depth: usize) {
        if let Some(stored) = self.graph.edge(&edge.id) {
            self.collector.edges.push(stored);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceLocation;

    fn node(id: &str, file: &str, kind: NodeKind) -> Node {
        Node::new(id, id, SourceLocation::new(file, 1), kind)
    }

    fn edge(id: &str, from: &str, to: &str, kind: CallKind) -> Edge {
        Edge::new(id, from, to, kind, SourceLocation::new("src/app.ts", 3))
    }

    // main -> load -> parse -> tokenize
    //      \-> log (src/util)
    fn sample() -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("main", "src/app.ts", NodeKind::Function)).expect("main");
        builder.add_node(node("load", "src/io.ts", NodeKind::Function)).expect("load");
        builder.add_node(node("parse", "src/parse.ts", NodeKind::Method)).expect("parse");
        builder.add_node(node("tokenize", "src/parse.ts", NodeKind::Function)).expect("tokenize");
        builder.add_node(node("log", "src/util/log.ts", NodeKind::Arrow)).expect("log");
        builder.add_edge(edge("e1", "main", "load", CallKind::Async)).expect("e1");
        builder.add_edge(edge("e2", "load", "parse", CallKind::Sync)).expect("e2");
        builder.add_edge(edge("e3", "parse", "tokenize", CallKind::Sync)).expect("e3");
        builder.add_edge(edge("e4", "main", "log", CallKind::Callback)).expect("e4");
        builder
    }

    fn node_ids(graph: &CallGraph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn depth_bound_limits_extraction() {
        let graph = sample().subgraph("main", 1, None).expect("subgraph");
        assert_eq!(node_ids(&graph), vec!["main", "load", "log"]);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.entry_point_id, Some(NodeId::from("main")));
    }

    #[test]
    fn unknown_entry_yields_empty_graph() {
        let graph = sample().subgraph("ghost", 5, None).expect("subgraph");
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.entry_point_id.is_none());
    }

    #[test]
    fn exclude_pattern_drops_nodes_and_their_edges() {
        let filters = SubgraphFilters {
            exclude_files: vec![Pattern::new("src/util/*")],
            ..SubgraphFilters::default()
        };
        let graph = sample().subgraph("main", 5, Some(&filters)).expect("subgraph");
        assert_eq!(node_ids(&graph), vec!["main", "load", "parse", "tokenize"]);
        assert!(graph.edges.iter().all(|e| e.target != "log"));
    }

    #[test]
    fn filtered_root_is_absent_but_descendants_remain() {
        let filters = SubgraphFilters {
            include_files: vec![Pattern::new("src/parse*")],
            ..SubgraphFilters::default()
        };
        let graph = sample().subgraph("main", 5, Some(&filters)).expect("subgraph");
        assert_eq!(node_ids(&graph), vec!["parse", "tokenize"]);
        assert_eq!(graph.edges.len(), 1);
        assert!(graph.entry_point_id.is_none());
        assert!(graph.nodes.iter().all(|n| !n.is_placeholder()));
    }

    #[test]
    fn filtered_nodes_still_spend_depth() {
        // "load" is filtered out but "parse" is still counted at depth 2.
        let filters = SubgraphFilters {
            exclude_files: vec![Pattern::new("src/io.ts")],
            ..SubgraphFilters::default()
        };
        let graph = sample().subgraph("main", 2, Some(&filters)).expect("subgraph");
        assert_eq!(node_ids(&graph), vec!["main", "parse", "log"]);
    }

    #[test]
    fn node_kind_and_edge_kind_filters() {
        let filters = SubgraphFilters {
            node_kinds: Some(vec![NodeKind::Function, NodeKind::Arrow]),
            edge_kinds: Some(vec![CallKind::Callback]),
            ..SubgraphFilters::default()
        };
        let graph = sample().subgraph("main", 5, Some(&filters)).expect("subgraph");
        assert_eq!(node_ids(&graph), vec!["main", "load", "tokenize", "log"]);
        let edge_ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edge_ids, vec!["e4"]);
    }

    #[test]
    fn subgraph_is_independent_of_source() {
        let mut source = sample();
        let graph = source.subgraph("main", 5, None).expect("subgraph");
        source.clear();
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 4);
    }
}
