//! Incremental call-graph construction.
//!
//! # Overview
//!
//! [`GraphBuilder`] accumulates node and edge records produced by a source
//! analyzer during one analysis pass. Records may arrive in any order: an
//! edge that names a node id the builder has not seen yet heals itself by
//! creating a placeholder node (tagged
//! [`NodeOrigin::Unresolved`](crate::model::NodeOrigin::Unresolved)), so the
//! forward and reverse indices always agree with the edge list.
//!
//! ## Indices
//!
//! ```text
//! forward:  caller -> {callee, ...}    (distinct targets, insertion order)
//! reverse:  callee -> {caller, ...}    (distinct sources, insertion order)
//! outgoing: caller -> [edge, ...]      (every call site, insertion order)
//! ```
//!
//! All three are updated in O(1) amortized per edge.
//!
//! ## Lifecycle
//!
//! ```rust,ignore
//! let mut builder = GraphBuilder::new();
//! builder.add_node(main)?;
//! builder.add_edge(call)?;          // target may not exist yet
//! let graph = builder.build(Some("main"));
//! builder.clear();                  // ready for the next pass
//! ```

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::GraphError;
use crate::model::{CallGraph, Edge, GraphMetadata, MetadataPatch, Node, NodeId};

// ---------------------------------------------------------------------------
// Neighbors
// ---------------------------------------------------------------------------

/// Insertion-ordered set of node ids.
///
/// Iteration order is the order ids were first inserted, which keeps every
/// traversal built on top of the indices deterministic.
#[derive(Debug, Clone, Default)]
pub struct Neighbors {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl Neighbors {
    fn insert(&mut self, id: &NodeId) -> bool {
        if self.members.contains(id.as_str()) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id.clone());
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NodeId> {
        self.order.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.order.iter()
    }
}

impl<'a> IntoIterator for &'a Neighbors {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

static EMPTY_NEIGHBORS: LazyLock<Neighbors> = LazyLock::new(Neighbors::default);

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Mutable accumulator for one analysis pass.
///
/// Not synchronized: share it across threads only behind external locking.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<String, usize>,
    forward: HashMap<NodeId, Neighbors>,
    reverse: HashMap<NodeId, Neighbors>,
    outgoing: HashMap<NodeId, Vec<usize>>,
    metadata: MetadataPatch,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a builder from a built snapshot.
    ///
    /// Nodes are replayed before edges, so placeholders keep their
    /// unresolved tag and no new ones are synthesized for edges whose
    /// endpoints are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot contains a malformed node or edge.
    pub fn from_graph(graph: &CallGraph) -> Result<Self, GraphError> {
        let mut builder = Self::new();
        for node in &graph.nodes {
            builder.add_node(node.clone())?;
        }
        for edge in &graph.edges {
            builder.add_edge(edge.clone())?;
        }
        builder.metadata = MetadataPatch {
            generated_at: Some(graph.metadata.generated_at),
            entry_point: graph.entry_point_id.clone(),
            project_root: Some(graph.metadata.project_root.clone()),
            file_count: Some(graph.metadata.file_count),
            analysis_duration_ms: Some(graph.metadata.analysis_duration_ms),
            max_depth: graph.metadata.max_depth,
        };
        Ok(builder)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert a node. Re-inserting an existing id keeps the first record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidNode`] if the id, name, or file path is
    /// empty. The builder is left untouched.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        validate_node(&node)?;

        if self.node_index.contains_key(node.id.as_str()) {
            debug!(node_id = %node.id, "duplicate node ignored");
            return Ok(());
        }

        self.insert_node_unchecked(node);
        Ok(())
    }

    /// Insert an edge, creating placeholder nodes for unknown endpoints.
    /// Re-inserting an existing edge id keeps the first record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] if the id, source, or target is
    /// empty. The builder is left untouched.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        validate_edge(&edge)?;

        for endpoint in [&edge.source, &edge.target] {
            if !self.node_index.contains_key(endpoint.as_str()) {
                info!(
                    node_id = %endpoint,
                    edge_id = %edge.id,
                    "creating placeholder node for unresolved call endpoint"
                );
                self.insert_node_unchecked(Node::placeholder(endpoint.clone()));
            }
        }

        if self.edge_index.contains_key(&edge.id) {
            debug!(edge_id = %edge.id, "duplicate edge ignored");
            return Ok(());
        }

        let position = self.edges.len();
        self.forward
            .entry(edge.source.clone())
            .or_default()
            .insert(&edge.target);
        self.reverse
            .entry(edge.target.clone())
            .or_default()
            .insert(&edge.source);
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(position);
        self.edge_index.insert(edge.id.clone(), position);
        self.edges.push(edge);
        Ok(())
    }

    /// Merge the set fields of `patch` into the pending metadata.
    pub fn set_metadata(&mut self, patch: MetadataPatch) {
        self.metadata.merge(patch);
    }

    /// Snapshot the current state into an immutable [`CallGraph`].
    ///
    /// The entry point is `entry_point` when given, otherwise the one set
    /// through metadata. Unset metadata falls back to: now, `"."`, the
    /// number of distinct files among declared nodes, and zero duration.
    #[must_use]
    pub fn build(&self, entry_point: Option<&str>) -> CallGraph {
        let entry_point_id = entry_point
            .map(NodeId::from)
            .or_else(|| self.metadata.entry_point.clone());

        let file_count = self.metadata.file_count.unwrap_or_else(|| {
            self.nodes
                .iter()
                .filter(|node| !node.is_placeholder())
                .map(|node| node.location.file.as_str())
                .collect::<BTreeSet<_>>()
                .len()
        });

        let metadata = GraphMetadata {
            generated_at: self.metadata.generated_at.unwrap_or_else(Utc::now),
            entry_point: entry_point_id.clone(),
            project_root: self
                .metadata
                .project_root
                .clone()
                .unwrap_or_else(|| ".".to_string()),
            file_count,
            analysis_duration_ms: self.metadata.analysis_duration_ms.unwrap_or(0),
            max_depth: self.metadata.max_depth,
        };

        CallGraph {
            metadata,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            entry_point_id,
        }
    }

    /// Reset all state, including metadata, for reuse in another pass.
    pub fn clear(&mut self) {
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "clearing graph builder"
        );
        *self = Self::default();
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    #[must_use]
    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&position| &self.nodes[position])
    }

    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&position| &self.edges[position])
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Distinct ids called from `id`, in first-call order.
    #[must_use]
    pub fn callees(&self, id: &str) -> &Neighbors {
        self.forward.get(id).unwrap_or(&EMPTY_NEIGHBORS)
    }

    /// Distinct ids that call `id`, in first-call order.
    #[must_use]
    pub fn callers(&self, id: &str) -> &Neighbors {
        self.reverse.get(id).unwrap_or(&EMPTY_NEIGHBORS)
    }

    #[must_use]
    pub fn fan_out(&self, id: &str) -> usize {
        self.callees(id).len()
    }

    #[must_use]
    pub fn fan_in(&self, id: &str) -> usize {
        self.callers(id).len()
    }

    /// Every call site leaving `id`, in insertion order.
    pub fn outgoing_edges<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + use<'a> {
        self.outgoing
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&position| &self.edges[position])
    }

    /// Insertion position of a node, used for stable tie-breaking.
    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn insert_node_unchecked(&mut self, node: Node) {
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }
}

fn validate_node(node: &Node) -> Result<(), GraphError> {
    let missing = if node.id.is_empty() {
        Some("id")
    } else if node.name.is_empty() {
        Some("name")
    } else if node.location.file.is_empty() {
        Some("file path")
    } else {
        None
    };

    match missing {
        Some(field) => Err(GraphError::InvalidNode {
            id: node.id.to_string(),
            field,
        }),
        None => Ok(()),
    }
}

fn validate_edge(edge: &Edge) -> Result<(), GraphError> {
    let missing = if edge.id.is_empty() {
        Some("id")
    } else if edge.source.is_empty() {
        Some("source")
    } else if edge.target.is_empty() {
        Some("target")
    } else {
        None
    };

    match missing {
        Some(field) => Err(GraphError::InvalidEdge {
            id: edge.id.clone(),
            field,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallKind, NodeKind, NodeOrigin, SourceLocation};

    fn node(id: &str) -> Node {
        Node::new(id, id, SourceLocation::new("src/app.ts", 1), NodeKind::Function)
    }

    fn edge(id: &str, from: &str, to: &str) -> Edge {
        Edge::new(id, from, to, CallKind::Sync, SourceLocation::new("src/app.ts", 2))
    }

    #[test]
    fn empty_builder_builds_empty_graph() {
        let builder = GraphBuilder::new();
        let graph = builder.build(None);
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.entry_point_id.is_none());
        assert_eq!(graph.metadata.project_root, ".");
        assert_eq!(graph.metadata.file_count, 0);
    }

    #[test]
    fn duplicate_node_keeps_first_record() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("a")).expect("add a");

        let mut renamed = node("a");
        renamed.name = "other".to_string();
        builder.add_node(renamed).expect("re-add a");

        assert_eq!(builder.node_count(), 1);
        assert_eq!(builder.node("a").expect("node a").name, "a");
    }

    #[test]
    fn duplicate_edge_keeps_first_record() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");
        builder.add_edge(edge("e1", "a", "c")).expect("re-add e1");

        assert_eq!(builder.edge_count(), 1);
        assert_eq!(builder.edge("e1").expect("edge e1").target, "b");
        assert_eq!(builder.fan_out("a"), 1);
    }

    #[test]
    fn rejected_node_leaves_state_untouched() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("a")).expect("add a");

        let mut nameless = node("b");
        nameless.name.clear();
        let err = builder.add_node(nameless).expect_err("nameless node rejected");
        assert_eq!(
            err,
            GraphError::InvalidNode {
                id: "b".to_string(),
                field: "name"
            }
        );

        let mut no_file = node("c");
        no_file.location.file.clear();
        assert!(builder.add_node(no_file).is_err());
        assert!(builder.add_node(node("")).is_err());

        assert_eq!(builder.node_count(), 1);
        assert!(!builder.has_node("b"));
    }

    #[test]
    fn rejected_edge_creates_no_placeholders() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .add_edge(edge("e1", "a", ""))
            .expect_err("missing target rejected");
        assert!(matches!(err, GraphError::InvalidEdge { field: "target", .. }));
        assert!(builder.add_edge(edge("", "a", "b")).is_err());
        assert!(builder.add_edge(edge("e2", "", "b")).is_err());

        assert_eq!(builder.node_count(), 0);
        assert_eq!(builder.edge_count(), 0);
    }

    #[test]
    fn forward_reference_creates_placeholder() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("a")).expect("add a");
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");

        assert!(builder.has_node("b"));
        let placeholder = builder.node("b").expect("placeholder b");
        assert_eq!(placeholder.name, "placeholder");
        assert_eq!(placeholder.location.file, "unknown");
        assert_eq!(placeholder.origin, NodeOrigin::Unresolved);
    }

    #[test]
    fn late_declaration_does_not_replace_placeholder() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");
        builder.add_node(node("b")).expect("declare b");

        assert!(builder.node("b").expect("node b").is_placeholder());
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn parallel_edges_share_adjacency_entry() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");
        builder.add_edge(edge("e2", "a", "b")).expect("add e2");

        assert_eq!(builder.edge_count(), 2);
        assert_eq!(builder.fan_out("a"), 1);
        assert_eq!(builder.fan_in("b"), 1);
        assert_eq!(builder.outgoing_edges("a").count(), 2);
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(edge("e1", "a", "c")).expect("add e1");
        builder.add_edge(edge("e2", "a", "b")).expect("add e2");
        builder.add_edge(edge("e3", "d", "b")).expect("add e3");

        let callees: Vec<&str> = builder.callees("a").iter().map(NodeId::as_str).collect();
        assert_eq!(callees, vec!["c", "b"]);
        let callers: Vec<&str> = builder.callers("b").iter().map(NodeId::as_str).collect();
        assert_eq!(callers, vec!["a", "d"]);
        assert!(builder.callees("zzz").is_empty());
    }

    #[test]
    fn build_uses_explicit_then_metadata_entry_point() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("main")).expect("add main");
        builder.set_metadata(MetadataPatch {
            entry_point: Some(NodeId::from("main")),
            project_root: Some("/repo".to_string()),
            ..MetadataPatch::default()
        });

        let graph = builder.build(None);
        assert_eq!(graph.entry_point_id, Some(NodeId::from("main")));
        assert_eq!(graph.metadata.project_root, "/repo");

        let graph = builder.build(Some("other"));
        assert_eq!(graph.entry_point_id, Some(NodeId::from("other")));
        assert_eq!(graph.metadata.entry_point, Some(NodeId::from("other")));
    }

    #[test]
    fn file_count_defaults_to_declared_files() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("a")).expect("add a");
        builder
            .add_node(Node::new(
                "b",
                "b",
                SourceLocation::new("src/other.ts", 1),
                NodeKind::Function,
            ))
            .expect("add b");
        builder.add_edge(edge("e1", "a", "ghost")).expect("add e1");

        assert_eq!(builder.build(None).metadata.file_count, 2);
    }

    #[test]
    fn clear_resets_everything() {
        let mut builder = GraphBuilder::new();
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");
        builder.set_metadata(MetadataPatch {
            file_count: Some(9),
            ..MetadataPatch::default()
        });
        builder.clear();

        assert_eq!(builder.node_count(), 0);
        assert_eq!(builder.edge_count(), 0);
        assert!(!builder.has_edge("e1"));
        assert_eq!(builder.fan_out("a"), 0);
        assert_eq!(builder.build(None).metadata.file_count, 0);
    }

    #[test]
    fn from_graph_round_trips_snapshot() {
        let mut builder = GraphBuilder::new();
        builder.add_node(node("a")).expect("add a");
        builder.add_edge(edge("e1", "a", "b")).expect("add e1");
        let graph = builder.build(Some("a"));

        let rebuilt = GraphBuilder::from_graph(&graph).expect("rehydrate");
        assert_eq!(rebuilt.node_count(), 2);
        assert!(rebuilt.node("b").expect("node b").is_placeholder());
        assert_eq!(rebuilt.build(None).entry_point_id, graph.entry_point_id);
        assert_eq!(rebuilt.build(None).nodes, graph.nodes);
    }
}
