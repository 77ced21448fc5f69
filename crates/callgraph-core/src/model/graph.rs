use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::node::{Node, NodeId};

/// Descriptive metadata attached to a built [`CallGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<NodeId>,
    pub project_root: String,
    pub file_count: usize,
    pub analysis_duration_ms: u64,
    /// Deepest call chain observed by the producer, when it measured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Partial metadata update merged by
/// [`GraphBuilder::set_metadata`](crate::graph::GraphBuilder::set_metadata).
///
/// Unset fields leave the builder's current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entry_point: Option<NodeId>,
    #[serde(default)]
    pub project_root: Option<String>,
    #[serde(default)]
    pub file_count: Option<usize>,
    #[serde(default)]
    pub analysis_duration_ms: Option<u64>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl MetadataPatch {
    /// Overlay every field set in `other` onto `self`.
    pub fn merge(&mut self, other: Self) {
        if other.generated_at.is_some() {
            self.generated_at = other.generated_at;
        }
        if other.entry_point.is_some() {
            self.entry_point = other.entry_point;
        }
        if other.project_root.is_some() {
            self.project_root = other.project_root;
        }
        if other.file_count.is_some() {
            self.file_count = other.file_count;
        }
        if other.analysis_duration_ms.is_some() {
            self.analysis_duration_ms = other.analysis_duration_ms;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
    }
}

/// Immutable snapshot of a call graph produced by
/// [`GraphBuilder::build`](crate::graph::GraphBuilder::build).
///
/// Downstream formatters only read `nodes`, `edges`, and `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraph {
    pub metadata: GraphMetadata,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_id: Option<NodeId>,
}

impl CallGraph {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The node designated as the analysis root, if it exists in the graph.
    #[must_use]
    pub fn entry_point(&self) -> Option<&Node> {
        self.entry_point_id
            .as_ref()
            .and_then(|id| self.node(id.as_str()))
    }
}
