//! Structural metrics for a call graph.
//!
//! # Overview
//!
//! [`GraphBuilder::metrics`] bundles every metric into one [`GraphMetrics`]
//! value for formatters and CI gates:
//!
//! - **Size**: node, edge, and async-node counts.
//! - **Degree** (`basic`): average fan-in/fan-out over distinct neighbors,
//!   and the most-called hotspots.
//! - **Depth** (`basic`): deepest DFS level reached from any node nobody
//!   calls.
//! - **Cycles**: output of [`GraphBuilder::detect_cycles`].
//! - **Complexity** (`complexity`): cyclomatic and cognitive scores.
//!
//! Every metric is defined for empty, cyclic, and disconnected graphs.
//!
//! ```rust,ignore
//! let metrics = builder.metrics();
//! println!("nodes={} cycles={} cyclomatic={}",
//!     metrics.total_nodes,
//!     metrics.circular_dependencies.len(),
//!     metrics.complexity.cyclomatic_complexity);
//! ```

pub mod basic;
pub mod complexity;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::MetricsConfig;
use crate::graph::GraphBuilder;
use crate::model::NodeId;

pub use basic::Hotspot;
pub use complexity::ComplexityMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub async_nodes: usize,
    pub average_fan_out: f64,
    pub average_fan_in: f64,
    pub max_depth: usize,
    pub hotspots: Vec<Hotspot>,
    pub circular_dependencies: Vec<Vec<NodeId>>,
    pub complexity: ComplexityMetrics,
}

impl GraphBuilder {
    /// Compute [`GraphMetrics`] with the default [`MetricsConfig`].
    #[must_use]
    pub fn metrics(&self) -> GraphMetrics {
        self.metrics_with(&MetricsConfig::default())
    }

    #[must_use]
    #[instrument(skip(self, config), fields(nodes = self.node_count(), edges = self.edge_count()))]
    pub fn metrics_with(&self, config: &MetricsConfig) -> GraphMetrics {
        let average_fan_out = basic::average_fan_out(self);
        let circular_dependencies = self.detect_cycles();

        let metrics = GraphMetrics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            async_nodes: self.nodes().filter(|node| node.is_async).count(),
            average_fan_out,
            average_fan_in: basic::average_fan_in(self),
            max_depth: basic::max_depth(self),
            hotspots: basic::hotspots(self, config.hotspot_limit),
            complexity: ComplexityMetrics {
                cyclomatic_complexity: complexity::cyclomatic_complexity(self),
                cognitive_complexity: complexity::cognitive_complexity(
                    circular_dependencies.len(),
                    average_fan_out,
                ),
            },
            circular_dependencies,
        };

        debug!(
            max_depth = metrics.max_depth,
            cycles = metrics.circular_dependencies.len(),
            hotspots = metrics.hotspots.len(),
            "metrics computed"
        );
        metrics
    }
}
