#![forbid(unsafe_code)]
//! callgraph-core library.
//!
//! Builds a directed call graph from node and edge records, then answers
//! structural questions about it: traversal, shortest call chains, cycle
//! detection, subgraph extraction, and aggregate metrics.
//!
//! # Conventions
//!
//! - **Errors**: Graph mutations return [`error::GraphError`]; config
//!   loading uses `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!   Placeholder creation is logged at `info`, duplicates at `debug`.

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod pattern;

pub use config::{AnalysisConfig, MetricsConfig, SubgraphConfig, TraversalConfig, load_config};
pub use error::{ErrorCode, GraphError};
pub use graph::{GraphBuilder, Neighbors, SubgraphFilters, TraversalOptions, Visitor};
pub use metrics::{ComplexityMetrics, GraphMetrics, Hotspot};
pub use model::{
    CallGraph, CallKind, Edge, GraphMetadata, MetadataPatch, Node, NodeId, NodeKind, NodeOrigin,
    Parameter, SourceLocation, Visibility,
};
pub use pattern::Pattern;
