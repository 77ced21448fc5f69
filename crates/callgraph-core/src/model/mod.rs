//! Value types for call graphs: nodes, edges, and the built snapshot.

pub mod edge;
pub mod graph;
pub mod node;

pub use edge::{CallKind, Edge};
pub use graph::{CallGraph, GraphMetadata, MetadataPatch};
pub use node::{
    Node, NodeId, NodeKind, NodeOrigin, PLACEHOLDER_NAME, Parameter, SourceLocation, UNKNOWN_FILE,
    Visibility,
};
