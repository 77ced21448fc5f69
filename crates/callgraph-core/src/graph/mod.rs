//! Call-graph construction and structural queries.
//!
//! # Overview
//!
//! [`GraphBuilder`] owns the node/edge records of one analysis pass together
//! with forward and reverse adjacency indices. Every query in this module is
//! a method on the builder and reads those indices directly:
//!
//! ```text
//! Node / Edge records (any order)
//!        ↓  builder::GraphBuilder::add_node / add_edge
//! GraphBuilder (indices + placeholders for unresolved targets)
//!        ├─ cycles::detect_cycles        → Vec<cycle>
//!        ├─ traversal::traverse_dfs/bfs  → visited ids
//!        ├─ subgraph::subgraph           → independent CallGraph
//!        └─ build                        → immutable CallGraph
//! ```
//!
//! All walks use explicit work stacks or queues, so graph depth is bounded
//! by heap size rather than the thread stack.

pub mod builder;
pub mod cycles;
pub mod subgraph;
pub mod traversal;

pub use builder::{GraphBuilder, Neighbors};
pub use subgraph::SubgraphFilters;
pub use traversal::{TraversalOptions, Visitor};
