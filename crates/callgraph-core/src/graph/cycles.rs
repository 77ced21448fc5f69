//! Cycle enumeration over the builder's forward adjacency.
//!
//! # Design
//!
//! - **DFS-based**: depth-first search from every unvisited node in
//!   insertion order. A node that has been fully explored is never entered
//!   again.
//! - **Explicit work stack**: each frame is a node id plus a cursor into its
//!   ordered callees, so call chains tens of thousands deep do not touch the
//!   thread stack.
//! - **Path index**: the "on current path" set is a map from id to position
//!   in the path, so the start of a cycle is found in O(1) instead of by
//!   scanning the path.
//! - **O(V+E)** per pass, plus the size of the reported cycles.
//!
//! Cycles are reported as they are closed, starting at the node the back
//! edge lands on and ending with that node repeated. No canonicalization is
//! applied: the same loop discovered from a different root would start at a
//! different node.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use super::builder::GraphBuilder;
use crate::model::NodeId;

impl GraphBuilder {
    /// Enumerate the cycles closed by back edges of a full DFS pass.
    ///
    /// Each cycle is an ordered id sequence with the first id repeated at
    /// the end, e.g. `["a", "b", "a"]`. A self-call is `["a", "a"]`. A node
    /// may appear in more than one cycle.
    #[must_use]
    #[instrument(skip(self), fields(nodes = self.node_count(), edges = self.edge_count()))]
    pub fn detect_cycles(&self) -> Vec<Vec<NodeId>> {
        let mut cycles: Vec<Vec<NodeId>> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.node_count());
        let mut path: Vec<&NodeId> = Vec::new();
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        let mut stack: Vec<(&NodeId, usize)> = Vec::new();

        for root in self.nodes() {
            if !visited.insert(root.id.as_str()) {
                continue;
            }
            on_path.insert(root.id.as_str(), path.len());
            path.push(&root.id);
            stack.push((&root.id, 0));

            while let Some(frame) = stack.last_mut() {
                let current = frame.0;
                let Some(next) = self.callees(current.as_str()).get(frame.1) else {
                    stack.pop();
                    path.pop();
                    on_path.remove(current.as_str());
                    continue;
                };
                frame.1 += 1;

                if let Some(&start) = on_path.get(next.as_str()) {
                    let mut cycle: Vec<NodeId> =
                        path[start..].iter().map(|&id| id.clone()).collect();
                    cycle.push(next.clone());
                    cycles.push(cycle);
                } else if visited.insert(next.as_str()) {
                    on_path.insert(next.as_str(), path.len());
                    path.push(next);
                    stack.push((next, 0));
                }
            }
        }

        debug!(cycles = cycles.len(), "cycle detection complete");
        cycles
    }

    /// Whether any cycle exists.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.detect_cycles().is_empty()
    }
}
