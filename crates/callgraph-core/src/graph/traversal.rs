//! Depth-bounded DFS/BFS traversal and shortest call paths.
//!
//! Both traversals visit each reachable node at most once, following
//! outgoing call sites in insertion order. The first call site that reaches
//! an unvisited node is its tree edge; later call sites to the same node are
//! skipped. Depth is counted in hops from the start node, which is depth 0.

use std::collections::{HashMap, HashSet, VecDeque};

use super::builder::GraphBuilder;
use crate::model::{Edge, NodeId};

/// Limits applied to a traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Nodes deeper than this are neither visited nor expanded.
    pub max_depth: Option<usize>,
}

impl TraversalOptions {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    const fn allows(self, depth: usize) -> bool {
        match self.max_depth {
            Some(max) => depth <= max,
            None => true,
        }
    }
}

/// Callbacks fired during a traversal.
pub trait Visitor {
    /// Fires exactly once for every visited node.
    fn on_node(&mut self, _id: &NodeId, _depth: usize) {}

    /// Fires for each tree edge, with the depth of its source node. Only
    /// edges whose target is about to be visited are reported.
    fn on_edge(&mut self, _edge: &Edge, _depth: usize) {}
}

impl Visitor for () {}

impl GraphBuilder {
    /// Depth-first traversal from `start`.
    ///
    /// Returns visited ids in preorder, `start` first, or an empty vector if
    /// `start` is not in the graph.
    pub fn traverse_dfs<V: Visitor + ?Sized>(
        &self,
        start: &str,
        options: &TraversalOptions,
        visitor: &mut V,
    ) -> Vec<NodeId> {
        let Some(root) = self.node(start) else {
            return Vec::new();
        };
        if !options.allows(0) {
            return Vec::new();
        }

        let mut order: Vec<NodeId> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&NodeId, usize, Vec<&Edge>, usize)> = Vec::new();

        visited.insert(root.id.as_str());
        visitor.on_node(&root.id, 0);
        order.push(root.id.clone());
        stack.push((&root.id, 0, self.outgoing_edges(start).collect(), 0));

        while let Some(frame) = stack.last_mut() {
            let depth = frame.1;
            let Some(&edge) = frame.2.get(frame.3) else {
                stack.pop();
                continue;
            };
            frame.3 += 1;

            let child = &edge.target;
            if visited.contains(child.as_str()) || !options.allows(depth + 1) {
                continue;
            }

            visited.insert(child.as_str());
            visitor.on_edge(edge, depth);
            visitor.on_node(child, depth + 1);
            order.push(child.clone());
            stack.push((
                child,
                depth + 1,
                self.outgoing_edges(child.as_str()).collect(),
                0,
            ));
        }

        order
    }

    /// Breadth-first traversal from `start`, with the same callback and
    /// depth contract as [`GraphBuilder::traverse_dfs`].
    pub fn traverse_bfs<V: Visitor + ?Sized>(
        &self,
        start: &str,
        options: &TraversalOptions,
        visitor: &mut V,
    ) -> Vec<NodeId> {
        let Some(root) = self.node(start) else {
            return Vec::new();
        };
        if !options.allows(0) {
            return Vec::new();
        }

        let mut order: Vec<NodeId> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([root.id.as_str()]);
        let mut queue: VecDeque<(&NodeId, usize)> = VecDeque::from([(&root.id, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            visitor.on_node(current, depth);
            order.push(current.clone());

            if !options.allows(depth + 1) {
                continue;
            }
            for edge in self.outgoing_edges(current.as_str()) {
                if visited.insert(edge.target.as_str()) {
                    visitor.on_edge(edge, depth);
                    queue.push_back((&edge.target, depth + 1));
                }
            }
        }

        order
    }

    /// Fewest-hop call chain from `from` to `to`, inclusive of both ends.
    ///
    /// Returns `None` when either id is unknown or `to` is unreachable.
    #[must_use]
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<NodeId>> {
        let source = self.node(from)?;
        let target = self.node(to)?;
        if from == to {
            return Some(vec![source.id.clone()]);
        }

        let mut queue: VecDeque<&NodeId> = VecDeque::from([&source.id]);
        let mut parent: HashMap<&str, &NodeId> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([source.id.as_str()]);

        while let Some(current) = queue.pop_front() {
            if current.as_str() == to {
                return Some(reconstruct_path(&source.id, &target.id, &parent));
            }
            for next in self.callees(current.as_str()) {
                if visited.insert(next.as_str()) {
                    parent.insert(next.as_str(), current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

fn reconstruct_path(from: &NodeId, to: &NodeId, parent: &HashMap<&str, &NodeId>) -> Vec<NodeId> {
    let mut path: Vec<NodeId> = vec![to.clone()];
    let mut cursor = to;
    while cursor != from {
        let Some(&previous) = parent.get(cursor.as_str()) else {
            break;
        };
        path.push(previous.clone());
        cursor = previous;
    }
    path.reverse();
    path
}
