//! Cycle-safe, deterministic depth-first search over tree-like values.
//!
//! The search is pre-order with an explicit stack: a node is tested before
//! its children, children are visited in the order [`SearchNode::children`]
//! yields them, and the first match ends the traversal. Every node is
//! expanded at most once, so graphs with back-references terminate.

use std::collections::HashSet;
use std::hash::Hash;

use serde_json::Value;

/// A node in a searchable graph.
pub trait SearchNode: Copy {
    /// Identity used for the visited set.
    type Id: Eq + Hash;

    fn id(self) -> Self::Id;

    /// Child nodes, in the fixed order they must be visited.
    fn children(self) -> Vec<Self>;
}

impl<'a> SearchNode for &'a Value {
    type Id = *const Value;

    fn id(self) -> Self::Id {
        self as *const Value
    }

    fn children(self) -> Vec<Self> {
        match self {
            Value::Object(map) => map.values().collect(),
            Value::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Return the first node, in pre-order, for which `matches` holds.
pub fn find_first<N, F>(root: N, mut matches: F) -> Option<N>
where
    N: SearchNode,
    F: FnMut(N) -> bool,
{
    let mut visited = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id()) {
            continue;
        }
        if matches(node) {
            return Some(node);
        }
        // Reversed so the first child is popped next.
        stack.extend(node.children().into_iter().rev());
    }

    None
}
