//! Auxiliary state snapshots carried by steps.

use serde::{Deserialize, Serialize};

/// Auxiliary state captured after a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Aux {
    /// Array contents (heap array, stack, queue).
    Array { values: Vec<i64> },
    /// Binary search bounds. `high` is -1 once the range is empty on the left.
    #[serde(rename_all = "camelCase")]
    Bounds { low: i64, high: i64, mid: Option<usize> },
    /// BFS/DFS state: visited set (in visit order) and frontier contents.
    Traversal {
        visited: Vec<usize>,
        frontier: Vec<usize>,
    },
    /// Dijkstra/A* state.
    Pathfinding(PathfindingState),
    /// Binary tree shape.
    Tree(TreeSnapshot),
    /// Floyd's pointers.
    Pointers {
        tortoise: Option<usize>,
        hare: Option<usize>,
    },
    /// In-place list reversal pointers.
    Reversal {
        prev: Option<usize>,
        current: Option<usize>,
        next: Option<usize>,
    },
    /// Sliding window over an array.
    #[serde(rename_all = "camelCase")]
    Window {
        left: usize,
        right: usize,
        sum: i64,
        best_len: usize,
        best_start: Option<usize>,
    },
    /// Hash table buckets.
    HashTable(HashTableSnapshot),
    /// Spiral walk bounds after a cell is visited. A bound crosses its
    /// opposite once that side is exhausted, so `bottom`/`right` may be -1.
    Spiral {
        top: i64,
        bottom: i64,
        left: i64,
        right: i64,
        visited: Vec<usize>,
    },
}

/// Dijkstra/A* tables indexed by node.
///
/// `None` distances are infinite.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathfindingState {
    /// Best known cost from the start (g-score).
    pub distances: Vec<Option<f64>>,
    /// Predecessor on the best known path.
    pub predecessors: Vec<Option<usize>>,
    /// Nodes waiting in the priority queue, ascending node index.
    pub open: Vec<usize>,
    /// Finalized nodes in extraction order.
    pub closed: Vec<usize>,
    /// Heuristic estimate to the goal (A* only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<Vec<f64>>,
    /// f = g + h (A* only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_scores: Option<Vec<Option<f64>>>,
    /// Reconstructed path, start first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<usize>>,
}

/// Flattened binary tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Arena id of the root.
    pub root: Option<usize>,
    /// Live nodes in ascending id order.
    pub nodes: Vec<TreeNodeSnapshot>,
}

/// One node of a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNodeSnapshot {
    pub id: usize,
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub height: u32,
}

impl TreeSnapshot {
    /// Find a node by arena id.
    pub fn node(&self, id: usize) -> Option<&TreeNodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Values in in-order sequence.
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).and_then(|n| n.left);
            }
            if let Some(id) = stack.pop() {
                if let Some(node) = self.node(id) {
                    out.push(node.value);
                    current = node.right;
                }
            }
        }
        out
    }
}

/// One key/value pair in a hash table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    pub key: String,
    pub value: String,
}

/// One slot of an open-addressing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProbeSlot {
    Empty,
    Tombstone,
    Occupied { key: String, value: String },
}

/// Hash table contents. Exactly one of `chains` and `slots` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTableSnapshot {
    pub capacity: usize,
    pub len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<Vec<HashEntry>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<ProbeSlot>>,
}
