//! Binary search trees (plain and AVL) and traversal orders.
//!
//! Nodes live in an arena and keep their id for the whole run, so a focus id
//! in one step names the same node in every later snapshot. Deleted nodes
//! are unlinked but never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::step::{Aux, Step, StepKind, StepRecorder, TreeNodeSnapshot, TreeSnapshot};

/// Balancing discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreeKind {
    Bst,
    Avl,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bst => "BST",
            Self::Avl => "AVL tree",
        })
    }
}

/// Operation applied to a tree built from the initial values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TreeOperation {
    Insert { value: i64 },
    Delete { value: i64 },
    Search { value: i64 },
}

/// Depth-first and breadth-first visiting orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraversalOrder {
    PreOrder,
    InOrder,
    PostOrder,
    LevelOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreOrder => "pre-order",
            Self::InOrder => "in-order",
            Self::PostOrder => "post-order",
            Self::LevelOrder => "level-order",
        })
    }
}

// ============================================================================
// Search trees
// ============================================================================

/// Generate the step sequence for `op` on a tree built by inserting
/// `initial` in order.
///
/// The first step is `init` with the starting shape. Searches end with
/// `found` or `notFound`; inserts and deletes end with `done` carrying the
/// final shape.
pub fn tree_steps(kind: TreeKind, initial: &[i64], op: TreeOperation) -> Vec<Step> {
    let mut tree = Tree::new(kind);
    for &value in initial {
        tree.insert(value);
    }
    // Only the requested operation is animated.
    tree.rec = StepRecorder::new();

    let size = tree.snapshot().nodes.len();
    tree.emit_tree(StepKind::Init, Vec::new(), format!("{kind} with {size} nodes"));

    match op {
        TreeOperation::Insert { value } => tree.insert(value),
        TreeOperation::Delete { value } => tree.delete(value),
        TreeOperation::Search { value } => {
            tree.search(value);
            return tree.rec.finish();
        }
    }

    let ids: Vec<usize> = tree.snapshot().nodes.iter().map(|n| n.id).collect();
    tree.emit_tree(StepKind::Done, ids, format!("{kind} updated"));
    tree.rec.finish()
}

#[derive(Debug, Clone, Copy)]
enum Rotation {
    Left,
    Right,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[derive(Debug, Clone)]
struct Node {
    value: i64,
    left: Option<usize>,
    right: Option<usize>,
    height: u32,
}

struct Tree {
    kind: TreeKind,
    nodes: Vec<Node>,
    root: Option<usize>,
    rec: StepRecorder,
}

impl Tree {
    fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            root: None,
            rec: StepRecorder::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Shape helpers
    // ------------------------------------------------------------------------

    fn height(&self, id: Option<usize>) -> u32 {
        id.map_or(0, |i| self.nodes[i].height)
    }

    fn update_height(&mut self, id: usize) {
        let node = &self.nodes[id];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self.nodes[id].height = height;
    }

    fn balance(&self, id: usize) -> i64 {
        let node = &self.nodes[id];
        i64::from(self.height(node.left)) - i64::from(self.height(node.right))
    }

    fn child(&self, id: usize, left: bool) -> Option<usize> {
        if left {
            self.nodes[id].left
        } else {
            self.nodes[id].right
        }
    }

    /// Point whichever link of `parent` held `old` (or the root) at `new`.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else if node.right == Some(old) {
                    node.right = new;
                }
            }
        }
    }

    fn snapshot(&self) -> TreeSnapshot {
        let mut ids = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            ids.push(id);
            let node = &self.nodes[id];
            stack.extend(node.left);
            stack.extend(node.right);
        }
        ids.sort_unstable();
        TreeSnapshot {
            root: self.root,
            nodes: ids
                .into_iter()
                .map(|id| {
                    let node = &self.nodes[id];
                    TreeNodeSnapshot {
                        id,
                        value: node.value,
                        left: node.left,
                        right: node.right,
                        height: node.height,
                    }
                })
                .collect(),
        }
    }

    fn emit_tree(&mut self, kind: StepKind, focus: Vec<usize>, message: impl Into<String>) {
        let aux = Aux::Tree(self.snapshot());
        self.rec.record(Step::new(kind, focus, message).with_aux(aux));
    }

    fn emit_compare(&mut self, id: usize, value: i64) -> bool {
        let here = self.nodes[id].value;
        let go_left = value < here;
        let message = if go_left {
            format!("{value} < {here}, go left")
        } else {
            format!("{value} > {here}, go right")
        };
        self.rec.emit(StepKind::Compare, vec![id], message);
        go_left
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    fn insert(&mut self, value: i64) {
        let mut path = Vec::new();
        let mut current = self.root;
        while let Some(id) = current {
            if self.nodes[id].value == value {
                self.emit_tree(
                    StepKind::Skip,
                    vec![id],
                    format!("{value} is already in the tree, duplicates are ignored"),
                );
                return;
            }
            let go_left = self.emit_compare(id, value);
            path.push(id);
            current = self.child(id, go_left);
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            value,
            left: None,
            right: None,
            height: 1,
        });
        match path.last() {
            None => self.root = Some(id),
            Some(&parent) if value < self.nodes[parent].value => self.nodes[parent].left = Some(id),
            Some(&parent) => self.nodes[parent].right = Some(id),
        }
        self.emit_tree(StepKind::Insert, vec![id], format!("Insert {value}"));
        self.retrace(&path);
    }

    fn delete(&mut self, value: i64) {
        let mut path = Vec::new();
        let mut current = self.root;
        let target = loop {
            let Some(id) = current else {
                self.rec.emit(
                    StepKind::Skip,
                    Vec::new(),
                    format!("{value} is not in the tree, nothing to delete"),
                );
                return;
            };
            if self.nodes[id].value == value {
                self.rec.emit(StepKind::Visit, vec![id], format!("Found {value}"));
                break id;
            }
            let go_left = self.emit_compare(id, value);
            path.push(id);
            current = self.child(id, go_left);
        };

        match (self.nodes[target].left, self.nodes[target].right) {
            (Some(_), Some(right)) => {
                path.push(target);
                self.rec.emit(
                    StepKind::Visit,
                    vec![right],
                    format!("{value} has two children, look for its in-order successor"),
                );
                let mut successor = right;
                while let Some(left) = self.nodes[successor].left {
                    path.push(successor);
                    successor = left;
                    self.rec.emit(StepKind::Visit, vec![successor], "Go left");
                }
                let replacement = self.nodes[successor].value;
                self.nodes[target].value = replacement;
                let orphan = self.nodes[successor].right;
                self.replace_child(path.last().copied(), successor, orphan);
                self.emit_tree(
                    StepKind::Remove,
                    vec![target, successor],
                    format!("Replace {value} with successor {replacement} and remove the successor"),
                );
            }
            (child, None) | (None, child) => {
                self.replace_child(path.last().copied(), target, child);
                self.emit_tree(StepKind::Remove, vec![target], format!("Remove {value}"));
            }
        }
        self.retrace(&path);
    }

    fn search(&mut self, value: i64) {
        let mut current = self.root;
        while let Some(id) = current {
            if self.nodes[id].value == value {
                self.emit_tree(StepKind::Found, vec![id], format!("Found {value}"));
                return;
            }
            let go_left = self.emit_compare(id, value);
            current = self.child(id, go_left);
        }
        self.emit_tree(StepKind::NotFound, Vec::new(), format!("{value} is not in the tree"));
    }

    // ------------------------------------------------------------------------
    // Balancing
    // ------------------------------------------------------------------------

    /// Walk back up `path` (root first) fixing heights, rebalancing AVL nodes.
    fn retrace(&mut self, path: &[usize]) {
        for i in (0..path.len()).rev() {
            let id = path[i];
            self.update_height(id);
            if self.kind == TreeKind::Avl {
                let parent = i.checked_sub(1).map(|p| path[p]);
                self.rebalance(id, parent);
            }
        }
    }

    fn rebalance(&mut self, id: usize, parent: Option<usize>) {
        let balance = self.balance(id);
        if balance.abs() <= 1 {
            return;
        }
        self.rec.emit(
            StepKind::Visit,
            vec![id],
            format!("{} is unbalanced (balance factor {balance})", self.nodes[id].value),
        );
        if balance > 1 {
            if let Some(left) = self.nodes[id].left.filter(|&l| self.balance(l) < 0) {
                self.rotate(left, Some(id), Rotation::Left);
            }
            self.rotate(id, parent, Rotation::Right);
        } else {
            if let Some(right) = self.nodes[id].right.filter(|&r| self.balance(r) > 0) {
                self.rotate(right, Some(id), Rotation::Right);
            }
            self.rotate(id, parent, Rotation::Left);
        }
    }

    fn rotate(&mut self, id: usize, parent: Option<usize>, direction: Rotation) {
        let pivot = match direction {
            Rotation::Right => self.nodes[id].left,
            Rotation::Left => self.nodes[id].right,
        };
        let Some(pivot) = pivot else {
            return;
        };
        match direction {
            Rotation::Right => {
                self.nodes[id].left = self.nodes[pivot].right;
                self.nodes[pivot].right = Some(id);
            }
            Rotation::Left => {
                self.nodes[id].right = self.nodes[pivot].left;
                self.nodes[pivot].left = Some(id);
            }
        }
        self.update_height(id);
        self.update_height(pivot);
        self.replace_child(parent, id, Some(pivot));
        if let Some(p) = parent {
            self.update_height(p);
        }
        let message = format!(
            "Rotate {direction} at {}: {} becomes the subtree root",
            self.nodes[id].value, self.nodes[pivot].value
        );
        self.emit_tree(StepKind::Rotate, vec![id, pivot], message);
    }
}

// ============================================================================
// Traversals
// ============================================================================

/// Generate the visiting order of a complete binary tree stored in level
/// order (children of `i` at `2i + 1` and `2i + 2`).
pub fn traversal_steps(values: &[i64], order: TraversalOrder) -> Vec<Step> {
    let mut walk = Walk {
        values,
        visited: Vec::with_capacity(values.len()),
        rec: StepRecorder::new(),
    };
    if !values.is_empty() {
        match order {
            TraversalOrder::PreOrder => walk.pre(0),
            TraversalOrder::InOrder => walk.in_order(0),
            TraversalOrder::PostOrder => walk.post(0),
            TraversalOrder::LevelOrder => walk.level(),
        }
    }
    let sequence: Vec<String> = walk.visited.iter().map(|&i| values[i].to_string()).collect();
    let focus = walk.visited.clone();
    walk.rec.record(
        Step::new(StepKind::Done, focus, format!("{order}: {}", sequence.join(", "))).with_aux(
            Aux::Traversal {
                visited: walk.visited,
                frontier: Vec::new(),
            },
        ),
    );
    walk.rec.finish()
}

struct Walk<'a> {
    values: &'a [i64],
    visited: Vec<usize>,
    rec: StepRecorder,
}

impl Walk<'_> {
    fn children(&self, i: usize) -> [Option<usize>; 2] {
        let left = 2 * i + 1;
        let n = self.values.len();
        [(left < n).then_some(left), (left + 1 < n).then_some(left + 1)]
    }

    fn visit(&mut self, i: usize, frontier: Vec<usize>) {
        self.visited.push(i);
        let aux = Aux::Traversal {
            visited: self.visited.clone(),
            frontier,
        };
        self.rec.record(
            Step::new(StepKind::Visit, vec![i], format!("Visit {}", self.values[i])).with_aux(aux),
        );
    }

    fn pre(&mut self, i: usize) {
        self.visit(i, Vec::new());
        for child in self.children(i).into_iter().flatten() {
            self.pre(child);
        }
    }

    fn in_order(&mut self, i: usize) {
        let [left, right] = self.children(i);
        if let Some(left) = left {
            self.in_order(left);
        }
        self.visit(i, Vec::new());
        if let Some(right) = right {
            self.in_order(right);
        }
    }

    fn post(&mut self, i: usize) {
        for child in self.children(i).into_iter().flatten() {
            self.post(child);
        }
        self.visit(i, Vec::new());
    }

    fn level(&mut self) {
        let mut queue = std::collections::VecDeque::from([0]);
        while let Some(i) = queue.pop_front() {
            queue.extend(self.children(i).into_iter().flatten());
            self.visit(i, queue.iter().copied().collect());
        }
    }
}
