//! Step model.
//!
//! A [`Step`] is one discrete, renderable moment of an algorithm's
//! execution. Steppers append steps to a [`StepRecorder`] in a single
//! deterministic pass, so the position of a step in its run is the only
//! ordering that exists between steps.
//!
//! Each step carries:
//! - a [`StepKind`] saying what happened
//! - a `focus` list of the indices or node ids involved
//! - an optional [`Effect`], the mutation to apply to a working copy of the
//!   input (see [`replay`])
//! - an optional [`Aux`] snapshot of auxiliary state (frontier, distances,
//!   tree shape, ...)
//! - a human-readable message

mod snapshot;
pub mod replay;

pub use snapshot::{
    Aux, HashEntry, HashTableSnapshot, PathfindingState, ProbeSlot, TreeNodeSnapshot,
    TreeSnapshot,
};

use serde::{Deserialize, Serialize};

/// What a step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Initial state before the first operation.
    Init,
    /// Two positions are compared.
    Compare,
    /// Two positions exchange values.
    Swap,
    /// A value is written into a position (merge, insertion shift).
    Place,
    /// Positions are in their final sorted place.
    MarkSorted,
    /// Search bounds were narrowed.
    Narrow,
    /// The searched-for item was found.
    Found,
    /// The searched-for item does not exist.
    NotFound,
    /// A node is visited.
    Visit,
    /// A popped node had already been visited.
    Skip,
    /// A value was appended to a queue.
    Enqueue,
    /// A value was removed from the front of a queue.
    Dequeue,
    /// A value was pushed onto a stack or heap.
    Push,
    /// A value was popped from a stack or heap.
    Pop,
    /// The frontier (queue, stack, open set) changed after an expansion.
    Frontier,
    /// A tentative distance was improved.
    DistanceUpdate,
    /// Pathfinding reached its goal.
    GoalFound,
    /// Pathfinding exhausted the frontier without reaching the goal.
    NoPath,
    /// A tree rotation.
    Rotate,
    /// A node or entry was inserted.
    Insert,
    /// A node or entry was removed.
    Remove,
    /// Tortoise and hare moved.
    Advance,
    /// Tortoise and hare met inside a cycle.
    CycleFound,
    /// The first node of the cycle was located.
    CycleStart,
    /// The hare reached the end of the list.
    NoCycle,
    /// The middle of the list was located.
    MiddleFound,
    /// A `next` pointer was rewritten.
    Relink,
    /// A key was hashed to a bucket.
    Hash,
    /// A probe inspected a slot.
    Probe,
    /// The table grew and entries were rehashed.
    Resize,
    /// The sliding window grew on the right.
    WindowExpand,
    /// The sliding window shrank on the left.
    WindowShrink,
    /// Two matrix cells exchange values during rotation.
    RotateSwap,
    /// Pop or dequeue on an empty container.
    Underflow,
    /// The algorithm finished.
    Done,
}

/// Replayable mutation attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Exchange the values at two positions.
    Swap { a: usize, b: usize },
    /// Overwrite the value at a position.
    Write { index: usize, value: i64 },
    /// Append a value.
    Push { value: i64 },
    /// Drop everything from `len` onwards.
    Truncate { len: usize },
    /// Remove one position, shifting later values left.
    Remove { index: usize },
    /// Point `node` at `next` in a linked list.
    Link { node: usize, next: Option<usize> },
}

/// One discrete moment of an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// What happened.
    pub kind: StepKind,
    /// Indices or node ids involved.
    pub focus: Vec<usize>,
    /// Mutation to apply to the working copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
    /// Auxiliary state snapshot after this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<Aux>,
    /// Human-readable description.
    pub message: String,
}

impl Step {
    /// Create a step without effect or auxiliary state.
    pub fn new(kind: StepKind, focus: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            focus,
            effect: None,
            aux: None,
            message: message.into(),
        }
    }

    /// Attach a replayable effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Attach an auxiliary snapshot.
    #[must_use]
    pub fn with_aux(mut self, aux: Aux) -> Self {
        self.aux = Some(aux);
        self
    }
}

/// Append-only step buffer shared by every stepper.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
}

impl StepRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    #[inline]
    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Append a step built from its parts.
    pub fn emit(&mut self, kind: StepKind, focus: Vec<usize>, message: impl Into<String>) {
        self.record(Step::new(kind, focus, message));
    }

    /// Number of steps recorded so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last recorded step.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Consume the recorder and return the sequence.
    pub fn finish(self) -> Vec<Step> {
        self.steps
    }
}
