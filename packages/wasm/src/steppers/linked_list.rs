//! Singly linked lists: Floyd's tortoise and hare, and in-place reversal.
//!
//! Nodes are identified by their index in `values`; node 0 is the head.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::step::replay::LinkTable;
use crate::step::{Aux, Effect, Step, StepKind, StepRecorder};

/// A chain `0 -> 1 -> ... -> n-1`, optionally closed back onto one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedList {
    pub values: Vec<i64>,
    /// Node the tail points back to, if the list is cyclic.
    #[serde(default)]
    pub cycle_to: Option<usize>,
}

impl LinkedList {
    /// Build an acyclic list.
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            cycle_to: None,
        }
    }

    /// Close the tail back onto `node`.
    #[must_use]
    pub fn with_cycle_to(mut self, node: usize) -> Self {
        self.cycle_to = Some(node);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_cyclic(&self) -> bool {
        self.cycle_to.is_some()
    }

    /// Check that the cycle target names a node.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty list or a dangling cycle target.
    pub fn validate(&self) -> VizResult<()> {
        if self.values.is_empty() {
            return Err(VizError::invalid_input("the list needs at least one node"));
        }
        if let Some(target) = self.cycle_to.filter(|&t| t >= self.values.len()) {
            return Err(VizError::invalid_input(format!(
                "cycle target {target} is outside a list of {} nodes",
                self.values.len()
            )));
        }
        Ok(())
    }

    /// `next` pointer of every node.
    pub fn links(&self) -> LinkTable {
        let n = self.values.len();
        LinkTable(
            (0..n)
                .map(|i| if i + 1 < n { Some(i + 1) } else { self.cycle_to })
                .collect(),
        )
    }
}

/// What to do with the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListMode {
    /// Floyd's first phase: do the pointers meet?
    DetectCycle,
    /// Both phases: where does the cycle begin?
    FindCycleStart,
    /// Slow/fast walk to the middle. Requires an acyclic list.
    FindMiddle,
    /// Reverse `next` pointers in place. Requires an acyclic list.
    Reverse,
}

/// Generate the step sequence for `mode` over `list`.
pub fn list_steps(list: &LinkedList, mode: ListMode) -> Vec<Step> {
    let mut walker = Walker {
        values: &list.values,
        next: list.links().0,
        rec: StepRecorder::new(),
    };
    match mode {
        ListMode::DetectCycle => {
            walker.detect(false);
        }
        ListMode::FindCycleStart => {
            if let Some(meeting) = walker.detect(true) {
                walker.find_start(meeting);
            }
        }
        ListMode::FindMiddle => walker.find_middle(),
        ListMode::Reverse => walker.reverse(),
    }
    walker.rec.finish()
}

struct Walker<'a> {
    values: &'a [i64],
    next: Vec<Option<usize>>,
    rec: StepRecorder,
}

impl Walker<'_> {
    fn step(&self, node: usize) -> Option<usize> {
        self.next.get(node).copied().flatten()
    }

    fn pointers(&mut self, kind: StepKind, tortoise: usize, hare: Option<usize>, message: String) {
        let focus = match hare {
            Some(h) => vec![tortoise, h],
            None => vec![tortoise],
        };
        self.rec.record(Step::new(kind, focus, message).with_aux(Aux::Pointers {
            tortoise: Some(tortoise),
            hare,
        }));
    }

    /// First phase. Returns the meeting node if the pointers meet.
    fn detect(&mut self, continues: bool) -> Option<usize> {
        let mut tortoise = 0;
        let mut hare = 0;
        self.pointers(
            StepKind::Init,
            tortoise,
            Some(hare),
            "Tortoise and hare start at the head".to_string(),
        );
        loop {
            // The tortoise trails the hare, so it can move whenever the hare can.
            let Some((t, h2)) = self
                .step(hare)
                .and_then(|h1| self.step(h1))
                .and_then(|h2| self.step(tortoise).map(|t| (t, h2)))
            else {
                self.pointers(
                    StepKind::NoCycle,
                    tortoise,
                    None,
                    "The hare reached the end of the list, there is no cycle".to_string(),
                );
                return None;
            };
            tortoise = t;
            hare = h2;
            self.pointers(
                StepKind::Advance,
                tortoise,
                Some(hare),
                format!(
                    "Tortoise moves to {}, hare jumps to {}",
                    self.values[tortoise], self.values[hare]
                ),
            );
            if tortoise == hare {
                let (kind, message) = if continues {
                    (
                        StepKind::Visit,
                        format!(
                            "Pointers meet at {}, move the tortoise back to the head",
                            self.values[tortoise]
                        ),
                    )
                } else {
                    (
                        StepKind::CycleFound,
                        format!("Pointers meet at {}, the list has a cycle", self.values[tortoise]),
                    )
                };
                self.pointers(kind, tortoise, Some(hare), message);
                return Some(tortoise);
            }
        }
    }

    /// Second phase: one pointer from the head, one from the meeting node,
    /// both at unit speed, meet at the cycle start.
    fn find_start(&mut self, meeting: usize) {
        let mut tortoise = 0;
        let mut hare = meeting;
        while tortoise != hare {
            let (Some(t), Some(h)) = (self.step(tortoise), self.step(hare)) else {
                return;
            };
            tortoise = t;
            hare = h;
            self.pointers(
                StepKind::Advance,
                tortoise,
                Some(hare),
                format!(
                    "Both move one node: {} and {}",
                    self.values[tortoise], self.values[hare]
                ),
            );
        }
        self.pointers(
            StepKind::CycleStart,
            tortoise,
            Some(hare),
            format!("The cycle starts at node {tortoise} ({})", self.values[tortoise]),
        );
    }

    fn find_middle(&mut self) {
        let mut tortoise = 0;
        let mut hare = 0;
        self.pointers(
            StepKind::Init,
            tortoise,
            Some(hare),
            "Tortoise and hare start at the head".to_string(),
        );
        let even = loop {
            let Some(h1) = self.step(hare) else {
                break false;
            };
            let Some(t) = self.step(tortoise) else {
                break false;
            };
            tortoise = t;
            match self.step(h1) {
                Some(h2) => {
                    hare = h2;
                    self.pointers(
                        StepKind::Advance,
                        tortoise,
                        Some(hare),
                        format!(
                            "Tortoise moves to {}, hare jumps to {}",
                            self.values[tortoise], self.values[hare]
                        ),
                    );
                }
                None => {
                    self.pointers(
                        StepKind::Advance,
                        tortoise,
                        None,
                        format!("Tortoise moves to {}, hare runs off the end", self.values[tortoise]),
                    );
                    break true;
                }
            }
        };
        let message = if even {
            format!(
                "Even length: the second middle node is {tortoise} ({})",
                self.values[tortoise]
            )
        } else {
            format!("The middle node is {tortoise} ({})", self.values[tortoise])
        };
        self.pointers(StepKind::MiddleFound, tortoise, None, message);
    }

    fn reverse(&mut self) {
        let mut prev: Option<usize> = None;
        let mut current = Some(0);
        while let Some(node) = current {
            let next = self.step(node);
            self.next[node] = prev;
            let message = match prev {
                Some(p) => format!("Point {} back at {}", self.values[node], self.values[p]),
                None => format!("{} becomes the new tail", self.values[node]),
            };
            self.rec.record(
                Step::new(StepKind::Relink, vec![node], message)
                    .with_effect(Effect::Link { node, next: prev })
                    .with_aux(Aux::Reversal {
                        prev,
                        current: Some(node),
                        next,
                    }),
            );
            prev = Some(node);
            current = next;
        }
        let head = prev.unwrap_or(0);
        self.rec.record(
            Step::new(
                StepKind::Done,
                vec![head],
                format!("Reversed, {} is the new head", self.values[head]),
            )
            .with_aux(Aux::Reversal {
                prev,
                current: None,
                next: None,
            }),
        );
    }
}
