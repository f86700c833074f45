//! Array-backed binary heap operations.
//!
//! Children of index `i` live at `2i + 1` and `2i + 2`. Every operation emits
//! `compare` steps for the parent/child checks it makes and `swap` steps for
//! the exchanges, so replaying the effects against the input array yields the
//! resulting heap.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::step::{Aux, Effect, Step, StepKind, StepRecorder};

/// Heap ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeapKind {
    Min,
    Max,
}

impl HeapKind {
    /// Whether `a` belongs above `b`.
    #[inline]
    pub fn prefers(self, a: i64, b: i64) -> bool {
        match self {
            Self::Min => a < b,
            Self::Max => a > b,
        }
    }
}

impl fmt::Display for HeapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Min => "min-heap",
            Self::Max => "max-heap",
        })
    }
}

/// Operation to visualize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum HeapOperation {
    /// Append and sift up. Input must already be a heap.
    Insert { value: i64 },
    /// Remove the root. Input must already be a non-empty heap.
    ExtractRoot,
    /// Sift down from one index.
    HeapifyDown { index: usize },
    /// Turn an arbitrary array into a heap.
    Build,
    /// Replace the key at `index`. Input must already be a heap.
    UpdateKey { index: usize, value: i64 },
    /// Build, then repeatedly move the root behind the shrinking heap.
    Sort,
}

/// Whether `values` satisfies the heap property for `kind`.
pub fn is_heap(kind: HeapKind, values: &[i64]) -> bool {
    (1..values.len()).all(|i| !kind.prefers(values[i], values[(i - 1) / 2]))
}

/// Generate the step sequence for `op` applied to `values`.
pub fn heap_steps(kind: HeapKind, values: &[i64], op: HeapOperation) -> Vec<Step> {
    let mut heap = HeapStepper {
        kind,
        arr: values.to_vec(),
        rec: StepRecorder::new(),
    };
    match op {
        HeapOperation::Insert { value } => heap.insert(value),
        HeapOperation::ExtractRoot => heap.extract_root(),
        HeapOperation::HeapifyDown { index } => {
            let size = heap.arr.len();
            heap.sift_down(index, size);
        }
        HeapOperation::Build => heap.build(),
        HeapOperation::UpdateKey { index, value } => heap.update_key(index, value),
        HeapOperation::Sort => heap.sort(),
    }
    heap.done()
}

struct HeapStepper {
    kind: HeapKind,
    arr: Vec<i64>,
    rec: StepRecorder,
}

impl HeapStepper {
    fn snapshot(&self) -> Aux {
        Aux::Array {
            values: self.arr.clone(),
        }
    }

    fn compare(&mut self, child: usize, other: usize) -> bool {
        let wins = self.kind.prefers(self.arr[child], self.arr[other]);
        let message = format!(
            "Compare {} at [{child}] with {} at [{other}]: {}",
            self.arr[child],
            self.arr[other],
            if wins { "out of order" } else { "in order" }
        );
        self.rec.emit(StepKind::Compare, vec![child, other], message);
        wins
    }

    fn swap(&mut self, a: usize, b: usize) {
        let message = format!("Swap {} and {}", self.arr[a], self.arr[b]);
        self.arr.swap(a, b);
        let aux = self.snapshot();
        self.rec.record(
            Step::new(StepKind::Swap, vec![a, b], message)
                .with_effect(Effect::Swap { a, b })
                .with_aux(aux),
        );
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.compare(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize, size: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut best = index;
            if left < size && self.compare(left, best) {
                best = left;
            }
            if right < size && self.compare(right, best) {
                best = right;
            }
            if best == index {
                break;
            }
            self.swap(index, best);
            index = best;
        }
    }

    fn insert(&mut self, value: i64) {
        self.arr.push(value);
        let index = self.arr.len() - 1;
        let aux = self.snapshot();
        self.rec.record(
            Step::new(
                StepKind::Push,
                vec![index],
                format!("Add {value} at the end of the heap (index {index})"),
            )
            .with_effect(Effect::Push { value })
            .with_aux(aux),
        );
        self.sift_up(index);
    }

    fn extract_root(&mut self) {
        let Some(&root) = self.arr.first() else {
            return;
        };
        let last = self.arr.len() - 1;
        if last > 0 {
            self.swap(0, last);
        }
        self.arr.truncate(last);
        let aux = self.snapshot();
        self.rec.record(
            Step::new(StepKind::Pop, vec![last], format!("Remove root {root}"))
                .with_effect(Effect::Truncate { len: last })
                .with_aux(aux),
        );
        let size = self.arr.len();
        self.sift_down(0, size);
    }

    fn build(&mut self) {
        let n = self.arr.len();
        for i in (0..n / 2).rev() {
            self.rec.emit(
                StepKind::Visit,
                vec![i],
                format!("Heapify down from index {i} ({})", self.arr[i]),
            );
            self.sift_down(i, n);
        }
    }

    fn update_key(&mut self, index: usize, value: i64) {
        let old = self.arr[index];
        self.arr[index] = value;
        let aux = self.snapshot();
        self.rec.record(
            Step::new(
                StepKind::Place,
                vec![index],
                format!("Change key at [{index}] from {old} to {value}"),
            )
            .with_effect(Effect::Write { index, value })
            .with_aux(aux),
        );
        if self.kind.prefers(value, old) {
            self.sift_up(index);
        } else {
            let size = self.arr.len();
            self.sift_down(index, size);
        }
    }

    fn sort(&mut self) {
        self.build();
        for end in (1..self.arr.len()).rev() {
            self.swap(0, end);
            self.rec.emit(
                StepKind::MarkSorted,
                vec![end],
                format!("{} is in its final position", self.arr[end]),
            );
            self.sift_down(0, end);
        }
        if !self.arr.is_empty() {
            self.rec.emit(StepKind::MarkSorted, vec![0], "Heap sort complete");
        }
    }

    fn done(mut self) -> Vec<Step> {
        let aux = self.snapshot();
        let n = self.arr.len();
        self.rec.record(
            Step::new(StepKind::Done, (0..n).collect(), format!("{} ready", self.kind)).with_aux(aux),
        );
        self.rec.finish()
    }
}
