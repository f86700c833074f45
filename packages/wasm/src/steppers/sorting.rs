//! Comparison sorts instrumented to emit compare/swap/place steps.
//!
//! Every sort works on a private copy of the input. Mutations are mirrored as
//! [`Effect`]s so replaying a run against the input reproduces the sorted
//! array. Each run ends with a single `done` step covering all indices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::step::{Aux, Effect, Step, StepKind, StepRecorder};

/// Supported comparison sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    /// Lomuto partition, last element as pivot.
    Quick,
    /// Top-down, stable.
    Merge,
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
            Self::Merge => "merge",
        };
        f.write_str(name)
    }
}

impl FromStr for SortAlgorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bubble" => Ok(Self::Bubble),
            "selection" => Ok(Self::Selection),
            "insertion" => Ok(Self::Insertion),
            "quick" => Ok(Self::Quick),
            "merge" => Ok(Self::Merge),
            other => Err(VizError::invalid_input(format!("unknown sorting algorithm '{other}'"))),
        }
    }
}

/// Generate the step sequence for sorting `values`.
pub fn sort_steps(algorithm: SortAlgorithm, values: &[i64]) -> Vec<Step> {
    let mut sorter = Sorter {
        arr: values.to_vec(),
        rec: StepRecorder::new(),
    };
    match algorithm {
        SortAlgorithm::Bubble => sorter.bubble(),
        SortAlgorithm::Selection => sorter.selection(),
        SortAlgorithm::Insertion => sorter.insertion(),
        SortAlgorithm::Quick => {
            if !sorter.arr.is_empty() {
                let hi = sorter.arr.len() - 1;
                sorter.quick(0, hi);
            }
        }
        SortAlgorithm::Merge => {
            if !sorter.arr.is_empty() {
                let hi = sorter.arr.len() - 1;
                sorter.merge_sort(0, hi);
            }
        }
    }
    sorter.done(algorithm)
}

struct Sorter {
    arr: Vec<i64>,
    rec: StepRecorder,
}

impl Sorter {
    fn compare(&mut self, a: usize, b: usize) {
        let message = format!(
            "Compare a[{a}] = {} with a[{b}] = {}",
            self.arr[a], self.arr[b]
        );
        self.rec.emit(StepKind::Compare, vec![a, b], message);
    }

    fn swap(&mut self, a: usize, b: usize) {
        let message = format!("Swap {} and {}", self.arr[a], self.arr[b]);
        self.arr.swap(a, b);
        self.rec.record(
            Step::new(StepKind::Swap, vec![a, b], message).with_effect(Effect::Swap { a, b }),
        );
    }

    fn place(&mut self, index: usize, value: i64, message: String) {
        self.arr[index] = value;
        self.rec.record(
            Step::new(StepKind::Place, vec![index], message)
                .with_effect(Effect::Write { index, value }),
        );
    }

    fn mark_sorted(&mut self, indices: Vec<usize>, message: impl Into<String>) {
        self.rec.emit(StepKind::MarkSorted, indices, message);
    }

    fn done(mut self, algorithm: SortAlgorithm) -> Vec<Step> {
        let n = self.arr.len();
        self.rec.record(
            Step::new(
                StepKind::Done,
                (0..n).collect(),
                format!("{algorithm} sort complete"),
            )
            .with_aux(Aux::Array { values: self.arr }),
        );
        self.rec.finish()
    }

    // =========================================================================
    // Algorithms
    // =========================================================================

    fn bubble(&mut self) {
        let n = self.arr.len();
        for i in 0..n.saturating_sub(1) {
            let mut swapped = false;
            for j in 0..n - i - 1 {
                self.compare(j, j + 1);
                if self.arr[j] > self.arr[j + 1] {
                    self.swap(j, j + 1);
                    swapped = true;
                }
            }
            if !swapped {
                self.mark_sorted((0..n - i).collect(), "No swaps in this pass, array is sorted");
                return;
            }
            let last = n - i - 1;
            self.mark_sorted(vec![last], format!("{} is in its final position", self.arr[last]));
        }
    }

    fn selection(&mut self) {
        let n = self.arr.len();
        for i in 0..n.saturating_sub(1) {
            let mut min_idx = i;
            for j in i + 1..n {
                self.compare(j, min_idx);
                if self.arr[j] < self.arr[min_idx] {
                    min_idx = j;
                }
            }
            if min_idx != i {
                self.swap(i, min_idx);
            }
            self.mark_sorted(vec![i], format!("{} is in its final position", self.arr[i]));
        }
    }

    fn insertion(&mut self) {
        let n = self.arr.len();
        for i in 1..n {
            let key = self.arr[i];
            let mut j = i;
            while j > 0 {
                self.rec.emit(
                    StepKind::Compare,
                    vec![j - 1, i],
                    format!("Compare a[{}] = {} with key {key}", j - 1, self.arr[j - 1]),
                );
                if self.arr[j - 1] <= key {
                    break;
                }
                let shifted = self.arr[j - 1];
                self.place(j, shifted, format!("Shift {shifted} right to index {j}"));
                j -= 1;
            }
            if j != i {
                self.place(j, key, format!("Insert key {key} at index {j}"));
            }
        }
    }

    fn quick(&mut self, lo: usize, hi: usize) {
        if lo > hi {
            return;
        }
        if lo == hi {
            self.mark_sorted(vec![lo], format!("{} is in its final position", self.arr[lo]));
            return;
        }
        let p = self.partition(lo, hi);
        if p > lo {
            self.quick(lo, p - 1);
        }
        if p < hi {
            self.quick(p + 1, hi);
        }
    }

    fn partition(&mut self, lo: usize, hi: usize) -> usize {
        let pivot = self.arr[hi];
        let mut i = lo;
        for j in lo..hi {
            self.compare(j, hi);
            if self.arr[j] < pivot {
                if i != j {
                    self.swap(i, j);
                }
                i += 1;
            }
        }
        if i != hi {
            self.swap(i, hi);
        }
        self.mark_sorted(vec![i], format!("Pivot {pivot} placed at index {i}"));
        i
    }

    fn merge_sort(&mut self, left: usize, right: usize) {
        if left >= right {
            return;
        }
        let middle = left + (right - left) / 2;
        self.merge_sort(left, middle);
        self.merge_sort(middle + 1, right);
        self.merge(left, middle, right);
    }

    fn merge(&mut self, left: usize, middle: usize, right: usize) {
        let l: Vec<i64> = self.arr[left..=middle].to_vec();
        let r: Vec<i64> = self.arr[middle + 1..=right].to_vec();
        let (mut i, mut j, mut k) = (0, 0, left);

        while i < l.len() && j < r.len() {
            self.rec.emit(
                StepKind::Compare,
                vec![left + i, middle + 1 + j],
                format!("Compare {} (left run) with {} (right run)", l[i], r[j]),
            );
            let value = if l[i] <= r[j] {
                i += 1;
                l[i - 1]
            } else {
                j += 1;
                r[j - 1]
            };
            self.place(k, value, format!("Place {value} at index {k}"));
            k += 1;
        }
        for &value in l[i..].iter().chain(&r[j..]) {
            self.place(k, value, format!("Place {value} at index {k}"));
            k += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::replay::replay_values;

    const ALL: [SortAlgorithm; 5] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
    ];

    fn sorted(values: &[i64]) -> Vec<i64> {
        let mut v = values.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_bubble_first_steps() {
        let steps = sort_steps(SortAlgorithm::Bubble, &[5, 3, 8, 1]);
        assert_eq!(steps[0].kind, StepKind::Compare);
        assert_eq!(steps[0].focus, vec![0, 1]);
        assert_eq!(steps[1].kind, StepKind::Swap);
        assert_eq!(steps[1].effect, Some(Effect::Swap { a: 0, b: 1 }));
        assert_eq!(replay_values(&[5, 3, 8, 1], &steps).unwrap(), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_every_algorithm_replays_to_sorted() {
        let inputs: [&[i64]; 6] = [
            &[5, 3, 8, 1],
            &[1],
            &[2, 2, 2],
            &[9, 8, 7, 6, 5, 4, 3, 2, 1],
            &[-3, 10, 0, -3, 7, 7, 1],
            &[1, 2, 3, 4],
        ];
        for algorithm in ALL {
            for input in inputs {
                let steps = sort_steps(algorithm, input);
                let replayed = replay_values(input, &steps).unwrap();
                assert_eq!(replayed, sorted(input), "{algorithm} on {input:?}");
            }
        }
    }

    #[test]
    fn test_terminal_done_covers_all_indices() {
        for algorithm in ALL {
            let steps = sort_steps(algorithm, &[4, 1, 3]);
            let last = steps.last().unwrap();
            assert_eq!(last.kind, StepKind::Done);
            assert_eq!(last.focus, vec![0, 1, 2]);
            assert_eq!(last.aux, Some(Aux::Array { values: vec![1, 3, 4] }));
            assert_eq!(steps.iter().filter(|s| s.kind == StepKind::Done).count(), 1);
        }
    }

    #[test]
    fn test_compare_precedes_every_swap() {
        for algorithm in [SortAlgorithm::Bubble, SortAlgorithm::Selection, SortAlgorithm::Quick] {
            let steps = sort_steps(algorithm, &[3, 9, 1, 7, 2]);
            let first_swap = steps.iter().position(|s| s.kind == StepKind::Swap).unwrap();
            assert!(steps[..first_swap].iter().any(|s| s.kind == StepKind::Compare));
        }
    }

    #[test]
    fn test_quick_uses_last_element_as_pivot() {
        let steps = sort_steps(SortAlgorithm::Quick, &[3, 1, 2]);
        // Every comparison in the first partition is against index 2.
        assert_eq!(steps[0].focus, vec![0, 2]);
        assert_eq!(steps[1].kind, StepKind::Compare);
        assert_eq!(steps[1].focus, vec![1, 2]);
    }

    #[test]
    fn test_merge_is_stable_on_ties() {
        // Equal keys take from the left run first: no write changes the value
        // at a position holding an equal key.
        let steps = sort_steps(SortAlgorithm::Merge, &[1, 1]);
        assert!(steps.iter().all(|s| s.kind != StepKind::Swap));
        assert_eq!(replay_values(&[1, 1], &steps).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_sorted_input_bubble_exits_early() {
        let steps = sort_steps(SortAlgorithm::Bubble, &[1, 2, 3, 4]);
        let compares = steps.iter().filter(|s| s.kind == StepKind::Compare).count();
        assert_eq!(compares, 3);
    }

    #[test]
    fn test_deterministic() {
        for algorithm in ALL {
            assert_eq!(sort_steps(algorithm, &[4, 2, 9, 1]), sort_steps(algorithm, &[4, 2, 9, 1]));
        }
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("quick".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Quick);
        assert!("bogo".parse::<SortAlgorithm>().is_err());
    }
}
