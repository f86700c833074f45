//! Variable-size sliding window: longest contiguous run summing to `k`.
//!
//! Only valid for non-negative values, where growing the window never
//! lowers its sum.

use crate::step::{Aux, Step, StepKind, StepRecorder};

struct Window {
    left: usize,
    sum: i64,
    best_len: usize,
    best_start: Option<usize>,
}

impl Window {
    fn aux(&self, right: usize) -> Aux {
        Aux::Window {
            left: self.left,
            right,
            sum: self.sum,
            best_len: self.best_len,
            best_start: self.best_start,
        }
    }
}

/// Generate the step sequence for the longest subarray of `values` whose
/// sum is exactly `target`.
pub fn longest_window_steps(values: &[i64], target: i64) -> Vec<Step> {
    let mut rec = StepRecorder::new();
    let mut w = Window {
        left: 0,
        sum: 0,
        best_len: 0,
        best_start: None,
    };

    for right in 0..values.len() {
        w.sum += values[right];
        rec.record(
            Step::new(
                StepKind::WindowExpand,
                (w.left..=right).collect(),
                format!("Add {} on the right, sum is {}", values[right], w.sum),
            )
            .with_aux(w.aux(right)),
        );

        while w.sum > target && w.left <= right {
            let dropped = values[w.left];
            w.sum -= dropped;
            w.left += 1;
            rec.record(
                Step::new(
                    StepKind::WindowShrink,
                    (w.left..=right).collect(),
                    format!("Sum exceeds {target}, drop {dropped} from the left, sum is {}", w.sum),
                )
                .with_aux(w.aux(right)),
            );
        }

        let len = (right + 1).saturating_sub(w.left);
        if w.sum == target && len > w.best_len {
            w.best_len = len;
            w.best_start = Some(w.left);
            rec.record(
                Step::new(
                    StepKind::Visit,
                    (w.left..=right).collect(),
                    format!("New longest window of length {len} sums to {target}"),
                )
                .with_aux(w.aux(right)),
            );
        }
    }

    let last = values.len().saturating_sub(1);
    match w.best_start {
        Some(start) => {
            let len = w.best_len;
            rec.record(
                Step::new(
                    StepKind::Found,
                    (start..start + len).collect(),
                    format!("Longest subarray summing to {target} has length {len}, starting at index {start}"),
                )
                .with_aux(w.aux(last)),
            );
        }
        None => rec.record(
            Step::new(
                StepKind::NotFound,
                Vec::new(),
                format!("No subarray sums to {target}"),
            )
            .with_aux(w.aux(last)),
        ),
    }
    rec.finish()
}
