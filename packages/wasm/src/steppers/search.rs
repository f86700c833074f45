//! Binary search over a sorted array.

use crate::step::{Aux, Step, StepKind, StepRecorder};

/// Generate the step sequence for finding `target` in sorted `values`.
///
/// Emits `compare` at each midpoint followed by either `found` or `narrow`,
/// and `notFound` once `low > high`. The caller guarantees `values` is sorted.
pub fn binary_search_steps(values: &[i64], target: i64) -> Vec<Step> {
    let mut rec = StepRecorder::new();
    let mut low: i64 = 0;
    let mut high: i64 = values.len() as i64 - 1;

    while low <= high {
        let mid = (low + (high - low) / 2) as usize;
        let probe = values[mid];
        rec.record(
            Step::new(
                StepKind::Compare,
                vec![mid],
                format!("Check a[{mid}] = {probe} against target {target}"),
            )
            .with_aux(Aux::Bounds {
                low,
                high,
                mid: Some(mid),
            }),
        );

        if probe == target {
            rec.record(
                Step::new(StepKind::Found, vec![mid], format!("Found {target} at index {mid}"))
                    .with_aux(Aux::Bounds {
                        low,
                        high,
                        mid: Some(mid),
                    }),
            );
            return rec.finish();
        }

        let message = if probe < target {
            low = mid as i64 + 1;
            format!("{probe} < {target}, search the right half [{low}, {high}]")
        } else {
            high = mid as i64 - 1;
            format!("{probe} > {target}, search the left half [{low}, {high}]")
        };
        rec.record(
            Step::new(StepKind::Narrow, vec![], message).with_aux(Aux::Bounds {
                low,
                high,
                mid: None,
            }),
        );
    }

    rec.record(
        Step::new(
            StepKind::NotFound,
            vec![],
            format!("{target} is not in the array"),
        )
        .with_aux(Aux::Bounds {
            low,
            high,
            mid: None,
        }),
    );
    rec.finish()
}
