//! A generated run: the input it was generated from, its steps and a cursor.

use crate::error::{VizError, VizResult};
use crate::step::Step;
use crate::step::replay::replay_values;
use crate::steppers::AlgorithmSpec;
use crate::steppers::matrix::flatten;

/// One generated step sequence with a cursor into it.
///
/// The sequence is never empty and the cursor always points at a step.
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    spec: AlgorithmSpec,
    steps: Vec<Step>,
    cursor: usize,
}

impl AlgorithmRun {
    /// Wrap a generated sequence, cursor on the first step.
    ///
    /// # Errors
    ///
    /// Returns `InternalInvariantViolation` for an empty sequence; steppers
    /// always emit at least one step.
    pub fn new(spec: AlgorithmSpec, steps: Vec<Step>) -> VizResult<Self> {
        if steps.is_empty() {
            return Err(VizError::invariant(format!(
                "{} stepper produced no steps",
                spec.family()
            )));
        }
        Ok(Self {
            spec,
            steps,
            cursor: 0,
        })
    }

    pub fn spec(&self) -> &AlgorithmSpec {
        &self.spec
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    /// The step under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `InternalInvariantViolation` if the cursor left the sequence.
    pub fn current(&self) -> VizResult<&Step> {
        self.steps.get(self.cursor).ok_or_else(|| {
            VizError::invariant(format!(
                "cursor {} outside a run of {} steps",
                self.cursor,
                self.steps.len()
            ))
        })
    }

    /// Move one step forward. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move one step back. Returns `false` at the first step.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Array state after the step under the cursor, for families whose
    /// steps carry array effects. `None` for the others.
    ///
    /// # Errors
    ///
    /// Returns `InternalInvariantViolation` if an effect does not apply.
    pub fn values_at_cursor(&self) -> VizResult<Option<Vec<i64>>> {
        let initial = match &self.spec {
            AlgorithmSpec::Sorting { values, .. }
            | AlgorithmSpec::Heap { values, .. }
            | AlgorithmSpec::Container { values, .. } => values.clone(),
            AlgorithmSpec::Matrix { rows, .. } => flatten(rows),
            _ => return Ok(None),
        };
        let applied = &self.steps[..=self.cursor.min(self.steps.len() - 1)];
        replay_values(&initial, applied).map(Some)
    }
}
