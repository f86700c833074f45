//! Replaying step effects against a working copy of the input.
//!
//! Applying every [`Effect`] of a run, in order, to a copy of the input must
//! reproduce the structure the stepper ended with. The presentation layer
//! uses this to rebuild the state at any cursor position, and tests use it
//! to check steppers end-to-end.

use super::{Effect, Step};
use crate::error::{VizError, VizResult};

/// A structure that step effects can be applied to.
pub trait Workspace {
    /// Apply one effect.
    ///
    /// # Errors
    ///
    /// Returns `InternalInvariantViolation` if the effect does not fit the
    /// workspace (out-of-range index, wrong effect family).
    fn apply(&mut self, effect: &Effect) -> VizResult<()>;
}

impl Workspace for Vec<i64> {
    fn apply(&mut self, effect: &Effect) -> VizResult<()> {
        match *effect {
            Effect::Swap { a, b } => {
                if a >= self.len() || b >= self.len() {
                    return Err(VizError::invariant(format!(
                        "swap ({a}, {b}) outside array of length {}",
                        self.len()
                    )));
                }
                self.swap(a, b);
            }
            Effect::Write { index, value } => {
                let slot = self.get_mut(index).ok_or_else(|| {
                    VizError::invariant(format!("write to index {index} outside array"))
                })?;
                *slot = value;
            }
            Effect::Push { value } => self.push(value),
            Effect::Truncate { len } => {
                if len > self.len() {
                    return Err(VizError::invariant(format!(
                        "truncate to {len} beyond length {}",
                        self.len()
                    )));
                }
                self.truncate(len);
            }
            Effect::Remove { index } => {
                if index >= self.len() {
                    return Err(VizError::invariant(format!(
                        "remove index {index} outside array of length {}",
                        self.len()
                    )));
                }
                self.remove(index);
            }
            Effect::Link { .. } => {
                return Err(VizError::invariant("link effect applied to an array"));
            }
        }
        Ok(())
    }
}

/// `next` pointers of a singly linked list, indexed by node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTable(pub Vec<Option<usize>>);

impl Workspace for LinkTable {
    fn apply(&mut self, effect: &Effect) -> VizResult<()> {
        match *effect {
            Effect::Link { node, next } => {
                let len = self.0.len();
                if next.is_some_and(|n| n >= len) {
                    return Err(VizError::invariant(format!(
                        "link target {next:?} outside list of length {len}"
                    )));
                }
                let slot = self.0.get_mut(node).ok_or_else(|| {
                    VizError::invariant(format!("link from node {node} outside list"))
                })?;
                *slot = next;
                Ok(())
            }
            _ => Err(VizError::invariant("array effect applied to a link table")),
        }
    }
}

/// Apply the effects of `steps` in order.
///
/// # Errors
///
/// Propagates the first effect that does not fit the workspace.
pub fn replay<W: Workspace>(workspace: &mut W, steps: &[Step]) -> VizResult<()> {
    for effect in steps.iter().filter_map(|s| s.effect.as_ref()) {
        workspace.apply(effect)?;
    }
    Ok(())
}

/// Replay a run against a copy of `initial` and return the result.
///
/// # Errors
///
/// Propagates the first effect that does not fit.
pub fn replay_values(initial: &[i64], steps: &[Step]) -> VizResult<Vec<i64>> {
    let mut working = initial.to_vec();
    replay(&mut working, steps)?;
    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    #[test]
    fn test_replay_array_effects() {
        let steps = vec![
            Step::new(StepKind::Compare, vec![0, 1], "compare"),
            Step::new(StepKind::Swap, vec![0, 1], "swap").with_effect(Effect::Swap { a: 0, b: 1 }),
            Step::new(StepKind::Place, vec![2], "place").with_effect(Effect::Write { index: 2, value: 9 }),
            Step::new(StepKind::Push, vec![3], "push").with_effect(Effect::Push { value: 4 }),
            Step::new(StepKind::Pop, vec![0], "pop").with_effect(Effect::Truncate { len: 3 }),
            Step::new(StepKind::Dequeue, vec![0], "dequeue").with_effect(Effect::Remove { index: 0 }),
        ];
        let result = replay_values(&[5, 3, 8], &steps).unwrap();
        assert_eq!(result, vec![5, 9]);
    }

    #[test]
    fn test_out_of_range_swap_is_invariant_violation() {
        let steps = vec![Step::new(StepKind::Swap, vec![0, 7], "bad").with_effect(Effect::Swap { a: 0, b: 7 })];
        let err = replay_values(&[1, 2], &steps).unwrap_err();
        assert!(matches!(err, VizError::InternalInvariantViolation { .. }));
    }

    #[test]
    fn test_link_table() {
        let mut links = LinkTable(vec![Some(1), Some(2), None]);
        let steps = vec![
            Step::new(StepKind::Relink, vec![0], "0 -> none").with_effect(Effect::Link { node: 0, next: None }),
            Step::new(StepKind::Relink, vec![1], "1 -> 0").with_effect(Effect::Link { node: 1, next: Some(0) }),
        ];
        replay(&mut links, &steps).unwrap();
        assert_eq!(links, LinkTable(vec![None, Some(0), Some(2)]));
    }

    #[test]
    fn test_wrong_family_rejected() {
        let mut links = LinkTable(vec![None]);
        assert!(links.apply(&Effect::Swap { a: 0, b: 0 }).is_err());
        let mut values = vec![1];
        assert!(values.apply(&Effect::Link { node: 0, next: None }).is_err());
    }
}
