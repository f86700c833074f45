//! LIFO stack and FIFO queue over a plain array.
//!
//! The top of a stack and the back of a queue are the last array position.
//! Removing from an empty container is shown as an `underflow` step.

use serde::{Deserialize, Serialize};

use crate::step::{Aux, Effect, Step, StepKind, StepRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Stack,
    Queue,
}

/// `Add` is push or enqueue, `Remove` is pop or dequeue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ContainerOperation {
    Add { value: i64 },
    Remove,
    Peek,
}

/// Generate the step sequence for `ops` applied to `initial`.
pub fn container_steps(kind: ContainerKind, initial: &[i64], ops: &[ContainerOperation]) -> Vec<Step> {
    let mut items = initial.to_vec();
    let mut rec = StepRecorder::new();
    let noun = match kind {
        ContainerKind::Stack => "stack",
        ContainerKind::Queue => "queue",
    };

    rec.record(
        Step::new(StepKind::Init, Vec::new(), format!("{noun} with {} items", items.len()))
            .with_aux(Aux::Array {
                values: items.clone(),
            }),
    );

    for op in ops {
        let step = match (*op, kind) {
            (ContainerOperation::Add { value }, _) => {
                items.push(value);
                let (step_kind, verb) = match kind {
                    ContainerKind::Stack => (StepKind::Push, "Push"),
                    ContainerKind::Queue => (StepKind::Enqueue, "Enqueue"),
                };
                Step::new(step_kind, vec![items.len() - 1], format!("{verb} {value}"))
                    .with_effect(Effect::Push { value })
            }
            (ContainerOperation::Remove, _) if items.is_empty() => Step::new(
                StepKind::Underflow,
                Vec::new(),
                format!("Cannot remove from an empty {noun}"),
            ),
            (ContainerOperation::Remove, ContainerKind::Stack) => {
                let index = items.len() - 1;
                let value = items.remove(index);
                Step::new(StepKind::Pop, vec![index], format!("Pop {value}"))
                    .with_effect(Effect::Truncate { len: index })
            }
            (ContainerOperation::Remove, ContainerKind::Queue) => {
                let value = items.remove(0);
                Step::new(StepKind::Dequeue, vec![0], format!("Dequeue {value}"))
                    .with_effect(Effect::Remove { index: 0 })
            }
            (ContainerOperation::Peek, _) => {
                let index = match kind {
                    ContainerKind::Stack => items.len().checked_sub(1),
                    ContainerKind::Queue => (!items.is_empty()).then_some(0),
                };
                match index {
                    Some(i) => Step::new(StepKind::Visit, vec![i], format!("Peek: {}", items[i])),
                    None => Step::new(
                        StepKind::Underflow,
                        Vec::new(),
                        format!("Nothing to peek at in an empty {noun}"),
                    ),
                }
            }
        };
        rec.record(step.with_aux(Aux::Array {
            values: items.clone(),
        }));
    }

    rec.record(
        Step::new(
            StepKind::Done,
            (0..items.len()).collect(),
            format!("{} items left in the {noun}", items.len()),
        )
        .with_aux(Aux::Array { values: items }),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::replay::replay_values;

    use super::ContainerOperation::{Add, Peek, Remove};

    #[test]
    fn test_stack_is_lifo() {
        let ops = [Add { value: 1 }, Add { value: 2 }, Remove, Peek];
        let steps = container_steps(ContainerKind::Stack, &[], &ops);
        let pop = steps.iter().find(|s| s.kind == StepKind::Pop).unwrap();
        assert_eq!(pop.message, "Pop 2");
        assert_eq!(replay_values(&[], &steps).unwrap(), vec![1]);
    }

    #[test]
    fn test_queue_is_fifo() {
        let ops = [Add { value: 3 }, Remove];
        let steps = container_steps(ContainerKind::Queue, &[1, 2], &ops);
        let dequeue = steps.iter().find(|s| s.kind == StepKind::Dequeue).unwrap();
        assert_eq!(dequeue.message, "Dequeue 1");
        assert_eq!(replay_values(&[1, 2], &steps).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_underflow_is_a_step() {
        for kind in [ContainerKind::Stack, ContainerKind::Queue] {
            let steps = container_steps(kind, &[], &[Remove, Peek]);
            let underflows = steps.iter().filter(|s| s.kind == StepKind::Underflow).count();
            assert_eq!(underflows, 2);
            assert_eq!(steps.last().unwrap().kind, StepKind::Done);
        }
    }
}
