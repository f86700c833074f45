//! Algorithm steppers.
//!
//! Every stepper is a pure function from validated input to a finite step
//! sequence. [`AlgorithmSpec`] names one run; [`generate`] validates it and
//! dispatches to the matching stepper. Validation is the only place a run
//! can fail: once a stepper starts it always produces a sequence.

pub mod hashmap;
pub mod heap;
pub mod linked_list;
pub mod matrix;
pub mod search;
pub mod sorting;
pub mod stack_queue;
pub mod tree;
pub mod window;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InputLimits;
use crate::error::{VizError, VizResult};
use crate::graph::{GraphAlgorithm, GraphEngine, GraphSpec, SampleGraph, traversal_steps};
use crate::input::{
    require_non_negative, require_sorted, validate_grid, validate_matrix, validate_value, validate_values,
};
use crate::step::Step;

use hashmap::{CollisionStrategy, HashFunction, MapOperation};
use heap::{HeapKind, HeapOperation};
use linked_list::{LinkedList, ListMode};
use matrix::MatrixMode;
use sorting::SortAlgorithm;
use stack_queue::{ContainerKind, ContainerOperation};
use tree::{TraversalOrder, TreeKind, TreeOperation};

/// Where a graph run gets its graph from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GraphSource {
    /// One of the built-in samples.
    Sample(SampleGraph),
    /// A graph entered by the user.
    Custom(GraphSpec),
}

impl Default for GraphSource {
    fn default() -> Self {
        Self::Sample(SampleGraph::default())
    }
}

impl GraphSource {
    /// Build and lay out the graph.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a custom graph fails validation.
    pub fn build(&self, limits: &InputLimits) -> VizResult<GraphEngine> {
        match self {
            Self::Sample(sample) => GraphEngine::from_spec(&sample.spec(), limits),
            Self::Custom(spec) => GraphEngine::from_spec(spec, limits),
        }
    }
}

/// One requested run: the algorithm family, its parameters and its input.
///
/// Serialized with a `family` tag, e.g.
/// `{"family":"binarySearch","values":[1,2,5],"target":5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "camelCase")]
pub enum AlgorithmSpec {
    Sorting {
        algorithm: SortAlgorithm,
        values: Vec<i64>,
    },
    BinarySearch {
        values: Vec<i64>,
        target: i64,
    },
    Graph {
        #[serde(default)]
        graph: GraphSource,
        algorithm: GraphAlgorithm,
        start: String,
        #[serde(default)]
        goal: Option<String>,
    },
    Heap {
        heap: HeapKind,
        #[serde(default)]
        values: Vec<i64>,
        operation: HeapOperation,
    },
    Tree {
        tree: TreeKind,
        #[serde(default)]
        values: Vec<i64>,
        operation: TreeOperation,
    },
    TreeTraversal {
        values: Vec<i64>,
        order: TraversalOrder,
    },
    LinkedList {
        list: LinkedList,
        mode: ListMode,
    },
    Window {
        values: Vec<i64>,
        target: i64,
    },
    Matrix {
        rows: Vec<Vec<i64>>,
        #[serde(default)]
        mode: MatrixMode,
    },
    HashMap {
        strategy: CollisionStrategy,
        #[serde(default = "default_hash_function")]
        function: HashFunction,
        capacity: usize,
        operations: Vec<MapOperation>,
    },
    Container {
        container: ContainerKind,
        #[serde(default)]
        values: Vec<i64>,
        operations: Vec<ContainerOperation>,
    },
}

fn default_hash_function() -> HashFunction {
    HashFunction::SumChars
}

impl AlgorithmSpec {
    /// Family name used in logs.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Sorting { .. } => "sorting",
            Self::BinarySearch { .. } => "binarySearch",
            Self::Graph { .. } => "graph",
            Self::Heap { .. } => "heap",
            Self::Tree { .. } => "tree",
            Self::TreeTraversal { .. } => "treeTraversal",
            Self::LinkedList { .. } => "linkedList",
            Self::Window { .. } => "window",
            Self::Matrix { .. } => "matrix",
            Self::HashMap { .. } => "hashMap",
            Self::Container { .. } => "container",
        }
    }
}

/// Validate `spec` against `limits` and generate its full step sequence.
///
/// # Errors
///
/// Returns `InvalidInput` when the input is empty, oversized, malformed or
/// violates the algorithm's precondition (unsorted binary search input, a
/// heap operation on a non-heap, a cyclic list for find-middle, ...).
pub fn generate(spec: &AlgorithmSpec, limits: &InputLimits) -> VizResult<Vec<Step>> {
    let steps = dispatch(spec, limits).inspect_err(|err| {
        warn!(family = spec.family(), error = %err, "rejected algorithm input");
    })?;
    debug!(family = spec.family(), steps = steps.len(), "generated step sequence");
    Ok(steps)
}

fn dispatch(spec: &AlgorithmSpec, limits: &InputLimits) -> VizResult<Vec<Step>> {
    match spec {
        AlgorithmSpec::Sorting { algorithm, values } => {
            validate_values(values, limits)?;
            Ok(sorting::sort_steps(*algorithm, values))
        }
        AlgorithmSpec::BinarySearch { values, target } => {
            validate_values(values, limits)?;
            validate_value(*target, limits)?;
            require_sorted(values)?;
            Ok(search::binary_search_steps(values, *target))
        }
        AlgorithmSpec::Graph {
            graph,
            algorithm,
            start,
            goal,
        } => {
            let engine = graph.build(limits)?;
            let start = engine.require_label(start)?;
            let goal = goal
                .as_deref()
                .filter(|g| algorithm.is_pathfinding() && !g.trim().is_empty())
                .map(|g| engine.require_label(g))
                .transpose()?;
            if *algorithm == GraphAlgorithm::AStar && goal.is_none() {
                return Err(VizError::invalid_input("A* needs a goal node"));
            }
            Ok(traversal_steps(&engine, *algorithm, start, goal))
        }
        AlgorithmSpec::Heap {
            heap: kind,
            values,
            operation,
        } => {
            validate_heap(*kind, values, operation, limits)?;
            Ok(heap::heap_steps(*kind, values, *operation))
        }
        AlgorithmSpec::Tree {
            tree: kind,
            values,
            operation,
        } => {
            validate_bounded(values, limits)?;
            let (TreeOperation::Insert { value }
            | TreeOperation::Delete { value }
            | TreeOperation::Search { value }) = operation;
            validate_value(*value, limits)?;
            Ok(tree::tree_steps(*kind, values, *operation))
        }
        AlgorithmSpec::TreeTraversal { values, order } => {
            validate_values(values, limits)?;
            Ok(tree::traversal_steps(values, *order))
        }
        AlgorithmSpec::LinkedList { list, mode } => {
            list.validate()?;
            validate_values(&list.values, limits)?;
            if list.is_cyclic() && matches!(mode, ListMode::FindMiddle | ListMode::Reverse) {
                return Err(VizError::invalid_input(
                    "this operation needs a list without a cycle",
                ));
            }
            Ok(linked_list::list_steps(list, *mode))
        }
        AlgorithmSpec::Window { values, target } => {
            validate_values(values, limits)?;
            require_non_negative(values)?;
            validate_value(*target, limits)?;
            if *target < 0 {
                return Err(VizError::invalid_input("the target sum must be non-negative"));
            }
            Ok(window::longest_window_steps(values, *target))
        }
        AlgorithmSpec::Matrix { rows, mode } => match mode {
            MatrixMode::Rotate => {
                validate_matrix(rows, limits)?;
                Ok(matrix::rotate_steps(rows))
            }
            MatrixMode::Spiral => {
                validate_grid(rows, limits)?;
                Ok(matrix::spiral_steps(rows))
            }
        },
        AlgorithmSpec::HashMap {
            strategy,
            function,
            capacity,
            operations,
        } => {
            if *capacity == 0 || *capacity > limits.max_len {
                return Err(VizError::invalid_input(format!(
                    "capacity must be between 1 and {}",
                    limits.max_len
                )));
            }
            validate_ops(operations.len(), limits)?;
            if operations.iter().any(|op| op.key().trim().is_empty()) {
                return Err(VizError::invalid_input("keys cannot be blank"));
            }
            Ok(hashmap::hash_map_steps(*strategy, *function, *capacity, operations))
        }
        AlgorithmSpec::Container {
            container,
            values,
            operations,
        } => {
            validate_bounded(values, limits)?;
            validate_ops(operations.len(), limits)?;
            for op in operations {
                if let ContainerOperation::Add { value } = op {
                    validate_value(*value, limits)?;
                }
            }
            Ok(stack_queue::container_steps(*container, values, operations))
        }
    }
}

/// Like [`validate_values`] but an empty array is fine.
fn validate_bounded(values: &[i64], limits: &InputLimits) -> VizResult<()> {
    if values.is_empty() {
        Ok(())
    } else {
        validate_values(values, limits)
    }
}

fn validate_ops(count: usize, limits: &InputLimits) -> VizResult<()> {
    if count == 0 {
        return Err(VizError::invalid_input("add at least one operation"));
    }
    if count > limits.max_ops {
        return Err(VizError::invalid_input(format!(
            "at most {} operations are allowed, got {count}",
            limits.max_ops
        )));
    }
    Ok(())
}

fn validate_heap(
    kind: HeapKind,
    values: &[i64],
    op: &HeapOperation,
    limits: &InputLimits,
) -> VizResult<()> {
    match op {
        HeapOperation::Insert { value } => {
            validate_bounded(values, limits)?;
            validate_value(*value, limits)?;
            if values.len() >= limits.max_len {
                return Err(VizError::invalid_input(format!(
                    "the heap is full at {} values",
                    limits.max_len
                )));
            }
        }
        _ => validate_values(values, limits)?,
    }

    let index = match op {
        HeapOperation::HeapifyDown { index } | HeapOperation::UpdateKey { index, .. } => Some(*index),
        _ => None,
    };
    if let Some(index) = index.filter(|&i| i >= values.len()) {
        return Err(VizError::invalid_input(format!(
            "index {index} is outside a heap of {} values",
            values.len()
        )));
    }
    if let HeapOperation::UpdateKey { value, .. } = op {
        validate_value(*value, limits)?;
    }

    let needs_heap = matches!(
        op,
        HeapOperation::Insert { .. } | HeapOperation::ExtractRoot | HeapOperation::UpdateKey { .. }
    );
    if needs_heap && !heap::is_heap(kind, values) {
        return Err(VizError::invalid_input(format!(
            "the values are not a valid {kind}; build the heap first"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    fn limits() -> InputLimits {
        InputLimits::default()
    }

    fn rejects(spec: AlgorithmSpec) {
        assert!(
            matches!(generate(&spec, &limits()), Err(VizError::InvalidInput { .. })),
            "expected rejection for {spec:?}"
        );
    }

    #[test]
    fn test_spec_from_json() {
        let spec: AlgorithmSpec =
            serde_json::from_str(r#"{"family":"binarySearch","values":[1,2,5,7,9,10],"target":7}"#)
                .unwrap();
        let steps = generate(&spec, &limits()).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.kind, StepKind::Found);
        assert_eq!(last.focus, vec![3]);
    }

    #[test]
    fn test_graph_spec_defaults_to_sample() {
        let spec: AlgorithmSpec =
            serde_json::from_str(r#"{"family":"graph","algorithm":"bfs","start":"A"}"#).unwrap();
        assert_eq!(spec.family(), "graph");
        let steps = generate(&spec, &limits()).unwrap();
        assert_eq!(steps.last().unwrap().kind, StepKind::Done);
    }

    #[test]
    fn test_heap_operation_json() {
        let spec: AlgorithmSpec = serde_json::from_str(
            r#"{"family":"heap","heap":"min","values":[40,20,60,10,30,50,70],"operation":{"op":"build"}}"#,
        )
        .unwrap();
        let steps = generate(&spec, &limits()).unwrap();
        assert_eq!(steps.last().unwrap().kind, StepKind::Done);
    }

    #[test]
    fn test_empty_and_oversized_rejected() {
        rejects(AlgorithmSpec::Sorting {
            algorithm: SortAlgorithm::Bubble,
            values: vec![],
        });
        rejects(AlgorithmSpec::Sorting {
            algorithm: SortAlgorithm::Merge,
            values: vec![1; 65],
        });
        rejects(AlgorithmSpec::Sorting {
            algorithm: SortAlgorithm::Quick,
            values: vec![1, 10_000],
        });
    }

    #[test]
    fn test_binary_search_requires_sorted() {
        rejects(AlgorithmSpec::BinarySearch {
            values: vec![3, 1, 2],
            target: 1,
        });
    }

    #[test]
    fn test_astar_requires_goal() {
        rejects(AlgorithmSpec::Graph {
            graph: GraphSource::default(),
            algorithm: GraphAlgorithm::AStar,
            start: "A".into(),
            goal: None,
        });
        rejects(AlgorithmSpec::Graph {
            graph: GraphSource::default(),
            algorithm: GraphAlgorithm::Bfs,
            start: "Z".into(),
            goal: None,
        });
    }

    #[test]
    fn test_blank_goal_means_no_goal() {
        let spec = AlgorithmSpec::Graph {
            graph: GraphSource::Sample(SampleGraph::DirectedWeighted),
            algorithm: GraphAlgorithm::Dijkstra,
            start: "A".into(),
            goal: Some("  ".into()),
        };
        let steps = generate(&spec, &limits()).unwrap();
        assert_eq!(steps.last().unwrap().kind, StepKind::Done);
    }

    #[test]
    fn test_traversals_ignore_goal() {
        let spec = AlgorithmSpec::Graph {
            graph: GraphSource::default(),
            algorithm: GraphAlgorithm::Bfs,
            start: "A".into(),
            goal: Some("Z".into()),
        };
        let steps = generate(&spec, &limits()).unwrap();
        assert_eq!(steps.last().unwrap().kind, StepKind::Done);

        rejects(AlgorithmSpec::Graph {
            graph: GraphSource::default(),
            algorithm: GraphAlgorithm::Dijkstra,
            start: "A".into(),
            goal: Some("Z".into()),
        });
    }

    #[test]
    fn test_heap_preconditions() {
        rejects(AlgorithmSpec::Heap {
            heap: HeapKind::Min,
            values: vec![5, 1, 2],
            operation: HeapOperation::Insert { value: 0 },
        });
        rejects(AlgorithmSpec::Heap {
            heap: HeapKind::Min,
            values: vec![],
            operation: HeapOperation::ExtractRoot,
        });
        rejects(AlgorithmSpec::Heap {
            heap: HeapKind::Max,
            values: vec![9, 5],
            operation: HeapOperation::UpdateKey { index: 2, value: 1 },
        });

        let insert_into_empty = AlgorithmSpec::Heap {
            heap: HeapKind::Min,
            values: vec![],
            operation: HeapOperation::Insert { value: 4 },
        };
        assert!(generate(&insert_into_empty, &limits()).is_ok());

        // Build accepts arbitrary order.
        let build = AlgorithmSpec::Heap {
            heap: HeapKind::Min,
            values: vec![5, 1, 2],
            operation: HeapOperation::Build,
        };
        assert!(generate(&build, &limits()).is_ok());
    }

    #[test]
    fn test_cyclic_list_preconditions() {
        let cyclic = LinkedList::new(vec![1, 2, 3]).with_cycle_to(1);
        rejects(AlgorithmSpec::LinkedList {
            list: cyclic.clone(),
            mode: ListMode::FindMiddle,
        });
        rejects(AlgorithmSpec::LinkedList {
            list: cyclic.clone(),
            mode: ListMode::Reverse,
        });
        let detect = AlgorithmSpec::LinkedList {
            list: cyclic,
            mode: ListMode::DetectCycle,
        };
        let steps = generate(&detect, &limits()).unwrap();
        assert_eq!(steps.last().unwrap().kind, StepKind::CycleFound);
    }

    #[test]
    fn test_window_rejects_negative_values() {
        rejects(AlgorithmSpec::Window {
            values: vec![1, -2, 3],
            target: 2,
        });
        rejects(AlgorithmSpec::Window {
            values: vec![1, 2, 3],
            target: -1,
        });
    }

    #[test]
    fn test_rotation_must_be_square() {
        rejects(AlgorithmSpec::Matrix {
            rows: vec![vec![1, 2], vec![3]],
            mode: MatrixMode::Rotate,
        });
        rejects(AlgorithmSpec::Matrix {
            rows: vec![vec![1, 2, 3], vec![4, 5, 6]],
            mode: MatrixMode::Rotate,
        });
    }

    #[test]
    fn test_spiral_accepts_rectangles() {
        let spec: AlgorithmSpec =
            serde_json::from_str(r#"{"family":"matrix","mode":"spiral","rows":[[1,2,3],[4,5,6]]}"#).unwrap();
        let steps = generate(&spec, &InputLimits::default()).unwrap();
        assert_eq!(steps.iter().filter(|s| s.kind == StepKind::Visit).count(), 6);
        assert_eq!(steps.last().unwrap().kind, StepKind::Done);

        rejects(AlgorithmSpec::Matrix {
            rows: vec![vec![1, 2], vec![3]],
            mode: MatrixMode::Spiral,
        });
    }

    #[test]
    fn test_hash_map_validation() {
        let put = |key: &str| MapOperation::Put {
            key: key.into(),
            value: "v".into(),
        };
        rejects(AlgorithmSpec::HashMap {
            strategy: CollisionStrategy::Chaining,
            function: HashFunction::SumChars,
            capacity: 0,
            operations: vec![put("a")],
        });
        rejects(AlgorithmSpec::HashMap {
            strategy: CollisionStrategy::LinearProbing,
            function: HashFunction::Length,
            capacity: 4,
            operations: vec![put(" ")],
        });
        rejects(AlgorithmSpec::HashMap {
            strategy: CollisionStrategy::Chaining,
            function: HashFunction::SumChars,
            capacity: 4,
            operations: vec![],
        });
    }

    #[test]
    fn test_container_underflow_is_not_an_error() {
        let spec = AlgorithmSpec::Container {
            container: ContainerKind::Queue,
            values: vec![],
            operations: vec![ContainerOperation::Remove],
        };
        let steps = generate(&spec, &limits()).unwrap();
        assert!(steps.iter().any(|s| s.kind == StepKind::Underflow));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let spec = AlgorithmSpec::Tree {
            tree: TreeKind::Avl,
            values: vec![30, 20, 40, 10, 25],
            operation: TreeOperation::Insert { value: 5 },
        };
        assert_eq!(
            generate(&spec, &limits()).unwrap(),
            generate(&spec, &limits()).unwrap()
        );
    }
}
