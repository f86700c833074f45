//! Property-based tests for the steppers and the playback driver.
//!
//! 1. Replaying any sort's effects yields the sorted input
//! 2. Binary search finds exactly the present targets in O(log n) steps
//! 3. BFS visits each reachable node once, in non-decreasing hop distance
//! 4. Dijkstra distances match an all-pairs reference
//! 5. Floyd's walk detects cycles within O(n) steps
//! 6. Heap builds and sorts replay to valid results
//! 7. AVL inserts keep the tree ordered and balanced
//! 8. Reset then Start reproduces the identical sequence

#![cfg(not(target_arch = "wasm32"))]

use std::collections::VecDeque;

use algoviz_wasm::config::InputLimits;
use algoviz_wasm::graph::{GraphAlgorithm, GraphEngine, GraphSpec, WeightedEdge, traversal_steps};
use algoviz_wasm::playback::PlaybackDriver;
use algoviz_wasm::step::replay::replay_values;
use algoviz_wasm::step::{Aux, Step, StepKind, TreeSnapshot};
use algoviz_wasm::steppers::heap::{HeapKind, HeapOperation, heap_steps, is_heap};
use algoviz_wasm::steppers::linked_list::{LinkedList, ListMode, list_steps};
use algoviz_wasm::steppers::search::binary_search_steps;
use algoviz_wasm::steppers::sorting::{SortAlgorithm, sort_steps};
use algoviz_wasm::steppers::tree::{TreeKind, TreeOperation, tree_steps};
use algoviz_wasm::steppers::AlgorithmSpec;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn values_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-99i64..100, 1..24)
}

fn algorithm_strategy() -> impl Strategy<Value = SortAlgorithm> {
    prop_oneof![
        Just(SortAlgorithm::Bubble),
        Just(SortAlgorithm::Selection),
        Just(SortAlgorithm::Insertion),
        Just(SortAlgorithm::Quick),
        Just(SortAlgorithm::Merge),
    ]
}

const LABELS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// Random graph over the first `n` labels with small integer weights.
fn graph_strategy() -> impl Strategy<Value = GraphSpec> {
    (1usize..=LABELS.len(), any::<bool>()).prop_flat_map(|(n, directed)| {
        prop::collection::vec((0..n, 0..n, 0u8..10), 0..20).prop_map(move |edges| GraphSpec {
            nodes: LABELS[..n].iter().map(|l| l.to_string()).collect(),
            edges: edges
                .into_iter()
                .map(|(s, t, w)| WeightedEdge::new(LABELS[s], LABELS[t], f64::from(w)))
                .collect(),
            directed,
        })
    })
}

fn build(spec: &GraphSpec) -> GraphEngine {
    GraphEngine::from_spec(spec, &InputLimits::default()).unwrap()
}

/// Hop distances from `start`, `None` if unreachable.
fn hops(engine: &GraphEngine, start: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; engine.node_count()];
    dist[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for (v, _) in engine.neighbors((u as u32).into()) {
            if dist[v.index()].is_none() {
                dist[v.index()] = dist[u].map(|d| d + 1);
                queue.push_back(v.index());
            }
        }
    }
    dist
}

/// Floyd-Warshall over the engine's arcs.
fn all_pairs(engine: &GraphEngine) -> Vec<Vec<f64>> {
    let n = engine.node_count();
    let mut d = vec![vec![f64::INFINITY; n]; n];
    for (i, row) in d.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for (s, t, w) in engine.arcs() {
        let cell = &mut d[s.index()][t.index()];
        *cell = cell.min(w);
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = d[i][k] + d[k][j];
                if via < d[i][j] {
                    d[i][j] = via;
                }
            }
        }
    }
    d
}

fn final_tree(steps: &[Step]) -> TreeSnapshot {
    match &steps.last().unwrap().aux {
        Some(Aux::Tree(tree)) => tree.clone(),
        other => panic!("expected a tree snapshot, got {other:?}"),
    }
}

fn height(tree: &TreeSnapshot, id: Option<usize>) -> i64 {
    id.and_then(|id| tree.node(id)).map_or(0, |n| {
        1 + height(tree, n.left).max(height(tree, n.right))
    })
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Sorting
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sort_replay_yields_sorted(algorithm in algorithm_strategy(), values in values_strategy()) {
        let steps = sort_steps(algorithm, &values);
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(replay_values(&values, &steps).unwrap(), expected);
        prop_assert_eq!(steps.last().unwrap().kind, StepKind::Done);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Binary search
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn binary_search_is_correct(mut values in values_strategy(), target in -120i64..120) {
        values.sort_unstable();
        let steps = binary_search_steps(&values, target);
        let last = steps.last().unwrap();
        match last.kind {
            StepKind::Found => prop_assert_eq!(values[last.focus[0]], target),
            StepKind::NotFound => prop_assert!(!values.contains(&target)),
            other => prop_assert!(false, "unexpected terminal {:?}", other),
        }
        let bits = (usize::BITS - values.len().leading_zeros()) as usize;
        prop_assert!(steps.len() <= 2 * (bits + 1) + 2, "{} steps for n = {}", steps.len(), values.len());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3-4. Graphs
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bfs_visits_reachable_once_by_distance(spec in graph_strategy()) {
        let engine = build(&spec);
        let start = engine.node_by_label("A").unwrap();
        let steps = traversal_steps(&engine, GraphAlgorithm::Bfs, start, None);
        let visits: Vec<usize> = steps
            .iter()
            .filter(|s| s.kind == StepKind::Visit)
            .map(|s| s.focus[0])
            .collect();

        let dist = hops(&engine, start.index());
        let reachable = dist.iter().filter(|d| d.is_some()).count();
        prop_assert_eq!(visits.len(), reachable);

        let mut seen = vec![false; engine.node_count()];
        let mut previous = 0;
        for v in visits {
            prop_assert!(!seen[v], "node {} visited twice", v);
            seen[v] = true;
            let d = dist[v].unwrap();
            prop_assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn dijkstra_matches_all_pairs(spec in graph_strategy()) {
        let engine = build(&spec);
        let start = engine.node_by_label("A").unwrap();
        let steps = traversal_steps(&engine, GraphAlgorithm::Dijkstra, start, None);
        let reference = all_pairs(&engine);
        let Some(Aux::Pathfinding(state)) = &steps.last().unwrap().aux else {
            panic!("missing pathfinding state");
        };
        for (v, got) in state.distances.iter().enumerate() {
            let want = reference[start.index()][v];
            match got {
                Some(d) => prop_assert!((d - want).abs() < 1e-9, "node {}: {} vs {}", v, d, want),
                None => prop_assert!(want.is_infinite()),
            }
        }
    }

    #[test]
    fn astar_cost_matches_dijkstra(spec in graph_strategy(), goal in 0usize..LABELS.len()) {
        let engine = build(&spec);
        let goal = goal.min(engine.node_count() - 1);
        let start = engine.node_by_label("A").unwrap();
        let goal = engine.node_by_label(LABELS[goal]).unwrap();
        let reference = all_pairs(&engine)[start.index()][goal.index()];

        let steps = traversal_steps(&engine, GraphAlgorithm::AStar, start, Some(goal));
        let last = steps.last().unwrap();
        if reference.is_infinite() {
            prop_assert_eq!(last.kind, StepKind::NoPath);
        } else {
            prop_assert_eq!(last.kind, StepKind::GoalFound);
            let Some(Aux::Pathfinding(state)) = &last.aux else {
                panic!("missing pathfinding state");
            };
            let cost = state.distances[goal.index()].unwrap();
            prop_assert!((cost - reference).abs() < 1e-9);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Floyd's cycle detection
// ═══════════════════════════════════════════════════════════════════════

fn list_strategy() -> impl Strategy<Value = LinkedList> {
    (1usize..40).prop_flat_map(|n| {
        (prop::collection::vec(-99i64..100, n), prop::option::of(0..n)).prop_map(
            |(values, cycle_to)| LinkedList { values, cycle_to },
        )
    })
}

proptest! {
    #[test]
    fn floyd_detects_cycles_in_linear_steps(list in list_strategy()) {
        let steps = list_steps(&list, ListMode::DetectCycle);
        let last = steps.last().unwrap().kind;
        if list.is_cyclic() {
            prop_assert_eq!(last, StepKind::CycleFound);
        } else {
            prop_assert_eq!(last, StepKind::NoCycle);
        }
        prop_assert!(steps.len() <= 2 * list.len() + 3);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6-7. Heaps and trees
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn heap_build_and_sort(values in values_strategy(), max in any::<bool>()) {
        let kind = if max { HeapKind::Max } else { HeapKind::Min };

        let built = replay_values(&values, &heap_steps(kind, &values, HeapOperation::Build)).unwrap();
        prop_assert!(is_heap(kind, &built));

        let sorted = replay_values(&values, &heap_steps(kind, &values, HeapOperation::Sort)).unwrap();
        let mut expected = values.clone();
        expected.sort_unstable();
        if !max {
            expected.reverse();
        }
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn avl_insert_stays_ordered_and_balanced(values in values_strategy(), extra in -99i64..100) {
        let steps = tree_steps(TreeKind::Avl, &values, TreeOperation::Insert { value: extra });
        let tree = final_tree(&steps);

        let mut expected = values.clone();
        expected.push(extra);
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(tree.in_order(), expected);

        for node in &tree.nodes {
            let balance = height(&tree, node.left) - height(&tree, node.right);
            prop_assert!(balance.abs() <= 1, "node {} has balance {}", node.value, balance);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 8. Playback determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_then_start_is_identical(
        algorithm in algorithm_strategy(),
        values in values_strategy(),
        elapsed in 0.0f64..5000.0,
    ) {
        let spec = AlgorithmSpec::Sorting { algorithm, values };
        let mut driver = PlaybackDriver::default();
        driver.start(spec.clone()).unwrap();
        let first = driver.run().unwrap().steps().to_vec();

        driver.tick(elapsed);
        driver.reset();
        driver.start(spec).unwrap();
        prop_assert_eq!(driver.run().unwrap().steps(), first.as_slice());
        prop_assert_eq!(driver.cursor(), 0);
    }
}
