//! Graph traversal and shortest-path steppers.
//!
//! Focus ids and every table in the snapshots are indexed by
//! [`NodeId::index`]. Neighbours are expanded in ascending label order, so a
//! run is fully determined by the graph, the algorithm and the endpoints.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::engine::GraphEngine;
use super::node::NodeId;
use crate::error::VizError;
use crate::step::{Aux, PathfindingState, Step, StepKind, StepRecorder};

/// Supported graph algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl GraphAlgorithm {
    /// Whether the algorithm tracks costs and can stop at a goal.
    pub fn is_pathfinding(self) -> bool {
        matches!(self, Self::Dijkstra | Self::AStar)
    }
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
        })
    }
}

impl FromStr for GraphAlgorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "aStar" => Ok(Self::AStar),
            other => Err(VizError::invalid_input(format!("unknown graph algorithm '{other}'"))),
        }
    }
}

/// Generate the step sequence for `algorithm` from `start`.
///
/// `goal` is ignored by BFS and DFS. Dijkstra without a goal builds the full
/// shortest-path tree. A* without a goal has no heuristic target and
/// behaves like Dijkstra.
pub fn traversal_steps(
    engine: &GraphEngine,
    algorithm: GraphAlgorithm,
    start: NodeId,
    goal: Option<NodeId>,
) -> Vec<Step> {
    match algorithm {
        GraphAlgorithm::Bfs => bfs(engine, start),
        GraphAlgorithm::Dfs => dfs(engine, start),
        GraphAlgorithm::Dijkstra => Pathfinder::new(engine, start, goal, false).run(),
        GraphAlgorithm::AStar => Pathfinder::new(engine, start, goal, true).run(),
    }
}

fn names(engine: &GraphEngine, ids: impl IntoIterator<Item = usize>) -> String {
    let labels: Vec<String> = ids.into_iter().map(|i| engine.describe(i)).collect();
    if labels.is_empty() {
        "empty".to_string()
    } else {
        labels.join(", ")
    }
}

// ============================================================================
// BFS / DFS
// ============================================================================

fn traversal_aux(visited: &[usize], frontier: impl IntoIterator<Item = usize>) -> Aux {
    Aux::Traversal {
        visited: visited.to_vec(),
        frontier: frontier.into_iter().collect(),
    }
}

fn bfs(engine: &GraphEngine, start: NodeId) -> Vec<Step> {
    let n = engine.node_count();
    let mut rec = StepRecorder::new();
    let mut seen = vec![false; n];
    let mut visited: Vec<usize> = Vec::with_capacity(n);
    let mut queue = VecDeque::from([start.index()]);
    seen[start.index()] = true;

    rec.record(
        Step::new(
            StepKind::Init,
            vec![start.index()],
            format!("Start BFS at {}", engine.describe(start.index())),
        )
        .with_aux(traversal_aux(&visited, queue.iter().copied())),
    );

    while let Some(u) = queue.pop_front() {
        visited.push(u);
        rec.record(
            Step::new(StepKind::Visit, vec![u], format!("Dequeue and visit {}", engine.describe(u)))
                .with_aux(traversal_aux(&visited, queue.iter().copied())),
        );

        let mut discovered = Vec::new();
        for (v, _) in engine.neighbors(NodeId(u as u32)) {
            let v = v.index();
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
                discovered.push(v);
            }
        }
        rec.record(
            Step::new(
                StepKind::Frontier,
                discovered.clone(),
                format!(
                    "Enqueue unvisited neighbours ({}), queue: {}",
                    names(engine, discovered),
                    names(engine, queue.iter().copied())
                ),
            )
            .with_aux(traversal_aux(&visited, queue.iter().copied())),
        );
    }

    let message = format!("BFS order: {}", names(engine, visited.iter().copied()));
    rec.record(
        Step::new(StepKind::Done, visited.clone(), message).with_aux(traversal_aux(&visited, [])),
    );
    rec.finish()
}

fn dfs(engine: &GraphEngine, start: NodeId) -> Vec<Step> {
    let n = engine.node_count();
    let mut rec = StepRecorder::new();
    let mut done = vec![false; n];
    let mut visited: Vec<usize> = Vec::with_capacity(n);
    let mut stack = vec![start.index()];

    rec.record(
        Step::new(
            StepKind::Init,
            vec![start.index()],
            format!("Start DFS at {}", engine.describe(start.index())),
        )
        .with_aux(traversal_aux(&visited, stack.iter().copied())),
    );

    while let Some(u) = stack.pop() {
        if done[u] {
            rec.record(
                Step::new(
                    StepKind::Skip,
                    vec![u],
                    format!("{} was already visited, skip it", engine.describe(u)),
                )
                .with_aux(traversal_aux(&visited, stack.iter().copied())),
            );
            continue;
        }
        done[u] = true;
        visited.push(u);
        rec.record(
            Step::new(StepKind::Visit, vec![u], format!("Pop and visit {}", engine.describe(u)))
                .with_aux(traversal_aux(&visited, stack.iter().copied())),
        );

        // Reverse order so the smallest label is popped first.
        let pushed: Vec<usize> = engine
            .neighbors(NodeId(u as u32))
            .into_iter()
            .rev()
            .map(|(v, _)| v.index())
            .filter(|&v| !done[v])
            .collect();
        stack.extend(&pushed);
        rec.record(
            Step::new(
                StepKind::Frontier,
                pushed.clone(),
                format!(
                    "Push unvisited neighbours ({}), stack top last: {}",
                    names(engine, pushed),
                    names(engine, stack.iter().copied())
                ),
            )
            .with_aux(traversal_aux(&visited, stack.iter().copied())),
        );
    }

    let message = format!("DFS order: {}", names(engine, visited.iter().copied()));
    rec.record(
        Step::new(StepKind::Done, visited.clone(), message).with_aux(traversal_aux(&visited, [])),
    );
    rec.finish()
}

// ============================================================================
// Dijkstra / A*
// ============================================================================

/// Scale factor that keeps a Euclidean heuristic admissible: the smallest
/// ratio of edge weight to drawn edge length. Every path then costs at
/// least `scale` times the straight-line distance it spans.
pub fn heuristic_scale(engine: &GraphEngine) -> f64 {
    engine
        .arcs()
        .into_iter()
        .filter_map(|(s, t, w)| {
            let length = engine.distance(s, t)?;
            (length > f64::EPSILON).then(|| w / length)
        })
        .reduce(f64::min)
        .unwrap_or(0.0)
}

struct Pathfinder<'a> {
    engine: &'a GraphEngine,
    start: usize,
    goal: Option<usize>,
    distances: Vec<Option<f64>>,
    predecessors: Vec<Option<usize>>,
    open: BTreeSet<usize>,
    closed: Vec<usize>,
    is_closed: Vec<bool>,
    heuristic: Option<Vec<f64>>,
    rec: StepRecorder,
}

impl<'a> Pathfinder<'a> {
    fn new(engine: &'a GraphEngine, start: NodeId, goal: Option<NodeId>, informed: bool) -> Self {
        let n = engine.node_count();
        let heuristic = match (informed, goal) {
            (true, Some(goal)) => {
                let scale = heuristic_scale(engine);
                Some(
                    (0..n)
                        .map(|i| {
                            engine
                                .distance(NodeId(i as u32), goal)
                                .map_or(0.0, |d| d * scale)
                        })
                        .collect(),
                )
            }
            _ => None,
        };
        Self {
            engine,
            start: start.index(),
            goal: goal.map(NodeId::index),
            distances: vec![None; n],
            predecessors: vec![None; n],
            open: BTreeSet::new(),
            closed: Vec::new(),
            is_closed: vec![false; n],
            heuristic,
            rec: StepRecorder::new(),
        }
    }

    fn name(&self) -> &'static str {
        if self.heuristic.is_some() { "A*" } else { "Dijkstra" }
    }

    /// Priority of an open node: g for Dijkstra, g + h for A*.
    fn priority(&self, node: usize) -> f64 {
        let g = self.distances[node].unwrap_or(f64::INFINITY);
        match &self.heuristic {
            Some(h) => g + h[node],
            None => g,
        }
    }

    fn path_to(&self, node: usize) -> Vec<usize> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    fn state(&self, path: Option<Vec<usize>>) -> Aux {
        let f_scores = self.heuristic.as_ref().map(|h| {
            self.distances
                .iter()
                .zip(h)
                .map(|(g, h)| g.map(|g| g + h))
                .collect()
        });
        Aux::Pathfinding(PathfindingState {
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            open: self.open.iter().copied().collect(),
            closed: self.closed.clone(),
            heuristic: self.heuristic.clone(),
            f_scores,
            path,
        })
    }

    fn emit(&mut self, kind: StepKind, focus: Vec<usize>, message: String, path: Option<Vec<usize>>) {
        let aux = self.state(path);
        self.rec.record(Step::new(kind, focus, message).with_aux(aux));
    }

    /// Lowest priority in the open set; ties go to the lowest node id.
    fn pop_best(&mut self) -> Option<usize> {
        let best = self
            .open
            .iter()
            .copied()
            .min_by(|&a, &b| self.priority(a).total_cmp(&self.priority(b)).then(a.cmp(&b)))?;
        self.open.remove(&best);
        Some(best)
    }

    fn run(mut self) -> Vec<Step> {
        let engine = self.engine;
        let start = self.start;

        self.distances[start] = Some(0.0);
        if self.goal == Some(start) {
            let path = vec![start];
            self.emit(
                StepKind::GoalFound,
                vec![start],
                format!("{} is both start and goal, path cost 0", engine.describe(start)),
                Some(path),
            );
            return self.rec.finish();
        }

        self.open.insert(start);
        let goal_text = self
            .goal
            .map(|g| format!(" towards {}", engine.describe(g)))
            .unwrap_or_default();
        let message = format!("Start {} at {}{goal_text}", self.name(), engine.describe(start));
        self.emit(StepKind::Init, vec![start], message, None);

        while let Some(u) = self.pop_best() {
            self.closed.push(u);
            self.is_closed[u] = true;
            let g = self.distances[u].unwrap_or(0.0);
            let message = match &self.heuristic {
                Some(_) => format!(
                    "Extract {} with lowest f = {:.1} (g = {g})",
                    engine.describe(u),
                    self.priority(u)
                ),
                None => format!("Extract {} with lowest distance {g}", engine.describe(u)),
            };
            self.emit(StepKind::Visit, vec![u], message, None);

            if self.goal == Some(u) {
                let path = self.path_to(u);
                let message = format!(
                    "Reached {}: path {} with cost {g}",
                    engine.describe(u),
                    names(engine, path.iter().copied())
                );
                self.emit(StepKind::GoalFound, path.clone(), message, Some(path));
                return self.rec.finish();
            }

            for (v, weight) in engine.neighbors(NodeId(u as u32)) {
                let v = v.index();
                if self.is_closed[v] {
                    continue;
                }
                let candidate = g + weight;
                let improves = self.distances[v].is_none_or(|d| candidate < d);
                if improves {
                    let previous = self.distances[v]
                        .map_or_else(|| "infinity".to_string(), |d| d.to_string());
                    self.distances[v] = Some(candidate);
                    self.predecessors[v] = Some(u);
                    self.open.insert(v);
                    let message = format!(
                        "Relax {} -> {}: {previous} becomes {candidate}",
                        engine.describe(u),
                        engine.describe(v)
                    );
                    self.emit(StepKind::DistanceUpdate, vec![u, v], message, None);
                }
            }

            let open: Vec<usize> = self.open.iter().copied().collect();
            let message = format!("Open set: {}", names(engine, open.iter().copied()));
            self.emit(StepKind::Frontier, open, message, None);
        }

        match self.goal {
            Some(goal) => {
                let message = format!(
                    "Open set exhausted, {} is unreachable from {}",
                    engine.describe(goal),
                    engine.describe(start)
                );
                self.emit(StepKind::NoPath, vec![goal], message, None);
            }
            None => {
                let focus = self.closed.clone();
                let message = format!(
                    "Shortest-path tree complete, {} nodes reached",
                    self.closed.len()
                );
                self.emit(StepKind::Done, focus, message, None);
            }
        }
        self.rec.finish()
    }
}
