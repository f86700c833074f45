//! GraphEngine - Core graph data structure.
//!
//! The GraphEngine stores the graph topology using petgraph's StableGraph
//! and keeps labels and positions in SoA (Structure of Arrays) buffers
//! indexed by [`NodeId`], so traversal snapshots and the renderer share one
//! numbering.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::edge::GraphSpec;
use super::node::NodeId;
use crate::config::InputLimits;
use crate::error::{VizError, VizResult};
use crate::layout::CircularLayoutConfig;

/// The core graph engine.
///
/// This struct manages:
/// - Graph topology via petgraph (edge weight = traversal cost)
/// - Node labels and the label lookup table
/// - Position buffers in SoA layout
///
/// Undirected graphs store every edge in both directions.
#[derive(Debug, Clone)]
pub struct GraphEngine {
    /// The underlying graph structure.
    /// Nodes store their stable NodeId, edges store weight.
    graph: StableGraph<NodeId, f64, Directed>,

    /// Display label per node.
    labels: Vec<String>,

    /// Map from label to NodeId.
    label_to_id: HashMap<String, NodeId>,

    /// X positions (SoA layout)
    pos_x: Vec<f64>,

    /// Y positions (SoA layout)
    pos_y: Vec<f64>,

    /// Whether edges are one-way.
    directed: bool,
}

impl GraphEngine {
    /// Create a new empty graph engine.
    pub fn new(directed: bool) -> Self {
        Self {
            graph: StableGraph::new(),
            labels: Vec::new(),
            label_to_id: HashMap::new(),
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            directed,
        }
    }

    /// Create a graph engine with pre-allocated capacity.
    pub fn with_capacity(directed: bool, node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(node_capacity, edge_capacity),
            labels: Vec::with_capacity(node_capacity),
            label_to_id: HashMap::with_capacity(node_capacity),
            pos_x: Vec::with_capacity(node_capacity),
            pos_y: Vec::with_capacity(node_capacity),
            directed,
        }
    }

    /// Validate `spec` and build an engine laid out on a circle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or oversized node list, blank or
    /// duplicate labels, edges naming unknown nodes, or weights that are
    /// negative or not finite.
    pub fn from_spec(spec: &GraphSpec, limits: &InputLimits) -> VizResult<Self> {
        if spec.nodes.is_empty() {
            return Err(VizError::invalid_input("the graph needs at least one node"));
        }
        if spec.nodes.len() > limits.max_nodes {
            return Err(VizError::invalid_input(format!(
                "graph has {} nodes, the maximum is {}",
                spec.nodes.len(),
                limits.max_nodes
            )));
        }

        let mut engine = Self::with_capacity(spec.directed, spec.nodes.len(), spec.edges.len());
        for label in &spec.nodes {
            let label = label.trim();
            if label.is_empty() {
                return Err(VizError::invalid_input("node labels cannot be blank"));
            }
            if engine.node_by_label(label).is_some() {
                return Err(VizError::invalid_input(format!("duplicate node label '{label}'")));
            }
            engine.add_node(label);
        }

        for edge in &spec.edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(VizError::invalid_input(format!(
                    "edge {} -> {} has weight {}, weights must be finite and non-negative",
                    edge.source, edge.target, edge.weight
                )));
            }
            let source = engine.require_label(&edge.source)?;
            let target = engine.require_label(&edge.target)?;
            engine.add_edge(source, target, edge.weight);
        }

        engine.apply_layout(&CircularLayoutConfig::default());
        Ok(engine)
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node. Its position starts at the origin until a layout runs.
    pub fn add_node(&mut self, label: &str) -> NodeId {
        let id = NodeId(self.labels.len() as u32);
        self.graph.add_node(id);
        self.labels.push(label.to_string());
        self.label_to_id.insert(label.to_string(), id);
        self.pos_x.push(0.0);
        self.pos_y.push(0.0);
        id
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get a node's label.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    /// Label for messages; falls back to the raw id.
    pub fn describe(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    /// Look a node up by label.
    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.label_to_id.get(label).copied()
    }

    /// Like [`node_by_label`](Self::node_by_label), as a user-facing error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no node has that label.
    pub fn require_label(&self, label: &str) -> VizResult<NodeId> {
        self.node_by_label(label.trim())
            .ok_or_else(|| VizError::invalid_input(format!("unknown node '{label}'")))
    }

    /// All labels in id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Get a node's position.
    pub fn get_node_position(&self, id: NodeId) -> Option<(f64, f64)> {
        let i = id.index();
        Some((*self.pos_x.get(i)?, *self.pos_y.get(i)?))
    }

    /// Set a node's position.
    pub fn set_node_position(&mut self, id: NodeId, x: f64, y: f64) {
        let i = id.index();
        if i < self.pos_x.len() {
            self.pos_x[i] = x;
            self.pos_y[i] = y;
        }
    }

    /// Place every node with a circular layout.
    pub fn apply_layout(&mut self, layout: &CircularLayoutConfig) {
        let positions = layout.compute(self.labels.len());
        for (i, (x, y)) in positions.into_iter().enumerate() {
            self.set_node_position(NodeId(i as u32), x, y);
        }
    }

    /// Straight-line distance between two nodes.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let (ax, ay) = self.get_node_position(a)?;
        let (bx, by) = self.get_node_position(b)?;
        Some(((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge (both directions if the graph is undirected).
    ///
    /// Returns `false` if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> bool {
        let (Some(s), Some(t)) = (self.index_of(source), self.index_of(target)) else {
            return false;
        };
        self.graph.add_edge(s, t, weight);
        if !self.directed && s != t {
            self.graph.add_edge(t, s, weight);
        }
        true
    }

    /// Get the number of stored arcs (undirected edges count twice).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing neighbours with edge weights, in ascending label order.
    /// Integer labels come first in numeric order, so `"2"` precedes `"10"`;
    /// other labels follow as text.
    pub fn neighbors(&self, id: NodeId) -> Vec<(NodeId, f64)> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut out: Vec<(NodeId, f64)> = self
            .graph
            .edges(index)
            .filter_map(|e| self.graph.node_weight(e.target()).map(|&n| (n, *e.weight())))
            .collect();
        out.sort_by(|a, b| {
            label_order(&self.labels[a.0.index()], &self.labels[b.0.index()]).then(a.1.total_cmp(&b.1))
        });
        out
    }

    /// Every arc as `(source, target, weight)`.
    pub fn arcs(&self) -> Vec<(NodeId, NodeId, f64)> {
        self.graph
            .edge_references()
            .filter_map(|e| {
                let source = *self.graph.node_weight(e.source())?;
                let target = *self.graph.node_weight(e.target())?;
                Some((source, target, *e.weight()))
            })
            .collect()
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Interleaved positions `[x0, y0, x1, y1, ...]` for upload to JS.
    pub fn positions_interleaved(&self) -> Vec<f64> {
        self.pos_x
            .iter()
            .zip(&self.pos_y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }

    fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        let index = NodeIndex::new(id.index());
        self.graph.contains_node(index).then_some(index)
    }
}

fn label_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SampleGraph;
    use crate::graph::edge::WeightedEdge;

    fn spec(nodes: &[&str], edges: &[(&str, &str, f64)], directed: bool) -> GraphSpec {
        GraphSpec {
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            edges: edges.iter().map(|&(s, t, w)| WeightedEdge::new(s, t, w)).collect(),
            directed,
        }
    }

    #[test]
    fn test_add_nodes_and_edges() {
        let mut engine = GraphEngine::new(true);
        let a = engine.add_node("A");
        let b = engine.add_node("B");
        assert_eq!(engine.node_count(), 2);
        assert!(engine.add_edge(a, b, 2.0));
        assert_eq!(engine.edge_count(), 1);
        assert!(!engine.add_edge(a, NodeId(9), 1.0));
    }

    #[test]
    fn test_undirected_edges_go_both_ways() {
        let mut engine = GraphEngine::new(false);
        let a = engine.add_node("A");
        let b = engine.add_node("B");
        engine.add_edge(a, b, 1.0);
        assert_eq!(engine.edge_count(), 2);
        assert_eq!(engine.neighbors(b), vec![(a, 1.0)]);
    }

    #[test]
    fn test_neighbors_sorted_by_label() {
        let engine = GraphEngine::from_spec(
            &spec(&["A", "D", "B", "C"], &[("A", "D", 1.0), ("A", "B", 1.0), ("A", "C", 1.0)], true),
            &InputLimits::default(),
        )
        .unwrap();
        let a = engine.node_by_label("A").unwrap();
        let labels: Vec<&str> = engine
            .neighbors(a)
            .into_iter()
            .map(|(n, _)| engine.label(n).unwrap())
            .collect();
        assert_eq!(labels, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_numeric_labels_sort_numerically() {
        let engine = GraphEngine::from_spec(
            &spec(
                &["1", "10", "2", "1a", "x"],
                &[("1", "10", 1.0), ("1", "x", 1.0), ("1", "1a", 1.0), ("1", "2", 1.0)],
                true,
            ),
            &InputLimits::default(),
        )
        .unwrap();
        let one = engine.node_by_label("1").unwrap();
        let labels: Vec<&str> = engine
            .neighbors(one)
            .into_iter()
            .map(|(n, _)| engine.label(n).unwrap())
            .collect();
        assert_eq!(labels, vec!["2", "10", "1a", "x"]);
    }

    #[test]
    fn test_from_spec_rejects_bad_input() {
        let limits = InputLimits::default();
        assert!(GraphEngine::from_spec(&spec(&[], &[], false), &limits).is_err());
        assert!(GraphEngine::from_spec(&spec(&["A", "A"], &[], false), &limits).is_err());
        assert!(GraphEngine::from_spec(&spec(&["A"], &[("A", "Z", 1.0)], false), &limits).is_err());
        assert!(GraphEngine::from_spec(&spec(&["A", "B"], &[("A", "B", -1.0)], false), &limits).is_err());

        let small = InputLimits {
            max_nodes: 1,
            ..InputLimits::default()
        };
        assert!(GraphEngine::from_spec(&spec(&["A", "B"], &[], false), &small).is_err());
    }

    #[test]
    fn test_from_spec_lays_out_on_circle() {
        let engine = GraphEngine::from_spec(&SampleGraph::UndirectedWeighted.spec(), &InputLimits::default()).unwrap();
        assert_eq!(engine.node_count(), 7);
        assert_eq!(engine.edge_count(), 18);
        let (x, _) = engine.get_node_position(NodeId(0)).unwrap();
        assert!((x - 300.0).abs() < 1e-9);
        assert_eq!(engine.positions_interleaved().len(), 14);
    }

    #[test]
    fn test_distance() {
        let mut engine = GraphEngine::new(true);
        let a = engine.add_node("A");
        let b = engine.add_node("B");
        engine.set_node_position(a, 0.0, 0.0);
        engine.set_node_position(b, 3.0, 4.0);
        assert_eq!(engine.distance(a, b), Some(5.0));
    }
}
