//! Built-in sample graphs.

use serde::{Deserialize, Serialize};

use super::edge::{GraphSpec, WeightedEdge};

/// The sample graphs offered in the graph visualizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SampleGraph {
    DirectedWeighted,
    #[default]
    UndirectedWeighted,
}

const NODES: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

const EDGES: [(&str, &str, f64); 9] = [
    ("A", "B", 4.0),
    ("A", "C", 2.0),
    ("B", "E", 3.0),
    ("C", "D", 2.0),
    ("C", "F", 4.0),
    ("D", "F", 1.0),
    ("D", "G", 5.0),
    ("E", "F", 2.0),
    ("F", "G", 3.0),
];

impl SampleGraph {
    /// Both samples share nodes and edges; only the direction differs.
    pub fn spec(self) -> GraphSpec {
        GraphSpec {
            nodes: NODES.iter().map(|n| n.to_string()).collect(),
            edges: EDGES
                .iter()
                .map(|&(s, t, w)| WeightedEdge::new(s, t, w))
                .collect(),
            directed: self == Self::DirectedWeighted,
        }
    }
}
