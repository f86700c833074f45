//! Graph descriptions as they cross the input boundary.
//!
//! A [`GraphSpec`] names nodes by label and lists weighted edges between
//! labels. It is validated and turned into a
//! [`GraphEngine`](super::GraphEngine) before any traversal runs.

use serde::{Deserialize, Serialize};

/// One weighted edge between two labelled nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl WeightedEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Labelled nodes plus weighted edges.
///
/// Undirected edges are traversable both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<String>,
    pub edges: Vec<WeightedEdge>,
    #[serde(default)]
    pub directed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_defaults_to_one() {
        let edge: WeightedEdge = serde_json::from_str(r#"{"source":"A","target":"B"}"#).unwrap();
        assert_eq!(edge, WeightedEdge::new("A", "B", 1.0));
    }

    #[test]
    fn test_spec_defaults_to_undirected() {
        let spec: GraphSpec = serde_json::from_str(r#"{"nodes":["A"],"edges":[]}"#).unwrap();
        assert!(!spec.directed);
    }
}
