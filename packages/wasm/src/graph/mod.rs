//! Graph data structures and traversal steppers.
//!
//! This module provides the graph structure using petgraph's StableGraph
//! for stable node indices, with Structure of Arrays (SoA) layout for
//! node positions. Traversals read the engine and emit steps; they never
//! modify it.

mod edge;
mod engine;
mod node;
mod samples;
mod traversal;

pub use edge::{GraphSpec, WeightedEdge};
pub use engine::GraphEngine;
pub use node::NodeId;
pub use samples::SampleGraph;
pub use traversal::{GraphAlgorithm, heuristic_scale, traversal_steps};
