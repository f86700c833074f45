//! Layout algorithms for graph visualization.
//!
//! Layouts compute node positions in canvas space. Positions are stored on
//! the [`GraphEngine`](crate::graph::GraphEngine) and exported to the
//! renderer; pathfinding heuristics read them too.

pub mod circular;

pub use circular::CircularLayoutConfig;
