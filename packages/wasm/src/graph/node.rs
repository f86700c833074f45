//! Node identifiers.
//!
//! Nodes are the vertices of a visualized graph. Each node has:
//! - A stable identifier, equal to its insertion order
//! - A display label (`"A"`, `"B"`, ...)
//! - A position in canvas space, stored on the engine

/// Stable node identifier.
///
/// Graphs are built once per run and never shrink, so the id doubles as
/// the index used in step focus lists and snapshot tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into per-node tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
