//! Vertex identifiers and scales.

use serde::{Deserialize, Serialize};

/// Level of abstraction. Scale 0 is the whole structure.
pub type Scale = usize;

/// Opaque vertex identifier.
///
/// Ids are plain integer handles into the graph's id-keyed maps. They are
/// allocated in strictly increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl VertexId {
    /// The reserved top vertex: scale 0, always present, never a child.
    pub const ROOT: VertexId = VertexId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        VertexId(id)
    }
}
