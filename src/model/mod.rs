//! # Multiscale Tree Graph Model
//!
//! Plain DTOs shared by every layer: vertex handles, edge types and
//! property values.
//!
//! Design rule: this module is pure data — no topology, no state.

pub mod vertex;
pub mod edge;
pub mod value;
pub mod property_map;

pub use vertex::{VertexId, Scale};
pub use edge::EdgeType;
pub use value::{Value, ValueKind};
pub use property_map::{PropertyMap, edge_props};
