//! # mtg-rs — Multiscale Tree Graphs
//!
//! A branching structure (a plant, a river network, any recursively
//! decomposable object) described at several scales at once.
//!
//! ## Design Principles
//!
//! 1. **Arena + index**: every relation is an id-keyed map; vertices are `Copy` handles
//! 2. **Two relations, one graph**: per-scale tree edges and cross-scale decomposition
//! 3. **Nothing redundant**: coarse tree edges are inferred, never supplied
//! 4. **Typed properties**: each property map is declared with a value kind
//!
//! ## Quick Start
//!
//! ```rust
//! use mtg_rs::{Mtg, VertexId, EdgeType, PropertyMap, edge_props, fat_mtg};
//!
//! # fn example() -> mtg_rs::Result<()> {
//! let mut g = Mtg::new();
//! let plant = g.add_component(VertexId::ROOT, None, PropertyMap::new())?;
//! let (x, y) = (
//!     g.add_component(plant, None, PropertyMap::new())?,
//!     g.add_component(plant, None, PropertyMap::new())?,
//! );
//! let a = g.add_component(x, None, PropertyMap::new())?;
//! let b = g.add_component(y, None, edge_props(EdgeType::Successor))?;
//! g.add_child(a, Some(b), PropertyMap::new())?;
//!
//! fat_mtg(&mut g)?;
//! assert_eq!(g.parent(y)?, Some(x));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | `mtg` | The graph: tree, decomposition, complex resolution |
//! | `inference` | Coarse-edge synthesis (`fat_mtg`) |
//! | `builder` | MTG from a tree plus per-scale colors |
//! | `traversal` | Lazy pre-order and multiscale walks |
//! | `generators` | Seeded example trees |
//! | `display` / `export` | Text rendering, JSON snapshots |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod property;
pub mod mtg;
pub mod traversal;
pub mod inference;
pub mod builder;
pub mod generators;
pub mod display;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    VertexId, Scale, EdgeType, Value, ValueKind, PropertyMap, edge_props,
};

// ============================================================================
// Re-exports: Graph and algorithms
// ============================================================================

pub use mtg::Mtg;
pub use property::{PropertyColumn, PropertyRegistry};
pub use inference::{fat_mtg, compute_missing_edges};
pub use builder::{colored_tree, random_mtg};
pub use generators::{GeneratorConfig, simple_tree, random_tree};
pub use traversal::{pre_order, iter_mtg};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexId),

    #[error("Vertex {0} has no parent")]
    InvalidParent(VertexId),

    #[error("Invalid scale: vertex {vertex} is at scale {scale}, requested {target}")]
    InvalidScale { vertex: VertexId, scale: Scale, target: Scale },

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Property already declared: {0}")]
    AlreadyDeclared(String),

    #[error("Vertex {0} already has a parent")]
    AlreadyAttached(VertexId),

    #[error("Vertex {0} already exists")]
    DuplicateVertex(VertexId),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
