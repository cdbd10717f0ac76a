//! # Example-graph generators
//!
//! Small trees and MTGs for tests and demos. Randomness is always injected:
//! pass an explicit `Rng`, or build a seeded one from [`GeneratorConfig`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::builder::random_mtg;
use crate::model::*;
use crate::mtg::Mtg;
use crate::Result;

// ============================================================================
// Configuration
// ============================================================================

/// Parameters shared by the random generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed for reproducible output.
    pub seed: u64,
    /// Upper bound on the children created under one vertex.
    pub nb_children: usize,
    /// Vertices to add under the start vertex.
    pub nb_vertices: usize,
    /// Scales of the generated MTG, the global root's scale included.
    pub nb_scales: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            nb_children: 3,
            nb_vertices: 20,
            nb_scales: 3,
        }
    }
}

impl GeneratorConfig {
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// A random single-scale tree grown from the root.
    pub fn tree(&self) -> Result<Mtg> {
        let mut tree = Mtg::new();
        random_tree(&mut tree, VertexId::ROOT, self.nb_children, self.nb_vertices, &mut self.rng())?;
        Ok(tree)
    }

    /// A random tree, then a random multiscale coloring of it.
    pub fn mtg(&self) -> Result<Mtg> {
        let mut rng = self.rng();
        let mut tree = Mtg::new();
        random_tree(&mut tree, VertexId::ROOT, self.nb_children, self.nb_vertices, &mut rng)?;
        random_mtg(&tree, self.nb_scales, &mut rng)
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Grow a complete tree under `root`, breadth first, `nb_children` per
/// vertex until `nb_vertices` vertices have been added.
pub fn simple_tree(tree: &mut Mtg, root: VertexId, nb_children: usize, nb_vertices: usize) -> Result<()> {
    tree.scale(root)?;
    if nb_children == 0 {
        return Ok(());
    }
    let mut remaining = nb_vertices;
    let mut queue = VecDeque::from([root]);
    while remaining > 0 {
        let Some(vid) = queue.pop_front() else { break };
        for _ in 0..nb_children.min(remaining) {
            let child = tree.add_child(vid, None, PropertyMap::new())?;
            remaining -= 1;
            queue.push_back(child);
        }
    }
    Ok(())
}

/// Grow a random tree under `root`, depth first.
///
/// Each expanded vertex gets between 1 and `nb_children` children; the
/// middle one continues the axis (`<`), the others branch (`+`). Returns
/// the last vertex created, or `root` when `nb_vertices` is 0.
pub fn random_tree<R: Rng>(
    mtg: &mut Mtg,
    root: VertexId,
    nb_children: usize,
    nb_vertices: usize,
    rng: &mut R,
) -> Result<VertexId> {
    mtg.scale(root)?;
    let max_children = nb_children.max(1);
    let mut remaining = nb_vertices;
    let mut stack = vec![root];
    while remaining > 0 {
        let n = rng.gen_range(1..=max_children).min(remaining);
        let Some(vid) = stack.pop() else { break };
        for i in 0..n {
            let edge_type = if i == n / 2 { EdgeType::Successor } else { EdgeType::Branch };
            let child = mtg.add_child(vid, None, edge_props(edge_type))?;
            remaining -= 1;
            stack.push(child);
        }
    }
    Ok(stack.last().copied().unwrap_or(root))
}
