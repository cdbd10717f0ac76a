//! # Traversal
//!
//! Lazy walks over a [`Mtg`]. Both iterators keep an explicit stack, so deep
//! axes never recurse, and both borrow the graph for their whole lifetime.

use crate::model::VertexId;
use crate::mtg::Mtg;

// ============================================================================
// Pre-order walk within one scale
// ============================================================================

/// Pre-order walk of the tree relation from `start`.
///
/// With `complex: Some(c)` the walk is pruned at every vertex whose
/// complex is not `c`: that vertex and its whole subtree are skipped. This
/// is how [`Mtg::components`] stays inside one decomposition.
pub fn pre_order(mtg: &Mtg, start: VertexId, complex: Option<VertexId>) -> PreOrder<'_> {
    PreOrder { mtg, stack: vec![start], complex }
}

/// Iterator returned by [`pre_order`] and [`Mtg::components`].
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    mtg: &'a Mtg,
    stack: Vec<VertexId>,
    complex: Option<VertexId>,
}

impl<'a> PreOrder<'a> {
    pub(crate) fn empty(mtg: &'a Mtg) -> Self {
        Self { mtg, stack: Vec::new(), complex: None }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        while let Some(vid) = self.stack.pop() {
            if self.complex.is_some() && self.mtg.resolve_complex(vid) != self.complex {
                continue;
            }
            self.stack.extend(self.mtg.children_of(vid).iter().rev());
            return Some(vid);
        }
        None
    }
}

// ============================================================================
// Multiscale walk
// ============================================================================

/// Depth-first walk across scales: a vertex, then each of its components
/// (in [`Mtg::components`] order) immediately followed by that component's
/// own decomposition.
///
/// Starting from the root this visits every vertex reachable through the
/// decomposition relation exactly once.
pub fn iter_mtg(mtg: &Mtg, start: VertexId) -> MtgWalk<'_> {
    MtgWalk { mtg, stack: vec![start] }
}

/// Iterator returned by [`iter_mtg`].
#[derive(Debug, Clone)]
pub struct MtgWalk<'a> {
    mtg: &'a Mtg,
    stack: Vec<VertexId>,
}

impl Iterator for MtgWalk<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        let vid = self.stack.pop()?;
        if let Some(first) = self.mtg.first_component(vid) {
            let components: Vec<VertexId> = pre_order(self.mtg, first, Some(vid)).collect();
            self.stack.extend(components.into_iter().rev());
        }
        Some(vid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pre_order_without_bound() {
        let mut g = Mtg::new();
        let a = g.add_child(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let b = g.add_child(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let c = g.add_child(a, None, PropertyMap::new()).unwrap();
        let walk: Vec<_> = pre_order(&g, VertexId::ROOT, None).collect();
        assert_eq!(walk, vec![VertexId::ROOT, a, c, b]);
    }

    #[test]
    fn test_iter_mtg_interleaves_scales() {
        let mut g = Mtg::new();
        let p1 = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(p1, None, PropertyMap::new()).unwrap();
        let b = g.add_child(a, None, PropertyMap::new()).unwrap();
        let (c, p2) = g.add_child_and_complex(b, None, None, PropertyMap::new()).unwrap();

        let walk: Vec<_> = iter_mtg(&g, VertexId::ROOT).collect();
        assert_eq!(walk, vec![VertexId::ROOT, p1, a, b, p2, c]);
        assert_eq!(walk.len(), g.nb_vertices());
    }
}
