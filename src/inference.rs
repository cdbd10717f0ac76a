//! # Edge Inference
//!
//! Turns a *slim* MTG (tree edges only at the finest scale) into a *fat* one
//! by synthesizing every coarser tree edge from finer topology plus
//! decomposition.
//!
//! ```text
//! scale s      X ──<── Y          (inferred)
//!              │       │
//!              ▼       ▼
//! scale s+1    A ──<── B          (explicit: A = first component of X,
//!                                            B = first component of Y)
//! ```
//!
//! For every parentless vertex `Y` at scale `s`, its first component `B`
//! stands for it. If `B` has a tree parent, `Y` is hung under the complex
//! of that parent with `B`'s edge type. Scales are processed from the
//! finest-but-one down to 1, because scale `s` needs scale `s + 1` complete.
//!
//! The first component is only a representative: when it is not the
//! branching point of its own subtree the coarse edge is missed or
//! attributed to the wrong parent.
//!
//! Representatives that point at each other would yield a cycle; the
//! second such edge is skipped, so a pass never fails halfway through.
//!
//! Running the inference twice is harmless. Only parentless vertices are
//! candidates and [`Mtg::add_child`] refuses to re-attach a vertex, so the
//! second pass finds nothing to add.

use tracing::{debug, trace};

use crate::model::*;
use crate::mtg::Mtg;
use crate::property::EDGE_TYPE;
use crate::Result;

/// Infer the missing tree edges at every scale. Returns how many edges were
/// added.
pub fn fat_mtg(mtg: &mut Mtg) -> Result<usize> {
    let max_scale = mtg.max_scale();
    let mut inferred = 0;
    for scale in (1..max_scale).rev() {
        inferred += compute_missing_edges(mtg, scale)?;
    }
    debug!(inferred, max_scale, "edge inference complete");
    Ok(inferred)
}

/// Infer the missing tree edges of a single scale from scale `scale + 1`.
pub fn compute_missing_edges(mtg: &mut Mtg, scale: Scale) -> Result<usize> {
    let mut inferred = 0;
    for vid in mtg.roots(scale) {
        let Some(representative) = mtg.components(vid)?.next() else {
            trace!(vertex = %vid, scale, "no component, stays a root");
            continue;
        };
        let Some(fine_parent) = mtg.parent(representative)? else {
            trace!(vertex = %vid, scale, "representative is a root, stays a root");
            continue;
        };
        let Some(coarse_parent) = mtg.complex(fine_parent)? else {
            debug!(vertex = %vid, fine_parent = %fine_parent, "parent of representative has no complex");
            continue;
        };
        if coarse_parent == vid {
            debug!(vertex = %vid, "representative is not the base of its decomposition");
            continue;
        }
        if mtg.scale(coarse_parent)? != scale {
            debug!(vertex = %vid, parent = %coarse_parent, "inferred parent lies on another scale");
            continue;
        }
        if mtg.is_ancestor_or_self(vid, coarse_parent) {
            debug!(vertex = %vid, parent = %coarse_parent, "inferred edge would close a cycle");
            continue;
        }

        let mut props = PropertyMap::new();
        if let Some(edge_type) = mtg.edge_type(representative) {
            props.insert(EDGE_TYPE.into(), Value::Edge(edge_type));
        }
        mtg.add_child(coarse_parent, Some(vid), props)?;
        trace!(parent = %coarse_parent, child = %vid, scale, "inferred edge");
        inferred += 1;
    }
    Ok(inferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two coarse vertices X, Y whose first components A, B are linked `A < B`.
    fn slim_pair() -> (Mtg, VertexId, VertexId) {
        let mut g = Mtg::new();
        let plant = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let x = g.add_component(plant, None, PropertyMap::new()).unwrap();
        let y = g.add_component(plant, None, PropertyMap::new()).unwrap();
        let a = g.add_component(x, None, PropertyMap::new()).unwrap();
        let b = g.add_component(y, None, edge_props(EdgeType::Successor)).unwrap();
        g.add_child(a, Some(b), PropertyMap::new()).unwrap();
        (g, x, y)
    }

    #[test]
    fn test_infers_edge_and_type() {
        let (mut g, x, y) = slim_pair();
        assert_eq!(g.parent(y).unwrap(), None);
        assert_eq!(fat_mtg(&mut g).unwrap(), 1);
        assert_eq!(g.parent(y).unwrap(), Some(x));
        assert_eq!(g.edge_type(y), Some(EdgeType::Successor));
        assert_eq!(g.children(x).unwrap(), &[y]);
        assert!(g.is_valid());
    }

    #[test]
    fn test_second_run_adds_nothing() {
        let (mut g, x, y) = slim_pair();
        fat_mtg(&mut g).unwrap();
        let before = g.clone();
        assert_eq!(fat_mtg(&mut g).unwrap(), 0);
        assert_eq!(g.children(x).unwrap(), &[y]);
        assert_eq!(g, before);
    }

    #[test]
    fn test_root_representative_keeps_root() {
        let (mut g, x, _) = slim_pair();
        fat_mtg(&mut g).unwrap();
        assert_eq!(g.parent(x).unwrap(), None);
    }

    #[test]
    fn test_mutual_representatives_skip_the_cycle() {
        let mut g = Mtg::new();
        let plant = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let x = g.add_component(plant, None, PropertyMap::new()).unwrap();
        let y = g.add_component(plant, None, PropertyMap::new()).unwrap();
        let a = g.add_component(x, None, PropertyMap::new()).unwrap();
        let a2 = g.add_component(x, None, PropertyMap::new()).unwrap();
        let b = g.add_component(y, None, PropertyMap::new()).unwrap();
        let b2 = g.add_component(y, None, PropertyMap::new()).unwrap();
        g.add_child(b2, Some(a), edge_props(EdgeType::Successor)).unwrap();
        g.add_child(a2, Some(b), edge_props(EdgeType::Branch)).unwrap();

        assert_eq!(compute_missing_edges(&mut g, 2).unwrap(), 1);
        assert_eq!(g.parent(x).unwrap(), Some(y));
        assert_eq!(g.parent(y).unwrap(), None);
        assert_eq!(g.edge_type(x), Some(EdgeType::Successor));
        assert!(g.is_valid());
    }

    #[test]
    fn test_single_scale_is_a_no_op() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        g.add_child(a, None, PropertyMap::new()).unwrap();
        assert_eq!(fat_mtg(&mut g).unwrap(), 0);
    }
}
