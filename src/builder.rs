//! # Multiscale Builder
//!
//! Builds a consistent MTG from a single-scale tree and, for each scale, the
//! subset of tree vertices visible at that scale ("colors"). Only the
//! finest scale receives the tree's edges and properties; every coarser
//! edge comes from [`fat_mtg`].
//!
//! ```text
//! tree T  +  colors {1: [r, x], 2: [r, x, y, z]}
//!   → scale 1: r', x'            (components of the global root)
//!   → scale 2: r'', x'', y'', z''  (r'' ⊂ r', x'' ⊂ x', y'' z'' inherit)
//!   → T's edges copied on scale 2, scale 1 inferred
//! ```

use std::collections::{BTreeMap, HashSet};

use hashbrown::HashMap;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::inference::fat_mtg;
use crate::model::*;
use crate::mtg::Mtg;
use crate::{Error, Result};

/// Build a fat MTG from `tree` and per-scale visible vertex lists.
///
/// `tree` must live on a single scale (typically grown from the root at
/// scale 0). `colors` maps every scale `1..=N-1` to the tree vertices
/// visible there. The tree root is moved to the front of every list (and
/// added where missing) so it anchors each scale. Lists must be nested and
/// the finest one must cover the whole tree.
pub fn colored_tree(tree: &Mtg, colors: &BTreeMap<Scale, Vec<VertexId>>) -> Result<Mtg> {
    if tree.nb_scales() != 1 {
        return Err(Error::InvalidTree(format!("input tree spans {} scales", tree.nb_scales())));
    }
    let layers = normalize_colors(tree, colors)?;
    let finest = layers.len() - 1;

    // 1. One fresh id per (scale, tree vertex).
    let mut index: Vec<HashMap<VertexId, VertexId>> = vec![HashMap::new(); layers.len()];
    let mut count = 1;
    for (scale, layer) in layers.iter().enumerate().skip(1) {
        for vid in layer {
            index[scale].insert(*vid, VertexId(count));
            count += 1;
        }
    }

    let mut g = Mtg::new();
    for (name, column) in tree.properties().columns() {
        if !g.properties().is_declared(name) {
            g.add_property(name, column.kind())?;
        }
    }

    // 2. Scale 1 decomposes the global root.
    for vid in &layers[1] {
        g.add_component(VertexId::ROOT, Some(index[1][vid]), PropertyMap::new())?;
    }

    // 3. Finer scales: explicit link when the vertex is also visible one
    //    scale up, otherwise the complex is inherited through the tree.
    for scale in 2..layers.len() {
        for vid in &layers[scale] {
            let id = index[scale][vid];
            match index[scale - 1].get(vid) {
                Some(complex) => {
                    g.add_component(*complex, Some(id), PropertyMap::new())?;
                }
                None => g.register_vertex(id, scale)?,
            }
        }
    }

    // 4. Tree edges and properties land on the finest scale.
    let fine = &index[finest];
    for vid in tree.vertices() {
        for child in tree.children(vid)? {
            g.add_child(fine[&vid], Some(fine[child]), PropertyMap::new())?;
        }
    }
    for (name, column) in tree.properties().columns() {
        for (vid, value) in column.iter() {
            g.set_property(name, fine[&vid], value.clone())?;
        }
    }

    // 5. Coarser topology.
    let inferred = fat_mtg(&mut g)?;
    debug!(
        vertices = g.nb_vertices(),
        scales = g.nb_scales(),
        inferred,
        "built multiscale graph from colored tree"
    );
    Ok(g)
}

/// Index colors by scale, anchor the tree root, and check nesting.
fn normalize_colors(tree: &Mtg, colors: &BTreeMap<Scale, Vec<VertexId>>) -> Result<Vec<Vec<VertexId>>> {
    let finest = match colors.keys().next_back() {
        Some(scale) if *scale >= 1 => *scale,
        _ => return Err(Error::InvalidTree("no scale above 0 to color".into())),
    };
    if colors.contains_key(&0) {
        return Err(Error::InvalidTree("scale 0 is reserved for the global root".into()));
    }

    let root = tree.root();
    let mut layers = vec![Vec::new()];
    for scale in 1..=finest {
        let requested = colors
            .get(&scale)
            .ok_or_else(|| Error::InvalidTree(format!("no colors given for scale {scale}")))?;
        let mut seen = HashSet::new();
        let mut layer = vec![root];
        seen.insert(root);
        for vid in requested {
            tree.scale(*vid)?;
            if seen.insert(*vid) {
                layer.push(*vid);
            }
        }
        layers.push(layer);
    }

    for scale in 1..finest {
        let finer: HashSet<_> = layers[scale + 1].iter().collect();
        if let Some(vid) = layers[scale].iter().find(|v| !finer.contains(v)) {
            return Err(Error::InvalidTree(format!(
                "vertex {vid} visible at scale {scale} but not at scale {}",
                scale + 1
            )));
        }
    }
    if layers[finest].len() != tree.nb_vertices() {
        return Err(Error::InvalidTree(format!(
            "finest scale colors {} of {} tree vertices",
            layers[finest].len(),
            tree.nb_vertices()
        )));
    }
    Ok(layers)
}

/// Build a random MTG with `nb_scales` scales on top of `tree`.
///
/// The finest scale shows every tree vertex; each coarser scale shows a
/// random sorted sample of the next finer one.
pub fn random_mtg<R: Rng>(tree: &Mtg, nb_scales: usize, rng: &mut R) -> Result<Mtg> {
    if nb_scales < 2 {
        return Err(Error::InvalidTree(format!("need at least 2 scales, got {nb_scales}")));
    }
    let root = tree.root();
    let mut colors = BTreeMap::new();
    colors.insert(nb_scales - 1, tree.vertices().collect::<Vec<_>>());

    let mut n = tree.nb_vertices();
    for scale in (1..nb_scales - 1).rev() {
        n = rng.gen_range(1..=n);
        let mut layer: Vec<VertexId> = colors[&(scale + 1)].choose_multiple(rng, n).copied().collect();
        layer.sort_unstable();
        if !layer.contains(&root) {
            layer.insert(0, root);
        }
        colors.insert(scale, layer);
    }
    colored_tree(tree, &colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::simple_tree;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use pretty_assertions::assert_eq;

    fn small_tree() -> Mtg {
        let mut t = Mtg::new();
        simple_tree(&mut t, VertexId::ROOT, 2, 6).unwrap();
        t
    }

    #[test]
    fn test_rejects_missing_vertices_at_finest_scale() {
        let t = small_tree();
        let mut colors = BTreeMap::new();
        colors.insert(1, vec![VertexId(1)]);
        assert!(matches!(colored_tree(&t, &colors), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_rejects_unnested_colors() {
        let t = small_tree();
        let mut colors = BTreeMap::new();
        colors.insert(1, vec![VertexId(3)]);
        colors.insert(2, vec![VertexId(1)]);
        colors.insert(3, t.vertices().collect());
        assert!(matches!(colored_tree(&t, &colors), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_rejects_unknown_vertex() {
        let t = small_tree();
        let mut colors = BTreeMap::new();
        colors.insert(1, vec![VertexId(99)]);
        assert!(matches!(colored_tree(&t, &colors), Err(Error::UnknownVertex(_))));
    }

    #[test]
    fn test_root_anchors_every_scale() {
        let t = small_tree();
        let mut colors = BTreeMap::new();
        colors.insert(1, vec![VertexId(2)]);
        colors.insert(2, t.vertices().collect());
        let g = colored_tree(&t, &colors).unwrap();
        // scale 1: images of the tree root and of vertex 2
        assert_eq!(g.nb_vertices_at_scale(1), 2);
        assert_eq!(g.roots(1).len(), 1);
        assert_eq!(g.nb_vertices_at_scale(2), t.nb_vertices());
        assert!(g.is_valid());
    }

    #[test]
    fn test_random_mtg_needs_two_scales() {
        let t = small_tree();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_mtg(&t, 1, &mut rng).is_err());
    }
}
