//! Decomposition relation: complex / component links between adjacent
//! scales.

use super::Mtg;
use crate::model::*;
use crate::traversal::{self, PreOrder};
use crate::{Error, Result};

impl Mtg {
    /// Append `component` to the decomposition of `complex`, one scale finer.
    pub fn add_component(&mut self, complex: VertexId, component: Option<VertexId>, props: PropertyMap) -> Result<VertexId> {
        let scale = self.scale(complex)?;
        self.properties.validate(&props)?;

        let component = self.fresh_vertex(component)?;
        self.scale.insert(component, scale + 1);
        self.components.entry(complex).or_default().push(component);
        self.complex.insert(component, complex);
        self.properties.attach(component, props)?;
        Ok(component)
    }

    /// Every vertex of `vid`'s decomposition, explicit or inherited.
    ///
    /// Pre-order walk of the tree from the first explicit component, pruned
    /// wherever a vertex belongs to another complex. The iterator is lazy
    /// and re-walks the tree on every call.
    pub fn components(&self, vid: VertexId) -> Result<PreOrder<'_>> {
        self.scale(vid)?;
        Ok(match self.first_component(vid) {
            Some(first) => traversal::pre_order(self, first, Some(vid)),
            None => PreOrder::empty(self),
        })
    }

    /// First explicit component, in insertion order.
    pub(crate) fn first_component(&self, vid: VertexId) -> Option<VertexId> {
        self.components.get(&vid).and_then(|c| c.first()).copied()
    }

    pub fn nb_components(&self, vid: VertexId) -> Result<usize> {
        Ok(self.components(vid)?.count())
    }

    /// Grow both relations in one step.
    ///
    /// Creates a tree child of `parent` and a new complex for it, the
    /// complex being appended as a tree child of `parent`'s complex. `props`
    /// go on the child. Returns `(child, complex)`.
    ///
    /// `parent` must sit at scale 2 or finer: the new complex would
    /// otherwise join the root at scale 0, which holds the root alone.
    pub fn add_child_and_complex(
        &mut self,
        parent: VertexId,
        child: Option<VertexId>,
        complex: Option<VertexId>,
        props: PropertyMap,
    ) -> Result<(VertexId, VertexId)> {
        let scale = self.scale(parent)?;
        let parent_complex = self.resolve_complex(parent).ok_or(Error::InvalidParent(parent))?;
        if parent_complex.is_root() {
            return Err(Error::ConstraintViolation(format!(
                "a complex for a child of {parent} would sit beside the root at scale 0"
            )));
        }
        let complex_scale = self.scale(parent_complex)?;
        self.properties.validate(&props)?;
        if let (Some(c), Some(x)) = (child, complex) {
            if c == x {
                return Err(Error::DuplicateVertex(c));
            }
        }

        let complex = self.fresh_vertex(complex)?;
        self.scale.insert(complex, complex_scale);
        let child = match self.fresh_vertex(child) {
            Ok(child) => child,
            Err(e) => {
                self.scale.remove(&complex);
                return Err(e);
            }
        };
        self.scale.insert(child, scale);

        self.children.entry(parent).or_default().push(child);
        self.parent.insert(child, parent);

        self.children.entry(parent_complex).or_default().push(complex);
        self.parent.insert(complex, parent_complex);

        self.components.entry(complex).or_default().push(child);
        self.complex.insert(child, complex);

        self.properties.attach(child, props)?;
        Ok((child, complex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_components_include_inherited_vertices() {
        let mut g = Mtg::new();
        let plant = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(plant, None, PropertyMap::new()).unwrap();
        let b = g.add_child(a, None, edge_props(EdgeType::Successor)).unwrap();
        let c = g.add_child(a, None, edge_props(EdgeType::Branch)).unwrap();
        let d = g.add_child(b, None, edge_props(EdgeType::Successor)).unwrap();

        let comps: Vec<_> = g.components(plant).unwrap().collect();
        assert_eq!(comps, vec![a, b, d, c]);
        assert_eq!(g.nb_components(plant).unwrap(), 4);
    }

    #[test]
    fn test_components_stop_at_nested_boundary() {
        let mut g = Mtg::new();
        let p1 = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(p1, None, PropertyMap::new()).unwrap();
        let b = g.add_child(a, None, PropertyMap::new()).unwrap();
        let (c, p2) = g.add_child_and_complex(b, None, None, PropertyMap::new()).unwrap();
        let d = g.add_child(c, None, PropertyMap::new()).unwrap();

        assert_eq!(g.components(p1).unwrap().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(g.components(p2).unwrap().collect::<Vec<_>>(), vec![c, d]);
        assert_eq!(g.nb_components(c).unwrap(), 0);
    }

    #[test]
    fn test_add_component_sets_scale_and_complex() {
        let mut g = Mtg::new();
        let p = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(p, None, PropertyMap::new()).unwrap();
        assert_eq!(g.scale(p).unwrap(), 1);
        assert_eq!(g.scale(a).unwrap(), 2);
        assert_eq!(g.complex(a).unwrap(), Some(p));
        assert_eq!(g.nb_scales(), 3);
        assert_eq!(g.max_scale(), 2);
    }

    #[test]
    fn test_add_child_and_complex_grows_both_relations() {
        let mut g = Mtg::new();
        let p1 = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(p1, None, PropertyMap::new()).unwrap();
        let (b, p2) = g.add_child_and_complex(a, None, None, edge_props(EdgeType::Branch)).unwrap();

        assert_eq!(g.parent(b).unwrap(), Some(a));
        assert_eq!(g.parent(p2).unwrap(), Some(p1));
        assert_eq!(g.complex(b).unwrap(), Some(p2));
        assert_eq!(g.scale(p2).unwrap(), 1);
        assert_eq!(g.scale(b).unwrap(), 2);
        assert_eq!(g.edge_type(b), Some(EdgeType::Branch));
        assert!(p2 < b);
        assert!(g.is_valid());
    }

    #[test]
    fn test_add_child_and_complex_needs_a_complex() {
        let mut g = Mtg::new();
        let err = g.add_child_and_complex(VertexId::ROOT, None, None, PropertyMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidParent(v) if v.is_root()));

        let p = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let a = g.add_component(p, None, PropertyMap::new()).unwrap();
        let same = VertexId(50);
        assert!(matches!(
            g.add_child_and_complex(a, Some(same), Some(same), PropertyMap::new()),
            Err(Error::DuplicateVertex(_))
        ));
    }

    #[test]
    fn test_add_child_and_complex_keeps_scale_zero_singleton() {
        let mut g = Mtg::new();
        let p = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let before = g.clone();

        let err = g.add_child_and_complex(p, None, None, PropertyMap::new()).unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert_eq!(g, before);
        assert_eq!(g.nb_vertices_at_scale(0), 1);
        assert!(g.is_valid());
    }
}
