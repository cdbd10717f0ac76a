//! # Multiscale Tree Graph
//!
//! The graph is an arena: every relation is an id-keyed map and vertices are
//! plain [`VertexId`] handles, so parent and child records never own each
//! other.
//!
//! | Relation | Module | Maps |
//! |----------|--------|------|
//! | Tree (per scale) | `tree` | `parent`, `children` |
//! | Decomposition (across scales) | `decomposition` | `complex`, `components` |
//! | Complex resolution | `complex` | reads both |
//!
//! ## Limitations
//!
//! - **No deletion**: `remove_vertex()` and `path()` return
//!   [`Error::Unsupported`]. Ids are never freed.
//! - **Single writer**: mutation takes `&mut self`; a live `components()`
//!   iterator borrows the graph and blocks every mutation until dropped.
//!
//! Scale-0 vertices other than the root are allowed only as tree
//! descendants of the root. That is the plain single-scale tree handed to
//! [`colored_tree`](crate::builder::colored_tree).

mod complex;
mod decomposition;
mod tree;

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::*;
use crate::property::{PropertyColumn, PropertyRegistry};
use crate::{Error, Result};

/// Ordered children or components of a vertex.
pub(crate) type VertexList = SmallVec<[VertexId; 4]>;

// ============================================================================
// Mtg
// ============================================================================

/// A multiscale tree graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mtg {
    /// Highest id issued or claimed so far.
    last_id: u64,
    scale: BTreeMap<VertexId, Scale>,

    parent: HashMap<VertexId, VertexId>,
    children: HashMap<VertexId, VertexList>,

    /// Explicit decomposition links only; see [`Mtg::complex`].
    complex: HashMap<VertexId, VertexId>,
    components: HashMap<VertexId, VertexList>,

    properties: PropertyRegistry,
}

impl Default for Mtg {
    fn default() -> Self {
        Self::new()
    }
}

impl Mtg {
    /// A graph holding only the root vertex, with `edge_type` and `label`
    /// declared.
    pub fn new() -> Self {
        let mut scale = BTreeMap::new();
        scale.insert(VertexId::ROOT, 0);
        Self {
            last_id: 0,
            scale,
            parent: HashMap::new(),
            children: HashMap::new(),
            complex: HashMap::new(),
            components: HashMap::new(),
            properties: PropertyRegistry::default(),
        }
    }

    pub fn root(&self) -> VertexId {
        VertexId::ROOT
    }

    /// Reset to the single root vertex. Property declarations survive,
    /// their values do not.
    pub fn clear(&mut self) {
        self.last_id = 0;
        self.scale.clear();
        self.scale.insert(VertexId::ROOT, 0);
        self.parent.clear();
        self.children.clear();
        self.complex.clear();
        self.components.clear();
        self.properties.clear_values();
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// A fresh id, strictly greater than any id seen so far.
    pub fn next_id(&mut self) -> VertexId {
        self.last_id += 1;
        VertexId(self.last_id)
    }

    /// Resolve the id for a vertex about to be created.
    fn fresh_vertex(&mut self, requested: Option<VertexId>) -> Result<VertexId> {
        match requested {
            None => Ok(self.next_id()),
            Some(id) if self.has_vertex(id) => Err(Error::DuplicateVertex(id)),
            Some(id) => {
                self.last_id = self.last_id.max(id.0);
                Ok(id)
            }
        }
    }

    /// Record a vertex with no relation at all. Used by the builder for
    /// vertices whose complex is inherited through the tree.
    pub(crate) fn register_vertex(&mut self, id: VertexId, scale: Scale) -> Result<()> {
        self.fresh_vertex(Some(id))?;
        self.scale.insert(id, scale);
        Ok(())
    }

    // ========================================================================
    // Vertices and scales
    // ========================================================================

    pub fn has_vertex(&self, vid: VertexId) -> bool {
        self.scale.contains_key(&vid)
    }

    pub fn scale(&self, vid: VertexId) -> Result<Scale> {
        self.scale.get(&vid).copied().ok_or(Error::UnknownVertex(vid))
    }

    /// Distinct scales, ascending.
    pub fn scales(&self) -> Vec<Scale> {
        self.scale.values().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    pub fn nb_scales(&self) -> usize {
        self.scales().len()
    }

    pub fn max_scale(&self) -> Scale {
        self.scale.values().copied().max().unwrap_or(0)
    }

    /// All vertices, ascending id.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.scale.keys().copied()
    }

    pub fn vertices_at_scale(&self, scale: Scale) -> impl Iterator<Item = VertexId> + '_ {
        self.scale.iter().filter(move |(_, s)| **s == scale).map(|(v, _)| *v)
    }

    pub fn nb_vertices(&self) -> usize {
        self.scale.len()
    }

    pub fn nb_vertices_at_scale(&self, scale: Scale) -> usize {
        self.vertices_at_scale(scale).count()
    }

    /// `(parent, child)` tree edges, ascending child id, optionally
    /// restricted to one scale.
    pub fn iter_edges(&self, scale: Option<Scale>) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.scale
            .iter()
            .filter(move |(_, s)| scale.is_none_or(|wanted| **s == wanted))
            .filter_map(|(child, _)| self.parent.get(child).map(|p| (*p, *child)))
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Declare a new property map.
    pub fn add_property(&mut self, name: &str, kind: ValueKind) -> Result<()> {
        self.properties.declare(name, kind)
    }

    pub fn remove_property(&mut self, name: &str) -> Result<PropertyColumn> {
        self.properties.remove(name)
    }

    pub fn property(&self, name: &str) -> Result<&PropertyColumn> {
        self.properties.column(name)
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.names()
    }

    pub fn property_value(&self, name: &str, vid: VertexId) -> Result<Option<&Value>> {
        self.scale(vid)?;
        self.properties.get(name, vid)
    }

    pub fn set_property(&mut self, name: &str, vid: VertexId, value: impl Into<Value>) -> Result<Option<Value>> {
        self.scale(vid)?;
        self.properties.set(name, vid, value.into())
    }

    /// Edge type recorded on `vid`, if any. `None` as well when the
    /// `edge_type` property has been removed.
    pub fn edge_type(&self, vid: VertexId) -> Option<EdgeType> {
        self.properties
            .get(crate::property::EDGE_TYPE, vid)
            .ok()
            .flatten()
            .and_then(Value::as_edge)
    }

    pub fn label(&self, vid: VertexId) -> Option<&str> {
        self.properties
            .get(crate::property::LABEL, vid)
            .ok()
            .flatten()
            .and_then(Value::as_str)
    }

    // ========================================================================
    // Unsupported operations
    // ========================================================================

    /// Vertex removal is not implemented: the cascade across the tree and
    /// decomposition relations is undecided. Removing the root always fails.
    pub fn remove_vertex(&mut self, vid: VertexId) -> Result<()> {
        self.scale(vid)?;
        if vid.is_root() {
            return Err(Error::ConstraintViolation("cannot remove the root vertex".into()));
        }
        Err(Error::Unsupported("remove_vertex"))
    }

    pub fn add_element(&mut self, parent: VertexId, _edge_type: Option<EdgeType>, _scale: Option<Scale>) -> Result<VertexId> {
        self.scale(parent)?;
        Err(Error::Unsupported("add_element"))
    }

    pub fn path(&self, from: VertexId, to: VertexId) -> Result<Vec<VertexId>> {
        self.scale(from)?;
        self.scale(to)?;
        Err(Error::Unsupported("path"))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    pub fn is_valid(&self) -> bool {
        self.check_invariants().is_ok()
    }

    /// Verify every structural invariant of both relations.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(Error::InvariantViolation(msg));
        let scale_of = |vid: VertexId| {
            self.scale
                .get(&vid)
                .copied()
                .ok_or_else(|| Error::InvariantViolation(format!("relation names unknown vertex {vid}")))
        };
        let multiscale = self.max_scale() > 0;

        if self.scale.get(&VertexId::ROOT) != Some(&0) {
            return violation("root vertex missing or not at scale 0".into());
        }
        if self.parent.contains_key(&VertexId::ROOT) || self.complex.contains_key(&VertexId::ROOT) {
            return violation("root vertex has a parent or a complex".into());
        }
        if let Some((last, _)) = self.scale.last_key_value() {
            if last.0 > self.last_id {
                return violation(format!("vertex {last} above id counter {}", self.last_id));
            }
        }

        for (child, parent) in &self.parent {
            let (cs, ps) = (scale_of(*child)?, scale_of(*parent)?);
            if cs != ps {
                return violation(format!("edge {parent} -> {child} crosses scales {ps} -> {cs}"));
            }
            let occurrences = self
                .children
                .get(parent)
                .map_or(0, |kids| kids.iter().filter(|k| *k == child).count());
            if occurrences != 1 {
                return violation(format!("{child} listed {occurrences} times under its parent {parent}"));
            }
        }
        for (parent, kids) in &self.children {
            for kid in kids {
                if self.parent.get(kid) != Some(parent) {
                    return violation(format!("{kid} listed under {parent} but not its child"));
                }
            }
        }

        for (component, complex) in &self.complex {
            let (cs, xs) = (scale_of(*component)?, scale_of(*complex)?);
            if cs != xs + 1 {
                return violation(format!("component {component} at scale {cs}, complex {complex} at {xs}"));
            }
            if !self.components.get(complex).is_some_and(|c| c.contains(component)) {
                return violation(format!("{component} not listed among components of {complex}"));
            }
        }
        for (complex, comps) in &self.components {
            for comp in comps {
                if self.complex.get(comp) != Some(complex) {
                    return violation(format!("{comp} listed under complex {complex} but points elsewhere"));
                }
            }
        }

        for (vid, scale) in &self.scale {
            if *scale == 0 {
                if !vid.is_root() && multiscale {
                    return violation(format!("scale-0 vertex {vid} beside the root in a multiscale graph"));
                }
                if !vid.is_root() && !self.parent.contains_key(vid) {
                    return violation(format!("scale-0 vertex {vid} detached from the root"));
                }
                continue;
            }
            if let Some(complex) = self.resolve_complex(*vid) {
                if scale_of(complex)? + 1 != *scale {
                    return violation(format!("inherited complex {complex} of {vid} is not one scale coarser"));
                }
            }
        }

        for (name, column) in self.properties.columns() {
            if let Some((vid, _)) = column.iter().find(|(vid, _)| !self.has_vertex(*vid)) {
                return violation(format!("property {name} set on unknown vertex {vid}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_has_single_root() {
        let g = Mtg::new();
        assert_eq!(g.nb_vertices(), 1);
        assert_eq!(g.scale(VertexId::ROOT).unwrap(), 0);
        assert_eq!(g.scales(), vec![0]);
        assert_eq!(g.max_scale(), 0);
        assert!(g.is_valid());
    }

    #[test]
    fn test_next_id_skips_claimed_ids() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, Some(VertexId(10)), PropertyMap::new()).unwrap();
        assert_eq!(a, VertexId(10));
        assert_eq!(g.next_id(), VertexId(11));
    }

    #[test]
    fn test_duplicate_explicit_id_rejected() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let err = g.add_component(VertexId::ROOT, Some(a), PropertyMap::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicateVertex(v) if v == a));
    }

    #[test]
    fn test_clear_resets_to_root() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        g.set_property("label", a, "A").unwrap();
        g.clear();
        assert_eq!(g.nb_vertices(), 1);
        assert!(!g.has_vertex(a));
        assert!(g.property("label").unwrap().is_empty());
        assert_eq!(g.next_id(), VertexId(1));
    }

    #[test]
    fn test_unsupported_operations() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        assert!(matches!(g.remove_vertex(VertexId::ROOT), Err(Error::ConstraintViolation(_))));
        assert!(matches!(g.remove_vertex(a), Err(Error::Unsupported("remove_vertex"))));
        assert!(matches!(g.path(VertexId::ROOT, a), Err(Error::Unsupported("path"))));
        assert!(matches!(g.add_element(a, None, None), Err(Error::Unsupported("add_element"))));
        assert!(matches!(g.remove_vertex(VertexId(99)), Err(Error::UnknownVertex(_))));
    }

    #[test]
    fn test_property_access_checks_vertex() {
        let mut g = Mtg::new();
        assert!(matches!(g.set_property("label", VertexId(7), "x"), Err(Error::UnknownVertex(_))));
        assert!(matches!(g.property_value("nope", VertexId::ROOT), Err(Error::UnknownProperty(_))));
        g.add_property("length", ValueKind::Float).unwrap();
        g.set_property("length", VertexId::ROOT, 1.5).unwrap();
        assert_eq!(g.property_value("length", VertexId::ROOT).unwrap(), Some(&Value::Float(1.5)));
        assert_eq!(g.property_names(), vec!["edge_type", "label", "length"]);
    }

    #[test]
    fn test_check_invariants_detects_corruption() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        let b = g.add_child(a, None, PropertyMap::new()).unwrap();
        assert!(g.is_valid());
        g.children.get_mut(&a).unwrap().push(b);
        assert!(matches!(g.check_invariants(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_check_invariants_reports_dangling_ids_as_violations() {
        let mut g = Mtg::new();
        let a = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        g.last_id = 10;
        g.parent.insert(VertexId(9), a);
        g.children.entry(a).or_default().push(VertexId(9));
        assert!(matches!(g.check_invariants(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_check_invariants_rejects_extra_scale_zero_vertex() {
        let mut plain = Mtg::new();
        plain.add_child(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        assert!(plain.is_valid());

        let mut mixed = plain.clone();
        mixed.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        assert!(matches!(mixed.check_invariants(), Err(Error::InvariantViolation(_))));
    }
}
