//! Tree relation: the rooted, ordered forest at each scale.

use smallvec::SmallVec;

use super::Mtg;
use crate::model::*;
use crate::{Error, Result};

impl Mtg {
    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append `child` as the last child of `parent`, at `parent`'s scale.
    ///
    /// With `child: None` a fresh vertex is created. An existing vertex may
    /// be given only if it is a parentless vertex of the same scale; edge
    /// inference relies on this to hang coarse roots under their parent.
    pub fn add_child(&mut self, parent: VertexId, child: Option<VertexId>, props: PropertyMap) -> Result<VertexId> {
        let scale = self.scale(parent)?;
        self.properties.validate(&props)?;

        let child = match child {
            Some(id) if self.has_vertex(id) => {
                self.check_attachable(parent, id, scale)?;
                id
            }
            requested => {
                let id = self.fresh_vertex(requested)?;
                self.scale.insert(id, scale);
                id
            }
        };

        self.children.entry(parent).or_default().push(child);
        self.parent.insert(child, parent);
        self.properties.attach(child, props)?;
        Ok(child)
    }

    fn check_attachable(&self, parent: VertexId, child: VertexId, scale: Scale) -> Result<()> {
        if child.is_root() {
            return Err(Error::ConstraintViolation("the root vertex cannot be a child".into()));
        }
        if self.parent.contains_key(&child) {
            return Err(Error::AlreadyAttached(child));
        }
        let child_scale = self.scale(child)?;
        if child_scale != scale {
            return Err(Error::InvalidScale { vertex: child, scale: child_scale, target: scale });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::ConstraintViolation(format!(
                "attaching {child} under {parent} would create a cycle"
            )));
        }
        Ok(())
    }

    /// Whether `ancestor` is `vid` or lies on its parent chain.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: VertexId, vid: VertexId) -> bool {
        let mut cursor = Some(vid);
        while let Some(v) = cursor {
            if v == ancestor {
                return true;
            }
            cursor = self.parent.get(&v).copied();
        }
        false
    }

    /// Insert a new vertex immediately before `before` among its siblings.
    pub fn insert_sibling(&mut self, before: VertexId, new: Option<VertexId>, props: PropertyMap) -> Result<VertexId> {
        let scale = self.scale(before)?;
        let parent = self.parent.get(&before).copied().ok_or(Error::InvalidParent(before))?;
        self.properties.validate(&props)?;

        let new = self.fresh_vertex(new)?;
        self.scale.insert(new, scale);

        let siblings = self.children.entry(parent).or_default();
        let index = siblings.iter().position(|v| *v == before).unwrap_or(siblings.len());
        siblings.insert(index, new);
        self.parent.insert(new, parent);
        self.properties.attach(new, props)?;
        Ok(new)
    }

    /// Splice a new vertex between `vertex` and its parent.
    ///
    /// The new vertex takes `vertex`'s place among its former siblings and
    /// `vertex` becomes its only child. On a scale-root the new vertex becomes
    /// the scale-root. It gets no explicit complex, so it inherits the
    /// complex of `vertex`'s former parent.
    pub fn insert_parent(&mut self, vertex: VertexId, new: Option<VertexId>, props: PropertyMap) -> Result<VertexId> {
        let scale = self.scale(vertex)?;
        if vertex.is_root() {
            return Err(Error::ConstraintViolation("cannot insert a parent above the root vertex".into()));
        }
        self.properties.validate(&props)?;

        let new = self.fresh_vertex(new)?;
        self.scale.insert(new, scale);

        if let Some(old_parent) = self.parent.get(&vertex).copied() {
            if let Some(slot) = self
                .children
                .get_mut(&old_parent)
                .and_then(|kids| kids.iter_mut().find(|v| **v == vertex))
            {
                *slot = new;
            }
            self.parent.insert(new, old_parent);
        }
        self.parent.insert(vertex, new);
        self.children.insert(new, SmallVec::from_elem(vertex, 1));
        self.properties.attach(new, props)?;
        Ok(new)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn parent(&self, vid: VertexId) -> Result<Option<VertexId>> {
        self.scale(vid)?;
        Ok(self.parent.get(&vid).copied())
    }

    pub fn children(&self, vid: VertexId) -> Result<&[VertexId]> {
        self.scale(vid)?;
        Ok(self.children_of(vid))
    }

    pub(crate) fn children_of(&self, vid: VertexId) -> &[VertexId] {
        self.children.get(&vid).map(|kids| kids.as_slice()).unwrap_or(&[])
    }

    pub fn nb_children(&self, vid: VertexId) -> Result<usize> {
        Ok(self.children(vid)?.len())
    }

    /// Other children of `vid`'s parent, in sibling order.
    pub fn siblings(&self, vid: VertexId) -> Result<Vec<VertexId>> {
        let parent = self.parent(vid)?.ok_or(Error::InvalidParent(vid))?;
        Ok(self.children_of(parent).iter().copied().filter(|v| *v != vid).collect())
    }

    pub fn nb_siblings(&self, vid: VertexId) -> Result<usize> {
        let parent = self.parent(vid)?.ok_or(Error::InvalidParent(vid))?;
        Ok(self.children_of(parent).len().saturating_sub(1))
    }

    pub fn is_leaf(&self, vid: VertexId) -> Result<bool> {
        Ok(self.nb_children(vid)? == 0)
    }

    /// Vertices of `scale` without a parent, ascending id.
    pub fn roots(&self, scale: Scale) -> Vec<VertexId> {
        self.vertices_at_scale(scale)
            .filter(|v| !self.parent.contains_key(v))
            .collect()
    }

    /// Number of `+` edges crossed from `vid` up to its scale-root, counting
    /// the edge leading to `vid` itself.
    pub fn order(&self, vid: VertexId) -> Result<usize> {
        self.scale(vid)?;
        if !self.properties.is_declared(crate::property::EDGE_TYPE) {
            return Ok(0);
        }
        let mut order = 0;
        let mut cursor = Some(vid);
        while let Some(v) = cursor {
            if self.edge_type(v).is_some_and(EdgeType::is_branch) {
                order += 1;
            }
            cursor = self.parent.get(&v).copied();
        }
        Ok(order)
    }
}
