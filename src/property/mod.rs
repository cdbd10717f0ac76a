//! # Property Registry
//!
//! Named, typed, sparse maps from vertex to value. A property is declared
//! once with a [`ValueKind`]; afterwards only vertices explicitly given a
//! value carry one. The registry knows nothing about topology: checking
//! that a vertex exists is the graph's job.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{PropertyMap, Value, ValueKind, VertexId};
use crate::{Error, Result};

/// Property holding the type of the tree edge leading to a vertex.
pub const EDGE_TYPE: &str = "edge_type";
/// Property holding a human-readable vertex label.
pub const LABEL: &str = "label";

// ============================================================================
// PropertyColumn
// ============================================================================

/// One declared property: its kind and the sparse vertex → value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyColumn {
    kind: ValueKind,
    values: HashMap<VertexId, Value>,
}

impl PropertyColumn {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind, values: HashMap::new() }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn get(&self, vid: VertexId) -> Option<&Value> {
        self.values.get(&vid)
    }

    pub fn contains(&self, vid: VertexId) -> bool {
        self.values.contains_key(&vid)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (vertex, value) pairs in ascending vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Value)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries.into_iter()
    }

    fn check(&self, value: &Value) -> Result<()> {
        if value.kind() != self.kind {
            return Err(Error::TypeError {
                expected: self.kind.name().into(),
                got: value.type_name().into(),
            });
        }
        // JSON has no NaN or infinity
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(Error::TypeError { expected: "finite FLOAT".into(), got: f.to_string() });
            }
        }
        Ok(())
    }

    fn insert(&mut self, vid: VertexId, value: Value) -> Result<Option<Value>> {
        self.check(&value)?;
        Ok(self.values.insert(vid, value))
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

// ============================================================================
// PropertyRegistry
// ============================================================================

/// All property maps of a graph, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRegistry {
    columns: HashMap<String, PropertyColumn>,
}

impl Default for PropertyRegistry {
    /// A registry with the two standard properties, `edge_type` and `label`.
    fn default() -> Self {
        let mut columns = HashMap::new();
        columns.insert(EDGE_TYPE.to_string(), PropertyColumn::new(ValueKind::Edge));
        columns.insert(LABEL.to_string(), PropertyColumn::new(ValueKind::String));
        Self { columns }
    }
}

impl PropertyRegistry {
    /// A registry with no declared property at all.
    pub fn empty() -> Self {
        Self { columns: HashMap::new() }
    }

    pub fn declare(&mut self, name: &str, kind: ValueKind) -> Result<()> {
        if self.columns.contains_key(name) {
            return Err(Error::AlreadyDeclared(name.to_string()));
        }
        self.columns.insert(name.to_string(), PropertyColumn::new(kind));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<PropertyColumn> {
        self.columns
            .remove(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&PropertyColumn> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    /// Sorted property names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &PropertyColumn)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str, vid: VertexId) -> Result<Option<&Value>> {
        Ok(self.column(name)?.get(vid))
    }

    pub fn set(&mut self, name: &str, vid: VertexId, value: Value) -> Result<Option<Value>> {
        self.columns
            .get_mut(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))?
            .insert(vid, value)
    }

    /// Type-check a creation payload without storing anything.
    ///
    /// Undeclared names are not an error here; [`attach`](Self::attach)
    /// skips them.
    pub fn validate(&self, props: &PropertyMap) -> Result<()> {
        for (name, value) in props {
            if let Some(column) = self.columns.get(name) {
                column.check(value)?;
            }
        }
        Ok(())
    }

    /// Store every declared entry of `props` on `vid`.
    ///
    /// Must be preceded by [`validate`](Self::validate) so a kind mismatch
    /// cannot leave a half-attached payload behind.
    pub fn attach(&mut self, vid: VertexId, props: PropertyMap) -> Result<()> {
        for (name, value) in props {
            match self.columns.get_mut(&name) {
                Some(column) => {
                    column.insert(vid, value)?;
                }
                None => tracing::warn!(property = %name, vertex = %vid, "skipping undeclared property"),
            }
        }
        Ok(())
    }

    /// Empty every map, keeping the declarations.
    pub fn clear_values(&mut self) {
        for column in self.columns.values_mut() {
            column.clear();
        }
    }
}
