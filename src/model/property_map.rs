//! PropertyMap — the named values handed to vertex-creating operations.

use std::collections::HashMap;
use super::{EdgeType, Value};

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// Shorthand for the most common creation payload: just an edge type.
pub fn edge_props(edge_type: EdgeType) -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert(crate::property::EDGE_TYPE.into(), Value::Edge(edge_type));
    props
}
