//! Display ordering of object properties
//!
//! Tiers, highest first: required and filled, required and empty, optional
//! and filled, optional and empty. Nullable properties sit just below their
//! non-nullable peers in the same tier. Ties keep declaration order.

use indexmap::IndexSet;
use schemaform_node::{ObjectNode, SchemaNode};
use serde_json::Value;
use std::borrow::Borrow;
use std::cmp::Reverse;

/// Priority of one property, in half-points
///
/// `4·required + 2·filled − nullable`
#[must_use]
pub fn display_priority(
    name: &str,
    node: &SchemaNode,
    value: Option<&Value>,
    required: &IndexSet<String>,
) -> i32 {
    let required = if required.contains(name) { 4 } else { 0 };
    let filled = if value
        .and_then(|v| v.get(name))
        .is_some_and(|v| !v.is_null())
    {
        2
    } else {
        0
    };
    required + filled - i32::from(node.is_nullable())
}

/// Stable sort of `(name, node)` pairs by descending display priority
///
/// `value` is the entity being displayed; a property counts as filled when
/// its entry is present and non-null.
#[must_use]
pub fn sort_entity_properties<K, N>(
    mut properties: Vec<(K, N)>,
    value: Option<&Value>,
    required: &IndexSet<String>,
) -> Vec<(K, N)>
where
    K: AsRef<str>,
    N: Borrow<SchemaNode>,
{
    properties.sort_by_key(|(name, node)| {
        Reverse(display_priority(
            name.as_ref(),
            Borrow::<SchemaNode>::borrow(node),
            value,
            required,
        ))
    });
    properties
}

/// Display ordering for an object node's own properties
pub trait SortProperties {
    /// Borrowed `(name, node)` pairs in display order
    fn sorted_properties(&self, value: Option<&Value>) -> Vec<(&str, &SchemaNode)>;
}

impl SortProperties for ObjectNode {
    fn sorted_properties(&self, value: Option<&Value>) -> Vec<(&str, &SchemaNode)> {
        let properties = self
            .properties
            .iter()
            .map(|(name, node)| (name.as_str(), node))
            .collect();
        sort_entity_properties(properties, value, &self.required)
    }
}
