//! Small predicates over nodes and entity data

use serde_json::Value;

use crate::node::{NodeKind, ObjectNode, SchemaNode};

/// Id used by singleton entities
pub const SINGLETON_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Check if `id` is the singleton id
#[inline]
#[must_use]
pub fn is_singleton_id(id: &str) -> bool {
    id == SINGLETON_ID
}

/// Check if node is a primitive or enum, looking through nullable wrappers
#[must_use]
pub fn is_primitive_node(node: &SchemaNode) -> bool {
    matches!(
        extract_node_type(node),
        NodeKind::Primitive | NodeKind::Enum
    )
}

/// Kind of the node after unwrapping nullable wrappers
#[must_use]
pub fn extract_node_type(node: &SchemaNode) -> NodeKind {
    let mut current = node;
    while let SchemaNode::Nullable(nullable) = current {
        current = &nullable.inner_schema;
    }
    current.kind()
}

/// Shallow check of entity data against its object node
///
/// Fails when either side is absent or the entity is not an object. When the
/// schema declares `name`, the entity's `name` must be truthy. Every required
/// field must be present and non-null.
#[must_use]
pub fn is_entity_valid(entity: Option<&Value>, schema: Option<&ObjectNode>) -> bool {
    let (Some(Value::Object(fields)), Some(schema)) = (entity, schema) else {
        return false;
    };
    if schema.properties.contains_key("name") && !fields.get("name").is_some_and(is_truthy) {
        return false;
    }
    schema
        .required
        .iter()
        .all(|name| fields.get(name).is_some_and(|v| !v.is_null()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
