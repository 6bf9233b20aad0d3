//! Default-value derivation
//!
//! Produces the minimal value that seeds an editable form. Objects fill in
//! their required fields only; unions stay `null` so the caller has to pick a
//! variant explicitly.

use schemaform_node::{ObjectNode, PrimitiveType, SchemaNode};
use schemaform_registry::RefResolver;
use serde_json::{Map, Value};

use crate::error::EngineResult;

/// Zero value for `node`
///
/// Total and pure. `recursiveRef` yields `null`; see
/// [`default_value_resolved`] to expand refs.
#[must_use]
pub fn default_value(node: &SchemaNode) -> Value {
    match node {
        SchemaNode::Primitive(primitive) => primitive_default(primitive.primitive_type),
        SchemaNode::Enum(enumeration) => Value::String(
            enumeration.values.first().cloned().unwrap_or_default(),
        ),
        SchemaNode::Array(_) => Value::Array(Vec::new()),
        SchemaNode::Map(_) => Value::Object(Map::new()),
        SchemaNode::Tuple(tuple) => Value::Array(tuple.items.iter().map(default_value).collect()),
        SchemaNode::Object(object) => Value::Object(
            required_properties(object)
                .map(|(name, property)| (name.clone(), default_value(property)))
                .collect(),
        ),
        SchemaNode::Link(_) => Value::String(String::new()),
        SchemaNode::Nullable(_)
        | SchemaNode::TaggedUnion(_)
        | SchemaNode::UntaggedEnum(_)
        | SchemaNode::RecursiveRef(_)
        | SchemaNode::Unknown(_) => Value::Null,
    }
}

/// Zero value for `node`, expanding refs through `resolver`
///
/// A ref already being expanded further up yields `null`, so required
/// self-references stay finite.
///
/// # Errors
/// Returns `EngineError::Registry` for refs the resolver cannot resolve
pub fn default_value_resolved<R: RefResolver + ?Sized>(
    node: &SchemaNode,
    resolver: &R,
) -> EngineResult<Value> {
    let mut expanding = Vec::new();
    resolved_default(node, resolver, &mut expanding)
}

fn resolved_default<R: RefResolver + ?Sized>(
    node: &SchemaNode,
    resolver: &R,
    expanding: &mut Vec<String>,
) -> EngineResult<Value> {
    match node {
        SchemaNode::RecursiveRef(reference) => {
            if expanding.contains(&reference.ref_name) {
                return Ok(Value::Null);
            }
            let target = resolver.resolve_ref(&reference.ref_name)?;
            expanding.push(reference.ref_name.clone());
            let value = resolved_default(&target, resolver, expanding);
            expanding.pop();
            value
        }
        SchemaNode::Tuple(tuple) => tuple
            .items
            .iter()
            .map(|item| resolved_default(item, resolver, expanding))
            .collect::<EngineResult<Vec<_>>>()
            .map(Value::Array),
        SchemaNode::Object(object) => {
            let mut fields = Map::new();
            for (name, property) in required_properties(object) {
                fields.insert(name.clone(), resolved_default(property, resolver, expanding)?);
            }
            Ok(Value::Object(fields))
        }
        other => Ok(default_value(other)),
    }
}

fn required_properties(object: &ObjectNode) -> impl Iterator<Item = (&String, &SchemaNode)> {
    object
        .properties
        .iter()
        .filter(|(name, _)| object.is_required(name))
}

fn primitive_default(primitive_type: PrimitiveType) -> Value {
    match primitive_type {
        PrimitiveType::String => Value::String(String::new()),
        PrimitiveType::Number | PrimitiveType::Integer => Value::from(0),
        PrimitiveType::Boolean => Value::Bool(false),
    }
}
