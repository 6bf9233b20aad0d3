//! JSON decoding with path-aware errors

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{NodeError, NodeResult};
use crate::node::SchemaNode;

/// Named schemas in declaration order
pub type SchemaBundle = IndexMap<String, SchemaNode>;

impl SchemaNode {
    /// Decode a node from JSON text
    ///
    /// # Errors
    /// Returns `NodeError::Malformed` with the JSON path of the offending value
    pub fn from_json_str(src: &str) -> NodeResult<Self> {
        let mut de = serde_json::Deserializer::from_str(src);
        let node =
            serde_path_to_error::deserialize(&mut de).map_err(|e| NodeError::from_path_error(&e))?;
        finish(de)?;
        Ok(node)
    }

    /// Decode a node from a JSON value
    ///
    /// # Errors
    /// Returns `NodeError::Malformed` with the JSON path of the offending value
    pub fn from_value(value: Value) -> NodeResult<Self> {
        serde_path_to_error::deserialize(value).map_err(|e| NodeError::from_path_error(&e))
    }
}

/// Decode and check a `{ name: node }` bundle from JSON text
///
/// # Errors
/// Returns `NodeError::Malformed` for undecodable input, or the first
/// structural violation of any bundled node
pub fn parse_bundle(src: &str) -> NodeResult<SchemaBundle> {
    let mut de = serde_json::Deserializer::from_str(src);
    let bundle: SchemaBundle =
        serde_path_to_error::deserialize(&mut de).map_err(|e| NodeError::from_path_error(&e))?;
    finish(de)?;
    check_bundle(&bundle)?;
    Ok(bundle)
}

/// Decode and check a `{ name: node }` bundle from a JSON value
///
/// # Errors
/// See [`parse_bundle`]
pub fn bundle_from_value(value: Value) -> NodeResult<SchemaBundle> {
    let bundle: SchemaBundle =
        serde_path_to_error::deserialize(value).map_err(|e| NodeError::from_path_error(&e))?;
    check_bundle(&bundle)?;
    Ok(bundle)
}

/// Reject anything but whitespace after the decoded document
fn finish(mut de: serde_json::Deserializer<serde_json::de::StrRead<'_>>) -> NodeResult<()> {
    de.end().map_err(|e| NodeError::malformed(".", e.to_string()))
}

fn check_bundle(bundle: &SchemaBundle) -> NodeResult<()> {
    bundle.values().try_for_each(SchemaNode::check)
}
