//! Structural invariant checks
//!
//! Paths in errors start at `$` and follow the tree: `$.config.items`,
//! `$.source.db.host`, `$.pair[1]`.

use std::collections::HashSet;

use crate::error::{NodeError, NodeResult};
use crate::node::{ObjectNode, SchemaNode};
use crate::path::{join_field, join_index};

const ROOT: &str = "$";

impl SchemaNode {
    /// Verify the tree's structural invariants
    ///
    /// - every `required` name is a declared property
    /// - variant tags are unique within a union
    /// - a nullable node does not directly wrap another nullable node
    /// - an object's `merged` node is a tagged union or untagged enum
    ///
    /// Refs are not followed.
    ///
    /// # Errors
    /// Returns the first violation found, in declaration order
    pub fn check(&self) -> NodeResult<()> {
        check_node(self, ROOT)
    }
}

impl ObjectNode {
    /// Verify this object and its property subtrees
    ///
    /// # Errors
    /// See [`SchemaNode::check`]
    pub fn check(&self) -> NodeResult<()> {
        check_object(self, ROOT)
    }
}

fn check_node(node: &SchemaNode, path: &str) -> NodeResult<()> {
    match node {
        SchemaNode::Primitive(_)
        | SchemaNode::Enum(_)
        | SchemaNode::RecursiveRef(_)
        | SchemaNode::Unknown(_) => Ok(()),
        SchemaNode::Array(array) => check_node(&array.items, &join_field(path, "items")),
        SchemaNode::Tuple(tuple) => tuple
            .items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_node(item, &join_index(path, i))),
        SchemaNode::Object(object) => check_object(object, path),
        SchemaNode::Map(map) => check_node(&map.value_schema, &join_field(path, "values")),
        SchemaNode::Nullable(nullable) => {
            if nullable.inner_schema.is_nullable() {
                return Err(NodeError::NestedNullable {
                    path: path.to_string(),
                });
            }
            check_node(&nullable.inner_schema, path)
        }
        SchemaNode::Link(link) => check_object(&link.inline_schema, &join_field(path, "inline")),
        SchemaNode::TaggedUnion(union) => {
            check_unique_tags(union.variants.iter().map(|v| v.tag.as_str()), path)?;
            union
                .variants
                .iter()
                .try_for_each(|v| check_object(&v.schema, &join_field(path, &v.tag)))
        }
        SchemaNode::UntaggedEnum(union) => {
            check_unique_tags(union.variants.iter().map(|v| v.tag.as_str()), path)?;
            union
                .variants
                .iter()
                .try_for_each(|v| check_node(&v.schema, &join_field(path, &v.tag)))
        }
    }
}

fn check_object(object: &ObjectNode, path: &str) -> NodeResult<()> {
    if let Some(name) = object
        .required
        .iter()
        .find(|name| !object.properties.contains_key(name.as_str()))
    {
        return Err(NodeError::RequiredNotDeclared {
            path: path.to_string(),
            name: name.clone(),
        });
    }

    for (name, property) in &object.properties {
        check_node(property, &join_field(path, name))?;
    }

    if let Some(extra) = &object.additional_properties {
        check_node(extra, &join_field(path, "additionalProperties"))?;
    }

    if let Some(merged) = &object.merged {
        let path = join_field(path, "merged");
        if !matches!(
            merged.as_ref(),
            SchemaNode::TaggedUnion(_) | SchemaNode::UntaggedEnum(_)
        ) {
            return Err(NodeError::malformed(
                path,
                format!("merged node must be a union, found '{}'", merged.kind()),
            ));
        }
        check_node(merged, &path)?;
    }

    Ok(())
}

fn check_unique_tags<'a>(tags: impl Iterator<Item = &'a str>, path: &str) -> NodeResult<()> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag) {
            return Err(NodeError::DuplicateTag {
                path: path.to_string(),
                tag: tag.to_string(),
            });
        }
    }
    Ok(())
}
