//! Recursive validator
//!
//! Walks a node tree alongside a data value and collects every problem as a
//! [`ValidationError`](crate::ValidationError). Validation never stops at the
//! first error, except at the depth ceiling, where the remaining subtree is
//! reported valid.
//!
//! # Presence rules
//!
//! Structural rules are lenient about absence: a union or map that receives
//! no object is valid, as is a missing array. Whether a field must be present
//! is decided one level up, in [`Validator::validate_object_field`]:
//!
//! | Required field kind | Invalid when |
//! |---|---|
//! | primitive | missing, or `""` |
//! | array | missing (`[]` is fine) |
//! | anything else | missing, or `{}` |

use schemaform_node::{
    join_field, join_index, ArrayNode, MapNode, ObjectNode, SchemaNode, TaggedUnionNode,
    UntaggedEnumNode,
};
use schemaform_registry::{RefResolver, ResolutionSession, SchemaRegistry};
use serde_json::Value;

use crate::error::EngineResult;
use crate::hooks::NodeValidators;
use crate::options::ValidationOptions;
use crate::result::ValidationResult;

/// Validator bound to a ref resolver
///
/// `data` arguments are `Option<&Value>`; `None` means the value is absent.
pub struct Validator<'r, R: RefResolver + ?Sized> {
    resolver: &'r R,
    validators: NodeValidators,
}

impl<'r, R: RefResolver + ?Sized> Validator<'r, R> {
    /// Create validator over `resolver`
    #[must_use]
    pub fn new(resolver: &'r R) -> Self {
        Self {
            resolver,
            validators: NodeValidators::new(),
        }
    }

    /// With custom per-kind validators
    #[must_use]
    pub fn with_validators(mut self, validators: NodeValidators) -> Self {
        self.validators = validators;
        self
    }

    /// Validate `data` against `node`
    ///
    /// # Errors
    /// Returns `EngineError::Registry` if a `recursiveRef` cannot be resolved
    pub fn validate_schema(
        &self,
        path: &str,
        data: Option<&Value>,
        node: &SchemaNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        if options.debug {
            tracing::debug!(path, depth = options.depth, node_type = %node.kind(), "validating node");
        }

        if options.depth >= options.max_depth {
            tracing::warn!(
                path,
                max_depth = options.max_depth,
                "maximum depth reached, skipping deeper validation"
            );
            options.warn_depth_reached(path);
            return Ok(ValidationResult::ok());
        }

        if options.depth >= options.warn_depth {
            options.warn_depth_reached(path);
        }

        if !self.validators.accepts(data, node) {
            return Ok(ValidationResult::failure(
                path,
                format!("Invalid {}", node.kind()),
                data,
            ));
        }

        let next = options.next_depth();
        match node {
            SchemaNode::Object(object) => self.validate_object(path, data, object, &next),
            // Unwrapping is not a recursion step
            SchemaNode::Nullable(nullable) => match data {
                None | Some(Value::Null) => Ok(ValidationResult::ok()),
                Some(_) => self.validate_schema(path, data, &nullable.inner_schema, options),
            },
            SchemaNode::Array(array) => self.validate_array(path, data, array, &next),
            SchemaNode::Map(map) => self.validate_map(path, data, map, &next),
            SchemaNode::TaggedUnion(union) => self.validate_tagged_union(path, data, union, &next),
            SchemaNode::UntaggedEnum(union) => {
                self.validate_untagged_enum(path, data, union, &next)
            }
            SchemaNode::RecursiveRef(reference) => {
                let target = self.resolver.resolve_ref(&reference.ref_name)?;
                if options.follow_refs {
                    self.validate_schema(path, data, &target, &next)
                } else {
                    Ok(ValidationResult::ok())
                }
            }
            SchemaNode::Primitive(_)
            | SchemaNode::Enum(_)
            | SchemaNode::Link(_)
            | SchemaNode::Tuple(_)
            | SchemaNode::Unknown(_) => Ok(ValidationResult::ok()),
        }
    }

    /// Validate every declared property of `object`
    ///
    /// # Errors
    /// See [`Validator::validate_schema`]
    pub fn validate_object(
        &self,
        path: &str,
        data: Option<&Value>,
        object: &ObjectNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        if options.debug {
            tracing::debug!(path, properties = object.properties.len(), "validating object");
        }

        let Some(Value::Object(fields)) = data else {
            return Ok(ValidationResult::failure(path, "Expected an object", data));
        };

        let mut result = ValidationResult::ok();
        for (name, property) in &object.properties {
            result.absorb(self.validate_object_field(
                path,
                name,
                fields.get(name),
                property,
                object.is_required(name),
                options,
            )?);
        }
        Ok(result)
    }

    /// Apply presence rules to one field, then validate its value
    ///
    /// # Errors
    /// See [`Validator::validate_schema`]
    pub fn validate_object_field(
        &self,
        parent_path: &str,
        name: &str,
        value: Option<&Value>,
        schema: &SchemaNode,
        is_required: bool,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        let path = join_field(parent_path, name);
        let missing = matches!(value, None | Some(Value::Null));

        if is_required {
            let empty_string = matches!(value, Some(Value::String(s)) if s.is_empty());
            let empty_object = matches!(value, Some(Value::Object(fields)) if fields.is_empty());
            let is_primitive = matches!(schema, SchemaNode::Primitive(_));

            // A required array only needs to be present
            if missing || empty_object || (is_primitive && empty_string) {
                return Ok(ValidationResult::failure(
                    path,
                    format!("Field '{name}' is required"),
                    value,
                ));
            }
        } else if missing {
            return Ok(ValidationResult::ok());
        }

        self.validate_schema(&path, value, schema, options)
    }

    fn validate_array(
        &self,
        path: &str,
        data: Option<&Value>,
        array: &ArrayNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        let items = match data {
            None | Some(Value::Null) => return Ok(ValidationResult::ok()),
            Some(Value::Array(items)) => items,
            Some(_) => return Ok(ValidationResult::failure(path, "Expected an array", data)),
        };

        let mut result = ValidationResult::ok();
        for (i, item) in items.iter().enumerate() {
            result.absorb(self.validate_schema(
                &join_index(path, i),
                Some(item),
                &array.items,
                options,
            )?);
        }
        Ok(result)
    }

    fn validate_map(
        &self,
        path: &str,
        data: Option<&Value>,
        map: &MapNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        let Some(Value::Object(entries)) = data else {
            return Ok(ValidationResult::ok());
        };

        let mut result = ValidationResult::ok();
        for (key, value) in entries {
            result.absorb(self.validate_schema(
                &join_field(path, key),
                Some(value),
                &map.value_schema,
                options,
            )?);
        }
        Ok(result)
    }

    fn validate_tagged_union(
        &self,
        path: &str,
        data: Option<&Value>,
        union: &TaggedUnionNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        let fields = match data {
            Some(Value::Object(fields)) if !fields.is_empty() => fields,
            _ => return Ok(ValidationResult::ok()),
        };

        let discriminator = union.discriminator.as_str();
        let tag_path = join_field(path, discriminator);

        let Some(tag) = fields.get(discriminator).filter(|tag| !is_falsy(tag)) else {
            return Ok(ValidationResult::failure(
                tag_path,
                format!("Missing discriminator field '{discriminator}'"),
                data,
            ));
        };

        let Some(variant) = tag.as_str().and_then(|t| union.variant(t)) else {
            return Ok(ValidationResult::failure(
                tag_path,
                format!(
                    "Unknown variant '{}' for discriminator '{discriminator}'",
                    display_tag(tag)
                ),
                Some(tag),
            ));
        };

        self.validate_object(path, data, &variant.schema, options)
    }

    fn validate_untagged_enum(
        &self,
        path: &str,
        data: Option<&Value>,
        union: &UntaggedEnumNode,
        options: &ValidationOptions,
    ) -> EngineResult<ValidationResult> {
        let Some(Value::Object(fields)) = data else {
            return Ok(ValidationResult::ok());
        };
        // Only the first key names the variant
        let Some((tag, payload)) = fields.iter().next() else {
            return Ok(ValidationResult::ok());
        };

        let Some(variant) = union.variant(tag) else {
            return Ok(ValidationResult::failure(
                path,
                format!("Unknown variant '{tag}' in untagged enum"),
                data,
            ));
        };

        self.validate_schema(&join_field(path, tag), Some(payload), &variant.schema, options)
    }
}

/// `null`, `false`, `0` and `""` leave the discriminator unset
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn display_tag(tag: &Value) -> String {
    match tag {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validate `data` against `node` with refs resolved through `resolver`
///
/// # Errors
/// Returns `EngineError::Registry` if a `recursiveRef` cannot be resolved
pub fn validate_schema<R: RefResolver + ?Sized>(
    path: &str,
    data: Option<&Value>,
    node: &SchemaNode,
    options: &ValidationOptions,
    resolver: &R,
) -> EngineResult<ValidationResult> {
    Validator::new(resolver).validate_schema(path, data, node, options)
}

/// Validate `data` against `node`, loading missing refs first
///
/// Every ref reachable from `node` is resolved once through a fresh
/// [`ResolutionSession`] before the synchronous pass runs.
///
/// # Errors
/// Returns `EngineError::Registry` if any reachable ref cannot be resolved
pub async fn validate_with_registry(
    registry: &SchemaRegistry,
    path: &str,
    data: Option<&Value>,
    node: &SchemaNode,
    options: &ValidationOptions,
) -> EngineResult<ValidationResult> {
    let mut session = ResolutionSession::new(registry);
    let resolved = session.preload(node).await?;
    tracing::debug!(path, resolved, "refs preloaded");
    Validator::new(&session).validate_schema(path, data, node, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use pretty_assertions::assert_eq;
    use schemaform_node::NodeKind;
    use schemaform_registry::RegistryError;
    use serde_json::json;

    fn validate(data: &Value, node: &SchemaNode) -> ValidationResult {
        let registry = SchemaRegistry::new();
        validate_schema("", Some(data), node, &ValidationOptions::default(), &registry).unwrap()
    }

    #[test]
    fn array_rejects_non_array() {
        let result = validate(&json!("nope"), &SchemaNode::array(SchemaNode::string()));
        assert!(!result.valid);
        assert_eq!(result.messages(), vec!["Expected an array"]);
    }

    #[test]
    fn array_collects_item_errors() {
        let node = SchemaNode::array(
            ObjectNode::new().with_required_property("id", SchemaNode::string()),
        );
        let result = validate(&json!([{ "id": "a" }, {}, { "id": "" }]), &node);

        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["[1].id", "[2].id"]);
    }

    #[test]
    fn object_rejects_array_data() {
        let node = SchemaNode::from(ObjectNode::new());
        let result = validate(&json!([]), &node);
        assert_eq!(result.messages(), vec!["Expected an object"]);
    }

    #[test]
    fn nullable_accepts_null() {
        let node = SchemaNode::nullable(SchemaNode::array(SchemaNode::string()));
        assert!(validate(&Value::Null, &node).valid);
        assert!(!validate(&json!(3), &node).valid);
    }

    #[test]
    fn map_validates_each_value() {
        let node = SchemaNode::map(SchemaNode::array(SchemaNode::string()));
        let result = validate(&json!({ "a": [], "b": "x" }), &node);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "b");
    }

    #[test]
    fn map_ignores_non_object() {
        let node = SchemaNode::map(SchemaNode::string());
        assert!(validate(&json!("text"), &node).valid);
        assert!(validate(&json!([1, 2]), &node).valid);
    }

    #[test]
    fn tagged_union_unknown_variant() {
        let node = SchemaNode::tagged_union("kind", [("db", ObjectNode::new())]);
        let result = validate(&json!({ "kind": "s3" }), &node);

        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.path, "kind");
        assert_eq!(error.message, "Unknown variant 's3' for discriminator 'kind'");
        assert_eq!(error.value, Some(json!("s3")));
    }

    #[test]
    fn tagged_union_empty_tag_is_missing() {
        let node = SchemaNode::tagged_union("kind", [("db", ObjectNode::new())]);
        let result = validate(&json!({ "kind": "" }), &node);
        assert_eq!(result.messages(), vec!["Missing discriminator field 'kind'"]);
    }

    #[test]
    fn tagged_union_falsy_tag_is_missing() {
        let node = SchemaNode::tagged_union("kind", [("db", ObjectNode::new())]);
        for tag in [json!(false), json!(0), json!(null)] {
            let result = validate(&json!({ "kind": tag, "host": "x" }), &node);
            assert_eq!(result.messages(), vec!["Missing discriminator field 'kind'"]);
        }

        let truthy = validate(&json!({ "kind": 1 }), &node);
        assert_eq!(
            truthy.messages(),
            vec!["Unknown variant '1' for discriminator 'kind'"]
        );
    }

    #[test]
    fn tagged_union_ignores_empty_object() {
        let node = SchemaNode::tagged_union("kind", [("db", ObjectNode::new())]);
        assert!(validate(&json!({}), &node).valid);
        assert!(validate(&json!("db"), &node).valid);
    }

    #[test]
    fn untagged_enum_ignores_empty_object() {
        let node = SchemaNode::untagged_enum([("a", SchemaNode::string())]);
        assert!(validate(&json!({}), &node).valid);
        assert!(validate(&json!(null), &node).valid);
    }

    #[test]
    fn primitive_enum_link_tuple_are_shallow() {
        for node in [
            SchemaNode::string(),
            SchemaNode::enumeration(["a"]),
            SchemaNode::link("user", ObjectNode::new()),
            SchemaNode::tuple(vec![SchemaNode::string()]),
        ] {
            assert!(validate(&json!({ "anything": 1 }), &node).valid);
        }
    }

    #[test]
    fn unknown_node_accepts_anything() {
        for data in [json!(null), json!(""), json!([1]), json!({ "x": { "y": 2 } })] {
            assert!(validate(&data, &SchemaNode::unknown()).valid);
        }
    }

    #[test]
    fn required_field_message_and_value() {
        let registry = SchemaRegistry::new();
        let validator = Validator::new(&registry);
        let result = validator
            .validate_object_field(
                "config",
                "host",
                Some(&json!("")),
                &SchemaNode::string(),
                true,
                &ValidationOptions::default(),
            )
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "config.host");
        assert_eq!(result.errors[0].message, "Field 'host' is required");
        assert_eq!(result.errors[0].value, Some(json!("")));
    }

    #[test]
    fn required_non_primitive_accepts_empty_string() {
        let registry = SchemaRegistry::new();
        let validator = Validator::new(&registry);
        let result = validator
            .validate_object_field(
                "",
                "level",
                Some(&json!("")),
                &SchemaNode::enumeration(["info"]),
                true,
                &ValidationOptions::default(),
            )
            .unwrap();
        assert!(result.valid);
    }

    #[test]
    fn unresolved_ref_is_hard_error() {
        let registry = SchemaRegistry::new();
        let err = validate_schema(
            "",
            Some(&json!({})),
            &SchemaNode::recursive_ref("Ghost"),
            &ValidationOptions::default(),
            &registry,
        )
        .unwrap_err();

        assert_eq!(
            err,
            EngineError::Registry(RegistryError::NoLoader {
                name: "Ghost".to_string()
            })
        );
    }

    #[test]
    fn custom_validator_short_circuits() {
        let registry = SchemaRegistry::new();
        let validators =
            NodeValidators::new().with(NodeKind::Array, |data, _| data.is_some_and(Value::is_array));
        let validator = Validator::new(&registry).with_validators(validators);

        let result = validator
            .validate_schema(
                "tags",
                Some(&json!("x")),
                &SchemaNode::array(SchemaNode::string()),
                &ValidationOptions::default(),
            )
            .unwrap();

        assert_eq!(result.messages(), vec!["Invalid array"]);
        assert_eq!(result.errors[0].path, "tags");
    }
}
