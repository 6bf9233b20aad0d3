//! Schema node model
//!
//! Provides [`SchemaNode`], the closed set of shapes data can take, and the
//! payload type for each variant.
//!
//! Nodes are immutable value trees. Edits such as [`ObjectNode::require`]
//! return a structural copy. Cycles only exist logically, through
//! [`RecursiveRefNode`] names resolved against a registry.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

use crate::error::{NodeError, NodeResult};

/// One typed unit of a schema tree
///
/// Serialized internally tagged by `nodeType`:
/// `{"nodeType":"array","items":{"nodeType":"primitive","primitiveType":"string"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum SchemaNode {
    /// Leaf scalar
    Primitive(PrimitiveNode),
    /// Closed string set
    Enum(EnumNode),
    /// Homogeneous sequence
    Array(ArrayNode),
    /// Fixed-length heterogeneous sequence
    Tuple(TupleNode),
    /// Structured record
    Object(ObjectNode),
    /// String-keyed dictionary with homogeneous values
    Map(MapNode),
    /// Optional wrapper; null is always valid
    Nullable(NullableNode),
    /// Reference to another entity, by id or inline
    Link(LinkNode),
    /// Union selected by an explicit discriminator field
    TaggedUnion(TaggedUnionNode),
    /// Union selected by the single top-level key present
    UntaggedEnum(UntaggedEnumNode),
    /// Named pointer resolved against a registry
    RecursiveRef(RecursiveRefNode),
    /// Producer fallback for a shape it could not translate; accepts anything
    Unknown(UnknownNode),
}

/// Discriminant of [`SchemaNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum NodeKind {
    Primitive,
    Enum,
    Array,
    Tuple,
    Object,
    Map,
    Nullable,
    Link,
    TaggedUnion,
    UntaggedEnum,
    RecursiveRef,
    Unknown,
}

impl NodeKind {
    /// Wire name, as used in `nodeType`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Object => "object",
            Self::Map => "map",
            Self::Nullable => "nullable",
            Self::Link => "link",
            Self::TaggedUnion => "taggedUnion",
            Self::UntaggedEnum => "untaggedEnum",
            Self::RecursiveRef => "recursiveRef",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar types a primitive node can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
}

/// Primitive payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveNode {
    /// Scalar type
    pub primitive_type: PrimitiveType,
    /// Free-form format hint (`uri`, `uuid`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Inclusive lower bound for numeric types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrimitiveNode {
    /// Create primitive of the given type with no bounds
    #[inline]
    #[must_use]
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            format: None,
            minimum: None,
            maximum: None,
            description: None,
        }
    }

    /// With inclusive numeric bounds
    #[inline]
    #[must_use]
    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// With format hint
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Enum payload: allowed values in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumNode {
    /// Allowed values
    pub values: Vec<String>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Array payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayNode {
    /// Schema of every element
    pub items: Box<SchemaNode>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tuple payload: one node per position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleNode {
    /// Schema per position
    pub items: Vec<SchemaNode>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Object payload
///
/// `required` must be a subset of the `properties` keys. Both keep
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    /// Declared properties
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,
    /// Schema for undeclared keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaNode>>,
    /// Union whose fields are spread into this object; carried, not validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<Box<SchemaNode>>,
    /// Free-form producer extensions
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectNode {
    /// Create empty object node
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With optional property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.properties.insert(name.into(), node.into());
        self
    }

    /// With required property
    #[must_use]
    pub fn with_required_property(
        mut self,
        name: impl Into<String>,
        node: impl Into<SchemaNode>,
    ) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), node.into());
        self.required.insert(name);
        self
    }

    /// With schema for undeclared keys
    #[inline]
    #[must_use]
    pub fn with_additional_properties(mut self, node: impl Into<SchemaNode>) -> Self {
        self.additional_properties = Some(Box::new(node.into()));
        self
    }

    /// With union spread into this object
    #[inline]
    #[must_use]
    pub fn with_merged(mut self, union: impl Into<SchemaNode>) -> Self {
        self.merged = Some(Box::new(union.into()));
        self
    }

    /// With extension entry
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Get declared property
    #[inline]
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }

    /// Check if property is required
    #[inline]
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Copy of this node with `name` marked required
    ///
    /// # Errors
    /// Returns `NodeError::UnknownProperty` if `name` is not declared
    pub fn require(&self, name: &str) -> NodeResult<Self> {
        if !self.properties.contains_key(name) {
            return Err(NodeError::UnknownProperty(name.to_string()));
        }
        let mut copy = self.clone();
        copy.required.insert(name.to_string());
        Ok(copy)
    }

    /// Property nodes followed by the additional-properties node
    pub fn child_nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.properties
            .values()
            .chain(self.additional_properties.as_deref())
    }
}

/// Map payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    /// Schema of every value
    pub value_schema: Box<SchemaNode>,
    /// Key pattern hint; carried through, not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_pattern: Option<String>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Nullable payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullableNode {
    /// Schema of non-null values
    pub inner_schema: Box<SchemaNode>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Link payload
///
/// Data is either an entity id (`ref`) or an embedded entity (`inline`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkNode {
    /// Name of the linked entity type
    pub target_type: String,
    /// Schema used for inline data
    #[serde(with = "object_schema")]
    pub inline_schema: ObjectNode,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One arm of a tagged union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedVariant {
    /// Discriminator value selecting this arm
    pub tag: String,
    /// Fields of this arm, discriminator excluded
    #[serde(with = "object_schema")]
    pub schema: ObjectNode,
}

/// Tagged union payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedUnionNode {
    /// Field whose value names the active variant
    pub discriminator: String,
    /// Variants with unique tags
    pub variants: Vec<TaggedVariant>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaggedUnionNode {
    /// Find variant by tag
    #[must_use]
    pub fn variant(&self, tag: &str) -> Option<&TaggedVariant> {
        self.variants.iter().find(|v| v.tag == tag)
    }
}

/// One arm of an untagged enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntaggedVariant {
    /// Top-level key selecting this arm
    pub tag: String,
    /// Schema of the value under that key
    pub schema: SchemaNode,
}

/// Untagged enum payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntaggedEnumNode {
    /// Variants with unique tags
    pub variants: Vec<UntaggedVariant>,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UntaggedEnumNode {
    /// Find variant by tag
    #[must_use]
    pub fn variant(&self, tag: &str) -> Option<&UntaggedVariant> {
        self.variants.iter().find(|v| v.tag == tag)
    }
}

/// Recursive reference payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursiveRefNode {
    /// Registry name of the target schema
    pub ref_name: String,
    /// Help text carried from the source schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Unknown payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownNode {
    /// Why the producer gave up, when it said
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaNode {
    /// String primitive
    #[inline]
    #[must_use]
    pub fn string() -> Self {
        Self::primitive(PrimitiveType::String)
    }

    /// Number primitive
    #[inline]
    #[must_use]
    pub fn number() -> Self {
        Self::primitive(PrimitiveType::Number)
    }

    /// Integer primitive
    #[inline]
    #[must_use]
    pub fn integer() -> Self {
        Self::primitive(PrimitiveType::Integer)
    }

    /// Boolean primitive
    #[inline]
    #[must_use]
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Boolean)
    }

    /// Primitive of any scalar type
    #[inline]
    #[must_use]
    pub fn primitive(primitive_type: PrimitiveType) -> Self {
        Self::Primitive(PrimitiveNode::new(primitive_type))
    }

    /// Enum over the given values
    #[must_use]
    pub fn enumeration<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Enum(EnumNode {
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        })
    }

    /// Array of `items`
    #[inline]
    #[must_use]
    pub fn array(items: impl Into<SchemaNode>) -> Self {
        Self::Array(ArrayNode {
            items: Box::new(items.into()),
            description: None,
        })
    }

    /// Tuple of positional items
    #[inline]
    #[must_use]
    pub fn tuple(items: Vec<SchemaNode>) -> Self {
        Self::Tuple(TupleNode {
            items,
            description: None,
        })
    }

    /// Map with homogeneous values
    #[inline]
    #[must_use]
    pub fn map(value_schema: impl Into<SchemaNode>) -> Self {
        Self::Map(MapNode {
            value_schema: Box::new(value_schema.into()),
            key_pattern: None,
            description: None,
        })
    }

    /// Nullable wrapper
    #[inline]
    #[must_use]
    pub fn nullable(inner: impl Into<SchemaNode>) -> Self {
        Self::Nullable(NullableNode {
            inner_schema: Box::new(inner.into()),
            description: None,
        })
    }

    /// Link to `target_type` with an inline schema
    #[inline]
    #[must_use]
    pub fn link(target_type: impl Into<String>, inline_schema: ObjectNode) -> Self {
        Self::Link(LinkNode {
            target_type: target_type.into(),
            inline_schema,
            description: None,
        })
    }

    /// Tagged union from `(tag, schema)` pairs
    #[must_use]
    pub fn tagged_union<T: Into<String>>(
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = (T, ObjectNode)>,
    ) -> Self {
        Self::TaggedUnion(TaggedUnionNode {
            discriminator: discriminator.into(),
            variants: variants
                .into_iter()
                .map(|(tag, schema)| TaggedVariant {
                    tag: tag.into(),
                    schema,
                })
                .collect(),
            description: None,
        })
    }

    /// Untagged enum from `(tag, schema)` pairs
    #[must_use]
    pub fn untagged_enum<T: Into<String>>(
        variants: impl IntoIterator<Item = (T, SchemaNode)>,
    ) -> Self {
        Self::UntaggedEnum(UntaggedEnumNode {
            variants: variants
                .into_iter()
                .map(|(tag, schema)| UntaggedVariant {
                    tag: tag.into(),
                    schema,
                })
                .collect(),
            description: None,
        })
    }

    /// Reference to a named schema
    #[inline]
    #[must_use]
    pub fn recursive_ref(ref_name: impl Into<String>) -> Self {
        Self::RecursiveRef(RecursiveRefNode {
            ref_name: ref_name.into(),
            description: None,
        })
    }

    /// Producer fallback node
    #[inline]
    #[must_use]
    pub fn unknown() -> Self {
        Self::Unknown(UnknownNode::default())
    }

    /// Get node kind
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Primitive(_) => NodeKind::Primitive,
            Self::Enum(_) => NodeKind::Enum,
            Self::Array(_) => NodeKind::Array,
            Self::Tuple(_) => NodeKind::Tuple,
            Self::Object(_) => NodeKind::Object,
            Self::Map(_) => NodeKind::Map,
            Self::Nullable(_) => NodeKind::Nullable,
            Self::Link(_) => NodeKind::Link,
            Self::TaggedUnion(_) => NodeKind::TaggedUnion,
            Self::UntaggedEnum(_) => NodeKind::UntaggedEnum,
            Self::RecursiveRef(_) => NodeKind::RecursiveRef,
            Self::Unknown(_) => NodeKind::Unknown,
        }
    }

    /// Help text of this node, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Primitive(node) => node.description.as_deref(),
            Self::Enum(node) => node.description.as_deref(),
            Self::Array(node) => node.description.as_deref(),
            Self::Tuple(node) => node.description.as_deref(),
            Self::Object(node) => node.description.as_deref(),
            Self::Map(node) => node.description.as_deref(),
            Self::Nullable(node) => node.description.as_deref(),
            Self::Link(node) => node.description.as_deref(),
            Self::TaggedUnion(node) => node.description.as_deref(),
            Self::UntaggedEnum(node) => node.description.as_deref(),
            Self::RecursiveRef(node) => node.description.as_deref(),
            Self::Unknown(node) => node.description.as_deref(),
        }
    }

    /// With help text
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::Primitive(node) => &mut node.description,
            Self::Enum(node) => &mut node.description,
            Self::Array(node) => &mut node.description,
            Self::Tuple(node) => &mut node.description,
            Self::Object(node) => &mut node.description,
            Self::Map(node) => &mut node.description,
            Self::Nullable(node) => &mut node.description,
            Self::Link(node) => &mut node.description,
            Self::TaggedUnion(node) => &mut node.description,
            Self::UntaggedEnum(node) => &mut node.description,
            Self::RecursiveRef(node) => &mut node.description,
            Self::Unknown(node) => &mut node.description,
        };
        *slot = Some(description.into());
        self
    }

    /// Check if node is a nullable wrapper
    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Get object payload
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Direct child nodes in declaration order
    ///
    /// Object-typed payloads (link inline schemas, tagged variants)
    /// contribute their property nodes. Refs are not followed.
    #[must_use]
    pub fn children(&self) -> Vec<&SchemaNode> {
        match self {
            Self::Primitive(_) | Self::Enum(_) | Self::RecursiveRef(_) | Self::Unknown(_) => {
                Vec::new()
            }
            Self::Array(array) => vec![&*array.items],
            Self::Tuple(tuple) => tuple.items.iter().collect(),
            Self::Object(object) => object.child_nodes().collect(),
            Self::Map(map) => vec![&*map.value_schema],
            Self::Nullable(nullable) => vec![&*nullable.inner_schema],
            Self::Link(link) => link.inline_schema.child_nodes().collect(),
            Self::TaggedUnion(union) => union
                .variants
                .iter()
                .flat_map(|v| v.schema.child_nodes())
                .collect(),
            Self::UntaggedEnum(union) => union.variants.iter().map(|v| &v.schema).collect(),
        }
    }

    /// Every ref name inside this tree, first occurrence order
    #[must_use]
    pub fn ref_names(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        self.collect_ref_names(&mut names);
        names
    }

    fn collect_ref_names(&self, names: &mut IndexSet<String>) {
        if let Self::RecursiveRef(reference) = self {
            names.insert(reference.ref_name.clone());
            return;
        }
        for child in self.children() {
            child.collect_ref_names(names);
        }
    }
}

macro_rules! impl_from_payload {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for SchemaNode {
                fn from(payload: $payload) -> Self {
                    Self::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    PrimitiveNode => Primitive,
    EnumNode => Enum,
    ArrayNode => Array,
    TupleNode => Tuple,
    ObjectNode => Object,
    MapNode => Map,
    NullableNode => Nullable,
    LinkNode => Link,
    TaggedUnionNode => TaggedUnion,
    UntaggedEnumNode => UntaggedEnum,
    RecursiveRefNode => RecursiveRef,
    UnknownNode => Unknown,
}

/// Serde adapter keeping `"nodeType": "object"` on object-only payload slots
mod object_schema {
    use super::{ObjectNode, SchemaNode};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Tagged<'a> {
        #[serde(rename = "nodeType")]
        node_type: &'static str,
        #[serde(flatten)]
        object: &'a ObjectNode,
    }

    pub(super) fn serialize<S: Serializer>(
        object: &ObjectNode,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Tagged {
            node_type: "object",
            object,
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ObjectNode, D::Error> {
        match SchemaNode::deserialize(deserializer)? {
            SchemaNode::Object(object) => Ok(object),
            other => Err(D::Error::custom(format!(
                "expected an object node, found '{}'",
                other.kind()
            ))),
        }
    }
}
