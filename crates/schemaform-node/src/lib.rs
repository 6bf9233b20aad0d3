//! Schemaform Node Model
//!
//! Closed, recursive description of the shapes configuration data can take.
//!
//! # Overview
//!
//! The node crate provides:
//! - **SchemaNode**: One variant per node kind, serialized by `nodeType`
//! - **check**: Structural invariants over a node tree
//! - **parse**: Path-aware JSON decoding of single nodes and named bundles
//! - **strings / path**: Label, URL-segment and error-path helpers
//!
//! # Example
//!
//! ```rust
//! use schemaform_node::{ObjectNode, SchemaNode};
//!
//! let config = SchemaNode::from(
//!     ObjectNode::new()
//!         .with_required_property("name", SchemaNode::string())
//!         .with_property("tags", SchemaNode::array(SchemaNode::string())),
//! );
//! assert!(config.check().is_ok());
//!
//! let parsed = SchemaNode::from_json_str(
//!     r#"{"nodeType":"recursiveRef","refName":"Tree"}"#,
//! ).unwrap();
//! assert_eq!(parsed, SchemaNode::recursive_ref("Tree"));
//! ```

#![warn(missing_docs)]

pub mod check;
pub mod error;
pub mod inspect;
pub mod node;
pub mod parse;
pub mod path;
pub mod strings;

// Re-exports
pub use error::{NodeError, NodeResult};
pub use inspect::{extract_node_type, is_entity_valid, is_primitive_node, is_singleton_id, SINGLETON_ID};
pub use node::{
    ArrayNode, EnumNode, LinkNode, MapNode, NodeKind, NullableNode, ObjectNode, PrimitiveNode,
    PrimitiveType, RecursiveRefNode, SchemaNode, TaggedUnionNode, TaggedVariant, TupleNode,
    UnknownNode, UntaggedEnumNode, UntaggedVariant,
};
pub use parse::{bundle_from_value, parse_bundle, SchemaBundle};
pub use path::{join_field, join_index};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and inspecting nodes
    pub use crate::{
        NodeError, NodeKind, NodeResult, ObjectNode, PrimitiveType, SchemaBundle, SchemaNode,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
