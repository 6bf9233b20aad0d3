//! Schemaform Engine
//!
//! Algorithms over schema node trees: validation, default derivation and
//! display ordering.
//!
//! # Overview
//!
//! The engine provides:
//! - **Validator**: Recursive data validation with per-kind presence rules
//!   and a depth ceiling
//! - **default_value**: Minimal values for seeding forms
//! - **sort_entity_properties**: Display priority of object properties
//! - **ValidationOptions**: Depth thresholds, debug events and ref following
//!
//! All algorithms are synchronous. The only async entry point,
//! [`validate_with_registry`], resolves refs before validating.
//!
//! # Example
//!
//! ```rust
//! use schemaform_engine::{validate_schema, ValidationOptions};
//! use schemaform_node::{ObjectNode, SchemaNode};
//! use schemaform_registry::SchemaRegistry;
//! use serde_json::json;
//!
//! let node = SchemaNode::from(
//!     ObjectNode::new().with_required_property("name", SchemaNode::string()),
//! );
//! let registry = SchemaRegistry::new();
//!
//! let result = validate_schema(
//!     "",
//!     Some(&json!({ "name": "" })),
//!     &node,
//!     &ValidationOptions::default(),
//!     &registry,
//! )
//! .unwrap();
//!
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, "Field 'name' is required");
//! ```

#![warn(missing_docs)]

pub mod defaults;
pub mod error;
pub mod hooks;
pub mod options;
pub mod result;
pub mod sort;
pub mod validator;

// Re-exports
pub use defaults::{default_value, default_value_resolved};
pub use error::{EngineError, EngineResult};
pub use hooks::{NodePredicate, NodeValidators};
pub use options::{DepthWarningFn, ValidationOptions};
pub use result::{ValidationError, ValidationResult};
pub use sort::{display_priority, sort_entity_properties, SortProperties};
pub use validator::{validate_schema, validate_with_registry, Validator};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validating and defaulting
    pub use crate::{
        default_value, sort_entity_properties, validate_schema, validate_with_registry,
        EngineError, EngineResult, NodeValidators, SortProperties, ValidationError,
        ValidationOptions, ValidationResult, Validator,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
