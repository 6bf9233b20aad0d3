//! Schemaform Registry
//!
//! Named schema storage with single-flight on-demand loading.
//!
//! # Overview
//!
//! The registry provides:
//! - **SchemaRegistry**: Concurrent name → node store with an optional loader
//! - **SchemaLoader**: Async seam for fetching missing schemas
//! - **RefResolver**: Synchronous lookup consumed by the validation engine
//! - **ResolutionSession**: Resolve-once memo for one validation pass
//!
//! # Example
//!
//! ```rust
//! use schemaform_node::SchemaNode;
//! use schemaform_registry::{RefResolver, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new();
//! registry.insert("Label", SchemaNode::string()).unwrap();
//!
//! assert!(registry.resolve_ref("Label").is_ok());
//! assert!(registry.resolve_ref("Tree").is_err());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod session;

// Re-exports
pub use error::{RegistryError, RegistryResult};
pub use loader::{BundleLoader, SchemaLoader};
pub use registry::SchemaRegistry;
pub use resolver::RefResolver;
pub use session::ResolutionSession;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for registry operations
    pub use crate::{
        RefResolver, RegistryError, RegistryResult, ResolutionSession, SchemaLoader,
        SchemaRegistry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
