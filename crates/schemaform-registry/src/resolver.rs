//! Synchronous ref lookup consumed by the engine

use schemaform_node::SchemaNode;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::registry::SchemaRegistry;

/// Resolves `recursiveRef` names without awaiting
pub trait RefResolver {
    /// Look up the node registered under `name`
    ///
    /// # Errors
    /// Returns a `RegistryError` when the name cannot be resolved
    fn resolve_ref(&self, name: &str) -> RegistryResult<Arc<SchemaNode>>;
}

impl<R: RefResolver + ?Sized> RefResolver for &R {
    fn resolve_ref(&self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        (**self).resolve_ref(name)
    }
}

impl<R: RefResolver + ?Sized> RefResolver for Arc<R> {
    fn resolve_ref(&self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        (**self).resolve_ref(name)
    }
}

/// Local lookup only
///
/// A miss is `NotLoaded` when a loader could fetch the name, `NoLoader`
/// otherwise.
impl RefResolver for SchemaRegistry {
    fn resolve_ref(&self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        self.get(name).ok_or_else(|| {
            let name = name.to_string();
            if self.has_loader() {
                RegistryError::NotLoaded { name }
            } else {
                RegistryError::NoLoader { name }
            }
        })
    }
}
