//! Name → schema registry
//!
//! Concurrent store of checked nodes with optional on-demand loading.
//! Concurrent `resolve` calls for the same missing name share one loader call.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moka::future::Cache;
use schemaform_node::{SchemaBundle, SchemaNode};
use std::fmt;
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};
use crate::loader::SchemaLoader;

/// Upper bound on concurrently loading names
const IN_FLIGHT_CAPACITY: u64 = 1_024;

/// Registry of named schemas
///
/// Nodes are checked on insert and stored behind `Arc`, so lookups hand out
/// cheap shared handles. There is no global instance; pass registries
/// explicitly.
pub struct SchemaRegistry {
    schemas: DashMap<String, Arc<SchemaNode>>,
    loader: Option<Arc<dyn SchemaLoader>>,
    in_flight: Cache<String, Arc<SchemaNode>>,
}

impl SchemaRegistry {
    /// Create empty registry without a loader
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
            loader: None,
            in_flight: Cache::new(IN_FLIGHT_CAPACITY),
        }
    }

    /// With loader for names not held locally
    #[must_use]
    pub fn with_loader(self, loader: impl SchemaLoader + 'static) -> Self {
        self.with_shared_loader(Arc::new(loader))
    }

    /// With shared loader handle
    #[must_use]
    pub fn with_shared_loader(mut self, loader: Arc<dyn SchemaLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// With a bundle of schemas inserted up front
    ///
    /// # Errors
    /// Returns `RegistryError::Invalid` if any node fails its checks
    pub fn with_bundle(self, bundle: SchemaBundle) -> RegistryResult<Self> {
        self.extend(bundle)?;
        Ok(self)
    }

    /// Check if a loader is configured
    #[inline]
    #[must_use]
    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Insert or replace a schema
    ///
    /// # Errors
    /// Returns `RegistryError::Invalid` if the node fails its checks
    pub fn insert(
        &self,
        name: impl Into<String>,
        node: SchemaNode,
    ) -> RegistryResult<Option<Arc<SchemaNode>>> {
        node.check()?;
        Ok(self.schemas.insert(name.into(), Arc::new(node)))
    }

    /// Insert every schema of `bundle` not already present
    ///
    /// The whole bundle is checked before anything is inserted.
    ///
    /// # Errors
    /// Returns `RegistryError::Invalid` if any node fails its checks
    pub fn extend(&self, bundle: SchemaBundle) -> RegistryResult<usize> {
        bundle.values().try_for_each(SchemaNode::check)?;

        let mut added = 0;
        for (name, node) in bundle {
            if let Entry::Vacant(slot) = self.schemas.entry(name) {
                slot.insert(Arc::new(node));
                added += 1;
            }
        }
        Ok(added)
    }

    /// Get schema held locally
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<SchemaNode>> {
        self.schemas.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if schema is held locally
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Remove schema held locally
    pub fn remove(&self, name: &str) -> Option<Arc<SchemaNode>> {
        self.schemas.remove(name).map(|(_, node)| node)
    }

    /// Sorted names held locally
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of schemas held locally
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if registry holds no schemas
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Resolve a name, loading it on demand
    ///
    /// # Errors
    /// - `NoLoader` if the name is unknown and no loader is configured
    /// - `LoadFailed` if the loader errors; the failure is not remembered
    /// - `NotFound` if the loaded bundle lacks the name
    /// - `Invalid` if the loaded bundle fails its checks
    pub async fn resolve(&self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        if let Some(node) = self.get(name) {
            tracing::debug!(schema = name, "schema resolved locally");
            return Ok(node);
        }

        let Some(loader) = &self.loader else {
            return Err(RegistryError::NoLoader {
                name: name.to_string(),
            });
        };

        let result = self
            .in_flight
            .try_get_with(name.to_string(), self.load_missing(loader.as_ref(), name))
            .await
            .map_err(|err| (*err).clone());

        // The store is authoritative once loaded
        self.in_flight.invalidate(name).await;
        result
    }

    async fn load_missing(
        &self,
        loader: &dyn SchemaLoader,
        name: &str,
    ) -> RegistryResult<Arc<SchemaNode>> {
        if let Some(node) = self.get(name) {
            return Ok(node);
        }

        tracing::info!(schema = name, "loading schema");
        let bundle = loader.load(name).await.map_err(|err| {
            tracing::warn!(schema = name, error = %err, "schema loader failed");
            RegistryError::LoadFailed {
                name: name.to_string(),
                message: format!("{err:#}"),
            }
        })?;

        let added = self.extend(bundle)?;
        tracing::debug!(schema = name, added, "loaded bundle merged");

        self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.names())
            .field("has_loader", &self.has_loader())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::BundleLoader;
    use schemaform_node::{NodeError, ObjectNode};

    struct BrokenLoader;

    #[async_trait::async_trait]
    impl SchemaLoader for BrokenLoader {
        async fn load(&self, _name: &str) -> anyhow::Result<SchemaBundle> {
            anyhow::bail!("connection refused")
        }
    }

    fn tree() -> SchemaNode {
        ObjectNode::new()
            .with_required_property("label", SchemaNode::string())
            .with_property("children", SchemaNode::array(SchemaNode::recursive_ref("Tree")))
            .into()
    }

    #[test]
    fn insert_and_get() {
        let registry = SchemaRegistry::new();
        registry.insert("Tree", tree()).unwrap();

        assert!(registry.contains("Tree"));
        assert_eq!(registry.len(), 1);
        assert_eq!(*registry.get("Tree").unwrap(), tree());
        assert!(registry.get("Other").is_none());
    }

    #[test]
    fn insert_rejects_unchecked_node() {
        let mut object = ObjectNode::new();
        object.required.insert("ghost".to_string());

        let registry = SchemaRegistry::new();
        let err = registry.insert("Broken", object.into()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Invalid(NodeError::RequiredNotDeclared { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn extend_keeps_existing_entries() {
        let registry = SchemaRegistry::new();
        registry.insert("Label", SchemaNode::integer()).unwrap();

        let mut bundle = SchemaBundle::new();
        bundle.insert("Label".to_string(), SchemaNode::string());
        bundle.insert("Tree".to_string(), tree());

        assert_eq!(registry.extend(bundle).unwrap(), 1);
        assert_eq!(*registry.get("Label").unwrap(), SchemaNode::integer());
        assert_eq!(registry.names(), vec!["Label".to_string(), "Tree".to_string()]);
    }

    #[tokio::test]
    async fn resolve_without_loader() {
        let registry = SchemaRegistry::new();
        let err = registry.resolve("Tree").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "schema 'Tree' not found and no loader configured"
        );
    }

    #[tokio::test]
    async fn resolve_through_loader_merges_bundle() {
        let loader = BundleLoader::default()
            .with_schema("Tree", tree())
            .with_schema("Label", SchemaNode::string());
        let registry = SchemaRegistry::new().with_loader(loader);

        let node = registry.resolve("Tree").await.unwrap();
        assert_eq!(*node, tree());
        assert!(registry.contains("Label"));
    }

    #[tokio::test]
    async fn resolve_missing_from_bundle() {
        let loader = BundleLoader::default().with_schema("Label", SchemaNode::string());
        let registry = SchemaRegistry::new().with_loader(loader);

        let err = registry.resolve("Tree").await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotFound {
                name: "Tree".to_string()
            }
        );
    }

    #[tokio::test]
    async fn loader_failure_is_reported() {
        let registry = SchemaRegistry::new().with_loader(BrokenLoader);
        let err = registry.resolve("Tree").await.unwrap_err();

        let RegistryError::LoadFailed { name, message } = err else {
            panic!("expected load failure");
        };
        assert_eq!(name, "Tree");
        assert!(message.contains("connection refused"));
    }
}
