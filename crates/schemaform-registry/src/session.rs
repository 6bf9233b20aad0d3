//! Per-pass resolution memo
//!
//! A [`ResolutionSession`] is opened for one validation pass. It resolves
//! every ref reachable from a root node up front, then serves synchronous
//! lookups from its memo.

use schemaform_node::SchemaNode;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::error::RegistryResult;
use crate::registry::SchemaRegistry;
use crate::resolver::RefResolver;

/// Resolution memo scoped to one pass
#[derive(Debug)]
pub struct ResolutionSession<'r> {
    registry: &'r SchemaRegistry,
    resolved: HashMap<String, Arc<SchemaNode>>,
}

impl<'r> ResolutionSession<'r> {
    /// Open session over `registry`
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            resolved: HashMap::new(),
        }
    }

    /// Resolve one name, at most once per session
    ///
    /// # Errors
    /// See [`SchemaRegistry::resolve`]
    pub async fn resolve(&mut self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        if let Some(node) = self.resolved.get(name) {
            tracing::debug!(schema = name, "reusing session resolution");
            return Ok(Arc::clone(node));
        }
        let node = self.registry.resolve(name).await?;
        self.resolved.insert(name.to_string(), Arc::clone(&node));
        Ok(node)
    }

    /// Resolve every ref reachable from `node`, following resolved targets
    ///
    /// Returns the number of names memoised so far.
    ///
    /// # Errors
    /// Stops at the first name that cannot be resolved
    pub async fn preload(&mut self, node: &SchemaNode) -> RegistryResult<usize> {
        let mut pending: VecDeque<String> = node.ref_names().into_iter().collect();
        while let Some(name) = pending.pop_front() {
            if self.resolved.contains_key(&name) {
                continue;
            }
            let target = self.resolve(&name).await?;
            pending.extend(
                target
                    .ref_names()
                    .into_iter()
                    .filter(|n| !self.resolved.contains_key(n)),
            );
        }
        Ok(self.resolved.len())
    }

    /// Check if `name` is memoised
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    /// Number of memoised names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Check if nothing is memoised yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl RefResolver for ResolutionSession<'_> {
    fn resolve_ref(&self, name: &str) -> RegistryResult<Arc<SchemaNode>> {
        match self.resolved.get(name) {
            Some(node) => Ok(Arc::clone(node)),
            None => self.registry.resolve_ref(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::loader::BundleLoader;
    use schemaform_node::ObjectNode;

    fn linked_registry() -> SchemaRegistry {
        let loader = BundleLoader::default()
            .with_schema(
                "Pipeline",
                ObjectNode::new()
                    .with_property("steps", SchemaNode::array(SchemaNode::recursive_ref("Step")))
                    .into(),
            )
            .with_schema(
                "Step",
                SchemaNode::untagged_enum([
                    ("shell", SchemaNode::string()),
                    ("nested", SchemaNode::recursive_ref("Pipeline")),
                ]),
            );
        SchemaRegistry::new().with_loader(loader)
    }

    #[tokio::test]
    async fn preload_follows_resolved_targets() {
        let registry = linked_registry();
        let mut session = ResolutionSession::new(&registry);

        let root = SchemaNode::recursive_ref("Pipeline");
        assert_eq!(session.preload(&root).await.unwrap(), 2);
        assert!(session.contains("Pipeline"));
        assert!(session.contains("Step"));
        assert!(session.resolve_ref("Step").is_ok());
    }

    #[tokio::test]
    async fn preload_without_refs_is_empty() {
        let registry = SchemaRegistry::new();
        let mut session = ResolutionSession::new(&registry);

        assert_eq!(session.preload(&SchemaNode::string()).await.unwrap(), 0);
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn preload_stops_at_unresolvable_ref() {
        let registry = SchemaRegistry::new();
        let mut session = ResolutionSession::new(&registry);

        let err = session
            .preload(&SchemaNode::array(SchemaNode::recursive_ref("Ghost")))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::NoLoader {
                name: "Ghost".to_string()
            }
        );
    }
}
