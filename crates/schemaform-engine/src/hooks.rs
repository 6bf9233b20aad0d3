//! Per-kind custom validators
//!
//! A predicate registered for a [`NodeKind`] runs before the built-in rules
//! for every node of that kind. Returning `false` reports `Invalid <kind>`
//! at the node's path and skips the built-in rules for that node.

use schemaform_node::{NodeKind, SchemaNode};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate over `(data, node)`; `data` is `None` when absent
pub type NodePredicate = Arc<dyn Fn(Option<&Value>, &SchemaNode) -> bool + Send + Sync>;

/// Custom validators keyed by node kind
#[derive(Clone, Default)]
pub struct NodeValidators {
    by_kind: HashMap<NodeKind, NodePredicate>,
}

impl NodeValidators {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With predicate for `kind`, replacing any previous one
    #[must_use]
    pub fn with(
        mut self,
        kind: NodeKind,
        predicate: impl Fn(Option<&Value>, &SchemaNode) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.by_kind.insert(kind, Arc::new(predicate));
        self
    }

    /// Get predicate for `kind`
    #[inline]
    #[must_use]
    pub fn get(&self, kind: NodeKind) -> Option<&NodePredicate> {
        self.by_kind.get(&kind)
    }

    /// Number of registered kinds
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    /// Check if no predicate is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// True unless a registered predicate rejects `data`
    pub(crate) fn accepts(&self, data: Option<&Value>, node: &SchemaNode) -> bool {
        self.get(node.kind())
            .map_or(true, |predicate| predicate(data, node))
    }
}

impl fmt::Debug for NodeValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.by_kind.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("NodeValidators").field("kinds", &kinds).finish()
    }
}
