//! Testing utilities for Schemaform workspace
//!
//! Shared fixtures, loaders, and tracing setup.

#![allow(missing_docs)]

use parking_lot::Mutex;
use schemaform_node::{ObjectNode, SchemaBundle, SchemaNode};
use schemaform_registry::{SchemaLoader, SchemaRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `{ kind: "db", host } | { kind: "fs", path }`
pub fn source_union() -> SchemaNode {
    SchemaNode::tagged_union(
        "kind",
        [
            (
                "db",
                ObjectNode::new().with_required_property("host", SchemaNode::string()),
            ),
            (
                "fs",
                ObjectNode::new().with_required_property("path", SchemaNode::string()),
            ),
        ],
    )
}

/// Object with a required `source` union field
pub fn pipeline_schema() -> ObjectNode {
    ObjectNode::new()
        .with_required_property("name", SchemaNode::string())
        .with_required_property("source", source_union())
        .with_property("retries", SchemaNode::nullable(SchemaNode::integer()))
}

/// `Tree { label, children: [Tree] }`
pub fn tree_schema() -> SchemaNode {
    ObjectNode::new()
        .with_required_property("label", SchemaNode::string())
        .with_property("children", SchemaNode::array(SchemaNode::recursive_ref("Tree")))
        .into()
}

/// `Node { next: Node }`, required self-reference
pub fn chain_schema() -> SchemaNode {
    ObjectNode::new()
        .with_required_property("id", SchemaNode::string())
        .with_required_property("next", SchemaNode::recursive_ref("Chain"))
        .into()
}

pub fn recursive_bundle() -> SchemaBundle {
    let mut bundle = SchemaBundle::new();
    bundle.insert("Tree".to_string(), tree_schema());
    bundle.insert("Chain".to_string(), chain_schema());
    bundle
}

/// Registry preloaded with [`recursive_bundle`]
pub fn recursive_registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_bundle(recursive_bundle())
        .expect("fixture bundle is well formed")
}

/// Tree nested `depth` levels through `children[0]`
pub fn nested_tree(depth: usize) -> serde_json::Value {
    let mut value = serde_json::json!({ "label": "leaf" });
    for level in 0..depth {
        value = serde_json::json!({ "label": format!("level-{level}"), "children": [value] });
    }
    value
}

/// Loader that counts calls and optionally sleeps before answering
#[derive(Debug, Default)]
pub struct CountingLoader {
    bundle: SchemaBundle,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingLoader {
    pub fn new(bundle: SchemaBundle) -> Self {
        Self {
            bundle,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SchemaLoader for CountingLoader {
    async fn load(&self, _name: &str) -> anyhow::Result<SchemaBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.bundle.clone())
    }
}

/// Loader that fails the first `failures` calls, then serves its bundle
#[derive(Debug)]
pub struct FlakyLoader {
    bundle: SchemaBundle,
    failures: AtomicUsize,
}

impl FlakyLoader {
    pub fn new(bundle: SchemaBundle, failures: usize) -> Self {
        Self {
            bundle,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait::async_trait]
impl SchemaLoader for FlakyLoader {
    async fn load(&self, name: &str) -> anyhow::Result<SchemaBundle> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("transient failure loading '{name}'");
        }
        Ok(self.bundle.clone())
    }
}

/// Loader that records requested names
#[derive(Debug, Default)]
pub struct RecordingLoader {
    bundle: SchemaBundle,
    requests: Mutex<Vec<String>>,
}

impl RecordingLoader {
    pub fn new(bundle: SchemaBundle) -> Self {
        Self {
            bundle,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl SchemaLoader for RecordingLoader {
    async fn load(&self, name: &str) -> anyhow::Result<SchemaBundle> {
        self.requests.lock().push(name.to_string());
        Ok(self.bundle.clone())
    }
}
