//! On-demand schema loading seam

use schemaform_node::{SchemaBundle, SchemaNode};

/// Fetches schemas the registry does not hold yet
///
/// A loader may return more schemas than requested; the registry keeps every
/// returned schema it does not already have.
#[async_trait::async_trait]
pub trait SchemaLoader: Send + Sync {
    /// Load the bundle containing `name`
    async fn load(&self, name: &str) -> anyhow::Result<SchemaBundle>;
}

/// Loader serving one fixed bundle
///
/// Every call returns the whole bundle, the way a lazily-fetched runtime
/// bundle arrives.
#[derive(Debug, Clone, Default)]
pub struct BundleLoader {
    bundle: SchemaBundle,
}

impl BundleLoader {
    /// Create loader over `bundle`
    #[inline]
    #[must_use]
    pub fn new(bundle: SchemaBundle) -> Self {
        Self { bundle }
    }

    /// With one more named schema
    #[must_use]
    pub fn with_schema(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.bundle.insert(name.into(), node);
        self
    }
}

#[async_trait::async_trait]
impl SchemaLoader for BundleLoader {
    async fn load(&self, _name: &str) -> anyhow::Result<SchemaBundle> {
        Ok(self.bundle.clone())
    }
}
