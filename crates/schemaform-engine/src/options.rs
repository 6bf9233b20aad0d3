//! Validation options
//!
//! Options travel by value through the recursion; each structural step
//! passes [`ValidationOptions::next_depth`] to its children.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};

/// Callback fired with `(path, depth)` at the warn and hard depth thresholds
pub type DepthWarningFn = Arc<dyn Fn(&str, usize) + Send + Sync>;

/// Knobs for one validation pass
///
/// Loadable from a flat TOML table:
///
/// ```toml
/// warn_depth = 10
/// max_depth = 12
/// follow_refs = true
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Current recursion depth
    pub depth: usize,
    /// Depth at which `on_depth_warning` starts firing
    pub warn_depth: usize,
    /// Depth at which validation stops and reports valid
    pub max_depth: usize,
    /// Emit a debug event per visited node
    pub debug: bool,
    /// Validate data against resolved `recursiveRef` targets
    pub follow_refs: bool,
    /// Called with `(path, depth)` at or past `warn_depth`
    #[serde(skip)]
    pub on_depth_warning: Option<DepthWarningFn>,
}

impl ValidationOptions {
    /// Create options with default thresholds
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML
    ///
    /// # Errors
    /// Returns `EngineError::Config` for malformed input
    pub fn from_toml_str(src: &str) -> EngineResult<Self> {
        toml::from_str(src).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// With starting depth
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// With warning threshold
    #[must_use]
    pub fn with_warn_depth(mut self, warn_depth: usize) -> Self {
        self.warn_depth = warn_depth;
        self
    }

    /// With hard threshold
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With per-node debug events
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// With ref following
    #[must_use]
    pub fn with_follow_refs(mut self, follow_refs: bool) -> Self {
        self.follow_refs = follow_refs;
        self
    }

    /// With depth warning callback
    #[must_use]
    pub fn with_depth_warning(mut self, callback: impl Fn(&str, usize) + Send + Sync + 'static) -> Self {
        self.on_depth_warning = Some(Arc::new(callback));
        self
    }

    /// Copy one level deeper
    #[must_use]
    pub fn next_depth(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    pub(crate) fn warn_depth_reached(&self, path: &str) {
        if let Some(callback) = &self.on_depth_warning {
            callback(path, self.depth);
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            warn_depth: 15,
            max_depth: 20,
            debug: false,
            follow_refs: false,
            on_depth_warning: None,
        }
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("depth", &self.depth)
            .field("warn_depth", &self.warn_depth)
            .field("max_depth", &self.max_depth)
            .field("debug", &self.debug)
            .field("follow_refs", &self.follow_refs)
            .field("on_depth_warning", &self.on_depth_warning.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn defaults() {
        let options = ValidationOptions::default();
        assert_eq!(options.depth, 0);
        assert_eq!(options.warn_depth, 15);
        assert_eq!(options.max_depth, 20);
        assert!(!options.debug);
        assert!(!options.follow_refs);
        assert!(options.on_depth_warning.is_none());
    }

    #[test]
    fn next_depth_keeps_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let options = ValidationOptions::new()
            .with_depth_warning(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .next_depth();

        assert_eq!(options.depth, 1);
        options.warn_depth_reached("x");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn from_toml_fills_missing_fields() {
        let options = ValidationOptions::from_toml_str("max_depth = 5\nfollow_refs = true\n").unwrap();
        assert_eq!(options.max_depth, 5);
        assert_eq!(options.warn_depth, 15);
        assert!(options.follow_refs);
    }

    #[test]
    fn from_toml_rejects_bad_types() {
        let err = ValidationOptions::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let options = ValidationOptions::new().with_depth_warning(|_, _| {});
        let rendered = format!("{options:?}");
        assert!(rendered.contains("on_depth_warning: true"));
    }
}
