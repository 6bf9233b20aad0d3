//! Error types for schema resolution

use schemaform_node::NodeError;

/// Errors raised while resolving named schemas
///
/// `Clone` so a single-flight load can hand the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Loader ran but did not return the requested name
    #[error("schema '{name}' not found")]
    NotFound { name: String },

    /// Name is not known locally and nothing can fetch it
    #[error("schema '{name}' not found and no loader configured")]
    NoLoader { name: String },

    /// Name is fetchable but has not been loaded yet
    #[error("schema '{name}' is not loaded; resolve it before validating")]
    NotLoaded { name: String },

    /// Loader returned an error
    #[error("failed to load schema '{name}': {message}")]
    LoadFailed { name: String, message: String },

    /// Node failed structural checks on insert
    #[error("invalid schema: {0}")]
    Invalid(#[from] NodeError),
}

impl RegistryError {
    /// Name the error refers to, if any
    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name }
            | Self::NoLoader { name }
            | Self::NotLoaded { name }
            | Self::LoadFailed { name, .. } => Some(name),
            Self::Invalid(_) => None,
        }
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_loader_display() {
        let err = RegistryError::NoLoader {
            name: "Tree".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "schema 'Tree' not found and no loader configured"
        );
        assert_eq!(err.schema_name(), Some("Tree"));
    }

    #[test]
    fn invalid_wraps_node_error() {
        let err = RegistryError::from(NodeError::UnknownProperty("x".to_string()));
        assert_eq!(err.to_string(), "invalid schema: unknown property 'x'");
        assert_eq!(err.schema_name(), None);
    }
}
