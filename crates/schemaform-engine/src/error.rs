//! Error types for the engine
//!
//! Data problems are never errors here; they are entries in a
//! [`ValidationResult`](crate::ValidationResult). Only failures to resolve
//! refs and bad configuration surface as `Err`.

use schemaform_registry::RegistryError;

/// Errors raised by validation and default derivation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A ref could not be resolved
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Options could not be loaded
    #[error("invalid validation options: {0}")]
    Config(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
