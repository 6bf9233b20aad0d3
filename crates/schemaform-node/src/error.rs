//! Error types for the node model
//!
//! Covers the two ways a node tree can be wrong:
//! - Malformed input (unknown `nodeType`, wrong payload shape)
//! - Structural invariant violations found by [`SchemaNode::check`](crate::SchemaNode::check)

use std::fmt::Display;

/// Errors raised while building, parsing or checking node trees
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// Input could not be decoded into a node
    #[error("malformed schema at '{path}': {message}")]
    Malformed { path: String, message: String },

    /// `required` names a property the object does not declare
    #[error("required property '{name}' is not declared at '{path}'")]
    RequiredNotDeclared { path: String, name: String },

    /// Two union variants share a tag
    #[error("duplicate variant tag '{tag}' at '{path}'")]
    DuplicateTag { path: String, tag: String },

    /// A nullable node directly wraps another nullable node
    #[error("nullable node wraps another nullable node at '{path}'")]
    NestedNullable { path: String },

    /// Structural edit referenced a property that does not exist
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
}

impl NodeError {
    /// Create malformed-input error
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_path_error<E: Display>(err: &serde_path_to_error::Error<E>) -> Self {
        Self::malformed(err.path().to_string(), err.inner().to_string())
    }
}

/// Result type alias for node operations
pub type NodeResult<T> = Result<T, NodeError>;
