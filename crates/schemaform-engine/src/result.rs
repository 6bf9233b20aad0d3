//! Validation results

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One data problem found during validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Dotted/bracketed path of the offending value
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Offending value; `None` when the value was absent
    #[serde(default)]
    pub value: Option<Value>,
}

impl ValidationError {
    /// Create error
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            value: value.cloned(),
        }
    }
}

/// Outcome of validating data against a node
///
/// `valid` is false exactly when `errors` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when no errors were found
    pub valid: bool,
    /// Every problem found, in traversal order
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Valid result with no errors
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Invalid result with a single error
    #[must_use]
    pub fn failure(path: impl Into<String>, message: impl Into<String>, value: Option<&Value>) -> Self {
        Self::from_errors(vec![ValidationError::new(path, message, value)])
    }

    /// Result from collected errors; valid iff empty
    #[inline]
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Accumulate another result into this one
    pub fn absorb(&mut self, other: ValidationResult) {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
    }

    /// Errors reported at exactly `path`
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// Messages in report order
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}
