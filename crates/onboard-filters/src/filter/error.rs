//! Error types for filter validation and preparation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// One violated constraint, located by a dotted path such as
/// `criteria.conditions.0.operator`. The root value has the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every constraint a candidate filter violates, found in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    /// Creates an empty failure.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Records an issue.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    /// Returns true when no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the recorded issues in the order they were found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Returns true if some issue is located at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    /// Serializes the issue list as a JSON array of `{path, message}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.issues).unwrap_or_else(|_| "[]".to_string())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Errors produced when preparing a filter for persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The defaults-filled filter still failed validation.
    #[error("invalid filter: {}", .0.to_json())]
    InvalidFilter(ValidationFailure),
}

impl FilterError {
    /// Returns the validation issues carried by the error.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            FilterError::InvalidFilter(failure) => failure.issues(),
        }
    }
}

impl From<ValidationFailure> for FilterError {
    fn from(failure: ValidationFailure) -> Self {
        FilterError::InvalidFilter(failure)
    }
}
