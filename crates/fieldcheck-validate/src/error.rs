//! Error types for the validation engine.

use crate::report::ErrorReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for validation runs.
pub type Result<T, E = ValidateError> = std::result::Result<T, E>;

/// Boxed error returned by caller-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a single rule.
///
/// A rule error carries the rule code and its parameters. The engine turns it
/// into a message by looking up a template (custom messages, then the message
/// catalog) unless the rule supplied its own `message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The rule code (e.g., "required", "min", "email")
    pub code: String,
    /// Message variant, used by size rules ("string", "numeric", "array")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Message template supplied by the rule itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Parameters for placeholder substitution
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl RuleError {
    /// Create a new rule error without a message of its own.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            variant: None,
            message: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the message template.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the message variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Catalog key for this error: `code.variant`, or just `code`.
    pub fn key(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}.{}", self.code, variant),
            None => self.code.clone(),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "[{}] {}", self.key(), message),
            None => write!(f, "[{}]", self.key()),
        }
    }
}

impl std::error::Error for RuleError {}

/// Setup error raised while compiling a rule map.
///
/// These are programming errors in the rule declarations, reported by
/// [`Validator::make`](crate::Validator::make) before any input is inspected.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("unknown validation rule `{0}`")]
    UnknownRule(String),

    #[error("validation rule `{rule}` requires {expected}")]
    MissingArgument { rule: String, expected: &'static str },

    #[error("invalid argument `{value}` for validation rule `{rule}`")]
    InvalidArgument { rule: String, value: String },

    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("invalid pattern for validation rule `{rule}`: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Validation failed: one or more rules rejected the input.
///
/// Carries the complete [`ErrorReport`].
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    report: ErrorReport,
}

impl ValidationFailure {
    pub(crate) fn new(report: ErrorReport) -> Self {
        Self { report }
    }

    /// The error report of the failed run.
    pub fn errors(&self) -> &ErrorReport {
        &self.report
    }

    /// Take the error report.
    pub fn into_errors(self) -> ErrorReport {
        self.report
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.report.messages().next().unwrap_or("The given data was invalid.");
        match self.report.len() {
            0 | 1 => write!(f, "{}", first),
            n => write!(f, "{} (and {} more error(s))", first, n - 1),
        }
    }
}

impl std::error::Error for ValidationFailure {}

/// A post-validation hook returned an error.
///
/// Hook faults are not validation failures: they are never folded into the
/// error report.
#[derive(Debug, Clone, Error)]
#[error("post-validation hook failed: {source}")]
pub struct HookError {
    #[source]
    source: Arc<dyn std::error::Error + Send + Sync>,
}

impl HookError {
    pub(crate) fn new(source: BoxError) -> Self {
        Self {
            source: Arc::from(source),
        }
    }
}

/// Error returned by [`Validator::validate`](crate::Validator::validate).
#[derive(Debug, Clone, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Failed(#[from] ValidationFailure),

    #[error(transparent)]
    Hook(#[from] HookError),
}

impl ValidateError {
    /// The error report, when this is a validation failure.
    pub fn errors(&self) -> Option<&ErrorReport> {
        match self {
            ValidateError::Failed(failure) => Some(failure.errors()),
            ValidateError::Hook(_) => None,
        }
    }
}
