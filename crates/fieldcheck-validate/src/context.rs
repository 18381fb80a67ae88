//! Read-only context handed to rules during evaluation.

use crate::path::{self, FieldPath};
use serde_json::Value;

/// Context for a single rule evaluation.
///
/// Gives rules access to the complete input, so that data-aware rules can
/// compare against sibling fields (e.g., `same:password`), plus the field being
/// validated and the active locale.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    data: &'a Value,
    attribute: &'a str,
    declared: &'a FieldPath,
    locale: &'a str,
}

impl<'a> ValidationContext<'a> {
    /// Create a context for one concrete attribute.
    pub fn new(
        data: &'a Value,
        attribute: &'a str,
        declared: &'a FieldPath,
        locale: &'a str,
    ) -> Self {
        Self {
            data,
            attribute,
            declared,
            locale,
        }
    }

    /// The full input under validation.
    pub fn data(&self) -> &'a Value {
        self.data
    }

    /// Look up another field by literal dotted path.
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        path::lookup(self.data, path)
    }

    /// Concrete path of the field being validated (e.g., `address.1.city`).
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// The declared path the field was resolved from (e.g., `address.*.city`).
    pub fn declared(&self) -> &'a FieldPath {
        self.declared
    }

    /// Locale used for messages.
    pub fn locale(&self) -> &'a str {
        self.locale
    }
}
