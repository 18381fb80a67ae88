//! The error report produced by a validation run.

use crate::path::pattern_matches;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Ordered collection of failure messages keyed by concrete field path.
///
/// Fields keep the order in which their first failure was recorded, and the
/// messages of a field keep the order in which they were added. The structured
/// form is a mapping from field path to a list of messages:
///
/// ```json
/// {
///   "username": ["The username field is required."],
///   "password": ["The password field is required."]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    fields: Vec<(String, Vec<String>)>,
    // field name -> position in `fields`
    index: HashMap<String, usize>,
}

impl ErrorReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.index.get(&field) {
            Some(&position) => self.fields[position].1.push(message),
            None => {
                self.index.insert(field.clone(), self.fields.len());
                self.fields.push((field, vec![message]));
            }
        }
    }

    /// Append every message of another report.
    pub fn merge(&mut self, other: ErrorReport) {
        for (field, messages) in other.fields {
            for message in messages {
                self.add(field.clone(), message);
            }
        }
    }

    /// Check whether a field has messages.
    ///
    /// The key may contain `*` segments (`address.*.city`), in which case any
    /// concrete field matching the pattern counts.
    pub fn has(&self, field: &str) -> bool {
        if field.contains('*') {
            self.fields
                .iter()
                .any(|(name, _)| pattern_matches(field, name))
        } else {
            self.index.contains_key(field)
        }
    }

    /// Messages recorded for a field, in evaluation order.
    pub fn get(&self, field: &str) -> &[String] {
        self.index
            .get(field)
            .map(|&position| self.fields[position].1.as_slice())
            .unwrap_or(&[])
    }

    /// First message recorded for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// All fields with their messages, in recording order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Every message, flattened in recording order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
    }

    /// Names of the fields with messages.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Check if there are no messages at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to the structured `{ field: [messages] }` form.
    pub fn to_structured(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, messages)| {
                let messages = messages
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect();
                (name.clone(), serde_json::Value::Array(messages))
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Pretty-printed JSON of the structured form.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Append-only view of the report handed to post-validation hooks.
///
/// Hooks can read what the rules recorded and add messages of their own, but
/// cannot remove or replace anything.
#[derive(Debug)]
pub struct HookErrors<'a> {
    report: &'a mut ErrorReport,
}

impl<'a> HookErrors<'a> {
    pub(crate) fn new(report: &'a mut ErrorReport) -> Self {
        Self { report }
    }

    /// Append a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.report.add(field, message);
    }

    /// Check whether a field has messages. Accepts `*` patterns.
    pub fn has(&self, field: &str) -> bool {
        self.report.has(field)
    }

    /// Messages recorded for a field.
    pub fn get(&self, field: &str) -> &[String] {
        self.report.get(field)
    }

    /// First message recorded for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.report.first(field)
    }

    /// All fields with their messages.
    pub fn all(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.report.all()
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.report.len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }
}

impl Serialize for ErrorReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, messages) in &self.fields {
            map.serialize_entry(name, messages)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.len())
    }
}
