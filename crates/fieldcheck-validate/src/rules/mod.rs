//! Validation rules.
//!
//! A rule set for one field is an ordered list of [`RuleSpec`]s: rule names
//! with optional arguments (`"min:6"`), rule objects implementing [`Rule`], or
//! closures. [`RuleRegistry`](crate::RuleRegistry) compiles them before any
//! input is inspected.

mod builtin;
mod objects;

pub use builtin::*;
pub use objects::*;

use crate::context::ValidationContext;
use crate::error::RuleError;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A single validation rule.
///
/// ## Example
///
/// ```rust
/// use fieldcheck_validate::{Rule, RuleError, ValidationContext};
/// use serde_json::Value;
///
/// #[derive(Debug)]
/// struct Uppercase;
///
/// impl Rule for Uppercase {
///     fn name(&self) -> &str {
///         "uppercase"
///     }
///
///     fn validate(
///         &self,
///         _attribute: &str,
///         value: &Value,
///         _ctx: &ValidationContext<'_>,
///     ) -> Result<(), RuleError> {
///         match value.as_str() {
///             Some(s) if s.to_uppercase() == s => Ok(()),
///             _ => Err(RuleError::new("uppercase").with_message("The :attribute must be UPPERCASE")),
///         }
///     }
/// }
/// ```
pub trait Rule: Debug + Send + Sync {
    /// Rule code used for error reporting and message lookup.
    fn name(&self) -> &str;

    /// Validate one value. `attribute` is the concrete field path.
    fn validate(
        &self,
        attribute: &str,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), RuleError>;

    /// Implicit rules also run when the value is absent or blank.
    fn implicit(&self) -> bool {
        false
    }
}

/// Signature of closure rules.
pub type ClosureFn = dyn Fn(&str, &Value, &mut Fail) + Send + Sync;

/// Failure signal handed to closure rules.
#[derive(Debug, Default)]
pub struct Fail {
    messages: Vec<String>,
    bail: bool,
}

impl Fail {
    /// Record a failure with a message template.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Record a failure and skip the remaining rules of this field.
    pub fn bail(&mut self, message: impl Into<String>) {
        self.fail(message);
        self.bail = true;
    }

    /// Check if any failure was recorded.
    pub fn failed(&self) -> bool {
        !self.messages.is_empty()
    }
}

/// A rule as written in a rule set.
#[derive(Clone)]
pub enum RuleSpec {
    /// Rule name with optional colon-delimited arguments, e.g. `max:100`
    Named(String),
    /// A rule object
    Object(Arc<dyn Rule>),
    /// A closure receiving `(attribute, value, fail)`
    Closure(Arc<ClosureFn>),
}

impl RuleSpec {
    /// A named rule.
    pub fn named(spec: impl Into<String>) -> Self {
        RuleSpec::Named(spec.into())
    }

    /// A rule object.
    pub fn object(rule: impl Rule + 'static) -> Self {
        RuleSpec::Object(Arc::new(rule))
    }

    /// A closure rule.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&str, &Value, &mut Fail) + Send + Sync + 'static,
    {
        RuleSpec::Closure(Arc::new(f))
    }
}

impl Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            RuleSpec::Object(rule) => f.debug_tuple("Object").field(rule).finish(),
            RuleSpec::Closure(_) => f.write_str("Closure"),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(spec: &str) -> Self {
        RuleSpec::named(spec)
    }
}

impl From<String> for RuleSpec {
    fn from(spec: String) -> Self {
        RuleSpec::Named(spec)
    }
}

impl From<Arc<dyn Rule>> for RuleSpec {
    fn from(rule: Arc<dyn Rule>) -> Self {
        RuleSpec::Object(rule)
    }
}

/// Ordered rules for one field path.
///
/// Built from a pipe-delimited string or a list of specs:
///
/// ```rust
/// use fieldcheck_validate::{Password, RuleSet};
///
/// let username = RuleSet::from("required|email|max:100");
/// let password = RuleSet::new()
///     .rule("required")
///     .rule(Password::min(6).letters().numbers());
/// assert_eq!(username.len(), 3);
/// assert_eq!(password.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    specs: Vec<RuleSpec>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pipe-delimited rule string (`required|email|max:100`).
    pub fn parse(rules: &str) -> Self {
        rules
            .split('|')
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .map(RuleSpec::named)
            .collect()
    }

    /// Append a rule.
    pub fn rule(mut self, rule: impl Into<RuleSpec>) -> Self {
        self.specs.push(rule.into());
        self
    }

    /// Append a rule object.
    pub fn object(self, rule: impl Rule + 'static) -> Self {
        self.rule(RuleSpec::object(rule))
    }

    /// Append a closure rule.
    pub fn closure<F>(self, f: F) -> Self
    where
        F: Fn(&str, &Value, &mut Fail) + Send + Sync + 'static,
    {
        self.rule(RuleSpec::closure(f))
    }

    /// The specs in declaration order.
    pub fn specs(&self) -> &[RuleSpec] {
        &self.specs
    }

    /// Number of specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl From<&str> for RuleSet {
    fn from(rules: &str) -> Self {
        RuleSet::parse(rules)
    }
}

impl From<String> for RuleSet {
    fn from(rules: String) -> Self {
        RuleSet::parse(&rules)
    }
}

impl From<Vec<RuleSpec>> for RuleSet {
    fn from(specs: Vec<RuleSpec>) -> Self {
        Self { specs }
    }
}

impl<const N: usize> From<[RuleSpec; N]> for RuleSet {
    fn from(specs: [RuleSpec; N]) -> Self {
        Self {
            specs: specs.into(),
        }
    }
}

impl FromIterator<RuleSpec> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().collect(),
        }
    }
}

/// A rule ready for evaluation.
#[derive(Clone)]
pub(crate) enum CompiledRule {
    Rule(Arc<dyn Rule>),
    Closure(Arc<ClosureFn>),
}

/// Outcome of evaluating one compiled rule.
pub(crate) struct Evaluation {
    pub errors: Vec<RuleError>,
    pub bail: bool,
}

impl CompiledRule {
    pub fn name(&self) -> &str {
        match self {
            CompiledRule::Rule(rule) => rule.name(),
            CompiledRule::Closure(_) => "closure",
        }
    }

    pub fn implicit(&self) -> bool {
        match self {
            CompiledRule::Rule(rule) => rule.implicit(),
            CompiledRule::Closure(_) => false,
        }
    }

    pub fn evaluate(&self, attribute: &str, value: &Value, ctx: &ValidationContext<'_>) -> Evaluation {
        match self {
            CompiledRule::Rule(rule) => Evaluation {
                errors: rule.validate(attribute, value, ctx).err().into_iter().collect(),
                bail: false,
            },
            CompiledRule::Closure(f) => {
                let mut fail = Fail::default();
                f(attribute, value, &mut fail);
                Evaluation {
                    errors: fail
                        .messages
                        .into_iter()
                        .map(|message| RuleError::new("closure").with_message(message))
                        .collect(),
                    bail: fail.bail,
                }
            }
        }
    }
}

impl Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledRule::Rule(rule) => rule.fmt(f),
            CompiledRule::Closure(_) => f.write_str("Closure"),
        }
    }
}
