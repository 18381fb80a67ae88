//! Built-in rules addressed by name in rule strings.

use crate::context::ValidationContext;
use crate::error::{ConfigError, RuleError};
use crate::rules::Rule;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified email regex
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        ).expect("email regex is valid")
    })
}

/// Parse a string as a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check whether a value is blank: absent-like for the `required` rule.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// The size of a value as seen by `min`, `max`, `between` and `size`.
///
/// - numbers measure as their value
/// - strings measure as their character count, or as their numeric value when
///   the field also carries `numeric` or `integer` and the string parses
/// - arrays measure as their length, objects as their number of keys
/// - booleans measure as 1 or 0 characters, `null` as 0 characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Numeric(f64),
    String(usize),
    Array(usize),
}

impl Measure {
    /// Measure a value.
    pub fn of(value: &Value, numeric: bool) -> Self {
        match value {
            Value::Number(n) => Measure::Numeric(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => match parse_number(s) {
                Some(n) if numeric => Measure::Numeric(n),
                _ => Measure::String(s.chars().count()),
            },
            Value::Array(items) => Measure::Array(items.len()),
            Value::Object(map) => Measure::Array(map.len()),
            Value::Bool(b) => Measure::String(usize::from(*b)),
            Value::Null => Measure::String(0),
        }
    }

    /// The measured size.
    pub fn size(&self) -> f64 {
        match *self {
            Measure::Numeric(n) => n,
            Measure::String(n) | Measure::Array(n) => n as f64,
        }
    }

    /// Message variant for this kind of measure.
    pub fn variant(&self) -> &'static str {
        match self {
            Measure::Numeric(_) => "numeric",
            Measure::String(_) => "string",
            Measure::Array(_) => "array",
        }
    }
}

/// A numeric rule argument, keeping its text for messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    value: f64,
    raw: String,
}

impl Bound {
    /// Parse a rule argument.
    pub fn parse(rule: &str, raw: &str) -> Result<Self, ConfigError> {
        parse_number(raw)
            .map(|value| Self {
                value,
                raw: raw.trim().to_string(),
            })
            .ok_or_else(|| ConfigError::InvalidArgument {
                rule: rule.to_string(),
                value: raw.to_string(),
            })
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    fn param(&self) -> Value {
        match self.raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::from(self.value),
        }
    }
}

impl From<usize> for Bound {
    fn from(n: usize) -> Self {
        Self {
            value: n as f64,
            raw: n.to_string(),
        }
    }
}

/// `required`: fails on absent, `null`, blank strings, empty arrays and objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        if is_blank(value) {
            Err(RuleError::new("required"))
        } else {
            Ok(())
        }
    }

    fn implicit(&self) -> bool {
        true
    }
}

/// `email`: the value is a string shaped like an email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Rule for Email {
    fn name(&self) -> &str {
        "email"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        match value.as_str() {
            Some(s) if email_regex().is_match(s) => Ok(()),
            _ => Err(RuleError::new("email")),
        }
    }
}

/// Comparison applied by [`Size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOp {
    Min,
    Max,
    Exact,
}

/// `min:n`, `max:n` and `size:n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Size {
    op: SizeOp,
    bound: Bound,
    numeric: bool,
}

impl Size {
    /// Create a size rule. `numeric` makes numeric strings measure by value.
    pub fn new(op: SizeOp, bound: impl Into<Bound>, numeric: bool) -> Self {
        Self {
            op,
            bound: bound.into(),
            numeric,
        }
    }
}

impl Rule for Size {
    fn name(&self) -> &str {
        match self.op {
            SizeOp::Min => "min",
            SizeOp::Max => "max",
            SizeOp::Exact => "size",
        }
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        let measure = Measure::of(value, self.numeric);
        let size = measure.size();
        let passed = match self.op {
            SizeOp::Min => size >= self.bound.value,
            SizeOp::Max => size <= self.bound.value,
            SizeOp::Exact => size == self.bound.value,
        };

        if passed {
            Ok(())
        } else {
            let name = self.name();
            Err(RuleError::new(name)
                .with_variant(measure.variant())
                .param(name, self.bound.param()))
        }
    }
}

/// `between:min,max`, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    min: Bound,
    max: Bound,
    numeric: bool,
}

impl Between {
    /// Create a between rule.
    pub fn new(min: impl Into<Bound>, max: impl Into<Bound>, numeric: bool) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
            numeric,
        }
    }
}

impl Rule for Between {
    fn name(&self) -> &str {
        "between"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        let measure = Measure::of(value, self.numeric);
        let size = measure.size();
        if size >= self.min.value && size <= self.max.value {
            Ok(())
        } else {
            Err(RuleError::new("between")
                .with_variant(measure.variant())
                .param("min", self.min.param())
                .param("max", self.max.param()))
        }
    }
}

/// Type and character-class checks that take no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    /// `numeric`: a number or a numeric string
    Numeric,
    /// `integer`: an integral number or integer string
    Integer,
    /// `string`
    String,
    /// `boolean`: `true`, `false`, `0`, `1`, `"0"`, `"1"`
    Boolean,
    /// `array`: an array or object
    Array,
    /// `alpha`: letters only
    Alpha,
    /// `alpha_num`: letters and digits only
    AlphaNum,
}

impl TypeCheck {
    fn passes(&self, value: &Value) -> bool {
        match self {
            TypeCheck::Numeric => match value {
                Value::Number(_) => true,
                Value::String(s) => parse_number(s).is_some(),
                _ => false,
            },
            TypeCheck::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            TypeCheck::String => value.is_string(),
            TypeCheck::Boolean => match value {
                Value::Bool(_) => true,
                Value::Number(n) => n.as_i64().is_some_and(|n| n == 0 || n == 1),
                Value::String(s) => matches!(s.as_str(), "0" | "1"),
                _ => false,
            },
            TypeCheck::Array => value.is_array() || value.is_object(),
            TypeCheck::Alpha => value
                .as_str()
                .is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphabetic)),
            TypeCheck::AlphaNum => value
                .as_str()
                .is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphanumeric)),
        }
    }
}

impl Rule for TypeCheck {
    fn name(&self) -> &str {
        match self {
            TypeCheck::Numeric => "numeric",
            TypeCheck::Integer => "integer",
            TypeCheck::String => "string",
            TypeCheck::Boolean => "boolean",
            TypeCheck::Array => "array",
            TypeCheck::Alpha => "alpha",
            TypeCheck::AlphaNum => "alpha_num",
        }
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(RuleError::new(self.name()))
        }
    }
}

/// `regex:pattern`, compiled when the rule set is compiled.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern. Surrounding `/` delimiters are stripped.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = pattern
            .strip_prefix('/')
            .and_then(|p| p.strip_suffix('/'))
            .unwrap_or(pattern);
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|source| ConfigError::InvalidPattern {
                rule: "regex".to_string(),
                source,
            })
    }
}

impl Rule for Pattern {
    fn name(&self) -> &str {
        "regex"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(RuleError::new("regex")),
        };
        if self.regex.is_match(&text) {
            Ok(())
        } else {
            Err(RuleError::new("regex").param("pattern", self.regex.as_str()))
        }
    }
}

/// `same:other`: equal to another field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Same {
    other: String,
}

impl Same {
    /// Create a same rule.
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }
}

impl Rule for Same {
    fn name(&self) -> &str {
        "same"
    }

    fn validate(&self, _: &str, value: &Value, ctx: &ValidationContext<'_>) -> Result<(), RuleError> {
        if ctx.get(&self.other) == Some(value) {
            Ok(())
        } else {
            Err(RuleError::new("same").param("other", &self.other))
        }
    }
}

/// `different:other`: not equal to another field, when that field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Different {
    other: String,
}

impl Different {
    /// Create a different rule.
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }
}

impl Rule for Different {
    fn name(&self) -> &str {
        "different"
    }

    fn validate(&self, _: &str, value: &Value, ctx: &ValidationContext<'_>) -> Result<(), RuleError> {
        if ctx.get(&self.other) == Some(value) {
            Err(RuleError::new("different").param("other", &self.other))
        } else {
            Ok(())
        }
    }
}

/// `confirmed`: equal to the `<field>_confirmation` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

impl Rule for Confirmed {
    fn name(&self) -> &str {
        "confirmed"
    }

    fn validate(&self, attribute: &str, value: &Value, ctx: &ValidationContext<'_>) -> Result<(), RuleError> {
        let confirmation = format!("{}_confirmation", attribute);
        if ctx.get(&confirmation) == Some(value) {
            Ok(())
        } else {
            Err(RuleError::new("confirmed"))
        }
    }
}
