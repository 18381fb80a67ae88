//! Rule objects with builder-style configuration.

use super::{Rule, RuleSpec};
use crate::context::ValidationContext;
use crate::error::{ConfigError, RuleError};
use serde_json::Value;

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn contains(values: &[String], value: &Value) -> bool {
    match value {
        Value::Array(items) => items
            .iter()
            .all(|item| scalar_text(item).is_some_and(|text| values.contains(&text))),
        other => scalar_text(other).is_some_and(|text| values.contains(&text)),
    }
}

/// `in:a,b,c`: the value is one of a fixed list.
///
/// Scalars are compared by their text form. For arrays, every element must be
/// in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct In {
    values: Vec<String>,
}

impl In {
    /// Create the rule from its allowed values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The allowed values.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Rule for In {
    fn name(&self) -> &str {
        "in"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        if contains(&self.values, value) {
            Ok(())
        } else {
            Err(RuleError::new("in").param("values", &self.values))
        }
    }
}

/// `not_in:a,b,c`: the value is none of a fixed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotIn {
    values: Vec<String>,
}

impl NotIn {
    /// Create the rule from its rejected values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for NotIn {
    fn name(&self) -> &str {
        "not_in"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        let hit = match value {
            Value::Array(items) => items
                .iter()
                .any(|item| scalar_text(item).is_some_and(|text| self.values.contains(&text))),
            other => scalar_text(other).is_some_and(|text| self.values.contains(&text)),
        };
        if hit {
            Err(RuleError::new("not_in").param("values", &self.values))
        } else {
            Ok(())
        }
    }
}

/// Password strength rule.
///
/// Checks run in order: length, letters, mixed case, numbers, symbols. Only
/// the first failing check is reported.
///
/// ```rust
/// use fieldcheck_validate::Password;
///
/// let rule = Password::min(6).letters().numbers().symbols();
/// assert_eq!(rule.min_length(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password {
    min: usize,
    letters: bool,
    mixed_case: bool,
    numbers: bool,
    symbols: bool,
}

impl Password {
    /// Require at least `min` characters.
    pub fn min(min: usize) -> Self {
        Self {
            min,
            letters: false,
            mixed_case: false,
            numbers: false,
            symbols: false,
        }
    }

    /// Require at least one letter.
    pub fn letters(mut self) -> Self {
        self.letters = true;
        self
    }

    /// Require at least one upper-case and one lower-case letter.
    pub fn mixed_case(mut self) -> Self {
        self.mixed_case = true;
        self
    }

    /// Require at least one digit.
    pub fn numbers(mut self) -> Self {
        self.numbers = true;
        self
    }

    /// Require at least one symbol.
    pub fn symbols(mut self) -> Self {
        self.symbols = true;
        self
    }

    /// The minimum length.
    pub fn min_length(&self) -> usize {
        self.min
    }

    /// Build from rule-string arguments: `password:8,letters,mixed,numbers,symbols`.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let (min, flags) = match args.split_first() {
            Some((min, flags)) => (min, flags),
            None => {
                return Err(ConfigError::MissingArgument {
                    rule: "password".to_string(),
                    expected: "a minimum length",
                })
            }
        };
        let min = min
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidArgument {
                rule: "password".to_string(),
                value: min.clone(),
            })?;

        flags.iter().try_fold(Password::min(min), |rule, flag| {
            match flag.trim() {
                "letters" => Ok(rule.letters()),
                "mixed" | "mixed_case" => Ok(rule.mixed_case()),
                "numbers" => Ok(rule.numbers()),
                "symbols" => Ok(rule.symbols()),
                other => Err(ConfigError::InvalidArgument {
                    rule: "password".to_string(),
                    value: other.to_string(),
                }),
            }
        })
    }
}

impl Rule for Password {
    fn name(&self) -> &str {
        "password"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        let Some(password) = value.as_str() else {
            return Err(RuleError::new("string"));
        };

        let length = password.chars().count();
        if length < self.min {
            return Err(RuleError::new("min")
                .with_variant("string")
                .param("min", self.min));
        }

        let checks = [
            (self.letters, "letters", password.chars().any(char::is_alphabetic)),
            (
                self.mixed_case,
                "mixed",
                password.chars().any(char::is_uppercase) && password.chars().any(char::is_lowercase),
            ),
            (self.numbers, "numbers", password.chars().any(|c| c.is_ascii_digit())),
            (
                self.symbols,
                "symbols",
                password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
            ),
        ];

        match checks.iter().find(|(enabled, _, valid)| *enabled && !valid) {
            Some((_, variant, _)) => Err(RuleError::new("password").with_variant(*variant)),
            None => Ok(()),
        }
    }
}

impl From<In> for RuleSpec {
    fn from(rule: In) -> Self {
        RuleSpec::object(rule)
    }
}

impl From<NotIn> for RuleSpec {
    fn from(rule: NotIn) -> Self {
        RuleSpec::object(rule)
    }
}

impl From<Password> for RuleSpec {
    fn from(rule: Password) -> Self {
        RuleSpec::object(rule)
    }
}
