//! Rule registry: turns rule specs into compiled rules.

use crate::error::ConfigError;
use crate::rules::{
    Between, Bound, CompiledRule, Confirmed, Different, Email, In, NotIn, Password, Pattern,
    Required, Rule, RuleSet, RuleSpec, Same, Size, SizeOp, TypeCheck,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory building a named rule from its rule-string arguments.
pub type RuleFactory = dyn Fn(&[String]) -> Result<Arc<dyn Rule>, ConfigError> + Send + Sync;

/// Compiled rules of one field, with the marker flags of its rule set.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    pub bail: bool,
    pub nullable: bool,
    pub sometimes: bool,
}

/// Resolves rule names to rules.
///
/// Built-in rules are always available. Application rules registered with
/// [`extend`](Self::extend) are looked up first, so they may shadow a built-in
/// name.
///
/// ```rust
/// use fieldcheck_validate::{RuleRegistry, Required, Rule};
/// use std::sync::Arc;
///
/// let mut registry = RuleRegistry::new();
/// registry.extend("filled", |_args| Ok(Arc::new(Required) as Arc<dyn Rule>));
/// assert!(registry.contains("filled"));
/// assert!(registry.contains("email"));
/// ```
#[derive(Clone, Default)]
pub struct RuleRegistry {
    custom: HashMap<String, Arc<RuleFactory>>,
}

const BUILTIN: &[&str] = &[
    "alpha",
    "alpha_num",
    "array",
    "bail",
    "between",
    "boolean",
    "confirmed",
    "different",
    "email",
    "in",
    "integer",
    "max",
    "min",
    "not_in",
    "nullable",
    "numeric",
    "password",
    "regex",
    "required",
    "same",
    "size",
    "sometimes",
    "string",
];

impl RuleRegistry {
    /// Create a registry with only the built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named rule.
    pub fn extend<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&[String]) -> Result<Arc<dyn Rule>, ConfigError> + Send + Sync + 'static,
    {
        self.custom.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register a rule that takes no arguments.
    pub fn extend_rule(&mut self, name: impl Into<String>, rule: impl Rule + 'static) -> &mut Self {
        let rule: Arc<dyn Rule> = Arc::new(rule);
        self.extend(name, move |_| Ok(Arc::clone(&rule)))
    }

    /// Check if a rule name is known.
    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || BUILTIN.binary_search(&name).is_ok()
    }

    /// Compile the rule set of one field.
    pub(crate) fn compile(&self, set: &RuleSet) -> Result<CompiledRules, ConfigError> {
        let numeric = set.specs().iter().any(|spec| match spec {
            RuleSpec::Named(raw) => matches!(split(raw).0, "numeric" | "integer"),
            _ => false,
        });

        let mut compiled = CompiledRules::default();
        for spec in set.specs() {
            match spec {
                RuleSpec::Named(raw) => {
                    let (name, args) = split(raw);
                    match name {
                        "bail" => compiled.bail = true,
                        "nullable" => compiled.nullable = true,
                        "sometimes" => compiled.sometimes = true,
                        _ => {
                            let rule = self.build(name, &args, numeric)?;
                            compiled.rules.push(CompiledRule::Rule(rule));
                        }
                    }
                }
                RuleSpec::Object(rule) => compiled.rules.push(CompiledRule::Rule(Arc::clone(rule))),
                RuleSpec::Closure(f) => compiled.rules.push(CompiledRule::Closure(Arc::clone(f))),
            }
        }
        Ok(compiled)
    }

    fn build(&self, name: &str, args: &[String], numeric: bool) -> Result<Arc<dyn Rule>, ConfigError> {
        if let Some(factory) = self.custom.get(name) {
            return factory(args);
        }

        let rule: Arc<dyn Rule> = match name {
            "required" => Arc::new(Required),
            "email" => Arc::new(Email),
            "min" => Arc::new(Size::new(SizeOp::Min, bound(name, args, 0)?, numeric)),
            "max" => Arc::new(Size::new(SizeOp::Max, bound(name, args, 0)?, numeric)),
            "size" => Arc::new(Size::new(SizeOp::Exact, bound(name, args, 0)?, numeric)),
            "between" => Arc::new(Between::new(
                bound(name, args, 0)?,
                bound(name, args, 1)?,
                numeric,
            )),
            "numeric" => Arc::new(TypeCheck::Numeric),
            "integer" => Arc::new(TypeCheck::Integer),
            "string" => Arc::new(TypeCheck::String),
            "boolean" => Arc::new(TypeCheck::Boolean),
            "array" => Arc::new(TypeCheck::Array),
            "alpha" => Arc::new(TypeCheck::Alpha),
            "alpha_num" => Arc::new(TypeCheck::AlphaNum),
            "in" => Arc::new(In::new(values(name, args)?)),
            "not_in" => Arc::new(NotIn::new(values(name, args)?)),
            "regex" => Arc::new(Pattern::new(arg(name, args, 0, "a pattern")?)?),
            "same" => Arc::new(Same::new(arg(name, args, 0, "a field name")?)),
            "different" => Arc::new(Different::new(arg(name, args, 0, "a field name")?)),
            "confirmed" => Arc::new(Confirmed),
            "password" => Arc::new(Password::from_args(args)?),
            _ => return Err(ConfigError::UnknownRule(name.to_string())),
        };
        Ok(rule)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("RuleRegistry").field("custom", &names).finish()
    }
}

/// Split `name:args` into the name and its arguments.
///
/// `regex` takes its whole argument verbatim since patterns may contain commas.
fn split(raw: &str) -> (&str, Vec<String>) {
    match raw.split_once(':') {
        None => (raw.trim(), Vec::new()),
        Some((name, rest)) => {
            let name = name.trim();
            let args = if name == "regex" {
                vec![rest.to_string()]
            } else {
                rest.split(',')
                    .map(|arg| arg.trim().trim_matches('"').to_string())
                    .collect()
            };
            (name, args)
        }
    }
}

fn arg<'a>(
    rule: &str,
    args: &'a [String],
    index: usize,
    expected: &'static str,
) -> Result<&'a str, ConfigError> {
    args.get(index)
        .map(String::as_str)
        .filter(|arg| !arg.is_empty())
        .ok_or_else(|| ConfigError::MissingArgument {
            rule: rule.to_string(),
            expected,
        })
}

fn bound(rule: &str, args: &[String], index: usize) -> Result<Bound, ConfigError> {
    Bound::parse(rule, arg(rule, args, index, "a numeric argument")?)
}

fn values<'a>(rule: &str, args: &'a [String]) -> Result<&'a [String], ConfigError> {
    if args.is_empty() {
        Err(ConfigError::MissingArgument {
            rule: rule.to_string(),
            expected: "a list of values",
        })
    } else {
        Ok(args)
    }
}
