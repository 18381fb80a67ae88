//! The validation engine.

use crate::context::ValidationContext;
use crate::error::{BoxError, ConfigError, HookError, RuleError, ValidateError, ValidationFailure};
use crate::messages::{self, DefaultCatalog, MessageCatalog, FALLBACK_KEY};
use crate::path::{pattern_matches, FieldPath, Resolved, Step};
use crate::registry::{CompiledRules, RuleRegistry};
use crate::report::{ErrorReport, HookErrors};
use crate::rules::{CompiledRule, RuleSet};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Post-validation hook. Receives the input and an append-only view of the
/// report.
pub type Hook = dyn Fn(&Value, &mut HookErrors<'_>) -> Result<(), BoxError> + Send + Sync;

const DEFAULT_LOCALE: &str = "en";
const GENERIC_MESSAGE: &str = "The :attribute field is invalid.";

static NULL: Value = Value::Null;

struct Field {
    path: FieldPath,
    rules: CompiledRules,
}

#[derive(Debug, Clone)]
struct Outcome {
    report: ErrorReport,
    // concrete path -> names of the rules that failed there
    failed: ErrorReport,
    hook_error: Option<HookError>,
}

/// Validates one input against an ordered set of field rules.
///
/// Rules are compiled by [`make`](Self::make); the input is inspected on the
/// first call to [`passes`](Self::passes), [`fails`](Self::fails),
/// [`errors`](Self::errors) or [`validate`](Self::validate). The outcome of
/// that run is kept, so later calls never re-evaluate rules or hooks.
///
/// ## Example
///
/// ```rust
/// use fieldcheck_validate::Validator;
/// use serde_json::json;
///
/// let validator = Validator::make(
///     json!({"username": "", "password": ""}),
///     [("username", "required"), ("password", "required")],
/// )
/// .unwrap();
///
/// assert!(validator.fails());
/// assert_eq!(
///     validator.errors().first("username"),
///     Some("The username field is required.")
/// );
/// ```
pub struct Validator {
    data: Value,
    fields: Vec<Field>,
    messages: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    locale: String,
    fallback_locale: String,
    catalog: Arc<dyn MessageCatalog>,
    hooks: Vec<Arc<Hook>>,
    stop_on_first_failure: bool,
    outcome: OnceLock<Outcome>,
}

impl Validator {
    /// Create a validator using the built-in rules.
    ///
    /// Fails when a rule name is unknown, a rule argument is missing or
    /// invalid, or a field path is malformed.
    pub fn make<I, K, R>(data: Value, rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<RuleSet>,
    {
        Self::with_registry(&RuleRegistry::default(), data, rules)
    }

    /// Create a validator resolving rule names through `registry`.
    pub fn with_registry<I, K, R>(
        registry: &RuleRegistry,
        data: Value,
        rules: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<RuleSet>,
    {
        let fields = rules
            .into_iter()
            .map(|(path, set)| {
                Ok(Field {
                    path: FieldPath::parse(path.as_ref())?,
                    rules: registry.compile(&set.into())?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            data,
            fields,
            messages: Vec::new(),
            attributes: Vec::new(),
            locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
            catalog: Arc::new(DefaultCatalog),
            hooks: Vec::new(),
            stop_on_first_failure: false,
            outcome: OnceLock::new(),
        })
    }

    /// Custom message templates.
    ///
    /// Keys are `field.rule` (the field may contain `*`), or a bare rule key
    /// (`required`, `min.string`) applying to every field.
    pub fn messages<I, K, V>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.reset()
    }

    /// Custom display names for fields. Keys may contain `*`.
    pub fn attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.reset()
    }

    /// Locale used for catalog messages.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self.reset()
    }

    /// Locale consulted when a template is missing in the active locale.
    pub fn fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = locale.into();
        self.reset()
    }

    /// Replace the message catalog.
    pub fn catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalog = catalog;
        self.reset()
    }

    /// Add a hook that runs after all rules.
    ///
    /// Hooks may append to the report. An error returned by a hook is not a
    /// validation failure: it is surfaced through [`hook_error`](Self::hook_error)
    /// and [`ValidateError::Hook`].
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut HookErrors<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self.reset()
    }

    /// Stop evaluating further fields once any field has failed.
    pub fn stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self.reset()
    }

    fn reset(mut self) -> Self {
        self.outcome = OnceLock::new();
        self
    }

    /// The input under validation.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Check if the input passed every rule and every hook succeeded.
    pub fn passes(&self) -> bool {
        let outcome = self.run();
        outcome.report.is_empty() && outcome.hook_error.is_none()
    }

    /// Negation of [`passes`](Self::passes).
    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// The error report.
    pub fn errors(&self) -> &ErrorReport {
        &self.run().report
    }

    /// Names of the rules that failed, per concrete field path.
    ///
    /// Only rule failures are listed. Messages added by hooks have no rule
    /// and do not appear here.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.run().failed.all()
    }

    /// The error returned by a hook, if any.
    pub fn hook_error(&self) -> Option<&HookError> {
        self.run().hook_error.as_ref()
    }

    /// Validate and return the validated data.
    ///
    /// The validated data holds only the declared fields that are present in
    /// the input, nested the same way. Array positions that were not declared
    /// are filled with `null`.
    pub fn validate(&self) -> Result<Value, ValidateError> {
        let outcome = self.run();
        if let Some(error) = &outcome.hook_error {
            return Err(error.clone().into());
        }
        if !outcome.report.is_empty() {
            return Err(ValidationFailure::new(outcome.report.clone()).into());
        }
        Ok(self.validated())
    }

    fn run(&self) -> &Outcome {
        self.outcome.get_or_init(|| self.evaluate())
    }

    fn evaluate(&self) -> Outcome {
        let mut report = ErrorReport::new();
        let mut failed = ErrorReport::new();

        'fields: for field in &self.fields {
            for resolved in field.path.resolve(&self.data) {
                let any = self.check(field, &resolved, &mut report, &mut failed);
                if any && self.stop_on_first_failure {
                    break 'fields;
                }
            }
        }

        let mut hook_error = None;
        let mut errors = HookErrors::new(&mut report);
        for hook in &self.hooks {
            if let Err(error) = hook(&self.data, &mut errors) {
                hook_error = Some(HookError::new(error));
                break;
            }
        }

        Outcome { report, failed, hook_error }
    }

    /// Run the rules of one field at one concrete location. Returns whether
    /// anything failed.
    fn check(
        &self,
        field: &Field,
        resolved: &Resolved<'_>,
        report: &mut ErrorReport,
        failed_rules: &mut ErrorReport,
    ) -> bool {
        let rules = &field.rules;
        if rules.sometimes && resolved.value.is_none() {
            return false;
        }

        let value = resolved.value.unwrap_or(&NULL);
        let present = match resolved.value {
            None => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        let ctx = ValidationContext::new(&self.data, &resolved.path, &field.path, &self.locale);

        let mut failed = false;
        for rule in &rules.rules {
            if !rule.implicit() && (!present || (rules.nullable && value.is_null())) {
                continue;
            }

            let evaluation = rule.evaluate(&resolved.path, value, &ctx);
            if evaluation.errors.is_empty() {
                continue;
            }

            failed = true;
            failed_rules.add(resolved.path.clone(), rule.name());
            for error in &evaluation.errors {
                let message = self.message(error, rule, &resolved.path, value);
                report.add(resolved.path.clone(), message);
            }
            if rule.implicit() || evaluation.bail || rules.bail {
                break;
            }
        }
        failed
    }

    fn message(&self, error: &RuleError, rule: &CompiledRule, concrete: &str, value: &Value) -> String {
        let template = self.template(error, rule, concrete);
        let attribute = self.attribute_name(concrete);

        let mut params = error.params.clone();
        let other = params
            .get("other")
            .and_then(Value::as_str)
            .map(|other| self.attribute_name(other));
        if let Some(other) = other {
            params.insert("other".to_string(), Value::String(other));
        }
        params
            .entry("input".to_string())
            .or_insert_with(|| Value::String(messages::render_value(value)));

        messages::interpolate(&template, &attribute, &params)
    }

    fn template(&self, error: &RuleError, rule: &CompiledRule, concrete: &str) -> String {
        let key = error.key();
        let mut keys = vec![key.as_str()];
        for extra in [error.code.as_str(), rule.name()] {
            if !keys.contains(&extra) {
                keys.push(extra);
            }
        }

        // `field.rule` overrides, the field written exactly or as a pattern
        for &key in &keys {
            let found = self.messages.iter().find(|(name, _)| {
                name.strip_suffix(key)
                    .and_then(|prefix| prefix.strip_suffix('.'))
                    .is_some_and(|field| pattern_matches(field, concrete))
            });
            if let Some((_, template)) = found {
                return template.clone();
            }
        }

        if let Some(message) = &error.message {
            return message.clone();
        }

        for &key in &keys {
            if let Some((_, template)) = self.messages.iter().find(|(name, _)| name == key) {
                return template.clone();
            }
        }

        let locales = [self.locale.as_str(), self.fallback_locale.as_str()];
        for locale in locales {
            for &key in &keys {
                if let Some(template) = self.catalog.lookup(locale, key) {
                    return template.into_owned();
                }
            }
        }
        for locale in locales {
            if let Some(template) = self.catalog.lookup(locale, FALLBACK_KEY) {
                return template.into_owned();
            }
        }
        GENERIC_MESSAGE.to_string()
    }

    /// Display name of a concrete path: a custom name declared exactly or as
    /// a pattern, else the path itself.
    fn attribute_name(&self, concrete: &str) -> String {
        self.attributes
            .iter()
            .find(|(name, _)| name == concrete)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(name, _)| pattern_matches(name, concrete))
            })
            .map(|(_, display)| display.clone())
            .unwrap_or_else(|| messages::display_attribute(concrete))
    }

    /// Project the input onto the declared fields present in it.
    fn validated(&self) -> Value {
        let mut out = Value::Object(Map::new());
        for field in &self.fields {
            for resolved in field.path.resolve(&self.data) {
                if let Some(value) = resolved.value {
                    insert(&mut out, &resolved.steps, value);
                }
            }
        }
        out
    }
}

fn insert(target: &mut Value, steps: &[Step], value: &Value) {
    let Some((step, rest)) = steps.split_first() else {
        *target = value.clone();
        return;
    };

    match step {
        Step::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                insert(slot, rest, value);
            }
        }
        Step::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                insert(&mut items[*index], rest, value);
            }
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field(
                "fields",
                &self.fields.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(),
            )
            .field("locale", &self.locale)
            .field("fallback_locale", &self.fallback_locale)
            .field("hooks", &self.hooks.len())
            .field("stop_on_first_failure", &self.stop_on_first_failure)
            .field("settled", &self.outcome.get().is_some())
            .finish()
    }
}
