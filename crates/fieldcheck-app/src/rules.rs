//! Application validation rules.

use fieldcheck_validate::{Rule, RuleError, RuleRegistry, ValidationContext};
use serde_json::Value;

/// The value must be written in upper case.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercase;

impl Rule for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn validate(&self, _: &str, value: &Value, _: &ValidationContext<'_>) -> Result<(), RuleError> {
        match value.as_str() {
            Some(s) if s.to_uppercase() == s => Ok(()),
            _ => Err(RuleError::new("uppercase").with_message("The :attribute must be UPPERCASE")),
        }
    }
}

/// The password must differ from the username of the same submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationRule;

impl Rule for RegistrationRule {
    fn name(&self) -> &str {
        "registration"
    }

    fn validate(&self, _: &str, value: &Value, ctx: &ValidationContext<'_>) -> Result<(), RuleError> {
        if ctx.get("username") == Some(value) {
            Err(RuleError::new("registration")
                .with_message("password tidak boleh sama dengan username"))
        } else {
            Ok(())
        }
    }
}

/// Registry with the application rules available by name.
pub fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry
        .extend_rule("uppercase", Uppercase)
        .extend_rule("registration", RegistrationRule);
    registry
}
