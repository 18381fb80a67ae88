//! End-to-end validation scenarios.

use fieldcheck_validate::prelude::*;
use fieldcheck_validate::MapCatalog;
use serde_json::{json, Value};
use std::sync::Arc;

fn login_rules() -> [(&'static str, RuleSet); 2] {
    [
        ("username", RuleSet::from("required|email|max:100")),
        (
            "password",
            RuleSet::from(vec![
                RuleSpec::from("required"),
                RuleSpec::from("min:6"),
                RuleSpec::from("max:20"),
            ]),
        ),
    ]
}

#[test]
fn valid_credentials_pass() {
    let validator = Validator::make(
        json!({"username": "admin", "password": "123456"}),
        [("username", "required"), ("password", "required")],
    )
    .unwrap();

    assert!(validator.passes());
    assert!(!validator.fails());
}

#[test]
fn empty_credentials_fail() {
    let validator = Validator::make(
        json!({"username": "", "password": ""}),
        [("username", "required"), ("password", "required")],
    )
    .unwrap();

    assert!(!validator.passes());
    assert!(validator.fails());
    assert_eq!(
        validator.errors().to_structured(),
        json!({
            "username": ["The username field is required."],
            "password": ["The password field is required."]
        })
    );
}

#[test]
fn validate_raises_failure_with_report() {
    let validator = Validator::make(
        json!({"username": "", "password": ""}),
        [("username", "required"), ("password", "required")],
    )
    .unwrap();

    match validator.validate() {
        Err(ValidateError::Failed(failure)) => {
            assert_eq!(failure.errors().len(), 2);
            assert!(failure.errors().has("password"));
        }
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

#[test]
fn multiple_rules_in_indonesian() {
    let validator = Validator::make(json!({"username": "admin", "password": "admin"}), login_rules())
        .unwrap()
        .locale("id");

    assert!(validator.fails());
    assert_eq!(
        validator.errors().get("username"),
        ["username harus berupa alamat surel yang valid."]
    );
    assert_eq!(
        validator.errors().get("password"),
        ["password minimal berisi 6 karakter."]
    );
}

#[test]
fn valid_data_is_allow_listed() {
    let validator = Validator::make(
        json!({
            "username": "admin@mail.com",
            "password": "rahasia",
            "admin": true,
            "other": "xxx"
        }),
        login_rules(),
    )
    .unwrap();

    let valid = validator.validate().unwrap();
    assert_eq!(valid, json!({"username": "admin@mail.com", "password": "rahasia"}));
}

#[test]
fn inline_messages() {
    let validator = Validator::make(json!({"username": "admin", "password": "admin"}), login_rules())
        .unwrap()
        .messages([
            ("required", ":attribute tidak boleh kosong"),
            ("email", ":attribute tidak valid"),
            ("min", ":attribute minimal :min karakter"),
            ("max", ":attribute maksimal :max karakter"),
        ]);

    assert_eq!(
        validator.errors().to_structured(),
        json!({
            "username": ["username tidak valid"],
            "password": ["password minimal 6 karakter"]
        })
    );
}

#[test]
fn after_hook_adds_messages() {
    let validator = Validator::make(
        json!({"username": "admin@mail.com", "password": "admin@mail.com"}),
        login_rules(),
    )
    .unwrap()
    .locale("id")
    .after(|data, errors| {
        if data["username"] == data["password"] {
            errors.add("password", "password tidak boleh sama dengan username");
        }
        Ok(())
    });

    assert!(validator.fails());
    assert_eq!(
        validator.errors().get("password"),
        ["password tidak boleh sama dengan username"]
    );
}

#[test]
fn hook_errors_propagate() {
    let validator = Validator::make(json!({"username": "admin"}), [("username", "required")])
        .unwrap()
        .after(|_, _| Err(std::io::Error::new(std::io::ErrorKind::Other, "directory offline").into()));

    assert!(validator.fails());
    let err = validator.validate().unwrap_err();
    assert!(err.errors().is_none());
    assert_eq!(err.to_string(), "post-validation hook failed: directory offline");
}

#[derive(Debug)]
struct Uppercase;

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

#[test]
fn custom_rule_object() {
    let validator = Validator::make(
        json!({"username": "admin@mail.com"}),
        [("username", RuleSet::from("required|email|max:100").object(Uppercase))],
    )
    .unwrap();

    assert_eq!(
        validator.errors().get("username"),
        ["The username must be UPPERCASE"]
    );
}

#[test]
fn custom_rule_by_name() {
    let mut registry = RuleRegistry::new();
    registry.extend_rule("uppercase", Uppercase);

    let validator = Validator::with_registry(
        &registry,
        json!({"username": "ADMIN@MAIL.COM", "nickname": "ahzi"}),
        [("username", "required|email|uppercase"), ("nickname", "uppercase")],
    )
    .unwrap();

    assert!(!validator.errors().has("username"));
    assert!(validator.errors().has("nickname"));
}

#[test]
fn closure_rule() {
    let username = RuleSet::from("required|email|max:100").closure(|_, value, fail| {
        if let Some(s) = value.as_str() {
            if s.to_uppercase() != s {
                fail.fail(":attribute must be UPPERCASE");
            }
        }
    });

    let validator = Validator::make(json!({"username": "admin@mail.com"}), [("username", username)])
        .unwrap()
        .locale("id");

    assert_eq!(
        validator.errors().get("username"),
        ["username must be UPPERCASE"]
    );
}

#[test]
fn rule_objects_in_and_password() {
    let rules = [
        (
            "username",
            RuleSet::new().rule("required").rule(In::new(["Ahzi", "Budi", "Joko"])),
        ),
        (
            "password",
            RuleSet::new()
                .rule("required")
                .rule(Password::min(6).letters().numbers().symbols()),
        ),
    ];

    let validator = Validator::make(
        json!({"username": "Ahzi", "password": "admin123@mail.com"}),
        rules.clone(),
    )
    .unwrap()
    .locale("id");
    assert!(validator.passes());

    let validator = Validator::make(json!({"username": "Andi", "password": "admin123"}), rules)
        .unwrap()
        .locale("id");
    assert_eq!(
        validator.errors().to_structured(),
        json!({
            "username": ["username yang dipilih tidak valid."],
            "password": ["password harus mengandung setidaknya satu simbol."]
        })
    );
}

#[test]
fn nested_paths() {
    let validator = Validator::make(
        json!({
            "name": {"first": "Ahmad", "last": "Fauzi"},
            "address": {"street": "Jl. Mangga", "city": "Jakarta", "country": "Indonesia"}
        }),
        [
            ("name.first", "required|max:100"),
            ("name.last", "max:100"),
            ("address.street", "max:100"),
            ("address.city", "required|max:100"),
            ("address.country", "required|max:100"),
        ],
    )
    .unwrap();

    assert!(validator.passes());
}

#[test]
fn nested_indexed_paths() {
    let rules = [
        ("name.first", "required|max:100"),
        ("name.last", "max:100"),
        ("address.*.street", "max:100"),
        ("address.*.city", "required|max:100"),
        ("address.*.country", "required|max:100"),
    ];
    let address = json!({"street": "Jl. Mangga", "city": "Jakarta", "country": "Indonesia"});

    let validator = Validator::make(
        json!({"name": {"first": "Ahmad"}, "address": [address.clone(), address.clone()]}),
        rules,
    )
    .unwrap();
    assert!(validator.passes());

    let validator = Validator::make(
        json!({"name": {"first": "Ahmad"}, "address": [address, {"street": "Jl. Jeruk"}]}),
        rules,
    )
    .unwrap();
    assert_eq!(
        validator.errors().keys().collect::<Vec<_>>(),
        ["address.1.city", "address.1.country"]
    );
    assert!(validator.errors().has("address.*.city"));
}

#[test]
fn unknown_rule_fails_at_setup() {
    let err = Validator::make(json!({}), [("username", "required|shiny")]).unwrap_err();
    assert_eq!(err.to_string(), "unknown validation rule `shiny`");
}

#[test]
fn custom_catalog_with_fallback_locale() {
    let catalog = MapCatalog::with_defaults().insert("jv", "required", ":attribute kudu diisi.");

    let validator = Validator::make(json!({"email": "nope"}), [("username", "required"), ("email", "email")])
        .unwrap()
        .catalog(Arc::new(catalog))
        .locale("jv")
        .fallback_locale("id");

    assert_eq!(validator.errors().first("username"), Some("username kudu diisi."));
    assert_eq!(
        validator.errors().first("email"),
        Some("email harus berupa alamat surel yang valid.")
    );
}

#[test]
fn numeric_context_changes_size_semantics() {
    let validator = Validator::make(
        json!({"age": "25", "code": "25"}),
        [("age", "numeric|max:18"), ("code", "max:18")],
    )
    .unwrap();

    assert_eq!(
        validator.errors().get("age"),
        ["The age field must not be greater than 18."]
    );
    assert!(!validator.errors().has("code"));
}
