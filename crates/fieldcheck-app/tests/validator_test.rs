use fieldcheck_app::rules::registry;
use fieldcheck_app::{RegistrationRule, Uppercase};
use fieldcheck_validate::prelude::*;
use serde_json::json;

fn credentials() -> serde_json::Value {
    json!({"username": "admin@mail.com", "password": "admin@mail.com"})
}

#[test]
fn custom_rule_objects() {
    let validator = Validator::make(
        credentials(),
        [
            ("username", RuleSet::from("required|email|max:100").object(Uppercase)),
            ("password", RuleSet::from("required|min:6|max:20").object(RegistrationRule)),
        ],
    )
    .unwrap()
    .locale("id");

    assert!(!validator.passes());
    assert!(validator.fails());
    assert_eq!(
        validator.errors().to_structured(),
        json!({
            "username": ["The username must be UPPERCASE"],
            "password": ["password tidak boleh sama dengan username"]
        })
    );
}

#[test]
fn custom_closure_rule() {
    let username = RuleSet::from("required|email|max:100").closure(|_, value, fail| {
        if let Some(s) = value.as_str() {
            if s.to_uppercase() != s {
                fail.fail(":attribute must be UPPERCASE");
            }
        }
    });

    let validator = Validator::make(
        credentials(),
        [
            ("username", username),
            ("password", RuleSet::from("required|min:6|max:20").object(RegistrationRule)),
        ],
    )
    .unwrap()
    .locale("id");

    assert!(validator.fails());
    assert_eq!(validator.errors().first("username"), Some("username must be UPPERCASE"));
    assert!(validator.errors().has("password"));
}

#[test]
fn application_rules_by_name() {
    let validator = Validator::with_registry(
        &registry(),
        credentials(),
        [
            ("username", "required|email|uppercase"),
            ("password", "required|min:6|registration"),
        ],
    )
    .unwrap();

    assert_eq!(validator.errors().len(), 2);

    let validator = Validator::with_registry(
        &registry(),
        json!({"username": "ADMIN@MAIL.COM", "password": "rahasia"}),
        [
            ("username", "required|email|uppercase"),
            ("password", "required|min:6|registration"),
        ],
    )
    .unwrap();

    assert!(validator.passes());
}

#[test]
fn additional_validation_hook() {
    let validator = Validator::make(
        credentials(),
        [
            ("username", "required|email|max:100"),
            ("password", "required|min:6|max:20"),
        ],
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
