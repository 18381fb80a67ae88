use fieldcheck_app::login::{login, login_with};
use fieldcheck_app::AppConfig;
use http::StatusCode;
use serde_json::{json, Value};

#[test]
fn login_success() {
    let response = login(&json!({"username": "admin", "password": "rahasia"}));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), "OK");
}

#[test]
fn login_failed_with_empty_fields() {
    let response = login(&json!({"username": "", "password": ""}));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_str(response.body()).unwrap();
    assert_eq!(
        body,
        json!({
            "username": ["The username field is required."],
            "password": ["The password field is required."]
        })
    );
}

#[test]
fn login_failed_keeps_field_order() {
    let response = login(&json!({}));
    assert_eq!(
        response.body(),
        r#"{"username":["The username field is required."],"password":["The password field is required."]}"#
    );
}

#[test]
fn login_uses_configured_locale() {
    let config = AppConfig {
        locale: "id".to_string(),
        ..AppConfig::default()
    };
    let response = login_with(&config, &json!({"username": "admin"}));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_str(response.body()).unwrap();
    assert_eq!(body, json!({"password": ["password wajib diisi."]}));
}
