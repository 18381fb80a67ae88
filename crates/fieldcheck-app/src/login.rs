//! Login form handler.

use crate::config::AppConfig;
use crate::error::Result;
use fieldcheck_validate::{ValidateError, Validator};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use serde_json::Value;
use tracing::{error, info};

const LOGIN_RULES: [(&str, &str); 2] = [("username", "required"), ("password", "required")];

/// Validate a login submission with the default configuration.
///
/// Responds `200 OK` with body `OK` when `username` and `password` are both
/// filled in, or `400 Bad Request` with the error report as JSON.
pub fn login(input: &Value) -> Response<String> {
    login_with(&AppConfig::default(), input)
}

/// Build a validator for a form submission with the configured locales.
pub fn form_validator(config: &AppConfig, input: &Value, rules: &[(&str, &str)]) -> Result<Validator> {
    let validator = Validator::make(input.clone(), rules.iter().copied())?
        .locale(config.locale.as_str())
        .fallback_locale(config.fallback_locale.as_str());
    Ok(validator)
}

/// Validate a login submission using the configured locales.
pub fn login_with(config: &AppConfig, input: &Value) -> Response<String> {
    let validator = match form_validator(config, input, &LOGIN_RULES) {
        Ok(validator) => validator,
        Err(e) => {
            error!(error = %e, "login rules rejected");
            return respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain; charset=utf-8", e.to_string());
        }
    };

    match validator.validate() {
        Ok(_) => {
            info!("login accepted");
            respond(StatusCode::OK, "text/plain; charset=utf-8", "OK".to_string())
        }
        Err(ValidateError::Failed(failure)) => {
            let errors = failure.into_errors();
            info!(fields = ?errors.keys().collect::<Vec<_>>(), "login rejected");
            let body = serde_json::to_string(&errors).unwrap_or_else(|_| "{}".to_string());
            respond(StatusCode::BAD_REQUEST, "application/json", body)
        }
        Err(e) => {
            error!(error = %e, "login validation aborted");
            respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain; charset=utf-8", e.to_string())
        }
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
