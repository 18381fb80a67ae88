//! # fieldcheck app
//!
//! The login form handler and the application rules used with
//! [`fieldcheck_validate`].
//!
//! ```rust
//! use fieldcheck_app::login::login;
//! use serde_json::json;
//!
//! let response = login(&json!({"username": "admin", "password": ""}));
//! assert_eq!(response.status(), 400);
//! ```

pub mod config;
pub mod error;
pub mod login;
pub mod rules;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use rules::{RegistrationRule, Uppercase};
