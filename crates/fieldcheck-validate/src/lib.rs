//! # fieldcheck validation
//!
//! Rule-based validation of nested JSON input. Rules are declared per field
//! path, either as pipe-delimited strings (`"required|email|max:100"`) or as
//! lists mixing rule names, rule objects and closures. Paths are dotted
//! (`name.first`) and may contain `*` to address every element of an array
//! (`address.*.city`).
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck_validate::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::make(
//!     json!({"username": "admin@mail.com", "password": "rahasia"}),
//!     [
//!         ("username", RuleSet::from("required|email|max:100")),
//!         ("password", RuleSet::new().rule("required").rule(Password::min(6).letters())),
//!     ],
//! )
//! .unwrap();
//!
//! assert!(validator.passes());
//! ```
//!
//! ## Validation Rules
//!
//! - `required` - Value is present and not blank
//! - `min:n`, `max:n`, `between:a,b`, `size:n` - Size by type (value, characters, items)
//! - `email` - Email format
//! - `in:a,b`, `not_in:a,b` - Membership in a fixed list
//! - `numeric`, `integer`, `string`, `boolean`, `array` - Type checks
//! - `alpha`, `alpha_num` - Character classes
//! - `regex:pattern` - Pattern match
//! - `same:field`, `different:field`, `confirmed` - Comparison with another field
//! - `password:min,letters,mixed,numbers,symbols` - Password strength
//! - `bail`, `nullable`, `sometimes` - Evaluation markers
//!
//! ## Error Format
//!
//! The error report serializes as a mapping from concrete field path to
//! messages, in the order the failures were found:
//!
//! ```json
//! {
//!   "username": ["The username field is required."],
//!   "address.1.city": ["The address.1.city field is required."]
//! }
//! ```

mod context;
mod error;
mod messages;
mod path;
mod registry;
mod report;
mod rules;
mod validator;

#[cfg(test)]
mod properties;

pub use context::ValidationContext;
pub use error::{
    BoxError, ConfigError, HookError, Result, RuleError, ValidateError, ValidationFailure,
};
pub use messages::{
    display_attribute, interpolate, DefaultCatalog, MapCatalog, MessageCatalog, FALLBACK_KEY,
};
pub use path::{lookup, FieldPath, Resolved, Segment, Step};
pub use registry::{RuleFactory, RuleRegistry};
pub use report::{ErrorReport, HookErrors};
pub use rules::*;
pub use validator::{Hook, Validator};

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::{ConfigError, RuleError, ValidateError, ValidationFailure};
    pub use crate::report::{ErrorReport, HookErrors};
    pub use crate::rules::{Fail, In, NotIn, Password, Rule, RuleSet, RuleSpec};
    pub use crate::validator::Validator;
    pub use crate::{RuleRegistry, ValidationContext};
}
