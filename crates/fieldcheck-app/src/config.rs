//! Application configuration from `FIELDCHECK_*` environment variables.
//!
//! Values are read after an optional `.env` file has been loaded. Existing
//! environment variables take precedence over `.env` values.
//!
//! | variable | default |
//! |---|---|
//! | `FIELDCHECK_LOCALE` | `en` |
//! | `FIELDCHECK_FALLBACK_LOCALE` | `en` |
//! | `FIELDCHECK_LOG_LEVEL` | `info` |

use crate::error::Result;
use serde::Deserialize;

/// Prefix of every configuration variable.
pub const ENV_PREFIX: &str = "FIELDCHECK_";

fn default_locale() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for the login handler and the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Locale for validation messages
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Locale consulted when a message is missing in `locale`
    #[serde(default = "default_locale")]
    pub fallback_locale: String,
    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            fallback_locale: default_locale(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }
}

/// Load environment variables from a `.env` file, if there is one.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file, if it exists.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
