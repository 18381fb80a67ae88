//! Reads a login submission as JSON from stdin and prints the response.

use fieldcheck_app::config::{load_dotenv, AppConfig};
use fieldcheck_app::login::login_with;
use fieldcheck_app::Result;
use std::io::Read;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    load_dotenv();
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(locale = %config.locale, "reading login submission from stdin");

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let input: serde_json::Value = serde_json::from_str(&input)?;

    let response = login_with(&config, &input);
    println!("{}", response.status());
    println!("{}", response.body());

    Ok(())
}
