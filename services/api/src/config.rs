use serde::Deserialize;

use yamdb_core::config::Config;
use yamdb_core::tracing::LogFormat;

/// API service configuration loaded from environment variables
/// (`DATABASE_URL`, `SECRET_KEY`, `API_PORT`, ...).
#[derive(Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Signs access tokens and keys confirmation codes.
    pub secret_key: String,
    /// TCP port to listen on (default 8000).
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_confirmation_code_ttl_secs")]
    pub confirmation_code_ttl_secs: u64,
    /// HTTP mail relay. Unset means codes are written to the log.
    #[serde(default)]
    pub mail_relay_url: Option<String>,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config for ApiConfig {}

fn default_api_port() -> u16 {
    8000
}

fn default_access_token_ttl_secs() -> u64 {
    4 * 60 * 60
}

fn default_confirmation_code_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_mail_from() -> String {
    "noreply@yamdb.local".to_owned()
}
