use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use yamdb_api::config::ApiConfig;
use yamdb_api::domain::confirmation::ConfirmationCodes;
use yamdb_api::infra::mail::AppMailer;
use yamdb_api::router::build_router;
use yamdb_api::state::AppState;
use yamdb_auth_types::identity::TokenSecret;
use yamdb_core::config::Config;
use yamdb_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format);

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let codes = ConfirmationCodes::new(&config.secret_key, config.confirmation_code_ttl_secs)
        .map_err(|e| anyhow::anyhow!("invalid SECRET_KEY: {e}"))?;
    let mailer = AppMailer::from_config(config.mail_relay_url.as_deref(), &config.mail_from);
    if matches!(mailer, AppMailer::Log(_)) {
        info!("MAIL_RELAY_URL unset; confirmation codes are written to the log");
    }

    let state = AppState {
        db,
        token_secret: TokenSecret::new(config.secret_key.as_str()),
        codes,
        access_token_ttl_secs: config.access_token_ttl_secs,
        mailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
