use anyhow::Context;
use tracing_subscriber::EnvFilter;

use npi_catalog_api::auth::TokenSettings;
use npi_catalog_api::{app, config, store, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_USER, DB_PASS, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting NP International API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if config.is_production() {
            anyhow::bail!("ACCESS_TOKEN_SECRET must be set in production");
        }
        tracing::warn!("ACCESS_TOKEN_SECRET is not set; token issuance and admin routes will fail");
    }

    let store = store::connect(&config.database)
        .await
        .context("failed to connect to the document store")?;

    let state = AppState::new(
        store,
        TokenSettings::new(config.security.jwt_secret.clone(), config.security.jwt_expiry_days),
    );
    let app = app(state, &config.security.cors_origins);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("NP International API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
