use anyhow::Context;
use tracing_subscriber::EnvFilter;

use routinely_api::auth::AuthKeys;
use routinely_api::config::{self, StoreBackend};
use routinely_api::store::PgStore;
use routinely_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Routinely API in {:?} mode", config.environment);

    anyhow::ensure!(
        !config.security.jwt_secret.is_empty(),
        "JWT_SECRET must be set outside development"
    );
    let keys = AuthKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);

    let state = match config.database.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database)
                .await
                .context("connecting to Postgres")?;
            AppState::postgres(store, keys)
        }
        StoreBackend::Memory => {
            tracing::warn!("memory store selected; data is lost on shutdown");
            AppState::in_memory(keys)
        }
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Routinely API listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server")?;

    Ok(())
}
