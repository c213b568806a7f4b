//! Server binary: reads settings from the environment, connects to PostgreSQL, serves the explorer.

use db_explorer::{app, AppState, PgBackend, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("db_explorer=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let backend = PgBackend::new(pool, settings.schema.clone());
    let state = AppState::new(Arc::new(backend), settings.pagination);
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(schema = %settings.schema, "listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
