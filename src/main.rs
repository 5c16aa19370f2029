use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use aurora_rag::core::config::Settings;
use aurora_rag::state::AppState;
use aurora_rag::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    logging::init(settings.log_dir.as_deref());

    let state = AppState::initialize(settings.clone()).await?;

    let bind_addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
