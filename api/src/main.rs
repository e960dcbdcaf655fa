//! LeadForm API server

use anyhow::Context;
use leadform_api::{build_router, ApiConfig, ApiState};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let state = ApiState::from_config(&config).context("invalid storage connection")?;
    if !state.generation_enabled {
        tracing::warn!("LEADFORM_STORAGE_ENDPOINT not set, document generation is disabled");
    }
    match &config.forms_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "saved forms stored on disk"),
        None => tracing::info!("saved forms kept in memory"),
    }

    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("LeadForm API listening on {}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
