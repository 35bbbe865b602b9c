mod config;
mod corpus;
mod errors;
mod ingestion;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::JobCorpus;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    // Load the job corpus once; it is read-only from here on
    let corpus = JobCorpus::load(&config.jobs_csv_path)
        .with_context(|| format!("Failed to load job corpus from {}", config.jobs_csv_path))?;

    // Initialize generation backend
    let generator = OllamaClient::new(
        &config.ollama_url,
        Duration::from_secs(config.generation_timeout_secs),
    )?;
    info!(
        "Generation backend: {} (default model: {}, timeout: {}s)",
        config.ollama_url, config.default_model, config.generation_timeout_secs
    );

    let state = AppState {
        corpus: Arc::new(corpus),
        generator: Arc::new(generator),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
