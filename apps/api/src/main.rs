mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod improvement;
mod llm_client;
mod models;
mod render;
mod resilience;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scoring::ScoringEngine;
use crate::config::Config;
use crate::db::{create_pool, AnalysisStore, DisabledStore, PgAnalysisStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed values (PORT, LLM_TIMEOUT_SECS) fail here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Weight table is validated before anything is served
    let scoring = ScoringEngine::new(config.weight_table()?);
    info!("Scoring weights loaded (total {})", scoring.weights().total());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_timeout,
    )?;
    if llm.is_configured() {
        info!(
            "LLM client initialized (analysis: {}, suggestions: {})",
            config.analysis_model, config.suggestion_model
        );
    } else {
        warn!("OPENAI_API_KEY not set, every stage will use its local fallback");
    }

    // Initialize PostgreSQL, if configured
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => Arc::new(PgAnalysisStore::connect(create_pool(url).await?).await?),
        None => {
            info!("DATABASE_URL not set, analyses will not be persisted");
            Arc::new(DisabledStore)
        }
    };

    std::fs::create_dir_all(&config.downloads_dir)?;

    // Build app state
    let state = AppState::new(config.clone(), Arc::new(llm), store, scoring);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
