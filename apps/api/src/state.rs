use std::sync::Arc;

use crate::analysis::scoring::ScoringEngine;
use crate::config::{Config, LlmSettings};
use crate::db::AnalysisStore;
use crate::llm_client::TextGeneration;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `LlmClient` in production; an unconfigured client makes every stage fall back.
    pub llm: Arc<dyn TextGeneration>,
    /// `PgAnalysisStore`, or `DisabledStore` when DATABASE_URL is unset.
    pub store: Arc<dyn AnalysisStore>,
    pub scoring: ScoringEngine,
    pub llm_settings: LlmSettings,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        llm: Arc<dyn TextGeneration>,
        store: Arc<dyn AnalysisStore>,
        scoring: ScoringEngine,
    ) -> Self {
        Self {
            llm,
            store,
            scoring,
            llm_settings: config.llm_settings(),
            config,
        }
    }
}
