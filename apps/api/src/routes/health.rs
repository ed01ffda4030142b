use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and whether the LLM provider is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let llm_configured = !state.config.openai_api_key.is_empty();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumatch-api",
        "llm_configured": llm_configured,
        "persistence": state.config.database_url.is_some(),
    }))
}
