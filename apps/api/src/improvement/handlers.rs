use axum::{extract::State, response::Response, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::improvement::rewrite::generate_improved_resume;
use crate::improvement::suggestions::{create_improved_resume_text, generate_suggestions};
use crate::models::analysis::Analysis;
use crate::models::suggestion::SuggestionSet;
use crate::render::resume::render_resume;
use crate::render::{file_timestamp, OutputFormat};
use crate::routes::downloads::attachment;
use crate::state::AppState;

const GUIDE_FILE_NAME: &str = "improvement_guide.txt";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    pub suggestions: Option<SuggestionSet>,
}

/// Fields are optional so a missing one is a 400 with a message rather
/// than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct ImprovedResumeRequest {
    pub resume_text: Option<String>,
    pub suggestions: Option<SuggestionSet>,
    pub analysis: Option<Analysis>,
    pub jd_text: Option<String>,
    pub format: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionSet>, AppError> {
    let analysis = req
        .analysis
        .ok_or_else(|| AppError::Validation("analysis is required".to_string()))?;

    let suggestions = generate_suggestions(
        state.llm.as_ref(),
        &state.llm_settings.suggestions,
        &analysis,
        &req.resume_text,
        &req.jd_text,
    )
    .await;
    Ok(Json(suggestions))
}

/// POST /api/v1/improvement-guide
/// Plain-text guide listing every suggestion, as a download.
pub async fn handle_improvement_guide(
    Json(req): Json<GuideRequest>,
) -> Result<Response, AppError> {
    let suggestions = req
        .suggestions
        .ok_or_else(|| AppError::Validation("suggestions are required".to_string()))?;

    let guide = create_improved_resume_text(&suggestions);
    Ok(attachment(
        GUIDE_FILE_NAME,
        "text/plain; charset=utf-8",
        guide.into_bytes(),
    ))
}

/// POST /api/v1/resumes/improved
/// Rewrites the resume with the given suggestions and returns it as DOCX
/// (default) or PDF.
pub async fn handle_improved_resume(
    State(state): State<AppState>,
    Json(req): Json<ImprovedResumeRequest>,
) -> Result<Response, AppError> {
    let resume_text = required_text(req.resume_text, "resume_text")?;
    let jd_text = required_text(req.jd_text, "jd_text")?;
    let suggestions = req
        .suggestions
        .ok_or_else(|| AppError::Validation("suggestions are required".to_string()))?;
    let format = match req.format.as_deref() {
        None => OutputFormat::Docx,
        Some(raw) => raw.parse::<OutputFormat>().map_err(AppError::Validation)?,
    };

    let document = generate_improved_resume(
        state.llm.as_ref(),
        &state.llm_settings.rewrite,
        &resume_text,
        &suggestions,
        req.analysis.as_ref(),
        &jd_text,
    )
    .await;

    let bytes = tokio::task::spawn_blocking(move || render_resume(&document, format))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?
        .map_err(|e| AppError::Render(format!("{e:#}")))?;

    let file_name = format!("improved_resume_{}.{}", file_timestamp(), format.extension());
    info!(file = %file_name, bytes = bytes.len(), "Improved resume rendered");
    Ok(attachment(&file_name, format.content_type(), bytes))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} cannot be empty")))
}
