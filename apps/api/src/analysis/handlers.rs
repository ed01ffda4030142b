use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::provider::analyze;
use crate::db::{persist_in_background, AnalysisRecord};
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::improvement::suggestions::generate_suggestions;
use crate::models::analysis::{Analysis, ScoreMatrixRow};
use crate::models::suggestion::SuggestionSet;
use crate::render::report::write_report;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: Analysis,
    pub matrix: Vec<ScoreMatrixRow>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub analysis: Analysis,
    pub matrix: Vec<ScoreMatrixRow>,
    pub suggestions: SuggestionSet,
    /// Name to fetch from `GET /api/v1/downloads/:filename`.
    pub report_file: String,
    pub resume_text: String,
    pub jd_text: String,
}

struct Upload {
    file_name: String,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/compare
/// Multipart upload of `resume` and `job_description` files. Runs the whole
/// pipeline: extraction, analysis, scoring, report, suggestions.
pub async fn handle_compare(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CompareResponse>, AppError> {
    let mut resume = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some(RESUME_FIELD) => &mut resume,
            Some(JOB_DESCRIPTION_FIELD) => &mut job_description,
            _ => continue,
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        *slot = Some(Upload { file_name, data });
    }

    let resume = resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("job_description file is required".to_string()))?;

    let resume_text = extract_upload(resume).await?;
    let jd_text = extract_upload(job_description).await?;
    info!(
        resume_chars = resume_text.len(),
        jd_chars = jd_text.len(),
        "Documents extracted"
    );

    let (analysis, matrix) = analyze_and_score(&state, &resume_text, &jd_text).await;

    let report_file = {
        let dir = state.config.downloads_dir.clone();
        let analysis = analysis.clone();
        let matrix = matrix.clone();
        tokio::task::spawn_blocking(move || write_report(&dir, &analysis, &matrix))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in report: {e}")))?
            .map_err(|e| AppError::Render(format!("{e:#}")))?
    };

    let suggestions = generate_suggestions(
        state.llm.as_ref(),
        &state.llm_settings.suggestions,
        &analysis,
        &resume_text,
        &jd_text,
    )
    .await;

    persist_in_background(
        state.store.clone(),
        AnalysisRecord::new(&analysis, &matrix, &suggestions, &report_file),
    );

    Ok(Json(CompareResponse {
        analysis,
        matrix,
        suggestions,
        report_file,
        resume_text,
        jd_text,
    }))
}

/// POST /api/v1/analyze
/// Same analysis and scoring as compare, on already-extracted text.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (analysis, matrix) = analyze_and_score(&state, &req.resume_text, &req.jd_text).await;
    Ok(Json(AnalyzeResponse { analysis, matrix }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn analyze_and_score(
    state: &AppState,
    resume_text: &str,
    jd_text: &str,
) -> (Analysis, Vec<ScoreMatrixRow>) {
    let mut analysis = analyze(
        state.llm.as_ref(),
        &state.llm_settings.analysis,
        resume_text,
        jd_text,
    )
    .await;
    state.scoring.apply_weights(&mut analysis);
    let matrix = state.scoring.to_matrix(&analysis);

    info!(
        overall_score = analysis.overall_score,
        demo = analysis.provenance.is_demo(),
        "Analysis scored"
    );
    (analysis, matrix)
}

/// PDF parsing is CPU-bound; keep it off the async executor.
async fn extract_upload(upload: Upload) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&upload.file_name, &upload.data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;
    Ok(text)
}
