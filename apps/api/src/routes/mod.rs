pub mod downloads;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::improvement::handlers as improvement;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/api/v1/compare", post(analysis::handle_compare))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        // Improvement
        .route("/api/v1/suggestions", post(improvement::handle_suggestions))
        .route(
            "/api/v1/improvement-guide",
            post(improvement::handle_improvement_guide),
        )
        .route(
            "/api/v1/resumes/improved",
            post(improvement::handle_improved_resume),
        )
        // Files
        .route(
            "/api/v1/downloads/:filename",
            get(downloads::handle_download),
        )
        .route("/templates/resume", get(downloads::handle_resume_template))
        .route(
            "/templates/job-description",
            get(downloads::handle_job_description_template),
        )
        .with_state(state)
}
