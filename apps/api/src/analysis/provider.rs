//! Analysis Provider: asks the LLM for a ten-parameter analysis.
//!
//! Any failure of the remote call degrades to `generate_mock_analysis`; callers
//! always receive a complete `Analysis` with its provenance set.

use tracing::{info, warn};

use crate::analysis::fallback::generate_mock_analysis;
use crate::analysis::prompts::build_analysis_prompt;
use crate::llm_client::{complete_json, CompletionOptions, LlmError, TextGeneration};
use crate::models::analysis::Analysis;
use crate::models::provenance::{FallbackReason, Provenance};
use crate::resilience::remote_or_fallback;

/// Analyzes `resume_text` against `jd_text`. The result is unscored; run it
/// through `ScoringEngine::apply_weights` before display.
pub async fn analyze(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    resume_text: &str,
    jd_text: &str,
) -> Analysis {
    if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
        warn!("Analysis requested with empty resume or job description");
        return generate_mock_analysis(resume_text, jd_text, FallbackReason::MissingInput);
    }

    remote_or_fallback(
        "analysis",
        request_analysis(llm, options, resume_text, jd_text),
        |reason| generate_mock_analysis(resume_text, jd_text, reason),
    )
    .await
}

async fn request_analysis(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    resume_text: &str,
    jd_text: &str,
) -> Result<Analysis, LlmError> {
    let prompt = build_analysis_prompt(resume_text, jd_text);
    let mut analysis: Analysis = complete_json(llm, &prompt, options).await?;

    // Provenance is ours to set, whatever the model echoed back.
    analysis.provenance = Provenance::Llm;
    analysis.overall_score = 0.0;
    analysis.recommendation = None;

    info!(model = %options.model, "LLM analysis received");
    Ok(analysis)
}
