//! Resume Rewrite Assembler: merges suggestions into structured resume content.

use tracing::{debug, info};

use crate::improvement::prompts::build_rewrite_prompt;
use crate::improvement::resume_parser::parse_resume;
use crate::llm_client::{complete_json, CompletionOptions, LlmError, TextGeneration};
use crate::models::analysis::Analysis;
use crate::models::provenance::{FallbackReason, Provenance};
use crate::models::resume::ResumeDocument;
use crate::models::suggestion::{Suggestion, SuggestionSet};
use crate::resilience::remote_or_fallback;

/// Shortest normalized "before" text allowed to match by containment.
const MIN_CONTAINMENT_CHARS: usize = 20;
/// Suggestions used to seed an experience entry that has no achievements.
const SEED_ACHIEVEMENTS: usize = 2;

pub async fn generate_improved_resume(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    resume_text: &str,
    suggestions: &SuggestionSet,
    analysis: Option<&Analysis>,
    jd_text: &str,
) -> ResumeDocument {
    if resume_text.trim().is_empty() {
        return generate_template_resume(resume_text, suggestions, FallbackReason::MissingInput);
    }

    remote_or_fallback(
        "rewrite",
        request_rewrite(llm, options, resume_text, suggestions, analysis, jd_text),
        |reason| generate_template_resume(resume_text, suggestions, reason),
    )
    .await
}

async fn request_rewrite(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    resume_text: &str,
    suggestions: &SuggestionSet,
    analysis: Option<&Analysis>,
    jd_text: &str,
) -> Result<ResumeDocument, LlmError> {
    let keywords = analysis
        .map(|a| a.missing_elements.clone())
        .unwrap_or_default();
    let prompt = build_rewrite_prompt(resume_text, &suggestions.suggestions, &keywords, jd_text);

    let mut document: ResumeDocument = complete_json(llm, &prompt, options).await?;
    if document.contact.name.trim().is_empty()
        && document.summary.trim().is_empty()
        && document.experience.is_empty()
    {
        return Err(LlmError::EmptyContent);
    }

    document.provenance = Provenance::Llm;
    info!(
        experience = document.experience.len(),
        "LLM rewrite received"
    );
    Ok(document)
}

/// Parses the resume locally and applies whichever suggestions quote an
/// existing achievement.
pub fn generate_template_resume(
    resume_text: &str,
    suggestions: &SuggestionSet,
    reason: FallbackReason,
) -> ResumeDocument {
    let mut document = parse_resume(resume_text);
    let applied = apply_suggestions(&mut document, &suggestions.suggestions);
    debug!(
        applied,
        reason = reason.as_str(),
        "Built template resume"
    );
    document.provenance = Provenance::fallback(reason);
    document
}

/// Replaces achievements matching a suggestion's `before` with its `after`.
/// When no entry has any achievement, the first entry is seeded with
/// unapplied suggestions. Returns the number of replacements.
pub fn apply_suggestions(document: &mut ResumeDocument, suggestions: &[Suggestion]) -> usize {
    let mut applied = 0;
    let mut used = vec![false; suggestions.len()];

    for (i, suggestion) in suggestions.iter().enumerate() {
        let after = suggestion.after.trim();
        let before = normalize(&suggestion.before);
        if after.is_empty() || before.is_empty() {
            continue;
        }

        for achievement in document
            .experience
            .iter_mut()
            .flat_map(|entry| entry.achievements.iter_mut())
        {
            if achievement_matches(&normalize(achievement), &before) {
                *achievement = after.to_string();
                applied += 1;
                used[i] = true;
            }
        }
    }

    let no_achievements = document.experience.iter().all(|e| e.achievements.is_empty());
    if no_achievements {
        if let Some(first) = document.experience.first_mut() {
            first.achievements = suggestions
                .iter()
                .zip(&used)
                .filter(|(s, used)| !**used && !s.after.trim().is_empty())
                .take(SEED_ACHIEVEMENTS)
                .map(|(s, _)| s.after.trim().to_string())
                .collect();
        }
    }

    applied
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_start_matches(['-', '*', '•', '–'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_lowercase()
}

fn achievement_matches(achievement: &str, before: &str) -> bool {
    if achievement.is_empty() {
        return false;
    }
    achievement == before
        || (before.len() >= MIN_CONTAINMENT_CHARS && achievement.contains(before))
        || (achievement.len() >= MIN_CONTAINMENT_CHARS && before.contains(achievement))
}
