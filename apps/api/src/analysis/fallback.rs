//! Fallback Analyzer: lexical-overlap scoring used whenever the LLM is unavailable.
//!
//! Pure and deterministic: identical inputs give identical scores and identical
//! keyword lists. Only skills_match and keywords_density are derived from the
//! text; the other eight parameters carry fixed plausible values.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::analysis::{Analysis, AnalysisParameter, Parameter};
use crate::models::provenance::{FallbackReason, Provenance};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9+#]+").unwrap());

/// Tokens this short are treated as noise.
const MIN_WORD_CHARS: usize = 4;
/// Base score when the job description has no qualifying words.
const DEFAULT_BASE_SCORE: f64 = 50.0;
/// Tunable presentation constants: the fallback reports within [30, 95]
/// after a flat boost.
const REALISM_BOOST: f64 = 20.0;
const SCORE_FLOOR: f64 = 30.0;
const SCORE_CEILING: f64 = 95.0;
const TOP_KEYWORDS: usize = 3;

const FIXED_SCORES: [(Parameter, u8, &str); 8] = [
    (
        Parameter::ExperienceRelevance,
        85,
        "Demo mode: experience relevance not assessed, typical value shown",
    ),
    (
        Parameter::EducationCertifications,
        90,
        "Demo mode: education and certifications not assessed, typical value shown",
    ),
    (
        Parameter::CareerProgression,
        80,
        "Demo mode: career progression not assessed, typical value shown",
    ),
    (
        Parameter::IndustryExperience,
        75,
        "Demo mode: industry experience not assessed, typical value shown",
    ),
    (
        Parameter::ProjectComplexity,
        80,
        "Demo mode: project complexity not assessed, typical value shown",
    ),
    (
        Parameter::CulturalFit,
        85,
        "Demo mode: cultural fit not assessed, typical value shown",
    ),
    (
        Parameter::AchievementsMetrics,
        70,
        "Demo mode: achievements and metrics not assessed, typical value shown",
    ),
    (
        Parameter::FormatPresentation,
        88,
        "Demo mode: format and presentation not assessed, typical value shown",
    ),
];

/// Keyword overlap between a resume and a job description.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordOverlap {
    /// JD words found in the resume, in JD first-appearance order.
    pub common: Vec<String>,
    /// JD words absent from the resume, in JD first-appearance order.
    pub missing: Vec<String>,
    pub jd_word_count: usize,
    pub resume_word_count: usize,
}

impl KeywordOverlap {
    pub fn compute(resume_text: &str, jd_text: &str) -> Self {
        let resume_words: HashSet<String> = qualifying_words(resume_text).into_iter().collect();

        let mut seen = HashSet::new();
        let jd_words: Vec<String> = qualifying_words(jd_text)
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();

        let (common, missing): (Vec<String>, Vec<String>) = jd_words
            .iter()
            .cloned()
            .partition(|w| resume_words.contains(w));

        Self {
            common,
            missing,
            jd_word_count: jd_words.len(),
            resume_word_count: resume_words.len(),
        }
    }

    /// Percentage of JD words present in the resume, before boost and clamp.
    pub fn base_score(&self) -> f64 {
        if self.jd_word_count == 0 {
            return DEFAULT_BASE_SCORE;
        }
        self.common.len() as f64 / self.jd_word_count as f64 * 100.0
    }

    pub fn match_score(&self) -> u8 {
        (self.base_score() + REALISM_BOOST)
            .clamp(SCORE_FLOOR, SCORE_CEILING)
            .round() as u8
    }
}

fn qualifying_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect()
}

/// Builds a complete analysis from keyword overlap alone. Empty input yields
/// a fixed record tagged `missing_input` instead of `reason`.
pub fn generate_mock_analysis(
    resume_text: &str,
    jd_text: &str,
    reason: FallbackReason,
) -> Analysis {
    if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
        return static_analysis();
    }

    let overlap = KeywordOverlap::compute(resume_text, jd_text);
    let match_score = overlap.match_score();
    debug!(
        reason = reason.as_str(),
        match_score,
        common = overlap.common.len(),
        jd_words = overlap.jd_word_count,
        "Generated fallback analysis"
    );

    let mut analysis = Analysis::new(Provenance::fallback(reason));
    fill_fixed_parameters(&mut analysis);

    analysis.set_parameter(
        Parameter::SkillsMatch,
        AnalysisParameter::new(
            match_score,
            format!(
                "Demo mode: {} of {} job description keywords appear in the resume",
                overlap.common.len(),
                overlap.jd_word_count
            ),
            overlap.common.iter().take(5).cloned().collect(),
        ),
    );
    analysis.set_parameter(
        Parameter::KeywordsDensity,
        AnalysisParameter::new(
            overlap.resume_word_count.min(100) as u8,
            format!(
                "Demo mode: resume contains {} distinct keywords",
                overlap.resume_word_count
            ),
            vec![],
        ),
    );

    analysis.strengths = overlap
        .common
        .iter()
        .take(TOP_KEYWORDS)
        .map(|w| format!("Resume mentions '{w}', which the job description asks for"))
        .collect();

    analysis.improvements = overlap
        .missing
        .iter()
        .take(TOP_KEYWORDS)
        .map(|w| format!("Add evidence of '{w}' experience"))
        .collect();

    analysis.missing_elements = overlap.missing.iter().take(TOP_KEYWORDS).cloned().collect();

    analysis.summary = format!(
        "Demo mode: keyword overlap estimates a {match_score}% match \
        ({} of {} job description keywords found in the resume). \
        Connect an LLM provider for a full analysis.",
        overlap.common.len(),
        overlap.jd_word_count
    );

    analysis
}

fn fill_fixed_parameters(analysis: &mut Analysis) {
    for (parameter, score, rationale) in FIXED_SCORES {
        analysis.set_parameter(parameter, AnalysisParameter::new(score, rationale, vec![]));
    }
}

fn static_analysis() -> Analysis {
    let mut analysis = Analysis::new(Provenance::fallback(FallbackReason::MissingInput));
    fill_fixed_parameters(&mut analysis);
    analysis.set_parameter(
        Parameter::SkillsMatch,
        AnalysisParameter::new(
            DEFAULT_BASE_SCORE as u8,
            "Demo mode: no text to compare",
            vec![],
        ),
    );
    analysis.set_parameter(
        Parameter::KeywordsDensity,
        AnalysisParameter::new(0, "Demo mode: no text to compare", vec![]),
    );
    analysis.improvements = vec!["Provide both resume and job description text".to_string()];
    analysis.summary =
        "Demo mode: the resume or job description was empty, so no comparison was made."
            .to_string();
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::ScoringEngine;

    const RESUME: &str =
        "Senior Python Developer with AWS experience improving deployment pipelines";
    const JD: &str = "Looking for Python AWS deployment engineer";

    #[test]
    fn test_overlap_ignores_short_tokens_and_keeps_jd_order() {
        let overlap = KeywordOverlap::compute(RESUME, JD);
        // "for" and "aws" are too short to count
        assert_eq!(overlap.common, vec!["python", "deployment"]);
        assert_eq!(overlap.missing, vec!["looking", "engineer"]);
        assert_eq!(overlap.jd_word_count, 4);
        assert_eq!(overlap.base_score(), 50.0);
        assert_eq!(overlap.match_score(), 70);
    }

    #[test]
    fn test_scenario_score_in_band_and_missing_not_in_resume() {
        let analysis = generate_mock_analysis(RESUME, JD, FallbackReason::ServiceUnavailable);
        let score = analysis.parameters[&Parameter::SkillsMatch].score;
        assert!((30..=95).contains(&score));

        let resume_words: HashSet<String> = qualifying_words(RESUME).into_iter().collect();
        for missing in &analysis.missing_elements {
            assert!(!resume_words.contains(missing), "{missing} is in the resume");
        }
        assert!(analysis.provenance.is_demo());
        assert_eq!(
            analysis.provenance.reason(),
            Some(FallbackReason::ServiceUnavailable)
        );
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let first = generate_mock_analysis(RESUME, JD, FallbackReason::QuotaExceeded);
        let second = generate_mock_analysis(RESUME, JD, FallbackReason::QuotaExceeded);
        assert_eq!(first, second);
    }

    #[test]
    fn test_jd_without_qualifying_words_defaults_to_seventy() {
        let analysis = generate_mock_analysis(RESUME, "a job for you at IBM", FallbackReason::AuthFailure);
        assert_eq!(analysis.parameters[&Parameter::SkillsMatch].score, 70);
        assert!(analysis.missing_elements.is_empty());
    }

    #[test]
    fn test_score_clamped_to_band() {
        let full = generate_mock_analysis(
            "rust tokio axum postgres",
            "rust tokio axum postgres",
            FallbackReason::UnexpectedError,
        );
        assert_eq!(full.parameters[&Parameter::SkillsMatch].score, 95);

        let none = generate_mock_analysis(
            "gardening landscaping",
            "kubernetes terraform golang",
            FallbackReason::UnexpectedError,
        );
        assert_eq!(none.parameters[&Parameter::SkillsMatch].score, 30);
    }

    #[test]
    fn test_empty_input_gives_static_record() {
        let analysis = generate_mock_analysis("", JD, FallbackReason::ServiceUnavailable);
        assert_eq!(analysis.provenance.reason(), Some(FallbackReason::MissingInput));
        assert_eq!(analysis.parameters.len(), 10);
        assert_eq!(analysis.parameters[&Parameter::SkillsMatch].score, 50);

        let whitespace = generate_mock_analysis(RESUME, "   \n", FallbackReason::ServiceUnavailable);
        assert_eq!(whitespace, analysis);
    }

    #[test]
    fn test_fixed_parameters_and_keyword_density() {
        let analysis = generate_mock_analysis(RESUME, JD, FallbackReason::ProviderDisabled);
        let score = |p: Parameter| analysis.parameters[&p].score;
        assert_eq!(score(Parameter::ExperienceRelevance), 85);
        assert_eq!(score(Parameter::EducationCertifications), 90);
        assert_eq!(score(Parameter::FormatPresentation), 88);
        // senior python developer with experience improving deployment pipelines
        assert_eq!(score(Parameter::KeywordsDensity), 8);
    }

    #[test]
    fn test_narrative_fields_from_top_keywords() {
        let analysis = generate_mock_analysis(RESUME, JD, FallbackReason::ProviderDisabled);
        assert_eq!(analysis.strengths.len(), 2);
        assert!(analysis.strengths[0].contains("python"));
        assert_eq!(analysis.missing_elements, vec!["looking", "engineer"]);
        assert_eq!(
            analysis.improvements,
            vec![
                "Add evidence of 'looking' experience",
                "Add evidence of 'engineer' experience"
            ]
        );
        assert!(analysis.summary.contains("70%"));
        assert!(analysis.summary.contains("2 of 4"));
    }

    #[test]
    fn test_fallback_output_scores_without_error() {
        let mut analysis = generate_mock_analysis(RESUME, JD, FallbackReason::MalformedResponse);
        ScoringEngine::default().apply_weights(&mut analysis);
        assert!((0.0..=100.0).contains(&analysis.overall_score));
        assert!(analysis.recommendation.is_some());
    }
}
