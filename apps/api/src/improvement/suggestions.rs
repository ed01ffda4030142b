//! Suggestion Engine: before/after improvements derived from an analysis.
//!
//! The LLM path quotes the resume directly. The fallback anchors fixed topics
//! (metrics, keywords, verbs, scope, certifications) to real resume bullets
//! when it can find them, and to generic examples when it cannot.

use tracing::info;

use crate::improvement::prompts::build_suggestions_prompt;
use crate::llm_client::{complete_json, CompletionOptions, LlmError, TextGeneration};
use crate::models::analysis::Analysis;
use crate::models::provenance::{FallbackReason, Provenance};
use crate::models::suggestion::{Suggestion, SuggestionSet, MIN_SUGGESTIONS};
use crate::resilience::remote_or_fallback;

const NOT_PRESENT: &str = "Not currently present";
const MIN_BULLET_CHARS: usize = 30;
const MAX_BULLET_CHARS: usize = 150;
const BULLET_DELIMITERS: &[char] = &['\n', '•', '●', '▪', '◦', ';'];

/// Weak openers and the stronger verb each one becomes.
const WEAK_OPENERS: &[(&str, &str)] = &[
    ("was responsible for", "Owned"),
    ("responsible for", "Owned"),
    ("was involved in", "Drove"),
    ("participated in", "Contributed to"),
    ("worked on", "Delivered"),
    ("helped with", "Drove"),
    ("helped", "Drove"),
    ("assisted with", "Co-led"),
    ("assisted in", "Co-led"),
    ("tasked with", "Led"),
    ("handled", "Managed"),
];

pub async fn generate_suggestions(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    analysis: &Analysis,
    resume_text: &str,
    jd_text: &str,
) -> SuggestionSet {
    if resume_text.trim().is_empty() {
        return generate_mock_suggestions(analysis, resume_text, FallbackReason::MissingInput);
    }

    remote_or_fallback(
        "suggestions",
        request_suggestions(llm, options, analysis, resume_text, jd_text),
        |reason| generate_mock_suggestions(analysis, resume_text, reason),
    )
    .await
}

async fn request_suggestions(
    llm: &dyn TextGeneration,
    options: &CompletionOptions,
    analysis: &Analysis,
    resume_text: &str,
    jd_text: &str,
) -> Result<SuggestionSet, LlmError> {
    let prompt = build_suggestions_prompt(analysis, resume_text, jd_text);
    let reply: SuggestionSet = complete_json(llm, &prompt, options).await?;

    let suggestions: Vec<Suggestion> = reply
        .suggestions
        .into_iter()
        .filter(|s| !s.area.trim().is_empty() || !s.after.trim().is_empty())
        .collect();

    // A short list is treated like a malformed reply
    if suggestions.len() < MIN_SUGGESTIONS {
        return Err(LlmError::EmptyContent);
    }

    info!(count = suggestions.len(), "LLM suggestions received");
    Ok(SuggestionSet::new(suggestions, Provenance::Llm))
}

/// Splits resume text into candidate achievement sentences of plausible bullet length.
pub fn extract_resume_bullets(resume_text: &str) -> Vec<String> {
    resume_text
        .split(BULLET_DELIMITERS)
        .map(|part| {
            part.trim()
                .trim_start_matches(['-', '*', '–', '>'])
                .trim()
                .to_string()
        })
        .filter(|part| (MIN_BULLET_CHARS..=MAX_BULLET_CHARS).contains(&part.chars().count()))
        .collect()
}

/// Locally built suggestions, always between three and five.
pub fn generate_mock_suggestions(
    analysis: &Analysis,
    resume_text: &str,
    reason: FallbackReason,
) -> SuggestionSet {
    let bullets = extract_resume_bullets(resume_text);
    let mut used: Vec<&str> = Vec::new();
    let mut suggestions = Vec::new();

    // Quantify impact
    let unquantified = bullets
        .iter()
        .find(|b| !b.chars().any(|c| c.is_ascii_digit()))
        .map(String::as_str);
    suggestions.push(match unquantified {
        Some(bullet) => {
            used.push(bullet);
            Suggestion {
                area: "Quantify Your Impact".to_string(),
                what_to_change: "Add a concrete number to this achievement: a percentage, count, amount, or time saved.".to_string(),
                before: bullet.to_string(),
                after: format!(
                    "{}, improving [key metric] by [X]% for [N] users or teams",
                    without_trailing_period(bullet)
                ),
                rationale: "Quantified achievements give concrete evidence of scale and make your contributions memorable.".to_string(),
            }
        }
        None => Suggestion {
            area: "Quantify Your Impact".to_string(),
            what_to_change: "Add specific metrics, percentages, or numbers to show the scale and impact of your work.".to_string(),
            before: "Managed a team and improved processes".to_string(),
            after: "Led a cross-functional team of 8 engineers, reducing deployment time by 40% and improving uptime to 99.9%".to_string(),
            rationale: "Quantified achievements give concrete evidence of scale and make your contributions memorable.".to_string(),
        },
    });

    // Missing keywords
    if !analysis.missing_elements.is_empty() {
        let sample: Vec<&str> = analysis
            .missing_elements
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        suggestions.push(Suggestion {
            area: "Incorporate Missing Keywords".to_string(),
            what_to_change: format!(
                "Add relevant experience or skills related to: {}",
                sample.join(", ")
            ),
            before: NOT_PRESENT.to_string(),
            after: format!(
                "Applied {} to streamline team workflows, collaborating on {}",
                sample[0],
                sample.get(1).copied().unwrap_or("key initiatives")
            ),
            rationale: "Job-specific keywords improve ATS matching and show direct alignment with the role.".to_string(),
        });
    }

    // Stronger verbs
    let weak = bullets
        .iter()
        .filter(|b| !used.contains(&b.as_str()))
        .find_map(|b| strengthen_opener(b).map(|strong| (b.as_str(), strong)));
    suggestions.push(match weak {
        Some((bullet, strong)) => {
            used.push(bullet);
            Suggestion {
                area: "Use Stronger Action Verbs".to_string(),
                what_to_change: "Open with an action verb that shows ownership instead of a passive phrase.".to_string(),
                before: bullet.to_string(),
                after: strong,
                rationale: "Strong action verbs present you as a proactive contributor.".to_string(),
            }
        }
        None => Suggestion {
            area: "Use Stronger Action Verbs".to_string(),
            what_to_change: "Replace passive or weak verbs with action verbs that show leadership and initiative.".to_string(),
            before: "Was responsible for handling customer issues".to_string(),
            after: "Resolved 200+ customer escalations monthly, achieving a 95% satisfaction rating".to_string(),
            rationale: "Strong action verbs present you as a proactive contributor.".to_string(),
        },
    });

    // Context and scope
    let unscoped = bullets
        .iter()
        .map(String::as_str)
        .find(|b| !used.contains(b));
    suggestions.push(match unscoped {
        Some(bullet) => Suggestion {
            area: "Provide Context and Scope".to_string(),
            what_to_change: "Say how big the work was: team size, user base, budget, or timeline.".to_string(),
            before: bullet.to_string(),
            after: format!(
                "{} across a [team size] team serving [user base], delivered within [timeline]",
                without_trailing_period(bullet)
            ),
            rationale: "Context helps recruiters judge the magnitude and complexity of your work.".to_string(),
        },
        None => Suggestion {
            area: "Provide Context and Scope".to_string(),
            what_to_change: "Include details about team size, budget, project scale, or organizational impact.".to_string(),
            before: "Developed new features for the platform".to_string(),
            after: "Architected and delivered 5 core features for a SaaS platform serving 50,000+ users".to_string(),
            rationale: "Context helps recruiters judge the magnitude and complexity of your work.".to_string(),
        },
    });

    // Certifications
    if analysis.improvements.iter().any(|i| {
        let i = i.to_lowercase();
        i.contains("cert") || i.contains("qualif")
    }) {
        suggestions.push(Suggestion {
            area: "Add Relevant Certifications or Projects".to_string(),
            what_to_change: "List certifications, courses, or side projects that show relevant expertise.".to_string(),
            before: NOT_PRESENT.to_string(),
            after: "Certifications: [Certification Name] ([Year]) | Projects: [Project] demonstrating [required skill]".to_string(),
            rationale: "Certifications and projects validate your skills and show continuous learning.".to_string(),
        });
    }

    SuggestionSet::new(suggestions, Provenance::fallback(reason))
}

/// Rewrites a bullet that opens with a weak phrase, or `None` if it doesn't.
fn strengthen_opener(bullet: &str) -> Option<String> {
    let lowered = bullet.to_lowercase();
    WEAK_OPENERS.iter().find_map(|(weak, strong)| {
        if !lowered.starts_with(weak) {
            return None;
        }
        let rest = bullet.get(weak.len()..)?.trim_start();
        Some(format!("{strong} {rest}"))
    })
}

fn without_trailing_period(text: &str) -> &str {
    text.trim_end().trim_end_matches('.')
}

/// Plain-text improvement guide listing each suggestion, ending with next steps.
pub fn create_improved_resume_text(suggestions: &SuggestionSet) -> String {
    let mut guide = String::from(
        "IMPROVED RESUME SUGGESTIONS\n\
        ============================\n\n\
        Based on the analysis, here are specific improvements to make:\n\n",
    );

    if suggestions.provenance.is_demo() {
        guide.push_str("(Demo mode: these suggestions were generated locally.)\n\n");
    }

    for (i, s) in suggestions.suggestions.iter().enumerate() {
        guide.push_str(&format!(
            "{}. {}\n\n   What to Change: {}\n\n   Before: {}\n\n   After: {}\n\n   Why: {}\n\n---\n\n",
            i + 1,
            s.area,
            s.what_to_change,
            s.before,
            s.after,
            s.rationale
        ));
    }

    guide.push_str(
        "NEXT STEPS:\n\
        1. Review each suggestion above\n\
        2. Update your resume with the \"After\" examples\n\
        3. Ensure all changes maintain your authentic voice\n\
        4. Re-run the analysis to see your improved score\n",
    );
    guide
}
