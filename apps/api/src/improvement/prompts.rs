// Prompts for the suggestion and rewrite calls.
// Both send a bounded prefix of the job description to keep cost predictable.

use crate::llm_client::prompts::{
    bullet_list, fill_template, truncate_chars, JD_PROMPT_PREFIX_CHARS, JSON_ONLY_INSTRUCTION,
};
use crate::models::analysis::Analysis;
use crate::models::suggestion::Suggestion;

/// Suggestion prompt template.
/// Replace: {improvements}, {missing_elements}, {jd_text}, {resume_text}
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and career coach.

Analyze this ACTUAL RESUME and provide SPECIFIC, TAILORED suggestions for improvement.

CRITICAL INSTRUCTIONS:
1. Read the actual resume content below carefully
2. For "before", quote REAL text from the candidate's resume, or write "Not currently present"
3. For "after", show how to improve THAT SPECIFIC content in the candidate's voice
4. If something is missing, suggest where to add it based on their existing experience
5. Do not invent experiences or credentials the candidate does not have

IMPROVEMENTS NEEDED:
{improvements}

MISSING ELEMENTS:
{missing_elements}

JOB DESCRIPTION:
{jd_text}

CANDIDATE'S RESUME:
{resume_text}

Output JSON with this structure:
{
  "suggestions": [
    {
      "area": "Improvement area name",
      "what_to_change": "Specific instruction for this candidate",
      "before": "Actual text from their resume or 'Not currently present'",
      "after": "Improved version of their content",
      "rationale": "One sentence on why this helps"
    }
  ]
}

Provide 3-5 high-impact, resume-specific suggestions.
"#;

/// Rewrite prompt template.
/// Replace: {resume_text}, {jd_text}, {suggestions_text}, {keywords}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer specializing in ATS-optimized resumes.

TASK: Restructure this resume and apply the improvement suggestions while keeping an ATS-friendly format.

ORIGINAL RESUME:
{resume_text}

JOB DESCRIPTION (for context):
{jd_text}

IMPROVEMENT SUGGESTIONS TO APPLY:
{suggestions_text}

KEYWORDS TO WORK IN WHERE TRUTHFUL:
{keywords}

INSTRUCTIONS:
1. Parse the original resume structure
2. Apply each suggestion's "after" text to the matching experience achievement
3. Keep the candidate's authentic voice
4. Quantify achievements where the original supports it
5. Use only information present in the original resume

OUTPUT FORMAT:
{
  "contact": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "+1 555 123 4567",
    "location": "City, State",
    "linkedin": "linkedin.com/in/profile"
  },
  "summary": "2-3 sentence professional summary",
  "experience": [
    {
      "title": "Job Title",
      "company": "Company Name",
      "location": "City, State",
      "dates": "MMM YYYY - MMM YYYY",
      "achievements": ["Achievement with metrics and impact"]
    }
  ],
  "skills": {"Technical": ["skill"], "Tools": ["tool"]},
  "education": [
    {"degree": "Degree Name", "institution": "University Name", "year": "YYYY", "details": "GPA, honors"}
  ],
  "certifications": ["Certification Name (Year)"]
}

Omit "linkedin" and "details" when the resume has none.
"#;

pub fn build_suggestions_prompt(analysis: &Analysis, resume_text: &str, jd_text: &str) -> String {
    let improvements = list_or_none(&analysis.improvements);
    let missing = list_or_none(&analysis.missing_elements);
    let body = fill_template(
        SUGGESTIONS_PROMPT_TEMPLATE,
        &[
            ("improvements", improvements.as_str()),
            ("missing_elements", missing.as_str()),
            ("jd_text", truncate_chars(jd_text, JD_PROMPT_PREFIX_CHARS)),
            ("resume_text", resume_text),
        ],
    );
    format!("{body}\n{JSON_ONLY_INSTRUCTION}")
}

pub fn build_rewrite_prompt(
    resume_text: &str,
    suggestions: &[Suggestion],
    keywords: &[String],
    jd_text: &str,
) -> String {
    let suggestions_text = format_suggestions(suggestions);
    let keywords = list_or_none(keywords);
    let body = fill_template(
        REWRITE_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("jd_text", truncate_chars(jd_text, JD_PROMPT_PREFIX_CHARS)),
            ("suggestions_text", suggestions_text.as_str()),
            ("keywords", keywords.as_str()),
        ],
    );
    format!("{body}\n{JSON_ONLY_INSTRUCTION}")
}

/// Numbered area/change/before/after blocks.
pub fn format_suggestions(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return "(none)".to_string();
    }
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {}: {}\n   Before: {}\n   After: {}",
                i + 1,
                s.area,
                s.what_to_change,
                s.before,
                s.after
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        bullet_list(items)
    }
}
