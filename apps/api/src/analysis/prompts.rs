// Prompt for the resume-vs-JD analysis call.

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};

/// Analysis prompt template. Replace `{jd_text}` and `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter and ATS engine.

Compare this RESUME against this JOB DESCRIPTION and output JSON exactly in the schema below.

JOB DESCRIPTION:
{jd_text}

RESUME:
{resume_text}

Schema:
{
  "parameters": {
    "skills_match": {"score": 0, "rationale": "", "examples": []},
    "experience_relevance": {"score": 0, "rationale": "", "examples": []},
    "education_certifications": {"score": 0, "rationale": "", "examples": []},
    "keywords_density": {"score": 0, "rationale": "", "examples": []},
    "career_progression": {"score": 0, "rationale": "", "examples": []},
    "industry_experience": {"score": 0, "rationale": "", "examples": []},
    "project_complexity": {"score": 0, "rationale": "", "examples": []},
    "cultural_fit": {"score": 0, "rationale": "", "examples": []},
    "achievements_metrics": {"score": 0, "rationale": "", "examples": []},
    "format_presentation": {"score": 0, "rationale": "", "examples": []}
  },
  "strengths": [],
  "improvements": [],
  "missing_elements": [],
  "summary": ""
}

All scores are integers from 0 to 100.
"examples" quote short phrases from the resume that justify the score.
"#;

pub fn build_analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    let body = fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("jd_text", jd_text), ("resume_text", resume_text)],
    );
    format!("{body}\n{JSON_ONLY_INSTRUCTION}")
}
