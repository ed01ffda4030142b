//! Analysis data model: the ten scored parameters plus the narrative fields.
//!
//! Model output is untrusted: every field deserializes leniently. Missing or
//! unparseable scores become 0, out-of-range scores are clamped to [0, 100],
//! and parameters the model omitted are filled with empty defaults so the
//! scoring engine always sees all ten.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::lenient::{
    lenient_or_default, lenient_score, lenient_strings, lenient_text, score_from_value,
};
use crate::models::provenance::Provenance;

/// The ten fixed analysis categories, in declaration order.
/// `Ord` follows declaration order, which is the matrix tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    SkillsMatch,
    ExperienceRelevance,
    EducationCertifications,
    KeywordsDensity,
    CareerProgression,
    IndustryExperience,
    ProjectComplexity,
    CulturalFit,
    AchievementsMetrics,
    FormatPresentation,
}

impl Parameter {
    pub const ALL: [Parameter; 10] = [
        Parameter::SkillsMatch,
        Parameter::ExperienceRelevance,
        Parameter::EducationCertifications,
        Parameter::KeywordsDensity,
        Parameter::CareerProgression,
        Parameter::IndustryExperience,
        Parameter::ProjectComplexity,
        Parameter::CulturalFit,
        Parameter::AchievementsMetrics,
        Parameter::FormatPresentation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Parameter::SkillsMatch => "skills_match",
            Parameter::ExperienceRelevance => "experience_relevance",
            Parameter::EducationCertifications => "education_certifications",
            Parameter::KeywordsDensity => "keywords_density",
            Parameter::CareerProgression => "career_progression",
            Parameter::IndustryExperience => "industry_experience",
            Parameter::ProjectComplexity => "project_complexity",
            Parameter::CulturalFit => "cultural_fit",
            Parameter::AchievementsMetrics => "achievements_metrics",
            Parameter::FormatPresentation => "format_presentation",
        }
    }

    pub fn from_key(key: &str) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Display label: underscores to spaces, each word title-cased.
    pub fn label(&self) -> String {
        humanize(self.key())
    }
}

fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One scored category. `weight` and `weighted_score` are attached by the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameter {
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rationale: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub weight: u32,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub weighted_score: f64,
}

impl AnalysisParameter {
    pub fn new(score: u8, rationale: impl Into<String>, examples: Vec<String>) -> Self {
        Self {
            score: score.min(100),
            rationale: rationale.into(),
            examples,
            weight: 0,
            weighted_score: 0.0,
        }
    }
}

/// Categorical verdict derived from `overall_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Good Match")]
    GoodMatch,
    #[serde(rename = "Moderate Match")]
    ModerateMatch,
    #[serde(rename = "Weak Match")]
    WeakMatch,
    #[serde(rename = "Poor Match")]
    PoorMatch,
}

impl Recommendation {
    /// Step function over inclusive lower bounds: 85, 70, 55, 40.
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= 85.0 {
            Recommendation::StrongMatch
        } else if overall_score >= 70.0 {
            Recommendation::GoodMatch
        } else if overall_score >= 55.0 {
            Recommendation::ModerateMatch
        } else if overall_score >= 40.0 {
            Recommendation::WeakMatch
        } else {
            Recommendation::PoorMatch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongMatch => "Strong Match",
            Recommendation::GoodMatch => "Good Match",
            Recommendation::ModerateMatch => "Moderate Match",
            Recommendation::WeakMatch => "Weak Match",
            Recommendation::PoorMatch => "Poor Match",
        }
    }
}

/// A resume-vs-JD analysis. Created fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default = "default_parameters", deserialize_with = "lenient_parameters")]
    pub parameters: BTreeMap<Parameter, AnalysisParameter>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub improvements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub missing_elements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub provenance: Provenance,
}

impl Analysis {
    /// An analysis with all ten parameters at their empty defaults.
    pub fn new(provenance: Provenance) -> Self {
        Self {
            parameters: default_parameters(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            missing_elements: Vec::new(),
            summary: String::new(),
            overall_score: 0.0,
            recommendation: None,
            provenance,
        }
    }

    pub fn set_parameter(&mut self, parameter: Parameter, value: AnalysisParameter) {
        self.parameters.insert(parameter, value);
    }
}

/// Display projection of one parameter. Rows are ordered by weight, descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrixRow {
    pub parameter: String,
    pub score: u8,
    pub weight: u32,
    pub weighted_score: f64,
    pub rationale: String,
    pub examples: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoding
// ────────────────────────────────────────────────────────────────────────────

fn default_parameters() -> BTreeMap<Parameter, AnalysisParameter> {
    Parameter::ALL
        .into_iter()
        .map(|p| (p, AnalysisParameter::default()))
        .collect()
}

/// Keeps only the ten known parameters; unknown keys are dropped, missing ones
/// default, and a malformed parameter body degrades to an empty parameter.
fn lenient_parameters<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Parameter, AnalysisParameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut parameters = default_parameters();

    if let Some(Value::Object(map)) = value {
        for (key, body) in map {
            let Some(parameter) = Parameter::from_key(&key) else {
                continue;
            };
            let decoded = match body {
                Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
                // Some models collapse a parameter to its bare score.
                scalar => AnalysisParameter {
                    score: score_from_value(&scalar),
                    ..AnalysisParameter::default()
                },
            };
            parameters.insert(parameter, decoded);
        }
    }

    Ok(parameters)
}
