//! Scoring Engine: turns per-parameter scores into a weighted overall score,
//! a categorical recommendation, and the display matrix.
//!
//! Never fails on malformed input: a parameter missing from the weight table
//! weighs 0, a parameter missing from the analysis scores 0.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::analysis::{Analysis, Parameter, Recommendation, ScoreMatrixRow};

/// Integer percentage weights keyed by parameter. A loaded table always sums to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable(BTreeMap<Parameter, u32>);

impl Default for WeightTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Parameter::SkillsMatch, 20),
            (Parameter::ExperienceRelevance, 18),
            (Parameter::EducationCertifications, 15),
            (Parameter::KeywordsDensity, 12),
            (Parameter::CareerProgression, 10),
            (Parameter::IndustryExperience, 8),
            (Parameter::ProjectComplexity, 8),
            (Parameter::CulturalFit, 4),
            (Parameter::AchievementsMetrics, 3),
            (Parameter::FormatPresentation, 2),
        ]))
    }
}

impl WeightTable {
    /// Builds a table, rejecting any weight above 100 or a total other than 100.
    pub fn new(weights: BTreeMap<Parameter, u32>) -> Result<Self> {
        let table = Self(weights);
        table.validate()?;
        Ok(table)
    }

    /// Reads a JSON object such as `{"skills_match": 20, ...}` from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read weight table '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid weight table '{}'", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let weights: BTreeMap<Parameter, u32> =
            serde_json::from_str(raw).context("weight table must map parameter names to integers")?;
        Self::new(weights)
    }

    /// Weight for `parameter`; 0 when the table does not list it.
    pub fn get(&self, parameter: Parameter) -> u32 {
        self.0.get(&parameter).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    fn validate(&self) -> Result<()> {
        // Bounding each weight keeps total() and score × weight within u32
        if let Some((parameter, weight)) = self.0.iter().find(|(_, w)| **w > 100) {
            bail!("weight for {} must be at most 100, got {weight}", parameter.key());
        }
        let total = self.total();
        if total != 100 {
            bail!("weights must sum to 100, got {total}");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: WeightTable,
}

impl ScoringEngine {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Attaches weight and weighted_score to every parameter, then sets
    /// `overall_score` and `recommendation`. Recomputed from scores on every
    /// call, so applying twice equals applying once.
    pub fn apply_weights<'a>(&self, analysis: &'a mut Analysis) -> &'a mut Analysis {
        // Integer points: score (0–100) × weight (0–100). Dividing once keeps
        // every weighted score exact to two decimals.
        let mut total_points: u32 = 0;

        for parameter in Parameter::ALL {
            let entry = analysis.parameters.entry(parameter).or_default();
            let weight = self.weights.get(parameter);
            let points = u32::from(entry.score.min(100)) * weight;

            entry.weight = weight;
            entry.weighted_score = round2(points as f64 / 100.0);
            total_points += points;
        }

        let overall_score = round2(total_points as f64 / 100.0);
        analysis.overall_score = overall_score;
        analysis.recommendation = Some(Recommendation::from_score(overall_score));
        analysis
    }

    /// Projects the analysis into display rows sorted by weight descending.
    /// Equal weights keep parameter declaration order.
    pub fn to_matrix(&self, analysis: &Analysis) -> Vec<ScoreMatrixRow> {
        let mut rows: Vec<ScoreMatrixRow> = analysis
            .parameters
            .iter()
            .map(|(parameter, p)| ScoreMatrixRow {
                parameter: parameter.label(),
                score: p.score,
                weight: p.weight,
                weighted_score: p.weighted_score,
                rationale: p.rationale.clone(),
                examples: p.examples.clone(),
            })
            .collect();

        // sort_by is stable
        rows.sort_by(|a, b| b.weight.cmp(&a.weight));
        rows
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::AnalysisParameter;
    use crate::models::provenance::Provenance;

    fn analysis_with_scores(scores: [u8; 10]) -> Analysis {
        let mut analysis = Analysis::new(Provenance::Llm);
        for (parameter, score) in Parameter::ALL.into_iter().zip(scores) {
            analysis.set_parameter(
                parameter,
                AnalysisParameter::new(score, format!("{} rationale", parameter.key()), vec![]),
            );
        }
        analysis
    }

    fn uniform_table(weight: u32) -> BTreeMap<Parameter, u32> {
        Parameter::ALL.into_iter().map(|p| (p, weight)).collect()
    }

    #[test]
    fn test_default_table_sums_to_100() {
        assert_eq!(WeightTable::default().total(), 100);
        assert!(WeightTable::default().validate().is_ok());
    }

    #[test]
    fn test_table_not_summing_to_100_is_rejected() {
        let result = WeightTable::new(uniform_table(9));
        assert!(result.is_err());
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "skills_match": 50,
            "experience_relevance": 50
        }"#;
        let table = WeightTable::from_json_str(json).unwrap();
        assert_eq!(table.get(Parameter::SkillsMatch), 50);
        assert_eq!(table.get(Parameter::CulturalFit), 0);
    }

    #[test]
    fn test_table_with_unknown_parameter_is_rejected() {
        let json = r#"{"skills_match": 90, "charisma": 10}"#;
        assert!(WeightTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_table_with_oversized_weight_is_rejected() {
        let json = r#"{"skills_match": 4294967295, "experience_relevance": 101}"#;
        let err = WeightTable::from_json_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("at most 100"));

        let json = r#"{"skills_match": 150, "experience_relevance": 0}"#;
        assert!(WeightTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_weighted_scores_and_overall() {
        let engine = ScoringEngine::default();
        let mut analysis = analysis_with_scores([80, 70, 90, 60, 50, 40, 75, 85, 30, 95]);
        engine.apply_weights(&mut analysis);

        let skills = &analysis.parameters[&Parameter::SkillsMatch];
        assert_eq!(skills.weight, 20);
        assert_eq!(skills.weighted_score, 16.0);

        let format = &analysis.parameters[&Parameter::FormatPresentation];
        assert_eq!(format.weight, 2);
        assert_eq!(format.weighted_score, 1.9);

        // 16 + 12.6 + 13.5 + 7.2 + 5 + 3.2 + 6 + 3.4 + 0.9 + 1.9
        assert_eq!(analysis.overall_score, 69.7);
        assert_eq!(analysis.recommendation, Some(Recommendation::ModerateMatch));
    }

    #[test]
    fn test_apply_weights_is_idempotent() {
        let engine = ScoringEngine::default();
        let mut once = analysis_with_scores([88, 61, 73, 45, 92, 17, 66, 81, 59, 33]);
        engine.apply_weights(&mut once);

        let mut twice = once.clone();
        engine.apply_weights(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_overall_score_bounded_for_extreme_scores() {
        let engine = ScoringEngine::default();

        let mut perfect = analysis_with_scores([100; 10]);
        engine.apply_weights(&mut perfect);
        assert_eq!(perfect.overall_score, 100.0);
        assert_eq!(perfect.recommendation, Some(Recommendation::StrongMatch));

        let mut zero = analysis_with_scores([0; 10]);
        engine.apply_weights(&mut zero);
        assert_eq!(zero.overall_score, 0.0);
        assert_eq!(zero.recommendation, Some(Recommendation::PoorMatch));
    }

    #[test]
    fn test_overall_score_bounded_across_tables() {
        let tables = [
            WeightTable::default(),
            WeightTable::new(uniform_table(10)).unwrap(),
            WeightTable::new(BTreeMap::from([(Parameter::CulturalFit, 100)])).unwrap(),
        ];
        let score_sets = [[100; 10], [0; 10], [57, 3, 99, 100, 0, 42, 18, 77, 65, 1]];

        for table in tables {
            let engine = ScoringEngine::new(table);
            for scores in score_sets {
                let mut analysis = analysis_with_scores(scores);
                engine.apply_weights(&mut analysis);
                assert!((0.0..=100.0).contains(&analysis.overall_score));
            }
        }
    }

    #[test]
    fn test_missing_parameters_score_zero_without_panicking() {
        let engine = ScoringEngine::default();
        let mut analysis = Analysis::new(Provenance::Llm);
        analysis.parameters.clear();
        analysis.set_parameter(
            Parameter::SkillsMatch,
            AnalysisParameter::new(100, "only one", vec![]),
        );

        engine.apply_weights(&mut analysis);
        assert_eq!(analysis.parameters.len(), 10);
        assert_eq!(analysis.overall_score, 20.0);
        assert_eq!(analysis.recommendation, Some(Recommendation::PoorMatch));
    }

    #[test]
    fn test_parameter_absent_from_table_weighs_zero() {
        let engine = ScoringEngine::new(
            WeightTable::new(BTreeMap::from([(Parameter::SkillsMatch, 100)])).unwrap(),
        );
        let mut analysis = analysis_with_scores([50; 10]);
        engine.apply_weights(&mut analysis);

        let cultural = &analysis.parameters[&Parameter::CulturalFit];
        assert_eq!(cultural.weight, 0);
        assert_eq!(cultural.weighted_score, 0.0);
        assert_eq!(analysis.overall_score, 50.0);
    }

    #[test]
    fn test_recommendation_at_exact_boundary() {
        // skills_match alone at 100% weight gives overall == score
        let engine = ScoringEngine::new(
            WeightTable::new(BTreeMap::from([(Parameter::SkillsMatch, 100)])).unwrap(),
        );
        for (score, expected) in [
            (85, Recommendation::StrongMatch),
            (84, Recommendation::GoodMatch),
            (70, Recommendation::GoodMatch),
            (69, Recommendation::ModerateMatch),
            (55, Recommendation::ModerateMatch),
            (40, Recommendation::WeakMatch),
            (0, Recommendation::PoorMatch),
        ] {
            let mut analysis = analysis_with_scores([score, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
            engine.apply_weights(&mut analysis);
            assert_eq!(analysis.recommendation, Some(expected), "score {score}");
        }
    }

    #[test]
    fn test_matrix_sorted_by_weight_descending() {
        let engine = ScoringEngine::default();
        let mut analysis = analysis_with_scores([50; 10]);
        engine.apply_weights(&mut analysis);

        let matrix = engine.to_matrix(&analysis);
        assert_eq!(matrix.len(), 10);
        assert!(matrix.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert_eq!(matrix[0].parameter, "Skills Match");
        assert_eq!(matrix[9].parameter, "Format Presentation");
    }

    #[test]
    fn test_matrix_ties_keep_declaration_order() {
        let engine = ScoringEngine::default();
        let mut analysis = analysis_with_scores([50; 10]);
        engine.apply_weights(&mut analysis);

        let matrix = engine.to_matrix(&analysis);
        // industry_experience and project_complexity both weigh 8
        let industry = matrix
            .iter()
            .position(|r| r.parameter == "Industry Experience")
            .unwrap();
        let project = matrix
            .iter()
            .position(|r| r.parameter == "Project Complexity")
            .unwrap();
        assert_eq!(project, industry + 1);
    }

    #[test]
    fn test_matrix_with_uniform_weights_is_declaration_order() {
        let engine = ScoringEngine::new(WeightTable::new(uniform_table(10)).unwrap());
        let mut analysis = analysis_with_scores([50; 10]);
        engine.apply_weights(&mut analysis);

        let labels: Vec<String> = engine
            .to_matrix(&analysis)
            .into_iter()
            .map(|r| r.parameter)
            .collect();
        let expected: Vec<String> = Parameter::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_matrix_rows_carry_rationale_and_scores() {
        let engine = ScoringEngine::default();
        let mut analysis = analysis_with_scores([80, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        engine.apply_weights(&mut analysis);
        let row = &engine.to_matrix(&analysis)[0];
        assert_eq!(row.score, 80);
        assert_eq!(row.weighted_score, 16.0);
        assert_eq!(row.rationale, "skills_match rationale");
    }
}
