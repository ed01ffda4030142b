//! Analysis report: summary, score, parameter matrix, strengths and improvements.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use super::{file_timestamp, pdf, Block};
use crate::models::analysis::{Analysis, ScoreMatrixRow};

pub const REPORT_FILE_PREFIX: &str = "Resume_Analysis_Report_";

pub fn report_blocks(analysis: &Analysis, matrix: &[ScoreMatrixRow]) -> Vec<Block> {
    let mut blocks = vec![Block::Title("Resume Analysis Report".to_string())];

    if analysis.provenance.is_demo() {
        blocks.push(Block::Centered(
            "Demo mode: generated by local keyword analysis".to_string(),
        ));
    }

    blocks.push(Block::heading("Executive Summary"));
    blocks.push(Block::paragraph(if analysis.summary.trim().is_empty() {
        "No summary available."
    } else {
        analysis.summary.as_str()
    }));

    let recommendation = analysis
        .recommendation
        .map(|r| r.as_str())
        .unwrap_or("N/A");
    blocks.push(Block::Spacer);
    blocks.push(Block::labeled(
        "Overall Score: ",
        format!(
            "{:.2}/100  |  Recommendation: {recommendation}",
            analysis.overall_score
        ),
    ));

    blocks.push(Block::heading("Detailed Analysis"));
    for row in matrix {
        blocks.push(Block::labeled(
            format!("{}: ", row.parameter),
            format!(
                "score {} x weight {}% = {:.2}",
                row.score, row.weight, row.weighted_score
            ),
        ));
        if !row.rationale.trim().is_empty() {
            blocks.push(Block::Italic(row.rationale.clone()));
        }
    }

    push_list(&mut blocks, "Key Strengths", &analysis.strengths);
    push_list(&mut blocks, "Areas for Improvement", &analysis.improvements);
    push_list(&mut blocks, "Missing Elements", &analysis.missing_elements);

    blocks
}

fn push_list(blocks: &mut Vec<Block>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    blocks.push(Block::heading(title));
    blocks.extend(items.iter().map(Block::bullet));
}

/// Renders the report as PDF into `dir` and returns the new file's name.
/// The file appears atomically: written to a temp file, then renamed.
pub fn write_report(dir: &Path, analysis: &Analysis, matrix: &[ScoreMatrixRow]) -> Result<String> {
    let bytes = pdf::write_pdf("Resume Analysis Report", &report_blocks(analysis, matrix))?;
    let file_name = format!("{REPORT_FILE_PREFIX}{}.pdf", file_timestamp());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create downloads dir '{}'", dir.display()))?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(dir.join(&file_name))
        .with_context(|| format!("Failed to persist report '{file_name}'"))?;

    info!(file = %file_name, "Analysis report written");
    Ok(file_name)
}
