use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::scoring::WeightTable;
use crate::llm_client::CompletionOptions;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ANALYSIS_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_SUGGESTION_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Empty disables the provider; every stage then uses its fallback.
    pub openai_api_key: String,
    pub llm_base_url: String,
    pub analysis_model: String,
    pub suggestion_model: String,
    pub llm_timeout: Duration,
    pub database_url: Option<String>,
    pub downloads_dir: PathBuf,
    pub scoring_weights_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY").unwrap_or_default(),
            llm_base_url: env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            analysis_model: env_or("ANALYSIS_MODEL", DEFAULT_ANALYSIS_MODEL),
            suggestion_model: env_or("SUGGESTION_MODEL", DEFAULT_SUGGESTION_MODEL),
            llm_timeout: Duration::from_secs(
                env_or("LLM_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            database_url: optional_env("DATABASE_URL"),
            downloads_dir: PathBuf::from(env_or("DOWNLOADS_DIR", "downloads")),
            scoring_weights_path: optional_env("SCORING_WEIGHTS_PATH").map(PathBuf::from),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// The configured weight table, or the built-in default.
    pub fn weight_table(&self) -> Result<WeightTable> {
        match &self.scoring_weights_path {
            Some(path) => WeightTable::from_json_file(path)
                .with_context(|| format!("Invalid weight table at '{}'", path.display())),
            None => Ok(WeightTable::default()),
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            analysis: CompletionOptions {
                model: self.analysis_model.clone(),
                temperature: 0.2,
                max_tokens: 1800,
            },
            suggestions: CompletionOptions {
                model: self.suggestion_model.clone(),
                temperature: 0.3,
                max_tokens: 2500,
            },
            rewrite: CompletionOptions {
                model: self.suggestion_model.clone(),
                temperature: 0.2,
                max_tokens: 3000,
            },
        }
    }
}

/// Sampling settings per pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub analysis: CompletionOptions,
    pub suggestions: CompletionOptions,
    pub rewrite: CompletionOptions,
}

/// Unset and blank are treated alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Config for tests: no key, no database, downloads under `downloads_dir`.
    pub fn test_config(downloads_dir: PathBuf) -> Config {
        Config {
            openai_api_key: String::new(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            suggestion_model: DEFAULT_SUGGESTION_MODEL.to_string(),
            llm_timeout: Duration::from_secs(5),
            database_url: None,
            downloads_dir,
            scoring_weights_path: None,
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}
