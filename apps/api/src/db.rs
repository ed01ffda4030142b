use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::analysis::{Analysis, ScoreMatrixRow};
use crate::models::suggestion::SuggestionSet;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// One completed compare request, as stored in `analyses`.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub overall_score: f64,
    pub recommendation: Option<String>,
    pub is_demo: bool,
    pub fallback_reason: Option<String>,
    pub payload: serde_json::Value,
}

impl AnalysisRecord {
    pub fn new(
        analysis: &Analysis,
        matrix: &[ScoreMatrixRow],
        suggestions: &SuggestionSet,
        report_file: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            overall_score: analysis.overall_score,
            recommendation: analysis.recommendation.map(|r| r.as_str().to_string()),
            is_demo: analysis.provenance.is_demo(),
            fallback_reason: analysis.provenance.reason().map(|r| r.as_str().to_string()),
            payload: serde_json::json!({
                "analysis": analysis,
                "matrix": matrix,
                "suggestions": suggestions,
                "report_file": report_file,
            }),
        }
    }
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn insert(&self, record: &AnalysisRecord) -> Result<()>;
}

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    /// Wraps the pool and creates the `analyses` table if it does not exist.
    pub async fn connect(pool: PgPool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analyses (
                id              UUID PRIMARY KEY,
                created_at      TIMESTAMPTZ NOT NULL,
                overall_score   DOUBLE PRECISION NOT NULL,
                recommendation  TEXT,
                is_demo         BOOLEAN NOT NULL,
                fallback_reason TEXT,
                payload         JSONB NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn insert(&self, record: &AnalysisRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analyses
                (id, created_at, overall_score, recommendation, is_demo, fallback_reason, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.created_at)
        .bind(record.overall_score)
        .bind(&record.recommendation)
        .bind(record.is_demo)
        .bind(&record.fallback_reason)
        .bind(&record.payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Used when no DATABASE_URL is configured.
pub struct DisabledStore;

#[async_trait]
impl AnalysisStore for DisabledStore {
    async fn insert(&self, _record: &AnalysisRecord) -> Result<()> {
        Ok(())
    }
}

/// Fire-and-forget insert. Failures are logged, never surfaced to the request.
pub fn persist_in_background(store: Arc<dyn AnalysisStore>, record: AnalysisRecord) {
    tokio::spawn(async move {
        match store.insert(&record).await {
            Ok(()) => info!(id = %record.id, "Analysis persisted"),
            Err(e) => warn!(id = %record.id, "Failed to persist analysis: {e:#}"),
        }
    });
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Captures inserted records in memory.
    #[derive(Default)]
    pub struct MemoryStore {
        pub records: Mutex<Vec<AnalysisRecord>>,
    }

    #[async_trait]
    impl AnalysisStore for MemoryStore {
        async fn insert(&self, record: &AnalysisRecord) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }
}
