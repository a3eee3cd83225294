use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::import::{ImportRun, ImportState, ImportSummary};

/// Audit trail of import runs, one row per upload.
pub struct ImportRunRepository {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRunRecord {
    pub id: String,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_sha256: String,
    pub status: String,
    pub summary: Option<ImportSummary>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, run: &ImportRun) -> Result<()> {
        let (summary_json, error) = match &run.result {
            Ok(summary) => (
                Some(serde_json::to_string(summary).map_err(|e| {
                    AppError::Internal(format!("Failed to serialize import summary: {}", e))
                })?),
                None,
            ),
            Err(err) => (None, Some(err.to_string())),
        };

        sqlx::query(
            "INSERT INTO import_runs (id, file_name, file_type, file_sha256, status, summary_json, error, started_at, finished_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(run.run_id.to_string())
        .bind(&run.file_name)
        .bind(run.file_type.map(|f| f.as_str()))
        .bind(&run.file_sha256)
        .bind(run.state.as_str())
        .bind(summary_json)
        .bind(error)
        .bind(run.started_at)
        .bind(run.finished_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to record import run: {}", e)))?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<ImportRunRecord> {
        let entity = sqlx::query_as::<_, ImportRunEntity>(
            "SELECT id, file_name, file_type, file_sha256, status, summary_json, error, started_at, finished_at
             FROM import_runs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch import run: {}", e)))?
        .ok_or_else(|| AppError::DatabaseError(format!("Import run not found: {}", id)))?;

        entity.try_into()
    }

    /// Most recent runs for the same file content, newest first.
    pub async fn list_by_sha256(&self, file_sha256: &str, limit: i64) -> Result<Vec<ImportRunRecord>> {
        let entities = sqlx::query_as::<_, ImportRunEntity>(
            "SELECT id, file_name, file_type, file_sha256, status, summary_json, error, started_at, finished_at
             FROM import_runs WHERE file_sha256 = ? ORDER BY started_at DESC LIMIT ?",
        )
        .bind(file_sha256)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list import runs: {}", e)))?;

        entities.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ImportRunEntity {
    id: String,
    file_name: String,
    file_type: Option<String>,
    file_sha256: String,
    status: String,
    summary_json: Option<String>,
    error: Option<String>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl TryFrom<ImportRunEntity> for ImportRunRecord {
    type Error = AppError;

    fn try_from(e: ImportRunEntity) -> Result<Self> {
        let summary = e
            .summary_json
            .as_deref()
            .map(serde_json::from_str::<ImportSummary>)
            .transpose()
            .map_err(|err| AppError::Internal(format!("Corrupt summary_json for run {}: {}", e.id, err)))?;

        Ok(Self {
            id: e.id,
            file_name: e.file_name,
            file_type: e.file_type,
            file_sha256: e.file_sha256,
            status: e.status,
            summary,
            error: e.error,
            started_at: e.started_at,
            finished_at: e.finished_at,
        })
    }
}

impl ImportRunRecord {
    pub fn is_done(&self) -> bool {
        self.status == ImportState::Done.as_str()
    }
}
