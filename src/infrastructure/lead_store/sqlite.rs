use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::LeadStore;
use crate::domain::error::{AppError, Result};
use crate::domain::import::{normalize_email, CandidateLead};
use crate::domain::lead::{Lead, LeadId, LEAD_SOURCE_IMPORT, LEAD_STATUS_NEW};
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::db::connection::{connect_pool, init_lead_db};

pub struct SqliteLeadStore {
    pool: SqlitePool,
}

impl SqliteLeadStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema is current.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_pool(config).await?;
        init_lead_db(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get_lead(&self, id: LeadId) -> Result<Lead> {
        let lead = sqlx::query_as::<_, LeadEntity>(
            "SELECT id, name, email, phone, subject, details, source, status, created_at
             FROM leads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match lead {
            Some(lead) => Ok(lead.into()),
            None => Err(AppError::DatabaseError(format!("Lead not found: {}", id))),
        }
    }

    pub async fn count_leads(&self) -> Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Lead store health check failed: {}", e)))?;
        Ok(())
    }

    async fn find_by_normalized_email(&self, email: &str) -> Result<Option<LeadId>> {
        Ok(
            sqlx::query_scalar::<_, LeadId>("SELECT id FROM leads WHERE email_normalized = ?")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert(&self, candidate: &CandidateLead) -> Result<LeadId> {
        Ok(sqlx::query_scalar::<_, LeadId>(
            "INSERT INTO leads (name, email, email_normalized, phone, subject, details, source, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(normalize_email(&candidate.email))
        .bind(&candidate.phone)
        .bind(&candidate.subject)
        .bind(&candidate.details)
        .bind(LEAD_SOURCE_IMPORT)
        .bind(LEAD_STATUS_NEW)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?)
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct LeadEntity {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    subject: Option<String>,
    details: Option<String>,
    source: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<LeadEntity> for Lead {
    fn from(e: LeadEntity) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            subject: e.subject,
            details: e.details,
            source: e.source,
            status: e.status,
            created_at: e.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteLeadStore {
        SqliteLeadStore::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    fn candidate(row_index: usize, name: &str, email: &str) -> CandidateLead {
        CandidateLead {
            row_index,
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            subject: None,
            details: Some("Wants a demo".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = memory_store().await;
        store.ping().await.unwrap();

        let id = store.insert(&candidate(1, "Alice", "alice@x.com")).await.unwrap();
        assert_eq!(
            store.find_by_normalized_email("alice@x.com").await.unwrap(),
            Some(id)
        );
        assert_eq!(
            store.find_by_normalized_email("  ALICE@x.com ").await.unwrap(),
            Some(id)
        );
        assert_eq!(store.find_by_normalized_email("bob@x.com").await.unwrap(), None);

        let lead = store.get_lead(id).await.unwrap();
        assert_eq!(lead.name, "Alice");
        assert_eq!(lead.phone.as_deref(), Some("555-0100"));
        assert_eq!(lead.subject, None);
        assert_eq!(lead.source, LEAD_SOURCE_IMPORT);
        assert_eq!(lead.status, LEAD_STATUS_NEW);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = memory_store().await;
        store.insert(&candidate(1, "Alice", "alice@x.com")).await.unwrap();

        let err = store
            .insert(&candidate(7, "Alice Again", "alice@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.count_leads().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_is_store_unavailable() {
        let store = memory_store().await;
        store.pool().close().await;

        assert!(matches!(store.ping().await, Err(AppError::StoreUnavailable(_))));
        assert!(matches!(
            store.find_by_normalized_email("alice@x.com").await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
