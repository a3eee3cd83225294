pub mod memory;
pub mod sqlite;

use crate::domain::error::Result;
use crate::domain::import::CandidateLead;
use crate::domain::lead::LeadId;
use async_trait::async_trait;

pub use memory::MemoryLeadStore;
pub use sqlite::SqliteLeadStore;

/// Persisted lead store. The unique normalized-email constraint behind `insert`
/// is the final arbiter of lead identity across concurrent imports.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Cheap reachability check. `Err(AppError::StoreUnavailable)` when down.
    async fn ping(&self) -> Result<()>;

    async fn find_by_normalized_email(&self, email: &str) -> Result<Option<LeadId>>;

    /// `Err(AppError::Conflict)` when a lead with the same normalized email exists.
    async fn insert(&self, candidate: &CandidateLead) -> Result<LeadId>;
}
