mod app;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::LeadImportUseCase;
pub use domain::error::{AppError, Result};
pub use domain::import::{ImportReply, ImportSummary};
pub use infrastructure::config::AppConfig;
pub use infrastructure::lead_store::{LeadStore, MemoryLeadStore, SqliteLeadStore};
