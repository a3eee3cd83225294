// ============================================================
// LEAD IMPORT DOMAIN LAYER
// ============================================================
// Value types flowing through one import run
// No I/O, no async

mod candidate;
mod file_format;
mod header_map;
mod outcome;
mod raw_row;
mod run;
mod summary;

pub use candidate::{normalize_email, CandidateLead};
pub use file_format::FileFormat;
pub use header_map::{HeaderMap, LeadField, HEADER_ALIASES};
pub use outcome::{DedupDecision, PersistenceResult, RowOutcome, RowStatus, ValidationOutcome};
pub use raw_row::{DecodedSheet, RawRow};
pub use run::{ImportReply, ImportRun, ImportState};
pub use summary::{ImportFailureResponse, ImportResponse, ImportSummary};
