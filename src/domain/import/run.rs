use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FileFormat, ImportFailureResponse, ImportResponse, ImportSummary};
use crate::domain::error::AppError;

/// Orchestrator states. `Failed` is reachable from `Decoding` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    Decoding,
    Normalizing,
    Validating,
    Deduplicating,
    Persisting,
    Summarizing,
    Done,
    Failed,
}

impl ImportState {
    /// The single forward successor. Terminal states have none.
    pub fn next(self) -> Option<Self> {
        match self {
            ImportState::Decoding => Some(ImportState::Normalizing),
            ImportState::Normalizing => Some(ImportState::Validating),
            ImportState::Validating => Some(ImportState::Deduplicating),
            ImportState::Deduplicating => Some(ImportState::Persisting),
            ImportState::Persisting => Some(ImportState::Summarizing),
            ImportState::Summarizing => Some(ImportState::Done),
            ImportState::Done | ImportState::Failed => None,
        }
    }

    pub fn can_transition_to(self, to: ImportState) -> bool {
        self.next() == Some(to) || (self == ImportState::Decoding && to == ImportState::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ImportState::Done | ImportState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportState::Decoding => "decoding",
            ImportState::Normalizing => "normalizing",
            ImportState::Validating => "validating",
            ImportState::Deduplicating => "deduplicating",
            ImportState::Persisting => "persisting",
            ImportState::Summarizing => "summarizing",
            ImportState::Done => "done",
            ImportState::Failed => "failed",
        }
    }
}

/// One finished import run: either a full summary or the single fatal error.
#[derive(Debug, Clone)]
pub struct ImportRun {
    pub run_id: Uuid,
    pub file_name: String,
    pub file_type: Option<FileFormat>,
    pub file_sha256: String,
    pub state: ImportState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub result: std::result::Result<ImportSummary, AppError>,
}

impl ImportRun {
    pub fn reply(&self) -> ImportReply {
        match &self.result {
            Ok(summary) => ImportReply::Success(ImportResponse::from(summary.clone())),
            Err(err) => ImportReply::Failure(ImportFailureResponse::new(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportReply {
    Success(ImportResponse),
    Failure(ImportFailureResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_walks_forward_to_done() {
        let mut state = ImportState::Decoding;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            assert!(state.can_transition_to(next));
            state = next;
            visited.push(state);
        }
        assert_eq!(state, ImportState::Done);
        assert_eq!(visited.len(), 7);
    }

    #[test]
    fn test_only_decoding_may_fail() {
        assert!(ImportState::Decoding.can_transition_to(ImportState::Failed));
        assert!(!ImportState::Persisting.can_transition_to(ImportState::Failed));
        assert!(!ImportState::Validating.can_transition_to(ImportState::Persisting));
        assert!(ImportState::Failed.is_terminal());
    }
}
