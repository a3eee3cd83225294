use serde::{Deserialize, Serialize};

use super::{CandidateLead, LeadField};
use crate::domain::lead::LeadId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(CandidateLead),
    Invalid {
        candidate: CandidateLead,
        missing_fields: Vec<LeadField>,
        malformed_fields: Vec<LeadField>,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupDecision {
    New(CandidateLead),
    FileDuplicate {
        candidate: CandidateLead,
        first_row_index: usize,
    },
    StoreDuplicate {
        candidate: CandidateLead,
        existing_lead_id: LeadId,
    },
    /// The store lookup could not be made for this row. Terminal: counted as rejected.
    LookupFailed {
        candidate: CandidateLead,
        reason: String,
    },
}

impl DedupDecision {
    pub fn candidate(&self) -> &CandidateLead {
        match self {
            DedupDecision::New(candidate) => candidate,
            DedupDecision::FileDuplicate { candidate, .. } => candidate,
            DedupDecision::StoreDuplicate { candidate, .. } => candidate,
            DedupDecision::LookupFailed { candidate, .. } => candidate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PersistenceResult {
    Inserted { lead_id: LeadId },
    Rejected { reason: String },
}

/// Terminal classification of one raw row. Every row ends in exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RowStatus {
    Invalid {
        missing_fields: Vec<LeadField>,
        malformed_fields: Vec<LeadField>,
    },
    FileDuplicate { first_row_index: usize },
    StoreDuplicate { existing_lead_id: LeadId },
    Inserted { lead_id: LeadId },
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOutcome {
    pub row_index: usize,
    pub email: String,
    #[serde(flatten)]
    pub status: RowStatus,
}

impl RowOutcome {
    pub fn invalid(
        candidate: &CandidateLead,
        missing_fields: Vec<LeadField>,
        malformed_fields: Vec<LeadField>,
    ) -> Self {
        Self {
            row_index: candidate.row_index,
            email: candidate.email.clone(),
            status: RowStatus::Invalid {
                missing_fields,
                malformed_fields,
            },
        }
    }

    pub fn from_decision(decision: &DedupDecision) -> Option<Self> {
        let candidate = decision.candidate();
        let status = match decision {
            DedupDecision::New(_) => return None,
            DedupDecision::FileDuplicate {
                first_row_index, ..
            } => RowStatus::FileDuplicate {
                first_row_index: *first_row_index,
            },
            DedupDecision::StoreDuplicate {
                existing_lead_id, ..
            } => RowStatus::StoreDuplicate {
                existing_lead_id: *existing_lead_id,
            },
            DedupDecision::LookupFailed { reason, .. } => RowStatus::Rejected {
                reason: reason.clone(),
            },
        };

        Some(Self {
            row_index: candidate.row_index,
            email: candidate.email.clone(),
            status,
        })
    }

    pub fn persisted(candidate: &CandidateLead, result: PersistenceResult) -> Self {
        let status = match result {
            PersistenceResult::Inserted { lead_id } => RowStatus::Inserted { lead_id },
            PersistenceResult::Rejected { reason } => RowStatus::Rejected { reason },
        };
        Self {
            row_index: candidate.row_index,
            email: candidate.email.clone(),
            status,
        }
    }
}
