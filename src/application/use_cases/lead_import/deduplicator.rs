use std::collections::HashMap;

use crate::domain::error::AppError;
use crate::domain::import::{CandidateLead, DedupDecision};
use crate::infrastructure::lead_store::LeadStore;

/// First-seen tracking of normalized emails among valid rows of one file.
#[derive(Debug, Default)]
pub(super) struct InFileTracker {
    first_seen: HashMap<String, usize>,
}

impl InFileTracker {
    /// `None` for the first occurrence of an email, otherwise the row that claimed it.
    pub(super) fn observe(&mut self, candidate: &CandidateLead) -> Option<usize> {
        match self.first_seen.get(&candidate.email) {
            Some(first_row_index) => Some(*first_row_index),
            None => {
                self.first_seen
                    .insert(candidate.email.clone(), candidate.row_index);
                None
            }
        }
    }
}

/// Classifies valid candidates in row order: in-file duplicates first, then the store.
///
/// The order is load-bearing. A row only reaches the store lookup after it has
/// won the in-file check, so `FileDuplicate` and `StoreDuplicate` never overlap.
pub(super) struct Deduplicator<'a> {
    store: &'a dyn LeadStore,
}

impl<'a> Deduplicator<'a> {
    pub(super) fn new(store: &'a dyn LeadStore) -> Self {
        Self { store }
    }

    pub(super) async fn classify(&self, valid: Vec<CandidateLead>) -> Vec<DedupDecision> {
        let mut tracker = InFileTracker::default();
        let mut store_down: Option<String> = None;
        let mut decisions = Vec::with_capacity(valid.len());

        for candidate in valid {
            if let Some(first_row_index) = tracker.observe(&candidate) {
                tracing::debug!(
                    row_index = candidate.row_index,
                    first_row_index,
                    email = %candidate.email,
                    "Duplicate email within file"
                );
                decisions.push(DedupDecision::FileDuplicate {
                    candidate,
                    first_row_index,
                });
                continue;
            }

            if let Some(reason) = &store_down {
                decisions.push(DedupDecision::LookupFailed {
                    candidate,
                    reason: reason.clone(),
                });
                continue;
            }

            let decision = match self.store.find_by_normalized_email(&candidate.email).await {
                Ok(None) => DedupDecision::New(candidate),
                Ok(Some(existing_lead_id)) => {
                    tracing::debug!(
                        row_index = candidate.row_index,
                        existing_lead_id,
                        email = %candidate.email,
                        "Email already in lead store"
                    );
                    DedupDecision::StoreDuplicate {
                        candidate,
                        existing_lead_id,
                    }
                }
                Err(AppError::StoreUnavailable(msg)) => {
                    tracing::error!(
                        row_index = candidate.row_index,
                        error = %msg,
                        "Lead store became unavailable during duplicate lookup; rejecting remaining rows"
                    );
                    let reason = format!("Store unavailable during duplicate lookup: {}", msg);
                    store_down = Some(reason.clone());
                    DedupDecision::LookupFailed { candidate, reason }
                }
                Err(err) => {
                    tracing::warn!(
                        row_index = candidate.row_index,
                        error = %err,
                        "Duplicate lookup failed for row"
                    );
                    DedupDecision::LookupFailed {
                        candidate,
                        reason: format!("Duplicate lookup failed: {}", err),
                    }
                }
            };
            decisions.push(decision);
        }

        decisions
    }
}
