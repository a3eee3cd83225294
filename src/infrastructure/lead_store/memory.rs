use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::LeadStore;
use crate::domain::error::{AppError, Result};
use crate::domain::import::{normalize_email, CandidateLead};
use crate::domain::lead::LeadId;

/// In-process lead store keyed by normalized email.
///
/// Supports failure injection: per-email insert rejection, and the store going
/// away after a number of lookups or inserts.
#[derive(Default)]
pub struct MemoryLeadStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    leads: HashMap<String, LeadId>,
    next_id: LeadId,
    rejected_emails: HashSet<String>,
    unavailable: bool,
    lookups_before_outage: Option<usize>,
    inserts_before_outage: Option<usize>,
    lookups: usize,
    inserts: usize,
}

impl MemoryState {
    fn allocate(&mut self, email: String) -> LeadId {
        self.next_id += 1;
        self.leads.insert(email, self.next_id);
        self.next_id
    }
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add an existing lead without going through the import path.
    pub fn seed(&self, email: &str) -> LeadId {
        self.state().allocate(normalize_email(email))
    }

    /// Inserts for this email fail with a store-level rejection.
    pub fn reject_inserts_for(&self, email: &str) {
        self.state().rejected_emails.insert(normalize_email(email));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// After `n` successful lookups every further call reports the store unavailable.
    pub fn fail_after_lookups(&self, n: usize) {
        self.state().lookups_before_outage = Some(n);
    }

    /// After `n` insert attempts every further call reports the store unavailable.
    pub fn fail_after_inserts(&self, n: usize) {
        self.state().inserts_before_outage = Some(n);
    }

    pub fn len(&self) -> usize {
        self.state().leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, email: &str) -> bool {
        self.state().leads.contains_key(&normalize_email(email))
    }
}

fn unavailable() -> AppError {
    AppError::StoreUnavailable("memory lead store is offline".to_string())
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn ping(&self) -> Result<()> {
        if self.state().unavailable {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn find_by_normalized_email(&self, email: &str) -> Result<Option<LeadId>> {
        let mut state = self.state();
        if state.unavailable {
            return Err(unavailable());
        }
        if let Some(limit) = state.lookups_before_outage {
            if state.lookups >= limit {
                state.unavailable = true;
                return Err(unavailable());
            }
        }
        state.lookups += 1;

        Ok(state.leads.get(&normalize_email(email)).copied())
    }

    async fn insert(&self, candidate: &CandidateLead) -> Result<LeadId> {
        let mut state = self.state();
        if state.unavailable {
            return Err(unavailable());
        }
        if let Some(limit) = state.inserts_before_outage {
            if state.inserts >= limit {
                state.unavailable = true;
                return Err(unavailable());
            }
        }
        state.inserts += 1;

        let key = normalize_email(&candidate.email);
        if state.rejected_emails.contains(&key) {
            return Err(AppError::DatabaseError(format!(
                "insert rejected by store for {}",
                key
            )));
        }
        if state.leads.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "UNIQUE constraint failed: leads.email_normalized ({})",
                key
            )));
        }

        Ok(state.allocate(key))
    }
}
