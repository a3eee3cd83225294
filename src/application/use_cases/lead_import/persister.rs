use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::error::AppError;
use crate::domain::import::{CandidateLead, PersistenceResult};
use crate::infrastructure::lead_store::LeadStore;

/// Inserts `New` rows independently. A failed row never rolls back or blocks the others.
pub(super) struct Persister {
    store: Arc<dyn LeadStore>,
    concurrency: usize,
}

impl Persister {
    pub(super) fn new(store: Arc<dyn LeadStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns one result per input row, in input order.
    ///
    /// Rows are inserted in batches of `concurrency`. Once the store reports itself
    /// unavailable, rows of later batches are rejected without being attempted.
    pub(super) async fn persist(
        &self,
        rows: Vec<CandidateLead>,
    ) -> Vec<(CandidateLead, PersistenceResult)> {
        let mut results: Vec<Option<PersistenceResult>> = vec![None; rows.len()];
        let mut store_down: Option<String> = None;

        for batch_start in (0..rows.len()).step_by(self.concurrency) {
            if store_down.is_some() {
                break;
            }
            let batch_end = (batch_start + self.concurrency).min(rows.len());

            let mut tasks = JoinSet::new();
            for (idx, candidate) in rows.iter().enumerate().take(batch_end).skip(batch_start) {
                let store = Arc::clone(&self.store);
                let candidate = candidate.clone();
                tasks.spawn(async move { (idx, store.insert(&candidate).await) });
            }

            while let Some(joined) = tasks.join_next().await {
                let (idx, outcome) = match joined {
                    Ok(done) => done,
                    Err(e) => {
                        tracing::error!(error = %e, "Insert task aborted");
                        continue;
                    }
                };
                let row_index = rows[idx].row_index;

                results[idx] = Some(match outcome {
                    Ok(lead_id) => PersistenceResult::Inserted { lead_id },
                    Err(AppError::StoreUnavailable(msg)) => {
                        tracing::error!(row_index, error = %msg, "Lead store unavailable during insert");
                        store_down.get_or_insert_with(|| msg.clone());
                        PersistenceResult::Rejected {
                            reason: format!("Store unavailable: {}", msg),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            row_index,
                            email = %rows[idx].email,
                            error = %err,
                            "Lead insert rejected"
                        );
                        PersistenceResult::Rejected {
                            reason: err.to_string(),
                        }
                    }
                });
            }
        }

        if let Some(msg) = &store_down {
            let skipped = results.iter().filter(|r| r.is_none()).count();
            if skipped > 0 {
                tracing::error!(skipped, "Rows not attempted after lead store outage");
            }
            for slot in results.iter_mut().filter(|r| r.is_none()) {
                *slot = Some(PersistenceResult::Rejected {
                    reason: format!("Not attempted, store unavailable: {}", msg),
                });
            }
        }

        rows.into_iter()
            .zip(results)
            .map(|(candidate, result)| {
                let result = result.unwrap_or_else(|| PersistenceResult::Rejected {
                    reason: "Insert task did not complete".to_string(),
                });
                (candidate, result)
            })
            .collect()
    }
}
