use uuid::Uuid;

use crate::domain::error::AppError;
use crate::domain::import::{ImportState, RowOutcome};

/// Per-run pipeline state. Created fresh for every upload and never shared,
/// so concurrent imports cannot see each other's rows.
#[derive(Debug)]
pub(super) struct ImportContext {
    run_id: Uuid,
    state: ImportState,
    outcomes: Vec<RowOutcome>,
}

impl ImportContext {
    pub(super) fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            state: ImportState::Decoding,
            outcomes: Vec::new(),
        }
    }

    pub(super) fn state(&self) -> ImportState {
        self.state
    }

    pub(super) fn advance(&mut self, to: ImportState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "illegal import transition {:?} -> {:?}",
            self.state,
            to
        );
        tracing::debug!(run_id = %self.run_id, from = self.state.as_str(), to = to.as_str(), "Import state");
        self.state = to;
    }

    pub(super) fn fail(&mut self, err: &AppError) {
        tracing::error!(run_id = %self.run_id, state = self.state.as_str(), error = %err, "Import aborted");
        self.advance(ImportState::Failed);
    }

    pub(super) fn record(&mut self, outcome: RowOutcome) {
        self.outcomes.push(outcome);
    }

    pub(super) fn take_outcomes(&mut self) -> Vec<RowOutcome> {
        std::mem::take(&mut self.outcomes)
    }
}
