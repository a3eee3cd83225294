use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::import::{
    DecodedSheet, DedupDecision, FileFormat, ImportRun, ImportState, ImportSummary, RowOutcome,
    ValidationOutcome,
};
use crate::infrastructure::config::ImportConfig;
use crate::infrastructure::decoder::FileDecoder;
use crate::infrastructure::lead_store::LeadStore;

mod context;
mod deduplicator;
mod normalizer;
mod persister;
mod summary;
mod validator;


use self::context::ImportContext;
use self::deduplicator::Deduplicator;
use self::normalizer::normalize_rows;
use self::persister::Persister;
use self::summary::build_summary;
use self::validator::validate;

/// Runs one upload through decode, normalize, validate, dedup, persist and summarize.
///
/// Only decoding (which includes the store reachability check) can abort a run.
/// Every later stage records per-row outcomes and the run always reaches `Done`.
pub struct LeadImportUseCase {
    store: Arc<dyn LeadStore>,
    decoder: FileDecoder,
    persister: Persister,
}

impl LeadImportUseCase {
    pub fn new(store: Arc<dyn LeadStore>, config: &ImportConfig) -> Self {
        Self {
            decoder: FileDecoder::new(config),
            persister: Persister::new(Arc::clone(&store), config.insert_concurrency),
            store,
        }
    }

    /// Import and return the summary, or the single fatal error.
    pub async fn import(&self, file_name: &str, bytes: &[u8]) -> Result<ImportSummary> {
        self.execute(file_name, bytes).await.result
    }

    /// Import and return the full run record for auditing.
    pub async fn execute(&self, file_name: &str, bytes: &[u8]) -> ImportRun {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let file_sha256 = hex::encode(Sha256::digest(bytes));

        let span = tracing::info_span!("lead_import", %run_id, file_name);
        let mut ctx = ImportContext::new(run_id);
        let result = self
            .run_pipeline(&mut ctx, file_name, bytes)
            .instrument(span)
            .await;
        debug_assert!(ctx.state().is_terminal());

        ImportRun {
            run_id,
            file_name: file_name.to_string(),
            file_type: FileFormat::from_file_name(file_name).ok(),
            file_sha256,
            state: ctx.state(),
            started_at,
            finished_at: Utc::now(),
            result,
        }
    }

    async fn run_pipeline(
        &self,
        ctx: &mut ImportContext,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportSummary> {
        tracing::info!(bytes = bytes.len(), "Starting lead import");

        let sheet = match self.decode(file_name, bytes).await {
            Ok(sheet) => sheet,
            Err(err) => {
                ctx.fail(&err);
                return Err(err);
            }
        };
        tracing::info!(
            format = sheet.format.as_str(),
            rows = sheet.rows.len(),
            "Decoded upload"
        );

        ctx.advance(ImportState::Normalizing);
        let candidates = normalize_rows(&sheet);
        drop(sheet);

        ctx.advance(ImportState::Validating);
        let mut valid = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match validate(candidate) {
                ValidationOutcome::Valid(candidate) => valid.push(candidate),
                ValidationOutcome::Invalid {
                    candidate,
                    missing_fields,
                    malformed_fields,
                } => {
                    tracing::debug!(
                        row_index = candidate.row_index,
                        missing = ?missing_fields,
                        malformed = ?malformed_fields,
                        "Invalid row"
                    );
                    ctx.record(RowOutcome::invalid(&candidate, missing_fields, malformed_fields));
                }
            }
        }

        ctx.advance(ImportState::Deduplicating);
        let decisions = Deduplicator::new(self.store.as_ref()).classify(valid).await;
        let mut new_rows = Vec::new();
        for decision in decisions {
            match decision {
                DedupDecision::New(candidate) => new_rows.push(candidate),
                other => {
                    if let Some(outcome) = RowOutcome::from_decision(&other) {
                        ctx.record(outcome);
                    }
                }
            }
        }

        ctx.advance(ImportState::Persisting);
        let attempted = new_rows.len();
        for (candidate, result) in self.persister.persist(new_rows).await {
            ctx.record(RowOutcome::persisted(&candidate, result));
        }

        ctx.advance(ImportState::Summarizing);
        let summary = build_summary(ctx.take_outcomes());
        debug_assert!(summary.is_consistent(), "inconsistent summary: {:?}", summary);

        ctx.advance(ImportState::Done);
        if summary.rejected_count > 0 {
            tracing::warn!(
                rejected = summary.rejected_count,
                attempted,
                "Import finished with rejected rows"
            );
        }
        tracing::info!(
            total = summary.total_rows,
            valid = summary.valid_rows,
            invalid = summary.invalid_rows,
            imported = summary.new_leads,
            duplicates = summary.duplicate_leads,
            rejected = summary.rejected_count,
            "Lead import complete"
        );

        Ok(summary)
    }

    /// Decode the upload and make sure the store is reachable before any row is touched.
    async fn decode(&self, file_name: &str, bytes: &[u8]) -> Result<DecodedSheet> {
        let sheet = self.decoder.decode(file_name, bytes)?;
        self.store.ping().await?;
        Ok(sheet)
    }
}
