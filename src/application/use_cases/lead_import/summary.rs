use crate::domain::import::{ImportSummary, RowOutcome, RowStatus};

/// Fold terminal row outcomes into the run summary. Lists come out in row order.
pub(super) fn build_summary(mut outcomes: Vec<RowOutcome>) -> ImportSummary {
    outcomes.sort_by_key(|o| o.row_index);

    let mut summary = ImportSummary {
        total_rows: outcomes.len(),
        ..Default::default()
    };

    for outcome in outcomes {
        match outcome.status {
            RowStatus::Invalid { .. } => summary.invalid_rows += 1,
            RowStatus::FileDuplicate { .. } => {
                summary.duplicate_leads += 1;
                summary.file_internal_duplicates.push(outcome.email);
            }
            RowStatus::StoreDuplicate { .. } => {
                summary.duplicate_leads += 1;
                summary.duplicate_emails.push(outcome.email);
            }
            RowStatus::Inserted { .. } => summary.new_leads += 1,
            RowStatus::Rejected { .. } => summary.rejected_count += 1,
        }
    }
    summary.valid_rows = summary.total_rows - summary.invalid_rows;

    summary
}
