use serde::{Deserialize, Serialize};

/// Complete report of row-level outcomes for one import run.
///
/// Lists are never truncated here; capping them for display belongs to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    /// Successfully inserted leads.
    pub new_leads: usize,
    /// File duplicates plus store duplicates.
    pub duplicate_leads: usize,
    pub rejected_count: usize,
    pub duplicate_emails: Vec<String>,
    pub file_internal_duplicates: Vec<String>,
}

impl ImportSummary {
    /// Checks the counting invariants every finished summary must satisfy.
    pub fn is_consistent(&self) -> bool {
        self.total_rows == self.valid_rows + self.invalid_rows
            && self.new_leads + self.duplicate_leads <= self.valid_rows
            && self.valid_rows == self.new_leads + self.duplicate_leads + self.rejected_count
            && self.duplicate_leads
                == self.duplicate_emails.len() + self.file_internal_duplicates.len()
    }
}

/// JSON body returned to the caller for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub total: usize,
    pub imported: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub summary: ImportSummary,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            success: true,
            total: summary.total_rows,
            imported: summary.new_leads,
            duplicates: summary.duplicate_leads,
            rejected: summary.rejected_count,
            summary,
        }
    }
}

/// JSON body returned when the run aborted before any row was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailureResponse {
    pub success: bool,
    pub error: String,
}

impl ImportFailureResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_shape() {
        let summary = ImportSummary {
            total_rows: 3,
            valid_rows: 3,
            invalid_rows: 0,
            new_leads: 2,
            duplicate_leads: 1,
            rejected_count: 0,
            duplicate_emails: vec![],
            file_internal_duplicates: vec!["alice@x.com".to_string()],
        };
        let json = serde_json::to_value(ImportResponse::from(summary)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["total"], 3);
        assert_eq!(json["imported"], 2);
        assert_eq!(json["duplicates"], 1);
        assert_eq!(json["rejected"], 0);
        assert_eq!(json["summary"]["totalRows"], 3);
        assert_eq!(json["summary"]["newLeads"], 2);
        assert_eq!(json["summary"]["fileInternalDuplicates"][0], "alice@x.com");
        assert!(json["summary"]["duplicateEmails"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_failure_response_shape() {
        let json = serde_json::to_value(ImportFailureResponse::new("Format error: empty file")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Format error: empty file");
    }

    #[test]
    fn test_consistency_check() {
        let mut summary = ImportSummary {
            total_rows: 2,
            valid_rows: 2,
            new_leads: 1,
            rejected_count: 1,
            ..Default::default()
        };
        assert!(summary.is_consistent());

        summary.invalid_rows = 1;
        assert!(!summary.is_consistent());
    }
}
