use serde::{Deserialize, Serialize};

/// A normalized, not yet validated lead derived from one raw row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLead {
    pub row_index: usize,
    pub name: String,
    /// Trimmed and lowercased. The sole identity key for deduplication.
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub details: Option<String>,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  A@B.com "), "a@b.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
    }

    #[test]
    fn test_normalize_email_keeps_dots_and_tags() {
        assert_eq!(normalize_email("First.Last+tag@Example.COM"), "first.last+tag@example.com");
    }
}
