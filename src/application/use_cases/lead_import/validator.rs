use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::import::{CandidateLead, LeadField, ValidationOutcome};

/// Non-empty local part before the first `@`, non-empty domain, no whitespace anywhere.
static EMAIL_SHAPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@\S+$").unwrap());

/// Classify a candidate. Never fails; malformed input yields `Invalid`.
pub(super) fn validate(candidate: CandidateLead) -> ValidationOutcome {
    let mut missing_fields = Vec::new();
    let mut malformed_fields = Vec::new();

    if candidate.name.trim().is_empty() {
        missing_fields.push(LeadField::Name);
    }

    if candidate.email.is_empty() {
        missing_fields.push(LeadField::Email);
    } else if !is_email_shaped(&candidate.email) {
        malformed_fields.push(LeadField::Email);
    }

    if missing_fields.is_empty() && malformed_fields.is_empty() {
        ValidationOutcome::Valid(candidate)
    } else {
        ValidationOutcome::Invalid {
            candidate,
            missing_fields,
            malformed_fields,
        }
    }
}

pub(super) fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, email: &str) -> CandidateLead {
        CandidateLead {
            row_index: 1,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            subject: None,
            details: None,
        }
    }

    #[test]
    fn test_valid_candidate() {
        assert!(validate(candidate("Alice", "alice@x.com")).is_valid());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email_shaped("a@b"));
        assert!(is_email_shaped("first.last+tag@example.co.uk"));
        assert!(is_email_shaped("a@b@c"));
        assert!(!is_email_shaped("alice"));
        assert!(!is_email_shaped("@x.com"));
        assert!(!is_email_shaped("alice@"));
        assert!(!is_email_shaped("al ice@x.com"));
        assert!(!is_email_shaped("alice@x .com"));
    }

    #[test]
    fn test_missing_email() {
        match validate(candidate("Alice", "")) {
            ValidationOutcome::Invalid {
                missing_fields,
                malformed_fields,
                ..
            } => {
                assert_eq!(missing_fields, vec![LeadField::Email]);
                assert!(malformed_fields.is_empty());
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_and_malformed_email() {
        match validate(candidate("  ", "not-an-email")) {
            ValidationOutcome::Invalid {
                missing_fields,
                malformed_fields,
                ..
            } => {
                assert_eq!(missing_fields, vec![LeadField::Name]);
                assert_eq!(malformed_fields, vec![LeadField::Email]);
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }
}
