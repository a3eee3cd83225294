use crate::domain::import::{normalize_email, CandidateLead, DecodedSheet, HeaderMap, LeadField, RawRow};

/// Map every raw row to a candidate through a header map resolved once per sheet.
pub(super) fn normalize_rows(sheet: &DecodedSheet) -> Vec<CandidateLead> {
    let mapping = HeaderMap::resolve(&sheet.headers);

    let unmapped = mapping.unmapped();
    if !unmapped.is_empty() {
        tracing::debug!(
            unmapped = ?unmapped.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
            "Lead fields without a matching column"
        );
    }

    sheet
        .rows
        .iter()
        .map(|row| normalize_row(&mapping, row))
        .collect()
}

pub(super) fn normalize_row(mapping: &HeaderMap, row: &RawRow) -> CandidateLead {
    let cell = |field: LeadField| -> String {
        mapping
            .column(field)
            .and_then(|idx| row.cell(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };
    let optional = |field: LeadField| Some(cell(field)).filter(|s| !s.is_empty());

    CandidateLead {
        row_index: row.row_index,
        name: cell(LeadField::Name),
        email: normalize_email(&cell(LeadField::Email)),
        phone: optional(LeadField::Phone),
        subject: optional(LeadField::Subject),
        details: optional(LeadField::Details),
    }
}
