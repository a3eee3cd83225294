use serde::{Deserialize, Serialize};

/// Canonical lead fields an upload column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadField {
    Name,
    Email,
    Phone,
    Subject,
    Details,
}

impl LeadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
            LeadField::Subject => "subject",
            LeadField::Details => "details",
        }
    }

    /// Resolve a header cell against [`HEADER_ALIASES`]. Case-insensitive, exact text.
    pub fn from_header(header: &str) -> Option<Self> {
        let key = header.trim().to_lowercase();
        HEADER_ALIASES
            .iter()
            .find(|(alias, _)| alias.to_lowercase() == key)
            .map(|(_, field)| *field)
    }
}

pub const HEADER_ALIASES: &[(&str, LeadField)] = &[
    ("Name", LeadField::Name),
    ("Client Name", LeadField::Name),
    ("Email", LeadField::Email),
    ("Phone", LeadField::Phone),
    ("Phone Number", LeadField::Phone),
    ("Subject", LeadField::Subject),
    ("Lead Details", LeadField::Details),
    ("Lead", LeadField::Details),
    ("Description", LeadField::Details),
];

/// Column index per canonical field, resolved once from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    name_idx: Option<usize>,
    email_idx: Option<usize>,
    phone_idx: Option<usize>,
    subject_idx: Option<usize>,
    details_idx: Option<usize>,
}

impl HeaderMap {
    /// Leftmost column wins when several headers resolve to the same field.
    /// Unrecognized headers are ignored.
    pub fn resolve(headers: &[String]) -> Self {
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let Some(field) = LeadField::from_header(header) else {
                continue;
            };
            let slot = mapping.slot_mut(field);
            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        mapping
    }

    pub fn column(&self, field: LeadField) -> Option<usize> {
        match field {
            LeadField::Name => self.name_idx,
            LeadField::Email => self.email_idx,
            LeadField::Phone => self.phone_idx,
            LeadField::Subject => self.subject_idx,
            LeadField::Details => self.details_idx,
        }
    }

    pub fn unmapped(&self) -> Vec<LeadField> {
        [
            LeadField::Name,
            LeadField::Email,
            LeadField::Phone,
            LeadField::Subject,
            LeadField::Details,
        ]
        .into_iter()
        .filter(|f| self.column(*f).is_none())
        .collect()
    }

    fn slot_mut(&mut self, field: LeadField) -> &mut Option<usize> {
        match field {
            LeadField::Name => &mut self.name_idx,
            LeadField::Email => &mut self.email_idx,
            LeadField::Phone => &mut self.phone_idx,
            LeadField::Subject => &mut self.subject_idx,
            LeadField::Details => &mut self.details_idx,
        }
    }
}
