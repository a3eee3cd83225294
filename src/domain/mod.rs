pub mod error;
pub mod lead;

// Lead import pipeline types
pub mod import;
