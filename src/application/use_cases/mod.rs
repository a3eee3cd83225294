pub mod lead_import;
