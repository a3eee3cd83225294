pub mod connection;
pub mod import_runs;
