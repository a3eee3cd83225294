pub mod config;
pub mod db;
pub mod decoder;
pub mod lead_store;
