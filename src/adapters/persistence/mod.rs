//! Persistence adapters. JSON storage and CSV export.

pub mod csv_export;
pub mod json_repo;

pub use csv_export::leads_to_csv;
pub use json_repo::JsonLeadRepo;
