//! Core domain layer. No I/O here.
//!
//! Entities, stages and validation rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod stages;

pub use entities::{HIGH_VALUE_THRESHOLD, Lead, LeadKind, LeadRecord, QUALIFIED_TAG};
pub use errors::DomainError;
pub use stages::Stage;
