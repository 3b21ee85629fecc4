//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Lead};
use std::path::{Path, PathBuf};

/// Lead repository. Sole owner of on-disk state.
///
/// Every call reads the whole collection from storage; nothing is cached between calls.
#[async_trait::async_trait]
pub trait LeadRepoPort: Send + Sync {
    /// All stored leads, each rebuilt as its tagged variant.
    /// Missing or malformed storage yields an empty list.
    async fn list_all(&self) -> Result<Vec<Lead>, DomainError>;

    /// Append one lead: load everything, push, rewrite everything.
    async fn add(&self, lead: &Lead) -> Result<(), DomainError>;

    /// Replace the stored collection with `leads`.
    async fn save_all(&self, leads: &[Lead]) -> Result<(), DomainError>;

    /// Case-insensitive substring search over name, company and email.
    /// An empty query returns nothing.
    async fn search(&self, query: &str) -> Result<Vec<Lead>, DomainError>;

    /// First lead whose email matches case-insensitively.
    async fn get_by_email(&self, email: &str) -> Result<Option<Lead>, DomainError>;

    /// Write every lead as CSV to `path` (or the default export path).
    ///
    /// Returns `Ok(None)` when the target cannot be opened for writing
    /// (permission denied or locked by another program).
    async fn export_csv(&self, path: Option<&Path>) -> Result<Option<PathBuf>, DomainError>;

    /// Number of stored leads.
    async fn count(&self) -> Result<usize, DomainError>;
}
