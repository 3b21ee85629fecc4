//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// User input broke a domain rule. Recoverable: re-prompt or abort the single action.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("UI error: {0}")]
    Ui(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
