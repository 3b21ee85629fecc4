//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the interactive shell drives the lead service until the user exits.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the menu loop. Returns when the user chooses to exit.
    async fn run(&self) -> Result<(), DomainError>;
}
