//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive flow: enumerate conversations, let the user pick,
    /// download the selected media. Returns when the pass is complete.
    async fn run(&self) -> Result<(), DomainError>;
}
