//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, EmailContent, SearchOutput, SearchRequest};

/// AI web-search agent. Returns a schema-validated item list or fails.
#[async_trait::async_trait]
pub trait SearchPort: Send + Sync {
    /// Run one search. Single attempt, no retry.
    ///
    /// Returns `DomainError::NoSearchOutput` when the agent produced nothing to parse.
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutput, DomainError>;
}

/// Outbound mail transport.
#[async_trait::async_trait]
pub trait MailPort: Send + Sync {
    /// Deliver `content` to every address in `recipients` in a single message.
    ///
    /// # Errors
    /// `MissingSmtpUser` / `MissingSmtpPassword` when credentials are absent,
    /// `Mail` for address or transport failures.
    async fn send(&self, recipients: &[String], content: &EmailContent)
    -> Result<(), DomainError>;
}
