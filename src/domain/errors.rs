//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A secret the run cannot start without (e.g. OPENAI_API_KEY).
    #[error("Missing required secret: {0}")]
    MissingSecret(&'static str),

    #[error("Search agent error: {0}")]
    Search(String),

    /// The agent answered but produced no output text.
    #[error("Search agent returned no output")]
    NoSearchOutput,

    #[error("Search agent output is invalid: {0}")]
    InvalidSearchOutput(String),

    #[error("SMTP_USER is not set")]
    MissingSmtpUser,

    #[error("Neither SMTP_PASSWORD nor SMTP_APP_PASSWORD is set")]
    MissingSmtpPassword,

    #[error("Email delivery failed: {0}")]
    Mail(String),
}
