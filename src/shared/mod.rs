//! Cross-cutting configuration shared by the binary and use cases.

pub mod config;

pub use config::{AppConfig, SmtpSettings};
