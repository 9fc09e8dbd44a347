//! Application use cases. Orchestrate domain logic via ports.

pub mod digest_service;
pub mod email_formatter;
pub mod prompt_builder;

pub use digest_service::DigestService;
