//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    DigestConfiguration, DigestItem, DigestPayload, DigestRunOutput, EmailContent, EmailReport,
    Language, SearchOutput, SearchRequest,
};
pub use errors::DomainError;
