//! Infrastructure adapters. Implement outbound ports.
//!
//! Search agent (HTTP) and mail transport (SMTP). Map errors to DomainError.

pub mod mail;
pub mod search;
