//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the application calls into the search agent and mail transport.

pub mod outbound;

pub use outbound::{MailPort, SearchPort};
