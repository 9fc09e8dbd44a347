//! hackathon-digest: AI web-search digest of hackathons and programming challenges, delivered by email.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
