//! Search agent adapters. Implement SearchPort.
//!
//! Provides the OpenAI Responses adapter and a mock adapter for dry runs and tests.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::MockSearchAdapter;
pub use openai_adapter::OpenAiSearchAdapter;
