//! Mock search adapter for dry runs and tests without API calls.
//!
//! Returns a fixed payload (or a configured failure) instead of calling the agent.

use crate::domain::{DigestItem, DigestPayload, DomainError, SearchOutput, SearchRequest};
use crate::ports::SearchPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// What the mock answers with.
enum MockResponse {
    Items(Vec<DigestItem>),
    NoOutput,
}

/// Mock search adapter.
pub struct MockSearchAdapter {
    response: MockResponse,
    calls: AtomicUsize,
}

impl MockSearchAdapter {
    /// Mock returning a couple of sample items.
    pub fn new() -> Self {
        Self::with_items(sample_items())
    }

    pub fn with_items(items: Vec<DigestItem>) -> Self {
        Self {
            response: MockResponse::Items(items),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock whose agent run produces no output at all.
    pub fn without_output() -> Self {
        Self {
            response: MockResponse::NoOutput,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `search` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSearchAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_items() -> Vec<DigestItem> {
    vec![
        DigestItem {
            title: "[MOCK] Prague Student Hackathon".to_string(),
            summary: "A 24-hour hackathon for university students. Teams of up to four build prototypes around open city data.".to_string(),
            publisher: "Mock Events".to_string(),
            url: "https://example.com/prague-student-hackathon".to_string(),
            category: "hackathon".to_string(),
            date: "2026-11-14".to_string(),
        },
        DigestItem {
            title: "[MOCK] Online Rust Challenge".to_string(),
            summary: "A month-long series of algorithmic puzzles solved in Rust.".to_string(),
            publisher: "Mock Community".to_string(),
            url: "https://example.com/online-rust-challenge".to_string(),
            category: "challenge".to_string(),
            date: "2026-11-01 – 2026-11-30".to_string(),
        },
    ]
}

#[async_trait::async_trait]
impl SearchPort for MockSearchAdapter {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutput, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(
            input_len = request.input.len(),
            "[MOCK] Simulating search agent"
        );

        match &self.response {
            MockResponse::NoOutput => Err(DomainError::NoSearchOutput),
            MockResponse::Items(items) => {
                let mut items = items.clone();
                items.truncate(request.max_items);
                let output_parsed = DigestPayload { items };
                let output_text = serde_json::to_string(&output_parsed)
                    .map_err(|e| DomainError::InvalidSearchOutput(e.to_string()))?;
                Ok(SearchOutput {
                    output_text,
                    output_parsed,
                })
            }
        }
    }
}
