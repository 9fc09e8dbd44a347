//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/SMTP types here — adapters map into these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single hackathon or challenge returned by the search agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestItem {
    pub title: String,
    pub summary: String,
    pub publisher: String,
    pub url: String,
    pub category: String,
    pub date: String,
}

/// Schema-constrained agent response: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestPayload {
    pub items: Vec<DigestItem>,
}

/// Digest language. Selects email labels and the language the agent writes summaries in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cs,
}

impl Language {
    /// Case-insensitive parse of `en` / `cs`. Returns None for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "cs" => Some(Self::Cs),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Cs => "cs",
        }
    }

    /// Human-readable name used inside prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Cs => "Czech",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolved settings for one run. Rebuilt from the environment on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestConfiguration {
    pub language: Language,
    pub locations: Vec<String>,
    pub challenge_focus: Vec<String>,
    pub recency_hours: u32,
    pub max_items: usize,
    pub recipient_emails: Vec<String>,
}

/// Formatted email. `body` is plaintext; `html` is the alternative part sent alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
    #[serde(skip)]
    pub html: Option<String>,
}

/// Input for the search agent, produced by the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// System-level instructions (schema rules, bounds, recency).
    pub instructions: String,
    /// Natural-language user request.
    pub input: String,
    pub min_items: usize,
    pub max_items: usize,
}

/// Raw and parsed agent output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutput {
    pub output_text: String,
    pub output_parsed: DigestPayload,
}

/// Email delivery outcome attached to a run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailReport {
    pub subject: String,
    pub body: String,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one digest run, printed as JSON by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestRunOutput {
    pub output_text: String,
    pub output_parsed: DigestPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailReport>,
}
