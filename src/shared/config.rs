//! Application configuration. Environment overrides, API credentials, SMTP settings.
//!
//! Every field is kept as the raw string the environment supplied; typed values are
//! produced by the `parse_*` helpers, which fall back to defaults instead of failing.

use crate::domain::{DigestConfiguration, DomainError, Language};
use serde::Deserialize;

pub const DEFAULT_LOCATIONS: &[&str] = &["Czech Republic", "Prague", "Brno", "Online"];
pub const DEFAULT_CHALLENGE_TOPICS: &[&str] = &[
    "hackathon",
    "programming challenge",
    "coding competition",
    "game jam",
    "capture the flag",
];
pub const DEFAULT_RECENCY_HOURS: u32 = 168;
pub const DEFAULT_MAX_ITEMS: usize = 36;
pub const DEFAULT_RECIPIENT_EMAIL: &str = "digest@example.com";

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Implicit TLS port; paired with `SMTP_SECURE=true`.
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SMTP_SECURE: bool = true;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// OpenAI API key. Read from OPENAI_API_KEY. Required.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Responses API endpoint. Read from OPENAI_API_URL.
    #[serde(default)]
    pub openai_api_url: Option<String>,

    /// Model name. Read from OPENAI_MODEL.
    #[serde(default)]
    pub openai_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Digest Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// `en` or `cs`. Read from LANGUAGE.
    #[serde(default)]
    pub language: Option<String>,

    /// Comma-separated. Read from LOCATIONS.
    #[serde(default)]
    pub locations: Option<String>,

    /// Comma-separated. Read from CHALLENGE_TOPICS.
    #[serde(default)]
    pub challenge_topics: Option<String>,

    /// Read from RECENCY_HOURS.
    #[serde(default)]
    pub recency_hours: Option<String>,

    /// Read from MAX_ITEMS.
    #[serde(default)]
    pub max_items: Option<String>,

    /// Comma-separated. Read from RECIPIENT_EMAIL.
    #[serde(default)]
    pub recipient_email: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // SMTP Configuration
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default)]
    pub smtp_port: Option<String>,

    /// Implicit TLS when true, STARTTLS when false. Read from SMTP_SECURE.
    #[serde(default)]
    pub smtp_secure: Option<String>,

    #[serde(default)]
    pub smtp_user: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Used when SMTP_PASSWORD is absent (e.g. a Gmail app password).
    #[serde(default)]
    pub smtp_app_password: Option<String>,

    /// Sender address. Defaults to SMTP_USER.
    #[serde(default)]
    pub smtp_from: Option<String>,
}

/// SMTP transport settings derived from `AppConfig`. Credentials stay optional here;
/// the mailer reports which one is missing when it is asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

impl AppConfig {
    /// Load from `.env`, the process environment, and an optional file named by DIGEST_CONFIG.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("DIGEST_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file.
        c = c.add_source(config::Environment::default());
        c.build()?.try_deserialize()
    }

    /// Build from an explicit key/value source instead of the process environment.
    pub fn from_env_map<I, K, V>(pairs: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        config::Config::builder()
            .add_source(config::Environment::default().source(Some(map)))
            .build()?
            .try_deserialize()
    }

    /// Resolve the digest settings, substituting defaults for absent or unparseable values.
    pub fn digest_configuration(&self) -> DigestConfiguration {
        DigestConfiguration {
            language: self
                .language
                .as_deref()
                .and_then(Language::parse)
                .unwrap_or_default(),
            locations: parse_list(self.locations.as_deref())
                .unwrap_or_else(|| to_owned_list(DEFAULT_LOCATIONS)),
            challenge_focus: parse_list(self.challenge_topics.as_deref())
                .unwrap_or_else(|| to_owned_list(DEFAULT_CHALLENGE_TOPICS)),
            recency_hours: parse_number(self.recency_hours.as_deref())
                .unwrap_or(DEFAULT_RECENCY_HOURS),
            max_items: parse_number(self.max_items.as_deref()).unwrap_or(DEFAULT_MAX_ITEMS),
            recipient_emails: parse_list(self.recipient_email.as_deref())
                .unwrap_or_else(|| vec![DEFAULT_RECIPIENT_EMAIL.to_string()]),
        }
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        let user = non_empty(self.smtp_user.as_deref());
        SmtpSettings {
            host: non_empty(self.smtp_host.as_deref())
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: parse_number(self.smtp_port.as_deref()).unwrap_or(DEFAULT_SMTP_PORT),
            secure: parse_bool(self.smtp_secure.as_deref()).unwrap_or(DEFAULT_SMTP_SECURE),
            password: non_empty(self.smtp_password.as_deref())
                .or_else(|| non_empty(self.smtp_app_password.as_deref())),
            from: non_empty(self.smtp_from.as_deref()).or_else(|| user.clone()),
            user,
        }
    }

    /// Returns the API key or `MissingSecret`. Checked before any network activity.
    pub fn require_openai_api_key(&self) -> Result<String, DomainError> {
        non_empty(self.openai_api_key.as_deref()).ok_or(DomainError::MissingSecret("OPENAI_API_KEY"))
    }

    pub fn openai_api_url_or_default(&self) -> String {
        non_empty(self.openai_api_url.as_deref())
            .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string())
    }

    pub fn openai_model_or_default(&self) -> String {
        non_empty(self.openai_model.as_deref()).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string())
    }
}

/// Comma-separated list. Entries are trimmed and blanks dropped; None when nothing remains.
pub fn parse_list(raw: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Positive integer. Zero, negatives and garbage yield None.
pub fn parse_number<T>(raw: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw?.trim().parse::<T>().ok().filter(|n| *n > T::default())
}

pub fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
