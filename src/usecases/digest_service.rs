//! Digest service. Orchestrates one digest run.
//!
//! Coordinates prompt building, the search agent (port), formatting and mail delivery (port).

use crate::adapters::mail::SmtpMailer;
use crate::adapters::search::OpenAiSearchAdapter;
use crate::domain::{DigestConfiguration, DigestRunOutput, DomainError, EmailReport};
use crate::ports::{MailPort, SearchPort};
use crate::shared::AppConfig;
use crate::usecases::{email_formatter, prompt_builder};
use std::sync::Arc;
use tracing::{info, warn};

/// Service for one digest run.
///
/// Orchestrates the flow:
/// 1. Build the search request from configuration
/// 2. Ask the search agent (failure aborts the run)
/// 3. If items were found, format the email and dispatch it
/// 4. Record the delivery outcome without propagating dispatch errors
pub struct DigestService {
    search: Arc<dyn SearchPort>,
    mail: Arc<dyn MailPort>,
    config: DigestConfiguration,
    deliver: bool,
}

impl DigestService {
    /// Create a new digest service.
    ///
    /// # Arguments
    /// * `search` - Search port implementation (OpenAI, Mock)
    /// * `mail` - Mail port implementation
    /// * `config` - Resolved digest configuration for this run
    pub fn new(
        search: Arc<dyn SearchPort>,
        mail: Arc<dyn MailPort>,
        config: DigestConfiguration,
    ) -> Self {
        Self {
            search,
            mail,
            config,
            deliver: true,
        }
    }

    /// Wire the production adapters. Fails with `MissingSecret` before any network activity
    /// when OPENAI_API_KEY is absent.
    pub fn from_app_config(app: &AppConfig) -> Result<Self, DomainError> {
        let api_key = app.require_openai_api_key()?;
        let search = OpenAiSearchAdapter::new(
            app.openai_api_url_or_default(),
            api_key,
            app.openai_model_or_default(),
        );
        let mail = SmtpMailer::new(app.smtp_settings());
        Ok(Self::new(
            Arc::new(search),
            Arc::new(mail),
            app.digest_configuration(),
        ))
    }

    /// Format the email but skip sending it.
    pub fn without_delivery(mut self) -> Self {
        self.deliver = false;
        self
    }

    pub fn config(&self) -> &DigestConfiguration {
        &self.config
    }

    /// Run the digest. Only search failures are returned as errors.
    pub async fn run(&self, request_override: Option<&str>) -> Result<DigestRunOutput, DomainError> {
        let request = prompt_builder::build_search_request(&self.config, request_override);
        info!(
            language = %self.config.language,
            locations = self.config.locations.len(),
            topics = self.config.challenge_focus.len(),
            recency_hours = self.config.recency_hours,
            max_items = request.max_items,
            "starting digest run"
        );

        let output = self.search.search(&request).await?;
        let items = &output.output_parsed.items;

        if items.is_empty() {
            info!("no items found, skipping email");
            return Ok(DigestRunOutput {
                output_text: output.output_text,
                output_parsed: output.output_parsed,
                email: None,
            });
        }

        let content = email_formatter::format_email(items, self.config.language);
        let (sent, error) = if self.deliver {
            match self
                .mail
                .send(&self.config.recipient_emails, &content)
                .await
            {
                Ok(()) => (true, None),
                Err(e) => {
                    warn!(error = %e, "email delivery failed");
                    (false, Some(e.to_string()))
                }
            }
        } else {
            info!("delivery disabled, email not sent");
            (false, Some("delivery disabled".to_string()))
        };

        info!(items = items.len(), sent, "digest run complete");

        Ok(DigestRunOutput {
            email: Some(EmailReport {
                subject: content.subject,
                body: content.body,
                sent,
                error,
            }),
            output_text: output.output_text,
            output_parsed: output.output_parsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::search::MockSearchAdapter;
    use crate::domain::{DigestItem, EmailContent, Language};
    use crate::shared::SmtpSettings;
    use std::sync::Mutex;

    /// Records sends; optionally fails every one of them.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(Vec<String>, EmailContent)>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl MailPort for RecordingMailer {
        async fn send(
            &self,
            recipients: &[String],
            content: &EmailContent,
        ) -> Result<(), DomainError> {
            self.sent
                .lock()
                .unwrap()
                .push((recipients.to_vec(), content.clone()));
            if self.fail {
                return Err(DomainError::Mail("connection refused".to_string()));
            }
            Ok(())
        }
    }

    fn config() -> DigestConfiguration {
        DigestConfiguration {
            language: Language::En,
            locations: vec!["Prague".to_string()],
            challenge_focus: vec!["hackathon".to_string()],
            recency_hours: 168,
            max_items: 36,
            recipient_emails: vec!["a@x.com".to_string(), "b@y.com".to_string()],
        }
    }

    fn items() -> Vec<DigestItem> {
        vec![DigestItem {
            title: "Prague Hack".to_string(),
            summary: "A weekend hackathon.".to_string(),
            publisher: "Hack Club".to_string(),
            url: "https://hack.example/prague".to_string(),
            category: "hackathon".to_string(),
            date: "2026-11-07".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_run_sends_email_when_items_found() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = DigestService::new(
            Arc::new(MockSearchAdapter::with_items(items())),
            mailer.clone(),
            config(),
        );

        let out = service.run(None).await.unwrap();

        assert_eq!(out.output_parsed.items, items());
        let email = out.email.unwrap();
        assert!(email.sent);
        assert!(email.error.is_none());
        assert!(email.body.contains("1. [hackathon] Prague Hack (2026-11-07)"));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec!["a@x.com", "b@y.com"]);
        assert_eq!(sent[0].1.subject, email.subject);
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_recorded_not_propagated() {
        let mailer = Arc::new(RecordingMailer::failing());
        let service = DigestService::new(
            Arc::new(MockSearchAdapter::with_items(items())),
            mailer.clone(),
            config(),
        );

        let out = service.run(None).await.unwrap();

        let email = out.email.unwrap();
        assert!(!email.sent);
        assert!(email.error.unwrap().contains("connection refused"));
        assert_eq!(out.output_parsed.items, items());
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_missing_smtp_user_skips_delivery() {
        let mailer = SmtpMailer::new(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 465,
            secure: true,
            user: None,
            password: Some("secret".to_string()),
            from: None,
        });
        let service = DigestService::new(
            Arc::new(MockSearchAdapter::with_items(items())),
            Arc::new(mailer),
            config(),
        );

        let out = service.run(None).await.unwrap();

        let email = out.email.unwrap();
        assert!(!email.sent);
        assert_eq!(email.error.as_deref(), Some("SMTP_USER is not set"));
        assert_eq!(out.output_parsed.items, items());
    }

    #[tokio::test]
    async fn test_no_search_output_aborts_without_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let search = Arc::new(MockSearchAdapter::without_output());
        let service = DigestService::new(search.clone(), mailer.clone(), config());

        let err = service.run(None).await.unwrap_err();

        assert!(matches!(err, DomainError::NoSearchOutput));
        assert_eq!(search.calls(), 1);
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_items_returns_without_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = DigestService::new(
            Arc::new(MockSearchAdapter::with_items(Vec::new())),
            mailer.clone(),
            config(),
        );

        let out = service.run(None).await.unwrap();

        assert!(out.email.is_none());
        assert!(out.output_parsed.items.is_empty());
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_without_delivery() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = DigestService::new(
            Arc::new(MockSearchAdapter::with_items(items())),
            mailer.clone(),
            config(),
        )
        .without_delivery();

        let out = service.run(Some("only Prague")).await.unwrap();

        assert!(!out.email.unwrap().sent);
        assert_eq!(mailer.count(), 0);
    }

    #[test]
    fn test_from_app_config_requires_api_key() {
        let app = AppConfig::default();
        assert!(matches!(
            DigestService::from_app_config(&app),
            Err(DomainError::MissingSecret("OPENAI_API_KEY"))
        ));

        let app = AppConfig {
            openai_api_key: Some("sk-test".to_string()),
            max_items: Some("5".to_string()),
            ..AppConfig::default()
        };
        let service = DigestService::from_app_config(&app).unwrap();
        assert_eq!(service.config().max_items, 5);
    }
}
