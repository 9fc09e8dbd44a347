//! SMTP mailer. Implements MailPort with lettre over tokio + rustls.

use crate::domain::{DomainError, EmailContent};
use crate::ports::MailPort;
use crate::shared::SmtpSettings;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Authenticated SMTP sender. One connection per `send`, no retry.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Username and password, or the error naming whichever is missing.
    fn credentials(&self) -> Result<Credentials, DomainError> {
        let user = self
            .settings
            .user
            .clone()
            .ok_or(DomainError::MissingSmtpUser)?;
        let password = self
            .settings
            .password
            .clone()
            .ok_or(DomainError::MissingSmtpPassword)?;
        Ok(Credentials::new(user, password))
    }

    fn build_message(
        &self,
        recipients: &[String],
        content: &EmailContent,
    ) -> Result<Message, DomainError> {
        let from_raw = self
            .settings
            .from
            .as_deref()
            .or(self.settings.user.as_deref())
            .ok_or(DomainError::MissingSmtpUser)?;
        let from: Mailbox = from_raw
            .parse()
            .map_err(|e| DomainError::Mail(format!("invalid from address {}: {}", from_raw, e)))?;

        if recipients.is_empty() {
            return Err(DomainError::Mail("no recipients".to_string()));
        }

        let mut builder = Message::builder().from(from).subject(content.subject.as_str());
        for recipient in recipients {
            let to: Mailbox = recipient.parse().map_err(|e| {
                DomainError::Mail(format!("invalid recipient {}: {}", recipient, e))
            })?;
            builder = builder.to(to);
        }

        let plain = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(content.body.clone());
        let message = match &content.html {
            Some(html) => builder.multipart(
                MultiPart::alternative().singlepart(plain).singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html.clone()),
                ),
            ),
            None => builder.singlepart(plain),
        };
        message.map_err(|e| DomainError::Mail(format!("failed to build email: {}", e)))
    }

    fn transport(
        &self,
        credentials: Credentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, DomainError> {
        // secure = implicit TLS (465); otherwise STARTTLS (587).
        let builder = if self.settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
        }
        .map_err(|e| DomainError::Mail(format!("failed to create SMTP transport: {}", e)))?;

        Ok(builder
            .port(self.settings.port)
            .credentials(credentials)
            .build())
    }
}

#[async_trait::async_trait]
impl MailPort for SmtpMailer {
    async fn send(
        &self,
        recipients: &[String],
        content: &EmailContent,
    ) -> Result<(), DomainError> {
        let credentials = self.credentials()?;
        let message = self.build_message(recipients, content)?;
        let mailer = self.transport(credentials)?;

        mailer
            .send(message)
            .await
            .map_err(|e| DomainError::Mail(format!("SMTP send failed: {}", e)))?;

        info!(
            to = %recipients.join(","),
            subject = %content.subject,
            host = %self.settings.host,
            "email sent"
        );
        Ok(())
    }
}
