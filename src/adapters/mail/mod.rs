//! Mail adapters. Implement MailPort.

pub mod smtp_mailer;

pub use smtp_mailer::SmtpMailer;
