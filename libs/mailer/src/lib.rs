//! Outbound email port and its SMTP implementation.
//!
//! Domain modules depend only on the [`Mailer`] trait; the binary wires in
//! [`SmtpMailer`] (or [`NullMailer`] when no mail section is configured) and
//! tests use [`RecordingMailer`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use runtime::MailConfig;
use std::sync::Mutex;

/// Port for sending a single HTML message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html_body: String) -> Result<()>;
}

/// SMTP mailer backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(cfg: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .with_context(|| format!("Invalid SMTP relay '{}'", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();

        let from = cfg
            .from
            .parse()
            .with_context(|| format!("Invalid from address '{}'", cfg.from))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| format!("Invalid recipient '{to}'"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .context("Failed to build message")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("SMTP send to {to} failed"))?;
        tracing::debug!(to, subject, "mail sent");
        Ok(())
    }
}

/// Mailer used when no mail section is configured: logs and drops.
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send_html(&self, to: &str, subject: &str, _html_body: String) -> Result<()> {
        tracing::warn!(to, subject, "mail disabled, dropping message");
        Ok(())
    }
}

/// A sent message captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct RecordedMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Test double that records every message instead of sending it.
/// Can also be switched to fail, for send-failure paths.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<RecordedMail>>,
    fail: Mutex<bool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<RecordedMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("simulated send failure to {to}");
        }
        self.sent.lock().unwrap().push(RecordedMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body,
        });
        Ok(())
    }
}
