//! SMTP delivery via lettre

use super::{EmailSender, SendReceipt};
use crate::config::{timeout_duration, SmtpSettings};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

/// Sends mail through the configured SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
    timeout: Duration,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SmtpMailer {
    /// Fails when `settings.timeout` is not a positive number of seconds
    pub fn new(settings: SmtpSettings) -> anyhow::Result<Self> {
        let timeout = timeout_duration("smtp.timeout", settings.timeout)?;
        Ok(Self { settings, timeout })
    }

    fn host(&self) -> Result<&str> {
        non_empty(&self.settings.host).ok_or(AgentError::MissingCredential("SMTP_HOST"))
    }

    /// The envelope sender: from-address, else the login name
    fn sender(&self) -> Result<&str> {
        non_empty(&self.settings.from_email)
            .or_else(|| non_empty(&self.settings.username))
            .ok_or(AgentError::MissingCredential("SMTP_FROM_EMAIL"))
    }

    fn transport(&self, host: &str) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| AgentError::Mail(format!("SMTP relay error: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let mut builder = builder
            .port(self.settings.port)
            .timeout(Some(self.timeout));

        if let Some(username) = non_empty(&self.settings.username) {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                self.settings.password.clone().unwrap_or_default(),
            ));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<SendReceipt> {
        let host = self.host()?;
        let sender = self.sender()?;
        let to = to.trim();
        if to.is_empty() {
            return Err(AgentError::InvalidRequest("Recipient email is empty.".to_string()));
        }

        let message = Message::builder()
            .from(
                sender
                    .parse()
                    .map_err(|e| AgentError::Mail(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AgentError::InvalidRequest(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AgentError::Mail(format!("Failed to build email: {}", e)))?;

        info!(
            "send_email start smtp_host={} smtp_port={} tls={} to={}",
            host, self.settings.port, self.settings.use_tls, to
        );
        self.transport(host)?
            .send(message)
            .await
            .map_err(|e| AgentError::Mail(format!("SMTP send error: {}", e)))?;
        info!("send_email success to={} subject={:?}", to, subject);

        Ok(SendReceipt {
            from_email: sender.to_string(),
            to_email: to.to_string(),
            subject: subject.to_string(),
        })
    }
}
