//! Outgoing email delivery

mod smtp;

pub use smtp::SmtpMailer;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// What was sent, echoed back to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    pub from_email: String,
    pub to_email: String,
    pub subject: String,
}

/// Delivers a plain-text email
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<SendReceipt>;
}
