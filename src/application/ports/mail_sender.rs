use std::path::Path;

use async_trait::async_trait;

/// One report dispatch: recipient, subject, body, and the rendered file
/// to attach.
#[derive(Debug, Clone)]
pub struct OutgoingReportMail<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub attachment: &'a Path,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: OutgoingReportMail<'_>) -> Result<(), MailSenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailSenderError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("message build failed: {0}")]
    BuildFailed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("smtp delivery failed: {0}")]
    DeliveryFailed(String),
}
