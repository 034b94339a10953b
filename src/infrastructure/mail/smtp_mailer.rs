use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::ports::{MailSender, MailSenderError, OutgoingReportMail};

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Dispatches the rendered report over SMTP (implicit TLS) with the file
/// attached.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Self, MailSenderError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| MailSenderError::BuildFailed(e.to_string()))?
            .credentials(Credentials::new(username.into(), password.into()))
            .build();
        Ok(Self {
            transport,
            sender: sender.into(),
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, mail: OutgoingReportMail<'_>) -> Result<(), MailSenderError> {
        let attachment_bytes = tokio::fs::read(mail.attachment).await?;
        let filename = mail
            .attachment
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());

        let content_type = attachment_content_type(&filename);
        let attachment = Attachment::new(filename.clone()).body(
            attachment_bytes,
            ContentType::parse(content_type)
                .map_err(|e| MailSenderError::BuildFailed(e.to_string()))?,
        );

        let message = Message::builder()
            .from(self
                .sender
                .parse()
                .map_err(|_| MailSenderError::InvalidAddress(self.sender.clone()))?)
            .to(mail
                .recipient
                .parse()
                .map_err(|_| MailSenderError::InvalidAddress(mail.recipient.to_string()))?)
            .subject(mail.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body.to_string()))
                    .singlepart(attachment),
            )
            .map_err(|e| MailSenderError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailSenderError::DeliveryFailed(e.to_string()))?;

        tracing::info!(recipient = %mail.recipient, attachment = %filename, "report mail sent");
        Ok(())
    }
}

fn attachment_content_type(filename: &str) -> &'static str {
    if filename.ends_with(".docx") {
        DOCX_CONTENT_TYPE
    } else {
        "application/octet-stream"
    }
}
