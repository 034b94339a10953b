use async_trait::async_trait;

use crate::domain::ConversationId;

/// Full detail of a posted message, fetched by id after the webhook only
/// delivered the envelope.
#[derive(Debug, Clone)]
pub struct MessageDetail {
    /// Author identity, compared against the bot's own address so
    /// self-messages can be ignored.
    pub sender_email: Option<String>,
    pub text: Option<String>,
    /// Download URLs of file attachments, in the order the transport
    /// reports them.
    pub attachment_urls: Vec<String>,
}

/// Outbound and lookup operations against the chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn fetch_message(&self, message_id: &str) -> Result<MessageDetail, ChatTransportError>;

    /// Resolves an interactive-card submission to the chosen value, or
    /// `None` when the submission carried no recognizable choice.
    async fn fetch_card_submission(
        &self,
        action_id: &str,
    ) -> Result<Option<String>, ChatTransportError>;

    async fn download_attachment(&self, url: &str) -> Result<Vec<u8>, ChatTransportError>;

    async fn send_markdown(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), ChatTransportError>;

    /// Posts an interactive selection card listing a fixed set of choices.
    async fn send_selection_card(
        &self,
        conversation: &ConversationId,
        title: &str,
        choices: &[String],
    ) -> Result<(), ChatTransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatTransportError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("attachment download failed: {0}")]
    DownloadFailed(String),
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}
