use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ChatTransport, ChatTransportError, MessageDetail};
use crate::domain::ConversationId;

/// Input id of the choice set on the investigator card; submissions are
/// resolved through the same id.
const CARD_INPUT_ID: &str = "investigator";

/// Webex REST adapter: message lookup, attachment-action lookup, file
/// download, markdown posts and adaptive-card posts.
pub struct WebexTransport {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    person_email: Option<String>,
    text: Option<String>,
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AttachmentActionResponse {
    #[serde(default)]
    inputs: serde_json::Value,
}

impl WebexTransport {
    pub fn new(base_url: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ChatTransportError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| ChatTransportError::ApiRequestFailed(format!("request: {}", e)))?;

        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ChatTransportError::UnexpectedPayload(e.to_string()))
    }

    async fn post_message(&self, payload: serde_json::Value) -> Result<(), ChatTransportError> {
        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatTransportError::ApiRequestFailed(format!("request: {}", e)))?;

        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for WebexTransport {
    async fn fetch_message(&self, message_id: &str) -> Result<MessageDetail, ChatTransportError> {
        let url = format!("{}/v1/messages/{}", self.base_url, message_id);
        let message: MessageResponse = self.get_json(&url).await?;
        Ok(MessageDetail {
            sender_email: message.person_email,
            text: message.text,
            attachment_urls: message.files,
        })
    }

    async fn fetch_card_submission(
        &self,
        action_id: &str,
    ) -> Result<Option<String>, ChatTransportError> {
        let url = format!("{}/v1/attachment/actions/{}", self.base_url, action_id);
        let action: AttachmentActionResponse = self.get_json(&url).await?;
        Ok(action
            .inputs
            .get(CARD_INPUT_ID)
            .and_then(|value| value.as_str())
            .map(str::to_string))
    }

    async fn download_attachment(&self, url: &str) -> Result<Vec<u8>, ChatTransportError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| ChatTransportError::DownloadFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChatTransportError::DownloadFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatTransportError::DownloadFailed(format!("body: {}", e)))?;
        tracing::debug!(bytes = bytes.len(), "attachment downloaded");
        Ok(bytes.to_vec())
    }

    async fn send_markdown(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), ChatTransportError> {
        self.post_message(json!({
            "roomId": conversation.as_str(),
            "markdown": text,
        }))
        .await
    }

    async fn send_selection_card(
        &self,
        conversation: &ConversationId,
        title: &str,
        choices: &[String],
    ) -> Result<(), ChatTransportError> {
        let card_choices: Vec<serde_json::Value> = choices
            .iter()
            .map(|name| json!({"title": name, "value": name}))
            .collect();

        self.post_message(json!({
            "roomId": conversation.as_str(),
            "markdown": title,
            "attachments": [{
                "contentType": "application/vnd.microsoft.card.adaptive",
                "content": {
                    "type": "AdaptiveCard",
                    "version": "1.0",
                    "body": [
                        {
                            "type": "TextBlock",
                            "text": title,
                            "weight": "bolder",
                            "size": "medium",
                        },
                        {
                            "type": "Input.ChoiceSet",
                            "id": CARD_INPUT_ID,
                            "style": "expanded",
                            "choices": card_choices,
                        }
                    ],
                    "actions": [{
                        "type": "Action.Submit",
                        "title": "إرسال",
                    }],
                },
            }],
        }))
        .await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatTransportError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ChatTransportError::ApiRequestFailed(format!(
        "status {}: {}",
        status, body
    )))
}
