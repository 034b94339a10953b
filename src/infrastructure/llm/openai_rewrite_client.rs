use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{RewriteClient, RewriteError};
use crate::domain::RewriteStyle;
use crate::infrastructure::observability::sanitize_transcript;

/// Rewrites raw transcripts into formal report prose via the OpenAI chat
/// completions API. Each field style maps to a fixed Arabic instruction;
/// the date field demands one exact output format instead of free prose.
pub struct OpenAiRewriteClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiRewriteClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl RewriteClient for OpenAiRewriteClient {
    async fn rewrite(
        &self,
        style: RewriteStyle,
        label: &str,
        raw: &str,
    ) -> Result<String, RewriteError> {
        let prompt = build_prompt(style, label, raw);
        tracing::debug!(
            model = %self.model,
            prompt = %sanitize_transcript(&prompt),
            "requesting rewrite"
        );

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RewriteError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RewriteError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| RewriteError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RewriteError::InvalidResponse("no choices returned".to_string()))?;

        let polished = content.trim().to_string();
        if polished.is_empty() {
            return Err(RewriteError::EmptyRewrite);
        }
        tracing::info!(chars = polished.len(), "rewrite completed");
        Ok(polished)
    }
}

fn build_prompt(style: RewriteStyle, label: &str, raw: &str) -> String {
    match style {
        RewriteStyle::StrictDate => format!(
            "يرجى صياغة تاريخ الواقعة بالتنسيق التالي فقط: 25/مايو/2025. النص:\n\n{}",
            raw
        ),
        RewriteStyle::Analytical => format!(
            "يرجى إعادة صياغة ({}) التالية بطريقة مهنية وتحليلية، وباستخدام لغة رسمية وعربية فصحى:\n\n{}",
            label, raw
        ),
        RewriteStyle::Professional => format!(
            "يرجى إعادة صياغة التالي ({}) باستخدام أسلوب مهني وعربي فصيح، مع تجنب المشاعر:\n\n{}",
            label, raw
        ),
    }
}
