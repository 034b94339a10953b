use async_trait::async_trait;

use crate::domain::RewriteStyle;

/// Text-polish seam: turns a raw transcript into formal report prose for
/// one labelled field. The date field uses a strict output-format
/// instruction instead of free rewriting.
#[async_trait]
pub trait RewriteClient: Send + Sync {
    async fn rewrite(
        &self,
        style: RewriteStyle,
        label: &str,
        raw: &str,
    ) -> Result<String, RewriteError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("rewrite returned empty text")]
    EmptyRewrite,
}
