use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::CompletedReport;

/// Document-render seam: turns the completed field mapping into a report
/// file and returns its path.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, report: &CompletedReport) -> Result<PathBuf, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template unavailable: {0}")]
    TemplateUnavailable(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
