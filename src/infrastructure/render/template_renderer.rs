use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::{RenderError, ReportRenderer};
use crate::domain::CompletedReport;

/// Renders the report by substituting `{{FieldId}}` placeholders in a
/// text template and writing the result under the output directory, named
/// after the investigator.
pub struct TemplateReportRenderer {
    template_path: PathBuf,
    output_dir: PathBuf,
}

impl TemplateReportRenderer {
    pub fn new(template_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_dir: output_dir.into(),
        }
    }

    fn output_path(&self, report: &CompletedReport) -> PathBuf {
        let extension = self
            .template_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("txt");
        let investigator = report.investigator.replace(' ', "_");
        self.output_dir
            .join(format!("تقرير الفحص {}.{}", investigator, extension))
    }
}

#[async_trait]
impl ReportRenderer for TemplateReportRenderer {
    async fn render(&self, report: &CompletedReport) -> Result<PathBuf, RenderError> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|e| {
                RenderError::TemplateUnavailable(format!(
                    "{}: {}",
                    self.template_path.display(),
                    e
                ))
            })?;

        let rendered = fill_template(&template, report);

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self.output_path(report);
        tokio::fs::write(&output_path, rendered).await?;

        tracing::info!(report = %output_path.display(), "report rendered");
        Ok(output_path)
    }
}

fn fill_template(template: &str, report: &CompletedReport) -> String {
    let mut rendered = template.replace("{{Investigator}}", &report.investigator);
    for section in &report.sections {
        let placeholder = format!("{{{{{}}}}}", section.id.as_str());
        rendered = rendered.replace(&placeholder, &section.text);
    }
    rendered
}
