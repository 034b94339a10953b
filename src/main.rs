use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use taqrir::application::ports::SessionStore;
use taqrir::application::services::{IntakeConfig, IntakeService};
use taqrir::domain::FieldSchedule;
use taqrir::infrastructure::audio::OpenAiWhisperEngine;
use taqrir::infrastructure::llm::OpenAiRewriteClient;
use taqrir::infrastructure::mail::SmtpMailer;
use taqrir::infrastructure::observability::{TracingConfig, init_tracing};
use taqrir::infrastructure::persistence::{FileSessionStore, MemorySessionStore};
use taqrir::infrastructure::render::TemplateReportRenderer;
use taqrir::infrastructure::transport::WebexTransport;
use taqrir::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("failed to load settings")?;
    init_tracing(TracingConfig {
        default_level: settings.logging.level.clone(),
        json_format: settings.logging.enable_json,
        environment: environment.to_string(),
    });

    // A missing template must fail startup, not the first completed report.
    anyhow::ensure!(
        settings.report.template_path.is_file(),
        "report template not found: {}",
        settings.report.template_path.display()
    );

    let store: Arc<dyn SessionStore> = match &settings.intake.session_file {
        Some(path) => {
            let store = FileSessionStore::open(path.clone())
                .await
                .context("failed to open session file")?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("memory session store in use: sessions are lost on restart");
            Arc::new(MemorySessionStore::new())
        }
    };

    let transport = Arc::new(WebexTransport::new(
        settings.transport.base_url.clone(),
        settings.transport.bot_token.clone(),
    ));
    let transcriber = Arc::new(OpenAiWhisperEngine::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        settings.transcription.model.clone(),
        settings.transcription.language.clone(),
    ));
    let rewriter = Arc::new(OpenAiRewriteClient::new(
        settings.rewrite.api_key.clone(),
        settings.rewrite.base_url.clone(),
        settings.rewrite.model.clone(),
    ));
    let renderer = Arc::new(TemplateReportRenderer::new(
        settings.report.template_path.clone(),
        settings.report.output_dir.clone(),
    ));
    let mailer = Arc::new(
        SmtpMailer::new(
            &settings.smtp.host,
            settings.smtp.username.clone(),
            settings.smtp.password.clone(),
            settings.smtp.sender.clone(),
        )
        .context("failed to build smtp transport")?,
    );

    let intake_service = Arc::new(IntakeService::new(
        FieldSchedule::standard(),
        store,
        transport,
        transcriber,
        rewriter,
        renderer,
        mailer,
        IntakeConfig {
            investigators: settings.intake.investigators.clone(),
            bot_email: settings.transport.bot_email.clone(),
            report_recipient: settings.report.recipient.clone(),
            mail_subject: settings.report.mail_subject.clone(),
            collaborator_timeout: Duration::from_secs(
                settings.intake.collaborator_timeout_seconds,
            ),
        },
    ));

    let router = create_router(AppState { intake_service });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
