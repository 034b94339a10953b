#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taqrir::application::ports::{
    ChatTransport, ChatTransportError, MailSender, MailSenderError, MessageDetail, RenderError,
    ReportRenderer, RewriteClient, RewriteError, SessionStore, TranscriptionEngine,
    TranscriptionError,
};
use taqrir::application::services::{IntakeConfig, IntakeService};
use taqrir::domain::{
    CompletedReport, ConversationId, EventEnvelope, FieldDescriptor, FieldSchedule, InboundEvent,
    RewriteStyle, UserId,
};
use taqrir::infrastructure::persistence::MemorySessionStore;

pub const INVESTIGATOR: &str = "المقدم محمد علي القاسم";
pub const OTHER_INVESTIGATOR: &str = "النقيب عبدالله راشد ال علي";
pub const BOT_EMAIL: &str = "intake@bot.example";
pub const ROOM: &str = "room-1";

/// Transport double: inbound lookups are scripted per event id, outbound
/// sends are recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    messages: Mutex<HashMap<String, MessageDetail>>,
    submissions: Mutex<HashMap<String, Option<String>>>,
    attachments: Mutex<HashMap<String, Vec<u8>>>,
    sent: Mutex<Vec<String>>,
    cards_sent: AtomicUsize,
}

impl ScriptedTransport {
    pub async fn script_text_message(&self, event_id: &str, text: &str) {
        self.messages.lock().await.insert(
            event_id.to_string(),
            MessageDetail {
                sender_email: Some("investigator@example.com".to_string()),
                text: Some(text.to_string()),
                attachment_urls: Vec::new(),
            },
        );
    }

    pub async fn script_voice_message(&self, event_id: &str, urls: &[&str], audio: &[u8]) {
        self.messages.lock().await.insert(
            event_id.to_string(),
            MessageDetail {
                sender_email: Some("investigator@example.com".to_string()),
                text: None,
                attachment_urls: urls.iter().map(|u| u.to_string()).collect(),
            },
        );
        if let Some(url) = urls.first() {
            self.attachments
                .lock()
                .await
                .insert(url.to_string(), audio.to_vec());
        }
    }

    pub async fn script_bot_message(&self, event_id: &str) {
        self.messages.lock().await.insert(
            event_id.to_string(),
            MessageDetail {
                sender_email: Some(BOT_EMAIL.to_string()),
                text: Some("echo".to_string()),
                attachment_urls: Vec::new(),
            },
        );
    }

    pub async fn script_submission(&self, event_id: &str, choice: Option<&str>) {
        self.submissions
            .lock()
            .await
            .insert(event_id.to_string(), choice.map(str::to_string));
    }

    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    pub fn cards_sent(&self) -> usize {
        self.cards_sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn fetch_message(&self, message_id: &str) -> Result<MessageDetail, ChatTransportError> {
        self.messages
            .lock()
            .await
            .get(message_id)
            .cloned()
            .ok_or_else(|| ChatTransportError::ApiRequestFailed("unknown message".to_string()))
    }

    async fn fetch_card_submission(
        &self,
        action_id: &str,
    ) -> Result<Option<String>, ChatTransportError> {
        self.submissions
            .lock()
            .await
            .get(action_id)
            .cloned()
            .ok_or_else(|| ChatTransportError::ApiRequestFailed("unknown action".to_string()))
    }

    async fn download_attachment(&self, url: &str) -> Result<Vec<u8>, ChatTransportError> {
        self.attachments
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ChatTransportError::DownloadFailed("unknown attachment".to_string()))
    }

    async fn send_markdown(
        &self,
        _conversation: &ConversationId,
        text: &str,
    ) -> Result<(), ChatTransportError> {
        self.sent.lock().await.push(text.to_string());
        Ok(())
    }

    async fn send_selection_card(
        &self,
        _conversation: &ConversationId,
        _title: &str,
        _choices: &[String],
    ) -> Result<(), ChatTransportError> {
        self.cards_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct ScriptedTranscriber {
    pub fail: bool,
    pub delay: Option<Duration>,
    pub text: String,
    pub calls: AtomicUsize,
}

impl Default for ScriptedTranscriber {
    fn default() -> Self {
        Self {
            fail: false,
            delay: None,
            text: "النص المفرّغ".to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for ScriptedTranscriber {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(TranscriptionError::TranscriptionFailed(
                "scripted failure".to_string(),
            ));
        }
        Ok(self.text.clone())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    Echo,
    Blank,
    Fail,
}

pub struct ScriptedRewriter {
    pub mode: RewriteMode,
}

impl Default for ScriptedRewriter {
    fn default() -> Self {
        Self {
            mode: RewriteMode::Echo,
        }
    }
}

#[async_trait]
impl RewriteClient for ScriptedRewriter {
    async fn rewrite(
        &self,
        _style: RewriteStyle,
        label: &str,
        raw: &str,
    ) -> Result<String, RewriteError> {
        match self.mode {
            RewriteMode::Echo => Ok(format!("{}: {} [منقّح]", label, raw)),
            RewriteMode::Blank => Ok("   ".to_string()),
            RewriteMode::Fail => Err(RewriteError::ApiRequestFailed(
                "scripted failure".to_string(),
            )),
        }
    }
}

#[derive(Default)]
pub struct ScriptedRenderer {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ReportRenderer for ScriptedRenderer {
    async fn render(&self, _report: &CompletedReport) -> Result<PathBuf, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::TemplateUnavailable(
                "scripted failure".to_string(),
            ));
        }
        Ok(PathBuf::from("reports/scripted-report.txt"))
    }
}

#[derive(Default)]
pub struct ScriptedMailer {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MailSender for ScriptedMailer {
    async fn send(
        &self,
        _mail: taqrir::application::ports::OutgoingReportMail<'_>,
    ) -> Result<(), MailSenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailSenderError::DeliveryFailed(
                "scripted failure".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct Harness {
    pub service: Arc<IntakeService>,
    pub store: Arc<MemorySessionStore>,
    pub transport: Arc<ScriptedTransport>,
    pub transcriber: Arc<ScriptedTranscriber>,
    pub rewriter: Arc<ScriptedRewriter>,
    pub renderer: Arc<ScriptedRenderer>,
    pub mailer: Arc<ScriptedMailer>,
}

pub struct HarnessBuilder {
    schedule: FieldSchedule,
    transcriber: ScriptedTranscriber,
    rewriter: ScriptedRewriter,
    renderer: ScriptedRenderer,
    mailer: ScriptedMailer,
    collaborator_timeout: Duration,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            schedule: FieldSchedule::standard(),
            transcriber: ScriptedTranscriber::default(),
            rewriter: ScriptedRewriter::default(),
            renderer: ScriptedRenderer::default(),
            mailer: ScriptedMailer::default(),
            collaborator_timeout: Duration::from_secs(5),
        }
    }
}

impl HarnessBuilder {
    pub fn schedule(mut self, schedule: FieldSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn failing_transcriber(mut self) -> Self {
        self.transcriber.fail = true;
        self
    }

    pub fn slow_transcriber(mut self, delay: Duration) -> Self {
        self.transcriber.delay = Some(delay);
        self
    }

    pub fn rewrite_mode(mut self, mode: RewriteMode) -> Self {
        self.rewriter.mode = mode;
        self
    }

    pub fn failing_mailer(mut self) -> Self {
        self.mailer.fail = true;
        self
    }

    pub fn collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    pub fn build(self) -> Harness {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(ScriptedTransport::default());
        let transcriber = Arc::new(self.transcriber);
        let rewriter = Arc::new(self.rewriter);
        let renderer = Arc::new(self.renderer);
        let mailer = Arc::new(self.mailer);

        let service = Arc::new(IntakeService::new(
            self.schedule,
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&transport) as Arc<dyn ChatTransport>,
            Arc::clone(&transcriber) as Arc<dyn TranscriptionEngine>,
            Arc::clone(&rewriter) as Arc<dyn RewriteClient>,
            Arc::clone(&renderer) as Arc<dyn ReportRenderer>,
            Arc::clone(&mailer) as Arc<dyn MailSender>,
            IntakeConfig {
                investigators: vec![INVESTIGATOR.to_string(), OTHER_INVESTIGATOR.to_string()],
                bot_email: BOT_EMAIL.to_string(),
                report_recipient: "reports@example.com".to_string(),
                mail_subject: "تقرير فحص تلقائي".to_string(),
                collaborator_timeout: self.collaborator_timeout,
            },
        ));

        Harness {
            service,
            store,
            transport,
            transcriber,
            rewriter,
            renderer,
            mailer,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

/// A two-field schedule for the short walk-through scenarios.
pub fn short_schedule() -> FieldSchedule {
    FieldSchedule::new(vec![
        FieldDescriptor::new("Date", "🎙️ أرسل تاريخ الواقعة.", "التاريخ", RewriteStyle::StrictDate),
        FieldDescriptor::new(
            "Briefing",
            "🎙️ أرسل موجز الواقعة.",
            "موجز الواقعة",
            RewriteStyle::Professional,
        ),
    ])
}

pub fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub fn message_event(event_id: &str, user_id: &str) -> InboundEvent {
    InboundEvent::Message(envelope(event_id, user_id))
}

pub fn card_event(event_id: &str, user_id: &str) -> InboundEvent {
    InboundEvent::CardSubmission(envelope(event_id, user_id))
}

fn envelope(event_id: &str, user_id: &str) -> EventEnvelope {
    EventEnvelope {
        event_id: event_id.to_string(),
        user_id: UserId::new(user_id),
        conversation_id: ConversationId::new(ROOM),
    }
}
