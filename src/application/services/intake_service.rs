use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ChatTransport, ChatTransportError, MailSender, MailSenderError, OutgoingReportMail,
    RenderError, ReportRenderer, RewriteClient, RewriteError, SessionStore, SessionStoreError,
    TranscriptionEngine, TranscriptionError,
};
use crate::domain::{
    CompletedReport, ConversationId, EventEnvelope, FieldId, FieldSchedule, InboundEvent, Session,
    SessionPhase,
};

use super::UserLocks;

const WELCOME: &str = "👋 مرحباً بك في بوت إعداد تقارير الفحص الخاص بقسم الهندسة الجنائية.";
const ROSTER_CARD_TITLE: &str = "🧑‍✈️ اختر اسم الفاحص:";
const UNKNOWN_INVESTIGATOR: &str = "⚠️ الاسم المختار غير معروف، يرجى الاختيار من القائمة.";
const VOICE_REMINDER: &str = "🎙️ الرجاء إرسال تسجيل صوتي.";
const ALL_FIELDS_RECEIVED: &str = "✅ تم استلام جميع البيانات. جاري إعداد التقرير...";
const REPORT_SENT: &str = "📩 تم إرسال التقرير إلى البريد المعتمد.";
const RESET_CONFIRMATION: &str = "🔄 تم إلغاء الجلسة. أرسل أي رسالة للبدء من جديد.";
const RETRY_MESSAGE: &str = "⚠️ تعذّرت معالجة الرسالة، يرجى المحاولة مرة أخرى.";

const RESET_COMMANDS: [&str; 2] = ["/reset", "إلغاء"];

/// Static knobs of the intake flow.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Roster of valid investigator names offered on the selection card.
    pub investigators: Vec<String>,
    /// The bot's own address; messages authored by it are ignored.
    pub bot_email: String,
    pub report_recipient: String,
    pub mail_subject: String,
    /// Upper bound applied to every collaborator call; expiry is a
    /// retryable failure.
    pub collaborator_timeout: Duration,
}

/// What an inbound event amounted to, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// First contact: session created, welcome and roster card sent.
    Welcomed,
    SelectionRecorded,
    /// Unrecognized choice; roster re-sent, nothing changed.
    SelectionRejected,
    /// Message arrived while a selection is still pending.
    SelectionReprompted,
    FieldCollected(FieldId),
    /// Final field collected: report rendered, mailed, session closed.
    Completed,
    /// Non-voice message during collection.
    Reminded,
    Reset,
    /// Duplicate delivery, absorbed without reprocessing.
    Duplicate,
    /// Self-authored or otherwise irrelevant event.
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("transport: {0}")]
    Transport(#[from] ChatTransportError),
    #[error("session store: {0}")]
    Store(#[from] SessionStoreError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("rewrite: {0}")]
    Rewrite(RewriteError),
    #[error("render: {0}")]
    Render(RenderError),
    #[error("mail: {0}")]
    Mail(MailSenderError),
    #[error("{stage} timed out")]
    Timeout { stage: &'static str },
    #[error("corrupt session state: {0}")]
    CorruptSession(&'static str),
}

/// The intake session state machine. Advances one user's session one
/// field at a time: selection → voice note per schedule field → render,
/// mail, done. Nothing is committed to the store until the whole pipeline
/// for an event has succeeded, so any failure leaves the session exactly
/// as it was and the user retries by resending the same input.
pub struct IntakeService {
    schedule: FieldSchedule,
    store: Arc<dyn SessionStore>,
    transport: Arc<dyn ChatTransport>,
    transcriber: Arc<dyn TranscriptionEngine>,
    rewriter: Arc<dyn RewriteClient>,
    renderer: Arc<dyn ReportRenderer>,
    mailer: Arc<dyn MailSender>,
    locks: UserLocks,
    config: IntakeConfig,
}

impl IntakeService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        schedule: FieldSchedule,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn ChatTransport>,
        transcriber: Arc<dyn TranscriptionEngine>,
        rewriter: Arc<dyn RewriteClient>,
        renderer: Arc<dyn ReportRenderer>,
        mailer: Arc<dyn MailSender>,
        config: IntakeConfig,
    ) -> Self {
        assert!(!schedule.is_empty(), "field schedule must not be empty");
        Self {
            schedule,
            store,
            transport,
            transcriber,
            rewriter,
            renderer,
            mailer,
            locks: UserLocks::new(),
            config,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            user = %event.envelope().user_id,
            event_id = %event.envelope().event_id,
        )
    )]
    pub async fn handle(&self, event: InboundEvent) -> Result<IntakeOutcome, IntakeError> {
        let conversation = event.envelope().conversation_id.clone();
        let result = self.process(event).await;
        match &result {
            Ok(outcome) => tracing::debug!(?outcome, "event handled"),
            Err(error) => {
                tracing::error!(error = %error, "event failed, session left untouched");
                self.notify(&conversation, RETRY_MESSAGE).await;
            }
        }
        result
    }

    async fn process(&self, event: InboundEvent) -> Result<IntakeOutcome, IntakeError> {
        let user = event.envelope().user_id.clone();
        let _guard = self.locks.acquire(&user).await;

        let (session, created) = self.store.get_or_create(&user).await?;
        if session.already_handled(&event.envelope().event_id) {
            tracing::debug!("duplicate delivery absorbed");
            return Ok(IntakeOutcome::Duplicate);
        }

        match event {
            InboundEvent::CardSubmission(envelope) => self.handle_selection(envelope, session).await,
            InboundEvent::Message(envelope) => self.handle_message(envelope, session, created).await,
        }
    }

    async fn handle_selection(
        &self,
        envelope: EventEnvelope,
        mut session: Session,
    ) -> Result<IntakeOutcome, IntakeError> {
        let chosen = self
            .bounded(
                "card submission lookup",
                self.transport.fetch_card_submission(&envelope.event_id),
                IntakeError::Transport,
            )
            .await?;

        if session.phase == SessionPhase::Collecting {
            // An investigator is already on record for this session.
            tracing::debug!("selection while collecting, absorbed");
            return Ok(IntakeOutcome::Ignored);
        }

        let known = chosen
            .as_deref()
            .filter(|name| self.config.investigators.iter().any(|i| i == name));
        let Some(name) = known else {
            tracing::warn!(choice = ?chosen, "unrecognized investigator choice");
            self.transport
                .send_markdown(&envelope.conversation_id, UNKNOWN_INVESTIGATOR)
                .await?;
            self.send_roster_card(&envelope.conversation_id).await?;
            return Ok(IntakeOutcome::SelectionRejected);
        };

        session.record_selection(name.to_string());
        session.last_handled_event_id = Some(envelope.event_id.clone());
        self.store.save(&envelope.user_id, &session).await?;

        tracing::info!(investigator = %name, "investigator selected");
        let first_prompt = self
            .schedule
            .get(0)
            .map(|field| field.prompt.as_str())
            .unwrap_or_default();
        self.notify(
            &envelope.conversation_id,
            &format!("🧑‍✈️ تم اختيار {}.\n{}", name, first_prompt),
        )
        .await;
        Ok(IntakeOutcome::SelectionRecorded)
    }

    async fn handle_message(
        &self,
        envelope: EventEnvelope,
        mut session: Session,
        created: bool,
    ) -> Result<IntakeOutcome, IntakeError> {
        let detail = self
            .bounded(
                "message lookup",
                self.transport.fetch_message(&envelope.event_id),
                IntakeError::Transport,
            )
            .await?;

        if detail.sender_email.as_deref() == Some(self.config.bot_email.as_str()) {
            return Ok(IntakeOutcome::Ignored);
        }

        if detail.text.as_deref().is_some_and(is_reset_command) {
            self.store.delete(&envelope.user_id).await?;
            tracing::info!("session reset on user command");
            self.notify(&envelope.conversation_id, RESET_CONFIRMATION)
                .await;
            return Ok(IntakeOutcome::Reset);
        }

        if created {
            self.transport
                .send_markdown(&envelope.conversation_id, WELCOME)
                .await?;
            self.send_roster_card(&envelope.conversation_id).await?;
            self.mark_handled(&envelope, &mut session).await?;
            return Ok(IntakeOutcome::Welcomed);
        }

        match session.phase {
            SessionPhase::Selecting => {
                self.send_roster_card(&envelope.conversation_id).await?;
                self.mark_handled(&envelope, &mut session).await?;
                Ok(IntakeOutcome::SelectionReprompted)
            }
            SessionPhase::Collecting => match detail.attachment_urls.first() {
                Some(url) => {
                    // Only the first attachment counts.
                    if detail.attachment_urls.len() > 1 {
                        tracing::debug!(
                            ignored = detail.attachment_urls.len() - 1,
                            "extra attachments on message"
                        );
                    }
                    let url = url.clone();
                    self.collect_field(&envelope, session, &url).await
                }
                None => {
                    self.transport
                        .send_markdown(&envelope.conversation_id, VOICE_REMINDER)
                        .await?;
                    self.mark_handled(&envelope, &mut session).await?;
                    Ok(IntakeOutcome::Reminded)
                }
            },
        }
    }

    /// Runs the voice-note pipeline for the field at the session's current
    /// position. The session is saved (or, on the final field, deleted)
    /// only after every step succeeded.
    async fn collect_field(
        &self,
        envelope: &EventEnvelope,
        mut session: Session,
        url: &str,
    ) -> Result<IntakeOutcome, IntakeError> {
        let descriptor = self
            .schedule
            .get(session.position)
            .ok_or(IntakeError::CorruptSession("position beyond schedule"))?
            .clone();

        let audio = self
            .bounded(
                "attachment download",
                self.transport.download_attachment(url),
                IntakeError::Transport,
            )
            .await?;
        tracing::debug!(bytes = audio.len(), field = %descriptor.id, "voice note downloaded");

        let transcript = self
            .bounded(
                "transcription",
                self.transcriber.transcribe(&audio),
                IntakeError::Transcription,
            )
            .await?;
        tracing::debug!(chars = transcript.len(), "voice note transcribed");

        let polished = self
            .bounded(
                "rewrite",
                self.rewriter
                    .rewrite(descriptor.style, &descriptor.label, &transcript),
                IntakeError::Rewrite,
            )
            .await?;
        let polished = polished.trim().to_string();
        if polished.is_empty() {
            return Err(IntakeError::Rewrite(RewriteError::EmptyRewrite));
        }

        session.record_field(descriptor.id.clone(), polished);
        session.last_handled_event_id = Some(envelope.event_id.clone());
        debug_assert_eq!(session.collected_len(), session.position);

        if session.is_complete(&self.schedule) {
            return self.finish_session(envelope, &session).await;
        }

        self.store.save(&envelope.user_id, &session).await?;
        tracing::info!(field = %descriptor.id, position = session.position, "field collected");

        let next_prompt = self
            .schedule
            .get(session.position)
            .map(|field| field.prompt.as_str())
            .unwrap_or_default();
        self.notify(
            &envelope.conversation_id,
            &format!("✅ تم تسجيل {}.\n{}", descriptor.label, next_prompt),
        )
        .await;
        Ok(IntakeOutcome::FieldCollected(descriptor.id))
    }

    /// Terminal transition: render the report, mail it, drop the session.
    async fn finish_session(
        &self,
        envelope: &EventEnvelope,
        session: &Session,
    ) -> Result<IntakeOutcome, IntakeError> {
        let report = CompletedReport::from_session(&self.schedule, session).ok_or(
            IntakeError::CorruptSession("completed session is missing a collected value"),
        )?;

        self.notify(&envelope.conversation_id, ALL_FIELDS_RECEIVED)
            .await;

        let path = self
            .bounded(
                "report render",
                self.renderer.render(&report),
                IntakeError::Render,
            )
            .await?;

        let body = format!(
            "📎 يرجى مراجعة التقرير المرفق.\n\nمع تحيات فريق العمل، {}.",
            report.investigator
        );
        let mail = OutgoingReportMail {
            recipient: &self.config.report_recipient,
            subject: &self.config.mail_subject,
            body: &body,
            attachment: &path,
        };
        self.bounded("mail dispatch", self.mailer.send(mail), IntakeError::Mail)
            .await?;

        self.store.delete(&envelope.user_id).await?;
        tracing::info!(
            investigator = %report.investigator,
            report = %path.display(),
            "report dispatched, session closed"
        );
        self.notify(&envelope.conversation_id, REPORT_SENT).await;
        Ok(IntakeOutcome::Completed)
    }

    async fn send_roster_card(&self, conversation: &ConversationId) -> Result<(), IntakeError> {
        self.transport
            .send_selection_card(conversation, ROSTER_CARD_TITLE, &self.config.investigators)
            .await?;
        Ok(())
    }

    async fn mark_handled(
        &self,
        envelope: &EventEnvelope,
        session: &mut Session,
    ) -> Result<(), IntakeError> {
        session.last_handled_event_id = Some(envelope.event_id.clone());
        self.store.save(&envelope.user_id, session).await?;
        Ok(())
    }

    /// Best-effort outbound message after a committed transition; a send
    /// failure must not roll the transition back.
    async fn notify(&self, conversation: &ConversationId, text: &str) {
        if let Err(error) = self.transport.send_markdown(conversation, text).await {
            tracing::warn!(error = %error, "outbound notification failed");
        }
    }

    async fn bounded<T, E, F, M>(
        &self,
        stage: &'static str,
        operation: F,
        map_err: M,
    ) -> Result<T, IntakeError>
    where
        F: Future<Output = Result<T, E>>,
        M: FnOnce(E) -> IntakeError,
    {
        match tokio::time::timeout(self.config.collaborator_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(map_err(error)),
            Err(_) => Err(IntakeError::Timeout { stage }),
        }
    }
}

fn is_reset_command(text: &str) -> bool {
    let trimmed = text.trim();
    RESET_COMMANDS
        .iter()
        .any(|command| trimmed.eq_ignore_ascii_case(command))
}
