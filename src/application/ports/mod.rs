mod chat_transport;
mod mail_sender;
mod report_renderer;
mod rewrite_client;
mod session_store;
mod transcription_engine;

pub use chat_transport::{ChatTransport, ChatTransportError, MessageDetail};
pub use mail_sender::{MailSender, MailSenderError, OutgoingReportMail};
pub use report_renderer::{RenderError, ReportRenderer};
pub use rewrite_client::{RewriteClient, RewriteError};
pub use session_store::{SessionStore, SessionStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
