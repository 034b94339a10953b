mod event;
mod field_schedule;
mod report;
mod session;

pub use event::{ConversationId, EventEnvelope, InboundEvent, UserId};
pub use field_schedule::{FieldDescriptor, FieldId, FieldSchedule, RewriteStyle};
pub use report::{CompletedReport, ReportSection};
pub use session::{Session, SessionPhase};
