use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of the end user walking through the intake flow, as reported
/// by the chat transport. One session exists per user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat room the event arrived from and replies go back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Common envelope of every inbound webhook event. The event id doubles as
/// the idempotency key and as the handle for fetching full details from
/// the transport.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub event_id: String,
    pub user_id: UserId,
    pub conversation_id: ConversationId,
}

/// One inbound event from the chat transport.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A message was posted: plain text or one carrying file attachments.
    /// Full detail (author, text, attachments) is fetched via the transport.
    Message(EventEnvelope),
    /// An interactive-card submission (investigator selection).
    CardSubmission(EventEnvelope),
}

impl InboundEvent {
    pub fn envelope(&self) -> &EventEnvelope {
        match self {
            InboundEvent::Message(envelope) | InboundEvent::CardSubmission(envelope) => envelope,
        }
    }
}
