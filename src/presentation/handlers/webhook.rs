use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::{ConversationId, EventEnvelope, InboundEvent, UserId};
use crate::presentation::state::AppState;

/// Envelope the chat transport posts to the webhook. Full message/action
/// detail is fetched back from the transport API; only the ids travel
/// here.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub resource: String,
    #[serde(default)]
    pub event: Option<String>,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub id: String,
    pub room_id: String,
    pub person_id: String,
}

#[tracing::instrument(skip_all, fields(resource = %envelope.resource))]
pub async fn webhook_handler(
    State(state): State<AppState>,
    Json(envelope): Json<WebhookEnvelope>,
) -> impl IntoResponse {
    let Some(event) = map_envelope(envelope) else {
        tracing::debug!("irrelevant webhook delivery skipped");
        return (StatusCode::OK, "ignored");
    };

    // The transport only needs acknowledgement; failures were already
    // reported to the user and are retried by resending the input.
    match state.intake_service.handle(event).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "webhook delivery processed");
            (StatusCode::OK, "OK")
        }
        Err(error) => {
            tracing::error!(error = %error, "webhook delivery failed");
            (StatusCode::OK, "OK")
        }
    }
}

pub async fn banner_handler() -> impl IntoResponse {
    (StatusCode::OK, "Bot is running")
}

fn map_envelope(envelope: WebhookEnvelope) -> Option<InboundEvent> {
    if envelope.event.as_deref().is_some_and(|e| e != "created") {
        return None;
    }

    let event_envelope = EventEnvelope {
        event_id: envelope.data.id,
        user_id: UserId::new(envelope.data.person_id),
        conversation_id: ConversationId::new(envelope.data.room_id),
    };

    match envelope.resource.as_str() {
        "messages" => Some(InboundEvent::Message(event_envelope)),
        "attachmentActions" => Some(InboundEvent::CardSubmission(event_envelope)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(resource: &str, event: Option<&str>) -> WebhookEnvelope {
        WebhookEnvelope {
            resource: resource.to_string(),
            event: event.map(str::to_string),
            data: WebhookData {
                id: "evt-1".to_string(),
                room_id: "room-1".to_string(),
                person_id: "person-1".to_string(),
            },
        }
    }

    #[test]
    fn message_and_card_resources_map_to_events() {
        assert!(matches!(
            map_envelope(envelope("messages", Some("created"))),
            Some(InboundEvent::Message(_))
        ));
        assert!(matches!(
            map_envelope(envelope("attachmentActions", None)),
            Some(InboundEvent::CardSubmission(_))
        ));
    }

    #[test]
    fn other_resources_and_non_created_events_are_skipped() {
        assert!(map_envelope(envelope("memberships", Some("created"))).is_none());
        assert!(map_envelope(envelope("messages", Some("deleted"))).is_none());
    }
}
