mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use taqrir::application::ports::SessionStore;
use taqrir::domain::SessionPhase;
use taqrir::presentation::{AppState, create_router};

use common::{INVESTIGATOR, harness, user};

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let h = harness();
    let router = create_router(AppState {
        intake_service: h.service,
    });

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("healthy"));
}

#[tokio::test]
async fn banner_route_confirms_the_bot_is_running() {
    let h = harness();
    let router = create_router(AppState {
        intake_service: h.service,
    });

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn message_webhook_drives_the_intake_service() {
    let h = harness();
    h.transport.script_text_message("msg-1", "مرحبا").await;
    let router = create_router(AppState {
        intake_service: h.service.clone(),
    });

    let envelope = serde_json::json!({
        "resource": "messages",
        "event": "created",
        "data": {"id": "msg-1", "roomId": "room-1", "personId": "u1"}
    });
    let response = router.oneshot(json_request("/webhook", envelope)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (session, created) = h.store.get_or_create(&user("u1")).await.unwrap();
    assert!(!created);
    assert_eq!(session.phase, SessionPhase::Selecting);
    assert_eq!(h.transport.cards_sent(), 1);
}

#[tokio::test]
async fn card_submission_webhook_records_the_selection() {
    let h = harness();
    h.transport.script_text_message("msg-1", "مرحبا").await;
    h.transport
        .script_submission("action-1", Some(INVESTIGATOR))
        .await;
    let router = create_router(AppState {
        intake_service: h.service.clone(),
    });

    let first_contact = serde_json::json!({
        "resource": "messages",
        "event": "created",
        "data": {"id": "msg-1", "roomId": "room-1", "personId": "u1"}
    });
    router
        .clone()
        .oneshot(json_request("/webhook", first_contact))
        .await
        .unwrap();

    let submission = serde_json::json!({
        "resource": "attachmentActions",
        "event": "created",
        "data": {"id": "action-1", "roomId": "room-1", "personId": "u1"}
    });
    let response = router
        .oneshot(json_request("/webhook", submission))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (session, _) = h.store.get_or_create(&user("u1")).await.unwrap();
    assert_eq!(session.phase, SessionPhase::Collecting);
    assert_eq!(session.investigator(), Some(INVESTIGATOR));
}

#[tokio::test]
async fn unrelated_webhook_resources_are_acknowledged_and_skipped() {
    let h = harness();
    let router = create_router(AppState {
        intake_service: h.service.clone(),
    });

    let envelope = serde_json::json!({
        "resource": "memberships",
        "event": "created",
        "data": {"id": "m-1", "roomId": "room-1", "personId": "u1"}
    });
    let response = router.oneshot(json_request("/webhook", envelope)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (_, created) = h.store.get_or_create(&user("u1")).await.unwrap();
    assert!(created);
}

#[tokio::test]
async fn malformed_webhook_payload_is_rejected() {
    let h = harness();
    let router = create_router(AppState {
        intake_service: h.service,
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn webhook_responses_carry_a_delivery_id() {
    let h = harness();
    let router = create_router(AppState {
        intake_service: h.service,
    });

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-delivery-id"));
}
