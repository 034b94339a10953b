use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const DELIVERY_ID_HEADER: &str = "x-delivery-id";

/// Correlation id of one webhook delivery, generated when the transport
/// did not supply one. Echoed back in the response headers.
#[derive(Clone, Debug)]
pub struct DeliveryId(pub String);

pub async fn delivery_id_middleware(mut request: Request, next: Next) -> Response {
    let delivery_id = request
        .headers()
        .get(DELIVERY_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(DeliveryId(delivery_id.clone()));

    let span = tracing::info_span!(
        "delivery",
        delivery_id = %delivery_id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(header_value) = HeaderValue::from_str(&delivery_id) {
        response
            .headers_mut()
            .insert(DELIVERY_ID_HEADER, header_value);
    }

    response
}
