mod delivery_id;
mod init_tracing;
mod transcript_sanitizer;

pub use delivery_id::{DELIVERY_ID_HEADER, DeliveryId, delivery_id_middleware};
pub use init_tracing::{TracingConfig, init_tracing};
pub use transcript_sanitizer::sanitize_transcript;
