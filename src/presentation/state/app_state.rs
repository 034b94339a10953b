use std::sync::Arc;

use crate::application::services::IntakeService;

#[derive(Clone)]
pub struct AppState {
    pub intake_service: Arc<IntakeService>,
}
