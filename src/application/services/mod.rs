mod intake_service;
mod user_locks;

pub use intake_service::{IntakeConfig, IntakeError, IntakeOutcome, IntakeService};
pub use user_locks::UserLocks;
