use async_trait::async_trait;

use crate::domain::{Session, UserId};

/// Persistence seam for per-user sessions. The store never mutates state
/// on its own: `get_or_create` hands out a fresh record without recording
/// it; only `save` persists, so a failed event leaves no trace and the
/// user can safely retry.
///
/// Callers must serialize access per user id (see `UserLocks`); the store
/// itself only guarantees that individual calls are safe.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session for the user, or a fresh one at the
    /// initial phase. The boolean is true when the session was created by
    /// this call (first contact).
    async fn get_or_create(&self, user: &UserId) -> Result<(Session, bool), SessionStoreError>;

    /// Persists the mutated session so the next event for the same user
    /// observes it.
    async fn save(&self, user: &UserId, session: &Session) -> Result<(), SessionStoreError>;

    /// Removes the session (after completion or reset). Deleting an
    /// absent session is a no-op.
    async fn delete(&self, user: &UserId) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session data: {0}")]
    Corrupt(String),
}
