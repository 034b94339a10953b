use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{SessionStore, SessionStoreError};
use crate::domain::{Session, UserId};

/// In-process session store. Known limitation: sessions do not survive a
/// process restart; configure a session file to get the file-backed store
/// instead.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, user: &UserId) -> Result<(Session, bool), SessionStoreError> {
        let sessions = self.sessions.read().await;
        match sessions.get(user) {
            Some(session) => Ok((session.clone(), false)),
            None => Ok((Session::new(), true)),
        }
    }

    async fn save(&self, user: &UserId, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(user.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, user: &UserId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(user);
        Ok(())
    }
}
