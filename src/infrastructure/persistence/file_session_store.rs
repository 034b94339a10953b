use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{SessionStore, SessionStoreError};
use crate::domain::{Session, UserId};

/// File-backed session store: the full user→session map is kept in memory
/// and written through to a JSON file on every mutation, so sessions
/// survive a process restart. Writes go to a sibling temp file first and
/// are moved into place.
pub struct FileSessionStore {
    path: PathBuf,
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl FileSessionStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let path = path.into();
        let sessions = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| SessionStoreError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SessionStoreError::Io(e)),
        };
        tracing::info!(path = %path.display(), "session file loaded");
        Ok(Self {
            path,
            sessions: RwLock::new(sessions),
        })
    }

    async fn persist(&self, sessions: &HashMap<UserId, Session>) -> Result<(), SessionStoreError> {
        let bytes = serde_json::to_vec_pretty(sessions)
            .map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_or_create(&self, user: &UserId) -> Result<(Session, bool), SessionStoreError> {
        let sessions = self.sessions.read().await;
        match sessions.get(user) {
            Some(session) => Ok((session.clone(), false)),
            None => Ok((Session::new(), true)),
        }
    }

    async fn save(&self, user: &UserId, session: &Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(user.clone(), session.clone());
        self.persist(&sessions).await
    }

    async fn delete(&self, user: &UserId) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(user).is_some() {
            self.persist(&sessions).await?;
        }
        Ok(())
    }
}
