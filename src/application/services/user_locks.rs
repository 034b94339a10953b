use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Serializes event handling per user id: at most one in-flight mutation
/// per user, while events for different users proceed in parallel.
///
/// Entries live for the process lifetime. The user population is the
/// fixed investigator team, so the map stays small.
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user: &UserId) -> OwnedMutexGuard<()> {
        let user_lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(user.clone()).or_default())
        };
        user_lock.lock_owned().await
    }
}
