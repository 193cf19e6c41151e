use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::{SessionState, UserId};

/// Per-process session store keyed by user identity.
///
/// Each user gets an independent async mutex, so one user's long-running
/// event (e.g. a generation round trip) serializes only that user's events.
/// The outer map lock is only held to look up or insert an entry.
#[derive(Default)]
pub struct SessionCache {
    entries: Mutex<HashMap<UserId, Arc<AsyncMutex<SessionState>>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, user: UserId) -> Arc<AsyncMutex<SessionState>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(user).or_default())
    }

    /// Lock the user's session, creating an empty one on first use.
    pub async fn lock(&self, user: UserId) -> OwnedMutexGuard<SessionState> {
        self.entry(user).lock_owned().await
    }

    /// Drop the user's session. Returns `true` if one existed.
    pub fn remove(&self, user: UserId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WizardStep;
    use std::time::Duration;

    #[tokio::test]
    async fn sessions_are_created_lazily_and_isolated() {
        let cache = SessionCache::new();
        assert!(cache.is_empty());

        cache.lock(1).await.wizard = WizardStep::AwaitingAllergies;
        assert_eq!(cache.lock(2).await.wizard, WizardStep::None);
        assert_eq!(cache.lock(1).await.wizard, WizardStep::AwaitingAllergies);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn remove_resets_state() {
        let cache = SessionCache::new();
        cache.lock(1).await.wizard = WizardStep::AwaitingDietaryRestrictions;
        assert!(cache.remove(1));
        assert!(!cache.remove(1));
        assert_eq!(cache.lock(1).await.wizard, WizardStep::None);
    }

    #[tokio::test]
    async fn other_users_are_not_blocked() {
        let cache = Arc::new(SessionCache::new());
        let held = cache.lock(1).await;

        // User 2 proceeds while user 1 is locked.
        let other = tokio::time::timeout(Duration::from_secs(1), cache.lock(2)).await;
        assert!(other.is_ok());

        // User 1 waits until released.
        let blocked = tokio::time::timeout(Duration::from_millis(50), cache.lock(1)).await;
        assert!(blocked.is_err());
        drop(held);
        assert!(tokio::time::timeout(Duration::from_secs(1), cache.lock(1))
            .await
            .is_ok());
    }
}
