use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::session::config::{EVENT_CHANNEL_CAPACITY, SESSION_TOKEN_KEY, SESSION_USER_KEY};
use crate::session::errors::SessionError;
use crate::session::types::{SessionEvent, User};
use crate::storage::SessionStore;

struct ActiveSession {
    token: String,
    user: User,
}

/// Owns the in-memory session mirror, the durable store and the event hub.
///
/// The two storage keys are always written and cleared as a pair while the
/// store lock is held, so no observer can see a token without its user or
/// the other way round. The mirror is updated under that same lock, so the
/// store and the mirror cannot drift when operations race.
pub(crate) struct SessionManager {
    store: tokio::sync::Mutex<Box<dyn SessionStore>>,
    mirror: Mutex<Option<ActiveSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub(crate) fn new(store: Box<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: tokio::sync::Mutex::new(store),
            mirror: Mutex::new(None),
            events,
        }
    }

    /// Prepare the backing store. Called once from client bootstrap.
    pub(crate) async fn init_store(&self) -> Result<(), SessionError> {
        self.store
            .lock()
            .await
            .init()
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    /// Persist a fresh session: both keys written together, then the mirror,
    /// all before the store lock is released.
    pub(crate) async fn establish(&self, token: String, user: User) -> Result<(), SessionError> {
        let serialized =
            serde_json::to_string(&user).map_err(|e| SessionError::Serde(e.to_string()))?;

        let mut store = self.store.lock().await;
        store
            .put(SESSION_TOKEN_KEY, &token)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        if let Err(e) = store.put(SESSION_USER_KEY, &serialized).await {
            // Roll back to a signed-out state so a half-written session is
            // never restored or presented.
            let _ = self.purge(&mut store).await;
            return Err(SessionError::Storage(e.to_string()));
        }

        // Still under the store lock, so a concurrent clear cannot slip in
        // between the store write and the mirror write.
        let mut mirror = self.mirror.lock().unwrap();
        *mirror = Some(ActiveSession { token, user });
        Ok(())
    }

    /// Drop the session locally and in the store. Does not emit an event.
    pub(crate) async fn clear(&self) -> Result<(), SessionError> {
        let mut store = self.store.lock().await;
        self.purge(&mut store).await
    }

    /// Clear the mirror and both stored keys through a held store guard.
    async fn purge(&self, store: &mut Box<dyn SessionStore>) -> Result<(), SessionError> {
        // Mirror first: even if the removals fail below, the process stops
        // presenting credentials immediately.
        {
            let mut mirror = self.mirror.lock().unwrap();
            *mirror = None;
        }

        let token_removed = store.remove(SESSION_TOKEN_KEY).await;
        let user_removed = store.remove(SESSION_USER_KEY).await;

        token_removed.map_err(|e| SessionError::Storage(e.to_string()))?;
        user_removed.map_err(|e| SessionError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Handle a backend rejection: clear the session and notify subscribers.
    pub(crate) async fn reject(&self) {
        if let Err(e) = self.clear().await {
            tracing::error!("Failed to clear rejected session: {}", e);
        }
        if self.events.send(SessionEvent::Unauthenticated).is_err() {
            tracing::debug!("No subscribers for session event");
        }
    }

    /// Load a persisted session into the mirror. A half-written or unreadable
    /// pair is discarded rather than restored. The store lock is held from
    /// the first read through the mirror update.
    pub(crate) async fn restore(&self) -> Result<Option<User>, SessionError> {
        let mut store = self.store.lock().await;
        let token = store
            .get(SESSION_TOKEN_KEY)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        let serialized = store
            .get(SESSION_USER_KEY)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        match (token, serialized) {
            (Some(token), Some(serialized)) => match serde_json::from_str::<User>(&serialized) {
                Ok(user) => {
                    tracing::debug!(user_id = user.id, "Restored persisted session");
                    let mut mirror = self.mirror.lock().unwrap();
                    *mirror = Some(ActiveSession {
                        token,
                        user: user.clone(),
                    });
                    Ok(Some(user))
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable stored session: {}", e);
                    self.purge(&mut store).await?;
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                tracing::warn!("Discarding half-written stored session");
                self.purge(&mut store).await?;
                Ok(None)
            }
        }
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.mirror
            .lock()
            .unwrap()
            .as_ref()
            .map(|session| session.token.clone())
    }

    pub(crate) fn user(&self) -> Option<User> {
        self.mirror
            .lock()
            .unwrap()
            .as_ref()
            .map(|session| session.user.clone())
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.mirror.lock().unwrap().is_some()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
