//! Session identifiers and the in-memory session store

use crate::engine::Conversation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Opaque identifier of a conversation thread
///
/// A fresh id is minted for every new browser view and on every clear.
/// Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a new random session id
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::engine::SessionId;
    ///
    /// assert_ne!(SessionId::new(), SessionId::new());
    /// ```
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Shared handle to one session's conversation
///
/// The mutex is held for a whole turn, provider call included, so turns on
/// the same session run one at a time.
pub type SessionHandle = Arc<Mutex<Conversation>>;

/// Mapping from session id to conversation, held for the process lifetime
///
/// The map lock is only taken to look up or insert a handle; it is never
/// held across a provider call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session, creating an empty conversation for unknown ids
    pub async fn get_or_create(&self, id: SessionId) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(&id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(id).or_insert_with(|| {
            tracing::debug!("Creating session {}", id);
            Arc::new(Mutex::new(Conversation::new()))
        }))
    }

    /// Look up a session without creating it
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Number of sessions held
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no session has been created yet
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
