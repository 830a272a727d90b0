//! Chat view state
//!
//! A view is one browser chat surface. It owns the transcript it displays and
//! the id of the engine session it talks to. Clearing a view swaps in a fresh
//! session id; the engine keeps the old history but nothing points at it any
//! more.

use crate::engine::{ChatEngine, SessionId};
use crate::providers::Message;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Identifier of a browser view, carried in the page URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(Uuid);

impl ViewId {
    /// Mint a new random view id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ViewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Display state of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// Nothing submitted since the view was opened or last cleared
    Empty,
    /// At least one message on screen
    Active,
}

/// One browser chat surface
#[derive(Debug, Clone)]
pub struct ChatView {
    id: ViewId,
    session_id: SessionId,
    transcript: Vec<Message>,
}

impl ChatView {
    /// Open a view with a fresh session
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            session_id: SessionId::new(),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Engine session the view currently talks to
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Messages on screen, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    /// Value of the "Messages" counter
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn state(&self) -> ViewState {
        if self.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Active
        }
    }

    /// Run one turn through the engine
    ///
    /// The user entry and the reply land on the transcript together once the
    /// engine answers; a dropped call leaves the transcript as it was. Blank
    /// input is ignored and returns `None`.
    pub async fn submit(&mut self, engine: &ChatEngine, prompt: &str) -> Option<String> {
        if prompt.trim().is_empty() {
            tracing::debug!("View {}: ignoring blank prompt", self.id);
            return None;
        }

        let reply = engine.respond(self.session_id, prompt).await;
        self.transcript.push(Message::user(prompt));
        self.transcript.push(Message::assistant(reply.clone()));
        Some(reply)
    }

    /// Empty the transcript and switch to a brand new session
    pub fn clear(&mut self) {
        let previous = std::mem::replace(&mut self.session_id, SessionId::new());
        self.transcript.clear();
        tracing::info!(
            "View {}: cleared, session {} replaced by {}",
            self.id,
            previous,
            self.session_id
        );
    }

    /// Serializable copy of the view
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view_id: self.id,
            session_id: self.session_id,
            state: self.state(),
            message_count: self.message_count(),
            messages: self.transcript.clone(),
        }
    }
}

/// View contents as rendered into pages and returned by the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub view_id: ViewId,
    pub session_id: SessionId,
    pub state: ViewState,
    pub message_count: usize,
    pub messages: Vec<Message>,
}

/// Shared handle to one view
pub type ViewHandle = Arc<Mutex<ChatView>>;

/// Views that have had at least one message posted to them
///
/// Opening or rendering a view does not register it; the first POST does.
/// Registered views are never evicted.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: RwLock<HashMap<ViewId, ViewHandle>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registered view
    pub async fn get(&self, id: ViewId) -> Option<ViewHandle> {
        self.views.read().await.get(&id).cloned()
    }

    /// Look up a view, registering a fresh one under `id` if it is unknown
    pub async fn get_or_create(&self, id: ViewId) -> ViewHandle {
        if let Some(handle) = self.views.read().await.get(&id) {
            return Arc::clone(handle);
        }

        let mut views = self.views.write().await;
        Arc::clone(views.entry(id).or_insert_with(|| {
            tracing::debug!("Registered view {}", id);
            Arc::new(Mutex::new(ChatView::new(id)))
        }))
    }

    /// Number of views held
    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.read().await.is_empty()
    }
}
