//! The conversation engine
//!
//! Wraps a provider and a session store. Every turn sends the whole history
//! plus the new user text to the provider, then records both messages.

use crate::config::ProviderConfig;
use crate::engine::{SessionId, SessionStore};
use crate::error::{Result, ThreadchatError};
use crate::providers::{create_provider, Message, Provider};

/// Prefix of every reply produced from a failure instead of the model
pub const ERROR_MARKER: &str = "Sorry, I encountered an error:";

/// Reply recorded when the model answers with empty text
pub const FALLBACK_REPLY: &str = "I couldn't generate a response.";

/// Format an error as a user-visible reply
///
/// # Examples
///
/// ```
/// use threadchat::engine::{error_reply, ERROR_MARKER};
///
/// let reply = error_reply(&anyhow::anyhow!("quota exceeded"));
/// assert!(reply.starts_with(ERROR_MARKER));
/// assert!(reply.ends_with("quota exceeded"));
/// ```
pub fn error_reply(err: &anyhow::Error) -> String {
    format!("{} {}", ERROR_MARKER, err)
}

/// Conversation engine with per-session memory
///
/// # Examples
///
/// ```no_run
/// use threadchat::config::ProviderConfig;
/// use threadchat::engine::{ChatEngine, SessionId};
///
/// # async fn example() -> threadchat::error::Result<()> {
/// let engine = ChatEngine::from_config(&ProviderConfig::default())?;
/// let session = SessionId::new();
/// let reply = engine.respond(session, "Hello!").await;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct ChatEngine {
    provider: Box<dyn Provider>,
    sessions: SessionStore,
}

impl ChatEngine {
    /// Create an engine around an already constructed provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        tracing::info!(
            "Chat engine ready: provider={}, model={}",
            provider.name(),
            provider.model()
        );
        Self {
            provider,
            sessions: SessionStore::new(),
        }
    }

    /// Build the configured provider and wrap it in an engine
    ///
    /// # Errors
    ///
    /// Returns `ThreadchatError::MissingCredentials` when the provider has no
    /// credential, or a provider error if it cannot be initialised
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(create_provider(config)?))
    }

    /// Name of the provider backing this engine
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model the provider talks to
    pub fn model(&self) -> String {
        self.provider.model()
    }

    /// Run one turn and always produce a reply
    ///
    /// Failures come back as text starting with [`ERROR_MARKER`]. This
    /// function never returns an error and never panics.
    pub async fn respond(&self, session_id: SessionId, user_text: &str) -> String {
        match self.try_respond(session_id, user_text).await {
            Ok(reply) => reply,
            Err(e) => error_reply(&e),
        }
    }

    /// Run one turn, surfacing failures as errors
    ///
    /// Blank input is rejected before the session is touched. The user
    /// message and the reply are appended together once the provider call
    /// has finished, so a turn whose future is dropped mid-call leaves no
    /// trace. A provider failure still records the error-marked reply, so
    /// every completed turn contributes exactly two messages.
    ///
    /// # Errors
    ///
    /// Returns `ThreadchatError::InvalidInput` for whitespace-only text, or
    /// the provider's error when the model call fails
    pub async fn try_respond(&self, session_id: SessionId, user_text: &str) -> Result<String> {
        if user_text.trim().is_empty() {
            return Err(ThreadchatError::InvalidInput("message is empty".to_string()).into());
        }

        let handle = self.sessions.get_or_create(session_id).await;
        let mut conversation = handle.lock().await;

        let mut request = conversation.messages().to_vec();
        request.push(Message::user(user_text));

        tracing::debug!(
            "Session {}: sending {} messages (~{} tokens) to {}",
            session_id,
            request.len(),
            conversation.token_count(),
            self.provider.name()
        );

        let outcome = self.provider.complete(&request).await;

        conversation.add_user_message(user_text);
        match outcome {
            Ok(completion) => {
                let reply = if completion.message.content.trim().is_empty() {
                    tracing::warn!("Session {}: model returned an empty reply", session_id);
                    FALLBACK_REPLY.to_string()
                } else {
                    completion.message.content
                };
                conversation.add_assistant_message(reply.clone());
                tracing::info!(
                    "Session {}: turn {} complete",
                    session_id,
                    conversation.turn_count()
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Session {}: provider call failed: {:#}", session_id, e);
                conversation.add_assistant_message(error_reply(&e));
                Err(e)
            }
        }
    }

    /// Snapshot of a session's messages, empty for unknown ids
    pub async fn history(&self, session_id: SessionId) -> Vec<Message> {
        match self.sessions.get(session_id).await {
            Some(handle) => handle.lock().await.messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Number of sessions created so far
    pub async fn session_count(&self) -> usize {
        self.sessions.len().await
    }
}
