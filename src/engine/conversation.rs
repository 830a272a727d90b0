//! Conversation history for a single session
//!
//! A conversation is an append-only list of messages. There is no pruning
//! and no summarisation: the full history is sent to the provider on every
//! turn.

use crate::providers::{Message, Role};
use chrono::{DateTime, Utc};

/// Ordered message history of one session
///
/// # Token Counting
///
/// Uses a simple heuristic: characters / 4. The estimate only feeds debug
/// logging; nothing is limited or billed on it.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    token_count: usize,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::engine::Conversation;
    ///
    /// let conversation = Conversation::new();
    /// assert!(conversation.is_empty());
    /// assert_eq!(conversation.token_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            token_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Adds a user message to the conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::engine::Conversation;
    ///
    /// let mut conversation = Conversation::new();
    /// conversation.add_user_message("Hello, assistant!");
    /// assert_eq!(conversation.len(), 1);
    /// ```
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Adds an assistant message to the conversation
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        self.token_count += Self::estimate_tokens(&message.content);
        self.messages.push(message);
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true when no message has been added yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed user turns
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }

    /// Estimated token count of the whole history
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// When the conversation was started
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn estimate_tokens(text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
