//! Conversation engine for threadchat
//!
//! This module contains the engine that turns user text into model replies,
//! along with the per-session conversation history it keeps in memory.

pub mod conversation;
pub mod core;
pub mod store;

pub use conversation::Conversation;
pub use core::{error_reply, ChatEngine, ERROR_MARKER, FALLBACK_REPLY};
pub use store::{SessionHandle, SessionId, SessionStore};
