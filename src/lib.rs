//! threadchat - Conversational chatbot library
//!
//! This library provides a conversation engine with per-session memory on
//! top of a hosted language model, and the browser and terminal surfaces
//! that drive it.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `engine`: Conversation engine, session store and message history
//! - `providers`: Model provider abstraction and implementations (Gemini, Ollama)
//! - `surface`: Browser chat views, page rendering and HTTP routes
//! - `commands`: Entry points for the `serve` and `chat` subcommands
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use threadchat::{ChatEngine, Config, SessionId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let engine = ChatEngine::from_config(&config.provider)?;
//!     let reply = engine.respond(SessionId::new(), "Hello!").await;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod surface;

// Re-export commonly used types
pub use config::Config;
pub use engine::{ChatEngine, SessionId, ERROR_MARKER};
pub use error::{Result, ThreadchatError};
pub use surface::{AppState, ChatView};

#[cfg(test)]
pub mod test_utils;
