//! Provider module for threadchat
//!
//! This module contains the model provider abstraction and implementations
//! for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionResponse, Message, Provider, Role, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, ThreadchatError};

/// Create a provider instance based on configuration
///
/// This is the point where a missing credential surfaces: the Gemini
/// provider refuses to build without an API key.
///
/// # Arguments
///
/// * `config` - Provider configuration; `provider_type` selects the backend
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```no_run
/// use threadchat::config::ProviderConfig;
/// use threadchat::providers::create_provider;
///
/// # fn example() -> threadchat::error::Result<()> {
/// let provider = create_provider(&ProviderConfig::default())?;
/// println!("using {} ({})", provider.name(), provider.model());
/// # Ok(())
/// # }
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match config.provider_type.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone())?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone())?)),
        other => Err(ThreadchatError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
