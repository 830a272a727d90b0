//! Test utilities for threadchat
//!
//! This module provides scripted providers for driving the engine without a
//! network, plus configuration and assertion helpers.

use crate::config::{Config, GeminiConfig};
use crate::error::{Result, ThreadchatError};
use crate::providers::{CompletionResponse, Message, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Every message list a provider was called with, in call order
pub type RecordedCalls = Arc<Mutex<Vec<Vec<Message>>>>;

/// Provider that answers from a script and records its inputs
///
/// Once the script is exhausted it answers `"Mock reply <n>"` where `n` is
/// the 1-based call number.
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<String>>,
    calls: RecordedCalls,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a provider with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that returns `replies` in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: RecordedCalls::default(),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the recorded calls
    pub fn calls(&self) -> RecordedCalls {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.to_vec());
            calls.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("Mock reply {}", call_number));
        Ok(CompletionResponse::new(Message::assistant(reply)))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> String {
        "mock-model".to_string()
    }
}

/// Provider whose every call fails with a provider error
#[derive(Debug)]
pub struct FailingProvider {
    detail: String,
}

impl FailingProvider {
    /// Create a provider failing with `detail`
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
        Err(ThreadchatError::Provider(self.detail.clone()).into())
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> String {
        "failing-model".to_string()
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Default configuration with a placeholder Gemini key
///
/// The key keeps tests independent of `GOOGLE_API_KEY` in the environment.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.gemini = GeminiConfig {
        api_key: Some("test-key".to_string()),
        ..Default::default()
    };
    config
}

/// Test configuration as YAML
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: ollama
  gemini:
    model: gemini-2.0-flash
    temperature: 0.2
  ollama:
    host: http://localhost:11434
    model: llama3.2:latest

server:
  host: 0.0.0.0
  port: 9000
  title: Test Assistant
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_follows_script_then_numbers() {
        let provider = MockProvider::with_replies(["scripted"]);
        let first = provider.complete(&[Message::user("a")]).await.unwrap();
        let second = provider.complete(&[Message::user("b")]).await.unwrap();

        assert_eq!(first.message.content, "scripted");
        assert_eq!(second.message.content, "Mock reply 2");
        assert_eq!(provider.calls().lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_provider_fails() {
        let provider = FailingProvider::new("nope");
        assert_error_contains(provider.complete(&[]).await, "nope");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<()> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    fn test_test_config_validates() {
        let config = test_config();
        assert_eq!(config.provider.provider_type, "gemini");
        assert!(config.validate().is_ok());
        assert!(config.provider.gemini.resolve_api_key().is_ok());
    }
}
