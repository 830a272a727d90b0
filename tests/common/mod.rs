use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use threadchat::error::{Result, ThreadchatError};
use threadchat::providers::{CompletionResponse, Message, Provider};

/// Provider answering from a script, then echoing the last user message
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    pub calls: Arc<Mutex<Vec<Vec<Message>>>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: Arc::default(),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            format!("echo: {}", last)
        });
        Ok(CompletionResponse::new(Message::assistant(reply)))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> String {
        "scripted-1".to_string()
    }
}

/// Provider whose every call fails
#[allow(dead_code)]
pub struct BrokenProvider(pub &'static str);

#[async_trait]
impl Provider for BrokenProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
        Err(ThreadchatError::Provider(self.0.to_string()).into())
    }

    fn name(&self) -> &str {
        "broken"
    }

    fn model(&self) -> String {
        "broken-1".to_string()
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
