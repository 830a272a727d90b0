//! Google Gemini provider implementation for threadchat
//!
//! This module implements the Provider trait for the Gemini
//! `generateContent` REST endpoint of the Generative Language API.

use crate::config::GeminiConfig;
use crate::error::{Result, ThreadchatError};
use crate::providers::{CompletionResponse, Message, Provider, Role, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Generative Language API endpoint
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API provider
///
/// Sends the whole conversation on every call; Gemini keeps no server-side
/// state between requests.
///
/// # Examples
///
/// ```no_run
/// use threadchat::config::GeminiConfig;
/// use threadchat::providers::{GeminiProvider, Message, Provider};
///
/// # async fn example() -> threadchat::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default())?;
/// let completion = provider.complete(&[Message::user("Hello!")]).await?;
/// println!("{}", completion.message.content);
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

/// One turn of the conversation in Gemini format
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Content part; only text parts are produced or consumed
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

/// Sampling parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns `ThreadchatError::MissingCredentials` when no API key is
    /// configured, or a provider error if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("threadchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ThreadchatError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Gemini provider: model={}, temperature={}, max_output_tokens={}",
            config.model,
            config.temperature,
            config.max_output_tokens
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Full URL of the `generateContent` endpoint for the configured model
    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/v1beta/models/{}:generateContent", base, self.config.model)
    }

    /// Convert threadchat messages to Gemini contents
    fn convert_messages(&self, messages: &[Message]) -> Vec<GeminiContent> {
        messages
            .iter()
            .map(|m| GeminiContent {
                role: match m.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "model".to_string(),
                },
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect()
    }

    /// Pull the reply text out of a response
    ///
    /// Text parts of the first candidate are concatenated. A response
    /// without candidates is an error.
    fn extract_reply(response: GeminiResponse) -> Result<CompletionResponse> {
        let usage = response
            .usage_metadata
            .as_ref()
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count));

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked: {}", r))
                .unwrap_or_else(|| "response contained no candidates".to_string());
            return Err(ThreadchatError::Provider(format!("Gemini {}", reason)).into());
        };

        if let Some(reason) = &candidate.finish_reason {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let message = Message::assistant(text);
        Ok(match usage {
            Some(usage) => CompletionResponse::with_usage(message, usage),
            None => CompletionResponse::new(message),
        })
    }

    /// Build a readable error from a non-2xx response body
    fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.status.is_empty() => format!(
                "Gemini returned error {}: {} ({})",
                status, envelope.error.message, envelope.error.status
            ),
            Ok(envelope) => format!("Gemini returned error {}: {}", status, envelope.error.message),
            Err(_) => format!("Gemini returned error {}: {}", status, body),
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let request = GeminiRequest {
            contents: self.convert_messages(messages),
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        tracing::debug!(
            "Sending Gemini request: model={}, {} messages",
            self.config.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                ThreadchatError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(ThreadchatError::Provider(Self::describe_error(status, &error_text)).into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            ThreadchatError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let completion = Self::extract_reply(gemini_response)?;
        if let Some(usage) = completion.usage {
            tracing::debug!(
                "Gemini response: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(completion)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
