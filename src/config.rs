//! Configuration management for threadchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ThreadchatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Gemini API credential
pub const GEMINI_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Provider types accepted by [`Config::validate`]
pub const VALID_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Main configuration structure for threadchat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, Ollama)
    pub provider: ProviderConfig,
    /// Browser surface configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider configuration
///
/// Specifies which model provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and proxies)
    ///
    /// When unset, `https://generativelanguage.googleapis.com` is used.
    #[serde(default)]
    pub api_base: Option<String>,

    /// API key; prefer the `GOOGLE_API_KEY` environment variable
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens in a reply
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            api_key: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl GeminiConfig {
    /// Resolve the API key from the config file or the environment
    ///
    /// A key set in the config file wins over `GOOGLE_API_KEY`. Blank
    /// values are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `ThreadchatError::MissingCredentials` if no key is available
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ThreadchatError::MissingCredentials(format!(
                    "gemini ({} not found in environment variables)",
                    GEMINI_API_KEY_ENV
                ))
                .into()
            })
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Browser surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Page title shown above the transcript
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8501
}

fn default_title() -> String {
    "Threadchat AI Assistant".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            title: default_title(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ThreadchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ThreadchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("THREADCHAT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("THREADCHAT_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("THREADCHAT_GEMINI_API_BASE") {
            self.provider.gemini.api_base = Some(api_base);
        }

        if let Ok(host) = std::env::var("THREADCHAT_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("THREADCHAT_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(host) = std::env::var("THREADCHAT_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("THREADCHAT_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid THREADCHAT_PORT: {}", port);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(provider) = cli.command.provider_override() {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.to_string();
        }

        if let Some(model) = cli.command.model_override() {
            tracing::debug!("Using model override: {}", model);
            match self.provider.provider_type.as_str() {
                "ollama" => self.provider.ollama.model = model.to_string(),
                _ => self.provider.gemini.model = model.to_string(),
            }
        }

        if let crate::cli::Commands::Serve { host, port, .. } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Name of the model the configured provider will use
    pub fn active_model(&self) -> &str {
        match self.provider.provider_type.as_str() {
            "ollama" => &self.provider.ollama.model,
            _ => &self.provider.gemini.model,
        }
    }

    /// Validate the configuration
    ///
    /// Credentials are not checked here: a missing API key is reported by
    /// provider construction so the browser surface can show it.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ThreadchatError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(ThreadchatError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.active_model().trim().is_empty() {
            return Err(ThreadchatError::Config("Model name cannot be empty".to_string()).into());
        }

        if !(0.0..=2.0).contains(&self.provider.gemini.temperature) {
            return Err(ThreadchatError::Config(
                "gemini.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.gemini.max_output_tokens == 0 {
            return Err(ThreadchatError::Config(
                "gemini.max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.host.trim().is_empty() {
            return Err(ThreadchatError::Config("server.host cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
