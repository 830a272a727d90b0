//! Command-line interface definition for threadchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the browser chat server and a terminal chat.

use clap::{Parser, Subcommand};

/// threadchat - Conversational chatbot with per-session memory
///
/// Serves a browser chat UI backed by a hosted language model, or chats
/// with the same engine directly from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "threadchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for threadchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the browser chat UI
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the provider from config (gemini, ollama)
        #[arg(long)]
        provider: Option<String>,

        /// Override the model of the selected provider
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Chat with the assistant in the terminal
    Chat {
        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model of the selected provider
        #[arg(short, long)]
        model: Option<String>,
    },
}

impl Commands {
    /// Provider override carried by the command, if any
    pub fn provider_override(&self) -> Option<&str> {
        match self {
            Commands::Serve { provider, .. } | Commands::Chat { provider, .. } => {
                provider.as_deref()
            }
        }
    }

    /// Model override carried by the command, if any
    pub fn model_override(&self) -> Option<&str> {
        match self {
            Commands::Serve { model, .. } | Commands::Chat { model, .. } => model.as_deref(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve {
                host: None,
                port: None,
                provider: None,
                model: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { .. }));
        assert!(cli.command.provider_override().is_none());
    }

    #[test]
    fn test_cli_parse_serve_command() {
        let cli = Cli::try_parse_from(["threadchat", "serve"]).unwrap();
        if let Commands::Serve {
            host,
            port,
            provider,
            model,
        } = cli.command
        {
            assert!(host.is_none());
            assert!(port.is_none());
            assert!(provider.is_none());
            assert!(model.is_none());
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "threadchat",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--provider",
            "ollama",
            "--model",
            "llama3.2:1b",
        ])
        .unwrap();
        assert_eq!(cli.command.provider_override(), Some("ollama"));
        assert_eq!(cli.command.model_override(), Some("llama3.2:1b"));
        if let Commands::Serve { host, port, .. } = cli.command {
            assert_eq!(host, Some("0.0.0.0".to_string()));
            assert_eq!(port, Some(9000));
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_serve_invalid_port() {
        let cli = Cli::try_parse_from(["threadchat", "serve", "--port", "not-a-port"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_chat_with_provider() {
        let cli = Cli::try_parse_from(["threadchat", "chat", "-p", "ollama"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { .. }));
        assert_eq!(cli.command.provider_override(), Some("ollama"));
        assert!(cli.command.model_override().is_none());
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli =
            Cli::try_parse_from(["threadchat", "-v", "--config", "custom.yaml", "chat"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["threadchat"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["threadchat", "invalid"]);
        assert!(cli.is_err());
    }
}
