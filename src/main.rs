//! threadchat - Conversational chatbot
//!
#![doc = "threadchat - Conversational chatbot"]
#![doc = "Main entry point for the threadchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threadchat::cli::{Cli, Commands};
use threadchat::commands;
use threadchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up GOOGLE_API_KEY and friends from a local .env file
    let dotenv = dotenvy::dotenv();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting browser chat server");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Chat { .. } => {
            tracing::info!("Starting terminal chat");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
/// this crate.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "threadchat=debug,tower_http=debug"
    } else {
        "threadchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
