//! Terminal chat handler
//!
//! Builds the engine from configuration and drives a single chat view from
//! a readline loop.

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::engine::{ChatEngine, ERROR_MARKER};
use crate::error::Result;
use crate::surface::{ChatView, ViewId, UNAVAILABLE_BANNER, WELCOME_NOTICE};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Start the interactive terminal chat
///
/// # Errors
///
/// Returns error if the engine cannot be built or the terminal cannot be
/// initialised
///
/// # Examples
///
/// ```no_run
/// use threadchat::commands::chat;
/// use threadchat::config::Config;
///
/// # async fn example() -> threadchat::error::Result<()> {
/// chat::run_chat(Config::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_chat(config: Config) -> Result<()> {
    tracing::info!("Starting terminal chat");

    let engine = match ChatEngine::from_config(&config.provider) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}", UNAVAILABLE_BANNER.red().bold());
            eprintln!("{}", e.to_string().red());
            return Err(e);
        }
    };

    let mut rl = DefaultEditor::new()?;
    let mut view = ChatView::new(ViewId::new());

    print_welcome_banner(&config, &engine);

    loop {
        match rl.readline(&format!("{} ", ">>".cyan().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::Clear) => {
                        view.clear();
                        println!("{}\n", "Chat cleared. Starting a new conversation.".green());
                        continue;
                    }
                    Ok(SpecialCommand::Count) => {
                        println!("Messages: {}\n", view.message_count());
                        continue;
                    }
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {}
                    Err(e) => {
                        eprintln!("{}\n", e.to_string().yellow());
                        continue;
                    }
                }

                rl.add_history_entry(trimmed)?;

                println!("{}", "Thinking...".dimmed());
                if let Some(reply) = view.submit(&engine, trimmed).await {
                    print_reply(&reply);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_welcome_banner(config: &Config, engine: &ChatEngine) {
    println!();
    println!("{}", config.server.title.bold());
    println!(
        "{}",
        format!("Provider: {} ({})", engine.provider_name(), engine.model()).dimmed()
    );
    println!("{}", WELCOME_NOTICE);
    println!("{}\n", "Type /help for commands, /exit to leave.".dimmed());
}

fn print_reply(reply: &str) {
    if reply.starts_with(ERROR_MARKER) {
        println!("{}\n", reply.red());
    } else {
        println!("{}\n", reply);
    }
}
