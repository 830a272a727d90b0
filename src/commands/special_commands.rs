//! Special commands parser for the terminal chat
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything else is
//! sent to the assistant as a chat message.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Special commands that can be executed during a terminal chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Empty the transcript and start a new session
    Clear,

    /// Print the message counter
    Count,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the assistant.
    None,
}

/// Parse user input into a special command
///
/// # Errors
///
/// Returns `CommandError` for unknown slash commands and for arguments
/// passed to commands that take none
///
/// # Examples
///
/// ```
/// use threadchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/clear"), Ok(SpecialCommand::Clear));
/// assert_eq!(parse_special_command("hello"), Ok(SpecialCommand::None));
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match lower.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (lower.as_str(), ""),
    };

    let parsed = match command {
        "/clear" | "/new" => SpecialCommand::Clear,
        "/count" | "/messages" => SpecialCommand::Count,
        "/help" | "/?" => SpecialCommand::Help,
        "/exit" | "/quit" | "exit" | "quit" => SpecialCommand::Exit,
        _ => return Err(CommandError::UnknownCommand(trimmed.to_string())),
    };

    if !arg.is_empty() {
        return Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        });
    }

    Ok(parsed)
}

/// Print help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for the Terminal Chat
======================================

  /clear          - Clear the transcript and start a new conversation
  /count          - Show the number of messages on screen
  /help           - Show this help message
  /exit           - Leave the chat (also: exit, quit, Ctrl+D)

Anything else is sent to the assistant.
"#
    );
}
