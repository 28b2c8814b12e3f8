//! Prompt command parsing.

use std::str::FromStr;

use thiserror::Error;

use crate::domain::{RoomSlug, UserId, ValueObjectError};

/// Prompt help text.
pub const HELP: &str = "\
Commands:
  /open <slug>       open a room (closes the current one)
  /close             close the current room
  /leave             leave the current room
  /members           show the member list
  /add <id>...       add members by user id
  /remove <id>       remove a member by user id
  /typing            tell the room you are typing (also sent as you type)
  /help              show this help
  /quit              exit
Any other line is sent as a message. Start a line with // to send a leading /.";

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Open(RoomSlug),
    Close,
    Leave,
    Members,
    Add(Vec<UserId>),
    Remove(UserId),
    Typing,
    /// Sent by the prompt on keystrokes; dropped silently without a room
    TypingPing,
    /// Plain message text, untrimmed
    Say(String),
    Help,
    Quit,
}

/// Errors parsing a prompt line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command '/{0}'. Type /help for the list of commands.")]
    UnknownCommand(String),

    #[error(transparent)]
    InvalidArgument(#[from] ValueObjectError),
}

impl FromStr for UserCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.trim_start().strip_prefix('/') else {
            return Ok(Self::Say(line.to_string()));
        };
        if command.starts_with('/') {
            return Ok(Self::Say(command.to_string()));
        }

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "open" | "join" => {
                let slug = words
                    .next()
                    .ok_or(CommandParseError::MissingArgument("/open <slug>"))?;
                Ok(Self::Open(RoomSlug::new(slug.to_string())?))
            }
            "close" => Ok(Self::Close),
            "leave" => Ok(Self::Leave),
            "members" => Ok(Self::Members),
            "add" => {
                let ids = words
                    .map(UserId::from_str)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Add(ids))
            }
            "remove" => {
                let id = words
                    .next()
                    .ok_or(CommandParseError::MissingArgument("/remove <id>"))?;
                Ok(Self::Remove(id.parse()?))
            }
            "typing" => Ok(Self::Typing),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}
