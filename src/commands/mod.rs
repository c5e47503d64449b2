//! Chat commands and the keyword registry.
//!
//! A [`Command`] is one of three kinds (see [`CommandKind`]) plus its own
//! [`Cooldown`] record. Actions never touch the connection directly: they
//! return the chat lines to send, and the router turns those into writes.
//!
//! - `Text` replies with a fixed string, gated by its cooldown.
//! - `Add` / `Delete` edit text commands in the registry they are dispatched
//!   from. They require a broadcaster or moderator badge and are not
//!   cooldown-gated.

mod admin;
mod cooldown;
pub mod grammar;
mod registry;

pub use admin::is_admin;
pub use cooldown::Cooldown;
pub use registry::{CommandRegistry, SharedRegistry};

use slirc_chat::Tags;
use std::time::Duration;

/// Character that starts every command invocation.
pub const COMMAND_PREFIX: char = '!';

/// Cooldown applied when no other value is configured.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

/// What an invocation has to work with.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub user: &'a str,
    pub text: &'a str,
    pub tags: &'a Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Text(String),
    Add,
    Delete,
}

/// A registry entry.
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    cooldown: Cooldown,
}

impl Command {
    pub fn text(text: impl Into<String>, cooldown: Duration) -> Self {
        Self {
            kind: CommandKind::Text(text.into()),
            cooldown: Cooldown::new(cooldown),
        }
    }

    pub fn add() -> Self {
        Self {
            kind: CommandKind::Add,
            cooldown: Cooldown::new(DEFAULT_COOLDOWN),
        }
    }

    pub fn delete() -> Self {
        Self {
            kind: CommandKind::Delete,
            cooldown: Cooldown::new(DEFAULT_COOLDOWN),
        }
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, CommandKind::Text(_))
    }

    /// Response text of a text command.
    pub fn response(&self) -> Option<&str> {
        match &self.kind {
            CommandKind::Text(text) => Some(text),
            _ => None,
        }
    }
}
