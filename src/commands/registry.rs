//! Keyword → command mapping and dispatch.

use super::{Command, CommandContext, CommandKind, DEFAULT_COOLDOWN, admin};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Registry shared between the session (dispatch) and the autosave task.
///
/// Each dispatch holds the lock for the whole action, so a save never sees a
/// half-applied edit.
pub type SharedRegistry = Arc<Mutex<CommandRegistry>>;

/// Keyword to command map.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    /// Cooldown given to text commands created from chat.
    default_cooldown: Duration,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CommandRegistry {
    pub fn new(default_cooldown: Duration) -> Self {
        Self {
            commands: HashMap::new(),
            default_cooldown,
        }
    }

    /// Registry for a first start: `!addcom` and `!delcom` only.
    pub fn with_builtins(default_cooldown: Duration) -> Self {
        let mut registry = Self::new(default_cooldown);
        registry.insert("addcom", Command::add());
        registry.insert("delcom", Command::delete());
        registry
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn default_cooldown(&self) -> Duration {
        self.default_cooldown
    }

    pub fn get(&self, keyword: &str) -> Option<&Command> {
        self.commands.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.commands.contains_key(keyword)
    }

    /// Insert or replace; returns the previous command.
    pub fn insert(&mut self, keyword: impl Into<String>, command: Command) -> Option<Command> {
        self.commands.insert(keyword.into(), command)
    }

    pub fn remove(&mut self, keyword: &str) -> Option<Command> {
        self.commands.remove(keyword)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Run the command bound to `keyword` and return the chat lines to send.
    ///
    /// Unknown keywords produce nothing.
    pub fn execute(
        &mut self,
        keyword: &str,
        ctx: &CommandContext<'_>,
        now: Instant,
    ) -> Vec<String> {
        let kind = match self.commands.get_mut(keyword) {
            None => {
                debug!(keyword, "Unknown command");
                return Vec::new();
            }
            Some(Command {
                kind: CommandKind::Text(text),
                cooldown,
            }) => {
                if cooldown.try_fire(now) {
                    return vec![text.clone()];
                }
                debug!(keyword, user = ctx.user, "Command on cooldown");
                return Vec::new();
            }
            Some(command) => command.kind.clone(),
        };

        match kind {
            CommandKind::Add => admin::add_command(self, ctx),
            CommandKind::Delete => admin::delete_command(self, ctx),
            CommandKind::Text(_) => Vec::new(),
        }
    }

    /// Bind `keyword` to a fresh text command, unless it holds a non-text command.
    pub(super) fn upsert_text(&mut self, keyword: &str, text: &str) -> Upsert {
        let command = Command::text(text, self.default_cooldown);
        match self.commands.entry(keyword.to_string()) {
            Entry::Occupied(mut entry) => {
                if !entry.get().is_text() {
                    return Upsert::NotText;
                }
                entry.insert(command);
                Upsert::Replaced
            }
            Entry::Vacant(entry) => {
                entry.insert(command);
                Upsert::Added
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Upsert {
    Added,
    Replaced,
    /// Keyword is bound to `Add` or `Delete`; left untouched.
    NotText,
}
