//! JSON command store.
//!
//! The file maps each keyword to a tagged record:
//!
//! ```json
//! {
//!   "addcom": { "command_type": "add" },
//!   "delcom": { "command_type": "delete" },
//!   "discord": { "command_type": "text", "cooldown": 30, "text": "Join us!" }
//! }
//! ```
//!
//! Cooldown timestamps are not persisted; every loaded command starts open.

use crate::commands::{Command, CommandKind, CommandRegistry, SharedRegistry};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One persisted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command_type", rename_all = "lowercase")]
pub enum CommandRecord {
    Text { cooldown: u64, text: String },
    Add,
    Delete,
}

impl From<&Command> for CommandRecord {
    fn from(command: &Command) -> Self {
        match command.kind() {
            CommandKind::Text(text) => CommandRecord::Text {
                cooldown: command.cooldown().duration().as_secs(),
                text: text.clone(),
            },
            CommandKind::Add => CommandRecord::Add,
            CommandKind::Delete => CommandRecord::Delete,
        }
    }
}

impl From<CommandRecord> for Command {
    fn from(record: CommandRecord) -> Self {
        match record {
            CommandRecord::Text { cooldown, text } => {
                Command::text(text, Duration::from_secs(cooldown))
            }
            CommandRecord::Add => Command::add(),
            CommandRecord::Delete => Command::delete(),
        }
    }
}

/// Serialize a registry. Keys come out sorted so saves are stable.
pub fn encode(registry: &CommandRegistry) -> Result<String, StoreError> {
    let records: BTreeMap<&str, CommandRecord> = registry
        .iter()
        .map(|(keyword, command)| (keyword, CommandRecord::from(command)))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse a registry. Unknown record types and non-alphanumeric keywords are
/// rejected.
pub fn decode(content: &str, default_cooldown: Duration) -> Result<CommandRegistry, StoreError> {
    let records: BTreeMap<String, CommandRecord> = serde_json::from_str(content)?;

    let mut registry = CommandRegistry::new(default_cooldown);
    for (keyword, record) in records {
        if keyword.is_empty() || !keyword.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(StoreError::InvalidKeyword(keyword));
        }
        registry.insert(keyword, record.into());
    }
    Ok(registry)
}

/// File-backed store for the command registry.
#[derive(Debug, Clone)]
pub struct CommandStore {
    path: PathBuf,
    default_cooldown: Duration,
}

impl CommandStore {
    /// `default_cooldown` is handed to loaded registries for commands created
    /// later from chat.
    pub fn new(path: impl Into<PathBuf>, default_cooldown: Duration) -> Self {
        Self {
            path: path.into(),
            default_cooldown,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry from disk.
    pub fn load(&self) -> Result<CommandRegistry, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        decode(&content, self.default_cooldown)
    }

    /// Like [`CommandStore::load`], but a missing file yields the built-in
    /// `addcom`/`delcom` registry.
    pub fn load_or_default(&self) -> Result<CommandRegistry, StoreError> {
        match self.load() {
            Ok(registry) => {
                info!(path = %self.path.display(), commands = registry.len(), "Loaded commands");
                Ok(registry)
            }
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No command file, starting with built-in commands");
                Ok(CommandRegistry::with_builtins(self.default_cooldown))
            }
            Err(e) => Err(e),
        }
    }

    /// Write the registry, replacing the file atomically.
    pub fn save(&self, registry: &CommandRegistry) -> Result<(), StoreError> {
        self.write_atomic(&encode(registry)?)?;
        debug!(path = %self.path.display(), commands = registry.len(), "Saved commands");
        Ok(())
    }

    /// Snapshot the shared registry under its lock, then write it.
    pub fn save_shared(&self, registry: &SharedRegistry) -> Result<(), StoreError> {
        self.save(&registry.lock())
    }

    fn write_atomic(&self, content: &str) -> Result<(), StoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Spawn a task that saves the registry every `interval` until `stop` fires.
///
/// The first save happens one interval after start. Failed saves are logged
/// and retried on the next tick.
pub fn spawn_autosave(
    store: CommandStore,
    registry: SharedRegistry,
    interval: Duration,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = store.save_shared(&registry) {
                        warn!(path = %store.path().display(), error = %e, "Periodic save failed");
                    }
                }
            }
        }
        debug!("Autosave task stopped");
    })
}
