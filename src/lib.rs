//! slirc-bot - Straylight chat bot
//!
//! Keeps a connection to a Twitch chat channel alive and answers `!keyword`
//! commands. Moderators edit text commands from chat with `!addcom` and
//! `!delcom`; the command set is saved to a JSON file on a timer and on
//! shutdown.

pub mod commands;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod store;
pub mod supervisor;

pub use crate::commands::{CommandRegistry, SharedRegistry};
pub use crate::config::Config;
pub use crate::error::{SessionError, StoreError};
pub use crate::router::{Effect, Router};
pub use crate::session::{Session, SessionEnd};
pub use crate::store::CommandStore;
pub use crate::supervisor::{ReconnectState, Supervisor};
