//! Per-line dispatch.
//!
//! The router classifies each decoded line and returns the effects it
//! produces. It never writes to the connection itself; the session applies
//! the effects in order, so routing stays synchronous and testable without
//! a socket.

use crate::commands::{CommandContext, SharedRegistry, grammar};
use slirc_chat::{ChatMessage, ClientLine, RPL_MYINFO, ServerLine};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of routing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write a raw line (no separator) to the server.
    Send(String),
    /// Login finished; the supervisor resets its backoff. Emitted ahead of
    /// the JOIN so a failed write cannot skip the reset.
    Registered,
}

/// Routes lines for one configured channel.
#[derive(Debug, Clone)]
pub struct Router {
    channel: String,
}

impl Router {
    /// `channel` is the bare name, without `#`.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// Route one line. First match wins; unrecognised lines produce nothing.
    pub fn route(&self, line: &str, registry: &SharedRegistry) -> Vec<Effect> {
        self.route_at(line, registry, Instant::now())
    }

    /// [`Router::route`] with an explicit clock reading for cooldowns.
    pub fn route_at(&self, line: &str, registry: &SharedRegistry, now: Instant) -> Vec<Effect> {
        match ServerLine::classify(line, &self.channel) {
            ServerLine::CapAck => vec![Effect::Send(ClientLine::CapEnd.to_string())],
            ServerLine::Ping { token } => vec![Effect::Send(ClientLine::Pong(token).to_string())],
            ServerLine::Numeric(numeric) if numeric.code == RPL_MYINFO => {
                info!(channel = %self.channel, "Registered, joining channel");
                vec![
                    Effect::Registered,
                    Effect::Send(ClientLine::Join(&self.channel).to_string()),
                ]
            }
            ServerLine::Chat(msg) => self.dispatch(&msg, registry, now),
            ServerLine::Numeric(_) | ServerLine::Other => Vec::new(),
        }
    }

    fn dispatch(&self, msg: &ChatMessage, registry: &SharedRegistry, now: Instant) -> Vec<Effect> {
        let Some(keyword) = grammar::invocation_keyword(&msg.text) else {
            return Vec::new();
        };
        debug!(keyword, user = %msg.user, "Command invoked");

        let ctx = CommandContext {
            user: &msg.user,
            text: &msg.text,
            tags: &msg.tags,
        };
        let replies = registry.lock().execute(keyword, &ctx, now);

        replies
            .iter()
            .map(|text| {
                Effect::Send(
                    ClientLine::Privmsg {
                        channel: &self.channel,
                        text,
                    }
                    .to_string(),
                )
            })
            .collect()
    }
}
