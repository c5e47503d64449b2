//! Reconnect supervisor.
//!
//! Keeps one session alive at a time. After a loss it waits the current
//! backoff delay, then advances it (`0 → 1 → 2 → 4 → 8 → 16 → 16 …` seconds);
//! completing login resets the delay to zero. Only the stop token ends the
//! loop.

use crate::commands::SharedRegistry;
use crate::config::{Config, ConfigError, Identity, ServerConfig};
use crate::error::SessionError;
use crate::router::Router;
use crate::session::{Session, SessionEnd};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Upper bound for the backoff delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(16);

/// Delay to use after the one that was just waited.
pub fn next_delay(current: Duration) -> Duration {
    if current.is_zero() {
        Duration::from_secs(1)
    } else {
        current.saturating_mul(2).min(MAX_BACKOFF)
    }
}

/// Where the link currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPhase {
    Connecting,
    Connected,
    /// Waiting this long before the next attempt.
    Backoff(Duration),
    Stopped,
}

/// Backoff bookkeeping across connection attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectState {
    phase: LinkPhase,
    delay: Duration,
}

impl Default for ReconnectState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconnectState {
    pub fn new() -> Self {
        Self {
            phase: LinkPhase::Connecting,
            delay: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    /// Delay the next loss will wait.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn on_connecting(&mut self) {
        if self.phase != LinkPhase::Stopped {
            self.phase = LinkPhase::Connecting;
        }
    }

    /// Login completed (`004`).
    pub fn on_registered(&mut self) {
        if self.phase == LinkPhase::Stopped {
            return;
        }
        self.phase = LinkPhase::Connected;
        self.delay = Duration::ZERO;
    }

    /// Connection lost or failed. Returns how long to wait before the next
    /// attempt, or `None` once stopped.
    pub fn on_lost(&mut self) -> Option<Duration> {
        if self.phase == LinkPhase::Stopped {
            return None;
        }
        let wait = self.delay;
        self.delay = next_delay(wait);
        self.phase = LinkPhase::Backoff(wait);
        Some(wait)
    }

    pub fn stop(&mut self) {
        self.phase = LinkPhase::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == LinkPhase::Stopped
    }
}

/// Drives sessions until the stop token fires.
pub struct Supervisor {
    server: ServerConfig,
    identity: Identity,
    router: Router,
    registry: SharedRegistry,
    stop: CancellationToken,
    link: ReconnectState,
}

impl Supervisor {
    /// Fails without touching the network if the identity is incomplete.
    pub fn new(
        config: &Config,
        registry: SharedRegistry,
        stop: CancellationToken,
    ) -> Result<Self, ConfigError> {
        config.identity.validate()?;
        Ok(Self {
            server: config.server.clone(),
            identity: config.identity.clone(),
            router: Router::new(config.identity.channel()),
            registry,
            stop,
            link: ReconnectState::new(),
        })
    }

    /// Run until stopped. Returns early only on errors that reconnecting
    /// cannot fix.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        loop {
            self.link.on_connecting();

            let connect = Session::connect(&self.server, &self.identity);
            let session = tokio::select! {
                biased;
                _ = self.stop.cancelled() => break,
                result = connect => result,
            };

            let end = match session {
                Ok(session) => {
                    session
                        .run(&self.router, &self.registry, &mut self.link, &self.stop)
                        .await
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Cannot connect");
                    self.link.stop();
                    return Err(e);
                }
                Err(e) => SessionEnd::Failed(e),
            };

            match end {
                SessionEnd::Stopped => break,
                SessionEnd::Closed => warn!(host = %self.server.host, "Connection closed by server"),
                SessionEnd::Failed(e) => warn!(host = %self.server.host, error = %e, "Connection lost"),
            }
            if self.stop.is_cancelled() {
                break;
            }

            let Some(wait) = self.link.on_lost() else {
                break;
            };
            if !wait.is_zero() {
                info!(delay_secs = wait.as_secs(), "Reconnecting after backoff");
                tokio::select! {
                    biased;
                    _ = self.stop.cancelled() => break,
                    _ = tokio::time::sleep(wait) => {}
                }
            } else {
                info!("Reconnecting");
            }
        }

        self.link.stop();
        info!("Supervisor stopped");
        Ok(())
    }
}
