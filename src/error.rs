//! Error types for the bot.
//!
//! Configuration errors live with the config module; this module holds the
//! runtime side: connection sessions and the command store.

use crate::config::ConfigError;
use slirc_chat::ProtocolError;
use thiserror::Error;

// ============================================================================
// Session Errors (connect + read loop)
// ============================================================================

/// Errors that end a chat session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Identity incomplete; no connection was attempted.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid server name: {0}")]
    InvalidServerName(#[from] tokio_rustls::rustls::pki_types::InvalidDnsNameError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SessionError {
    /// Errors that no amount of reconnecting will fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidServerName(_))
    }
}

// ============================================================================
// Store Errors (command persistence)
// ============================================================================

/// Errors from loading or saving the command store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, or a record with an unknown `command_type`.
    #[error("invalid store contents: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid keyword in store: {0:?}")]
    InvalidKeyword(String),
}
