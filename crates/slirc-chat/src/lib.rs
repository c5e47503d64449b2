//! # slirc-chat
//!
//! Client-side building blocks for Twitch-flavoured IRC chat:
//!
//! - [`LineCodec`]: separator-delimited framing for `tokio_util::codec`
//! - [`Tags`]: the `key=value;...` metadata section of a chat line
//! - [`ServerLine`]: classification of incoming lines (CAP ACK, PING,
//!   numerics, channel PRIVMSG)
//! - [`ClientLine`]: the outgoing lines a bot needs to send
//! - [`Transport`]: a framed TCP or TLS stream speaking in lines
//!
//! ```rust
//! use slirc_chat::{ServerLine, ClientLine};
//!
//! let raw = "@badges=moderator/1 :alice!alice@alice.tmi.twitch.tv PRIVMSG #rust :!hi";
//! if let ServerLine::Chat(msg) = ServerLine::classify(raw, "rust") {
//!     assert_eq!(msg.user, "alice");
//!     assert_eq!(msg.text, "!hi");
//! }
//!
//! let reply = ClientLine::Privmsg { channel: "rust", text: "Hello!" };
//! assert_eq!(reply.to_string(), "PRIVMSG #rust :Hello!");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod tags;
pub mod transport;

pub use self::command::ClientLine;
pub use self::error::ProtocolError;
pub use self::line::LineCodec;
pub use self::message::{ChatMessage, Numeric, ServerLine};
pub use self::tags::{TagValue, Tags};
pub use self::transport::{ChatStream, Transport};

/// Host part of every server-originated prefix (`:tmi.twitch.tv ...`).
pub const SERVER_NAME: &str = "tmi.twitch.tv";

/// Capability that makes the server attach tags to chat lines.
pub const TAGS_CAPABILITY: &str = "twitch.tv/tags";

/// Numeric the server sends last during login; the channel can be joined after it.
pub const RPL_MYINFO: u16 = 4;

/// Maximum accepted line length in bytes, separator excluded.
pub const MAX_LINE_LEN: usize = 8191;
