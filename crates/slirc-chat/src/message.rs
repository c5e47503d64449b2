//! Classification of lines received from the chat server.
//!
//! Only the handful of shapes a command bot reacts to are recognised; every
//! other line becomes [`ServerLine::Other`]. The matchers are deliberately
//! narrow and mirror the line grammars below exactly:
//!
//! ```text
//! cap ack  := ":tmi.twitch.tv CAP * ACK :twitch.tv/tags" ...
//! ping     := "PING" ...
//! numeric  := ":tmi.twitch.tv " DIGIT{3} " " target " :" text
//! chat     := "@" tags " :" user "!" ident "@" host " PRIVMSG #" channel " :" text
//! ```

use crate::tags::Tags;
use crate::SERVER_NAME;

const CAP_ACK_PREFIX: &str = ":tmi.twitch.tv CAP * ACK :twitch.tv/tags";

/// A line received from the server, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine<'a> {
    /// The server acknowledged the tags capability.
    CapAck,
    /// Keep-alive probe; `token` must be echoed in the PONG.
    Ping {
        /// Token to echo back.
        token: &'a str,
    },
    /// A three-digit numeric reply from the server.
    Numeric(Numeric<'a>),
    /// A chat message in the configured channel.
    Chat(ChatMessage),
    /// Anything else.
    Other,
}

impl<'a> ServerLine<'a> {
    /// Classify a decoded line. A trailing `\r` is ignored.
    ///
    /// Chat messages are only recognised for `channel` (without `#`).
    pub fn classify(line: &'a str, channel: &str) -> Self {
        let line = line.trim_end_matches('\r');

        if line.starts_with(CAP_ACK_PREFIX) {
            return ServerLine::CapAck;
        }

        if let Some(rest) = line.strip_prefix("PING") {
            let token = rest.trim_start().trim_start_matches(':').trim_end();
            return ServerLine::Ping {
                token: if token.is_empty() { SERVER_NAME } else { token },
            };
        }

        if let Some(numeric) = Numeric::parse(line) {
            return ServerLine::Numeric(numeric);
        }

        if line.contains("PRIVMSG") {
            if let Some(msg) = ChatMessage::parse(line, channel) {
                return ServerLine::Chat(msg);
            }
        }

        ServerLine::Other
    }
}

/// A numeric reply such as `:tmi.twitch.tv 004 bot :-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeric<'a> {
    /// Three-digit reply code.
    pub code: u16,
    /// Target nick (may be empty).
    pub target: &'a str,
    /// Trailing text.
    pub text: &'a str,
}

impl<'a> Numeric<'a> {
    /// Match `:tmi.twitch.tv <ddd> <target> :<text>`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix(':')?.strip_prefix(SERVER_NAME)?;
        let rest = rest.strip_prefix(' ')?;
        let (code, rest) = rest.split_at_checked(3)?;
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let rest = rest.strip_prefix(' ')?;
        let (target, text) = rest.split_once(' ')?;
        let text = text.strip_prefix(':')?;

        Some(Numeric {
            code: code.parse().ok()?,
            target,
            text,
        })
    }
}

/// A chat message addressed to the configured channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender nick.
    pub user: String,
    /// Message text, surrounding whitespace trimmed.
    pub text: String,
    /// Parsed tag section.
    pub tags: Tags,
}

impl ChatMessage {
    /// Match `@<tags> :<user>!<ident>@<host> PRIVMSG #<channel> :<text>`.
    pub fn parse(line: &str, channel: &str) -> Option<Self> {
        let rest = line.strip_prefix('@')?;
        let (tag_section, rest) = rest.split_once(' ')?;
        let rest = rest.strip_prefix(':')?;
        let (prefix, rest) = rest.split_once(' ')?;
        let (user, mask) = prefix.split_once('!')?;
        mask.split_once('@')?;

        let text = rest
            .strip_prefix("PRIVMSG #")?
            .strip_prefix(channel)?
            .strip_prefix(" :")?;

        Some(ChatMessage {
            user: user.to_string(),
            text: text.trim().to_string(),
            tags: Tags::parse(tag_section),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagValue;

    const CHAT: &str = "@badge-info=;badges=moderator/1,subscriber/3;color=#1E90FF;display-name=Alice \
                        :alice!alice@alice.tmi.twitch.tv PRIVMSG #rustlang :!hi there \r";

    #[test]
    fn test_cap_ack() {
        let line = ":tmi.twitch.tv CAP * ACK :twitch.tv/tags\r";
        assert_eq!(ServerLine::classify(line, "rustlang"), ServerLine::CapAck);
    }

    #[test]
    fn test_ping_token() {
        assert_eq!(
            ServerLine::classify("PING :tmi.twitch.tv\r", "rustlang"),
            ServerLine::Ping {
                token: "tmi.twitch.tv"
            }
        );
        assert_eq!(
            ServerLine::classify("PING", "rustlang"),
            ServerLine::Ping {
                token: SERVER_NAME
            }
        );
    }

    #[test]
    fn test_numeric() {
        let line = ":tmi.twitch.tv 004 slircbot :-\r";
        assert_eq!(
            ServerLine::classify(line, "rustlang"),
            ServerLine::Numeric(Numeric {
                code: 4,
                target: "slircbot",
                text: "-"
            })
        );
    }

    #[test]
    fn test_numeric_rejects_non_digits_and_other_servers() {
        assert_eq!(Numeric::parse(":tmi.twitch.tv 0a4 bot :-"), None);
        assert_eq!(Numeric::parse(":irc.example.net 004 bot :-"), None);
        assert_eq!(Numeric::parse(":tmi.twitch.tv 004 bot -"), None);
    }

    #[test]
    fn test_chat_message() {
        let ServerLine::Chat(msg) = ServerLine::classify(CHAT, "rustlang") else {
            panic!("expected chat message");
        };
        assert_eq!(msg.user, "alice");
        assert_eq!(msg.text, "!hi there");
        assert_eq!(
            msg.tags.get("display-name").and_then(TagValue::as_str),
            Some("Alice")
        );
        assert_eq!(msg.tags.values("badges").count(), 2);
    }

    #[test]
    fn test_chat_for_other_channel_is_ignored() {
        assert_eq!(ServerLine::classify(CHAT, "gamedev"), ServerLine::Other);
        assert_eq!(ServerLine::classify(CHAT, "rust"), ServerLine::Other);
    }

    #[test]
    fn test_chat_without_tags_is_ignored() {
        let line = ":alice!alice@alice.tmi.twitch.tv PRIVMSG #rustlang :!hi";
        assert_eq!(ServerLine::classify(line, "rustlang"), ServerLine::Other);
    }

    #[test]
    fn test_unrelated_lines() {
        for line in [
            ":tmi.twitch.tv CAP * NAK :twitch.tv/tags",
            ":slircbot!slircbot@slircbot.tmi.twitch.tv JOIN #rustlang",
            "@msg-id=subgift :tmi.twitch.tv USERNOTICE #rustlang",
            "",
        ] {
            assert_eq!(ServerLine::classify(line, "rustlang"), ServerLine::Other);
        }
    }
}
