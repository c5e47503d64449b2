//! Lines sent by the client.

use std::fmt;

/// An outgoing line, serialized without the separator via [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientLine<'a> {
    /// `CAP REQ :<capability>`
    CapReq(&'a str),
    /// `CAP END`
    CapEnd,
    /// `PASS oauth:<token>`; a token that already carries `oauth:` is sent as-is.
    Pass(&'a str),
    /// `NICK <nick>`
    Nick(&'a str),
    /// `JOIN #<channel>`
    Join(&'a str),
    /// `PRIVMSG #<channel> :<text>`
    Privmsg {
        /// Channel name without `#`.
        channel: &'a str,
        /// Message text.
        text: &'a str,
    },
    /// `PONG :<token>`
    Pong(&'a str),
}

impl fmt::Display for ClientLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientLine::CapReq(cap) => write!(f, "CAP REQ :{cap}"),
            ClientLine::CapEnd => f.write_str("CAP END"),
            ClientLine::Pass(token) => {
                let token = token.strip_prefix("oauth:").unwrap_or(token);
                write!(f, "PASS oauth:{token}")
            }
            ClientLine::Nick(nick) => write!(f, "NICK {nick}"),
            ClientLine::Join(channel) => write!(f, "JOIN #{channel}"),
            ClientLine::Privmsg { channel, text } => write!(f, "PRIVMSG #{channel} :{text}"),
            ClientLine::Pong(token) => write!(f, "PONG :{token}"),
        }
    }
}
