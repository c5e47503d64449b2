//! Separator-delimited line codec for tokio.
//!
//! The receive side keeps every byte after the last separator it has seen and
//! yields each complete, non-empty frame in arrival order. Frames are decoded
//! as UTF-8, replacing invalid sequences instead of failing the connection.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::error::{self, ProtocolError};
use crate::MAX_LINE_LEN;

/// Line-based codec for chat traffic.
///
/// Frames are delimited by a single separator byte (`\n` by default). The
/// separator is stripped on decode and appended on encode; a trailing `\r`
/// is left in place for the caller to deal with.
#[derive(Debug, Clone)]
pub struct LineCodec {
    separator: u8,
    /// Index of next byte to check for the separator
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Create a codec splitting on `\n` with the default length limit.
    pub fn new() -> Self {
        Self::with_separator(b'\n')
    }

    /// Create a codec splitting on a custom separator byte.
    pub fn with_separator(separator: u8) -> Self {
        Self {
            separator,
            next_index: 0,
            max_len: MAX_LINE_LEN,
        }
    }

    /// Replace the maximum frame length (separator excluded).
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..]
                .iter()
                .position(|b| *b == self.separator)
            else {
                // No complete frame yet - remember where we stopped
                self.next_index = src.len();
                if src.len() > self.max_len {
                    return Err(ProtocolError::MessageTooLong {
                        actual: src.len(),
                        limit: self.max_len,
                    });
                }
                return Ok(None);
            };

            let frame = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            let body = &frame[..frame.len() - 1];
            if body.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: body.len(),
                    limit: self.max_len,
                });
            }
            if body.is_empty() {
                continue;
            }

            return Ok(Some(String::from_utf8_lossy(body).into_owned()));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                if !src.is_empty() {
                    debug!(bytes = src.len(), "Discarding unterminated fragment at EOF");
                    src.clear();
                    self.next_index = 0;
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.put_u8(self.separator);
        Ok(())
    }
}
