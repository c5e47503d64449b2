//! Framed line transport over TCP or client-side TLS.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream as ClientTlsStream;
use tokio_util::codec::Framed;

use crate::error::Result;
use crate::line::LineCodec;

/// A plaintext or TLS-encrypted client connection.
pub enum ChatStream {
    /// Plaintext TCP connection.
    Plain(TcpStream),
    /// TLS-encrypted client connection.
    Tls(Box<ClientTlsStream<TcpStream>>),
}

impl ChatStream {
    /// Returns true if this is a TLS-encrypted connection.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

impl AsyncRead for ChatStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChatStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            ChatStream::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ChatStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            ChatStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            ChatStream::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChatStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            ChatStream::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ChatStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            ChatStream::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Line transport: reads decoded frames and writes separator-terminated lines.
///
/// Generic over the stream so tests can drive it with an in-memory duplex.
pub struct Transport<S = ChatStream> {
    framed: Framed<S, LineCodec>,
}

impl Transport<ChatStream> {
    /// Wrap a plaintext TCP connection.
    pub fn tcp(stream: TcpStream) -> Self {
        Self::new(ChatStream::Plain(stream))
    }

    /// Wrap an established client TLS connection.
    pub fn client_tls(stream: ClientTlsStream<TcpStream>) -> Self {
        Self::new(ChatStream::Tls(Box::new(stream)))
    }

    /// Check if this transport uses TLS encryption.
    pub fn is_tls(&self) -> bool {
        self.framed.get_ref().is_tls()
    }
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap any byte stream with the default `\n` codec.
    pub fn new(stream: S) -> Self {
        Self::with_codec(stream, LineCodec::new())
    }

    /// Wrap any byte stream with a custom codec.
    pub fn with_codec(stream: S, codec: LineCodec) -> Self {
        Self {
            framed: Framed::new(stream, codec),
        }
    }

    /// Read the next non-empty frame.
    ///
    /// Returns `Ok(None)` when the connection is closed. Cancel safe.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        self.framed.next().await.transpose()
    }

    /// Write one line; the separator is appended by the codec.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.framed.send(line.to_string()).await
    }

    /// Flush and shut down the write half.
    pub async fn close(&mut self) -> Result<()> {
        SinkExt::<String>::close(&mut self.framed).await
    }
}
