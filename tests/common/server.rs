//! Fake chat server.
//!
//! Accepts bot connections on a random local port and lets tests script the
//! server side line by line.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Listening side of the fake server.
pub struct ChatServer {
    listener: TcpListener,
}

impl ChatServer {
    /// Bind on `127.0.0.1` with an OS-assigned port.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default()
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerConnection> {
        self.accept_timeout(Duration::from_secs(5)).await
    }

    pub async fn accept_timeout(&self, dur: Duration) -> anyhow::Result<ServerConnection> {
        let (stream, _) = timeout(dur, self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(ServerConnection {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }
}

/// One accepted bot connection.
pub struct ServerConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl ServerConnection {
    /// Send a raw line, terminated with CRLF like the real server.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes with no framing added.
    #[allow(dead_code)]
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line from the bot, without the terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Expect the three login lines and return them.
    pub async fn expect_login(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::with_capacity(3);
        for _ in 0..3 {
            lines.push(self.recv().await?);
        }
        Ok(lines)
    }

    /// Acknowledge tags, finish registration and consume `CAP END` / `JOIN`.
    #[allow(dead_code)]
    pub async fn complete_registration(&mut self) -> anyhow::Result<()> {
        self.send_raw(":tmi.twitch.tv CAP * ACK :twitch.tv/tags").await?;
        anyhow::ensure!(self.recv().await? == "CAP END", "expected CAP END");
        self.send_raw(":tmi.twitch.tv 001 slircbot :Welcome, GLHF!").await?;
        self.send_raw(":tmi.twitch.tv 004 slircbot :-").await?;
        anyhow::ensure!(self.recv().await? == "JOIN #chan", "expected JOIN");
        Ok(())
    }

    /// Send a chat line from `user` into `#chan`.
    #[allow(dead_code)]
    pub async fn chat(&mut self, badges: &str, user: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!(
            "@badges={badges};display-name={user} :{user}!{user}@{user}.tmi.twitch.tv PRIVMSG #chan :{text}"
        ))
        .await
    }
}
