//! One connection to the chat server.
//!
//! A session is created per connection attempt: connect, send the login
//! lines, then route every received line until the connection ends or the
//! stop token fires.

use crate::commands::SharedRegistry;
use crate::config::{Identity, ServerConfig};
use crate::error::SessionError;
use crate::router::{Effect, Router};
use crate::supervisor::ReconnectState;
use slirc_chat::{ChatStream, ClientLine, TAGS_CAPABILITY, Transport};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The server closed the connection.
    Closed,
    /// Read or write failed.
    Failed(SessionError),
    /// The stop token fired; no reconnect wanted.
    Stopped,
}

/// Upgrade a TCP connection to TLS, verifying against the system roots.
pub async fn upgrade_to_tls(
    tcp_stream: TcpStream,
    hostname: &str,
) -> Result<TlsStream<TcpStream>, SessionError> {
    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs();
    for cert in certs.certs {
        if let Err(e) = roots.add(cert) {
            warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &certs.errors {
        warn!("Error loading native certs: {}", e);
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(hostname.to_string())?;
    let tls_stream = connector.connect(server_name, tcp_stream).await?;

    debug!(hostname = %hostname, "TLS handshake completed");
    Ok(tls_stream)
}

/// A logged-in (or logging-in) connection.
pub struct Session<S = ChatStream> {
    transport: Transport<S>,
}

impl Session<ChatStream> {
    /// Open a connection and send the login lines.
    ///
    /// An incomplete identity fails with [`SessionError::Config`] before any
    /// network activity.
    pub async fn connect(server: &ServerConfig, identity: &Identity) -> Result<Self, SessionError> {
        identity.validate()?;

        info!(host = %server.host, port = server.port, tls = server.tls, "Connecting to chat server");
        let tcp_stream = TcpStream::connect((server.host.as_str(), server.port)).await?;
        let transport = if server.tls {
            Transport::client_tls(upgrade_to_tls(tcp_stream, &server.host).await?)
        } else {
            Transport::tcp(tcp_stream)
        };

        Self::establish(transport, identity).await
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Send `CAP REQ`, `PASS` and `NICK`, in that order, over an open transport.
    pub async fn establish(transport: Transport<S>, identity: &Identity) -> Result<Self, SessionError> {
        identity.validate()?;

        let mut session = Self { transport };
        session
            .send(ClientLine::CapReq(TAGS_CAPABILITY))
            .await?;
        session
            .send(ClientLine::Pass(identity.credential.trim()))
            .await?;
        session
            .send(ClientLine::Nick(identity.username.trim()))
            .await?;

        info!(user = %identity.username.trim(), channel = %identity.channel(), "Login sent");
        Ok(session)
    }

    /// Write one line; the separator is appended. Not rate limited.
    pub async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        if line.starts_with("PASS ") {
            debug!(line = "PASS <redacted>", "->");
        } else {
            debug!(line = %line, "->");
        }
        self.transport.write_line(line).await?;
        Ok(())
    }

    async fn send(&mut self, line: ClientLine<'_>) -> Result<(), SessionError> {
        self.send_line(&line.to_string()).await
    }

    /// Route lines until the connection ends.
    ///
    /// Lines are handled strictly in arrival order, each fully before the
    /// next is read. Returns exactly once per session.
    pub async fn run(
        mut self,
        router: &Router,
        registry: &SharedRegistry,
        link: &mut ReconnectState,
        stop: &CancellationToken,
    ) -> SessionEnd {
        loop {
            let read = tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    if let Err(e) = self.transport.close().await {
                        debug!(error = %e, "Close on stop failed");
                    }
                    return SessionEnd::Stopped;
                }
                read = self.transport.read_line() => read,
            };

            let line = match read {
                Ok(Some(line)) => line,
                Ok(None) => return SessionEnd::Closed,
                Err(e) => return SessionEnd::Failed(e.into()),
            };
            debug!(line = %line, "<-");

            for effect in router.route(&line, registry) {
                match effect {
                    Effect::Send(out) => {
                        if let Err(e) = self.send_line(&out).await {
                            return SessionEnd::Failed(e);
                        }
                    }
                    Effect::Registered => link.on_registered(),
                }
            }
        }
    }
}
