//! Connection - handles one controller over its WebSocket.
//!
//! The control channel is stateless with respect to session ownership:
//! sessions are correlated purely by id, so a session started here may be
//! stopped from any other connection, and dropping this connection leaves
//! the active session running.

use crate::error::ControlError;
use crate::session::{SessionRegistry, StartOutcome};
use bench_proto::{ControlReply, ControlRequest};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, instrument, warn};

/// A controller connection handler.
pub struct ControlConnection {
    conn_id: u64,
    addr: SocketAddr,
    ws: WebSocketStream<TcpStream>,
    registry: Arc<SessionRegistry>,
}

impl ControlConnection {
    /// Create a new connection handler.
    pub fn new(
        conn_id: u64,
        ws: WebSocketStream<TcpStream>,
        addr: SocketAddr,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            conn_id,
            addr,
            ws,
            registry,
        }
    }

    /// Run the connection loop until the controller disconnects.
    #[instrument(skip(self), fields(conn_id = self.conn_id, addr = %self.addr), name = "control")]
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.send(&ControlReply::Connected).await?;

        while let Some(frame) = self.ws.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Control read error");
                    break;
                }
            };

            match frame {
                Message::Text(raw) => self.handle_raw(&raw).await?,
                Message::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(raw) => self.handle_raw(&raw).await?,
                    Err(_) => {
                        let err =
                            ControlError::Protocol("binary frame is not valid UTF-8".to_string());
                        self.send(&err.to_reply()).await?;
                    }
                },
                Message::Ping(payload) => self.ws.send(Message::Pong(payload)).await?,
                Message::Close(_) => break,
                Message::Pong(_) | Message::Frame(_) => {}
            }
        }

        // Deliberately no teardown here: sessions outlive their
        // originating connection and end only by id.
        Ok(())
    }

    /// Parse and dispatch one inbound message.
    ///
    /// A parse failure is answered with an error reply and the connection
    /// stays in its request loop.
    async fn handle_raw(&mut self, raw: &str) -> anyhow::Result<()> {
        debug!(raw, "Received control message");

        let request = match ControlRequest::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                let err = ControlError::Protocol(e.to_string());
                debug!(error = %err, "Malformed control message");
                return self.send(&err.to_reply()).await;
            }
        };

        self.dispatch(request).await
    }

    async fn dispatch(&mut self, request: ControlRequest) -> anyhow::Result<()> {
        match request {
            ControlRequest::StartBenchmark { payload } => {
                match self.registry.begin_session(payload).await {
                    Ok(StartOutcome {
                        stopped,
                        session_id,
                        url,
                    }) => {
                        // The superseded session's id goes out before the
                        // new session's details.
                        if let Some(old_id) = stopped {
                            self.send(&ControlReply::BenchmarkStopped { session_id: old_id })
                                .await?;
                        }
                        info!(session_id = %session_id, %url, "Benchmark session started");
                        self.send(&ControlReply::BenchmarkStarted { url, session_id })
                            .await
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to start benchmark session");
                        self.send(&ControlError::from(e).to_reply()).await
                    }
                }
            }
            ControlRequest::StopBenchmark { session_id } => {
                let matched = self.registry.end_session(&session_id).await;
                if matched {
                    info!(session_id = %session_id, "Benchmark session stopped");
                } else {
                    debug!(session_id = %session_id, "Stop request matched no current session");
                }
                // Acknowledged either way: stopping is idempotent for the
                // caller.
                self.send(&ControlReply::BenchmarkStopped { session_id })
                    .await
            }
        }
    }

    async fn send(&mut self, reply: &ControlReply) -> anyhow::Result<()> {
        let json = reply.to_json()?;
        self.ws.send(Message::Text(json)).await?;
        Ok(())
    }
}
