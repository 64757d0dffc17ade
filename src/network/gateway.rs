//! Gateway - control-channel listener that accepts controller connections.
//!
//! The gateway binds the control socket, performs the WebSocket handshake
//! (with optional Origin validation) and spawns a [`ControlConnection`]
//! task for each controller.

use crate::config::ControlConfig;
use crate::network::ControlConnection;
use crate::session::SessionRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tracing::{error, info, warn};

/// The gateway accepts incoming control connections and spawns handlers.
pub struct ControlGateway {
    listener: TcpListener,
    local_addr: SocketAddr,
    allow_origins: Vec<String>,
    registry: Arc<SessionRegistry>,
    conn_counter: AtomicU64,
}

impl ControlGateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        config: ControlConfig,
        registry: Arc<SessionRegistry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.address).await?;
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "Control listener bound");

        Ok(Self {
            listener,
            local_addr,
            allow_origins: config.allow_origins,
            registry,
            conn_counter: AtomicU64::new(0),
        })
    }

    /// Address the listener is actually bound on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the gateway, accepting connections forever.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Control connection attempt");

                    let registry = Arc::clone(&self.registry);
                    let conn_id = self.conn_counter.fetch_add(1, Ordering::Relaxed);
                    let allowed = self.allow_origins.clone();

                    tokio::spawn(async move {
                        // Origin validation callback for the WebSocket handshake
                        let origin_callback =
                            |req: &http::Request<()>, response: http::Response<()>| {
                                // If allow_origins is empty, allow all origins
                                if allowed.is_empty() {
                                    return Ok(response);
                                }

                                if let Some(origin) = req
                                    .headers()
                                    .get("Origin")
                                    .and_then(|o| o.to_str().ok())
                                {
                                    if allowed.iter().any(|a| a == origin || a == "*") {
                                        return Ok(response);
                                    }
                                    warn!(%addr, origin = %origin, "Control connection origin rejected");
                                }

                                // Reject with 403 Forbidden
                                Err(http::Response::builder()
                                    .status(http::StatusCode::FORBIDDEN)
                                    .body(Some("origin not allowed".to_string()))
                                    .unwrap())
                            };

                        match accept_hdr_async(stream, origin_callback).await {
                            Ok(ws_stream) => {
                                info!(%addr, "Control handshake successful");
                                let connection =
                                    ControlConnection::new(conn_id, ws_stream, addr, registry);
                                if let Err(e) = connection.run().await {
                                    error!(conn_id, %addr, error = %e, "Control connection error");
                                }
                                info!(conn_id, %addr, "Control connection closed");
                            }
                            Err(e) => {
                                warn!(%addr, error = %e, "Control handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept control connection");
                }
            }
        }
    }
}
