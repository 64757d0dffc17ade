//! Per-channel listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// Control channel (WebSocket) listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Address to bind to (e.g. "0.0.0.0:8081").
    pub address: SocketAddr,
    /// Allowed origins for the WebSocket handshake (e.g.
    /// `["https://example.com"]`). Empty list allows all origins.
    pub allow_origins: Vec<String>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 8081)),
            allow_origins: Vec::new(),
        }
    }
}

/// Delivery channel configuration.
///
/// One fixed port is reused across sessions: a session's endpoint must be
/// fully torn down before the next session can bind.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Address to bind the per-session endpoint to (e.g. "0.0.0.0:3001").
    pub address: SocketAddr,
    /// Host name advertised in session URLs.
    pub public_host: String,
    /// Directory holding the shared measurement-library assets served
    /// under `/libs/`.
    pub libs_dir: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 3001)),
            public_host: "localhost".to_string(),
            libs_dir: "public/libs".to_string(),
        }
    }
}

/// Operator UI host configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Address to bind the static asset server to. Port 0 disables the UI
    /// host entirely.
    pub address: SocketAddr,
    /// Directory holding the operator page.
    pub asset_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            asset_dir: "public".to_string(),
        }
    }
}
