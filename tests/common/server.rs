//! Test daemon management.
//!
//! Spawns the control gateway and session registry in-process. The
//! control listener takes an ephemeral port so tests never collide on the
//! control side; the delivery port models the fixed production port and
//! must be unique per test.

use benchd::config::{ControlConfig, DeliveryConfig};
use benchd::network::ControlGateway;
use benchd::session::SessionRegistry;
use std::net::SocketAddr;
use std::sync::Arc;

/// An in-process daemon under test.
pub struct TestDaemon {
    control_addr: SocketAddr,
    registry: Arc<SessionRegistry>,
}

impl TestDaemon {
    /// Spawn a daemon whose delivery channel binds the given fixed port.
    pub async fn spawn(delivery_port: u16) -> anyhow::Result<Self> {
        let delivery = DeliveryConfig {
            address: SocketAddr::from(([127, 0, 0, 1], delivery_port)),
            public_host: "127.0.0.1".to_string(),
            libs_dir: "public/libs".to_string(),
        };
        let registry = Arc::new(SessionRegistry::new(delivery));

        let control = ControlConfig {
            address: SocketAddr::from(([127, 0, 0, 1], 0)),
            allow_origins: Vec::new(),
        };
        let gateway = ControlGateway::bind(control, Arc::clone(&registry)).await?;
        let control_addr = gateway.local_addr();

        tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self {
            control_addr,
            registry,
        })
    }

    /// Address of the control listener.
    pub fn control_addr(&self) -> SocketAddr {
        self.control_addr
    }

    /// Direct handle on the registry for state assertions.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Create a controller client connected to this daemon.
    pub async fn connect(&self) -> anyhow::Result<super::client::ControllerClient> {
        super::client::ControllerClient::connect(self.control_addr).await
    }
}
