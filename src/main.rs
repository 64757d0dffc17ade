//! benchd - remote benchmark bridge.
//!
//! Accepts start/stop requests on a WebSocket control channel, provisions
//! one HTTP delivery endpoint per session serving the rendered benchmark
//! document at a unique address, and hosts the static operator UI.

use benchd::config::Config;
use benchd::network::ControlGateway;
use benchd::session::SessionRegistry;
use benchd::ui;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; a missing file means built-in defaults
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "benchd.toml".to_string());

    let config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        control = %config.control.address,
        delivery = %config.delivery.address,
        "Starting benchd"
    );

    // The UI host is optional.
    // Convention: port 0 disables it (used by tests).
    if config.ui.address.port() == 0 {
        info!("UI host disabled");
    } else {
        let ui_config = config.ui.clone();
        tokio::spawn(async move {
            ui::run_ui_server(ui_config).await;
        });
    }

    // Session registry: owns the single active session
    let registry = Arc::new(SessionRegistry::new(config.delivery.clone()));

    // Start the control gateway and serve controllers forever
    let gateway = ControlGateway::bind(config.control.clone(), registry).await?;
    gateway.run().await?;

    Ok(())
}
