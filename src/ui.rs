//! Static asset host for the operator UI.
//!
//! Runs on its own port and carries no session logic: the control page it
//! serves talks to the daemon over the control channel like any other
//! controller.

use crate::assets;
use crate::config::UiConfig;
use axum::Router;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Handler for GET / - the operator page.
async fn index(State(dir): State<Arc<PathBuf>>) -> Response {
    assets::serve_file(&dir, "index.html").await
}

/// Handler for GET /{path} - any other asset in the UI directory.
async fn asset(State(dir): State<Arc<PathBuf>>, Path(path): Path<String>) -> Response {
    assets::serve_file(&dir, &path).await
}

/// Run the UI host.
///
/// Binds to the configured address and serves the asset directory.
/// This is a long-running task that should be spawned in the background.
pub async fn run_ui_server(config: UiConfig) {
    let dir = Arc::new(PathBuf::from(&config.asset_dir));
    let app = Router::new()
        .route("/", get(index))
        .route("/*path", get(asset))
        .with_state(dir);

    info!(address = %config.address, asset_dir = %config.asset_dir, "UI host listening");

    let listener = match tokio::net::TcpListener::bind(config.address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %config.address, error = %e, "Failed to bind UI host");
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "UI host error");
    }
}
