//! Delivery channel provisioning.
//!
//! Each session gets an ephemeral HTTP endpoint on the fixed delivery
//! port, serving the rendered document at `/{session id}` and the shared
//! measurement-library assets under `/libs/`. The endpoint is exclusively
//! owned by its session through [`EndpointHandle`]; supersession is
//! observable on the wire as a clean close-then-reopen of the port.

use crate::assets;
use crate::config::DeliveryConfig;
use crate::error::ProvisionError;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Immutable state behind one provisioned endpoint.
struct Endpoint {
    session_id: String,
    document: String,
    libs_dir: PathBuf,
}

/// Exclusive ownership of a running delivery listener.
pub struct EndpointHandle {
    session_id: String,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    served: Option<JoinHandle<()>>,
}

impl EndpointHandle {
    /// Address the listener is actually bound on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Close the listener and wait for the serve task to finish.
    ///
    /// Idempotent: the second and further calls are no-ops. On return the
    /// delivery port is free to bind again.
    pub async fn release(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(served) = self.served.take() {
            if let Err(e) = served.await {
                warn!(session_id = %self.session_id, error = %e, "Delivery serve task failed");
            }
            info!(session_id = %self.session_id, "Delivery endpoint released");
        }
    }
}

impl Drop for EndpointHandle {
    fn drop(&mut self) {
        // An unreleased handle must not leak its listener.
        if let Some(served) = self.served.take() {
            served.abort();
        }
    }
}

/// Bind the delivery listener and serve `document` at `/{session_id}`.
///
/// The bind is awaited here, so a returned handle means the endpoint is
/// reachable; a `PortUnavailable` means nothing was bound at all.
pub async fn provision(
    document: String,
    session_id: &str,
    config: &DeliveryConfig,
) -> Result<EndpointHandle, ProvisionError> {
    let listener =
        TcpListener::bind(config.address)
            .await
            .map_err(|source| ProvisionError::PortUnavailable {
                addr: config.address,
                source,
            })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ProvisionError::PortUnavailable {
            addr: config.address,
            source,
        })?;

    let endpoint = Arc::new(Endpoint {
        session_id: session_id.to_string(),
        document,
        libs_dir: PathBuf::from(&config.libs_dir),
    });

    let app = Router::new()
        .route("/libs/*path", get(serve_library))
        .route("/:session_id", get(serve_document))
        .with_state(endpoint);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task_session_id = session_id.to_string();
    let served = tokio::spawn(async move {
        let serve = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = serve.await {
            warn!(session_id = %task_session_id, error = %e, "Delivery endpoint error");
        }
    });

    info!(session_id, %local_addr, "Delivery endpoint bound");

    Ok(EndpointHandle {
        session_id: session_id.to_string(),
        local_addr,
        shutdown: Some(shutdown_tx),
        served: Some(served),
    })
}

/// Handler for GET /{session_id} - the rendered document, or 404 for any
/// id other than the one this endpoint was provisioned for.
async fn serve_document(
    State(endpoint): State<Arc<Endpoint>>,
    Path(session_id): Path<String>,
) -> Response {
    if session_id == endpoint.session_id {
        Html(endpoint.document.clone()).into_response()
    } else {
        (StatusCode::NOT_FOUND, "no such session").into_response()
    }
}

/// Handler for GET /libs/{path} - shared measurement-library assets.
async fn serve_library(
    State(endpoint): State<Arc<Endpoint>>,
    Path(path): Path<String>,
) -> Response {
    assets::serve_file(&endpoint.libs_dir, &path).await
}
