//! Session state and lifecycle.
//!
//! A session is one provisioning of a benchmark document at a unique
//! address, from creation to teardown. The [`SessionRegistry`] owns at
//! most one of these at a time.

mod registry;

pub use registry::{SessionRegistry, StartOutcome};

use crate::delivery::EndpointHandle;
use tracing::info;

/// Lifecycle states of a session.
///
/// ```text
/// Provisioning --(endpoint bound)--> Active
/// Active --(stop request | superseding start)--> Stopping
/// Stopping --(endpoint released)--> Stopped
/// Provisioning --(bind failure)--> Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, delivery endpoint not yet bound.
    Provisioning,
    /// Endpoint bound and serving the document.
    Active,
    /// Teardown in progress, endpoint being released.
    Stopping,
    /// Terminal. Session ids are never reused.
    Stopped,
}

/// One benchmark session.
pub struct Session {
    id: String,
    url: String,
    state: SessionState,
    endpoint: Option<EndpointHandle>,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            url: String::new(),
            state: SessionState::Provisioning,
            endpoint: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Externally reachable address of the document. Empty until Active.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Endpoint bound: Provisioning -> Active.
    fn activate(&mut self, url: String, endpoint: EndpointHandle) {
        self.url = url;
        self.endpoint = Some(endpoint);
        self.transition(SessionState::Active);
    }

    /// Bind failure: Provisioning -> Stopped without ever holding an
    /// endpoint.
    fn abort(&mut self) {
        self.transition(SessionState::Stopped);
    }

    /// Stop request or supersession: Stopping, release, Stopped.
    ///
    /// Returns only once the listener is actually closed, so the caller
    /// may rebind the delivery port immediately afterwards.
    async fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.transition(SessionState::Stopping);
        if let Some(mut endpoint) = self.endpoint.take() {
            endpoint.release().await;
        }
        self.transition(SessionState::Stopped);
    }

    fn transition(&mut self, to: SessionState) {
        info!(session_id = %self.id, from = ?self.state, to = ?to, "Session state change");
        self.state = to;
    }
}

/// Read-only view of the current session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: String,
    pub url: String,
    pub state: SessionState,
}
