//! Session registry - the single-active-session invariant.
//!
//! All session transitions run under one async mutex, so racing start and
//! stop requests from different control connections serialize cleanly:
//! the old endpoint is fully released before the new one binds, and at
//! most one session is ever Active.

use super::{Session, SessionSnapshot};
use crate::config::DeliveryConfig;
use crate::delivery;
use crate::error::ProvisionError;
use bench_proto::{BenchmarkSpec, document};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of a successful [`SessionRegistry::begin_session`].
#[derive(Debug, Clone)]
pub struct StartOutcome {
    /// Id of the session this start superseded, if any. Reported to the
    /// requester before the new session's details.
    pub stopped: Option<String>,
    pub session_id: String,
    pub url: String,
}

/// Owns the current session (at most one) and drives its lifecycle.
pub struct SessionRegistry {
    delivery: DeliveryConfig,
    current: Mutex<Option<Session>>,
}

impl SessionRegistry {
    pub fn new(delivery: DeliveryConfig) -> Self {
        Self {
            delivery,
            current: Mutex::new(None),
        }
    }

    /// Create a new session, superseding any existing one.
    ///
    /// The lock is held across the whole release-then-bind sequence: the
    /// previous endpoint is torn down before the new one is provisioned,
    /// so the delivery port is never double-bound. On bind failure the
    /// slot is left empty and the new session never reaches Active.
    pub async fn begin_session(
        &self,
        spec: BenchmarkSpec,
    ) -> Result<StartOutcome, ProvisionError> {
        let mut slot = self.current.lock().await;

        let stopped = match slot.take() {
            Some(mut old) => {
                info!(session_id = %old.id(), "Superseding current session");
                old.stop().await;
                Some(old.id().to_string())
            }
            None => None,
        };

        let id = Uuid::new_v4().to_string();
        let mut session = Session::new(id.clone());
        let document = document::render(&spec);

        match delivery::provision(document, &id, &self.delivery).await {
            Ok(endpoint) => {
                let url = format!(
                    "http://{}:{}/{}",
                    self.delivery.public_host,
                    endpoint.local_addr().port(),
                    id
                );
                session.activate(url.clone(), endpoint);
                *slot = Some(session);
                Ok(StartOutcome {
                    stopped,
                    session_id: id,
                    url,
                })
            }
            Err(e) => {
                session.abort();
                Err(e)
            }
        }
    }

    /// Tear down the session with the given id.
    ///
    /// Returns `false` without touching any state when `id` is not the
    /// current session (a stale or duplicate stop request).
    pub async fn end_session(&self, id: &str) -> bool {
        let mut slot = self.current.lock().await;
        if !slot.as_ref().is_some_and(|s| s.id() == id) {
            debug!(session_id = %id, "Stop request does not match current session, ignoring");
            return false;
        }
        if let Some(mut session) = slot.take() {
            session.stop().await;
        }
        true
    }

    /// Snapshot of the current session, if any.
    pub async fn current(&self) -> Option<SessionSnapshot> {
        let slot = self.current.lock().await;
        slot.as_ref().map(|s| SessionSnapshot {
            id: s.id().to_string(),
            url: s.url().to_string(),
            state: s.state(),
        })
    }
}
