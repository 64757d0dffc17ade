//! Unified error handling for benchd.
//!
//! Every failure is confined to the request that caused it: the control
//! connection stays open, and the session registry never ends up with two
//! live sessions or a bound endpoint it does not own.

use bench_proto::ControlReply;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while provisioning a delivery endpoint.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The fixed delivery port could not be bound. The start request that
    /// triggered the bind fails and the registry rolls back to empty.
    #[error("delivery port unavailable on {addr}: {source}")]
    PortUnavailable {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while handling a single control request.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The inbound frame was not a well-formed control message.
    #[error("malformed control message: {0}")]
    Protocol(String),

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

impl ControlError {
    /// Convert to the error reply sent back to the controller.
    pub fn to_reply(&self) -> ControlReply {
        ControlReply::Error {
            message: self.to_string(),
        }
    }
}
