//! Control-channel message schema.
//!
//! Messages are JSON over one persistent WebSocket per controller.
//! Inbound requests are tagged by `type`, outbound replies by `status`;
//! field names are camelCase on the wire.

use crate::document::BenchmarkSpec;
use serde::{Deserialize, Serialize};

/// A request from a controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Provision a new benchmark session, superseding any current one.
    StartBenchmark { payload: BenchmarkSpec },

    /// Tear down the session with the given id. A stale or repeated id is
    /// acknowledged but changes nothing.
    #[serde(rename_all = "camelCase")]
    StopBenchmark { session_id: String },
}

impl ControlRequest {
    /// Parse a raw control frame.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// A status reply to a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ControlReply {
    /// Sent once, immediately after the connection is accepted.
    Connected,

    /// A session is live and its document is reachable at `url`.
    #[serde(rename_all = "camelCase")]
    BenchmarkStarted { url: String, session_id: String },

    /// The named session is no longer served. Also emitted for the
    /// previous session when a new start supersedes it.
    #[serde(rename_all = "camelCase")]
    BenchmarkStopped { session_id: String },

    /// The request could not be handled; the connection stays open.
    Error { message: String },
}

impl ControlReply {
    /// Encode for the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
