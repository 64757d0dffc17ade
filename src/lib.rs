//! benchd - remote benchmark bridge.
//!
//! A controller submits a pair of code snippets over the WebSocket control
//! channel; the daemon provisions an ephemeral HTTP delivery endpoint
//! serving the rendered measurement document at a unique address, enforcing
//! that exactly one session is live at a time.

pub mod assets;
pub mod config;
pub mod delivery;
pub mod error;
pub mod network;
pub mod session;
pub mod ui;
