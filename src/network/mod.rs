//! Control-plane networking: the WebSocket gateway and the per-controller
//! connection tasks it spawns.

mod connection;
mod gateway;

pub use connection::ControlConnection;
pub use gateway::ControlGateway;
