//! bench-proto - the wire boundary of benchd.
//!
//! This crate defines the JSON control-channel schema spoken between
//! controllers and the daemon, plus the pure renderer that turns a
//! benchmark specification into a self-contained measurement document.
//! It carries no networking or runtime state of its own.

pub mod document;
pub mod message;

pub use document::{BenchmarkSpec, render};
pub use message::{ControlReply, ControlRequest};
