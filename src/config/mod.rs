//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: top-level [`Config`] struct and TOML loading
//! - [`listen`]: per-channel listener configuration (control, delivery, UI)

mod listen;
mod types;

pub use listen::{ControlConfig, DeliveryConfig, UiConfig};
pub use types::{Config, ConfigError};
