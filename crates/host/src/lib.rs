//! Input host: owns an action source and its state cache, registers every
//! action the configured asset declares, dispatches filtered change
//! notifications to observers and drives the per-frame tick.
//!
//! # Invariants
//! - Observers only see changes that pass the change filter.
//! - Changes are dispatched before the frame's edges are resolved.
//! - Shutting down unsubscribes every action and drops every observer.

pub mod config;
pub mod host;

pub use config::{ActionAsset, ActionDefinition, ActionMap, ConfigError, InputConfig};
pub use host::{ActionObserver, HostError, InputHost, ObserverId};
