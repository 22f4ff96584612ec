//! Developer Tooling: read-only cache inspection and input activity debugging.
//!
//! # Invariants
//! - Tools never mutate action state; they read through the cache's
//!   diagnostics surface or observe dispatched changes.

pub mod debugger;
pub mod inspector;

pub use debugger::InputDebugger;
pub use inspector::{ActionInfo, CacheInspector, CacheSummary};
