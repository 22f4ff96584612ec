//! Action State Cache: turns asynchronously delivered action values into a
//! deterministic once-per-tick snapshot with edge detection and pooled,
//! allocation-free accessors.
//!
//! # Invariants
//! - Edge flags are visible for exactly the tick in which the transition happened.
//! - At most one checked-out accessor per action name; pooled accessors are
//!   never also checked out.
//! - Every checked-out name has a registered state.
//! - Single-threaded: deliveries, then one `tick`, per frame.

pub mod accessor;
pub mod cache;
pub mod change;
pub mod source;
pub mod state;

pub use accessor::{Accessor, AccessorError};
pub use cache::{CacheError, CacheStats, StateCache};
pub use change::{ActionChange, ChangeFilter, ChangePhase};
pub use source::{
    ActionCallback, ActionDescriptor, ActionSource, MemorySource, SourceError, SourceEvent,
    SubscriptionId,
};
pub use state::ActionState;
