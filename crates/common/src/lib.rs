//! Shared action value types: the tagged raw value an action source delivers
//! and the total coercion rules that let one value be read as any other kind.
//!
//! # Invariants
//! - Coercion never fails; out-of-domain inputs fall back to the zero value.
//! - Activity uses a single threshold for every magnitude-based kind.

pub mod coerce;
pub mod value;

pub use coerce::ACTIVITY_THRESHOLD;
pub use value::{RawValue, ValueKind};
