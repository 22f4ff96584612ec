use std::fmt;

use actionstate_common::{RawValue, ValueKind};
use actionstate_input::{ActionState, CacheStats, StateCache};

/// Cache inspector for developer tooling.
///
/// Provides read-only queries against a [`StateCache`] for dashboards and logs.
pub struct CacheInspector;

impl CacheInspector {
    /// Occupancy counts plus how many actions are held or changed edge this tick.
    pub fn summary(cache: &StateCache) -> CacheSummary {
        let mut summary = CacheSummary {
            stats: cache.stats(),
            held: 0,
            pressed: 0,
            released: 0,
        };
        for state in cache.states() {
            summary.held += usize::from(state.is_held());
            summary.pressed += usize::from(state.pressed_this_frame());
            summary.released += usize::from(state.released_this_frame());
        }
        summary
    }

    pub fn inspect_action(cache: &StateCache, name: &str) -> Option<ActionInfo> {
        cache.get_state(name).map(|s| ActionInfo::from_state(&s))
    }

    /// All registered action names, sorted.
    pub fn list_actions(cache: &StateCache) -> Vec<String> {
        cache.action_names().map(str::to_string).collect()
    }

    /// Snapshot of every action, sorted by name.
    pub fn snapshot(cache: &StateCache) -> Vec<ActionInfo> {
        cache.states().map(|s| ActionInfo::from_state(&s)).collect()
    }
}

/// Summary of cache state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSummary {
    pub stats: CacheStats,
    pub held: usize,
    pub pressed: usize,
    pub released: usize,
}

impl fmt::Display for CacheSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache: {} held={} pressed={} released={}",
            self.stats, self.held, self.pressed, self.released
        )
    }
}

/// Detailed info about a single action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInfo {
    pub name: String,
    pub kind: ValueKind,
    pub value: RawValue,
    pub previous: RawValue,
    pub held: bool,
    pub pressed: bool,
    pub released: bool,
}

impl ActionInfo {
    fn from_state(state: &ActionState) -> Self {
        Self {
            name: state.name().to_string(),
            kind: state.kind(),
            value: state.raw_value(),
            previous: state.previous_value(),
            held: state.is_held(),
            pressed: state.pressed_this_frame(),
            released: state.released_this_frame(),
        }
    }
}

impl fmt::Display for ActionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] = {}", self.name, self.kind, self.value)?;
        let flags: Vec<&str> = [
            (self.held, "held"),
            (self.pressed, "pressed"),
            (self.released, "released"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect();
        if !flags.is_empty() {
            write!(f, " ({})", flags.join(", "))?;
        }
        Ok(())
    }
}
