use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::accessor::{Accessor, StateCell};
use crate::change::{ActionChange, ChangePhase};
use crate::source::{ActionDescriptor, ActionSource, SourceError, SourceEvent, SubscriptionId};
use crate::state::ActionState;

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid action name {0:?}")]
    InvalidAction(String),
    #[error("action source rejected registration: {0}")]
    Source(#[from] SourceError),
    #[error("state cache has been disposed")]
    Disposed,
}

/// Occupancy counts for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub states: usize,
    pub checked_out: usize,
    pub pooled: usize,
    /// Accessors ever allocated by this cache.
    pub allocated: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "states={} checked_out={} pooled={} allocated={}",
            self.states, self.checked_out, self.pooled, self.allocated
        )
    }
}

#[derive(Debug)]
struct Registration {
    state: StateCell,
    subscription: SubscriptionId,
}

/// Owns every registered [`ActionState`] and the [`Accessor`] pool.
///
/// Per frame: the source delivers values (through the callbacks installed by
/// [`register`](Self::register)), consumers read through accessors, and the
/// host calls [`tick`](Self::tick) once to resolve edges.
///
/// Uses BTreeMap so enumeration order is stable across runs.
#[derive(Debug, Default)]
pub struct StateCache {
    states: BTreeMap<Rc<str>, Registration>,
    checked_out: BTreeMap<Rc<str>, Rc<Accessor>>,
    /// LIFO of released accessors awaiting rebind.
    pool: Vec<Rc<Accessor>>,
    /// Changes recorded by source callbacks since the last tick.
    changes: Rc<RefCell<Vec<ActionChange>>>,
    allocated: usize,
    disposed: bool,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` and subscribe its state to `source`.
    ///
    /// Returns `Ok(false)` if the name was already registered; re-registration
    /// is a no-op.
    pub fn register(
        &mut self,
        action: &ActionDescriptor,
        source: &mut dyn ActionSource,
    ) -> Result<bool, CacheError> {
        self.ensure_live()?;
        if action.name.trim().is_empty() {
            return Err(CacheError::InvalidAction(action.name.clone()));
        }
        if self.states.contains_key(action.name.as_str()) {
            tracing::debug!(action = %action.name, "action already registered");
            return Ok(false);
        }

        let name: Rc<str> = Rc::from(action.name.as_str());
        let state = Rc::new(RefCell::new(ActionState::new(Rc::clone(&name), action.kind)));
        let sink = Rc::downgrade(&state);
        let changes = Rc::downgrade(&self.changes);
        let callback_name = Rc::clone(&name);

        let subscription = source.subscribe(
            &action.name,
            Box::new(move |event: &SourceEvent| {
                let Some(state) = sink.upgrade() else {
                    return;
                };
                let mut state = state.borrow_mut();
                let phase = match *event {
                    SourceEvent::Delivered(value) => {
                        state.on_raw_value_delivered(value);
                        ChangePhase::Performed
                    }
                    SourceEvent::Cleared => {
                        state.on_raw_value_cleared();
                        ChangePhase::Canceled
                    }
                };
                if let Some(changes) = changes.upgrade() {
                    changes.borrow_mut().push(ActionChange {
                        name: Rc::clone(&callback_name),
                        phase,
                        value: state.raw_value(),
                    });
                }
            }),
        )?;
        source.enable(&action.name);

        tracing::debug!(action = %action.name, kind = %action.kind, "registered action");
        self.states.insert(
            name,
            Registration {
                state,
                subscription,
            },
        );
        Ok(true)
    }

    /// Snapshot of a registered state.
    ///
    /// Owned, so holding it never blocks a source callback.
    pub fn get_state(&self, name: &str) -> Option<ActionState> {
        self.states.get(name).map(|r| r.state.borrow().clone())
    }

    /// The accessor for `name`, reusing a checked-out or pooled one when possible.
    pub fn get_accessor(&mut self, name: &str) -> Option<Rc<Accessor>> {
        if self.disposed {
            tracing::warn!(action = name, "accessor requested from disposed cache");
            return None;
        }
        if let Some(accessor) = self.checked_out.get(name) {
            return Some(Rc::clone(accessor));
        }
        let (key, registration) = self.states.get_key_value(name)?;
        let key = Rc::clone(key);
        let state = Rc::clone(&registration.state);

        let accessor = match self.pool.pop() {
            Some(pooled) => {
                tracing::trace!(action = name, "reusing pooled accessor");
                pooled
            }
            None => {
                self.allocated += 1;
                tracing::debug!(action = name, allocated = self.allocated, "allocating accessor");
                Rc::new(Accessor::detached())
            }
        };
        accessor.rebind(state);
        self.checked_out.insert(key, Rc::clone(&accessor));
        Some(accessor)
    }

    /// Return the accessor for `name` to the pool. Returns false if none was checked out.
    pub fn release(&mut self, name: &str) -> bool {
        let Some(accessor) = self.checked_out.remove(name) else {
            return false;
        };
        accessor.unbind();
        self.pool.push(accessor);
        true
    }

    /// Resolve this frame's edges on every state.
    ///
    /// Change records not drained since the previous tick are discarded.
    pub fn tick(&mut self) -> Result<(), CacheError> {
        self.ensure_live()?;
        for registration in self.states.values() {
            registration.state.borrow_mut().resolve_tick();
        }
        self.changes.borrow_mut().clear();
        tracing::trace!(states = self.states.len(), "resolved tick");
        Ok(())
    }

    /// Move pending change records into `out`, keeping both buffers' capacity.
    pub fn drain_changes_into(&self, out: &mut Vec<ActionChange>) {
        out.extend(self.changes.borrow_mut().drain(..));
    }

    /// Unsubscribe and disable every action, release every accessor, and clear
    /// all collections. The cache is unusable afterwards.
    pub fn dispose(&mut self, source: &mut dyn ActionSource) -> Result<(), CacheError> {
        self.ensure_live()?;
        for (name, registration) in std::mem::take(&mut self.states) {
            source.unsubscribe(registration.subscription);
            source.disable(&name);
        }
        for (_, accessor) in std::mem::take(&mut self.checked_out) {
            accessor.unbind();
        }
        for accessor in self.pool.drain(..) {
            accessor.unbind();
        }
        self.changes.borrow_mut().clear();
        self.disposed = true;
        tracing::debug!(allocated = self.allocated, "state cache disposed");
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Registered action names in sorted order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(|k| &**k)
    }

    /// Snapshots of every registered state, sorted by name.
    pub fn states(&self) -> impl Iterator<Item = ActionState> {
        self.states.values().map(|r| r.state.borrow().clone())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            states: self.states.len(),
            checked_out: self.checked_out.len(),
            pooled: self.pool.len(),
            allocated: self.allocated,
        }
    }

    fn ensure_live(&self) -> Result<(), CacheError> {
        if self.disposed {
            Err(CacheError::Disposed)
        } else {
            Ok(())
        }
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        for name in self.checked_out.keys() {
            assert!(self.states.contains_key(name), "{name} checked out but not registered");
        }
        for pooled in &self.pool {
            assert!(pooled.is_released());
            assert!(
                !self.checked_out.values().any(|a| Rc::ptr_eq(a, pooled)),
                "accessor both pooled and checked out"
            );
        }
    }
}
