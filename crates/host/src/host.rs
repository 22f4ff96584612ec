use std::rc::Rc;

use actionstate_input::{
    Accessor, ActionChange, ActionSource, ActionState, CacheError, ChangeFilter, StateCache,
};

use crate::config::{ConfigError, InputConfig};

/// Errors from host lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("state cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Receives action changes that pass the host's change filter.
pub trait ActionObserver {
    fn on_action_changed(&mut self, change: &ActionChange);
}

impl<F: FnMut(&ActionChange)> ActionObserver for F {
    fn on_action_changed(&mut self, change: &ActionChange) {
        self(change)
    }
}

/// Handle returned by [`InputHost::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// Owns an action source and the cache fed by it.
///
/// Call [`late_update`](Self::late_update) once per frame after the source has
/// processed its events. Dropping the host shuts it down.
pub struct InputHost<S: ActionSource> {
    source: S,
    cache: StateCache,
    config: InputConfig,
    filter: ChangeFilter,
    observers: Vec<(ObserverId, Box<dyn ActionObserver>)>,
    next_observer: u64,
    /// Reused between frames so dispatch does not allocate.
    scratch: Vec<ActionChange>,
    frame: u64,
}

impl<S: ActionSource> InputHost<S> {
    /// Validate `config` and register every action `source` provides.
    pub fn new(config: InputConfig, mut source: S) -> Result<Self, HostError> {
        config.validate()?;
        let mut cache = StateCache::new();

        let actions = source.actions();
        if actions.is_empty() {
            tracing::warn!("action source provides no actions");
        }
        for action in &actions {
            match cache.register(action, &mut source) {
                Ok(_) => {}
                Err(CacheError::InvalidAction(name)) => {
                    tracing::warn!(action = %name, "skipping malformed action");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if config.enable_debug {
            tracing::info!(
                maps = config.asset.maps.len(),
                actions = cache.stats().states,
                "input host initialised"
            );
        }

        Ok(Self {
            source,
            cache,
            filter: ChangeFilter::new(config.change_threshold),
            config,
            observers: Vec::new(),
            next_observer: 0,
            scratch: Vec::new(),
            frame: 0,
        })
    }

    /// Accessor for `name`; unknown names log a warning and return `None`.
    pub fn accessor(&mut self, name: &str) -> Option<Rc<Accessor>> {
        let accessor = self.cache.get_accessor(name);
        if accessor.is_none() && !self.cache.is_disposed() {
            tracing::warn!(action = name, "unknown action requested");
        }
        accessor
    }

    pub fn release(&mut self, name: &str) -> bool {
        self.cache.release(name)
    }

    /// Snapshot of one action's state.
    pub fn state(&self, name: &str) -> Option<ActionState> {
        self.cache.get_state(name)
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The source, for feeding events in tests and scripted playback.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Frames completed by [`late_update`](Self::late_update).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn subscribe(&mut self, observer: Box<dyn ActionObserver>) -> ObserverId {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// End-of-frame step: dispatch significant changes, then resolve edges.
    /// Returns how many changes were dispatched.
    pub fn late_update(&mut self) -> Result<usize, HostError> {
        let _span = tracing::info_span!("input_late_update", frame = self.frame).entered();

        self.cache.drain_changes_into(&mut self.scratch);
        let mut dispatched = 0;
        for change in self.scratch.drain(..) {
            if !self.filter.accept(&change) {
                continue;
            }
            if self.config.enable_debug {
                tracing::debug!(
                    action = %change.name,
                    value = %change.value,
                    phase = ?change.phase,
                    "input activity"
                );
            }
            for (_, observer) in &mut self.observers {
                observer.on_action_changed(&change);
            }
            dispatched += 1;
        }

        self.cache.tick()?;
        self.frame += 1;
        Ok(dispatched)
    }

    /// Dispose the cache and drop every observer.
    pub fn shutdown(&mut self) -> Result<(), HostError> {
        self.cache.dispose(&mut self.source)?;
        self.observers.clear();
        self.filter.clear();
        self.scratch.clear();
        tracing::debug!(frames = self.frame, "input host shut down");
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.cache.is_disposed()
    }
}

impl<S: ActionSource> Drop for InputHost<S> {
    fn drop(&mut self) {
        if self.is_shut_down() {
            return;
        }
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "input host shutdown failed during drop");
        }
    }
}
