//! The action source collaborator: enumerates actions and pushes value
//! callbacks into the cache.

use std::collections::HashSet;
use std::fmt;

use actionstate_common::{RawValue, ValueKind};

/// An action the source can provide, with the kind it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub kind: ValueKind,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A value event fired by the source for one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// The action produced a value.
    Delivered(RawValue),
    /// The action returned to rest.
    Cleared,
}

/// Callback the source invokes for each event on a subscribed action.
pub type ActionCallback = Box<dyn FnMut(&SourceEvent)>;

/// Handle returned by [`ActionSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Errors raised by an action source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("action {0:?} is not provided by this source")]
    UnknownAction(String),
}

/// Anything that can enumerate actions and deliver their values.
///
/// Callbacks must only fire from the thread that owns the cache, before the
/// cache is ticked for the frame.
pub trait ActionSource {
    /// Every action this source provides.
    fn actions(&self) -> Vec<ActionDescriptor>;

    /// Route events for `action` into `callback`.
    fn subscribe(
        &mut self,
        action: &str,
        callback: ActionCallback,
    ) -> Result<SubscriptionId, SourceError>;

    /// Drop a subscription. Returns false if it was not present.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    fn enable(&mut self, action: &str);

    fn disable(&mut self, action: &str);
}

struct Subscriber {
    id: SubscriptionId,
    action: String,
    callback: ActionCallback,
}

/// In-process action source fed by explicit `deliver`/`clear` calls.
///
/// Disabled actions swallow events, matching device-backed sources.
#[derive(Default)]
pub struct MemorySource {
    actions: Vec<ActionDescriptor>,
    enabled: HashSet<String>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl MemorySource {
    pub fn new(actions: impl IntoIterator<Item = ActionDescriptor>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Builder-style helper to declare one more action.
    pub fn with_action(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.actions.push(ActionDescriptor::new(name, kind));
        self
    }

    pub fn is_enabled(&self, action: &str) -> bool {
        self.enabled.contains(action)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Fire a value for `action`. Returns the number of callbacks invoked.
    pub fn deliver(&mut self, action: &str, value: impl Into<RawValue>) -> usize {
        self.dispatch(action, SourceEvent::Delivered(value.into()))
    }

    /// Signal that `action` returned to rest. Returns the number of callbacks invoked.
    pub fn clear(&mut self, action: &str) -> usize {
        self.dispatch(action, SourceEvent::Cleared)
    }

    fn dispatch(&mut self, action: &str, event: SourceEvent) -> usize {
        if !self.enabled.contains(action) {
            tracing::trace!(action, "event on disabled action ignored");
            return 0;
        }
        let mut fired = 0;
        for sub in self.subscribers.iter_mut().filter(|s| s.action == action) {
            (sub.callback)(&event);
            fired += 1;
        }
        fired
    }

    fn provides(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.name == action)
    }
}

impl ActionSource for MemorySource {
    fn actions(&self) -> Vec<ActionDescriptor> {
        self.actions.clone()
    }

    fn subscribe(
        &mut self,
        action: &str,
        callback: ActionCallback,
    ) -> Result<SubscriptionId, SourceError> {
        if !self.provides(action) {
            return Err(SourceError::UnknownAction(action.to_string()));
        }
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push(Subscriber {
            id,
            action: action.to_string(),
            callback,
        });
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn enable(&mut self, action: &str) {
        if self.provides(action) {
            self.enabled.insert(action.to_string());
        }
    }

    fn disable(&mut self, action: &str) {
        self.enabled.remove(action);
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("actions", &self.actions)
            .field("enabled", &self.enabled)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
