use std::cell::RefCell;
use std::rc::Rc;

use actionstate_common::{RawValue, ValueKind};
use glam::{Vec2, Vec3};

use crate::state::ActionState;

pub(crate) type StateCell = Rc<RefCell<ActionState>>;

#[derive(Debug)]
enum Binding {
    /// Not attached to any action. Reads return zero values.
    Detached,
    Bound(StateCell),
    /// Returned to the pool or disposed with the cache. Reads are errors.
    Released,
}

/// Reading through an accessor that was handed back to its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessorError {
    #[error("accessor was released to its pool; fetch a fresh one from the cache")]
    Released,
}

/// A reusable, read-only view over one action's state.
///
/// Obtained from [`StateCache::get_accessor`](crate::StateCache::get_accessor).
/// A detached accessor reads as the zero value of every type so code running
/// before input is wired up keeps working. A released accessor reports
/// [`AccessorError::Released`] instead of stale data.
#[derive(Debug)]
pub struct Accessor {
    binding: RefCell<Binding>,
}

impl Accessor {
    /// An accessor bound to nothing.
    pub fn detached() -> Self {
        Self {
            binding: RefCell::new(Binding::Detached),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(*self.binding.borrow(), Binding::Bound(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(*self.binding.borrow(), Binding::Released)
    }

    /// Name of the bound action, `None` when detached.
    pub fn name(&self) -> Result<Option<String>, AccessorError> {
        self.with_name(|name| name.map(str::to_owned))
    }

    /// Runs `f` on the bound action's name without copying it.
    pub fn with_name<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> Result<R, AccessorError> {
        match &*self.binding.borrow() {
            Binding::Detached => Ok(f(None)),
            Binding::Bound(state) => Ok(f(Some(state.borrow().name()))),
            Binding::Released => Err(AccessorError::Released),
        }
    }

    pub fn kind(&self) -> Result<ValueKind, AccessorError> {
        self.read(ValueKind::Unknown, ActionState::kind)
    }

    /// Uncoerced current value, `None` when detached.
    pub fn raw_value(&self) -> Result<Option<RawValue>, AccessorError> {
        self.read(None, |s| Some(s.raw_value()))
    }

    pub fn as_bool(&self) -> Result<bool, AccessorError> {
        self.read(false, ActionState::as_bool)
    }

    pub fn as_int(&self) -> Result<i32, AccessorError> {
        self.read(0, ActionState::as_int)
    }

    pub fn as_float(&self) -> Result<f32, AccessorError> {
        self.read(0.0, ActionState::as_float)
    }

    pub fn as_vec2(&self) -> Result<Vec2, AccessorError> {
        self.read(Vec2::ZERO, ActionState::as_vec2)
    }

    pub fn as_vec3(&self) -> Result<Vec3, AccessorError> {
        self.read(Vec3::ZERO, ActionState::as_vec3)
    }

    pub fn pressed_this_frame(&self) -> Result<bool, AccessorError> {
        self.read(false, ActionState::pressed_this_frame)
    }

    pub fn released_this_frame(&self) -> Result<bool, AccessorError> {
        self.read(false, ActionState::released_this_frame)
    }

    pub fn is_held(&self) -> Result<bool, AccessorError> {
        self.read(false, ActionState::is_held)
    }

    pub(crate) fn rebind(&self, state: StateCell) {
        *self.binding.borrow_mut() = Binding::Bound(state);
    }

    pub(crate) fn unbind(&self) {
        *self.binding.borrow_mut() = Binding::Released;
    }

    fn read<T>(&self, detached: T, f: impl FnOnce(&ActionState) -> T) -> Result<T, AccessorError> {
        match &*self.binding.borrow() {
            Binding::Detached => Ok(detached),
            Binding::Bound(state) => Ok(f(&state.borrow())),
            Binding::Released => Err(AccessorError::Released),
        }
    }
}

impl Default for Accessor {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(state: ActionState) -> (Accessor, StateCell) {
        let cell = Rc::new(RefCell::new(state));
        let accessor = Accessor::detached();
        accessor.rebind(Rc::clone(&cell));
        (accessor, cell)
    }

    #[test]
    fn detached_reads_zero() {
        let a = Accessor::default();
        assert!(!a.is_bound());
        assert_eq!(a.as_bool(), Ok(false));
        assert_eq!(a.as_int(), Ok(0));
        assert_eq!(a.as_float(), Ok(0.0));
        assert_eq!(a.as_vec2(), Ok(Vec2::ZERO));
        assert_eq!(a.as_vec3(), Ok(Vec3::ZERO));
        assert_eq!(a.pressed_this_frame(), Ok(false));
        assert_eq!(a.released_this_frame(), Ok(false));
        assert_eq!(a.is_held(), Ok(false));
        assert_eq!(a.name(), Ok(None));
        assert_eq!(a.with_name(|n| n.is_none()), Ok(true));
        assert_eq!(a.raw_value(), Ok(None));
        assert_eq!(a.kind(), Ok(ValueKind::Unknown));
    }

    #[test]
    fn bound_reads_through() {
        let (a, cell) = bound(ActionState::new("Move", ValueKind::Vector2));
        cell.borrow_mut()
            .on_raw_value_delivered(RawValue::Vector2(Vec2::new(3.0, 4.0)));
        assert_eq!(a.as_vec2(), Ok(Vec2::new(3.0, 4.0)));
        assert_eq!(a.as_float(), Ok(5.0));
        assert_eq!(a.as_int(), Ok(5));
        assert_eq!(a.is_held(), Ok(true));
        assert_eq!(a.name(), Ok(Some("Move".to_string())));
        assert_eq!(a.with_name(|n| n == Some("Move")), Ok(true));
        assert_eq!(a.kind(), Ok(ValueKind::Vector2));
    }

    #[test]
    fn edges_follow_resolve() {
        let (a, cell) = bound(ActionState::new("Jump", ValueKind::Bool));
        cell.borrow_mut().on_raw_value_delivered(RawValue::Bool(true));
        assert_eq!(a.pressed_this_frame(), Ok(false));
        cell.borrow_mut().resolve_tick();
        assert_eq!(a.pressed_this_frame(), Ok(true));
    }

    #[test]
    fn released_reads_are_errors() {
        let (a, _cell) = bound(ActionState::new("Jump", ValueKind::Bool));
        a.unbind();
        assert!(a.is_released());
        assert_eq!(a.as_bool(), Err(AccessorError::Released));
        assert_eq!(a.as_vec3(), Err(AccessorError::Released));
        assert_eq!(a.pressed_this_frame(), Err(AccessorError::Released));
        assert_eq!(a.name(), Err(AccessorError::Released));
        assert_eq!(a.with_name(|_| ()), Err(AccessorError::Released));
    }

    #[test]
    fn rebind_after_release_reads_new_state() {
        let (a, _jump) = bound(ActionState::new("Jump", ValueKind::Bool));
        a.unbind();
        let fire = Rc::new(RefCell::new(ActionState::new("Fire", ValueKind::Float)));
        fire.borrow_mut().on_raw_value_delivered(RawValue::Float(0.75));
        a.rebind(Rc::clone(&fire));
        assert_eq!(a.as_float(), Ok(0.75));
        assert_eq!(a.name(), Ok(Some("Fire".to_string())));
    }
}
