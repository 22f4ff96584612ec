use std::rc::Rc;

use actionstate_common::{RawValue, ValueKind};
use glam::{Vec2, Vec3};

/// Buffered state of a single registered action.
///
/// Source callbacks write `current`/`previous` and the pending edge flags at any
/// point in a frame. [`StateCache::tick`](crate::StateCache::tick) then promotes
/// the pending flags exactly once, so readers see an edge for one whole tick.
#[derive(Debug, Clone)]
pub struct ActionState {
    name: Rc<str>,
    declared_kind: ValueKind,
    /// Declared kind, or the kind of the first delivered value when declared `Unknown`.
    kind: ValueKind,
    current: RawValue,
    previous: RawValue,
    pressed_this_frame: bool,
    released_this_frame: bool,
    pending_pressed: bool,
    pending_released: bool,
}

impl ActionState {
    /// Create a state resting at the zero value of `kind`.
    pub fn new(name: impl Into<Rc<str>>, kind: ValueKind) -> Self {
        let zero = kind.zero_value();
        Self {
            name: name.into(),
            declared_kind: kind,
            kind,
            current: zero,
            previous: zero,
            pressed_this_frame: false,
            released_this_frame: false,
            pending_pressed: false,
            pending_released: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind declared at registration.
    pub fn declared_kind(&self) -> ValueKind {
        self.declared_kind
    }

    /// The effective kind; `Unknown` until the first delivery for undeclared actions.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// A new value arrived from the source.
    pub fn on_raw_value_delivered(&mut self, value: RawValue) {
        if self.kind == ValueKind::Unknown {
            self.kind = value.kind();
        }
        self.previous = self.current;
        self.current = value;
        if self.current.is_active() && !self.previous.is_active() {
            self.pending_pressed = true;
        }
    }

    /// The source reports the action went back to rest.
    pub fn on_raw_value_cleared(&mut self) {
        self.previous = self.current;
        self.current = self.kind.zero_value();
        if !self.current.is_active() && self.previous.is_active() {
            self.pending_released = true;
        }
    }

    /// Promote buffered edges to the visible per-tick flags and reset the buffer.
    pub(crate) fn resolve_tick(&mut self) {
        self.pressed_this_frame = self.pending_pressed;
        self.released_this_frame = self.pending_released;
        self.pending_pressed = false;
        self.pending_released = false;
    }

    pub fn raw_value(&self) -> RawValue {
        self.current
    }

    pub fn previous_value(&self) -> RawValue {
        self.previous
    }

    /// Became active during the last resolved tick.
    pub fn pressed_this_frame(&self) -> bool {
        self.pressed_this_frame
    }

    /// Became inactive during the last resolved tick.
    pub fn released_this_frame(&self) -> bool {
        self.released_this_frame
    }

    /// Currently active, independent of ticks.
    pub fn is_held(&self) -> bool {
        self.current.is_active()
    }

    pub fn as_bool(&self) -> bool {
        self.current.as_bool()
    }

    pub fn as_int(&self) -> i32 {
        self.current.as_int()
    }

    pub fn as_float(&self) -> f32 {
        self.current.as_float()
    }

    pub fn as_vec2(&self) -> Vec2 {
        self.current.as_vec2()
    }

    pub fn as_vec3(&self) -> Vec3 {
        self.current.as_vec3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_value() {
        let s = ActionState::new("Move", ValueKind::Vector2);
        assert_eq!(s.raw_value(), RawValue::Vector2(Vec2::ZERO));
        assert_eq!(s.previous_value(), RawValue::Vector2(Vec2::ZERO));
        assert!(!s.pressed_this_frame());
        assert!(!s.released_this_frame());
        assert!(!s.is_held());
    }

    #[test]
    fn press_is_buffered_until_resolve() {
        let mut s = ActionState::new("Jump", ValueKind::Bool);
        s.on_raw_value_delivered(RawValue::Bool(true));
        assert!(s.is_held());
        assert!(!s.pressed_this_frame());

        s.resolve_tick();
        assert!(s.pressed_this_frame());

        s.resolve_tick();
        assert!(!s.pressed_this_frame());
        assert!(s.is_held());
    }

    #[test]
    fn repeated_deliveries_count_one_press() {
        let mut s = ActionState::new("Throttle", ValueKind::Float);
        s.on_raw_value_delivered(RawValue::Float(0.5));
        s.on_raw_value_delivered(RawValue::Float(0.7));
        s.on_raw_value_delivered(RawValue::Float(0.9));
        s.resolve_tick();
        assert!(s.pressed_this_frame());
        assert_eq!(s.previous_value(), RawValue::Float(0.7));
    }

    #[test]
    fn press_survives_dip_within_tick() {
        let mut s = ActionState::new("Throttle", ValueKind::Float);
        s.on_raw_value_delivered(RawValue::Float(0.5));
        s.on_raw_value_delivered(RawValue::Float(0.0));
        s.resolve_tick();
        assert!(s.pressed_this_frame());
        assert!(!s.is_held());
    }

    #[test]
    fn release_visible_for_one_tick() {
        let mut s = ActionState::new("Fire", ValueKind::Bool);
        s.on_raw_value_delivered(RawValue::Bool(true));
        s.resolve_tick();
        s.on_raw_value_cleared();
        s.resolve_tick();
        assert!(s.released_this_frame());
        assert!(!s.as_bool());
        s.resolve_tick();
        assert!(!s.released_this_frame());
    }

    #[test]
    fn clear_while_inactive_is_not_a_release() {
        let mut s = ActionState::new("Fire", ValueKind::Bool);
        s.on_raw_value_cleared();
        s.resolve_tick();
        assert!(!s.released_this_frame());
    }

    #[test]
    fn no_deliveries_no_edges() {
        let mut s = ActionState::new("Idle", ValueKind::Int);
        for _ in 0..3 {
            s.resolve_tick();
            assert!(!s.pressed_this_frame());
            assert!(!s.released_this_frame());
        }
    }

    #[test]
    fn below_threshold_vector_is_not_a_press() {
        let mut s = ActionState::new("Move", ValueKind::Vector2);
        s.on_raw_value_delivered(RawValue::Vector2(Vec2::new(0.05, 0.0)));
        assert!(!s.as_bool());
        s.resolve_tick();
        assert!(!s.pressed_this_frame());

        s.on_raw_value_delivered(RawValue::Vector2(Vec2::new(0.5, 0.0)));
        assert!(s.as_bool());
        s.resolve_tick();
        assert!(s.pressed_this_frame());
    }

    #[test]
    fn unknown_kind_inferred_from_first_delivery() {
        let mut s = ActionState::new("Look", ValueKind::Unknown);
        assert_eq!(s.raw_value(), RawValue::Bool(false));
        s.on_raw_value_delivered(RawValue::Vector2(Vec2::new(1.0, 0.0)));
        assert_eq!(s.kind(), ValueKind::Vector2);
        assert_eq!(s.declared_kind(), ValueKind::Unknown);
        s.on_raw_value_cleared();
        assert_eq!(s.raw_value(), RawValue::Vector2(Vec2::ZERO));
    }

    #[test]
    fn typed_reads_coerce_current() {
        let mut s = ActionState::new("Zoom", ValueKind::Float);
        s.on_raw_value_delivered(RawValue::Float(2.6));
        assert_eq!(s.as_int(), 3);
        assert_eq!(s.as_vec2(), Vec2::new(2.6, 0.0));
        assert_eq!(s.as_vec3(), Vec3::new(2.6, 0.0, 0.0));
        assert!(s.as_bool());
        assert_eq!(s.as_float(), 2.6);
    }
}
