//! Change records produced by source callbacks and the policy that decides
//! which of them are worth dispatching.

use std::collections::HashMap;
use std::rc::Rc;

use actionstate_common::RawValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePhase {
    /// A value was delivered.
    Performed,
    /// The action returned to rest.
    Canceled,
}

/// One delivery or clear observed on an action, with the value after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionChange {
    pub name: Rc<str>,
    pub phase: ChangePhase,
    pub value: RawValue,
}

/// Suppresses jitter: only changes that differ meaningfully from the last
/// accepted change for the same action pass.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    threshold: f32,
    last: HashMap<Rc<str>, (ChangePhase, RawValue)>,
}

impl ChangeFilter {
    pub const DEFAULT_THRESHOLD: f32 = 0.1;

    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether `change` would pass, without recording it.
    pub fn is_significant(&self, change: &ActionChange) -> bool {
        match self.last.get(&*change.name) {
            None => true,
            Some((phase, value)) => {
                *phase != change.phase || value_moved(value, &change.value, self.threshold)
            }
        }
    }

    /// Test `change` and remember it if it passes.
    pub fn accept(&mut self, change: &ActionChange) -> bool {
        if !self.is_significant(change) {
            return false;
        }
        match self.last.get_mut(&*change.name) {
            Some(slot) => *slot = (change.phase, change.value),
            None => {
                self.last
                    .insert(Rc::clone(&change.name), (change.phase, change.value));
            }
        }
        true
    }

    pub fn forget(&mut self, name: &str) {
        self.last.remove(name);
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

fn value_moved(prev: &RawValue, next: &RawValue, threshold: f32) -> bool {
    match (prev, next) {
        (RawValue::Float(a), RawValue::Float(b)) => (a - b).abs() > threshold,
        (RawValue::Vector2(a), RawValue::Vector2(b)) => a.distance(*b) > threshold,
        (RawValue::Vector3(a), RawValue::Vector3(b)) => a.distance(*b) > threshold,
        _ => prev != next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn change(name: &str, phase: ChangePhase, value: RawValue) -> ActionChange {
        ActionChange {
            name: Rc::from(name),
            phase,
            value,
        }
    }

    #[test]
    fn first_change_always_passes() {
        let mut f = ChangeFilter::default();
        assert!(f.accept(&change("Jump", ChangePhase::Performed, RawValue::Bool(true))));
    }

    #[test]
    fn small_vector_moves_are_suppressed() {
        let mut f = ChangeFilter::default();
        let perf = ChangePhase::Performed;
        assert!(f.accept(&change("Move", perf, RawValue::Vector2(Vec2::new(0.5, 0.0)))));
        assert!(!f.accept(&change("Move", perf, RawValue::Vector2(Vec2::new(0.55, 0.0)))));
        assert!(f.accept(&change("Move", perf, RawValue::Vector2(Vec2::new(0.7, 0.0)))));
    }

    #[test]
    fn suppressed_change_does_not_move_baseline() {
        let mut f = ChangeFilter::default();
        let perf = ChangePhase::Performed;
        assert!(f.accept(&change("Axis", perf, RawValue::Float(0.50))));
        assert!(!f.accept(&change("Axis", perf, RawValue::Float(0.58))));
        assert!(!f.accept(&change("Axis", perf, RawValue::Float(0.59))));
        assert!(f.accept(&change("Axis", perf, RawValue::Float(0.65))));
    }

    #[test]
    fn phase_change_always_passes() {
        let mut f = ChangeFilter::default();
        assert!(f.accept(&change("Axis", ChangePhase::Performed, RawValue::Float(0.05))));
        assert!(f.accept(&change("Axis", ChangePhase::Canceled, RawValue::Float(0.0))));
    }

    #[test]
    fn discrete_values_compare_exactly() {
        let mut f = ChangeFilter::default();
        let perf = ChangePhase::Performed;
        assert!(f.accept(&change("Slot", perf, RawValue::Int(1))));
        assert!(!f.accept(&change("Slot", perf, RawValue::Int(1))));
        assert!(f.accept(&change("Slot", perf, RawValue::Int(2))));
    }

    #[test]
    fn actions_are_tracked_independently() {
        let mut f = ChangeFilter::default();
        let perf = ChangePhase::Performed;
        assert!(f.accept(&change("A", perf, RawValue::Bool(true))));
        assert!(f.accept(&change("B", perf, RawValue::Bool(true))));
        f.forget("A");
        assert!(f.accept(&change("A", perf, RawValue::Bool(true))));
        assert!(!f.accept(&change("B", perf, RawValue::Bool(true))));
    }
}
