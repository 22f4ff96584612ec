use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

use actionstate_common::RawValue;
use actionstate_host::ActionObserver;
use actionstate_input::{ActionChange, ChangePhase};

/// Logs input activity and tracks which actions are currently active.
///
/// Subscribe it to an [`InputHost`](actionstate_host::InputHost) (it only sees
/// changes that passed the host's change filter). Disabled debuggers ignore
/// everything.
#[derive(Debug, Default)]
pub struct InputDebugger {
    enabled: bool,
    last_values: HashMap<Rc<str>, RawValue>,
    /// Active actions in the order they became active.
    active: Vec<Rc<str>>,
    buffer: String,
}

impl InputDebugger {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_input_activity(&mut self, change: &ActionChange) {
        if !self.enabled {
            return;
        }

        self.buffer.clear();
        let phase = match change.phase {
            ChangePhase::Performed => {
                if !self.active.iter().any(|n| *n == change.name) {
                    self.active.push(Rc::clone(&change.name));
                }
                "Performed"
            }
            ChangePhase::Canceled => {
                self.active.retain(|n| *n != change.name);
                "Canceled"
            }
        };
        let _ = write!(self.buffer, "[input] {} = {} ({phase})", change.name, change.value);
        tracing::info!("{}", self.buffer);

        match self.last_values.get_mut(&*change.name) {
            Some(slot) => *slot = change.value,
            None => {
                self.last_values.insert(Rc::clone(&change.name), change.value);
            }
        }
    }

    /// Names of active actions, oldest first.
    pub fn active_inputs(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|n| &**n)
    }

    pub fn last_value(&self, name: &str) -> Option<RawValue> {
        self.last_values.get(name).copied()
    }

    /// Multi-line listing of active inputs, empty when disabled or idle.
    pub fn generate_debug_text(&mut self) -> &str {
        self.buffer.clear();
        if !self.enabled || self.active.is_empty() {
            return &self.buffer;
        }
        self.buffer.push_str("-- ACTIVE INPUTS --\n");
        for name in &self.active {
            self.buffer.push_str(name);
            if let Some(value) = self.last_values.get(name) {
                let _ = write!(self.buffer, ": {value}");
            }
            self.buffer.push('\n');
        }
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.last_values.clear();
        self.active.clear();
        self.buffer.clear();
    }
}

impl ActionObserver for InputDebugger {
    fn on_action_changed(&mut self, change: &ActionChange) {
        self.log_input_activity(change);
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
    fn disabled_debugger_ignores_activity() {
        let mut d = InputDebugger::default();
        d.log_input_activity(&change("Jump", ChangePhase::Performed, RawValue::Bool(true)));
        assert_eq!(d.active_inputs().count(), 0);
        assert_eq!(d.generate_debug_text(), "");
    }

    #[test]
    fn tracks_active_inputs_in_order() {
        let mut d = InputDebugger::new(true);
        d.log_input_activity(&change("Move", ChangePhase::Performed, RawValue::Vector2(Vec2::new(0.5, 0.0))));
        d.log_input_activity(&change("Jump", ChangePhase::Performed, RawValue::Bool(true)));
        d.log_input_activity(&change("Move", ChangePhase::Performed, RawValue::Vector2(Vec2::new(1.0, 0.0))));
        assert_eq!(d.active_inputs().collect::<Vec<_>>(), ["Move", "Jump"]);
        assert_eq!(
            d.generate_debug_text(),
            "-- ACTIVE INPUTS --\nMove: (1.00, 0.00)\nJump: true\n"
        );
    }

    #[test]
    fn cancel_removes_active_input() {
        let mut d = InputDebugger::new(true);
        d.log_input_activity(&change("Jump", ChangePhase::Performed, RawValue::Bool(true)));
        d.log_input_activity(&change("Jump", ChangePhase::Canceled, RawValue::Bool(false)));
        assert_eq!(d.active_inputs().count(), 0);
        assert_eq!(d.last_value("Jump"), Some(RawValue::Bool(false)));
        assert_eq!(d.generate_debug_text(), "");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut d = InputDebugger::new(true);
        d.log_input_activity(&change("Fire", ChangePhase::Performed, RawValue::Float(0.8)));
        d.clear();
        assert!(d.last_value("Fire").is_none());
        assert_eq!(d.active_inputs().count(), 0);
    }
}
