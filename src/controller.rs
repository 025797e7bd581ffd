//! Per-tick input snapshot.
//!
//! The simulation never sees key events. Once per tick the front end samples a
//! `ControllerSource`, which turns whatever keys are currently held into a
//! normalized `Controller`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Normalized input for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controller {
    /// -1 left, 1 right
    pub move_x: i8,
    /// -1 up, 1 down (screen space)
    pub move_y: i8,
    pub action: bool,
}

impl Controller {
    /// Build a snapshot, treating any axis value outside {-1, 0, 1} as no input.
    pub fn new(move_x: i32, move_y: i32, action: bool) -> Self {
        Self {
            move_x: sanitize_axis(move_x),
            move_y: sanitize_axis(move_y),
            action,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.move_x != 0 && self.move_y != 0
    }
}

fn sanitize_axis(value: i32) -> i8 {
    match value {
        -1 => -1,
        1 => 1,
        _ => 0,
    }
}

/// Anything that can produce one input snapshot per tick.
pub trait ControllerSource {
    fn sample(&mut self) -> Controller;
}

/// Always reports the same snapshot. Useful for scripted runs and tests.
impl ControllerSource for Controller {
    fn sample(&mut self) -> Controller {
        *self
    }
}

// ── Key translation ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Sets `action` while held
    Action,
    /// Adds `modifier` to an axis while held
    Axis { axis: Axis, modifier: i8 },
}

/// Raw key → controller mapping.
#[derive(Clone, Debug)]
pub struct KeyBindings<K> {
    bindings: HashMap<K, Binding>,
}

impl<K: Eq + Hash> Default for KeyBindings<K> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> KeyBindings<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: K, binding: Binding) -> Self {
        self.bindings.insert(key, binding);
        self
    }

    pub fn binding(&self, key: &K) -> Option<Binding> {
        self.bindings.get(key).copied()
    }

    /// Translate the set of held keys into a snapshot.
    ///
    /// Axis contributions are summed, so opposite keys on one axis cancel out,
    /// and the total is clamped to [-1, 1].
    pub fn poll(&self, held: &HashSet<K>) -> Controller {
        let mut x: i32 = 0;
        let mut y: i32 = 0;
        let mut action = false;

        for key in held {
            match self.bindings.get(key) {
                Some(Binding::Action) => action = true,
                Some(Binding::Axis { axis: Axis::X, modifier }) => x += *modifier as i32,
                Some(Binding::Axis { axis: Axis::Y, modifier }) => y += *modifier as i32,
                None => {}
            }
        }

        Controller::new(x.clamp(-1, 1), y.clamp(-1, 1), action)
    }
}
