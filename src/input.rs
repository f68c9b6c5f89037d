//! Discrete press/release input
//!
//! Platform layers translate device events into `InputEvent`s and queue
//! them on a `TickInput`; the session drains the queue once per tick.

use serde::{Deserialize, Serialize};

use crate::sim::Intents;

/// Bindable player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Halve movement speed while held
    Slow,
    /// Edge-triggered on press
    Restart,
}

impl Action {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            "Shift" => Some(Self::Slow),
            " " | "r" | "R" => Some(Self::Restart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: Action,
    pub pressed: bool,
}

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
    /// End the loop
    pub quit: bool,
}

impl TickInput {
    pub fn press(&mut self, action: Action) {
        self.events.push(InputEvent {
            action,
            pressed: true,
        });
    }

    pub fn release(&mut self, action: Action) {
        self.events.push(InputEvent {
            action,
            pressed: false,
        });
    }

    /// Was restart pressed this tick?
    pub fn restart_requested(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.action == Action::Restart && e.pressed)
    }

    /// Drop queued events after a tick consumed them
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Intents {
    /// Press sets a held flag, release clears it. Restart is not a held flag.
    pub fn apply(&mut self, event: InputEvent) {
        let flag = match event.action {
            Action::Up => &mut self.up,
            Action::Down => &mut self.down,
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Slow => &mut self.slow,
            Action::Restart => return,
        };
        *flag = event.pressed;
    }
}
