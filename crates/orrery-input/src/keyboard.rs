//! Frame-coherent keyboard state.
//!
//! Physical key codes are used so the fly keys sit in the same place on
//! every keyboard layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, constructible without a window.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Held keys plus the transitions seen since the last
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    pressed_this_frame: HashSet<PhysicalKey>,
    released_this_frame: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit key event.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Feed a raw event. OS key repeats are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.key) {
                    self.pressed_this_frame.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.key) {
                    self.released_this_frame.insert(event.key);
                }
            }
        }
    }

    /// Release every held key, e.g. when the window loses focus and the
    /// matching release events will never arrive.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!("Releasing {} held keys", self.held.len());
        }
        self.released_this_frame.extend(self.held.drain());
    }

    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.held.contains(&PhysicalKey::Code(code))
    }

    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.pressed_this_frame.contains(&PhysicalKey::Code(code))
    }

    #[must_use]
    pub fn just_released(&self, code: KeyCode) -> bool {
        self.released_this_frame.contains(&PhysicalKey::Code(code))
    }

    /// Forget this frame's transitions; held keys stay held.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }
}
