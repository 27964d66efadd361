//! Keyboard state and free-fly camera movement.

pub mod fly;
pub mod keyboard;

pub use fly::{MovementKeys, apply_input};
pub use keyboard::{KeyboardState, RawKeyEvent};
