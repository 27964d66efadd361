//! Free-fly observer movement.

use glam::Vec3;
use orrery_scene::Camera;
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Snapshot of the six fly keys for one update step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W
    pub forward: bool,
    /// S
    pub back: bool,
    /// A
    pub left: bool,
    /// D
    pub right: bool,
    /// Q
    pub up: bool,
    /// E
    pub down: bool,
}

impl MovementKeys {
    pub fn from_keyboard(keyboard: &KeyboardState) -> Self {
        Self {
            forward: keyboard.is_pressed(KeyCode::KeyW),
            back: keyboard.is_pressed(KeyCode::KeyS),
            left: keyboard.is_pressed(KeyCode::KeyA),
            right: keyboard.is_pressed(KeyCode::KeyD),
            up: keyboard.is_pressed(KeyCode::KeyQ),
            down: keyboard.is_pressed(KeyCode::KeyE),
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.up || self.down
    }
}

/// Move `camera` for one step of `dt` seconds.
///
/// Each held key contributes `speed * dt` along its axis independently, so
/// diagonal movement is faster than straight movement. Opposite keys cancel.
/// The camera's orientation is never changed.
pub fn apply_input(camera: &mut Camera, keys: &MovementKeys, dt: f32) {
    if !keys.any() {
        return;
    }

    let step = camera.speed * dt;
    let right = camera.right();
    let mut delta = Vec3::ZERO;

    if keys.forward {
        delta += camera.front;
    }
    if keys.back {
        delta -= camera.front;
    }
    if keys.left {
        delta -= right;
    }
    if keys.right {
        delta += right;
    }
    if keys.up {
        delta += camera.up;
    }
    if keys.down {
        delta -= camera.up;
    }

    camera.position += delta * step;
    tracing::trace!(position = ?camera.position, "camera moved");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_forward_moves_along_front() {
        let mut camera = Camera::default();
        let keys = MovementKeys {
            forward: true,
            ..Default::default()
        };
        apply_input(&mut camera, &keys, 0.5);
        // speed 3.0 * 0.5 s along -Z from z = 10.
        assert!((camera.position - Vec3::new(0.0, 0.0, 8.5)).length() < EPS);
    }

    #[test]
    fn test_strafe_uses_front_cross_up() {
        let mut camera = Camera::default();
        let keys = MovementKeys {
            right: true,
            ..Default::default()
        };
        apply_input(&mut camera, &keys, 1.0);
        assert!((camera.position - Vec3::new(3.0, 0.0, 10.0)).length() < EPS);

        let keys = MovementKeys {
            left: true,
            ..Default::default()
        };
        apply_input(&mut camera, &keys, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, 10.0)).length() < EPS);
    }

    #[test]
    fn test_q_up_e_down() {
        let mut camera = Camera::default();
        apply_input(
            &mut camera,
            &MovementKeys {
                up: true,
                ..Default::default()
            },
            2.0,
        );
        assert!((camera.position.y - 6.0).abs() < EPS);
        apply_input(
            &mut camera,
            &MovementKeys {
                down: true,
                ..Default::default()
            },
            2.0,
        );
        assert!(camera.position.y.abs() < EPS);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = Camera::default();
        let keys = MovementKeys {
            forward: true,
            back: true,
            left: true,
            right: true,
            ..Default::default()
        };
        apply_input(&mut camera, &keys, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, 10.0)).length() < EPS);
    }

    #[test]
    fn test_orientation_unchanged() {
        let mut camera = Camera::default();
        let before = (camera.front, camera.up);
        let keys = MovementKeys {
            forward: true,
            right: true,
            up: true,
            ..Default::default()
        };
        apply_input(&mut camera, &keys, 0.1);
        assert_eq!((camera.front, camera.up), before);
    }

    #[test]
    fn test_keys_from_keyboard() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyE));
        let keys = MovementKeys::from_keyboard(&kb);
        assert_eq!(
            keys,
            MovementKeys {
                forward: true,
                down: true,
                ..Default::default()
            }
        );
        assert!(!MovementKeys::default().any());
    }
}
