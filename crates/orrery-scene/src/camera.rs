//! Free-flying observer camera.

use glam::{Mat4, Vec3};

/// A camera described by a position and a front/up basis.
///
/// `front` is kept as given; callers that rotate it are responsible for
/// keeping it normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Movement speed in world units per second.
    pub speed: f32,
    pub projection: Projection,
}

/// Perspective parameters. Depth is reverse-Z: near maps to 1, far to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        // Near and far swapped for reverse-Z.
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Update the aspect ratio, ignoring degenerate sizes (minimized windows).
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45f32.to_radians(),
            aspect_ratio: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, front: Vec3, up: Vec3, speed: f32) -> Self {
        Self {
            position,
            front,
            up,
            speed,
            projection: Projection::default(),
        }
    }

    /// Look from `position` towards `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Unit vector to the camera's right, `normalize(front x up)`.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize_or_zero()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::Y, 3.0)
    }
}
