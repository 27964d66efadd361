//! Orbital body descriptors and their local transform.

use glam::{Mat4, Vec3};

/// Index of a body inside a [`SolarSystem`](crate::SolarSystem).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

impl BodyId {
    /// The position of this body in the table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A flat ring around a body, in units of the body's unit sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingDescriptor {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl RingDescriptor {
    /// Finite radii with `0 <= inner < outer`.
    pub fn is_valid(&self) -> bool {
        self.inner_radius.is_finite()
            && self.outer_radius.is_finite()
            && self.inner_radius >= 0.0
            && self.outer_radius > self.inner_radius
    }
}

/// Static parameters of one body as declared in the body table.
///
/// Parents are referenced by name; [`SolarSystem::new`](crate::SolarSystem::new)
/// resolves them into [`BodyId`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDescriptor {
    pub name: String,
    /// Texture file, relative to the texture directory.
    pub texture: Option<String>,
    /// Orbit angular speed in radians per second.
    pub orbit_speed: f32,
    /// Distance from the parent (or world origin) along the local X axis.
    pub orbit_radius: f32,
    pub scale: Vec3,
    pub parent: Option<String>,
    pub ring: Option<RingDescriptor>,
}

impl BodyDescriptor {
    /// A root body with no texture, ring or parent.
    pub fn new(name: impl Into<String>, orbit_speed: f32, orbit_radius: f32, scale: f32) -> Self {
        Self {
            name: name.into(),
            texture: None,
            orbit_speed,
            orbit_radius,
            scale: Vec3::splat(scale),
            parent: None,
            ring: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn with_ring(mut self, inner_radius: f32, outer_radius: f32) -> Self {
        self.ring = Some(RingDescriptor {
            inner_radius,
            outer_radius,
        });
        self
    }
}

/// A validated body with its parent resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitingBody {
    pub name: String,
    pub texture: Option<String>,
    pub orbit_speed: f32,
    pub orbit_radius: f32,
    pub scale: Vec3,
    pub parent: Option<BodyId>,
    pub ring: Option<RingDescriptor>,
}

impl OrbitingBody {
    /// Orbit angle in radians at `time` seconds.
    pub fn orbit_angle(&self, time: f32) -> f32 {
        self.orbit_speed * time
    }

    /// The body's own transform relative to its parent frame.
    ///
    /// Applied in the order rotate, translate, scale: the Y rotation sweeps
    /// the translated position around the parent, and scaling last keeps the
    /// orbit radius independent of the body's size.
    pub fn local_transform(&self, time: f32) -> Mat4 {
        Mat4::from_rotation_y(self.orbit_angle(time))
            * Mat4::from_translation(Vec3::new(self.orbit_radius, 0.0, 0.0))
            * Mat4::from_scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn body(speed: f32, radius: f32, scale: f32) -> OrbitingBody {
        OrbitingBody {
            name: "test".to_string(),
            texture: None,
            orbit_speed: speed,
            orbit_radius: radius,
            scale: Vec3::splat(scale),
            parent: None,
            ring: None,
        }
    }

    #[test]
    fn test_static_body_is_pure_translation() {
        let m = body(0.0, 3.0, 1.0).local_transform(12.5);
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
        assert!(m.abs_diff_eq(Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)), 1e-6));
    }

    #[test]
    fn test_scale_does_not_change_orbit_radius() {
        let m = body(0.0, 4.0, 0.3).local_transform(0.0);
        let center = m.transform_point3(Vec3::ZERO);
        assert!((center.x - 4.0).abs() < 1e-6);
        // A surface point of the unit sphere lands 0.3 away from the center.
        let edge = m.transform_point3(Vec3::X);
        assert!((edge.x - 4.3).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_sweeps_translated_position() {
        let b = body(1.0, 2.0, 1.0);
        let quarter = b.local_transform(PI / 2.0).transform_point3(Vec3::ZERO);
        // Right-handed rotation about +Y carries +X to -Z.
        assert!((quarter - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!((quarter.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_translate_before_rotate_would_not_sweep() {
        // The reversed order leaves the center fixed: documents why the
        // order in local_transform matters.
        let reversed = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)) * Mat4::from_rotation_y(1.0);
        let p = reversed.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);

        let proper = body(1.0, 2.0, 1.0).local_transform(1.0).transform_point3(Vec3::ZERO);
        assert!((proper - p).length() > 0.5);
    }

    #[test]
    fn test_descriptor_builders() {
        let d = BodyDescriptor::new("Saturn", 0.3, 6.0, 0.4)
            .with_texture("saturn_texture.jpg")
            .with_ring(1.2, 2.0)
            .with_parent("Sun");
        assert_eq!(d.scale, Vec3::splat(0.4));
        assert_eq!(d.texture.as_deref(), Some("saturn_texture.jpg"));
        assert_eq!(d.parent.as_deref(), Some("Sun"));
        assert_eq!(
            d.ring,
            Some(RingDescriptor {
                inner_radius: 1.2,
                outer_radius: 2.0
            })
        );
    }
}
