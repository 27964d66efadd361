//! Building the scene from the loaded configuration.

use std::path::PathBuf;

use glam::Vec3;
use orrery_config::{BodyConfig, Config};
use orrery_scene::{BodyDescriptor, Camera, ConfigurationError, Projection, SolarSystem};

/// Convert one body table entry.
pub fn body_descriptor(body: &BodyConfig) -> BodyDescriptor {
    let mut descriptor =
        BodyDescriptor::new(&body.name, body.orbit_speed, body.orbit_radius, body.scale);
    if let Some(parent) = &body.parent {
        descriptor = descriptor.with_parent(parent);
    }
    if let Some(texture) = &body.texture {
        descriptor = descriptor.with_texture(texture);
    }
    if let Some(ring) = body.ring {
        descriptor = descriptor.with_ring(ring.inner_radius, ring.outer_radius);
    }
    descriptor
}

/// Validate the body table and build the hierarchy.
pub fn build_system(config: &Config) -> Result<SolarSystem, ConfigurationError> {
    SolarSystem::new(config.bodies.iter().map(body_descriptor).collect())
}

/// Initial camera from the camera and render sections.
pub fn build_camera(config: &Config) -> Camera {
    let camera = &config.camera;
    let mut result = Camera::new(
        Vec3::from_array(camera.position),
        Vec3::from_array(camera.front).normalize_or(Vec3::NEG_Z),
        Vec3::from_array(camera.up).normalize_or(Vec3::Y),
        camera.speed,
    );
    result.projection = Projection {
        fov_y: config.render.fov_y_degrees.to_radians(),
        aspect_ratio: result.projection.aspect_ratio,
        near: config.render.near,
        far: config.render.far,
    };
    result
        .projection
        .set_aspect_ratio(config.window.width as f32, config.window.height as f32);
    result
}

/// Full path of a body's texture file.
pub fn texture_path(config: &Config, texture: &str) -> PathBuf {
    config.render.texture_dir.join(texture)
}
