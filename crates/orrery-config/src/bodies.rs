//! The configurable body table.

use serde::{Deserialize, Serialize};

/// One entry of the body table.
///
/// `scale` is a uniform factor applied to the unit sphere. Orbit speed is in
/// radians per second of simulation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    /// Texture file name, resolved against `render.texture_dir`.
    pub texture: Option<String>,
    pub orbit_speed: f32,
    pub orbit_radius: f32,
    pub scale: f32,
    /// Name of the body this one orbits, if any.
    pub parent: Option<String>,
    pub ring: Option<RingConfig>,
}

/// Ring extent in units of the body's unit sphere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RingConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            texture: None,
            orbit_speed: 0.0,
            orbit_radius: 0.0,
            scale: 1.0,
            parent: None,
            ring: None,
        }
    }
}

fn body(name: &str, texture: &str, orbit_speed: f32, orbit_radius: f32, scale: f32) -> BodyConfig {
    BodyConfig {
        name: name.to_string(),
        texture: Some(texture.to_string()),
        orbit_speed,
        orbit_radius,
        scale,
        parent: None,
        ring: None,
    }
}

/// The Sun, the eight planets and Earth's moon.
pub fn default_bodies() -> Vec<BodyConfig> {
    vec![
        body("Sun", "sun_9.jpg", 0.0, 0.0, 1.0),
        body("Mercury", "mercury_2.jpg", 4.0, 1.2, 0.2),
        body("Venus", "venus_texture.jpg", 1.5, 2.0, 0.3),
        body("Earth", "earth_texture.jpg", 1.0, 3.0, 0.4),
        BodyConfig {
            parent: Some("Earth".to_string()),
            ..body("Moon", "moon_texture.jpg", 2.0, 1.5, 0.3)
        },
        body("Mars", "mars_texture.jpg", 0.8, 4.0, 0.3),
        body("Jupiter", "jupiter_texture.jpg", 0.4, 5.0, 0.7),
        BodyConfig {
            ring: Some(RingConfig {
                inner_radius: 1.2,
                outer_radius: 2.0,
            }),
            ..body("Saturn", "saturn_texture.jpg", 0.3, 6.0, 0.4)
        },
        body("Uranus", "uranus_2.jpg", 0.2, 7.0, 0.35),
        body("Neptune", "neptune_texture.jpg", 0.1, 8.0, 0.3),
    ]
}
