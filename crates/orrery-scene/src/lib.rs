//! Hierarchical orbital transforms: body descriptors, the validated body graph,
//! per-frame model matrices, and the observer camera.

pub mod body;
pub mod camera;
pub mod error;
pub mod system;

pub use body::{BodyDescriptor, BodyId, OrbitingBody, RingDescriptor};
pub use camera::{Camera, Projection};
pub use error::ConfigurationError;
pub use system::SolarSystem;
