//! Procedural body geometry: UV spheres, planetary rings, and the shared vertex format.

pub mod error;
pub mod mesh;
pub mod ring;
pub mod sphere;
pub mod vertex;

pub use error::MeshError;
pub use mesh::Mesh;
pub use ring::generate_ring;
pub use sphere::{MIN_SECTORS, MIN_STACKS, generate_sphere, sphere_triangle_count, sphere_vertex_count};
pub use vertex::{VERTEX_ATTRIBUTES, VERTEX_LAYOUT, Vertex};
