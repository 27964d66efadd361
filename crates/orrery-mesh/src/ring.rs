//! Flat annulus for planetary rings.
//!
//! The ring lies in the XY plane (the sphere's equator, perpendicular to its
//! +Z pole axis). Each sector step contributes an inner and an outer vertex;
//! `s` follows the angle and `t` is 0 on the inner edge and 1 on the outer.

use std::f32::consts::TAU;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::sphere::MIN_SECTORS;
use crate::vertex::Vertex;

/// Generate a ring between `inner_radius` and `outer_radius`.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] if `inner_radius` is negative,
/// `outer_radius <= inner_radius`, either radius is not finite, or
/// `sector_count < 3`, or `sector_count` needs more vertices than a `u32`
/// index buffer can address.
pub fn generate_ring(
    inner_radius: f32,
    outer_radius: f32,
    sector_count: u32,
) -> Result<Mesh, MeshError> {
    if !(inner_radius.is_finite() && inner_radius >= 0.0) {
        return Err(MeshError::invalid(
            "inner_radius",
            format!("must be non-negative and finite, got {inner_radius}"),
        ));
    }
    if !(outer_radius.is_finite() && outer_radius > inner_radius) {
        return Err(MeshError::invalid(
            "outer_radius",
            format!("must be finite and greater than {inner_radius}, got {outer_radius}"),
        ));
    }
    if sector_count < MIN_SECTORS {
        return Err(MeshError::invalid(
            "sector_count",
            format!("must be at least {MIN_SECTORS}, got {sector_count}"),
        ));
    }
    if sector_count.checked_add(1).and_then(|n| n.checked_mul(2)).is_none() {
        return Err(MeshError::invalid(
            "sector_count",
            format!("{sector_count} sectors overflow u32 indices"),
        ));
    }

    let sector_step = TAU / sector_count as f32;
    let mut vertices = Vec::with_capacity(2 * (sector_count as usize + 1));
    for j in 0..=sector_count {
        let angle = j as f32 * sector_step;
        let (sin, cos) = angle.sin_cos();
        let s = j as f32 / sector_count as f32;
        vertices.push(Vertex {
            position: [cos * inner_radius, sin * inner_radius, 0.0],
            tex_coords: [s, 0.0],
        });
        vertices.push(Vertex {
            position: [cos * outer_radius, sin * outer_radius, 0.0],
            tex_coords: [s, 1.0],
        });
    }

    let mut indices = Vec::with_capacity(6 * sector_count as usize);
    for j in 0..sector_count {
        let inner = 2 * j;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        indices.extend_from_slice(&[inner, outer, next_inner]);
        indices.extend_from_slice(&[next_inner, outer, next_outer]);
    }

    Ok(Mesh { vertices, indices })
}
