//! UV-sphere generation (stack and sector parameterization).
//!
//! Vertices are laid out stack-major: row `i` (latitude, north pole first)
//! holds `sector_count + 1` vertices, the last duplicating the first so the
//! texture seam gets its own `s = 1.0` column. The pole axis is +Z.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::vertex::Vertex;

/// Minimum number of latitude bands.
pub const MIN_STACKS: u32 = 1;
/// Minimum number of longitude slices.
pub const MIN_SECTORS: u32 = 3;

/// Generate a UV sphere centered on the origin.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] if `radius` is not a positive finite
/// number, `stack_count < 1`, `sector_count < 3`, or the resolution needs
/// more vertices or triangles than a `u32` index buffer can address.
pub fn generate_sphere(radius: f32, stack_count: u32, sector_count: u32) -> Result<Mesh, MeshError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::invalid(
            "radius",
            format!("must be positive and finite, got {radius}"),
        ));
    }
    if stack_count < MIN_STACKS {
        return Err(MeshError::invalid(
            "stack_count",
            format!("must be at least {MIN_STACKS}, got {stack_count}"),
        ));
    }
    if sector_count < MIN_SECTORS {
        return Err(MeshError::invalid(
            "sector_count",
            format!("must be at least {MIN_SECTORS}, got {sector_count}"),
        ));
    }

    let too_large = || {
        MeshError::invalid(
            "stack_count",
            format!("{stack_count}x{sector_count} sphere overflows u32 indices"),
        )
    };
    sphere_vertex_count(stack_count, sector_count).ok_or_else(too_large)?;
    let triangle_count = sphere_triangle_count(stack_count, sector_count).ok_or_else(too_large)?;

    let vertices = sphere_vertices(radius, stack_count, sector_count);
    let indices = sphere_indices(stack_count, sector_count, triangle_count);

    Ok(Mesh { vertices, indices })
}

/// Number of vertices a sphere with the given resolution produces, or `None`
/// if it does not fit in `u32`.
pub fn sphere_vertex_count(stack_count: u32, sector_count: u32) -> Option<u32> {
    stack_count
        .checked_add(1)?
        .checked_mul(sector_count.checked_add(1)?)
}

/// Number of triangles a sphere with the given resolution produces, or `None`
/// if it does not fit in `u32`.
///
/// Each polar band contributes `sector_count` triangles and every interior
/// band `2 * sector_count`. A single band has no pole to collapse against and
/// keeps both triangles per cell.
pub fn sphere_triangle_count(stack_count: u32, sector_count: u32) -> Option<u32> {
    let per_band = sector_count.checked_mul(2)?;
    if stack_count < 2 {
        return per_band.checked_mul(stack_count);
    }
    // Two polar bands at `sector_count` each equal one full band.
    per_band.checked_mul(stack_count - 1)
}

fn sphere_vertices(radius: f32, stack_count: u32, sector_count: u32) -> Vec<Vertex> {
    let stack_step = PI / stack_count as f32;
    let sector_step = TAU / sector_count as f32;

    let mut vertices = Vec::with_capacity((stack_count as usize + 1) * (sector_count as usize + 1));

    for i in 0..=stack_count {
        // +90° at the north pole down to -90° at the south pole.
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();
        let t = i as f32 / stack_count as f32;

        for j in 0..=sector_count {
            let sector_angle = j as f32 * sector_step;
            vertices.push(Vertex {
                position: [xy * sector_angle.cos(), xy * sector_angle.sin(), z],
                tex_coords: [j as f32 / sector_count as f32, t],
            });
        }
    }

    vertices
}

/// Callers have checked that the vertex count fits in `u32`.
fn sphere_indices(stack_count: u32, sector_count: u32, triangle_count: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(triangle_count as usize * 3);
    let polar = stack_count > 1;

    for i in 0..stack_count {
        let mut k1 = i * (sector_count + 1);
        let mut k2 = k1 + sector_count + 1;

        for _ in 0..sector_count {
            // Row 0 is the north pole: k1 and k1 + 1 coincide there.
            if !(polar && i == 0) {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            // The last row is the south pole: k2 and k2 + 1 coincide there.
            if !(polar && i == stack_count - 1) {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    indices
}
