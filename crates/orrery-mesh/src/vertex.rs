//! Vertex format shared by every body mesh.
//!
//! | Location | Offset | Format    | Field        |
//! |----------|--------|-----------|--------------|
//! | 0        | 0      | Float32x3 | `position`   |
//! | 1        | 12     | Float32x2 | `tex_coords` |

use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A mesh vertex: object-space position and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Attributes for [`Vertex`], in shader location order.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: mem::size_of::<[f32; 3]>() as u64,
        shader_location: 1,
    },
];

/// The vertex buffer layout used by the body pipeline.
pub const VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<Vertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &VERTEX_ATTRIBUTES,
};

impl Vertex {
    /// Get the vertex buffer layout for this vertex type.
    pub fn layout() -> VertexBufferLayout<'static> {
        VERTEX_LAYOUT
    }
}

// Five tightly packed floats per vertex.
const _: () = assert!(
    mem::size_of::<Vertex>() == 5 * mem::size_of::<f32>(),
    "Vertex size changed — update VERTEX_LAYOUT"
);
const _: () = assert!(VERTEX_ATTRIBUTES[1].offset == 12);
