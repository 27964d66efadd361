//! CPU-side indexed triangle mesh.

use crate::vertex::Vertex;

/// An indexed triangle list, built once and uploaded as static GPU buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data in generation order.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Whether every index references an existing vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }
}
