//! Static mesh and uniform buffer creation.

use bytemuck::Pod;
use orrery_mesh::Mesh;
use wgpu::util::DeviceExt;

/// A mesh uploaded once at startup.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Draw the whole index range once.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates GPU buffers on a device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a mesh's vertices and `u32` indices.
    pub fn create_mesh(&self, label: &str, mesh: &Mesh) -> MeshBuffer {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: mesh.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "Uploaded mesh '{label}': {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// A uniform buffer initialized with `value`, writable from the queue.
    pub fn create_uniform<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_sphere_upload_counts() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mesh = orrery_mesh::generate_sphere(1.0, 20, 20).unwrap();
        let buffer = BufferAllocator::new(&device).create_mesh("sphere", &mesh);
        assert_eq!(buffer.index_count as usize, mesh.indices.len());
        assert_eq!(buffer.vertex_buffer.size() as usize, mesh.vertex_bytes().len());
        assert_eq!(buffer.index_buffer.size() as usize, mesh.indices.len() * 4);
    }

    #[test]
    fn test_uniform_buffer_usage() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let buffer = BufferAllocator::new(&device).create_uniform("value", &[1.0f32; 16]);
        assert_eq!(buffer.size(), 64);
        assert!(buffer.usage().contains(wgpu::BufferUsages::UNIFORM));
        assert!(buffer.usage().contains(wgpu::BufferUsages::COPY_DST));
    }
}
