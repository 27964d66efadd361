//! Textured body pipeline.
//!
//! | Group | Binding | Contents                              | Updated       |
//! |-------|---------|---------------------------------------|---------------|
//! | 0     | 0       | [`CameraUniform`] (view, projection)  | once a frame  |
//! | 1     | 0       | [`ModelUniform`]                      | per body      |
//! | 2     | 0, 1    | body texture + sampler                | at startup    |
//!
//! Each body owns its own model buffer so all writes for a frame can be
//! queued before the single render pass is recorded.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_mesh::{VERTEX_ATTRIBUTES, Vertex};

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;

/// Name the body shader is registered under (and `<shader_dir>/orrery.wgsl`).
pub const BODY_SHADER_NAME: &str = "orrery";

/// WGSL for the body pipeline, embedded at build time.
pub const BODY_SHADER_SOURCE: &str = include_str!("../shaders/orrery.wgsl");

/// Camera matrices, column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

/// One body's world transform.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for ModelUniform {
    fn from(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Per-body group-1 resources.
pub struct ModelBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ModelBinding {
    pub fn write(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ModelUniform::from(model)));
    }
}

/// Shader locations consumed by the body vertex stage.
pub fn vertex_locations() -> Vec<u32> {
    VERTEX_ATTRIBUTES
        .iter()
        .map(|attribute| attribute.shader_location)
        .collect()
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

/// Depth-tested, unculled, opaque pipeline drawing textured body meshes.
pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// `texture_bind_group_layout` is the group-2 layout from the texture manager.
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let camera_bind_group_layout = uniform_layout(
            device,
            "body-camera-bind-group-layout",
            std::mem::size_of::<CameraUniform>(),
        );
        let model_bind_group_layout = uniform_layout(
            device,
            "body-model-bind-group-layout",
            std::mem::size_of::<ModelUniform>(),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(crate::shader::VERTEX_ENTRY),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Rings are single-sided geometry seen from both sides.
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(crate::shader::FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            model_bind_group_layout,
        }
    }

    /// Camera bind group over an existing uniform buffer.
    pub fn camera_bind_group(&self, device: &wgpu::Device, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("body-camera-bind-group"),
            layout: &self.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    /// Allocate a model buffer and bind group for one body.
    pub fn create_model_binding(&self, device: &wgpu::Device, label: &str) -> ModelBinding {
        let buffer = BufferAllocator::new(device)
            .create_uniform(&format!("{label}-model"), &ModelUniform::from(Mat4::IDENTITY));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-model-bind-group")),
            layout: &self.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        ModelBinding { buffer, bind_group }
    }
}

/// Record one textured mesh draw.
pub fn draw_body(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &BodyPipeline,
    camera_bind_group: &wgpu::BindGroup,
    model: &ModelBinding,
    texture_bind_group: &wgpu::BindGroup,
    mesh: &MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, &model.bind_group, &[]);
    render_pass.set_bind_group(2, texture_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}
