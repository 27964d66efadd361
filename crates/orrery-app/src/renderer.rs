//! GPU resources for drawing the solar system.
//!
//! Everything here is built once when the window appears: one shared sphere
//! mesh, one texture and model uniform per body, and a ring mesh for bodies
//! that declare one. Per frame only the uniforms change.

use std::sync::Arc;

use glam::Mat4;
use orrery_config::Config;
use orrery_mesh::{MeshError, generate_ring, generate_sphere};
use orrery_render::{
    BODY_SHADER_NAME, BODY_SHADER_SOURCE, BodyPipeline, BufferAllocator, CameraUniform,
    DepthBuffer, FrameEncoder, ManagedTexture, MeshBuffer, ModelBinding, RenderContext,
    RenderContextError, RenderPassBuilder, ShaderError, ShaderLibrary, SurfaceError,
    TextureManager, color_from_array, draw_body, init_render_context_blocking, vertex_locations,
};
use orrery_scene::{Camera, SolarSystem};
use thiserror::Error;
use tracing::{debug, info};
use winit::window::Window;

use crate::scene::texture_path;

/// Fatal errors while bringing up rendering.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("mesh generation failed: {0}")]
    Mesh(#[from] MeshError),
}

struct BodyDraw {
    model: ModelBinding,
    texture: Arc<ManagedTexture>,
    ring: Option<MeshBuffer>,
}

pub struct SceneRenderer {
    gpu: RenderContext,
    depth: DepthBuffer,
    pipeline: BodyPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sphere: MeshBuffer,
    bodies: Vec<BodyDraw>,
    clear_color: wgpu::Color,
    // Owns the texture cache and the shared sampler.
    _textures: TextureManager,
}

impl SceneRenderer {
    pub fn new(
        window: Arc<Window>,
        config: &Config,
        system: &SolarSystem,
        camera: &Camera,
    ) -> Result<Self, SetupError> {
        let size = window.inner_size();
        let gpu = init_render_context_blocking(window, config.window.vsync)?;
        let device = &gpu.device;

        let depth = DepthBuffer::new(device, size.width.max(1), size.height.max(1));

        let mut shaders = ShaderLibrary::new();
        if let Some(dir) = &config.render.shader_dir {
            shaders = shaders.with_shader_dir(dir);
        }
        let shader = shaders.load(device, BODY_SHADER_NAME, BODY_SHADER_SOURCE, &vertex_locations())?;

        let mut textures = TextureManager::new(device, &gpu.queue);
        let pipeline = BodyPipeline::new(
            device,
            &shader,
            gpu.surface_format,
            textures.bind_group_layout(),
        );

        let allocator = BufferAllocator::new(device);
        let camera_buffer = allocator.create_uniform(
            "camera",
            &CameraUniform::new(camera.view_matrix(), camera.projection_matrix()),
        );
        let camera_bind_group = pipeline.camera_bind_group(device, &camera_buffer);

        let sphere_config = &config.render.sphere;
        let sphere_mesh =
            generate_sphere(sphere_config.radius, sphere_config.stacks, sphere_config.sectors)?;
        info!(
            "Sphere mesh: {} vertices, {} triangles",
            sphere_mesh.vertex_count(),
            sphere_mesh.triangle_count()
        );
        let sphere = allocator.create_mesh("sphere", &sphere_mesh);

        let mut bodies = Vec::with_capacity(system.len());
        for body in system.bodies() {
            let texture = match &body.texture {
                Some(name) => {
                    textures.load_or_fallback(device, &gpu.queue, &texture_path(config, name))
                }
                None => textures.fallback(),
            };
            let ring = match body.ring {
                Some(ring) => {
                    let mesh =
                        generate_ring(ring.inner_radius, ring.outer_radius, sphere_config.sectors)?;
                    Some(allocator.create_mesh(&format!("{}-ring", body.name), &mesh))
                }
                None => None,
            };
            debug!("Prepared body '{}' (ring: {})", body.name, ring.is_some());
            bodies.push(BodyDraw {
                model: pipeline.create_model_binding(device, &body.name),
                texture,
                ring,
            });
        }

        Ok(Self {
            gpu,
            depth,
            pipeline,
            camera_buffer,
            camera_bind_group,
            sphere,
            bodies,
            clear_color: color_from_array(config.render.clear_color),
            _textures: textures,
        })
    }

    pub fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = color_from_array(rgba);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth.resize(&self.gpu.device, width, height);
    }

    /// Draw every body with `models[i]` as the world transform of body `i`.
    pub fn draw(&self, camera: &Camera, models: &[Mat4]) -> Result<(), SurfaceError> {
        let surface_texture = self.gpu.get_current_texture()?;
        let queue = &self.gpu.queue;

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(
                camera.view_matrix(),
                camera.projection_matrix(),
            )),
        );
        for (body, model) in self.bodies.iter().zip(models) {
            body.model.write(queue, *model);
        }

        let mut frame = FrameEncoder::new(&self.gpu.device, queue, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .clear_color(self.clear_color)
                .depth(&self.depth.view)
                .label("bodies");
            let mut pass = frame.begin_render_pass(&builder);
            for body in &self.bodies {
                draw_body(
                    &mut pass,
                    &self.pipeline,
                    &self.camera_bind_group,
                    &body.model,
                    &body.texture.bind_group,
                    &self.sphere,
                );
                if let Some(ring) = &body.ring {
                    draw_body(
                        &mut pass,
                        &self.pipeline,
                        &self.camera_bind_group,
                        &body.model,
                        &body.texture.bind_group,
                        ring,
                    );
                }
            }
        }
        frame.submit();
        Ok(())
    }
}
