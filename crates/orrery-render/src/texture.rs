//! Body textures: image decoding, GPU upload with mipmaps, and the blank fallback.
//!
//! [`TextureManager`] hands out [`Arc<ManagedTexture>`] values with a
//! ready-to-bind group-2 bind group. A texture that fails to load is reported
//! as a [`TextureLoadError`]; [`TextureManager::load_or_fallback`] logs it and
//! returns the 1x1 blank texture so the body still draws.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// All body textures are uploaded in this format.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Name of the blank texture in the cache.
pub const FALLBACK_TEXTURE: &str = "blank";

const BYTES_PER_PIXEL: usize = 4;

/// A GPU texture with its view, bind group, and metadata.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

/// Errors that can occur while loading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    /// The file could not be opened or decoded.
    #[error("failed to load texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match `width * height * 4`.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an image file into RGBA8, whatever its source channel layout.
pub fn decode_image(path: &Path) -> Result<DecodedImage, TextureLoadError> {
    let rgba = image::open(path)
        .map_err(|source| TextureLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Number of mip levels for a full chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn validate_pixels(data: &[u8], width: u32, height: u32) -> Result<(), TextureLoadError> {
    if width == 0 || height == 0 {
        return Err(TextureLoadError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if data.len() != expected {
        return Err(TextureLoadError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// WGSL for mipmap generation via fullscreen blit.
const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

fn texture_sampler_layout_entries() -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

/// Texture cache keyed by file path (or [`FALLBACK_TEXTURE`]).
pub struct TextureManager {
    textures: HashMap<String, Arc<ManagedTexture>>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
    fallback: Arc<ManagedTexture>,
}

impl TextureManager {
    /// Create the manager and upload the blank fallback texture.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        // Repeat so the sphere seam and ring wrap cleanly.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("body-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("body-texture-bind-group-layout"),
            entries: &texture_sampler_layout_entries(),
        });

        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blit-bind-group-layout"),
                entries: &texture_sampler_layout_entries(),
            });

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });

        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            immediate_size: 0,
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mipmap-pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let fallback = Arc::new(upload(
            device,
            queue,
            &sampler,
            &bind_group_layout,
            None,
            FALLBACK_TEXTURE,
            &[255, 255, 255, 255],
            1,
            1,
        ));

        let mut textures = HashMap::new();
        textures.insert(FALLBACK_TEXTURE.to_string(), Arc::clone(&fallback));

        Self {
            textures,
            sampler,
            bind_group_layout,
            blit_pipeline,
            blit_bind_group_layout,
            blit_sampler,
            fallback,
        }
    }

    /// Upload RGBA8 pixels as a mipmapped texture, or return the cached one.
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Arc<ManagedTexture>, TextureLoadError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }
        validate_pixels(data, width, height)?;

        let managed = Arc::new(upload(
            device,
            queue,
            &self.sampler,
            &self.bind_group_layout,
            Some(Blit {
                pipeline: &self.blit_pipeline,
                layout: &self.blit_bind_group_layout,
                sampler: &self.blit_sampler,
            }),
            name,
            data,
            width,
            height,
        ));

        self.textures.insert(name.to_string(), Arc::clone(&managed));
        log::info!(
            "Created texture '{name}' ({width}x{height}, {} mips)",
            managed.mip_level_count
        );
        Ok(managed)
    }

    /// Decode and upload an image file.
    pub fn load_file(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Arc<ManagedTexture>, TextureLoadError> {
        let key = path.to_string_lossy().into_owned();
        if let Some(existing) = self.textures.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let image = decode_image(path)?;
        self.create_texture(device, queue, &key, &image.pixels, image.width, image.height)
    }

    /// Like [`load_file`](Self::load_file), but logs failures and returns the
    /// blank texture instead.
    pub fn load_or_fallback(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Arc<ManagedTexture> {
        match self.load_file(device, queue, path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{e}; drawing with blank texture");
                self.fallback()
            }
        }
    }

    /// The 1x1 white texture.
    pub fn fallback(&self) -> Arc<ManagedTexture> {
        Arc::clone(&self.fallback)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ManagedTexture>> {
        self.textures.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Layout of the group-2 texture + sampler bind group.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

struct Blit<'a> {
    pipeline: &'a wgpu::RenderPipeline,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
}

#[allow(clippy::too_many_arguments)]
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    sampler: &wgpu::Sampler,
    bind_group_layout: &wgpu::BindGroupLayout,
    blit: Option<Blit<'_>>,
    name: &str,
    data: &[u8],
    width: u32,
    height: u32,
) -> ManagedTexture {
    let mip_levels = if blit.is_some() {
        mip_level_count(width, height)
    } else {
        1
    };
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(name),
        size,
        mip_level_count: mip_levels,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * BYTES_PER_PIXEL as u32),
            rows_per_image: None,
        },
        size,
    );

    if let Some(blit) = blit
        && mip_levels > 1
    {
        generate_mipmaps(device, queue, &blit, &texture, mip_levels);
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{name}-bind-group")),
        layout: bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    ManagedTexture {
        texture,
        view,
        bind_group,
        dimensions: (width, height),
        mip_level_count: mip_levels,
    }
}

/// Fill mip levels 1.. by blitting each level from the one above it.
fn generate_mipmaps(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    blit: &Blit<'_>,
    texture: &wgpu::Texture,
    mip_count: u32,
) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("mipmap-encoder"),
    });

    for level in 1..mip_count {
        let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
            base_mip_level: level - 1,
            mip_level_count: Some(1),
            ..Default::default()
        });
        let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
            base_mip_level: level,
            mip_level_count: Some(1),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mipmap-bind-group"),
            layout: blit.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&src_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(blit.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mipmap-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &dst_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_pipeline(blit.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    queue.submit(std::iter::once(encoder.finish()));
}

/// Create a test GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
