//! wgpu rendering for the orrery: GPU context, shaders, textures, and the
//! textured body pipeline.

pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod shader;
pub mod surface;
pub mod texture;

pub use body_pipeline::{
    BODY_SHADER_NAME, BODY_SHADER_SOURCE, BodyPipeline, CameraUniform, ModelBinding, ModelUniform,
    draw_body, vertex_locations,
};
pub use buffer::{BufferAllocator, MeshBuffer};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK, color_from_array};
pub use shader::{ShaderError, ShaderLibrary, compile_wgsl, link_check};
pub use surface::{PhysicalSize, SurfaceWrapper};
pub use texture::{
    DecodedImage, FALLBACK_TEXTURE, ManagedTexture, TextureLoadError, TextureManager,
    decode_image,
};
