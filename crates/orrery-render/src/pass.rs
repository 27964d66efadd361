//! Per-frame command encoding.
//!
//! [`FrameEncoder`] owns the acquired surface texture and command encoder for
//! one frame; [`RenderPassBuilder`] describes the clear color and depth
//! attachment of the pass recorded into it.

/// Clear color used when the config does not set one.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color::BLACK;

/// Convert an RGBA array from the config into a wgpu color.
pub fn color_from_array(rgba: [f64; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    }
}

/// Describes one color + optional reverse-Z depth render pass.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth_view: Option<&'a wgpu::TextureView>,
    depth_clear: f32,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_BLACK,
            depth_view: None,
            depth_clear: crate::depth::DepthBuffer::CLEAR_VALUE,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a depth view, cleared to the far plane.
    pub fn depth(mut self, view: &'a wgpu::TextureView) -> Self {
        self.depth_view = Some(view);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e> {
        let depth_stencil_attachment =
            self.depth_view
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.depth_clear),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and swapchain image. Dropping it without
/// [`submit`](Self::submit) discards the frame.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    queue: wgpu::Queue,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue: queue.clone(),
            surface_texture,
            surface_view,
        }
    }

    /// Begin a pass targeting the surface.
    pub fn begin_render_pass(&mut self, builder: &RenderPassBuilder<'_>) -> wgpu::RenderPass<'_> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit the recorded commands and present.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, wgpu::Color::BLACK);
        assert!(builder.depth_view.is_none());
        assert_eq!(builder.depth_clear, 0.0);
    }

    #[test]
    fn test_builder_settings() {
        let builder = RenderPassBuilder::new()
            .clear_color(wgpu::Color::RED)
            .label("bodies");
        assert_eq!(builder.clear_color, wgpu::Color::RED);
        assert_eq!(builder.label, Some("bodies"));
    }

    #[test]
    fn test_color_from_array() {
        let color = color_from_array([0.1, 0.2, 0.3, 1.0]);
        assert_eq!(
            color,
            wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0
            }
        );
    }
}
