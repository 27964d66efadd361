//! Window surface size tracking.
//!
//! Wayland may report a zero-size window before the compositor assigns one,
//! and minimizing on Windows reports 0x0. The wrapper clamps to 1x1 for GPU
//! configuration and remembers whether a real size has been seen.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width / height as used by the projection.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Tracks the surface's physical size and scale factor.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    size: PhysicalSize,
    scale_factor: f64,
    /// Last reported size was zero in some dimension (minimized or unmapped).
    minimized: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            size: clamp(physical_width, physical_height),
            scale_factor,
            minimized: physical_width == 0 || physical_height == 0,
        }
    }

    /// Record a resize. Returns the new clamped size if it differs from the
    /// current one.
    pub fn handle_resize(&mut self, physical_width: u32, physical_height: u32) -> Option<PhysicalSize> {
        self.minimized = physical_width == 0 || physical_height == 0;
        let size = clamp(physical_width, physical_height);
        if size == self.size {
            return None;
        }
        self.size = size;
        Some(size)
    }

    /// Record a DPI change; the physical size changes with it.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<PhysicalSize> {
        self.scale_factor = scale_factor;
        self.handle_resize(physical_width, physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.size
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Whether rendering should be skipped because the window has no area.
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}

fn clamp(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_clamped_and_minimized() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(wrapper.physical_size(), PhysicalSize { width: 1, height: 1 });
        assert!(wrapper.is_minimized());

        let size = wrapper.handle_resize(800, 600).unwrap();
        assert_eq!(size, PhysicalSize { width: 800, height: 600 });
        assert!(!wrapper.is_minimized());
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(800, 600).is_none());
    }

    #[test]
    fn test_minimize_then_restore() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(0, 0).is_some());
        assert!(wrapper.is_minimized());
        assert!(wrapper.handle_resize(800, 600).is_some());
        assert!(!wrapper.is_minimized());
    }

    #[test]
    fn test_scale_factor_change() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let size = wrapper.handle_scale_factor_changed(2.0, 1600, 1200).unwrap();
        assert_eq!(size.width, 1600);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let size = PhysicalSize { width: 800, height: 600 };
        assert!((size.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }
}
