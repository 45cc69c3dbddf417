/// Upper bound on device pixels per logical pixel
pub const DEFAULT_MAX_PIXEL_RATIO: f32 = 2.0;

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, `None` when either side is zero
    pub fn aspect(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.width as f32 / self.height as f32)
    }
}

/// Maps the window's physical size to the resolution the scene is rendered at.
///
/// The render size is the logical window size times
/// `min(scale_factor, max_pixel_ratio)`, so high-density displays are not
/// rendered at more than `max_pixel_ratio` device pixels per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    physical: WindowDimensions,
    scale_factor: f64,
    max_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(physical: WindowDimensions, scale_factor: f64, max_pixel_ratio: f32) -> Self {
        Self {
            physical,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            max_pixel_ratio,
        }
    }

    pub fn set_physical(&mut self, physical: WindowDimensions) {
        self.physical = physical;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn physical(&self) -> WindowDimensions {
        self.physical
    }

    pub fn pixel_ratio(&self) -> f32 {
        (self.scale_factor as f32).min(self.max_pixel_ratio)
    }

    /// Size of the CPU framebuffer; zero only when the window is minimized
    pub fn render_size(&self) -> WindowDimensions {
        if self.physical.is_empty() {
            return WindowDimensions::new(0, 0);
        }
        let scale = self.pixel_ratio() as f64 / self.scale_factor;
        let side = |v: u32| ((v as f64 * scale).round() as u32).max(1);
        WindowDimensions::new(side(self.physical.width), side(self.physical.height))
    }

    pub fn aspect(&self) -> Option<f32> {
        self.physical.aspect()
    }
}
