//! Color and depth planes the rasterizer writes into
//!
//! The frame buffer is owned by the embedder and lent to a context for the
//! context's lifetime. Colors are stored as RGBA8, depth as `f32` in `[0, 1]`
//! with 1.0 being the far plane.

use crate::foundation::math::Vec4;

/// RGBA8 pixel
pub type Rgba8 = [u8; 4];

/// Convert a `[0, 1]` float color to RGBA8, clamping out-of-range channels
pub fn pack_color(c: &Vec4) -> Rgba8 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    [q(c.x), q(c.y), q(c.z), q(c.w)]
}

/// Convert an RGBA8 pixel to a `[0, 1]` float color
pub fn unpack_color(p: Rgba8) -> Vec4 {
    Vec4::new(
        f32::from(p[0]) / 255.0,
        f32::from(p[1]) / 255.0,
        f32::from(p[2]) / 255.0,
        f32::from(p[3]) / 255.0,
    )
}

/// Software color + depth target
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color: Vec<Rgba8>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Create a frame buffer cleared to opaque black and far depth
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; width * height],
            depth: vec![1.0; width * height],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate both planes; previous contents are discarded
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        log::debug!(
            "Resizing frame buffer {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.color = vec![[0, 0, 0, 255]; width * height];
        self.depth = vec![1.0; width * height];
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Fill the color plane
    pub fn clear_color(&mut self, color: Rgba8) {
        self.color.fill(color);
    }

    /// Fill the depth plane
    pub fn clear_depth(&mut self, depth: f32) {
        self.depth.fill(depth);
    }

    /// Color at `(x, y)`, or `None` outside the buffer
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Rgba8> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Write a color; writes outside the buffer are dropped
    pub fn write_pixel(&mut self, x: usize, y: usize, color: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = color;
        }
    }

    /// Depth at `(x, y)`, or `None` outside the buffer
    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Write a depth value; writes outside the buffer are dropped
    pub fn set_depth(&mut self, x: usize, y: usize, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.depth[i] = depth;
        }
    }

    /// The color plane, row-major from the top-left corner
    pub fn color_plane(&self) -> &[Rgba8] {
        &self.color
    }

    /// The depth plane, row-major from the top-left corner
    pub fn depth_plane(&self) -> &[f32] {
        &self.depth
    }

    /// The color plane as tightly packed RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color)
    }

    // Unchecked accessors for the rasterizer, which clips to the buffer first.

    #[inline]
    pub(crate) fn color_mut(&mut self, i: usize) -> &mut Rgba8 {
        &mut self.color[i]
    }

    #[inline]
    pub(crate) fn depth_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.depth[i]
    }
}
