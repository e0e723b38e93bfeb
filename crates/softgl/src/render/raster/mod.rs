//! Scan conversion of window-space primitives
//!
//! The rasterizer turns clipped, projected triangles, lines and points into
//! fragments and runs each fragment through texture, alpha test, depth test
//! and blending before writing it to the frame buffer.
//!
//! Color and texture coordinates are interpolated perspective-correctly: the
//! attribute times `1/w` and `1/w` itself are interpolated linearly in screen
//! space, and their quotient is taken per pixel. Depth is already in window
//! space and is interpolated linearly.

mod fragment;
mod line;
mod triangle;

pub use triangle::depth_slope;

use crate::render::framebuffer::FrameBuffer;
use crate::render::state::{BlendFactor, CompareFunc, Features};
use crate::render::texture::TextureImage;

/// Per-fragment operation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentState {
    /// Depth comparison
    pub depth_func: CompareFunc,
    /// Whether passing fragments write depth
    pub depth_mask: bool,
    /// Alpha comparison
    pub alpha_func: CompareFunc,
    /// Alpha reference value in `[0, 1]`
    pub alpha_ref: f32,
    /// Source blend factor
    pub blend_src: BlendFactor,
    /// Destination blend factor
    pub blend_dst: BlendFactor,
    /// Per-channel color write enables (RGBA)
    pub color_mask: [bool; 4],
}

impl Default for FragmentState {
    fn default() -> Self {
        Self {
            depth_func: CompareFunc::Less,
            depth_mask: true,
            alpha_func: CompareFunc::Always,
            alpha_ref: 0.0,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            color_mask: [true; 4],
        }
    }
}

/// Rasterizer bound to a frame buffer for the duration of one primitive batch
pub struct Rasterizer<'a> {
    fb: &'a mut FrameBuffer,
    state: &'a FragmentState,
    features: Features,
    texture: Option<&'a TextureImage>,
    depth_offset: f32,
}

impl<'a> Rasterizer<'a> {
    /// Rasterizer writing into `fb`; `texture` is sampled when given
    pub fn new(
        fb: &'a mut FrameBuffer,
        state: &'a FragmentState,
        features: Features,
        texture: Option<&'a TextureImage>,
    ) -> Self {
        Self {
            fb,
            state,
            features,
            texture,
            depth_offset: 0.0,
        }
    }

    /// Constant added to the depth of every following fragment
    pub fn set_depth_offset(&mut self, offset: f32) {
        self.depth_offset = offset;
    }
}
