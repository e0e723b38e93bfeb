//! Vertex as it flows through transform, lighting, clipping and rasterization

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::clip::ClipCode;

/// Window-space point with the attributes the rasterizer interpolates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// Pixel column
    pub x: i32,
    /// Pixel row (0 at the top)
    pub y: i32,
    /// Window depth in `[0, 1]`
    pub z: f32,
    /// `1 / w_clip`, used for perspective-correct interpolation
    pub inv_w: f32,
    /// RGBA color in `[0, 1]`
    pub color: Vec4,
    /// Texture coordinate (s, t)
    pub tex: Vec2,
}

/// A vertex submitted between `begin` and `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Object-space coordinate
    pub coord: Vec4,
    /// Object-space normal
    pub normal: Vec3,
    /// Texture coordinate after the texture matrix
    pub tex_coord: Vec4,
    /// Front-face color (lit or current color)
    pub color: Vec4,
    /// Back-face color under two-sided lighting; equals `color` otherwise
    pub back_color: Vec4,
    /// Whether the edge starting at this vertex is a boundary edge
    pub edge_flag: bool,

    /// Eye-space coordinate (valid when lighting is enabled)
    pub eye: Vec4,
    /// Clip-space coordinate
    pub clip: Vec4,
    /// Frustum planes this vertex lies outside of
    pub clip_code: ClipCode,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            coord: Vec4::new(0.0, 0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            tex_coord: Vec4::new(0.0, 0.0, 0.0, 1.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            back_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            edge_flag: true,
            eye: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clip: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clip_code: ClipCode::empty(),
        }
    }
}

impl Vertex {
    /// Vertex with only a clip-space position; handy for clipper tests
    pub fn from_clip(clip: Vec4) -> Self {
        Self {
            clip,
            clip_code: ClipCode::of(&clip),
            ..Self::default()
        }
    }

    /// Interpolate the clip-space attributes of two vertices at parameter `t`
    ///
    /// The result's edge flag is taken from `self`; the clip code is
    /// recomputed.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let clip = self.clip.lerp(&other.clip, t);
        Self {
            coord: self.coord.lerp(&other.coord, t),
            normal: self.normal.lerp(&other.normal, t),
            tex_coord: self.tex_coord.lerp(&other.tex_coord, t),
            color: self.color.lerp(&other.color, t),
            back_color: self.back_color.lerp(&other.back_color, t),
            edge_flag: self.edge_flag,
            eye: self.eye.lerp(&other.eye, t),
            clip,
            clip_code: ClipCode::of(&clip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_midpoint() {
        let mut a = Vertex::from_clip(Vec4::new(-2.0, 0.0, 0.0, 1.0));
        let mut b = Vertex::from_clip(Vec4::new(0.0, 0.0, 0.0, 1.0));
        a.color = Vec4::new(1.0, 0.0, 0.0, 1.0);
        b.color = Vec4::new(0.0, 0.0, 1.0, 1.0);
        let m = a.lerp(&b, 0.5);
        assert_relative_eq!(m.clip, Vec4::new(-1.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(m.color, Vec4::new(0.5, 0.0, 0.5, 1.0));
        assert!(m.clip_code.is_empty());
        assert!(a.clip_code.contains(ClipCode::LEFT));
    }
}
