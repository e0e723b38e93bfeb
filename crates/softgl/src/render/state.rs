//! Enumerated pipeline state: feature switches, comparison and blend modes,
//! face selection and primitive kinds.

use bitflags::bitflags;

bitflags! {
    /// Server-side feature switches toggled with `enable` / `disable`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        /// Per-vertex lighting
        const LIGHTING = 1 << 0;
        /// Depth comparison against the depth plane
        const DEPTH_TEST = 1 << 1;
        /// Alpha comparison against the reference value
        const ALPHA_TEST = 1 << 2;
        /// Source/destination blending
        const BLEND = 1 << 3;
        /// 2D texture mapping
        const TEXTURE_2D = 1 << 4;
        /// Face culling
        const CULL_FACE = 1 << 5;
        /// Renormalize eye-space normals
        const NORMALIZE = 1 << 6;
        /// Current color drives material properties
        const COLOR_MATERIAL = 1 << 7;
        /// Depth offset for filled polygons
        const POLYGON_OFFSET_FILL = 1 << 8;
        /// Depth offset for polygons drawn as lines
        const POLYGON_OFFSET_LINE = 1 << 9;
        /// Depth offset for polygons drawn as points
        const POLYGON_OFFSET_POINT = 1 << 10;
    }
}

bitflags! {
    /// Planes affected by `clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        /// The color plane
        const COLOR = 1 << 0;
        /// The depth plane
        const DEPTH = 1 << 1;
    }
}

/// Argument of `enable` / `disable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A feature switch
    Feature(Features),
    /// Light number `n`
    Light(usize),
}

impl From<Features> for Capability {
    fn from(f: Features) -> Self {
        Self::Feature(f)
    }
}

/// Comparison used by the depth and alpha tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareFunc {
    /// Never passes
    Never,
    /// Passes if incoming < stored
    #[default]
    Less,
    /// Passes if incoming == stored
    Equal,
    /// Passes if incoming <= stored
    LessEqual,
    /// Passes if incoming > stored
    Greater,
    /// Passes if incoming != stored
    NotEqual,
    /// Passes if incoming >= stored
    GreaterEqual,
    /// Always passes
    Always,
}

impl CompareFunc {
    /// Evaluate `incoming <op> stored`
    #[inline]
    pub fn test(self, incoming: f32, stored: f32) -> bool {
        match self {
            Self::Never => false,
            Self::Less => incoming < stored,
            Self::Equal => (incoming - stored).abs() <= f32::EPSILON,
            Self::LessEqual => incoming <= stored,
            Self::Greater => incoming > stored,
            Self::NotEqual => (incoming - stored).abs() > f32::EPSILON,
            Self::GreaterEqual => incoming >= stored,
            Self::Always => true,
        }
    }
}

/// Blend weight applied to the source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// (0, 0, 0, 0)
    Zero,
    /// (1, 1, 1, 1)
    One,
    /// Source color
    SrcColor,
    /// 1 - source color
    OneMinusSrcColor,
    /// Destination color
    DstColor,
    /// 1 - destination color
    OneMinusDstColor,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// 1 - destination alpha
    OneMinusDstAlpha,
    /// min(As, 1 - Ad) on RGB, 1 on alpha
    SrcAlphaSaturate,
}

/// Color interpolation across a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeModel {
    /// Whole primitive takes the provoking vertex color
    Flat,
    /// Colors interpolated across the primitive
    #[default]
    Smooth,
}

/// Face selector for culling, polygon mode and materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    /// Front faces
    Front,
    /// Back faces
    #[default]
    Back,
    /// Both faces
    FrontAndBack,
}

impl Face {
    /// Whether this selector covers the front face
    pub fn includes_front(self) -> bool {
        matches!(self, Self::Front | Self::FrontAndBack)
    }

    /// Whether this selector covers the back face
    pub fn includes_back(self) -> bool {
        matches!(self, Self::Back | Self::FrontAndBack)
    }
}

/// Winding that counts as front-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    /// Counter-clockwise
    #[default]
    Ccw,
    /// Clockwise
    Cw,
}

/// Rasterization of polygon faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode {
    /// Vertices flagged as edge starts are drawn as points
    Point,
    /// Flagged edges are drawn as lines
    Line,
    /// Interior is filled
    #[default]
    Fill,
}

/// Output mode of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Rasterize into the frame buffer
    #[default]
    Render,
    /// Record selection hits instead of writing pixels
    Select,
}

/// Primitive assembled between `begin` and `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent points
    Points,
    /// Independent segments
    Lines,
    /// Connected segments
    LineStrip,
    /// Connected segments closed back to the first vertex
    LineLoop,
    /// Independent triangles
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan around the first vertex
    TriangleFan,
    /// Independent quads
    Quads,
    /// Quad strip
    QuadStrip,
    /// Single convex polygon
    Polygon,
}

/// Pixel layout of uploaded texture data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexFormat {
    /// Three bytes per pixel, alpha taken as opaque
    Rgb8,
    /// Four bytes per pixel
    Rgba8,
}

impl TexFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Filter used when resampling uploaded images to the internal texture size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexFilter {
    /// Nearest sample
    Nearest,
    /// Bilinear interpolation
    #[default]
    Linear,
}

/// Material property driven by the current color under `COLOR_MATERIAL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMaterialMode {
    /// Emission color
    Emission,
    /// Ambient reflectance
    Ambient,
    /// Diffuse reflectance
    Diffuse,
    /// Specular reflectance
    Specular,
    /// Ambient and diffuse reflectance
    #[default]
    AmbientAndDiffuse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_funcs() {
        assert!(CompareFunc::Less.test(0.1, 0.3));
        assert!(!CompareFunc::Less.test(0.3, 0.3));
        assert!(CompareFunc::LessEqual.test(0.3, 0.3));
        assert!(CompareFunc::Greater.test(0.5, 0.1));
        assert!(CompareFunc::Always.test(1.0, 0.0));
        assert!(!CompareFunc::Never.test(0.0, 1.0));
        assert!(CompareFunc::NotEqual.test(0.2, 0.3));
        assert!(CompareFunc::Equal.test(0.25, 0.25));
    }

    #[test]
    fn test_face_selectors() {
        assert!(Face::FrontAndBack.includes_front() && Face::FrontAndBack.includes_back());
        assert!(!Face::Back.includes_front());
        assert!(!Face::Front.includes_back());
    }
}
