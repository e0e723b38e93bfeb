//! Recordable pipeline operations

use std::rc::Rc;

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::lighting::{LightModelParam, LightParam, MaterialParam};
use crate::render::matrix::MatrixMode;
use crate::render::state::{
    BlendFactor, Capability, ClearMask, ColorMaterialMode, CompareFunc, Face, FrontFace,
    PolygonMode, Primitive, ShadeModel, TexFilter, TexFormat,
};

/// One pipeline operation with its operands
///
/// Every state-changing call on a context is expressed as an `Op`, executed
/// immediately or appended to the display list being compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Start a primitive
    Begin(Primitive),
    /// Finish the current primitive
    End,
    /// Emit a vertex with the current attributes
    Vertex(Vec4),
    /// Set the current color
    Color(Vec4),
    /// Set the current normal
    Normal(Vec3),
    /// Set the current texture coordinate
    TexCoord(Vec4),
    /// Set the current edge flag
    EdgeFlag(bool),

    /// Select the matrix stack
    MatrixMode(MatrixMode),
    /// Replace the current matrix with the identity
    LoadIdentity,
    /// Replace the current matrix
    LoadMatrix(Mat4),
    /// Post-multiply the current matrix
    MultMatrix(Mat4),
    /// Push the current stack
    PushMatrix,
    /// Pop the current stack
    PopMatrix,
    /// Multiply by a translation
    Translate(Vec3),
    /// Multiply by a rotation in degrees about an axis
    Rotate(f32, Vec3),
    /// Multiply by a scale
    Scale(Vec3),
    /// Multiply by a perspective frustum `[left, right, bottom, top, near, far]`
    Frustum([f32; 6]),
    /// Multiply by an orthographic projection `[left, right, bottom, top, near, far]`
    Ortho([f32; 6]),

    /// Set the viewport `(x, y, width, height)`
    Viewport(i32, i32, i32, i32),
    /// Turn a capability on
    Enable(Capability),
    /// Turn a capability off
    Disable(Capability),

    /// Set a light parameter
    Light(usize, LightParam),
    /// Set a light-model parameter
    LightModel(LightModelParam),
    /// Set a material parameter on the given faces
    Material(Face, MaterialParam),
    /// Choose the property driven by the current color
    ColorMaterial(Face, ColorMaterialMode),

    /// Flat or smooth shading
    ShadeModel(ShadeModel),
    /// Faces removed by culling
    CullFace(Face),
    /// Winding of front faces
    FrontFace(FrontFace),
    /// Rasterization of the given faces
    PolygonMode(Face, PolygonMode),
    /// Depth offset `(factor, units)`
    PolygonOffset(f32, f32),

    /// Depth comparison
    DepthFunc(CompareFunc),
    /// Depth write enable
    DepthMask(bool),
    /// Alpha comparison and reference
    AlphaFunc(CompareFunc, f32),
    /// Source and destination blend factors
    BlendFunc(BlendFactor, BlendFactor),
    /// RGBA write enables
    ColorMask([bool; 4]),

    /// Color used by `clear`
    ClearColor(Vec4),
    /// Depth used by `clear`
    ClearDepth(f32),
    /// Clear planes of the frame buffer
    Clear(ClearMask),

    /// Bind a texture handle
    BindTexture(u32),
    /// Upload a level image to the bound texture
    TexImage2D {
        /// Mipmap level
        level: usize,
        /// Layout of `data`
        format: TexFormat,
        /// Source width
        width: usize,
        /// Source height
        height: usize,
        /// Packed source pixels
        data: Rc<[u8]>,
    },
    /// Resample filter for following uploads
    TexFilter(TexFilter),

    /// Empty the name stack
    InitNames,
    /// Push a selection name
    PushName(u32),
    /// Pop a selection name
    PopName,
    /// Replace the top selection name
    LoadName(u32),

    /// Replay a display list
    CallList(u32),
}

impl Op {
    /// Slots the record occupies in a display-list buffer: the opcode plus
    /// its operands
    pub fn param_count(&self) -> usize {
        let operands = match self {
            Self::End
            | Self::LoadIdentity
            | Self::PushMatrix
            | Self::PopMatrix
            | Self::InitNames
            | Self::PopName => 0,
            Self::Begin(_)
            | Self::EdgeFlag(_)
            | Self::MatrixMode(_)
            | Self::Enable(_)
            | Self::Disable(_)
            | Self::ShadeModel(_)
            | Self::CullFace(_)
            | Self::FrontFace(_)
            | Self::DepthFunc(_)
            | Self::DepthMask(_)
            | Self::ClearDepth(_)
            | Self::Clear(_)
            | Self::BindTexture(_)
            | Self::TexFilter(_)
            | Self::PushName(_)
            | Self::LoadName(_)
            | Self::CallList(_) => 1,
            Self::PolygonMode(..)
            | Self::PolygonOffset(..)
            | Self::AlphaFunc(..)
            | Self::BlendFunc(..)
            | Self::ColorMaterial(..) => 2,
            Self::Normal(_) | Self::Translate(_) | Self::Scale(_) => 3,
            Self::Vertex(_)
            | Self::Color(_)
            | Self::TexCoord(_)
            | Self::Rotate(..)
            | Self::Viewport(..)
            | Self::ColorMask(_)
            | Self::ClearColor(_) => 4,
            // Parameter plus up to four values; pixels travel by reference.
            Self::LightModel(_) | Self::TexImage2D { .. } => 5,
            Self::Light(..) | Self::Material(..) | Self::Frustum(_) | Self::Ortho(_) => 6,
            Self::LoadMatrix(_) | Self::MultMatrix(_) => 16,
        };
        1 + operands
    }

    /// Whether the op is legal between `begin` and `end`
    pub fn allowed_in_primitive(&self) -> bool {
        matches!(
            self,
            Self::Vertex(_)
                | Self::Color(_)
                | Self::Normal(_)
                | Self::TexCoord(_)
                | Self::EdgeFlag(_)
                | Self::Material(..)
                | Self::CallList(_)
                | Self::End
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_count_includes_opcode() {
        assert_eq!(Op::End.param_count(), 1);
        assert_eq!(Op::Vertex(Vec4::zeros()).param_count(), 5);
        assert_eq!(Op::LoadMatrix(Mat4::identity()).param_count(), 17);
        assert_eq!(Op::Light(0, LightParam::SpotCutoff(45.0)).param_count(), 7);
    }

    #[test]
    fn test_primitive_bracket_whitelist() {
        assert!(Op::Vertex(Vec4::zeros()).allowed_in_primitive());
        assert!(Op::CallList(3).allowed_in_primitive());
        assert!(!Op::PushMatrix.allowed_in_primitive());
        assert!(!Op::Begin(Primitive::Points).allowed_in_primitive());
    }
}
