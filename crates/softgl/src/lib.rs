//! # softgl
//!
//! A fixed-function, immediate-mode 3D pipeline rasterized entirely in
//! software into a caller-owned frame buffer.
//!
//! ## Features
//!
//! - **Transform & Clip**: Matrix stacks, homogeneous clipping, viewport mapping
//! - **Lighting**: Up to 32 lights with spot cones, attenuation and a cached
//!   specular power table
//! - **Rasterization**: Perspective-correct triangles, lines and points with
//!   depth, alpha and blend stages
//! - **Textures**: Handle-addressed textures resampled to a fixed size
//! - **Display Lists**: Recorded operation streams replayed through the same
//!   dispatch as immediate calls
//! - **Selection**: Name-stack hit records instead of pixels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softgl::prelude::*;
//!
//! fn main() -> GlResult<()> {
//!     let mut fb = FrameBuffer::new(320, 240);
//!     let mut gl = Context::new(&mut fb, 256);
//!
//!     gl.clear(ClearMask::COLOR | ClearMask::DEPTH)?;
//!     gl.begin(Primitive::Triangles)?;
//!     gl.color3(1.0, 0.0, 0.0)?;
//!     gl.vertex3(-0.5, -0.5, 0.0)?;
//!     gl.vertex3(0.5, -0.5, 0.0)?;
//!     gl.vertex3(0.0, 0.5, 0.0)?;
//!     gl.end()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod error;

pub mod foundation;
pub mod config;
pub mod render;
pub mod command;

mod context;

pub use context::{Context, GrowingHost, RenderHost};
pub use error::{GlError, GlResult, StackKind};

#[cfg(test)]
mod tests;

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        command::ListMode,
        core::ContextConfig,
        foundation::math::{Mat4, Vec3, Vec4},
        render::{
            framebuffer::{FrameBuffer, Rgba8},
            lighting::{LightModelParam, LightParam, MaterialParam},
            matrix::MatrixMode,
            selection::SelectionHit,
            state::{
                BlendFactor, Capability, ClearMask, ColorMaterialMode, CompareFunc, Face,
                Features, FrontFace, PolygonMode, Primitive, RenderMode, ShadeModel, TexFilter, TexFormat,
            },
        },
        Context, GlError, GlResult, GrowingHost, RenderHost,
    };
}
