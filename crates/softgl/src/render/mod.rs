//! # Render Module
//!
//! The pipeline stages below the context: frame buffer, matrix stacks,
//! clipping, lighting, texturing, scan conversion and selection.

pub mod clip;
pub mod framebuffer;
pub mod lighting;
pub mod matrix;
pub mod raster;
pub mod selection;
pub mod state;
pub mod texture;
pub mod vertex;

pub use clip::{ClipCode, Viewport};
pub use framebuffer::{FrameBuffer, Rgba8};
pub use matrix::{MatrixMode, MatrixState};
pub use raster::{FragmentState, Rasterizer};
pub use selection::{Selection, SelectionHit};
pub use vertex::{ScreenPoint, Vertex};
