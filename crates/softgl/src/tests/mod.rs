//! End-to-end tests driving the pipeline through [`Context`]

mod display_lists;
mod pipeline;
mod selection;

use crate::render::framebuffer::{FrameBuffer, Rgba8};
use crate::render::state::Primitive;
use crate::{Context, GlResult};

const SIZE: usize = 16;

fn frame_buffer() -> FrameBuffer {
    FrameBuffer::new(SIZE, SIZE)
}

fn context(fb: &mut FrameBuffer) -> Context<'_> {
    Context::new(fb, 64)
}

/// Screen-filling quad at window depth `depth` in a flat color
fn full_quad(gl: &mut Context<'_>, depth: f32, color: [f32; 3]) -> GlResult<()> {
    let z = depth * 2.0 - 1.0;
    gl.color3(color[0], color[1], color[2])?;
    gl.begin(Primitive::Quads)?;
    gl.vertex3(-1.0, -1.0, z)?;
    gl.vertex3(1.0, -1.0, z)?;
    gl.vertex3(1.0, 1.0, z)?;
    gl.vertex3(-1.0, 1.0, z)?;
    gl.end()
}

/// Counter-clockwise triangle around the center of the window
fn center_triangle(gl: &mut Context<'_>) -> GlResult<()> {
    gl.begin(Primitive::Triangles)?;
    gl.vertex2(-0.5, -0.5)?;
    gl.vertex2(0.5, -0.5)?;
    gl.vertex2(0.0, 0.5)?;
    gl.end()
}

fn pixel(gl: &Context<'_>, x: usize, y: usize) -> Rgba8 {
    gl.frame_buffer().read_pixel(x, y).unwrap_or_default()
}

fn lit_pixels(gl: &Context<'_>) -> usize {
    gl.frame_buffer()
        .color_plane()
        .iter()
        .filter(|p| p[0] > 0 || p[1] > 0 || p[2] > 0)
        .count()
}
