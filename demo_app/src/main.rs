//! Spinning cube demo
//!
//! Renders a lit, textured cube from a display list for a number of frames,
//! picks the face under the window center with a selection pass and writes
//! the last frame to a PNG file.
//!
//! Usage: `spinning_cube [config.toml|config.ron] [output.png]`

use softgl::config::Config;
use softgl::foundation::{logging, time::FrameTimer};
use softgl::prelude::*;
use thiserror::Error;

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const FRAMES: usize = 90;
const CUBE_LIST: u32 = 1;
const CHECKER: usize = 8;

#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] softgl::core::ConfigError),

    #[error("pipeline: {0}")]
    Gl(#[from] GlError),

    #[error("image export: {0}")]
    Image(#[from] image::ImageError),
}

/// Corners and normal of each face, counter-clockwise seen from outside
const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
];

const TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

fn checker_texture() -> Vec<u8> {
    let mut data = Vec::with_capacity(CHECKER * CHECKER * 3);
    for y in 0..CHECKER {
        for x in 0..CHECKER {
            let v = if (x + y) % 2 == 0 { 230 } else { 60 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    data
}

fn setup(gl: &mut Context<'_>) -> GlResult<()> {
    gl.viewport(0, 0, WIDTH as i32, HEIGHT as i32)?;
    gl.matrix_mode(MatrixMode::Projection)?;
    gl.load_identity()?;
    let aspect = WIDTH as f32 / HEIGHT as f32;
    gl.frustum(-0.5 * aspect, 0.5 * aspect, -0.5, 0.5, 1.0, 20.0)?;
    gl.matrix_mode(MatrixMode::ModelView)?;

    gl.enable(Features::DEPTH_TEST)?;
    gl.enable(Features::CULL_FACE)?;
    gl.enable(Features::LIGHTING)?;
    gl.enable(Features::TEXTURE_2D)?;
    gl.enable(Capability::Light(0))?;
    gl.light(0, LightParam::Position(Vec4::new(1.0, 1.0, 2.0, 0.0)))?;
    gl.material(Face::Front, MaterialParam::Specular(Vec4::new(0.6, 0.6, 0.6, 1.0)))?;
    gl.material(Face::Front, MaterialParam::Shininess(24.0))?;
    gl.clear_color(0.1, 0.1, 0.15, 1.0)?;

    let texture = gl.gen_textures(1)?[0];
    gl.bind_texture(texture)?;
    gl.tex_image_2d(0, TexFormat::Rgb8, CHECKER, CHECKER, &checker_texture())?;

    gl.new_list(CUBE_LIST, ListMode::Compile)?;
    for (name, (normal, corners)) in (0u32..).zip(FACES.iter()) {
        gl.load_name(name)?;
        gl.begin(Primitive::Quads)?;
        gl.normal3(normal[0], normal[1], normal[2])?;
        for (corner, uv) in corners.iter().zip(TEX_COORDS) {
            gl.tex_coord2(uv[0], uv[1])?;
            gl.vertex3(corner[0], corner[1], corner[2])?;
        }
        gl.end()?;
    }
    gl.end_list()
}

fn draw_frame(gl: &mut Context<'_>, angle: f32) -> GlResult<()> {
    gl.clear(ClearMask::COLOR | ClearMask::DEPTH)?;
    gl.load_identity()?;
    gl.translate(0.0, 0.0, -6.0)?;
    gl.rotate(angle, 0.3, 1.0, 0.2)?;
    gl.call_list(CUBE_LIST)
}

/// Name of the face drawn nearest to the viewer, if any
fn pick_front_face(gl: &mut Context<'_>, angle: f32) -> GlResult<Option<u32>> {
    gl.select_buffer(256)?;
    gl.render_mode(RenderMode::Select)?;
    gl.init_names()?;
    gl.push_name(0)?;
    draw_frame(gl, angle)?;
    let hits = gl.render_mode(RenderMode::Render)?;
    log::info!("Selection pass recorded {hits} hits");

    Ok(gl
        .selection_hits()
        .into_iter()
        .min_by_key(|hit| hit.min_depth)
        .and_then(|hit| hit.names.last().copied()))
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ContextConfig::load_from_file(&path)?,
        None => ContextConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "spinning_cube.png".to_string());

    let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
    {
        let mut gl = Context::with_config(&mut fb, &config)?;
        setup(&mut gl)?;

        let mut timer = FrameTimer::new();
        let mut angle = 0.0;
        for _ in 0..FRAMES {
            timer.begin_frame();
            angle += 4.0;
            draw_frame(&mut gl, angle)?;
            timer.end_frame();
        }
        log::info!(
            "Rendered {} frames, {:.2} ms average ({:.1} fps)",
            timer.frame_count(),
            timer.average_millis(),
            timer.average_fps()
        );

        match pick_front_face(&mut gl, angle)? {
            Some(face) => log::info!("Front-most face: {face}"),
            None => log::info!("Nothing under the cube"),
        }
        // Selection writes no pixels, so draw the frame again for export.
        draw_frame(&mut gl, angle)?;

        let stats = gl.specular_stats();
        log::debug!(
            "Specular cache: {} hits, {} misses, {} evictions",
            stats.hits,
            stats.misses,
            stats.evictions
        );
        if let Some(err) = gl.get_error() {
            log::warn!("Pending pipeline error: {err}");
        }
    }

    image::save_buffer(
        &output,
        fb.as_bytes(),
        fb.width() as u32,
        fb.height() as u32,
        image::ExtendedColorType::Rgba8,
    )?;
    log::info!("Wrote {output}");
    Ok(())
}

fn main() {
    logging::init_with_default("info");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
