use approx::assert_relative_eq;

use super::*;
use crate::foundation::math::Vec4;
use crate::render::matrix::MatrixMode;
use crate::core::config::ContextConfig;
use crate::render::lighting::MaterialParam;
use crate::render::state::{Capability, ClearMask, Face, Features, FrontFace, PolygonMode, ShadeModel};
use crate::{GlError, RenderHost};

#[test]
fn test_depth_test_keeps_nearest_of_three() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.enable(Features::DEPTH_TEST).unwrap();
    gl.clear(ClearMask::COLOR | ClearMask::DEPTH).unwrap();

    full_quad(&mut gl, 0.3, [1.0, 0.0, 0.0]).unwrap();
    full_quad(&mut gl, 0.1, [0.0, 1.0, 0.0]).unwrap();
    full_quad(&mut gl, 0.5, [0.0, 0.0, 1.0]).unwrap();

    assert_eq!(pixel(&gl, 8, 8), [0, 255, 0, 255]);
    let depth = gl.frame_buffer().depth_at(8, 8).unwrap();
    assert_relative_eq!(depth, 0.1, epsilon = 1e-4);
}

#[test]
fn test_depth_mask_off_keeps_stored_depth() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.enable(Features::DEPTH_TEST).unwrap();
    gl.depth_mask(false).unwrap();
    full_quad(&mut gl, 0.3, [1.0, 0.0, 0.0]).unwrap();

    assert_eq!(pixel(&gl, 8, 8), [255, 0, 0, 255]);
    assert_relative_eq!(gl.frame_buffer().depth_at(8, 8).unwrap(), 1.0);
}

#[test]
fn test_back_faces_are_culled() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.enable(Features::CULL_FACE).unwrap();

    center_triangle(&mut gl).unwrap();
    assert!(lit_pixels(&gl) > 0);

    gl.clear(ClearMask::COLOR).unwrap();
    gl.front_face(FrontFace::Cw).unwrap();
    center_triangle(&mut gl).unwrap();
    assert_eq!(lit_pixels(&gl), 0);

    gl.cull_face(Face::Front).unwrap();
    center_triangle(&mut gl).unwrap();
    assert!(lit_pixels(&gl) > 0);
}

#[test]
fn test_partially_visible_triangle_is_clipped() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    gl.begin(Primitive::Triangles).unwrap();
    gl.vertex2(-0.5, -0.5).unwrap();
    gl.vertex2(3.0, -0.5).unwrap();
    gl.vertex2(-0.5, 0.5).unwrap();
    gl.end().unwrap();
    let partial = lit_pixels(&gl);
    assert!(partial > 0);
    // The clipped shape reaches the right edge of the window.
    assert!((0..SIZE).any(|y| pixel(&gl, SIZE - 2, y)[0] > 0));

    gl.clear(ClearMask::COLOR).unwrap();
    gl.begin(Primitive::Triangles).unwrap();
    gl.vertex2(2.0, -0.5).unwrap();
    gl.vertex2(3.0, -0.5).unwrap();
    gl.vertex2(2.0, 0.5).unwrap();
    gl.end().unwrap();
    assert_eq!(lit_pixels(&gl), 0);
}

#[test]
fn test_points_outside_the_volume_are_dropped() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.begin(Primitive::Points).unwrap();
    gl.vertex2(0.0, 0.0).unwrap();
    gl.vertex2(1.5, 0.0).unwrap();
    gl.end().unwrap();
    assert_eq!(lit_pixels(&gl), 1);
}

#[test]
fn test_flat_shading_uses_last_vertex() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.shade_model(ShadeModel::Flat).unwrap();

    gl.begin(Primitive::Triangles).unwrap();
    gl.color3(1.0, 0.0, 0.0).unwrap();
    gl.vertex2(-0.5, -0.5).unwrap();
    gl.color3(0.0, 1.0, 0.0).unwrap();
    gl.vertex2(0.5, -0.5).unwrap();
    gl.color3(0.0, 0.0, 1.0).unwrap();
    gl.vertex2(0.0, 0.5).unwrap();
    gl.end().unwrap();

    assert_eq!(pixel(&gl, 7, 8), [0, 0, 255, 255]);
}

#[test]
fn test_line_mode_leaves_interior_empty() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    center_triangle(&mut gl).unwrap();
    let filled = lit_pixels(&gl);

    gl.clear(ClearMask::COLOR).unwrap();
    gl.polygon_mode(Face::FrontAndBack, PolygonMode::Line).unwrap();
    center_triangle(&mut gl).unwrap();
    let outlined = lit_pixels(&gl);

    assert!(outlined > 0 && outlined < filled);
    // Cleared to the default clear color, alpha included.
    assert_eq!(pixel(&gl, 7, 8), [0, 0, 0, 0]);
}

#[test]
fn test_diffuse_lighting_follows_enabled_lights() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.enable(Features::LIGHTING).unwrap();
    gl.enable(Capability::Light(0)).unwrap();
    gl.normal3(0.0, 0.0, 1.0).unwrap();
    center_triangle(&mut gl).unwrap();

    // 0.2 * 0.2 scene ambient plus 0.8 diffuse from light 0.
    let lit = pixel(&gl, 7, 8);
    assert!((213..=215).contains(&lit[0]), "{lit:?}");

    gl.disable(Capability::Light(0)).unwrap();
    center_triangle(&mut gl).unwrap();
    let ambient_only = pixel(&gl, 7, 8);
    assert!(ambient_only[0] < 20, "{ambient_only:?}");
}

#[test]
fn test_lights_traverse_most_recent_first() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    for i in [3, 1, 5] {
        gl.enable(Capability::Light(i)).unwrap();
    }
    assert_eq!(gl.enabled_lights(), vec![5, 1, 3]);

    gl.disable(Capability::Light(1)).unwrap();
    assert_eq!(gl.enabled_lights(), vec![5, 3]);
    assert!(gl.is_enabled(Capability::Light(5)));
    assert!(!gl.is_enabled(Capability::Light(1)));
}

#[test]
fn test_specular_tables_are_cached_per_shininess() {
    let mut fb = frame_buffer();
    let config = ContextConfig::new(64).with_specular_buffers(2);
    let mut gl = Context::with_config(&mut fb, &config).unwrap();
    gl.enable(Features::LIGHTING).unwrap();
    gl.enable(Capability::Light(0)).unwrap();
    gl.material(Face::Front, MaterialParam::Specular(Vec4::new(1.0, 1.0, 1.0, 1.0)))
        .unwrap();
    gl.normal3(0.0, 0.0, 1.0).unwrap();

    for shininess in [10.0, 20.0, 10.0, 30.0] {
        gl.material(Face::Front, MaterialParam::Shininess(shininess)).unwrap();
        center_triangle(&mut gl).unwrap();
    }

    let stats = gl.specular_stats();
    // One miss per new exponent, the rest of the vertices hit.
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.hits, 9);
    assert_eq!(stats.evictions, 1);
}

#[test]
fn test_growing_host_enlarges_frame_buffer() {
    let mut fb = frame_buffer();
    {
        let mut gl = context(&mut fb);
        gl.viewport(0, 0, 32, 24).unwrap();
        assert_eq!(gl.current_viewport().width, 32);
    }
    assert_eq!((fb.width(), fb.height()), (32, 24));
}

struct FixedHost;

impl RenderHost for FixedHost {
    fn resize_viewport(
        &mut self,
        fb: &mut FrameBuffer,
        width: usize,
        height: usize,
    ) -> Result<(), String> {
        if width > fb.width() || height > fb.height() {
            return Err("frame buffer is fixed".into());
        }
        Ok(())
    }
}

#[test]
fn test_rejected_viewport_keeps_previous() {
    let mut fb = frame_buffer();
    let mut gl = Context::with_host(&mut fb, &ContextConfig::new(64), Box::new(FixedHost)).unwrap();
    gl.viewport(0, 0, 8, 8).unwrap();

    let err = gl.viewport(0, 0, 64, 64).unwrap_err();
    assert!(matches!(err, GlError::ViewportResize { width: 64, height: 64, .. }));
    assert_eq!(gl.current_viewport().width, 8);
    assert!(matches!(gl.get_error(), Some(GlError::ViewportResize { .. })));
}

#[test]
fn test_matrix_calls_compose() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.translate(1.0, 2.0, 3.0).unwrap();
    gl.scale(2.0, 2.0, 2.0).unwrap();
    let m = gl.get_matrix(MatrixMode::ModelView);
    assert_relative_eq!(m[0], 2.0);
    assert_relative_eq!(m[12], 1.0);
    assert_relative_eq!(m[13], 2.0);
    assert_relative_eq!(m[14], 3.0);

    gl.push_matrix().unwrap();
    gl.load_identity().unwrap();
    assert_eq!(gl.matrix_depth(MatrixMode::ModelView), 2);
    gl.pop_matrix().unwrap();
    assert_relative_eq!(gl.get_matrix(MatrixMode::ModelView)[12], 1.0);
}
