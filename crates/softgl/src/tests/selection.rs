use super::*;
use crate::render::state::RenderMode;
use crate::GlError;

/// Draw `count` triangles in select mode, each under its own name
fn pick(gl: &mut Context<'_>, count: u32) -> GlResult<i64> {
    gl.render_mode(RenderMode::Select)?;
    gl.init_names()?;
    gl.push_name(0)?;
    for name in 0..count {
        gl.load_name(name)?;
        center_triangle(gl)?;
    }
    gl.render_mode(RenderMode::Render)
}

#[test]
fn test_hits_are_counted_until_overflow() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    // Each record is four words: count, zmin, zmax, one name.
    gl.select_buffer(12).unwrap();
    assert_eq!(pick(&mut gl, 3).unwrap(), 3);
    let hits = gl.selection_hits();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[2].names, vec![2]);
    assert!(hits.iter().all(|h| h.min_depth <= h.max_depth));

    gl.select_buffer(9).unwrap();
    assert_eq!(pick(&mut gl, 3).unwrap(), -2);
    assert_eq!(gl.selection_buffer().len(), 8);
}

#[test]
fn test_selection_writes_no_pixels() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.select_buffer(64).unwrap();
    pick(&mut gl, 2).unwrap();
    assert_eq!(lit_pixels(&gl), 0);
}

#[test]
fn test_primitives_under_one_name_merge() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.select_buffer(64).unwrap();

    gl.render_mode(RenderMode::Select).unwrap();
    gl.push_name(7).unwrap();
    center_triangle(&mut gl).unwrap();
    gl.translate(0.0, 0.0, 0.5).unwrap();
    center_triangle(&mut gl).unwrap();
    gl.push_name(8).unwrap();
    center_triangle(&mut gl).unwrap();
    assert_eq!(gl.render_mode(RenderMode::Render).unwrap(), 2);

    let hits = gl.selection_hits();
    assert_eq!(hits[0].names, vec![7]);
    assert!(hits[0].min_depth < hits[0].max_depth);
    assert_eq!(hits[1].names, vec![7, 8]);
}

#[test]
fn test_culled_and_clipped_primitives_do_not_hit() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.select_buffer(64).unwrap();
    gl.render_mode(RenderMode::Select).unwrap();
    gl.push_name(1).unwrap();
    gl.translate(5.0, 0.0, 0.0).unwrap();
    center_triangle(&mut gl).unwrap();
    assert_eq!(gl.render_mode(RenderMode::Render).unwrap(), 0);
}

#[test]
fn test_name_stack_outside_select_is_ignored() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    gl.pop_name().unwrap();
    gl.load_name(3).unwrap();
    assert_eq!(gl.get_error(), None);

    gl.render_mode(RenderMode::Select).unwrap();
    assert!(matches!(gl.load_name(3), Err(GlError::InvalidOperation(_))));
    assert!(matches!(gl.select_buffer(8), Err(GlError::InvalidOperation(_))));
    for i in 0..64 {
        gl.push_name(i).unwrap();
    }
    assert!(matches!(gl.push_name(64), Err(GlError::StackOverflow(_))));
}
