use super::*;
use crate::command::ListMode;
use crate::error::StackKind;
use crate::render::matrix::MatrixMode;
use crate::render::state::ClearMask;
use crate::GlError;

/// Shift right, then draw the center triangle in green
fn scene(gl: &mut Context<'_>) -> GlResult<()> {
    gl.translate(0.25, 0.0, 0.0)?;
    gl.color3(0.0, 1.0, 0.0)?;
    center_triangle(gl)
}

#[test]
fn test_replayed_list_matches_immediate_calls() {
    let mut immediate_fb = frame_buffer();
    let immediate_matrix = {
        let mut gl = context(&mut immediate_fb);
        scene(&mut gl).unwrap();
        scene(&mut gl).unwrap();
        gl.get_matrix(MatrixMode::ModelView)
    };

    let mut listed_fb = frame_buffer();
    let listed_matrix = {
        let mut gl = context(&mut listed_fb);
        gl.new_list(1, ListMode::Compile).unwrap();
        scene(&mut gl).unwrap();
        gl.end_list().unwrap();
        gl.call_list(1).unwrap();
        gl.call_list(1).unwrap();
        gl.get_matrix(MatrixMode::ModelView)
    };

    assert_eq!(immediate_matrix, listed_matrix);
    assert_eq!(immediate_fb.color_plane(), listed_fb.color_plane());
}

#[test]
fn test_compile_only_leaves_state_alone() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    gl.new_list(2, ListMode::Compile).unwrap();
    assert!(gl.is_compiling());
    scene(&mut gl).unwrap();
    gl.end_list().unwrap();
    assert_eq!(lit_pixels(&gl), 0);
    assert_eq!(gl.get_matrix(MatrixMode::ModelView)[12], 0.0);

    gl.new_list(3, ListMode::CompileAndExecute).unwrap();
    scene(&mut gl).unwrap();
    gl.end_list().unwrap();
    assert!(lit_pixels(&gl) > 0);
    assert!(gl.is_list(2) && gl.is_list(3));
}

#[test]
fn test_nested_lists_replay_in_order() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    gl.new_list(1, ListMode::Compile).unwrap();
    gl.translate(1.0, 0.0, 0.0).unwrap();
    gl.end_list().unwrap();

    gl.new_list(2, ListMode::Compile).unwrap();
    gl.call_list(1).unwrap();
    gl.scale(2.0, 2.0, 2.0).unwrap();
    gl.call_list(1).unwrap();
    gl.end_list().unwrap();

    gl.call_list(2).unwrap();
    // T * S * T moves the origin to x = 1 + 2 * 1.
    assert_eq!(gl.get_matrix(MatrixMode::ModelView)[12], 3.0);
}

#[test]
fn test_gen_and_delete_lists() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    let first = gl.gen_lists(3).unwrap();
    assert_eq!(first, 1);
    assert!((1..4).all(|n| gl.is_list(n)));
    assert_eq!(gl.gen_lists(2).unwrap(), 4);

    gl.delete_lists(2, 2).unwrap();
    assert!(gl.is_list(1) && !gl.is_list(2) && !gl.is_list(3) && gl.is_list(4));
    assert_eq!(gl.gen_lists(2).unwrap(), 2);

    assert!(matches!(gl.gen_lists(0), Err(GlError::InvalidValue(_))));
}

#[test]
fn test_unknown_list_is_reported() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);
    assert_eq!(gl.call_list(7), Err(GlError::UnknownList(7)));
    assert_eq!(gl.get_error(), Some(GlError::UnknownList(7)));
    assert_eq!(gl.get_error(), None);
}

#[test]
fn test_replay_continues_past_failing_op() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    gl.new_list(5, ListMode::Compile).unwrap();
    gl.pop_matrix().unwrap();
    gl.translate(0.5, 0.0, 0.0).unwrap();
    gl.end_list().unwrap();
    assert_eq!(gl.get_error(), None);

    gl.call_list(5).unwrap();
    assert_eq!(
        gl.get_error(),
        Some(GlError::StackUnderflow(StackKind::Matrix(MatrixMode::ModelView)))
    );
    assert_eq!(gl.get_matrix(MatrixMode::ModelView)[12], 0.5);
}

#[test]
fn test_list_bracketing_errors() {
    let mut fb = frame_buffer();
    let mut gl = context(&mut fb);

    assert!(matches!(gl.end_list(), Err(GlError::InvalidOperation(_))));
    assert!(matches!(gl.new_list(0, ListMode::Compile), Err(GlError::InvalidValue(_))));
    assert!(matches!(gl.new_list(1024, ListMode::Compile), Err(GlError::InvalidValue(_))));

    gl.new_list(1, ListMode::Compile).unwrap();
    assert!(matches!(gl.new_list(2, ListMode::Compile), Err(GlError::InvalidOperation(_))));
    gl.clear(ClearMask::COLOR).unwrap();
    gl.end_list().unwrap();
    assert!(!gl.is_compiling());
}

#[test]
fn test_long_lists_span_several_buffers() {
    let mut fb = frame_buffer();
    let config = crate::core::config::ContextConfig::new(64).with_op_buffer_slots(32);
    let mut gl = Context::with_config(&mut fb, &config).unwrap();

    gl.new_list(1, ListMode::Compile).unwrap();
    for _ in 0..20 {
        gl.translate(0.125, 0.0, 0.0).unwrap();
    }
    gl.end_list().unwrap();
    gl.call_list(1).unwrap();
    assert_eq!(gl.get_matrix(MatrixMode::ModelView)[12], 2.5);
}
