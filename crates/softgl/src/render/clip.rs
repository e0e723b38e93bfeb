//! Clip codes, frustum clipping and the viewport transform
//!
//! Clipping happens in homogeneous clip space against the six planes
//! `-w <= x, y, z <= w`. Clip codes use a slightly relaxed `w` so vertices that
//! land on a plane after an earlier clipping pass are not clipped again because
//! of rounding.

use bitflags::bitflags;

use crate::core::limits::CLIP_EPSILON;
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::vertex::{ScreenPoint, Vertex};

bitflags! {
    /// Frustum planes a clip-space point lies outside of
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClipCode: u8 {
        /// x < -w
        const LEFT = 1 << 0;
        /// x > w
        const RIGHT = 1 << 1;
        /// y < -w
        const BOTTOM = 1 << 2;
        /// y > w
        const TOP = 1 << 3;
        /// z < -w
        const NEAR = 1 << 4;
        /// z > w
        const FAR = 1 << 5;
    }
}

impl ClipCode {
    /// Compute the clip code of a clip-space coordinate
    pub fn of(c: &Vec4) -> Self {
        let w = c.w * (1.0 + CLIP_EPSILON);
        let mut code = Self::empty();
        code.set(Self::LEFT, c.x < -w);
        code.set(Self::RIGHT, c.x > w);
        code.set(Self::BOTTOM, c.y < -w);
        code.set(Self::TOP, c.y > w);
        code.set(Self::NEAR, c.z < -w);
        code.set(Self::FAR, c.z > w);
        code
    }
}

/// Signed distance-like value that is >= 0 on the inside of `plane`
#[inline]
fn plane_distance(plane: ClipCode, c: &Vec4) -> f32 {
    match plane {
        p if p == ClipCode::LEFT => c.w + c.x,
        p if p == ClipCode::RIGHT => c.w - c.x,
        p if p == ClipCode::BOTTOM => c.w + c.y,
        p if p == ClipCode::TOP => c.w - c.y,
        p if p == ClipCode::NEAR => c.w + c.z,
        _ => c.w - c.z,
    }
}

/// Parameter along `a -> b` where the segment crosses `plane`
#[inline]
fn intersect(plane: ClipCode, a: &Vertex, b: &Vertex) -> f32 {
    let da = plane_distance(plane, &a.clip);
    let db = plane_distance(plane, &b.clip);
    let denom = da - db;
    if denom.abs() <= f32::MIN_POSITIVE {
        0.0
    } else {
        (da / denom).clamp(0.0, 1.0)
    }
}

/// Clip a convex polygon against every plane in `planes`
///
/// Each plane pass walks the polygon's edges and emits zero, one or two
/// vertices per edge. Edges introduced along a clipping plane get a cleared
/// edge flag. Returns an empty vector when fewer than three vertices survive.
pub fn clip_polygon(vertices: &[Vertex], planes: ClipCode) -> Vec<Vertex> {
    let mut current: Vec<Vertex> = vertices.to_vec();
    let mut next: Vec<Vertex> = Vec::with_capacity(vertices.len() + 6);

    for plane in planes.iter() {
        if current.len() < 3 {
            break;
        }
        next.clear();
        for i in 0..current.len() {
            let a = &current[i];
            let b = &current[(i + 1) % current.len()];
            let a_in = !a.clip_code.contains(plane);
            let b_in = !b.clip_code.contains(plane);

            match (a_in, b_in) {
                (true, true) => next.push(*a),
                (true, false) => {
                    next.push(*a);
                    let mut v = a.lerp(b, intersect(plane, a, b));
                    v.clip_code.remove(plane);
                    // The edge leaving this vertex runs along the plane.
                    v.edge_flag = false;
                    next.push(v);
                }
                (false, true) => {
                    let mut v = a.lerp(b, intersect(plane, a, b));
                    v.clip_code.remove(plane);
                    v.edge_flag = a.edge_flag;
                    next.push(v);
                }
                (false, false) => {}
            }
        }
        std::mem::swap(&mut current, &mut next);
    }

    if current.len() < 3 {
        current.clear();
    }
    current
}

/// Clip a triangle against the view frustum
///
/// Fully inside: the three input vertices are returned unchanged. Entirely
/// outside one shared plane: empty. Otherwise the clipped convex polygon.
pub fn clip_triangle(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> Vec<Vertex> {
    let or = v0.clip_code | v1.clip_code | v2.clip_code;
    if or.is_empty() {
        return vec![*v0, *v1, *v2];
    }
    if !(v0.clip_code & v1.clip_code & v2.clip_code).is_empty() {
        return Vec::new();
    }
    clip_polygon(&[*v0, *v1, *v2], or)
}

/// Clip a segment against the view frustum (Liang–Barsky in clip space)
pub fn clip_line(a: &Vertex, b: &Vertex) -> Option<(Vertex, Vertex)> {
    let or = a.clip_code | b.clip_code;
    if or.is_empty() {
        return Some((*a, *b));
    }
    if !(a.clip_code & b.clip_code).is_empty() {
        return None;
    }

    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    for plane in or.iter() {
        let da = plane_distance(plane, &a.clip);
        let db = plane_distance(plane, &b.clip);
        // Codes use a relaxed w, so decide from the distances themselves.
        match (da >= 0.0, db >= 0.0) {
            (true, true) => continue,
            (false, false) => return None,
            (false, true) => t_min = t_min.max(da / (da - db)),
            (true, false) => t_max = t_max.min(da / (da - db)),
        }
        if t_min > t_max {
            return None;
        }
    }

    let mut ca = if t_min > 0.0 { a.lerp(b, t_min) } else { *a };
    let mut cb = if t_max < 1.0 { a.lerp(b, t_max) } else { *b };
    // Endpoints now lie on or inside the planes; drop rounding residue.
    ca.clip_code &= !or;
    cb.clip_code &= !or;
    Some((ca, cb))
}

/// Mapping from normalized device coordinates to window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    scale: Vec3,
    trans: Vec3,
}

impl Viewport {
    /// Viewport covering `width x height` pixels at `(x, y)` from the top-left
    pub fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        let half_w = (width as f32 - 0.5) / 2.0;
        let half_h = (height as f32 - 0.5) / 2.0;
        Self {
            x,
            y,
            width,
            height,
            scale: Vec3::new(half_w, -half_h, 0.5),
            trans: Vec3::new(x as f32 + half_w, y as f32 + half_h, 0.5),
        }
    }

    /// Project a clip-space vertex to the window; `texturing` selects whether
    /// texture coordinates are carried along
    pub fn project(&self, v: &Vertex, texturing: bool) -> ScreenPoint {
        let inv_w = if v.clip.w.abs() > f32::MIN_POSITIVE {
            1.0 / v.clip.w
        } else {
            0.0
        };
        let ndc = v.clip.xyz() * inv_w;
        ScreenPoint {
            x: (ndc.x * self.scale.x + self.trans.x) as i32,
            y: (ndc.y * self.scale.y + self.trans.y) as i32,
            z: (ndc.z * self.scale.z + self.trans.z).clamp(0.0, 1.0),
            inv_w,
            color: v.color,
            tex: if texturing {
                let q = v.tex_coord.w;
                if q != 1.0 && q.abs() > f32::MIN_POSITIVE {
                    Vec2::new(v.tex_coord.x / q, v.tex_coord.y / q)
                } else {
                    Vec2::new(v.tex_coord.x, v.tex_coord.y)
                }
            } else {
                Vec2::zeros()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32, w: f32) -> Vertex {
        Vertex::from_clip(Vec4::new(x, y, z, w))
    }

    #[test]
    fn test_inside_points_have_empty_code() {
        let w = 2.0;
        let edge = w * (1.0 + CLIP_EPSILON * 0.5);
        for c in [
            Vec4::new(0.0, 0.0, 0.0, w),
            Vec4::new(edge, -edge, edge, w),
            Vec4::new(-edge, edge, -edge, w),
            Vec4::new(w, w, w, w),
        ] {
            assert_eq!(ClipCode::of(&c), ClipCode::empty(), "{c:?}");
        }
    }

    #[test]
    fn test_each_plane_sets_only_its_bit() {
        let cases = [
            (Vec4::new(-1.5, 0.0, 0.0, 1.0), ClipCode::LEFT),
            (Vec4::new(1.5, 0.0, 0.0, 1.0), ClipCode::RIGHT),
            (Vec4::new(0.0, -1.5, 0.0, 1.0), ClipCode::BOTTOM),
            (Vec4::new(0.0, 1.5, 0.0, 1.0), ClipCode::TOP),
            (Vec4::new(0.0, 0.0, -1.5, 1.0), ClipCode::NEAR),
            (Vec4::new(0.0, 0.0, 1.5, 1.0), ClipCode::FAR),
        ];
        for (c, expected) in cases {
            assert_eq!(ClipCode::of(&c), expected, "{c:?}");
        }
    }

    #[test]
    fn test_inside_triangle_is_unchanged() {
        let (a, b, c) = (v(-0.5, -0.5, 0.0, 1.0), v(0.5, -0.5, 0.0, 1.0), v(0.0, 0.5, 0.0, 1.0));
        let out = clip_triangle(&a, &b, &c);
        assert_eq!(out, vec![a, b, c]);
    }

    #[test]
    fn test_triangle_outside_single_plane_is_rejected() {
        let out = clip_triangle(&v(2.0, 0.0, 0.0, 1.0), &v(3.0, 1.0, 0.0, 1.0), &v(2.5, -1.0, 0.0, 1.0));
        assert!(out.is_empty());
        let out = clip_triangle(&v(0.0, 0.0, -2.0, 1.0), &v(0.5, 0.0, -3.0, 1.0), &v(0.0, 0.5, -2.0, 1.0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_partial_triangle_is_clipped_to_quad() {
        // One vertex past the right plane cuts off a corner: 3 -> 4 vertices.
        let out = clip_triangle(&v(0.0, -0.5, 0.0, 1.0), &v(2.0, 0.0, 0.0, 1.0), &v(0.0, 0.5, 0.0, 1.0));
        assert_eq!(out.len(), 4);
        for vert in &out {
            assert!(vert.clip_code.is_empty());
            assert!(vert.clip.x <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_clipping_edges_lose_edge_flag() {
        let out = clip_triangle(&v(0.0, -0.5, 0.0, 1.0), &v(2.0, 0.0, 0.0, 1.0), &v(0.0, 0.5, 0.0, 1.0));
        // Exactly one new edge runs along the right plane.
        let flagged_off = out.iter().filter(|v| !v.edge_flag).count();
        assert_eq!(flagged_off, 1);
    }

    #[test]
    fn test_line_clipping() {
        let (a, b) = clip_line(&v(-2.0, 0.0, 0.0, 1.0), &v(0.0, 0.0, 0.0, 1.0)).unwrap();
        assert!((a.clip.x + 1.0).abs() < 1e-5);
        assert_eq!(b.clip.x, 0.0);
        assert!(clip_line(&v(2.0, 0.0, 0.0, 1.0), &v(3.0, 0.0, 0.0, 1.0)).is_none());
        // Crosses two corners but misses the frustum.
        assert!(clip_line(&v(-3.0, 1.0, 0.0, 1.0), &v(1.0, 5.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_line_behind_eye_keeps_visible_part() {
        // `a` is flagged on every plane by its relaxed code but sits inside
        // the right plane by distance; only the left crossing may clip it.
        let a = v(-1.000_005, 0.0, 0.0, -1.0);
        let b = v(0.0, 0.0, 0.0, 1.0);
        assert!(a.clip_code.contains(ClipCode::RIGHT | ClipCode::LEFT));
        assert!(b.clip_code.is_empty());

        let (ca, cb) = clip_line(&a, &b).unwrap();
        assert_eq!(cb.clip, b.clip);
        assert!(ca.clip.w > 0.0);
        assert!((ca.clip.x + ca.clip.w).abs() < 1e-4, "{:?}", ca.clip);
        assert!(ca.clip.w - ca.clip.x >= 0.0);
    }

    #[test]
    fn test_projective_tex_coords_divide_by_q() {
        let vp = Viewport::new(0, 0, 8, 8);
        let mut vert = v(0.0, 0.0, 0.0, 1.0);
        vert.tex_coord = Vec4::new(1.0, 0.5, 0.0, 2.0);
        let p = vp.project(&vert, true);
        assert_eq!(p.tex, Vec2::new(0.5, 0.25));

        vert.tex_coord = Vec4::new(1.0, 0.5, 0.0, 1.0);
        assert_eq!(vp.project(&vert, true).tex, Vec2::new(1.0, 0.5));
        assert_eq!(vp.project(&vert, false).tex, Vec2::zeros());
    }

    #[test]
    fn test_viewport_maps_corners_inside() {
        let vp = Viewport::new(0, 0, 100, 50);
        let tl = vp.project(&v(-1.0, 1.0, -1.0, 1.0), false);
        let br = vp.project(&v(1.0, -1.0, 1.0, 1.0), false);
        assert_eq!((tl.x, tl.y), (0, 0));
        assert_eq!((br.x, br.y), (99, 49));
        assert_eq!(tl.z, 0.0);
        assert_eq!(br.z, 1.0);
    }
}
