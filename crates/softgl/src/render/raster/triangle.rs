//! Triangle scan conversion with edge functions

use super::Rasterizer;
use crate::foundation::math::{Vec2, Vec4};
use crate::render::vertex::ScreenPoint;

/// Twice the signed area of `(a, b, p)`; positive when `p` is on the inner
/// side of `a -> b` for the winding the rasterizer normalizes to
#[inline]
fn edge(a: &ScreenPoint, b: &ScreenPoint, px: i64, py: i64) -> i64 {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    let (bx, by) = (i64::from(b.x), i64::from(b.y));
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Top and left edges own the pixels lying exactly on them
#[inline]
fn is_top_left(a: &ScreenPoint, b: &ScreenPoint) -> bool {
    let dy = b.y - a.y;
    let dx = b.x - a.x;
    (dy == 0 && dx > 0) || dy < 0
}

/// Largest absolute depth gradient of the triangle's plane, per pixel
pub fn depth_slope(p0: &ScreenPoint, p1: &ScreenPoint, p2: &ScreenPoint) -> f32 {
    let (x1, y1) = ((p1.x - p0.x) as f32, (p1.y - p0.y) as f32);
    let (x2, y2) = ((p2.x - p0.x) as f32, (p2.y - p0.y) as f32);
    let (z1, z2) = (p1.z - p0.z, p2.z - p0.z);
    let det = x1 * y2 - x2 * y1;
    if det == 0.0 {
        return 0.0;
    }
    let dzdx = (z1 * y2 - z2 * y1) / det;
    let dzdy = (x1 * z2 - x2 * z1) / det;
    dzdx.abs().max(dzdy.abs())
}

impl Rasterizer<'_> {
    /// Fill a triangle
    ///
    /// `flat` replaces the interpolated color when flat shading is in effect.
    /// Zero-area triangles draw nothing.
    pub fn draw_triangle(
        &mut self,
        p0: &ScreenPoint,
        p1: &ScreenPoint,
        p2: &ScreenPoint,
        flat: Option<Vec4>,
    ) {
        let mut area = edge(p0, p1, i64::from(p2.x), i64::from(p2.y));
        if area == 0 {
            return;
        }
        let (p0, p1, p2) = if area < 0 {
            area = -area;
            (p0, p2, p1)
        } else {
            (p0, p1, p2)
        };

        let max_x = self.fb.width() as i32 - 1;
        let max_y = self.fb.height() as i32 - 1;
        let min_px = p0.x.min(p1.x).min(p2.x).max(0);
        let max_px = p0.x.max(p1.x).max(p2.x).min(max_x);
        let min_py = p0.y.min(p1.y).min(p2.y).max(0);
        let max_py = p0.y.max(p1.y).max(p2.y).min(max_y);
        if min_px > max_px || min_py > max_py {
            return;
        }

        let bias = |a: &ScreenPoint, b: &ScreenPoint| i64::from(!is_top_left(a, b));
        let (bias0, bias1, bias2) = (bias(p1, p2), bias(p2, p0), bias(p0, p1));

        // Edge function increments per pixel step.
        let (step0_x, step0_y) = (-i64::from(p2.y - p1.y), i64::from(p2.x - p1.x));
        let (step1_x, step1_y) = (-i64::from(p0.y - p2.y), i64::from(p0.x - p2.x));
        let (step2_x, step2_y) = (-i64::from(p1.y - p0.y), i64::from(p1.x - p0.x));

        let (sx, sy) = (i64::from(min_px), i64::from(min_py));
        let mut row0 = edge(p1, p2, sx, sy);
        let mut row1 = edge(p2, p0, sx, sy);
        let mut row2 = edge(p0, p1, sx, sy);

        let inv_area = 1.0 / area as f32;
        let c0 = p0.color * p0.inv_w;
        let c1 = p1.color * p1.inv_w;
        let c2 = p2.color * p2.inv_w;
        let t0 = p0.tex * p0.inv_w;
        let t1 = p1.tex * p1.inv_w;
        let t2 = p2.tex * p2.inv_w;

        for y in min_py..=max_py {
            let (mut w0, mut w1, mut w2) = (row0, row1, row2);
            for x in min_px..=max_px {
                if w0 - bias0 >= 0 && w1 - bias1 >= 0 && w2 - bias2 >= 0 {
                    let l0 = w0 as f32 * inv_area;
                    let l1 = w1 as f32 * inv_area;
                    let l2 = w2 as f32 * inv_area;

                    let z = l0 * p0.z + l1 * p1.z + l2 * p2.z;
                    let iw = l0 * p0.inv_w + l1 * p1.inv_w + l2 * p2.inv_w;
                    let (color, tex) = if iw.abs() > f32::MIN_POSITIVE {
                        let color = flat.unwrap_or_else(|| (c0 * l0 + c1 * l1 + c2 * l2) / iw);
                        let tex: Vec2 = (t0 * l0 + t1 * l1 + t2 * l2) / iw;
                        (color, tex)
                    } else {
                        let color = flat.unwrap_or_else(|| p0.color * l0 + p1.color * l1 + p2.color * l2);
                        (color, p0.tex * l0 + p1.tex * l1 + p2.tex * l2)
                    };

                    self.fragment(x, y, z, color, tex);
                }
                w0 += step0_x;
                w1 += step1_x;
                w2 += step2_x;
            }
            row0 += step0_y;
            row1 += step1_y;
            row2 += step2_y;
        }
    }
}
