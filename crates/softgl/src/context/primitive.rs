//! Clip, project, cull and hand primitives to the rasterizer or to selection

use super::Context;
use crate::render::clip::{clip_line, clip_triangle};
use crate::render::raster::depth_slope;
use crate::render::state::{Features, FrontFace, PolygonMode, RenderMode, ShadeModel};
use crate::render::vertex::{ScreenPoint, Vertex};

/// Depth units are the smallest step of a 24-bit depth buffer.
const DEPTH_UNIT: f32 = 1.0 / (1 << 24) as f32;

/// Twice the signed window-space area of a polygon
fn signed_area(points: &[ScreenPoint]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y)
        })
        .sum()
}

fn depth_range(points: &[ScreenPoint]) -> (f32, f32) {
    points.iter().fold((1.0_f32, 0.0_f32), |(lo, hi), p| {
        (lo.min(p.z), hi.max(p.z))
    })
}

impl Context<'_> {
    fn selecting(&self) -> bool {
        self.render_mode == RenderMode::Select
    }

    fn texturing(&self) -> bool {
        self.features.contains(Features::TEXTURE_2D)
    }

    fn flat_color(&self, provoking: &Vertex, back: bool) -> Option<crate::foundation::math::Vec4> {
        (self.shade_model == ShadeModel::Flat).then_some(if back {
            provoking.back_color
        } else {
            provoking.color
        })
    }

    pub(super) fn draw_point(&mut self, v: &Vertex) {
        if !v.clip_code.is_empty() {
            return;
        }
        let p = self.viewport.project(v, self.texturing());
        if self.selecting() {
            self.selection.record(p.z, p.z);
            return;
        }
        self.rasterizer().draw_point(&p);
    }

    pub(super) fn draw_line(&mut self, a: &Vertex, b: &Vertex) {
        let Some((ca, cb)) = clip_line(a, b) else {
            return;
        };
        let texturing = self.texturing();
        let pa = self.viewport.project(&ca, texturing);
        let pb = self.viewport.project(&cb, texturing);
        if self.selecting() {
            self.selection.record(pa.z.min(pb.z), pa.z.max(pb.z));
            return;
        }
        let flat = self.flat_color(b, false);
        self.rasterizer().draw_line(&pa, &pb, flat);
    }

    /// Clip, cull and rasterize one triangle
    ///
    /// `provoking` supplies the color under flat shading.
    pub(super) fn draw_triangle(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, provoking: &Vertex) {
        let polygon = clip_triangle(v0, v1, v2);
        if polygon.len() < 3 {
            return;
        }
        let texturing = self.texturing();
        let mut points: Vec<ScreenPoint> = polygon
            .iter()
            .map(|v| self.viewport.project(v, texturing))
            .collect();

        // Window y grows downward, so counter-clockwise input has negative area.
        let area = signed_area(&points);
        if area == 0 {
            return;
        }
        let front = (area < 0) != (self.front_face == FrontFace::Cw);
        if self.features.contains(Features::CULL_FACE) {
            let culled = if front {
                self.cull_face.includes_front()
            } else {
                self.cull_face.includes_back()
            };
            if culled {
                return;
            }
        }

        if self.selecting() {
            let (lo, hi) = depth_range(&points);
            self.selection.record(lo, hi);
            return;
        }

        let use_back = !front && self.features.contains(Features::LIGHTING) && self.lighting.model.two_side;
        if use_back {
            for (p, v) in points.iter_mut().zip(&polygon) {
                p.color = v.back_color;
            }
        }
        let flat = self.flat_color(provoking, use_back);

        let mode = if front {
            self.polygon_mode.0
        } else {
            self.polygon_mode.1
        };
        let offset_flag = match mode {
            PolygonMode::Fill => Features::POLYGON_OFFSET_FILL,
            PolygonMode::Line => Features::POLYGON_OFFSET_LINE,
            PolygonMode::Point => Features::POLYGON_OFFSET_POINT,
        };
        let (factor, units) = self.polygon_offset;
        let offset = |a: &ScreenPoint, b: &ScreenPoint, c: &ScreenPoint| {
            factor * depth_slope(a, b, c) + units * DEPTH_UNIT
        };
        let use_offset = self.features.contains(offset_flag);

        let mut raster = self.rasterizer();
        let n = points.len();
        match mode {
            PolygonMode::Fill => {
                for i in 1..n - 1 {
                    let (a, b, c) = (&points[0], &points[i], &points[i + 1]);
                    if use_offset {
                        raster.set_depth_offset(offset(a, b, c));
                    }
                    raster.draw_triangle(a, b, c, flat);
                }
            }
            PolygonMode::Line => {
                if use_offset {
                    raster.set_depth_offset(offset(&points[0], &points[1], &points[2]));
                }
                for i in 0..n {
                    if polygon[i].edge_flag {
                        raster.draw_line(&points[i], &points[(i + 1) % n], flat);
                    }
                }
            }
            PolygonMode::Point => {
                if use_offset {
                    raster.set_depth_offset(offset(&points[0], &points[1], &points[2]));
                }
                for (p, v) in points.iter().zip(&polygon) {
                    if v.edge_flag {
                        let mut p = *p;
                        if let Some(c) = flat {
                            p.color = c;
                        }
                        raster.draw_point(&p);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint {
            x,
            y,
            ..ScreenPoint::default()
        }
    }

    #[test]
    fn test_signed_area_sign_follows_screen_winding() {
        // Clockwise on screen (y down) is positive.
        assert!(signed_area(&[at(0, 0), at(4, 0), at(0, 4)]) > 0);
        assert!(signed_area(&[at(0, 0), at(0, 4), at(4, 0)]) < 0);
        assert_eq!(signed_area(&[at(0, 0), at(2, 2), at(4, 4)]), 0);
    }

    #[test]
    fn test_depth_range_spans_points() {
        let mut a = at(0, 0);
        let mut b = at(1, 0);
        a.z = 0.7;
        b.z = 0.2;
        assert_eq!(depth_range(&[a, b]), (0.2, 0.7));
    }
}
