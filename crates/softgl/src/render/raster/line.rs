//! Lines and points

use super::Rasterizer;
use crate::foundation::math::Vec4;
use crate::render::vertex::ScreenPoint;

impl Rasterizer<'_> {
    /// Draw a single-pixel point
    pub fn draw_point(&mut self, p: &ScreenPoint) {
        self.fragment(p.x, p.y, p.z, p.color, p.tex);
    }

    /// Draw a line with a DDA walk along the major axis
    ///
    /// Both endpoints are drawn. `flat` replaces the interpolated color.
    pub fn draw_line(&mut self, a: &ScreenPoint, b: &ScreenPoint, flat: Option<Vec4>) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            let color = flat.unwrap_or(a.color);
            self.fragment(a.x, a.y, a.z.min(b.z), color, a.tex);
            return;
        }

        let ca = a.color * a.inv_w;
        let cb = b.color * b.inv_w;
        let ta = a.tex * a.inv_w;
        let tb = b.tex * b.inv_w;
        let inv_steps = 1.0 / steps as f32;

        for i in 0..=steps {
            let t = i as f32 * inv_steps;
            let x = a.x + (dx as f32 * t).round() as i32;
            let y = a.y + (dy as f32 * t).round() as i32;
            let z = a.z + (b.z - a.z) * t;
            let iw = a.inv_w + (b.inv_w - a.inv_w) * t;

            let (color, tex) = if iw.abs() > f32::MIN_POSITIVE {
                (ca.lerp(&cb, t) / iw, ta.lerp(&tb, t) / iw)
            } else {
                (a.color.lerp(&b.color, t), a.tex.lerp(&b.tex, t))
            };
            self.fragment(x, y, z, flat.unwrap_or(color), tex);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::foundation::math::Vec4;
    use crate::render::framebuffer::FrameBuffer;
    use crate::render::raster::{FragmentState, Rasterizer};
    use crate::render::state::Features;
    use crate::render::vertex::ScreenPoint;

    fn white(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint {
            x,
            y,
            z: 0.5,
            inv_w: 1.0,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            ..ScreenPoint::default()
        }
    }

    #[test]
    fn test_diagonal_line_hits_each_row_once() {
        let mut fb = FrameBuffer::new(6, 6);
        let state = FragmentState::default();
        let mut r = Rasterizer::new(&mut fb, &state, Features::empty(), None);
        r.draw_line(&white(0, 0), &white(5, 5), None);
        for i in 0..6 {
            assert_eq!(fb.read_pixel(i, i), Some([255, 255, 255, 255]));
        }
        let lit = fb.color_plane().iter().filter(|p| p[0] == 255).count();
        assert_eq!(lit, 6);
    }

    #[test]
    fn test_zero_length_line_is_a_point() {
        let mut fb = FrameBuffer::new(3, 3);
        let state = FragmentState::default();
        let mut r = Rasterizer::new(&mut fb, &state, Features::empty(), None);
        r.draw_line(&white(1, 2), &white(1, 2), None);
        assert_eq!(fb.read_pixel(1, 2), Some([255, 255, 255, 255]));
    }
}
