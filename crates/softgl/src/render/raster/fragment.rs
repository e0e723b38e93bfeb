//! Per-fragment operations

use super::Rasterizer;
use crate::foundation::math::{Vec2, Vec4};
use crate::render::framebuffer::{pack_color, unpack_color};
use crate::render::state::{BlendFactor, Features};

fn blend_weight(factor: BlendFactor, src: &Vec4, dst: &Vec4) -> Vec4 {
    let one = Vec4::new(1.0, 1.0, 1.0, 1.0);
    match factor {
        BlendFactor::Zero => Vec4::zeros(),
        BlendFactor::One => one,
        BlendFactor::SrcColor => *src,
        BlendFactor::OneMinusSrcColor => one - src,
        BlendFactor::DstColor => *dst,
        BlendFactor::OneMinusDstColor => one - dst,
        BlendFactor::SrcAlpha => Vec4::repeat(src.w),
        BlendFactor::OneMinusSrcAlpha => Vec4::repeat(1.0 - src.w),
        BlendFactor::DstAlpha => Vec4::repeat(dst.w),
        BlendFactor::OneMinusDstAlpha => Vec4::repeat(1.0 - dst.w),
        BlendFactor::SrcAlphaSaturate => {
            let f = src.w.min(1.0 - dst.w);
            Vec4::new(f, f, f, 1.0)
        }
    }
}

impl Rasterizer<'_> {
    /// Run one fragment through texture, alpha, depth and blend stages
    pub(super) fn fragment(&mut self, x: i32, y: i32, z: f32, color: Vec4, tex: Vec2) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let width = self.fb.width();
        if x >= width || y >= self.fb.height() {
            return;
        }
        let index = y * width + x;

        let mut src = color;
        if let Some(texture) = self.texture {
            src = src.component_mul(&texture.sample(tex.x, tex.y));
        }

        if self.features.contains(Features::ALPHA_TEST)
            && !self.state.alpha_func.test(src.w, self.state.alpha_ref)
        {
            return;
        }

        let z = (z + self.depth_offset).clamp(0.0, 1.0);
        let depth_test = self.features.contains(Features::DEPTH_TEST);
        if depth_test && !self.state.depth_func.test(z, *self.fb.depth_mut(index)) {
            return;
        }

        let dst_px = *self.fb.color_mut(index);
        let out = if self.features.contains(Features::BLEND) {
            let dst = unpack_color(dst_px);
            let sf = blend_weight(self.state.blend_src, &src, &dst);
            let df = blend_weight(self.state.blend_dst, &src, &dst);
            src.component_mul(&sf) + dst.component_mul(&df)
        } else {
            src
        };

        let packed = pack_color(&out);
        let mask = self.state.color_mask;
        let px = self.fb.color_mut(index);
        for ((dst, src), write) in px.iter_mut().zip(packed).zip(mask) {
            if write {
                *dst = src;
            }
        }
        if depth_test && self.state.depth_mask {
            *self.fb.depth_mut(index) = z;
        }
    }
}
