//! Pixel conversion and resampling for uploaded texture images

use crate::render::framebuffer::Rgba8;
use crate::render::state::TexFormat;

/// Expand packed `format` bytes into RGBA8 pixels
///
/// Returns `None` if `data` does not hold exactly `width * height` pixels.
pub fn to_rgba(data: &[u8], width: usize, height: usize, format: TexFormat) -> Option<Vec<Rgba8>> {
    let bpp = format.bytes_per_pixel();
    if data.len() != width.checked_mul(height)?.checked_mul(bpp)? {
        return None;
    }
    let pixels = data
        .chunks_exact(bpp)
        .map(|px| match format {
            TexFormat::Rgb8 => [px[0], px[1], px[2], 255],
            TexFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
        })
        .collect();
    Some(pixels)
}

/// Nearest-neighbour resample of a `src_w x src_h` image
pub fn resize_nearest(src: &[Rgba8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<Rgba8> {
    let mut out = Vec::with_capacity(dst_w * dst_h);
    for y in 0..dst_h {
        let sy = (y * src_h / dst_h).min(src_h - 1);
        for x in 0..dst_w {
            let sx = (x * src_w / dst_w).min(src_w - 1);
            out.push(src[sy * src_w + sx]);
        }
    }
    out
}

/// Bilinear resample of a `src_w x src_h` image
///
/// Sample centers are aligned so that a same-size resample is the identity.
pub fn resize_bilinear(src: &[Rgba8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<Rgba8> {
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;
    let mut out = Vec::with_capacity(dst_w * dst_h);

    for y in 0..dst_h {
        let fy = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (fy as usize).min(src_h - 1);
        let y1 = (y0 + 1).min(src_h - 1);
        let wy = fy - y0 as f32;

        for x in 0..dst_w {
            let fx = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (fx as usize).min(src_w - 1);
            let x1 = (x0 + 1).min(src_w - 1);
            let wx = fx - x0 as f32;

            let p00 = src[y0 * src_w + x0];
            let p10 = src[y0 * src_w + x1];
            let p01 = src[y1 * src_w + x0];
            let p11 = src[y1 * src_w + x1];

            let mut px = [0u8; 4];
            for (c, out_c) in px.iter_mut().enumerate() {
                let top = f32::from(p00[c]) * (1.0 - wx) + f32::from(p10[c]) * wx;
                let bottom = f32::from(p01[c]) * (1.0 - wx) + f32::from(p11[c]) * wx;
                *out_c = (top * (1.0 - wy) + bottom * wy + 0.5).clamp(0.0, 255.0) as u8;
            }
            out.push(px);
        }
    }
    out
}
