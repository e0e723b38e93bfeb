//! Texture storage and upload

pub mod image_util;
pub mod manager;

pub use manager::{Texture, TextureImage, TextureManager};

use crate::core::limits::MAX_TEXTURE_LEVELS;
use crate::error::{GlError, GlResult};
use crate::render::state::{TexFilter, TexFormat};

/// Side length of the stored image for `level`
pub fn level_size(texture_size: usize, level: usize) -> usize {
    (texture_size >> level.min(usize::BITS as usize - 1)).max(1)
}

/// Convert uploaded pixels into a level image at the internal texture size
///
/// Level 0 is resampled with `filter`; smaller levels always use nearest
/// sampling.
pub fn build_level(
    texture_size: usize,
    level: usize,
    format: TexFormat,
    width: usize,
    height: usize,
    data: &[u8],
    filter: TexFilter,
) -> GlResult<TextureImage> {
    if level >= MAX_TEXTURE_LEVELS {
        return Err(GlError::InvalidValue(format!("texture level {level}")));
    }
    if width == 0 || height == 0 {
        return Err(GlError::InvalidValue(format!("texture size {width}x{height}")));
    }
    let rgba = image_util::to_rgba(data, width, height, format).ok_or_else(|| {
        GlError::InvalidValue(format!(
            "texture data is {} bytes, expected {}",
            data.len(),
            width * height * format.bytes_per_pixel()
        ))
    })?;

    let size = level_size(texture_size, level);
    let pixels = if width == size && height == size {
        rgba
    } else if level == 0 && filter == TexFilter::Linear {
        image_util::resize_bilinear(&rgba, width, height, size, size)
    } else {
        image_util::resize_nearest(&rgba, width, height, size, size)
    };
    log::trace!("Texture level {level}: {width}x{height} -> {size}x{size}");

    Ok(TextureImage {
        width: size,
        height: size,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_sizes_shrink_to_one() {
        assert_eq!(level_size(256, 0), 256);
        assert_eq!(level_size(256, 3), 32);
        assert_eq!(level_size(256, 10), 1);
    }

    #[test]
    fn test_build_level_resamples_to_internal_size() {
        let data = vec![128u8; 3 * 3 * 3];
        let img = build_level(8, 0, TexFormat::Rgb8, 3, 3, &data, TexFilter::Linear).unwrap();
        assert_eq!((img.width, img.height), (8, 8));
        assert!(img.pixels.iter().all(|p| *p == [128, 128, 128, 255]));

        let img = build_level(8, 2, TexFormat::Rgb8, 3, 3, &data, TexFilter::Linear).unwrap();
        assert_eq!((img.width, img.height), (2, 2));
    }

    #[test]
    fn test_build_level_rejects_bad_input() {
        let data = vec![0u8; 4];
        assert!(build_level(8, MAX_TEXTURE_LEVELS, TexFormat::Rgba8, 1, 1, &data, TexFilter::Nearest).is_err());
        assert!(build_level(8, 0, TexFormat::Rgba8, 2, 1, &data, TexFilter::Nearest).is_err());
        assert!(build_level(8, 0, TexFormat::Rgba8, 0, 1, &data, TexFilter::Nearest).is_err());
    }
}
