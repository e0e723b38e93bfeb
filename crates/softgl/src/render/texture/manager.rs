//! Texture objects and the handle table that owns them
//!
//! Textures live in a slot-map arena. A fixed bucket table keyed by
//! `handle % TEXTURE_HASH_TABLE_SIZE` maps caller handles to arena keys, and
//! the arena itself is the enumeration list used at teardown.

use crate::core::limits::{MAX_TEXTURE_LEVELS, TEXTURE_HASH_TABLE_SIZE};
use crate::foundation::collections::{HandleMap, TextureKey};
use crate::foundation::math::Vec4;
use crate::render::framebuffer::{unpack_color, Rgba8};

/// One mipmap level: square RGBA8 pixels at the internal texture size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Row-major pixels
    pub pixels: Vec<Rgba8>,
}

impl TextureImage {
    /// Nearest sample at `(s, t)` with repeat wrapping
    pub fn sample(&self, s: f32, t: f32) -> Vec4 {
        if self.width == 0 || self.height == 0 {
            return Vec4::new(1.0, 1.0, 1.0, 1.0);
        }
        let wrap = |v: f32, size: usize| -> usize {
            let f = v - v.floor();
            ((f * size as f32) as usize).min(size - 1)
        };
        let x = wrap(s, self.width);
        let y = wrap(t, self.height);
        unpack_color(self.pixels[y * self.width + x])
    }
}

/// A texture object
#[derive(Debug, Clone)]
pub struct Texture {
    handle: u32,
    levels: [Option<TextureImage>; MAX_TEXTURE_LEVELS],
}

impl Texture {
    fn new(handle: u32) -> Self {
        Self {
            handle,
            levels: std::array::from_fn(|_| None),
        }
    }

    /// Caller-visible handle
    pub fn handle(&self) -> u32 {
        self.handle
    }

    /// Image at `level`, if one was uploaded
    pub fn level(&self, level: usize) -> Option<&TextureImage> {
        self.levels.get(level).and_then(Option::as_ref)
    }

    /// Replace the image at `level`; out-of-range levels are ignored
    pub fn set_level(&mut self, level: usize, image: TextureImage) {
        if let Some(slot) = self.levels.get_mut(level) {
            *slot = Some(image);
        }
    }

    /// Number of levels holding an image
    pub fn level_count(&self) -> usize {
        self.levels.iter().filter(|l| l.is_some()).count()
    }
}

/// Handle-keyed texture table
#[derive(Debug)]
pub struct TextureManager {
    arena: HandleMap<TextureKey, Texture>,
    buckets: Vec<Vec<TextureKey>>,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureManager {
    /// Empty table
    pub fn new() -> Self {
        Self {
            arena: HandleMap::with_key(),
            buckets: vec![Vec::new(); TEXTURE_HASH_TABLE_SIZE],
        }
    }

    fn bucket(handle: u32) -> usize {
        handle as usize % TEXTURE_HASH_TABLE_SIZE
    }

    fn key_of(&self, handle: u32) -> Option<TextureKey> {
        self.buckets[Self::bucket(handle)]
            .iter()
            .copied()
            .find(|k| self.arena.get(*k).is_some_and(|t| t.handle == handle))
    }

    /// Create an empty texture for `handle`
    ///
    /// An existing texture with the same handle is freed first, so there is
    /// exactly one entry per handle afterwards.
    pub fn alloc(&mut self, handle: u32) -> &mut Texture {
        if self.free(handle) {
            log::debug!("Texture {handle} re-allocated; previous levels released");
        }
        let key = self.arena.insert(Texture::new(handle));
        self.buckets[Self::bucket(handle)].push(key);
        &mut self.arena[key]
    }

    /// Remove `handle` and release its level images; false if unknown
    pub fn free(&mut self, handle: u32) -> bool {
        let Some(key) = self.key_of(handle) else {
            return false;
        };
        self.buckets[Self::bucket(handle)].retain(|k| *k != key);
        self.arena.remove(key);
        true
    }

    /// Texture for `handle`
    pub fn find(&self, handle: u32) -> Option<&Texture> {
        self.key_of(handle).map(|k| &self.arena[k])
    }

    /// Mutable texture for `handle`
    pub fn find_mut(&mut self, handle: u32) -> Option<&mut Texture> {
        let key = self.key_of(handle)?;
        self.arena.get_mut(key)
    }

    /// Whether `handle` is allocated
    pub fn contains(&self, handle: u32) -> bool {
        self.key_of(handle).is_some()
    }

    /// All allocated handles, in no particular order
    pub fn handles(&self) -> impl Iterator<Item = u32> + '_ {
        self.arena.values().map(Texture::handle)
    }

    /// Number of textures
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when no texture is allocated
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Release every texture
    pub fn clear(&mut self) {
        log::debug!("Releasing {} textures", self.arena.len());
        self.arena.clear();
        self.buckets.iter_mut().for_each(Vec::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: usize, px: Rgba8) -> TextureImage {
        TextureImage {
            width: size,
            height: size,
            pixels: vec![px; size * size],
        }
    }

    #[test]
    fn test_realloc_frees_previous_levels() {
        let mut mgr = TextureManager::new();
        mgr.alloc(7).set_level(0, solid(4, [255, 0, 0, 255]));
        assert_eq!(mgr.find(7).unwrap().level_count(), 1);

        mgr.alloc(7);
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.handles().filter(|h| *h == 7).count(), 1);
        assert_eq!(mgr.find(7).unwrap().level_count(), 0);
    }

    #[test]
    fn test_colliding_handles_share_bucket() {
        let mut mgr = TextureManager::new();
        let a = 3;
        let b = 3 + TEXTURE_HASH_TABLE_SIZE as u32;
        mgr.alloc(a);
        mgr.alloc(b).set_level(0, solid(1, [1, 2, 3, 4]));
        assert_eq!(mgr.find(a).unwrap().level_count(), 0);
        assert_eq!(mgr.find(b).unwrap().level_count(), 1);

        assert!(mgr.free(a));
        assert!(!mgr.contains(a));
        assert!(mgr.contains(b));
        assert!(!mgr.free(a));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut mgr = TextureManager::new();
        for h in 0..10 {
            mgr.alloc(h);
        }
        mgr.clear();
        assert!(mgr.is_empty());
        assert!(mgr.find(4).is_none());
    }

    #[test]
    fn test_sample_wraps() {
        let img = TextureImage {
            width: 2,
            height: 1,
            pixels: vec![[255, 0, 0, 255], [0, 0, 255, 255]],
        };
        assert_eq!(img.sample(0.25, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(0.75, 0.0), Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(img.sample(1.25, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(-0.25, 0.0), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }
}
