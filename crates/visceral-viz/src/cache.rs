//! Leased texture cache.
//!
//! Maps are synthesized on first [`TextureCache::acquire`] for a key and
//! shared between materials afterwards. Every acquire hands out a
//! [`TextureHandle`] that must be given back with [`TextureCache::release`];
//! the map is evicted when its last lease returns. [`TextureCache::clear`]
//! drops everything at view teardown.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use visceral_core::Rgb;

use crate::config::{RendererCapabilities, TextureConfig};
use crate::texture::{create_normal_map, create_organ_texture, create_roughness_map, TextureKind, TextureMap};

/// Synthesis parameters identifying one map.
///
/// Float parameters are keyed by their bit patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureKey {
    /// Rasterizer
    pub kind: TextureKind,
    /// Base color (color maps only)
    pub base: Option<Rgb>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Vein threshold or base roughness, as bits
    pub param_bits: u32,
}

impl TextureKey {
    /// Key of the color map for `base`.
    #[must_use]
    pub fn color(base: Rgb, config: &TextureConfig) -> Self {
        Self {
            kind: TextureKind::Color,
            base: Some(base),
            width: config.width,
            height: config.height,
            param_bits: config.vein_threshold.to_bits(),
        }
    }

    /// Key of the normal map.
    #[must_use]
    pub fn normal(config: &TextureConfig) -> Self {
        Self {
            kind: TextureKind::Normal,
            base: None,
            width: config.width,
            height: config.height,
            param_bits: 0,
        }
    }

    /// Key of the roughness map.
    #[must_use]
    pub fn roughness(config: &TextureConfig) -> Self {
        Self {
            kind: TextureKind::Roughness,
            base: None,
            width: config.width,
            height: config.height,
            param_bits: config.base_roughness.to_bits(),
        }
    }

    fn config(&self) -> TextureConfig {
        let mut config = TextureConfig::default().with_size(self.width, self.height);
        match self.kind {
            TextureKind::Color => config.vein_threshold = f32::from_bits(self.param_bits),
            TextureKind::Roughness => config.base_roughness = f32::from_bits(self.param_bits),
            TextureKind::Normal => {}
        }
        config
    }

    fn synthesize(&self) -> TextureMap {
        let config = self.config();
        match self.kind {
            TextureKind::Color => create_organ_texture(self.base.unwrap_or(Rgb::WHITE), &config),
            TextureKind::Normal => create_normal_map(&config),
            TextureKind::Roughness => create_roughness_map(&config),
        }
    }
}

/// A lease on a cached map.
///
/// Not `Clone`: each lease is returned exactly once, by value.
#[must_use = "texture leases must be returned with TextureCache::release"]
#[derive(Debug)]
pub struct TextureHandle {
    key: TextureKey,
    generation: u64,
    map: Arc<TextureMap>,
}

impl TextureHandle {
    /// Key the lease was acquired with.
    pub fn key(&self) -> TextureKey {
        self.key
    }

    /// The leased map.
    pub fn map(&self) -> &TextureMap {
        &self.map
    }
}

#[derive(Debug)]
struct Entry {
    map: Arc<TextureMap>,
    leases: usize,
    generation: u64,
}

/// Owns every synthesized map for a view.
#[derive(Debug)]
pub struct TextureCache {
    raster_surface: bool,
    entries: HashMap<TextureKey, Entry>,
    next_generation: u64,
}

impl TextureCache {
    /// Create an empty cache for a renderer.
    ///
    /// Without a raster surface every acquire yields the placeholder map.
    pub fn new(capabilities: &RendererCapabilities) -> Self {
        Self {
            raster_surface: capabilities.raster_surface,
            entries: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Lease the map for `key`, synthesizing it on a miss.
    pub fn acquire(&mut self, key: TextureKey) -> TextureHandle {
        let raster_surface = self.raster_surface;
        let next_generation = &mut self.next_generation;
        let entry = self.entries.entry(key).or_insert_with(|| {
            let map = if raster_surface {
                key.synthesize()
            } else {
                warn!(kind = key.kind.as_str(), "No raster surface; using placeholder texture");
                TextureMap::placeholder()
            };
            *next_generation += 1;
            Entry {
                map: Arc::new(map),
                leases: 0,
                generation: *next_generation,
            }
        });
        entry.leases += 1;

        TextureHandle {
            key,
            generation: entry.generation,
            map: Arc::clone(&entry.map),
        }
    }

    /// Return a lease. The map is evicted with its last lease.
    ///
    /// Leases taken before a [`clear`](Self::clear) are ignored, even when
    /// the key has since been acquired again.
    pub fn release(&mut self, handle: TextureHandle) {
        let TextureHandle { key, generation, .. } = handle;

        match self.entries.get_mut(&key) {
            Some(entry) if entry.generation != generation => {
                warn!(kind = key.kind.as_str(), "Released a lease from a cleared cache generation");
            }
            Some(entry) if entry.leases > 1 => entry.leases -= 1,
            Some(_) => {
                self.entries.remove(&key);
                debug!(kind = key.kind.as_str(), "Evicted texture");
            }
            None => warn!(kind = key.kind.as_str(), "Released a lease the cache does not hold"),
        }
    }

    /// Drop every map, returning how many leases were still outstanding.
    pub fn clear(&mut self) -> usize {
        let outstanding: usize = self.entries.values().map(|e| e.leases).sum();
        if outstanding > 0 {
            debug!(outstanding, "Clearing texture cache with live leases");
        }
        self.entries.clear();
        outstanding
    }

    /// Distinct maps held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no map is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outstanding leases on `key`.
    pub fn leases(&self, key: &TextureKey) -> usize {
        self.entries.get(key).map_or(0, |e| e.leases)
    }
}

/// The three maps backing one organ material.
#[derive(Debug)]
pub struct MaterialTextures {
    /// Color map
    pub color: TextureHandle,
    /// Shared normal map
    pub normal: TextureHandle,
    /// Shared roughness map
    pub roughness: TextureHandle,
}

impl MaterialTextures {
    /// Lease the maps for a material of color `base`.
    pub fn acquire(cache: &mut TextureCache, base: Rgb, config: &TextureConfig) -> Self {
        Self {
            color: cache.acquire(TextureKey::color(base, config)),
            normal: cache.acquire(TextureKey::normal(config)),
            roughness: cache.acquire(TextureKey::roughness(config)),
        }
    }

    /// Swap the color map for a new base color and release the old lease.
    pub fn replace(&mut self, cache: &mut TextureCache, base: Rgb, config: &TextureConfig) {
        let next = cache.acquire(TextureKey::color(base, config));
        let previous = std::mem::replace(&mut self.color, next);
        cache.release(previous);
    }

    /// Return all three leases.
    pub fn release(self, cache: &mut TextureCache) {
        cache.release(self.color);
        cache.release(self.normal);
        cache.release(self.roughness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TextureConfig {
        TextureConfig::default().with_size(8, 8)
    }

    #[test]
    fn test_acquire_shares_and_release_evicts() {
        let mut cache = TextureCache::new(&RendererCapabilities::full());
        let key = TextureKey::normal(&config());

        let a = cache.acquire(key);
        let b = cache.acquire(key);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.leases(&key), 2);
        assert_eq!(a.map(), b.map());

        cache.release(a);
        assert_eq!(cache.leases(&key), 1);
        cache.release(b);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_material_textures_share_normal_map() {
        let mut cache = TextureCache::new(&RendererCapabilities::full());
        let heart = MaterialTextures::acquire(&mut cache, Rgb::from_u32(0xC0_39_2B), &config());
        let lung = MaterialTextures::acquire(&mut cache, Rgb::from_u32(0xE8_A0_A0), &config());

        // two color maps, one normal map, one roughness map
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.leases(&TextureKey::normal(&config())), 2);

        heart.release(&mut cache);
        lung.release(&mut cache);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_returns_old_color_lease() {
        let mut cache = TextureCache::new(&RendererCapabilities::full());
        let old = Rgb::from_u32(0x8B_3A_3A);
        let new = Rgb::from_u32(0xD4_A5_74);

        let mut textures = MaterialTextures::acquire(&mut cache, old, &config());
        textures.replace(&mut cache, new, &config());

        assert_eq!(cache.leases(&TextureKey::color(old, &config())), 0);
        assert_eq!(cache.leases(&TextureKey::color(new, &config())), 1);
        assert_eq!(textures.color.key().base, Some(new));

        textures.release(&mut cache);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_reports_outstanding_and_late_release_is_harmless() {
        let mut cache = TextureCache::new(&RendererCapabilities::full());
        let handle = cache.acquire(TextureKey::roughness(&config()));
        assert_eq!(cache.clear(), 1);
        cache.release(handle);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_release_keeps_new_lease() {
        let mut cache = TextureCache::new(&RendererCapabilities::full());
        let key = TextureKey::normal(&config());

        let old = cache.acquire(key);
        assert_eq!(cache.clear(), 1);
        let new = cache.acquire(key);

        cache.release(old);
        assert_eq!(cache.leases(&key), 1);
        assert_eq!(cache.len(), 1);

        cache.release(new);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_raster_surface_yields_placeholders() {
        let mut cache = TextureCache::new(&RendererCapabilities::minimal());
        let handle = cache.acquire(TextureKey::color(Rgb::WHITE, &config()));
        assert!(handle.map().is_placeholder());
        cache.release(handle);
    }
}
