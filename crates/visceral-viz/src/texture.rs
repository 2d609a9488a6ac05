//! Procedural surface textures.
//!
//! Three rasterizers share the noise field used by shape synthesis:
//!
//! | Map       | Bands (freq, octaves, lacunarity, gain)            | Encoding          |
//! |-----------|----------------------------------------------------|-------------------|
//! | Color     | 40/4/2.2/0.5, 15/3/2.0/0.6, 5/2/2.0/0.55 + veins   | base RGB × (1+v)  |
//! | Normal    | 60/6/2.3/0.45, 30/4/2.1/0.5, 10/3/2.0/0.5 → height | `(n·0.5+0.5)·255` |
//! | Roughness | 20/4/2.0/0.5                                       | grayscale         |
//!
//! Pixel `(x, y)` samples the bands at `u = x / width`, `v = y / height`.
//! Every map is RGBA8 with opaque alpha.

use tracing::warn;
use visceral_core::{Rgb, Vec3};
use visceral_mesh::shaping::NoiseBand;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::TextureConfig;
use crate::error::TextureError;
use crate::timing::SynthesisTimer;

/// Largest side of a raster surface.
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

const CHANNELS: usize = 4;

// ============================================================================
// Noise bands
// ============================================================================

const fn band_at(frequency: f32, octaves: u32, lacunarity: f32, gain: f32, amplitude: f32, z: f32) -> NoiseBand {
    NoiseBand::new(frequency, octaves, lacunarity, gain, amplitude).with_offset(Vec3::new(0.0, 0.0, z))
}

const COLOR_BANDS: [NoiseBand; 3] = [
    band_at(40.0, 4, 2.2, 0.5, 0.08, 0.0),
    band_at(15.0, 3, 2.0, 0.6, 0.12, 1.0),
    band_at(5.0, 2, 2.0, 0.55, 0.15, 2.0),
];
const VEIN_BAND: NoiseBand = band_at(25.0, 4, 2.5, 0.4, 1.0, 3.0);
const VEIN_DARKENING: f32 = 0.25;

const HEIGHT_BANDS: [NoiseBand; 3] = [
    band_at(60.0, 6, 2.3, 0.45, 0.5, 0.0),
    band_at(30.0, 4, 2.1, 0.5, 0.3, 1.0),
    band_at(10.0, 3, 2.0, 0.5, 0.2, 2.0),
];

const ROUGHNESS_BAND: NoiseBand = band_at(20.0, 4, 2.0, 0.5, 0.2, 5.0);

// ============================================================================
// TextureMap
// ============================================================================

/// Which rasterizer produced a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKind {
    /// Albedo with vascular markings
    Color,
    /// Tangent-space normal map
    Normal,
    /// Grayscale roughness
    Roughness,
}

impl TextureKind {
    /// Short name for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Normal => "normal",
            Self::Roughness => "roughness",
        }
    }
}

/// An immutable RGBA8 image.
///
/// A zero-sized map is the placeholder handed out when no raster surface
/// could be allocated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureMap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TextureMap {
    /// The empty placeholder map.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// True for the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.data.is_empty()
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width * height`.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// Row-major RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = self.data.get(i..i + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Mean of each channel in `[0, 255]`; zeros for the placeholder.
    #[must_use]
    pub fn channel_means(&self) -> [f32; 4] {
        let n = self.pixel_count();
        if n == 0 {
            return [0.0; 4];
        }
        let mut sums = [0u64; 4];
        for px in self.data.chunks_exact(CHANNELS) {
            for (sum, &c) in sums.iter_mut().zip(px) {
                *sum += u64::from(c);
            }
        }
        sums.map(|s| s as f32 / n as f32)
    }
}

// ============================================================================
// Raster surface
// ============================================================================

/// A writable RGBA8 surface, validated at allocation.
struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterSurface {
    fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimension { width, height });
        }
        if width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
            return Err(TextureError::DimensionTooLarge {
                width,
                height,
                max: MAX_TEXTURE_DIMENSION,
            });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        })
    }

    /// Write every pixel from `shade(x, y)`, row by row.
    fn fill<F>(&mut self, shade: F)
    where
        F: Fn(u32, u32) -> [u8; 4] + Sync,
    {
        let row_len = self.width as usize * CHANNELS;

        let shade_row = |(y, row): (usize, &mut [u8])| {
            for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                px.copy_from_slice(&shade(x as u32, y as u32));
            }
        };

        #[cfg(feature = "parallel")]
        self.data.par_chunks_mut(row_len).enumerate().for_each(shade_row);

        #[cfg(not(feature = "parallel"))]
        self.data.chunks_mut(row_len).enumerate().for_each(shade_row);
    }

    fn into_map(self) -> TextureMap {
        TextureMap {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

#[inline]
fn uv(x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    Vec3::new(x as f32 / width as f32, y as f32 / height as f32, 0.0)
}

fn or_placeholder(kind: TextureKind, result: Result<TextureMap, TextureError>) -> TextureMap {
    result.unwrap_or_else(|err| {
        warn!(kind = kind.as_str(), %err, "Raster surface unavailable; using placeholder texture");
        TextureMap::placeholder()
    })
}

// ============================================================================
// Color map
// ============================================================================

/// Multiplicative color variation at `p` (UV space), veins included.
#[must_use]
pub fn color_variation(p: Vec3, vein_threshold: f32) -> f32 {
    let variation: f32 = COLOR_BANDS.iter().map(|band| band.sample(p)).sum();
    let vein = if VEIN_BAND.raw(p).abs() < vein_threshold {
        -VEIN_DARKENING
    } else {
        0.0
    };
    1.0 + variation + vein
}

/// Rasterize a color map for `base`.
///
/// # Errors
///
/// Returns [`TextureError`] if the configured dimensions cannot back a
/// raster surface.
pub fn try_create_organ_texture(base: Rgb, config: &TextureConfig) -> Result<TextureMap, TextureError> {
    let (width, height) = (config.width, config.height);
    let mut surface = RasterSurface::new(width, height)?;
    let [r, g, b] = base.to_f32();
    let threshold = config.vein_threshold;

    let timer = SynthesisTimer::raster(TextureKind::Color.as_str(), width, height);
    timer.in_scope(|| {
        surface.fill(|x, y| {
            let k = color_variation(uv(x, y, width, height), threshold);
            let ch = |c: f32| (c * 255.0 * k).clamp(0.0, 255.0).round() as u8;
            [ch(r), ch(g), ch(b), 255]
        });
    });

    Ok(surface.into_map())
}

/// Rasterize a color map, or return the placeholder on failure.
#[must_use]
pub fn create_organ_texture(base: Rgb, config: &TextureConfig) -> TextureMap {
    or_placeholder(TextureKind::Color, try_create_organ_texture(base, config))
}

// ============================================================================
// Normal map
// ============================================================================

/// Height field sample at `p` (UV space).
#[must_use]
pub fn surface_height(p: Vec3) -> f32 {
    HEIGHT_BANDS.iter().map(|band| band.sample(p)).sum()
}

/// Encode a unit component in `[-1, 1]` as a byte.
#[inline]
fn encode_component(c: f32) -> u8 {
    ((c * 0.5 + 0.5) * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// Rasterize a tangent-space normal map.
///
/// Gradients use central differences with edge-clamped neighbors.
///
/// # Errors
///
/// Returns [`TextureError`] if the configured dimensions cannot back a
/// raster surface.
pub fn try_create_normal_map(config: &TextureConfig) -> Result<TextureMap, TextureError> {
    let (width, height) = (config.width, config.height);
    let mut surface = RasterSurface::new(width, height)?;

    let timer = SynthesisTimer::raster(TextureKind::Normal.as_str(), width, height);
    timer.in_scope(|| {
        let w = width as usize;
        let cells = w * height as usize;

        #[cfg(feature = "parallel")]
        let heights: Vec<f32> = (0..cells)
            .into_par_iter()
            .map(|i| surface_height(uv((i % w) as u32, (i / w) as u32, width, height)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let heights: Vec<f32> = (0..cells)
            .map(|i| surface_height(uv((i % w) as u32, (i / w) as u32, width, height)))
            .collect();

        let at = |x: u32, y: u32| heights[y as usize * w + x as usize];

        surface.fill(|x, y| {
            let left = at(x.saturating_sub(1), y);
            let right = at((x + 1).min(width - 1), y);
            let up = at(x, y.saturating_sub(1));
            let down = at(x, (y + 1).min(height - 1));

            let dx = (right - left) * 0.5;
            let dy = (down - up) * 0.5;
            let n = Vec3::new(-dx, -dy, 1.0).normalized();

            [encode_component(n.x), encode_component(n.y), encode_component(n.z), 255]
        });
    });

    Ok(surface.into_map())
}

/// Rasterize a normal map, or return the placeholder on failure.
#[must_use]
pub fn create_normal_map(config: &TextureConfig) -> TextureMap {
    or_placeholder(TextureKind::Normal, try_create_normal_map(config))
}

// ============================================================================
// Roughness map
// ============================================================================

/// Rasterize a grayscale roughness map around `config.base_roughness`.
///
/// # Errors
///
/// Returns [`TextureError`] if the configured dimensions cannot back a
/// raster surface.
pub fn try_create_roughness_map(config: &TextureConfig) -> Result<TextureMap, TextureError> {
    let (width, height) = (config.width, config.height);
    let mut surface = RasterSurface::new(width, height)?;
    let base = config.base_roughness;

    let timer = SynthesisTimer::raster(TextureKind::Roughness.as_str(), width, height);
    timer.in_scope(|| {
        surface.fill(|x, y| {
            let roughness = (base + ROUGHNESS_BAND.sample(uv(x, y, width, height))).clamp(0.0, 1.0);
            let value = (roughness * 255.0).floor() as u8;
            [value, value, value, 255]
        });
    });

    Ok(surface.into_map())
}

/// Rasterize a roughness map, or return the placeholder on failure.
#[must_use]
pub fn create_roughness_map(config: &TextureConfig) -> TextureMap {
    or_placeholder(TextureKind::Roughness, try_create_roughness_map(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(width: u32, height: u32) -> TextureConfig {
        TextureConfig::default().with_size(width, height)
    }

    #[test]
    fn test_color_map_is_deterministic() {
        let base = Rgb::from_u32(0xC0_39_2B);
        let a = create_organ_texture(base, &small(32, 24));
        let b = create_organ_texture(base, &small(32, 24));
        assert_eq!(a, b);
        assert_eq!(a.pixel_count(), 32 * 24);
        assert_eq!(a.as_bytes().len(), 32 * 24 * 4);
    }

    #[test]
    fn test_pixel_count_scales_with_dimensions() {
        let base = Rgb::from_u32(0xE8_A0_A0);
        for (w, h) in [(8, 8), (16, 4), (3, 17)] {
            assert_eq!(create_organ_texture(base, &small(w, h)).pixel_count(), (w * h) as usize);
        }
    }

    #[test]
    fn test_color_map_is_opaque_and_near_base() {
        let base = Rgb::new(128, 64, 32);
        let map = create_organ_texture(base, &small(32, 32));
        let means = map.channel_means();
        assert_eq!(means[3], 255.0);
        assert!(means[0] > means[1] && means[1] > means[2]);
    }

    #[test]
    fn test_zero_dimension_yields_placeholder() {
        assert_eq!(
            try_create_normal_map(&small(0, 16)),
            Err(TextureError::ZeroDimension { width: 0, height: 16 })
        );
        let map = create_normal_map(&small(0, 16));
        assert!(map.is_placeholder());
        assert_eq!(map.pixel(0, 0), None);
    }

    #[test]
    fn test_oversized_surface_rejected() {
        let err = try_create_roughness_map(&small(MAX_TEXTURE_DIMENSION + 1, 1)).unwrap_err();
        assert!(matches!(err, TextureError::DimensionTooLarge { .. }));
        assert!(create_organ_texture(Rgb::WHITE, &small(1, MAX_TEXTURE_DIMENSION + 1)).is_placeholder());
    }

    #[test]
    fn test_normal_map_points_out_of_surface() {
        let map = create_normal_map(&small(64, 64));
        for y in 0..64 {
            for x in 0..64 {
                let [_, _, b, a] = map.pixel(x, y).unwrap();
                assert_eq!(a, 255);
                assert!(b >= 127, "pixel ({x}, {y}) has b = {b}");
            }
        }

        let [r, g, b, _] = map.channel_means();
        assert!(b > 200.0);
        assert!((87.0..167.0).contains(&r) && (87.0..167.0).contains(&g));
    }

    #[test]
    fn test_flat_normal_encoding() {
        assert_eq!(encode_component(0.0), 127);
        assert_eq!(encode_component(1.0), 255);
        assert_eq!(encode_component(-1.0), 0);
    }

    #[test]
    fn test_roughness_is_gray_and_bounded() {
        let mut config = small(16, 16);
        config.base_roughness = 0.95;
        let map = create_roughness_map(&config);
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b, _] = map.pixel(x, y).unwrap();
                assert!(r == g && g == b);
            }
        }
        let mean = map.channel_means()[0] / 255.0;
        assert!((0.6..=1.0).contains(&mean));
    }
}
