//! Shaping passes applied to a primitive before normal recomputation.
//!
//! Organs are built as a fixed sequence: primitive, anisotropic reshape,
//! noise detail, normals. Each pass here is a small function over the mesh
//! so the sequence reads the same in every synthesizer.

use visceral_core::{NoiseField, Vec3};
use visceral_core::noise::REFERENCE_FIELD;

use crate::mesh::Mesh;

/// One-dimensional Gaussian bump `exp(-((value - center) / width)^2)`.
#[inline]
#[must_use]
pub fn gaussian_bump(value: f32, center: f32, width: f32) -> f32 {
    let d = (value - center) / width;
    (-d * d).exp()
}

/// Separable 3D Gaussian bump with per-axis widths.
#[inline]
#[must_use]
pub fn gaussian_bump3(p: Vec3, center: Vec3, width: Vec3) -> f32 {
    let dx = (p.x - center.x) / width.x;
    let dy = (p.y - center.y) / width.y;
    let dz = (p.z - center.z) / width.z;
    (-dx * dx - dy * dy - dz * dz).exp()
}

/// One fbm layer: `fbm(p * frequency + offset) * amplitude`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseBand {
    /// Spatial frequency multiplier
    pub frequency: f32,
    /// Octave count
    pub octaves: u32,
    /// Frequency ratio between octaves
    pub lacunarity: f32,
    /// Amplitude ratio between octaves
    pub gain: f32,
    /// Output scale
    pub amplitude: f32,
    /// Offset added after frequency scaling
    pub offset: Vec3,
}

impl NoiseBand {
    /// Band with zero offset.
    #[must_use]
    pub const fn new(frequency: f32, octaves: u32, lacunarity: f32, gain: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            octaves,
            lacunarity,
            gain,
            amplitude,
            offset: Vec3::zero(),
        }
    }

    /// Builder: shift the sampling domain.
    #[must_use]
    pub const fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Evaluate on the reference field.
    #[must_use]
    pub fn sample(&self, p: Vec3) -> f32 {
        self.sample_field(&REFERENCE_FIELD, p)
    }

    /// Evaluate without the amplitude factor.
    #[must_use]
    pub fn raw(&self, p: Vec3) -> f32 {
        let f = self.frequency;
        REFERENCE_FIELD.fbm(
            p.x * f + self.offset.x,
            p.y * f + self.offset.y,
            p.z * f + self.offset.z,
            self.octaves,
            self.lacunarity,
            self.gain,
        )
    }

    /// Evaluate on an arbitrary field.
    #[must_use]
    pub fn sample_field(&self, field: &NoiseField, p: Vec3) -> f32 {
        let f = self.frequency;
        field.fbm(
            p.x * f + self.offset.x,
            p.y * f + self.offset.y,
            p.z * f + self.offset.z,
            self.octaves,
            self.lacunarity,
            self.gain,
        ) * self.amplitude
    }
}

/// Sum of several bands at `p`.
#[must_use]
pub fn band_sum(bands: &[NoiseBand], p: Vec3) -> f32 {
    bands.iter().map(|band| band.sample(p)).sum()
}

/// Anisotropic pass: move every vertex through `f`.
pub fn reshape<F>(mesh: &mut Mesh, mut f: F)
where
    F: FnMut(Vec3) -> Vec3,
{
    for p in &mut mesh.positions {
        *p = f(Vec3::from_array(*p)).to_array();
    }
}

/// Evaluate a scalar field at every vertex without moving anything.
///
/// Used when the detail must be sampled before a later reshape.
#[must_use]
pub fn sample_displacements<F>(mesh: &Mesh, mut f: F) -> Vec<f32>
where
    F: FnMut(Vec3) -> f32,
{
    mesh.positions.iter().map(|p| f(Vec3::from_array(*p))).collect()
}

/// Move each vertex along its current normal by `f(index, position)`.
///
/// Call before [`Mesh::recompute_normals`] so the primitive's analytic
/// normals are used.
pub fn displace_along_normals<F>(mesh: &mut Mesh, mut f: F)
where
    F: FnMut(usize, Vec3) -> f32,
{
    for (i, (p, n)) in mesh.positions.iter_mut().zip(&mesh.normals).enumerate() {
        let pos = Vec3::from_array(*p);
        let d = f(i, pos);
        *p = (pos + Vec3::from_array(*n) * d).to_array();
    }
}

/// Move each vertex radially, along its normalized position.
pub fn displace_along_position<F>(mesh: &mut Mesh, mut f: F)
where
    F: FnMut(usize, Vec3) -> f32,
{
    for (i, p) in mesh.positions.iter_mut().enumerate() {
        let pos = Vec3::from_array(*p);
        let d = f(i, pos);
        *p = (pos + pos.normalized() * d).to_array();
    }
}

/// Add `f(index, position)` to every coordinate axis.
///
/// Lathe and tube primitives use this instead of normal displacement.
pub fn displace_along_axes<F>(mesh: &mut Mesh, mut f: F)
where
    F: FnMut(usize, Vec3) -> f32,
{
    for (i, p) in mesh.positions.iter_mut().enumerate() {
        let d = f(i, Vec3::from_array(*p));
        p[0] += d;
        p[1] += d;
        p[2] += d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::uv_sphere;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_bump_shape() {
        assert_relative_eq!(gaussian_bump(0.06, 0.06, 0.04), 1.0);
        assert_relative_eq!(gaussian_bump(0.10, 0.06, 0.04), (-1.0f32).exp(), epsilon = 1e-6);
        assert!(gaussian_bump(1.0, 0.0, 0.05) < 1e-6);

        let c = Vec3::new(0.15, -0.05, 0.0);
        assert_relative_eq!(gaussian_bump3(c, c, Vec3::new(0.08, 0.06, 0.08)), 1.0);
    }

    #[test]
    fn test_noise_band_matches_fbm() {
        let band = NoiseBand::new(8.0, 3, 2.0, 0.5, 1.0).with_offset(Vec3::new(100.0, 0.0, 0.0));
        let p = Vec3::new(0.1, 0.2, 0.3);
        let expected = visceral_core::fbm(0.8 + 100.0, 1.6, 2.4, 3, 2.0, 0.5);
        assert_eq!(band.sample(p).to_bits(), expected.to_bits());
        assert_eq!(band.raw(p).to_bits(), expected.to_bits());
    }

    #[test]
    fn test_band_sum_is_additive() {
        let a = NoiseBand::new(18.0, 6, 2.3, 0.5, 0.012);
        let b = NoiseBand::new(4.0, 4, 2.0, 0.5, 0.022);
        let p = Vec3::new(0.3, -0.1, 0.2);
        assert_relative_eq!(band_sum(&[a, b], p), a.sample(p) + b.sample(p));
        assert_eq!(band_sum(&[], p), 0.0);
    }

    #[test]
    fn test_displace_along_normals_on_sphere() {
        let mut mesh = uv_sphere(1.0, 12, 6);
        displace_along_normals(&mut mesh, |_, _| 0.5);
        for p in &mesh.positions {
            assert_relative_eq!(Vec3::from_array(*p).length(), 1.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_displace_along_axes_and_reshape() {
        let mut mesh = uv_sphere(1.0, 12, 6);
        let before = mesh.positions.clone();
        reshape(&mut mesh, |p| p.scale_by(1.0, 0.5, 1.0));
        displace_along_axes(&mut mesh, |i, _| i as f32 * 0.001);

        for (i, (a, b)) in before.iter().zip(&mesh.positions).enumerate() {
            let d = i as f32 * 0.001;
            assert_relative_eq!(b[0], a[0] + d, epsilon = 1e-6);
            assert_relative_eq!(b[1], a[1] * 0.5 + d, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sample_displacements_does_not_move() {
        let mesh = uv_sphere(1.0, 8, 4);
        let d = sample_displacements(&mesh, |p| p.y);
        assert_eq!(d.len(), mesh.vertex_count());
        assert_eq!(d[0], mesh.positions[0][1]);
    }
}
