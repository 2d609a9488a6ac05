//! Brain: a wrinkled, slightly flattened sphere split by the longitudinal fissure.

use visceral_core::Vec3;

use super::log_synthesized;
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{band_sum, displace_along_normals, reshape, sample_displacements, NoiseBand};

const RADIUS: f32 = 0.32;
const WIDTH_SEGMENTS: u32 = 128;
const HEIGHT_SEGMENTS: u32 = 96;

/// Gyri at three scales: fine, medium, large.
const WRINKLES: [NoiseBand; 3] = [
    NoiseBand::new(18.0, 6, 2.3, 0.5, 0.012),
    NoiseBand::new(10.0, 5, 2.2, 0.55, 0.018),
    NoiseBand::new(4.0, 4, 2.0, 0.5, 0.022),
];

const FISSURE_HALF_WIDTH: f32 = 0.025;
const FISSURE_DEPTH: f32 = 0.035;

/// Vertical squash applied after the detail is sampled.
const HEIGHT_SCALE: f32 = 0.85;

/// Feature masks carved into the hemispheres, in primitive coordinates.
#[must_use]
pub fn sulci(p: Vec3) -> f32 {
    let longitudinal = if p.x.abs() < FISSURE_HALF_WIDTH {
        -FISSURE_DEPTH * (1.0 - p.x.abs() / FISSURE_HALF_WIDTH)
    } else {
        0.0
    };
    let lateral = if (p.y - 0.05).abs() < 0.03 && p.x.abs() > 0.1 {
        -0.02
    } else {
        0.0
    };
    longitudinal + lateral
}

/// Flattened base and rounded occipital pole.
fn silhouette(p: Vec3) -> f32 {
    let flatten_bottom = if p.y < -0.15 { (p.y + 0.15) * 0.35 } else { 0.0 };
    let round_back = if p.z < -0.1 { (p.z + 0.1) * 0.2 } else { 0.0 };
    flatten_bottom + round_back
}

/// Synthesize the brain mesh.
#[must_use]
pub fn create_brain_geometry() -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

    // every term reads the unsquashed sphere
    let detail = sample_displacements(&mesh, |p| band_sum(&WRINKLES, p) + sulci(p) + silhouette(p));
    reshape(&mut mesh, |p| p.scale_by(1.0, HEIGHT_SCALE, 1.0));
    displace_along_normals(&mut mesh, |i, _| detail[i]);

    mesh.recompute_normals();
    log_synthesized("brain", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brain_is_valid_and_flattened() {
        let mesh = create_brain_geometry();
        assert_eq!(mesh.vertex_count(), 129 * 97);
        assert!(mesh.validate().is_ok());

        let size = mesh.bounds().unwrap().size();
        assert!(size.y < size.x, "brain should be wider than tall: {size:?}");
    }

    #[test]
    fn test_fissure_is_deepest_at_midline() {
        assert!(sulci(Vec3::new(0.0, 0.2, 0.1)) < sulci(Vec3::new(0.02, 0.2, 0.1)));
        assert_eq!(sulci(Vec3::new(0.05, 0.2, 0.1)), 0.0);
        assert_eq!(sulci(Vec3::new(0.2, 0.05, 0.0)), -0.02);
    }
}
