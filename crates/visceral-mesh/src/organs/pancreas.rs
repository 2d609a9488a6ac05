//! Pancreas: a tapering tube from the duodenal head to the splenic tail.

use visceral_core::{Curve, Vec3};

use super::{log_synthesized, sweep};
use crate::mesh::Mesh;
use crate::shaping::{displace_along_axes, reshape, sample_displacements, NoiseBand};

const CENTERLINE: [[f32; 3]; 5] = [
    [-0.2, 0.0, 0.0],
    [-0.1, 0.02, 0.02],
    [0.0, 0.01, 0.01],
    [0.1, -0.01, 0.0],
    [0.18, -0.02, -0.01],
];

const TUBULAR_SEGMENTS: u32 = 32;
const RADIUS: f32 = 0.04;
const RADIAL_SEGMENTS: u32 = 16;

const LOBULES: NoiseBand = NoiseBand::new(15.0, 3, 2.0, 0.4, 0.003);

/// Cross-section scale along x: a swollen head and a thinning tail.
#[must_use]
pub fn girth(x: f32) -> f32 {
    let head: f32 = if x < -0.1 { 1.3 } else { 1.0 };
    let tail = if x > 0.1 { 0.7 + (0.18 - x) * 1.5 } else { 1.0 };
    head.min(tail)
}

/// Synthesize the pancreas mesh.
#[must_use]
pub fn create_pancreas_geometry() -> Mesh {
    let mut mesh = sweep("pancreas", Curve::from_arrays(&CENTERLINE), TUBULAR_SEGMENTS, RADIUS, RADIAL_SEGMENTS);

    let detail = sample_displacements(&mesh, |p| LOBULES.sample(p));
    reshape(&mut mesh, |p| {
        let s = girth(p.x);
        Vec3::new(p.x, p.y * s, p.z * s)
    });
    displace_along_axes(&mut mesh, |i, _| detail[i]);

    mesh.recompute_normals();
    log_synthesized("pancreas", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_girth_profile() {
        assert_eq!(girth(-0.15), 1.3);
        assert_eq!(girth(0.0), 1.0);
        assert!(girth(0.18) < girth(0.12));
    }

    #[test]
    fn test_pancreas_is_valid() {
        let mesh = create_pancreas_geometry();
        assert_eq!(mesh.vertex_count(), 33 * 17);
        assert!(mesh.validate().is_ok());
    }
}
