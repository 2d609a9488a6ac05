//! Spleen: a small elongated ellipsoid.

use visceral_core::Vec3;

use super::log_synthesized;
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{displace_along_axes, reshape, sample_displacements, NoiseBand};

const RADIUS: f32 = 0.1;
const WIDTH_SEGMENTS: u32 = 32;
const HEIGHT_SEGMENTS: u32 = 24;

const DETAIL: NoiseBand = NoiseBand::new(14.0, 3, 2.0, 0.4, 0.004);

/// Synthesize the spleen mesh.
#[must_use]
pub fn create_spleen_geometry() -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

    reshape(&mut mesh, |p| p.scale_by(0.7, 1.0, 1.0));
    // detail is sampled before the vertical stretch
    let detail = sample_displacements(&mesh, |p| DETAIL.sample(p));
    reshape(&mut mesh, |p| Vec3::new(p.x, p.y * 1.3, p.z));
    displace_along_axes(&mut mesh, |i, _| detail[i]);

    mesh.recompute_normals();
    log_synthesized("spleen", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spleen_is_elongated() {
        let mesh = create_spleen_geometry();
        assert!(mesh.validate().is_ok());
        let size = mesh.bounds().unwrap().size();
        assert!(size.y > size.x);
    }
}
