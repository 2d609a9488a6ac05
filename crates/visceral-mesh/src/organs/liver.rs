//! Liver: a wide wedge tapering into the left lobe, with the gallbladder fossa.

use visceral_core::Vec3;

use super::log_synthesized;
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{band_sum, displace_along_normals, gaussian_bump3, reshape, NoiseBand};

const RADIUS: f32 = 0.35;
const WIDTH_SEGMENTS: u32 = 80;
const HEIGHT_SEGMENTS: u32 = 48;

const DETAIL: [NoiseBand; 2] = [
    NoiseBand::new(18.0, 5, 2.1, 0.5, 0.005),
    NoiseBand::new(10.0, 4, 2.0, 0.5, 0.008),
];

const GALLBLADDER_CENTER: Vec3 = Vec3::new(0.15, -0.05, 0.0);
const GALLBLADDER_WIDTH: Vec3 = Vec3::new(0.08, 0.06, 0.08);
const GALLBLADDER_DEPTH: f32 = 0.025;

/// Flatten, widen, taper the left lobe and flatten the diaphragmatic dome.
#[must_use]
pub fn wedge(p: Vec3) -> Vec3 {
    let x = p.x * 1.2;
    let mut y = p.y * 0.4;
    let mut z = p.z;

    if x < -0.15 {
        let taper = 1.0 - ((-x - 0.15) / 0.3) * 0.6;
        y *= taper;
        z *= taper;
    }

    if y > 0.0 {
        y *= 0.7;
    }

    Vec3::new(x, y, z)
}

fn landmarks(p: Vec3) -> f32 {
    let gallbladder = -gaussian_bump3(p, GALLBLADDER_CENTER, GALLBLADDER_WIDTH) * GALLBLADDER_DEPTH;
    let ligament = if p.x.abs() < 0.02 && p.z > 0.05 { -0.015 } else { 0.0 };
    gallbladder + ligament
}

/// Synthesize the liver mesh.
#[must_use]
pub fn create_liver_geometry() -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

    reshape(&mut mesh, wedge);
    displace_along_normals(&mut mesh, |_, p| landmarks(p) + band_sum(&DETAIL, p));

    mesh.recompute_normals();
    log_synthesized("liver", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liver_is_valid_and_flat() {
        let mesh = create_liver_geometry();
        assert!(mesh.validate().is_ok());
        let size = mesh.bounds().unwrap().size();
        assert!(size.x > 2.0 * size.y);
    }

    #[test]
    fn test_left_lobe_tapers() {
        let right = wedge(Vec3::new(0.3, -0.2, 0.1));
        let left = wedge(Vec3::new(-0.3, -0.2, 0.1));
        assert!(left.y.abs() < right.y.abs());
        assert!(left.z.abs() < right.z.abs());
    }

    #[test]
    fn test_gallbladder_fossa_is_deepest_at_center() {
        assert!(landmarks(GALLBLADDER_CENTER) < landmarks(Vec3::new(0.3, -0.05, 0.0)));
    }
}
