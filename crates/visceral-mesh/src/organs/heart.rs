//! Heart: a deformed sphere with split atria, tapered apex and auricles.
//!
//! Surface vessels are thresholded fbm masks; the coronary mask is sampled
//! in spherical angles of the primitive so it wraps around the ventricles.

use visceral_core::Vec3;

use super::log_synthesized;
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{displace_along_position, gaussian_bump, reshape, NoiseBand};

const RADIUS: f32 = 0.16;
const WIDTH_SEGMENTS: u32 = 96;
const HEIGHT_SEGMENTS: u32 = 72;

const MUSCLE: NoiseBand = NoiseBand::new(15.0, 6, 2.1, 0.45, 0.006);
const VEINS: NoiseBand = NoiseBand::new(8.0, 3, 2.0, 0.5, 1.0).with_offset(Vec3::new(100.0, 0.0, 0.0));
const CORONARY: NoiseBand = NoiseBand::new(5.0, 2, 2.0, 0.5, 1.0);

const AURICLE_X: f32 = 0.12;
const AURICLE_Y: f32 = 0.08;
const AURICLE_HEIGHT: f32 = 0.04;

/// Chamber shape: proportions, atrial split, apex taper, auricles.
#[must_use]
pub fn chambers(p: Vec3) -> Vec3 {
    let mut x = p.x * 0.9;
    let mut y = p.y * 1.1 - 0.02;
    let mut z = p.z * 1.05;

    if y > 0.05 {
        let split = x.abs() * 3.0;
        y += split * split * 0.15;
        x += if x > 0.0 { 0.03 } else { -0.03 };
    }

    if y < -0.08 {
        let taper = 1.0 - ((-y - 0.08) / 0.12) * 0.4;
        x *= taper;
        z *= taper;
    }

    let auricle_y = gaussian_bump(y, AURICLE_Y, 0.06);
    y += (gaussian_bump(x, AURICLE_X, 0.05) + gaussian_bump(x, -AURICLE_X, 0.05)) * auricle_y * AURICLE_HEIGHT;

    Vec3::new(x, y, z)
}

/// Spherical angles `(phi, theta)` of a primitive vertex.
fn angles(p: Vec3) -> (f32, f32) {
    let len = p.length().max(f32::MIN_POSITIVE);
    (p.z.atan2(p.x), (p.y / len).clamp(-1.0, 1.0).acos())
}

fn vessels(shaped: Vec3, phi: f32, theta: f32) -> f32 {
    let veins = if VEINS.raw(shaped).abs() < 0.15 { 0.003 } else { 0.0 };
    let coronary = if CORONARY.raw(Vec3::new(phi, theta, 0.0)).abs() < 0.2 {
        0.004
    } else {
        0.0
    };
    veins + coronary
}

/// Synthesize the heart mesh.
#[must_use]
pub fn create_heart_geometry() -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);
    let sphere_angles: Vec<(f32, f32)> = mesh.positions.iter().map(|p| angles(Vec3::from_array(*p))).collect();

    reshape(&mut mesh, chambers);
    displace_along_position(&mut mesh, |i, p| {
        let (phi, theta) = sphere_angles[i];
        MUSCLE.sample(p) + vessels(p, phi, theta)
    });

    mesh.recompute_normals();
    log_synthesized("heart", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_is_valid() {
        let mesh = create_heart_geometry();
        assert_eq!(mesh.vertex_count(), 97 * 73);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_apex_tapers() {
        let base = chambers(Vec3::new(0.1, -0.05, 0.0));
        let apex = chambers(Vec3::new(0.1, -0.14, 0.0));
        assert!(apex.x < base.x);
    }

    #[test]
    fn test_auricles_are_symmetric() {
        let right = chambers(Vec3::new(0.1, 0.09, 0.02));
        let left = chambers(Vec3::new(-0.1, 0.09, 0.02));
        assert!((right.y - left.y).abs() < 1e-6);
        assert!((right.x + left.x).abs() < 1e-6);
    }
}
