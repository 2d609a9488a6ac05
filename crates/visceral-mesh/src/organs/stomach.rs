//! Stomach: a J-shaped lathe bent toward the greater curvature.

use std::f32::consts::PI;

use visceral_core::{CurveError, LatheProfile, Vec3};

use super::{log_synthesized, revolve};
use crate::mesh::Mesh;
use crate::shaping::{displace_along_axes, reshape, NoiseBand};

const PROFILE_SEGMENTS: u32 = 32;
const RADIAL_SEGMENTS: u32 = 32;
const HEIGHT: f32 = 0.5;

const RUGAE: NoiseBand = NoiseBand::new(12.0, 3, 2.0, 0.4, 0.005);

/// Radius at profile parameter `t` (cardia at 0, pylorus at 1).
#[must_use]
pub fn radius_at(t: f32) -> f32 {
    if t < 0.15 {
        0.04 + t * 0.4
    } else if t < 0.6 {
        0.1 + ((t - 0.15) * PI / 0.45).sin() * 0.08
    } else {
        0.18 - (t - 0.6) * 0.35
    }
}

/// Radius/height profile of the stomach.
///
/// # Errors
///
/// Propagates [`CurveError`] from profile construction.
pub fn profile() -> Result<LatheProfile, CurveError> {
    LatheProfile::from_fn(PROFILE_SEGMENTS, |t| (radius_at(t), (t - 0.5) * HEIGHT))
}

/// Synthesize the stomach mesh.
#[must_use]
pub fn create_stomach_geometry() -> Mesh {
    let mut mesh = revolve("stomach", profile(), RADIAL_SEGMENTS);

    let detail: Vec<f32> = mesh.positions.iter().map(|p| RUGAE.sample(Vec3::from_array(*p))).collect();
    reshape(&mut mesh, |p| Vec3::new(p.x + p.y * 0.4, p.y, p.z));
    displace_along_axes(&mut mesh, |i, _| detail[i]);

    mesh.recompute_normals();
    log_synthesized("stomach", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use visceral_core::MIN_RADIUS;

    #[test]
    fn test_profile_is_floored() {
        let profile = profile().unwrap();
        assert_eq!(profile.len(), 33);
        assert!(profile.samples().iter().all(|s| s.radius >= MIN_RADIUS));
    }

    #[test]
    fn test_stomach_is_valid() {
        let mesh = create_stomach_geometry();
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert!(mesh.validate().is_ok());
    }
}
