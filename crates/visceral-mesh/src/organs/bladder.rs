//! Urinary bladder: a small rounded lathe.

use std::f32::consts::PI;

use visceral_core::{CurveError, LatheProfile};

use super::{log_synthesized, revolve};
use crate::mesh::Mesh;

const PROFILE_SEGMENTS: u32 = 24;
const RADIAL_SEGMENTS: u32 = 24;
const HEIGHT: f32 = 0.2;

/// Radius at profile parameter `t` (neck at 0, dome at 1).
#[must_use]
pub fn radius_at(t: f32) -> f32 {
    if t < 0.2 {
        0.02 + t * 0.3
    } else if t < 0.7 {
        0.08 + ((t - 0.2) * PI / 0.5).sin() * 0.03
    } else {
        0.11 - (t - 0.7) * 0.25
    }
}

/// Radius/height profile of the bladder.
///
/// # Errors
///
/// Propagates [`CurveError`] from profile construction.
pub fn profile() -> Result<LatheProfile, CurveError> {
    LatheProfile::from_fn(PROFILE_SEGMENTS, |t| (radius_at(t), (t - 0.5) * HEIGHT))
}

/// Synthesize the bladder mesh.
#[must_use]
pub fn create_bladder_geometry() -> Mesh {
    let mesh = revolve("bladder", profile(), RADIAL_SEGMENTS);
    log_synthesized("bladder", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use visceral_core::MIN_RADIUS;

    #[test]
    fn test_bladder_profile_and_mesh() {
        let profile = profile().unwrap();
        assert!(profile.min_radius() >= MIN_RADIUS);

        let mesh = create_bladder_geometry();
        assert_eq!(mesh.vertex_count(), 25 * 25);
        assert!(mesh.validate().is_ok());
    }
}
