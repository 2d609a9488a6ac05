//! Aorta: ascending segment, arch, and descending thoracic/abdominal run.

use visceral_core::Curve;

use super::{log_synthesized, sweep};
use crate::mesh::Mesh;

const CENTERLINE: [[f32; 3]; 11] = [
    [0.0, -0.1, 0.05],
    [0.0, 0.05, 0.05],
    [0.0, 0.15, 0.03],
    [0.02, 0.22, 0.0],
    [0.03, 0.25, -0.05],
    [0.02, 0.22, -0.1],
    [0.0, 0.15, -0.12],
    [0.0, 0.0, -0.1],
    [0.0, -0.2, -0.08],
    [0.0, -0.5, -0.06],
    [0.0, -0.8, -0.04],
];

const TUBULAR_SEGMENTS: u32 = 48;
const RADIUS: f32 = 0.025;
const RADIAL_SEGMENTS: u32 = 12;

/// Synthesize the aorta mesh.
#[must_use]
pub fn create_aorta_geometry() -> Mesh {
    let mut mesh = sweep("aorta", Curve::from_arrays(&CENTERLINE), TUBULAR_SEGMENTS, RADIUS, RADIAL_SEGMENTS);
    mesh.recompute_normals();
    log_synthesized("aorta", &mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aorta_arch_and_descent() {
        let mesh = create_aorta_geometry();
        assert_eq!(mesh.vertex_count(), 49 * 13);
        assert!(mesh.validate().is_ok());

        let bounds = mesh.bounds().unwrap();
        assert!(bounds.max.y > 0.25);
        assert!(bounds.min.y < -0.8);
    }
}
