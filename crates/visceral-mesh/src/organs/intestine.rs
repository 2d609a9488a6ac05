//! Small and large intestine tubes.

use std::f32::consts::TAU;

use visceral_core::{fbm, Curve, Vec3};

use super::{log_synthesized, sweep};
use crate::mesh::Mesh;

const COILS: u32 = 8;
const POINTS_PER_COIL: u32 = 12;

/// Control points of the coiled small intestine.
///
/// A spiral of shrinking radius descending 0.25 units, jittered by fbm so
/// loops do not stack perfectly.
#[must_use]
pub fn small_intestine_path() -> Vec<Vec3> {
    let count = COILS * POINTS_PER_COIL;
    (0..=count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let angle = t * COILS as f32 * TAU;
            let radius = 0.12 - t * 0.04;
            let jitter_x = fbm(t * 20.0, 0.0, 0.0, 2, 2.0, 0.5) * 0.02;
            let jitter_z = fbm(0.0, 0.0, t * 20.0, 2, 2.0, 0.5) * 0.02;

            Vec3::new(
                angle.cos() * radius + jitter_x,
                -t * 0.25 + 0.1,
                angle.sin() * radius * 0.7 + jitter_z,
            )
        })
        .collect()
}

/// Synthesize the small intestine mesh.
#[must_use]
pub fn create_small_intestine_geometry() -> Mesh {
    let mut mesh = sweep("small intestine", Curve::new(small_intestine_path()), 200, 0.018, 8);
    mesh.recompute_normals();
    log_synthesized("small intestine", &mesh);
    mesh
}

/// Colon frame: ascending, transverse, descending and sigmoid segments.
const COLON: [[f32; 3]; 15] = [
    [0.2, -0.2, 0.0],
    [0.22, -0.1, 0.0],
    [0.22, 0.0, 0.0],
    [0.22, 0.08, 0.0],
    [0.18, 0.12, 0.0],
    [0.1, 0.13, 0.0],
    [0.0, 0.13, 0.0],
    [-0.1, 0.13, 0.0],
    [-0.18, 0.12, 0.0],
    [-0.22, 0.08, 0.0],
    [-0.22, 0.0, 0.0],
    [-0.22, -0.08, 0.0],
    [-0.2, -0.15, 0.0],
    [-0.15, -0.2, 0.0],
    [-0.08, -0.22, 0.0],
];

/// Haustral sacculation offset for vertex `i`.
#[must_use]
pub fn haustra(i: usize) -> f32 {
    (i as f32 * 0.3).sin() * 0.005
}

/// Synthesize the large intestine mesh.
#[must_use]
pub fn create_large_intestine_geometry() -> Mesh {
    let mut mesh = sweep("large intestine", Curve::from_arrays(&COLON), 64, 0.035, 12);

    for (i, p) in mesh.positions.iter_mut().enumerate() {
        let h = haustra(i);
        p[0] += h;
        p[1] += h;
    }

    mesh.recompute_normals();
    log_synthesized("large intestine", &mesh);
    mesh
}
