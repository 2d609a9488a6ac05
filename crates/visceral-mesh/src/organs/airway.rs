//! Trachea and esophagus: straight-ish tubes down the midline.

use visceral_core::{Curve, Vec3};

use super::{log_synthesized, sweep};
use crate::mesh::Mesh;
use crate::shaping::reshape;

const TRACHEA: [[f32; 3]; 5] = [
    [0.0, 0.35, 0.0],
    [0.0, 0.2, 0.0],
    [0.0, 0.05, 0.0],
    [0.0, -0.05, 0.0],
    [0.0, -0.15, 0.01],
];

const ESOPHAGUS: [[f32; 3]; 5] = [
    [0.0, 0.8, 0.0],
    [0.0, 0.5, -0.02],
    [0.0, 0.2, -0.03],
    [-0.02, -0.05, -0.02],
    [-0.03, -0.25, 0.0],
];

/// Cartilage ring ridge at height `y`.
#[must_use]
pub fn cartilage_ring(y: f32) -> f32 {
    (y * 40.0).sin() * 0.003
}

/// Synthesize the trachea mesh.
#[must_use]
pub fn create_trachea_geometry() -> Mesh {
    let mut mesh = sweep("trachea", Curve::from_arrays(&TRACHEA), 24, 0.03, 12);

    reshape(&mut mesh, |p| {
        let ring = cartilage_ring(p.y);
        Vec3::new(p.x + ring, p.y, p.z + ring)
    });

    mesh.recompute_normals();
    log_synthesized("trachea", &mesh);
    mesh
}

/// Synthesize the esophagus mesh.
///
/// A plain tube; its analytic ring normals are kept.
#[must_use]
pub fn create_esophagus_geometry() -> Mesh {
    let mesh = sweep("esophagus", Curve::from_arrays(&ESOPHAGUS), 32, 0.018, 10);
    log_synthesized("esophagus", &mesh);
    mesh
}
