//! Kidneys: bean-shaped spheres with the renal hilum carved on the medial side.

use visceral_core::Vec3;

use super::{log_synthesized, Side};
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{band_sum, displace_along_normals, gaussian_bump, reshape, NoiseBand};

const RADIUS: f32 = 0.12;
const WIDTH_SEGMENTS: u32 = 64;
const HEIGHT_SEGMENTS: u32 = 48;

const DETAIL: [NoiseBand; 2] = [
    NoiseBand::new(22.0, 5, 2.2, 0.5, 0.003),
    NoiseBand::new(12.0, 4, 2.0, 0.5, 0.005),
];

const HILUM_X: f32 = 0.06;
const HILUM_DEPTH: f32 = 0.045;

/// Which kidney to build.
pub type KidneySide = Side;

/// Proportions plus the hilum indentation.
///
/// The left kidney's hilum faces +x and the right kidney's faces -x.
#[must_use]
pub fn bean(side: Side, p: Vec3) -> Vec3 {
    let sign = side.pick(1.0, -1.0);
    let y = p.y * 1.5;
    // work in the frame where the hilum is on +x
    let mut x = p.x * 0.7 * sign;

    if x > 0.0 {
        x -= gaussian_bump(y, 0.0, 0.15) * gaussian_bump(x, HILUM_X, 0.04) * HILUM_DEPTH;
    }

    Vec3::new(x * sign, y, p.z)
}

/// Synthesize one kidney.
#[must_use]
pub fn create_kidney_geometry(side: KidneySide) -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

    reshape(&mut mesh, |p| bean(side, p));
    displace_along_normals(&mut mesh, |_, p| band_sum(&DETAIL, p));

    mesh.recompute_normals();
    log_synthesized(side.pick("left kidney", "right kidney"), &mesh);
    mesh
}
