//! Ribs and spine.
//!
//! Everything here is in the skeleton group's frame; hosts place the group
//! at [`SKELETON_OFFSET`].

use visceral_core::{Curve, Vec3};

use crate::assemble::merge;
use crate::mesh::Mesh;
use crate::organs::{log_synthesized, sweep, Side};
use crate::primitives::cylinder;

/// Rib pairs in the cage.
pub const RIB_PAIRS: u32 = 12;
/// Vertebrae in the column (each followed by a disc).
pub const VERTEBRAE: u32 = 24;
/// Placement of the skeleton group in the scene.
pub const SKELETON_OFFSET: Vec3 = Vec3::new(0.0, 0.95, 0.0);

const RIB_SAMPLES: u32 = 24;
const RIB_SWEEP: f32 = std::f32::consts::PI * 0.75;

const VERTEBRA_TOP_Y: f32 = 0.55;
const VERTEBRA_SPACING: f32 = 0.065;
const SPINE_Z: f32 = -0.15;

/// Centerline of rib `index` (0 = top) on `side`.
///
/// Lower ribs are shorter and sit `0.065` lower per index; each arcs
/// three quarters of a half turn from the spine around to the front.
#[must_use]
pub fn rib_path(index: u32, side: Side) -> Vec<Vec3> {
    let length = 12.0 - index as f32 * 0.5;
    let r = length * 0.035;

    (0..=RIB_SAMPLES)
        .map(|i| {
            let t = i as f32 / RIB_SAMPLES as f32;
            let (sin, cos) = (t * RIB_SWEEP).sin_cos();
            Vec3::new(
                sin * r * side.sign(),
                -(index as f32) * 0.065 + cos * 0.03,
                -cos * r * 0.5 + 0.1,
            )
        })
        .collect()
}

/// Synthesize one rib.
#[must_use]
pub fn create_rib_geometry(index: u32, side: Side) -> Mesh {
    let mesh = sweep("rib", Curve::new(rib_path(index, side)), 20, 0.012, 6);
    log_synthesized("rib", &mesh);
    mesh
}

/// All ribs, right then left for each index.
#[must_use]
pub fn create_ribs() -> Vec<Mesh> {
    (0..RIB_PAIRS)
        .flat_map(|i| [create_rib_geometry(i, Side::Right), create_rib_geometry(i, Side::Left)])
        .collect()
}

/// Synthesize the spine: vertebral bodies and discs merged into one mesh.
#[must_use]
pub fn create_spine_geometry() -> Mesh {
    let mut parts = Vec::with_capacity(VERTEBRAE as usize * 2);

    for i in 0..VERTEBRAE {
        let y = VERTEBRA_TOP_Y - i as f32 * VERTEBRA_SPACING;
        parts.push(cylinder(0.025, 0.025, 0.04, 8).translated(Vec3::new(0.0, y, SPINE_Z)));
        parts.push(cylinder(0.022, 0.022, 0.02, 8).translated(Vec3::new(0.0, y - 0.03, SPINE_Z)));
    }

    let spine = merge(&parts);
    log_synthesized("spine", &spine);
    spine
}
