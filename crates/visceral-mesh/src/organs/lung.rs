//! Lungs: tall, narrow spheres with a medial cardiac notch and lobe fissures.
//!
//! The right lung has an extra (horizontal) fissure. Mirroring flips only
//! which side the notch is carved on; the noise detail is shared.

use visceral_core::Vec3;

use super::{log_synthesized, Side};
use crate::mesh::Mesh;
use crate::primitives::uv_sphere;
use crate::shaping::{band_sum, displace_along_normals, reshape, NoiseBand};

const RADIUS: f32 = 0.28;
const WIDTH_SEGMENTS: u32 = 80;
const HEIGHT_SEGMENTS: u32 = 60;

const DETAIL: [NoiseBand; 2] = [
    NoiseBand::new(25.0, 6, 2.2, 0.5, 0.004),
    NoiseBand::new(15.0, 5, 2.1, 0.5, 0.006),
];

const OBLIQUE_FISSURE_Y: f32 = -0.05;
const HORIZONTAL_FISSURE_Y: f32 = 0.1;
const FISSURE_HALF_WIDTH: f32 = 0.015;

/// Which lung to build.
pub type LungSide = Side;

fn proportions(p: Vec3) -> Vec3 {
    p.scale_by(0.65, 1.4, 1.0)
}

fn on_medial_face(side: Side, x: f32) -> bool {
    match side {
        Side::Left => x > 0.05,
        Side::Right => x < -0.05,
    }
}

fn in_fissure(y: f32, center: f32) -> bool {
    (y - center).abs() < FISSURE_HALF_WIDTH
}

/// Whether a shaped vertex can differ between the two lungs.
///
/// Covers the notch band on either medial face and the horizontal fissure.
#[must_use]
pub fn in_asymmetric_region(p: Vec3) -> bool {
    let notch_band = p.y > -0.05 && p.y < 0.15 && p.x.abs() > 0.05;
    notch_band || in_fissure(p.y, HORIZONTAL_FISSURE_Y)
}

/// Landmark displacement at a shaped vertex.
#[must_use]
pub fn landmarks(side: Side, p: Vec3) -> f32 {
    let cardiac_notch = if on_medial_face(side, p.x) && p.y > -0.05 && p.y < 0.15 {
        -0.06
    } else {
        0.0
    };
    let tapered_top = if p.y > 0.2 { -(p.y - 0.2) * 0.15 } else { 0.0 };
    let rounded_bottom = if p.y < -0.25 { (p.y + 0.25) * 0.1 } else { 0.0 };

    let fissure = match side {
        Side::Left => in_fissure(p.y, OBLIQUE_FISSURE_Y),
        Side::Right => in_fissure(p.y, OBLIQUE_FISSURE_Y) || in_fissure(p.y, HORIZONTAL_FISSURE_Y),
    };
    let lobe_fissures = if fissure { -0.015 } else { 0.0 };

    cardiac_notch + tapered_top + rounded_bottom + lobe_fissures
}

/// Synthesize one lung.
#[must_use]
pub fn create_lung_geometry(side: LungSide) -> Mesh {
    let mut mesh = uv_sphere(RADIUS, WIDTH_SEGMENTS, HEIGHT_SEGMENTS);

    reshape(&mut mesh, proportions);
    displace_along_normals(&mut mesh, |_, p| landmarks(side, p) + band_sum(&DETAIL, p));

    mesh.recompute_normals();
    log_synthesized(side.pick("left lung", "right lung"), &mesh);
    mesh
}
