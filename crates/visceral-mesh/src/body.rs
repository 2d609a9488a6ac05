//! Translucent body shell: torso, head, neck and limbs.
//!
//! Each part is built in its own frame; [`body_parts`] places them and
//! [`create_body_shell_geometry`] merges the placed parts into one mesh.

use std::f32::consts::PI;

use visceral_core::{CurveError, LatheProfile, Vec3};

use crate::assemble::merge;
use crate::mesh::Mesh;
use crate::organs::{log_synthesized, revolve, Side};
use crate::primitives::{capsule, cylinder, uv_sphere};
use crate::shaping::reshape;

const TORSO_SAMPLES: u32 = 40;
const TORSO_RADIAL_SEGMENTS: u32 = 48;
const TORSO_HEIGHT: f32 = 2.8;

const CAPSULE_CAP_SEGMENTS: u32 = 8;
const CAPSULE_RADIAL_SEGMENTS: u32 = 16;

/// Torso radius at profile parameter `t` (pelvis at 0, shoulders at 1).
#[must_use]
pub fn torso_radius(t: f32) -> f32 {
    if t < 0.08 {
        0.15 + t * 1.2
    } else if t < 0.15 {
        0.25 + (t - 0.08) * 2.5
    } else if t < 0.25 {
        0.42 + ((t - 0.15) * PI / 0.1).sin() * 0.03
    } else if t < 0.4 {
        0.42 - (t - 0.25) * 0.4
    } else if t < 0.55 {
        0.36 - (t - 0.4) * 0.15
    } else if t < 0.7 {
        0.34 + (t - 0.55) * 0.3
    } else if t < 0.85 {
        0.38 - (t - 0.7) * 0.6
    } else {
        0.29 - (t - 0.85) * 1.2
    }
}

/// Radius/height profile of the torso.
///
/// # Errors
///
/// Propagates [`CurveError`] from profile construction.
pub fn torso_profile() -> Result<LatheProfile, CurveError> {
    LatheProfile::from_fn(TORSO_SAMPLES, |t| (torso_radius(t), (t - 0.5) * TORSO_HEIGHT))
}

/// Synthesize the torso.
#[must_use]
pub fn create_torso_geometry() -> Mesh {
    let mesh = revolve("torso", torso_profile(), TORSO_RADIAL_SEGMENTS);
    log_synthesized("torso", &mesh);
    mesh
}

/// Synthesize the head: a tall sphere with a narrowing jaw.
#[must_use]
pub fn create_head_geometry() -> Mesh {
    let mut mesh = uv_sphere(0.22, 32, 24);

    reshape(&mut mesh, |p| {
        let x = if p.y < -0.05 {
            p.x * (1.0 - (p.y + 0.05).abs() * 0.4)
        } else {
            p.x
        };
        Vec3::new(x, p.y * 1.15, p.z)
    });

    mesh.recompute_normals();
    log_synthesized("head", &mesh);
    mesh
}

/// Synthesize the neck: a slightly flared cylinder.
#[must_use]
pub fn create_neck_geometry() -> Mesh {
    let mesh = cylinder(0.08, 0.1, 0.35, 16);
    log_synthesized("neck", &mesh);
    mesh
}

/// A limb segment of the body shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Limb {
    /// Shoulder to elbow
    UpperArm(Side),
    /// Elbow to wrist
    Forearm(Side),
    /// Hip to knee
    Thigh(Side),
    /// Knee to ankle
    Calf(Side),
}

impl Limb {
    /// Every limb segment, left before right.
    pub const ALL: [Self; 8] = [
        Self::UpperArm(Side::Left),
        Self::UpperArm(Side::Right),
        Self::Forearm(Side::Left),
        Self::Forearm(Side::Right),
        Self::Thigh(Side::Left),
        Self::Thigh(Side::Right),
        Self::Calf(Side::Left),
        Self::Calf(Side::Right),
    ];

    /// Capsule `(radius, length)` of the segment.
    #[must_use]
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            Self::UpperArm(_) => (0.07, 0.55),
            Self::Forearm(_) => (0.06, 0.55),
            Self::Thigh(_) => (0.1, 0.7),
            Self::Calf(_) => (0.08, 0.7),
        }
    }

    /// Placement in the scene.
    #[must_use]
    pub fn offset(self) -> Vec3 {
        let (side, x, y, z) = match self {
            Self::UpperArm(side) => (side, 0.58, 1.45, 0.0),
            Self::Forearm(side) => (side, 0.62, 0.7, 0.02),
            Self::Thigh(side) => (side, 0.18, -0.85, 0.0),
            Self::Calf(side) => (side, 0.18, -1.75, 0.02),
        };
        Vec3::new(x * side.sign(), y, z)
    }
}

/// Synthesize one limb segment, centered at its own origin.
#[must_use]
pub fn create_limb_geometry(limb: Limb) -> Mesh {
    let (radius, length) = limb.dimensions();
    let mesh = capsule(radius, length, CAPSULE_CAP_SEGMENTS, CAPSULE_RADIAL_SEGMENTS);
    log_synthesized("limb", &mesh);
    mesh
}

/// Which piece of the body shell a [`BodyPart`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPartKind {
    /// Trunk
    Torso,
    /// Skull and face
    Head,
    /// Neck
    Neck,
    /// One limb segment
    Limb(Limb),
}

/// A body shell piece and where it sits in the scene.
#[derive(Clone, Debug)]
pub struct BodyPart {
    /// Which piece
    pub kind: BodyPartKind,
    /// Geometry in the piece's own frame
    pub mesh: Mesh,
    /// Scene placement
    pub offset: Vec3,
}

/// Every body shell piece with its placement.
#[must_use]
pub fn body_parts() -> Vec<BodyPart> {
    let mut parts = vec![
        BodyPart {
            kind: BodyPartKind::Torso,
            mesh: create_torso_geometry(),
            offset: Vec3::new(0.0, 0.4, 0.0),
        },
        BodyPart {
            kind: BodyPartKind::Head,
            mesh: create_head_geometry(),
            offset: Vec3::new(0.0, 2.85, 0.0),
        },
        BodyPart {
            kind: BodyPartKind::Neck,
            mesh: create_neck_geometry(),
            offset: Vec3::new(0.0, 2.35, 0.03),
        },
    ];

    parts.extend(Limb::ALL.into_iter().map(|limb| BodyPart {
        kind: BodyPartKind::Limb(limb),
        mesh: create_limb_geometry(limb),
        offset: limb.offset(),
    }));

    parts
}

/// Synthesize the whole body shell as a single mesh in scene coordinates.
#[must_use]
pub fn create_body_shell_geometry() -> Mesh {
    let placed: Vec<Mesh> = body_parts()
        .into_iter()
        .map(|part| part.mesh.translated(part.offset))
        .collect();

    let shell = merge(&placed);
    log_synthesized("body shell", &shell);
    shell
}
