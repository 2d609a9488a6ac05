//! Organ Shape Synthesis
//!
//! One synthesizer per organ, each a pure function returning a mesh in the
//! organ's local frame:
//! - Sphere-based: brain, heart, lungs, liver, kidneys, spleen
//! - Lathe-based: stomach, bladder
//! - Tube-based: pancreas, small/large intestine, trachea, esophagus, aorta

pub mod airway;
pub mod aorta;
pub mod bladder;
pub mod brain;
pub mod heart;
pub mod intestine;
pub mod kidney;
pub mod liver;
pub mod lung;
pub mod pancreas;
pub mod spleen;
pub mod stomach;

use tracing::{debug, warn};
use visceral_core::{Curve, CurveError, LatheProfile, OrganId};

use crate::mesh::Mesh;
use crate::primitives::{lathe, tube};

pub use airway::{create_esophagus_geometry, create_trachea_geometry};
pub use aorta::create_aorta_geometry;
pub use bladder::create_bladder_geometry;
pub use brain::create_brain_geometry;
pub use heart::create_heart_geometry;
pub use intestine::{create_large_intestine_geometry, create_small_intestine_geometry};
pub use kidney::{create_kidney_geometry, KidneySide};
pub use liver::create_liver_geometry;
pub use lung::{create_lung_geometry, LungSide};
pub use pancreas::create_pancreas_geometry;
pub use spleen::create_spleen_geometry;
pub use stomach::create_stomach_geometry;

/// Left or right member of a paired organ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Patient's left
    Left,
    /// Patient's right
    Right,
}

impl Side {
    /// X-axis multiplier in the scene frame (left is -x).
    #[inline]
    #[must_use]
    pub fn sign(self) -> f32 {
        self.pick(-1.0, 1.0)
    }

    /// Choose a value by side.
    #[inline]
    pub fn pick<T>(self, left: T, right: T) -> T {
        match self {
            Self::Left => left,
            Self::Right => right,
        }
    }
}

/// Synthesize the mesh for any organ in the table.
#[must_use]
pub fn organ_geometry(id: OrganId) -> Mesh {
    match id {
        OrganId::Brain => create_brain_geometry(),
        OrganId::Heart => create_heart_geometry(),
        OrganId::LeftLung => create_lung_geometry(Side::Left),
        OrganId::RightLung => create_lung_geometry(Side::Right),
        OrganId::Liver => create_liver_geometry(),
        OrganId::Stomach => create_stomach_geometry(),
        OrganId::LeftKidney => create_kidney_geometry(Side::Left),
        OrganId::RightKidney => create_kidney_geometry(Side::Right),
        OrganId::Spleen => create_spleen_geometry(),
        OrganId::Pancreas => create_pancreas_geometry(),
        OrganId::Bladder => create_bladder_geometry(),
        OrganId::SmallIntestine => create_small_intestine_geometry(),
        OrganId::LargeIntestine => create_large_intestine_geometry(),
        OrganId::Trachea => create_trachea_geometry(),
        OrganId::Esophagus => create_esophagus_geometry(),
        OrganId::Aorta => create_aorta_geometry(),
    }
}

pub(crate) fn log_synthesized(name: &str, mesh: &Mesh) {
    debug!(
        organ = name,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Synthesized mesh"
    );
}

/// Revolve a profile, degrading to an empty mesh if it could not be built.
pub(crate) fn revolve(name: &str, profile: Result<LatheProfile, CurveError>, segments: u32) -> Mesh {
    match profile {
        Ok(profile) => lathe(&profile, segments),
        Err(err) => {
            warn!(organ = name, %err, "Lathe profile rejected; using empty mesh");
            Mesh::empty()
        }
    }
}

/// Sweep a tube, degrading to an empty mesh if the centerline was rejected.
pub(crate) fn sweep(
    name: &str,
    curve: Result<Curve, CurveError>,
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
) -> Mesh {
    match curve {
        Ok(curve) => tube(&curve, tubular_segments, radius, radial_segments),
        Err(err) => {
            warn!(organ = name, %err, "Centerline rejected; using empty mesh");
            Mesh::empty()
        }
    }
}
