//! Visceral Mesh - Procedural Anatomy Geometry
//!
//! Builds every triangle mesh the viewer draws from a handful of primitives
//! and the deterministic noise field in `visceral-core`. All synthesis is
//! pure: the same call always yields the same mesh, bit for bit.
//!
//! # Scene Layout
//!
//! ```text
//!  y
//!  3.0 ┤        (brain)            head
//!      │          neck
//!  1.5 ┤   R lung ─ heart ─ L lung       ← left is -x
//!      │   liver  ─ stomach ─ spleen
//!  0.5 ┤   kidneys, pancreas, intestines
//!  0.0 ┤        bladder
//!      │       thighs
//! -1.8 ┤       calves
//! ```
//!
//! Organs are built in local frames and placed by their descriptor's
//! position and scale. Ribs and spine share [`SKELETON_OFFSET`]. The body
//! shell is merged into scene coordinates.
//!
//! # Pipeline
//!
//! Each organ synthesizer runs the same passes:
//!
//! 1. primitive ([`uv_sphere`], [`lathe`], [`tube`], [`cylinder`], [`capsule`])
//! 2. anisotropic reshape ([`shaping::reshape`])
//! 3. noise detail ([`shaping::displace_along_normals`] and friends)
//! 4. [`Mesh::recompute_normals`]

#![warn(missing_docs)]

pub mod assemble;
pub mod body;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod organs;
pub mod primitives;
pub mod shaping;
pub mod skeleton;

pub use assemble::{merge, try_merge};
pub use body::{
    body_parts, create_body_shell_geometry, create_head_geometry, create_limb_geometry,
    create_neck_geometry, create_torso_geometry, BodyPart, BodyPartKind, Limb,
};
pub use error::{MeshError, MeshResult};
pub use mesh::{Bounds, Mesh, Vertex, NORMAL_TOLERANCE};
pub use organs::{
    create_aorta_geometry, create_bladder_geometry, create_brain_geometry,
    create_esophagus_geometry, create_heart_geometry, create_kidney_geometry,
    create_large_intestine_geometry, create_liver_geometry, create_lung_geometry,
    create_pancreas_geometry, create_small_intestine_geometry, create_spleen_geometry,
    create_stomach_geometry, create_trachea_geometry, organ_geometry, KidneySide, LungSide, Side,
};
pub use primitives::{capsule, cylinder, lathe, tube, uv_sphere};
pub use skeleton::{
    create_rib_geometry, create_ribs, create_spine_geometry, RIB_PAIRS, SKELETON_OFFSET, VERTEBRAE,
};
