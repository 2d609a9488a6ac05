//! Visceral Core - Procedural Anatomy Primitives
//!
//! This crate provides the leaf types every other Visceral crate builds on:
//! the deterministic noise field, spline and lathe-profile descriptions, the
//! organ metadata table and the read-only view state consumed by per-frame
//! material modulation.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                          visceral-core                                │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌───────────────────────┐  │
//! │  │ NoiseField   │   │ Curve /          │   │ OrganDescriptor table │  │
//! │  │ noise3, fbm  │   │ LatheProfile     │   │ ViewState             │  │
//! │  └──────┬───────┘   └────────┬─────────┘   └───────────┬───────────┘  │
//! │         │                    │                         │              │
//! └─────────┼────────────────────┼─────────────────────────┼──────────────┘
//!           ▼                    ▼                         ▼
//!     visceral-mesh (shape synthesis)           visceral-viz (materials,
//!                                               textures, animation)
//! ```
//!
//! # Example
//!
//! ```rust
//! use visceral_core::noise::{fbm, noise3};
//!
//! let a = noise3(0.3, 1.7, -2.2);
//! let b = noise3(0.3, 1.7, -2.2);
//! assert_eq!(a.to_bits(), b.to_bits());
//!
//! let detail = fbm(1.0, 2.0, 3.0, 5, 2.0, 0.5);
//! assert!(detail.is_finite());
//! ```

#![warn(missing_docs)]

pub mod curve;
pub mod error;
pub mod noise;
pub mod organ;
pub mod types;
pub mod view;

pub use curve::{Curve, LatheProfile, LatheSample};
pub use error::{ColorError, CurveError, ParseIdError};
pub use noise::{fbm, noise3, NoiseField};
pub use organ::{AnimationKind, OrganDescriptor, OrganId, OrganSystem, Rgb, ORGANS};
pub use types::{lerp, Vec3};
pub use view::{SystemSet, ViewState};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest radius any revolved or swept surface may use.
///
/// Lathe profiles and tube cross-sections are floored to this value so the
/// revolve step never collapses a ring onto the axis.
pub const MIN_RADIUS: f32 = 0.01;
