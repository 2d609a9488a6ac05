//! Visceral Viz - Surfaces, Materials and Animation
//!
//! The layer between synthesized geometry and a rendering host:
//!
//! - **Textures**: procedural color, normal and roughness maps
//! - **Cache**: leased ownership of those maps, shared across materials
//! - **Materials**: organ, skeleton and body shell presets with fallback
//! - **Animation**: pure per-frame modulation of material scalars
//! - **Scene**: one-shot synthesis of every mesh, plus the frame driver
//!
//! # Frame Loop
//!
//! ```rust,no_run
//! use visceral_core::{OrganId, ViewState};
//! use visceral_viz::{SceneAnimator, SceneGeometry, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let scene = SceneGeometry::synthesize(&config);
//! let mut animator = SceneAnimator::new(config.modulator);
//!
//! let view = ViewState::default().with_selected(OrganId::Heart);
//! for frame in 0..60 {
//!     animator.update(&view, frame as f32 / 60.0);
//! }
//! assert!(scene.organ(OrganId::Heart).is_some());
//! ```

#![warn(missing_docs)]

pub mod animation;
pub mod cache;
pub mod config;
pub mod error;
pub mod material;
pub mod scene;
pub mod texture;
pub mod timing;

pub use animation::{modulate_body_shell, modulate_organ, modulate_skeleton, MaterialState};
pub use cache::{MaterialTextures, TextureCache, TextureHandle, TextureKey};
pub use config::{ModulatorConfig, RendererCapabilities, TextureConfig, ViewerConfig};
pub use error::{MaterialError, TextureError};
pub use material::{body_shell_material, build_material, organ_material, skeleton_material, Material};
pub use scene::{SceneAnimator, SceneGeometry, SceneMaterials};
pub use texture::{
    create_normal_map, create_organ_texture, create_roughness_map, try_create_normal_map,
    try_create_organ_texture, try_create_roughness_map, TextureKind, TextureMap,
};
