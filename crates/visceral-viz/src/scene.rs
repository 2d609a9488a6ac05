//! Scene assembly and per-frame driving.
//!
//! [`SceneGeometry::synthesize`] builds every mesh the viewer draws once at
//! startup. [`SceneAnimator`] holds the per-structure [`MaterialState`]s and
//! advances them each frame from the current view flags.

use tracing::info;
use visceral_core::{OrganDescriptor, OrganId, ViewState, ORGANS};
use visceral_mesh::{create_body_shell_geometry, create_ribs, create_spine_geometry, organ_geometry, Mesh};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::animation::{modulate_body_shell, modulate_organ, modulate_skeleton, MaterialState};
use crate::config::{ModulatorConfig, RendererCapabilities, ViewerConfig};
use crate::material::{body_shell_material, organ_material, skeleton_material, Material};
use crate::timing::SynthesisTimer;

// ============================================================================
// Geometry
// ============================================================================

/// Every mesh in the scene, in local frames.
#[derive(Clone, Debug)]
pub struct SceneGeometry {
    /// One mesh per organ, in table order
    pub organs: Vec<(OrganId, Mesh)>,
    /// 24 ribs, right then left for each index
    pub ribs: Vec<Mesh>,
    /// Merged vertebrae and discs
    pub spine: Mesh,
    /// Merged body shell in scene coordinates
    pub body_shell: Mesh,
}

impl SceneGeometry {
    /// Synthesize the whole scene.
    ///
    /// Runs on the rayon pool when the `parallel` feature is enabled and
    /// `config.parallel` is set; the result is identical either way.
    pub fn synthesize(config: &ViewerConfig) -> Self {
        let timer = SynthesisTimer::new("scene");

        let scene = timer.in_scope(|| {
            #[cfg(feature = "parallel")]
            let scene = if config.parallel {
                Self::synthesize_parallel()
            } else {
                Self::synthesize_serial()
            };

            #[cfg(not(feature = "parallel"))]
            let scene = {
                let _ = config.parallel;
                Self::synthesize_serial()
            };

            scene
        });

        info!(
            meshes = scene.mesh_count(),
            vertices = scene.vertex_count(),
            triangles = scene.triangle_count(),
            "Scene synthesized"
        );
        scene
    }

    fn synthesize_serial() -> Self {
        Self {
            organs: OrganId::ALL.into_iter().map(|id| (id, organ_geometry(id))).collect(),
            ribs: create_ribs(),
            spine: create_spine_geometry(),
            body_shell: create_body_shell_geometry(),
        }
    }

    #[cfg(feature = "parallel")]
    fn synthesize_parallel() -> Self {
        let (organs, (ribs, (spine, body_shell))) = rayon::join(
            || OrganId::ALL.into_par_iter().map(|id| (id, organ_geometry(id))).collect::<Vec<_>>(),
            || rayon::join(create_ribs, || rayon::join(create_spine_geometry, create_body_shell_geometry)),
        );

        Self {
            organs,
            ribs,
            spine,
            body_shell,
        }
    }

    /// Mesh of one organ.
    pub fn organ(&self, id: OrganId) -> Option<&Mesh> {
        self.organs.iter().find(|(o, _)| *o == id).map(|(_, mesh)| mesh)
    }

    /// Every mesh, organs first.
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.organs
            .iter()
            .map(|(_, mesh)| mesh)
            .chain(&self.ribs)
            .chain([&self.spine, &self.body_shell])
    }

    /// Number of meshes.
    pub fn mesh_count(&self) -> usize {
        self.organs.len() + self.ribs.len() + 2
    }

    /// Total vertices across the scene.
    pub fn vertex_count(&self) -> usize {
        self.meshes().map(Mesh::vertex_count).sum()
    }

    /// Total triangles across the scene.
    pub fn triangle_count(&self) -> usize {
        self.meshes().map(Mesh::triangle_count).sum()
    }
}

// ============================================================================
// Materials
// ============================================================================

/// Materials for every structure, built for one renderer.
#[derive(Clone, Debug)]
pub struct SceneMaterials {
    /// One material per organ, in table order
    pub organs: Vec<(OrganId, Material)>,
    /// Ribs and spine
    pub skeleton: Material,
    /// Body shell
    pub body_shell: Material,
}

impl SceneMaterials {
    /// Build every material, downgrading what the renderer cannot draw.
    pub fn build(capabilities: &RendererCapabilities) -> Self {
        Self {
            organs: ORGANS.iter().map(|o| (o.id, organ_material(o, capabilities))).collect(),
            skeleton: skeleton_material(),
            body_shell: body_shell_material(capabilities),
        }
    }

    /// Material of one organ.
    pub fn organ(&self, id: OrganId) -> Option<&Material> {
        self.organs.iter().find(|(o, _)| *o == id).map(|(_, m)| m)
    }
}

// ============================================================================
// Animation
// ============================================================================

/// Frame-to-frame material state for the whole scene.
#[derive(Clone, Debug)]
pub struct SceneAnimator {
    config: ModulatorConfig,
    organs: Vec<(&'static OrganDescriptor, MaterialState)>,
    skeleton: MaterialState,
    body_shell: MaterialState,
    frames: u64,
}

impl SceneAnimator {
    /// Start every structure at its initial material state.
    pub fn new(config: ModulatorConfig) -> Self {
        Self {
            config,
            organs: ORGANS.iter().map(|o| (o, MaterialState::organ(o))).collect(),
            skeleton: MaterialState::skeleton(),
            body_shell: MaterialState::body_shell(),
            frames: 0,
        }
    }

    /// Advance one frame at `elapsed` seconds since start.
    pub fn update(&mut self, view: &ViewState, elapsed: f32) {
        let config = &self.config;
        for (organ, state) in &mut self.organs {
            *state = modulate_organ(state, organ, view, elapsed, config);
        }
        self.skeleton = modulate_skeleton(&self.skeleton, view, config);
        self.body_shell = modulate_body_shell(&self.body_shell, view, config);
        self.frames += 1;
    }

    /// Current state of one organ.
    pub fn organ(&self, id: OrganId) -> Option<&MaterialState> {
        self.organs.iter().find(|(o, _)| o.id == id).map(|(_, s)| s)
    }

    /// Every organ's state, in table order.
    pub fn organs(&self) -> impl Iterator<Item = (OrganId, &MaterialState)> {
        self.organs.iter().map(|(o, s)| (o.id, s))
    }

    /// Current skeleton state.
    pub fn skeleton(&self) -> &MaterialState {
        &self.skeleton
    }

    /// Current body shell state.
    pub fn body_shell(&self) -> &MaterialState {
        &self.body_shell
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for SceneAnimator {
    fn default() -> Self {
        Self::new(ModulatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animator_tracks_every_organ() {
        let mut animator = SceneAnimator::default();
        assert_eq!(animator.organs().count(), 16);

        animator.update(&ViewState::default(), 0.1);
        assert_eq!(animator.frames(), 1);
        for (_, state) in animator.organs() {
            assert_eq!(state.opacity, 1.0);
            assert!(state.visible);
        }
    }

    #[test]
    fn test_scene_materials_degrade_without_physical_support() {
        let materials = SceneMaterials::build(&RendererCapabilities::minimal());
        assert_eq!(materials.organs.len(), 16);
        assert!(materials.organs.iter().all(|(_, m)| !m.is_physical()));
        assert!(!materials.body_shell.is_physical());

        let full = SceneMaterials::build(&RendererCapabilities::full());
        assert!(full.organ(OrganId::Heart).unwrap().is_physical());
    }
}
