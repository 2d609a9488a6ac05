//! Per-frame material modulation.
//!
//! Each structure carries a [`MaterialState`] from frame to frame. The
//! modulators are pure: given the previous state, the view flags and the
//! elapsed time they return the next state, moving every scalar a fixed
//! fraction of the way toward its target (`lerp(current, target, rate)`).
//! There are no discrete states; repeated frames converge.

use serde::{Deserialize, Serialize};
use visceral_core::{lerp, AnimationKind, OrganDescriptor, Vec3, ViewState};

use crate::config::{ModulatorConfig, OpacityTargets};

/// Initial emissive intensity of organ and skeleton materials.
const INITIAL_EMISSIVE: f32 = 0.08;
/// Initial emissive intensity of the body shell material.
const INITIAL_SHELL_EMISSIVE: f32 = 0.05;

/// Scalars the host copies onto a material and its transform each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialState {
    /// Material alpha
    pub opacity: f32,
    /// Emissive multiplier
    pub emissive_intensity: f32,
    /// Smoothed highlight amount in `[0, 1]`
    pub hover_blend: f32,
    /// Animation scale applied on top of placement
    pub scale: Vec3,
    /// Local z of the transform
    pub position_z: f32,
    /// Whether the structure is drawn
    pub visible: bool,
}

impl MaterialState {
    /// State of a freshly created organ.
    #[must_use]
    pub fn organ(organ: &OrganDescriptor) -> Self {
        Self {
            opacity: 1.0,
            emissive_intensity: INITIAL_EMISSIVE,
            hover_blend: 0.0,
            scale: Vec3::new(1.0, 1.0, 1.0),
            position_z: organ.position.z,
            visible: true,
        }
    }

    /// State of the freshly created skeleton.
    #[must_use]
    pub fn skeleton() -> Self {
        Self {
            opacity: 0.25,
            emissive_intensity: INITIAL_EMISSIVE,
            hover_blend: 0.0,
            scale: Vec3::new(1.0, 1.0, 1.0),
            position_z: 0.0,
            visible: true,
        }
    }

    /// State of the freshly created body shell.
    #[must_use]
    pub fn body_shell() -> Self {
        Self {
            opacity: 0.08,
            emissive_intensity: INITIAL_SHELL_EMISSIVE,
            ..Self::skeleton()
        }
    }
}

/// Opacity an organ converges toward under `view`.
#[must_use]
pub fn organ_opacity_target(organ: &OrganDescriptor, view: &ViewState, config: &ModulatorConfig) -> f32 {
    let targets = &config.organ;
    let selected = view.selected == Some(organ.id);
    let hovered = view.hovered == Some(organ.id);

    if view.xray {
        if selected {
            targets.xray_selected
        } else if hovered {
            targets.xray_hovered
        } else {
            targets.xray
        }
    } else if view.selected.is_some() && !selected {
        targets.dimmed
    } else {
        targets.idle
    }
}

/// Animation scale of `kind` at `elapsed` seconds.
#[must_use]
pub fn animation_scale(kind: AnimationKind, elapsed: f32, config: &ModulatorConfig) -> Option<Vec3> {
    match kind {
        AnimationKind::Static => None,
        AnimationKind::Pulse => {
            let s = 1.0 + (elapsed * config.pulse_frequency).sin() * config.pulse_amplitude;
            Some(Vec3::new(s, s, s))
        }
        AnimationKind::Breathe => {
            let s = 1.0 + (elapsed * config.breathe_frequency).sin() * config.breathe_amplitude;
            Some(Vec3::new(1.0, s, 1.0))
        }
    }
}

/// Advance one organ by a frame.
///
/// Organs whose system is hidden keep their state and are marked invisible.
#[must_use]
pub fn modulate_organ(
    state: &MaterialState,
    organ: &OrganDescriptor,
    view: &ViewState,
    elapsed: f32,
    config: &ModulatorConfig,
) -> MaterialState {
    if !view.is_organ_visible(organ.id) {
        return MaterialState {
            visible: false,
            ..*state
        };
    }

    let selected = view.selected == Some(organ.id);
    let highlight = if view.is_highlighted(organ.id) { 1.0 } else { 0.0 };
    let hover_blend = lerp(state.hover_blend, highlight, config.hover_rate);

    let lift = if selected { config.selection_lift } else { 0.0 };

    MaterialState {
        opacity: lerp(state.opacity, organ_opacity_target(organ, view, config), config.opacity_rate),
        emissive_intensity: config.emissive_base + hover_blend * config.emissive_hover,
        hover_blend,
        scale: animation_scale(organ.id.animation(), elapsed, config).unwrap_or(state.scale),
        position_z: lerp(state.position_z, organ.position.z + lift, config.lift_rate),
        visible: true,
    }
}

fn dimming_target(targets: &OpacityTargets, view: &ViewState) -> f32 {
    if view.xray {
        targets.xray
    } else if view.selected.is_some() {
        targets.selection
    } else {
        targets.idle
    }
}

/// Advance the skeleton by a frame.
///
/// Opacity keeps converging while the skeleton is hidden.
#[must_use]
pub fn modulate_skeleton(state: &MaterialState, view: &ViewState, config: &ModulatorConfig) -> MaterialState {
    MaterialState {
        opacity: lerp(state.opacity, dimming_target(&config.skeleton, view), config.opacity_rate),
        visible: view.show_skeleton,
        ..*state
    }
}

/// Advance the body shell by a frame.
///
/// A hidden shell is not updated.
#[must_use]
pub fn modulate_body_shell(state: &MaterialState, view: &ViewState, config: &ModulatorConfig) -> MaterialState {
    if !view.show_body {
        return MaterialState {
            visible: false,
            ..*state
        };
    }

    MaterialState {
        opacity: lerp(state.opacity, dimming_target(&config.body_shell, view), config.shell_opacity_rate),
        visible: true,
        ..*state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use visceral_core::{OrganId, OrganSystem};

    fn config() -> ModulatorConfig {
        ModulatorConfig::default()
    }

    #[test]
    fn test_selected_organ_moves_toward_opaque() {
        let heart = OrganId::Heart.descriptor();
        let view = ViewState::default().with_selected(OrganId::Heart);
        let dimmed = MaterialState {
            opacity: 0.15,
            ..MaterialState::organ(heart)
        };

        let next = modulate_organ(&dimmed, heart, &view, 0.5, &config());
        assert!(next.opacity > 0.15 && next.opacity < 1.0);
        assert_relative_eq!(next.opacity, 0.15 + (1.0 - 0.15) * 0.08, epsilon = 1e-6);
        assert!(next.position_z > heart.position.z);
        assert!(next.hover_blend > 0.0);
    }

    #[test]
    fn test_other_organs_dim_when_something_is_selected() {
        let liver = OrganId::Liver.descriptor();
        let view = ViewState::default().with_selected(OrganId::Heart);
        let mut state = MaterialState::organ(liver);
        for _ in 0..200 {
            state = modulate_organ(&state, liver, &view, 0.0, &config());
        }
        assert_relative_eq!(state.opacity, 0.15, epsilon = 1e-3);
        assert_relative_eq!(state.position_z, liver.position.z, epsilon = 1e-6);
    }

    #[test]
    fn test_xray_targets() {
        let lung = OrganId::LeftLung.descriptor();
        let mut view = ViewState::default().with_xray(true);
        assert_eq!(organ_opacity_target(lung, &view, &config()), 0.3);
        view.hover(Some(OrganId::LeftLung));
        assert_eq!(organ_opacity_target(lung, &view, &config()), 0.7);
        view.select(Some(OrganId::LeftLung));
        assert_eq!(organ_opacity_target(lung, &view, &config()), 0.9);
    }

    #[test]
    fn test_emissive_follows_hover_blend() {
        let brain = OrganId::Brain.descriptor();
        let mut view = ViewState::default();
        view.hover(Some(OrganId::Brain));
        let next = modulate_organ(&MaterialState::organ(brain), brain, &view, 0.0, &config());
        assert_relative_eq!(next.hover_blend, 0.1, epsilon = 1e-6);
        assert_relative_eq!(next.emissive_intensity, 0.15 + 0.1 * 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_pulse_and_breathe() {
        let c = config();
        let t = std::f32::consts::FRAC_PI_2 / 3.5;
        let pulse = animation_scale(AnimationKind::Pulse, t, &c).unwrap();
        assert_relative_eq!(pulse.x, 1.02, epsilon = 1e-5);
        assert_eq!(pulse.x, pulse.z);

        let breath = animation_scale(AnimationKind::Breathe, 1.0, &c).unwrap();
        assert_eq!(breath.x, 1.0);
        assert_relative_eq!(breath.y, 1.0 + 1.2f32.sin() * 0.015, epsilon = 1e-6);

        assert!(animation_scale(AnimationKind::Static, 1.0, &c).is_none());
    }

    #[test]
    fn test_hidden_system_is_frozen() {
        let heart = OrganId::Heart.descriptor();
        let mut view = ViewState::default().with_selected(OrganId::Liver);
        view.toggle_system(OrganSystem::Cardiovascular);

        let state = MaterialState::organ(heart);
        let next = modulate_organ(&state, heart, &view, 1.0, &config());
        assert!(!next.visible);
        assert_eq!(next.opacity, state.opacity);
        assert_eq!(next.scale, state.scale);
    }

    #[test]
    fn test_skeleton_and_shell_targets() {
        let c = config();
        let xray = ViewState::default().with_xray(true);
        let selected = ViewState::default().with_selected(OrganId::Heart);

        let skeleton = modulate_skeleton(&MaterialState::skeleton(), &xray, &c);
        assert_relative_eq!(skeleton.opacity, 0.25 + (0.5 - 0.25) * 0.08, epsilon = 1e-6);

        let shell = modulate_body_shell(&MaterialState::body_shell(), &selected, &c);
        assert_relative_eq!(shell.opacity, 0.08 + (0.04 - 0.08) * 0.05, epsilon = 1e-6);

        let mut hidden = ViewState::default();
        hidden.toggle_body();
        hidden.toggle_skeleton();
        let shell = modulate_body_shell(&MaterialState::body_shell(), &hidden.clone().with_xray(true), &c);
        assert!(!shell.visible);
        assert_eq!(shell.opacity, 0.08);

        let skeleton = modulate_skeleton(&MaterialState::skeleton(), &hidden.with_xray(true), &c);
        assert!(!skeleton.visible);
        assert!(skeleton.opacity > 0.25);
    }
}
