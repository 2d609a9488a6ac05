//! Viewer configuration.
//!
//! Every default reproduces the constants the viewer was tuned with, so an
//! empty JSON object (`{}`) deserializes to the stock configuration.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Textures
// ============================================================================

/// Surface texture synthesis settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Map width in pixels
    pub width: u32,
    /// Map height in pixels
    pub height: u32,
    /// Mean value of the roughness map
    pub base_roughness: f32,
    /// `|fbm|` below this marks a vein pixel in the color map
    pub vein_threshold: f32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            base_roughness: 0.5,
            vein_threshold: 0.15,
        }
    }
}

impl TextureConfig {
    /// Builder: set map dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Pixel count of one map.
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// ============================================================================
// Animation
// ============================================================================

/// Opacity targets for a structure that dims when something is selected.
///
/// The skeleton and the body shell default to different targets, so fields
/// missing from a config fall back to the targets of the structure they
/// configure rather than to a shared `Default`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpacityTargets {
    /// Target while x-ray mode is on
    pub xray: f32,
    /// Target while any organ is selected
    pub selection: f32,
    /// Target otherwise
    pub idle: f32,
}

impl OpacityTargets {
    /// Skeleton targets.
    pub const SKELETON: Self = Self {
        xray: 0.5,
        selection: 0.1,
        idle: 0.25,
    };

    /// Body shell targets.
    pub const BODY_SHELL: Self = Self {
        xray: 0.05,
        selection: 0.04,
        idle: 0.08,
    };
}

#[derive(Deserialize)]
struct PartialTargets {
    xray: Option<f32>,
    selection: Option<f32>,
    idle: Option<f32>,
}

impl PartialTargets {
    fn or(self, defaults: OpacityTargets) -> OpacityTargets {
        OpacityTargets {
            xray: self.xray.unwrap_or(defaults.xray),
            selection: self.selection.unwrap_or(defaults.selection),
            idle: self.idle.unwrap_or(defaults.idle),
        }
    }
}

fn skeleton_targets<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OpacityTargets, D::Error> {
    PartialTargets::deserialize(deserializer).map(|p| p.or(OpacityTargets::SKELETON))
}

fn body_shell_targets<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OpacityTargets, D::Error> {
    PartialTargets::deserialize(deserializer).map(|p| p.or(OpacityTargets::BODY_SHELL))
}

/// Opacity targets for organs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganOpacity {
    /// X-ray, this organ selected
    pub xray_selected: f32,
    /// X-ray, this organ hovered
    pub xray_hovered: f32,
    /// X-ray, neither
    pub xray: f32,
    /// Another organ is selected
    pub dimmed: f32,
    /// Nothing selected, no x-ray
    pub idle: f32,
}

impl Default for OrganOpacity {
    fn default() -> Self {
        Self {
            xray_selected: 0.9,
            xray_hovered: 0.7,
            xray: 0.3,
            dimmed: 0.15,
            idle: 1.0,
        }
    }
}

/// Rates and targets for per-frame material modulation.
///
/// Rates are the `t` of `lerp(current, target, t)`, applied once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulatorConfig {
    /// Hover blend rate
    pub hover_rate: f32,
    /// Organ and skeleton opacity rate
    pub opacity_rate: f32,
    /// Body shell opacity rate
    pub shell_opacity_rate: f32,
    /// Selected organ z-lift rate
    pub lift_rate: f32,
    /// How far a selected organ moves toward the camera
    pub selection_lift: f32,
    /// Organ emissive intensity at zero hover blend
    pub emissive_base: f32,
    /// Extra emissive intensity at full hover blend
    pub emissive_hover: f32,
    /// Pulse angular frequency (rad/s)
    pub pulse_frequency: f32,
    /// Pulse scale amplitude
    pub pulse_amplitude: f32,
    /// Breathing angular frequency (rad/s)
    pub breathe_frequency: f32,
    /// Breathing y-scale amplitude
    pub breathe_amplitude: f32,
    /// Organ opacity targets
    pub organ: OrganOpacity,
    /// Skeleton opacity targets
    #[serde(deserialize_with = "skeleton_targets")]
    pub skeleton: OpacityTargets,
    /// Body shell opacity targets
    #[serde(deserialize_with = "body_shell_targets")]
    pub body_shell: OpacityTargets,
}

impl Default for ModulatorConfig {
    fn default() -> Self {
        Self {
            hover_rate: 0.1,
            opacity_rate: 0.08,
            shell_opacity_rate: 0.05,
            lift_rate: 0.05,
            selection_lift: 0.15,
            emissive_base: 0.15,
            emissive_hover: 0.4,
            pulse_frequency: 3.5,
            pulse_amplitude: 0.02,
            breathe_frequency: 1.2,
            breathe_amplitude: 0.015,
            organ: OrganOpacity::default(),
            skeleton: OpacityTargets::SKELETON,
            body_shell: OpacityTargets::BODY_SHELL,
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// What the host renderer can do.
///
/// Material construction downgrades when a feature is missing; texture
/// synthesis returns placeholders when no raster surface is available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererCapabilities {
    /// Physically based materials at all
    pub physical_materials: bool,
    /// Transmission and attenuation
    pub transmission: bool,
    /// Clearcoat layer
    pub clearcoat: bool,
    /// Sheen layer
    pub sheen: bool,
    /// CPU raster surface for texture synthesis
    pub raster_surface: bool,
}

impl Default for RendererCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

impl RendererCapabilities {
    /// Every feature available.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            physical_materials: true,
            transmission: true,
            clearcoat: true,
            sheen: true,
            raster_surface: true,
        }
    }

    /// Standard materials only, no raster surface.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            physical_materials: false,
            transmission: false,
            clearcoat: false,
            sheen: false,
            raster_surface: false,
        }
    }
}

// ============================================================================
// Viewer
// ============================================================================

/// Top-level viewer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Texture synthesis
    pub texture: TextureConfig,
    /// Per-frame modulation
    pub modulator: ModulatorConfig,
    /// Host renderer features
    pub capabilities: RendererCapabilities,
    /// Synthesize across worker threads when the `parallel` feature is on
    pub parallel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            texture: TextureConfig::default(),
            modulator: ModulatorConfig::default(),
            capabilities: RendererCapabilities::default(),
            parallel: true,
        }
    }
}

impl ViewerConfig {
    /// Builder: set texture settings.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureConfig) -> Self {
        self.texture = texture;
        self
    }

    /// Builder: set renderer capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: RendererCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Builder: enable or disable parallel synthesis.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
