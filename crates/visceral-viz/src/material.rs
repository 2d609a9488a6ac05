//! Material descriptions for organs, skeleton and body shell.
//!
//! Materials are plain parameter sets for the host renderer. A physical
//! material the renderer cannot honor is downgraded to a standard one
//! keeping color, emissive and opacity, so one unsupported feature never
//! blocks scene assembly.

use serde::{Deserialize, Serialize};
use tracing::warn;
use visceral_core::organ::{
    BODY_ATTENUATION, BODY_COLOR, BODY_EMISSIVE, BODY_SHEEN, SKELETON_COLOR, SKELETON_EMISSIVE,
};
use visceral_core::{OrganDescriptor, Rgb};

use crate::config::RendererCapabilities;
use crate::error::MaterialError;

/// Subsurface attenuation of a transmissive material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    /// Tint light takes on through the volume
    pub color: Rgb,
    /// Distance at which the tint is reached
    pub distance: f32,
}

/// Layers a physically based material adds on top of a standard one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLayers {
    /// Clearcoat strength
    pub clearcoat: f32,
    /// Clearcoat roughness
    pub clearcoat_roughness: f32,
    /// Light transmission
    pub transmission: f32,
    /// Volume thickness for transmission
    pub thickness: f32,
    /// Index of refraction
    pub ior: f32,
    /// Sheen strength
    pub sheen: f32,
    /// Sheen roughness
    pub sheen_roughness: f32,
    /// Sheen tint
    pub sheen_color: Rgb,
    /// Volume attenuation
    pub attenuation: Option<Attenuation>,
    /// Specular intensity override
    pub specular_intensity: Option<f32>,
}

impl PhysicalLayers {
    fn required_feature(&self, capabilities: &RendererCapabilities) -> Result<(), MaterialError> {
        let transmissive = self.transmission > 0.0 || self.attenuation.is_some();
        if transmissive && !capabilities.transmission {
            return Err(MaterialError::UnsupportedFeature { feature: "transmission" });
        }
        if self.clearcoat > 0.0 && !capabilities.clearcoat {
            return Err(MaterialError::UnsupportedFeature { feature: "clearcoat" });
        }
        if self.sheen > 0.0 && !capabilities.sheen {
            return Err(MaterialError::UnsupportedFeature { feature: "sheen" });
        }
        Ok(())
    }
}

/// Shading model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MaterialModel {
    /// Metal/roughness only
    Standard,
    /// Standard plus physical layers
    Physical(PhysicalLayers),
}

/// A renderer-agnostic material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color
    pub color: Rgb,
    /// Emissive tint
    pub emissive: Rgb,
    /// Emissive multiplier
    pub emissive_intensity: f32,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metalness: f32,
    /// Alpha
    pub opacity: f32,
    /// Alpha blending enabled
    pub transparent: bool,
    /// Render back faces too
    pub double_sided: bool,
    /// Write to the depth buffer
    pub depth_write: bool,
    /// Shading model
    pub model: MaterialModel,
}

impl Material {
    /// Opaque standard material of `color`.
    #[must_use]
    pub fn standard(color: Rgb) -> Self {
        Self {
            color,
            emissive: Rgb::new(0, 0, 0),
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            depth_write: true,
            model: MaterialModel::Standard,
        }
    }

    /// Builder: emissive tint and intensity.
    #[must_use]
    pub fn with_emissive(mut self, emissive: Rgb, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    /// Builder: roughness and metalness.
    #[must_use]
    pub fn with_surface(mut self, roughness: f32, metalness: f32) -> Self {
        self.roughness = roughness;
        self.metalness = metalness;
        self
    }

    /// Builder: blended with the given opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self
    }

    /// Builder: render both faces.
    #[must_use]
    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Builder: skip depth writes.
    #[must_use]
    pub fn without_depth_write(mut self) -> Self {
        self.depth_write = false;
        self
    }

    /// Builder: switch to the physical model.
    #[must_use]
    pub fn with_physical(mut self, layers: PhysicalLayers) -> Self {
        self.model = MaterialModel::Physical(layers);
        self
    }

    /// True for the physical model.
    #[must_use]
    pub fn is_physical(&self) -> bool {
        matches!(self.model, MaterialModel::Physical(_))
    }

    /// The standard material this one degrades to.
    #[must_use]
    pub fn fallback(&self) -> Self {
        Self {
            model: MaterialModel::Standard,
            ..*self
        }
    }
}

/// Check that the renderer can draw `request` as described.
///
/// # Errors
///
/// Returns [`MaterialError::UnsupportedFeature`] naming the first missing
/// capability.
pub fn try_build_material(request: &Material, capabilities: &RendererCapabilities) -> Result<Material, MaterialError> {
    if let MaterialModel::Physical(layers) = &request.model {
        if !capabilities.physical_materials {
            return Err(MaterialError::UnsupportedFeature {
                feature: "physical materials",
            });
        }
        layers.required_feature(capabilities)?;
    }
    Ok(*request)
}

/// Build `request`, downgrading to its standard fallback if unsupported.
#[must_use]
pub fn build_material(request: &Material, capabilities: &RendererCapabilities) -> Material {
    try_build_material(request, capabilities).unwrap_or_else(|err| {
        warn!(%err, "Material unsupported; falling back to standard");
        request.fallback()
    })
}

/// Translucent, sheened organ surface in the organ's own colors.
#[must_use]
pub fn organ_material(organ: &OrganDescriptor, capabilities: &RendererCapabilities) -> Material {
    let request = Material::standard(organ.color)
        .with_emissive(organ.emissive, 0.08)
        .with_surface(0.6, 0.0)
        .with_opacity(1.0)
        .double_sided()
        .with_physical(PhysicalLayers {
            clearcoat: 0.15,
            clearcoat_roughness: 0.3,
            transmission: 0.02,
            thickness: 0.5,
            ior: 1.4,
            sheen: 0.3,
            sheen_roughness: 0.8,
            sheen_color: organ.color.scale(0.3),
            attenuation: None,
            specular_intensity: None,
        });

    build_material(&request, capabilities)
}

/// Bone material shared by ribs and spine.
#[must_use]
pub fn skeleton_material() -> Material {
    Material::standard(SKELETON_COLOR)
        .with_emissive(SKELETON_EMISSIVE, 0.08)
        .with_surface(0.35, 0.0)
        .with_opacity(0.25)
}

/// Faint skin over the whole body.
#[must_use]
pub fn body_shell_material(capabilities: &RendererCapabilities) -> Material {
    let request = Material::standard(BODY_COLOR)
        .with_emissive(BODY_EMISSIVE, 0.05)
        .with_surface(0.45, 0.0)
        .with_opacity(0.08)
        .double_sided()
        .without_depth_write()
        .with_physical(PhysicalLayers {
            clearcoat: 0.3,
            clearcoat_roughness: 0.4,
            transmission: 0.25,
            thickness: 2.0,
            ior: 1.38,
            sheen: 0.4,
            sheen_roughness: 0.7,
            sheen_color: BODY_SHEEN,
            attenuation: Some(Attenuation {
                color: BODY_ATTENUATION,
                distance: 1.0,
            }),
            specular_intensity: Some(0.3),
        });

    build_material(&request, capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visceral_core::OrganId;

    #[test]
    fn test_organ_material_is_physical_with_full_renderer() {
        let heart = OrganId::Heart.descriptor();
        let material = organ_material(heart, &RendererCapabilities::full());
        assert!(material.is_physical());
        assert!(material.double_sided);
        assert_eq!(material.opacity, 1.0);

        let MaterialModel::Physical(layers) = material.model else {
            panic!("expected physical model");
        };
        assert_eq!(layers.sheen_color, heart.color.scale(0.3));
        assert_eq!(layers.ior, 1.4);
    }

    #[test]
    fn test_missing_sheen_falls_back_to_standard() {
        let caps = RendererCapabilities {
            sheen: false,
            ..RendererCapabilities::full()
        };
        let liver = OrganId::Liver.descriptor();
        let request = Material::standard(liver.color).with_physical(PhysicalLayers {
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            transmission: 0.0,
            thickness: 0.0,
            ior: 1.5,
            sheen: 0.3,
            sheen_roughness: 0.8,
            sheen_color: liver.color,
            attenuation: None,
            specular_intensity: None,
        });

        assert_eq!(
            try_build_material(&request, &caps),
            Err(MaterialError::UnsupportedFeature { feature: "sheen" })
        );
        assert!(!build_material(&request, &caps).is_physical());
    }

    #[test]
    fn test_body_shell_fallback_keeps_color_and_opacity() {
        let material = body_shell_material(&RendererCapabilities::minimal());
        assert_eq!(material.model, MaterialModel::Standard);
        assert_eq!(material.color, BODY_COLOR);
        assert_eq!(material.opacity, 0.08);
        assert!(material.transparent && material.double_sided);
    }

    #[test]
    fn test_body_shell_needs_transmission() {
        let caps = RendererCapabilities {
            transmission: false,
            ..RendererCapabilities::full()
        };
        assert!(!body_shell_material(&caps).is_physical());
        assert!(body_shell_material(&RendererCapabilities::full()).is_physical());
    }

    #[test]
    fn test_skeleton_material() {
        let material = skeleton_material();
        assert_eq!(material.color, SKELETON_COLOR);
        assert_eq!(material.opacity, 0.25);
        assert!(!material.double_sided);
    }
}
