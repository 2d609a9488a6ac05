//! Organ metadata table.
//!
//! Static descriptors consumed by scene assembly and material construction.
//! Shape synthesis never reads colors or positions from here; it only
//! produces geometry in each organ's local frame.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ParseIdError};
use crate::types::Vec3;

/// 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// White.
    pub const WHITE: Self = Self::from_u32(0xFF_FF_FF);

    /// Create from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Parse `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] if the string is not a 7-character hex color.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorError::Malformed {
                input: s.to_string(),
            })?;

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex {
                input: s.to_string(),
            });
        }

        u32::from_str_radix(digits, 16)
            .map(Self::from_u32)
            .map_err(|_| ColorError::InvalidHex {
                input: s.to_string(),
            })
    }

    /// Channels as `[0, 1]` floats.
    #[must_use]
    pub fn to_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Multiply every channel by `factor`, clamping to the valid range.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        let ch = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Anatomical system an organ belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganSystem {
    /// Heart and great vessels
    Cardiovascular,
    /// Airways and lungs
    Respiratory,
    /// Alimentary tract and accessory glands
    Digestive,
    /// Brain
    Nervous,
    /// Kidneys and bladder
    Urinary,
    /// Spleen
    Lymphatic,
    /// Ribs and spine
    Skeletal,
}

impl OrganSystem {
    /// Every system, in display order.
    pub const ALL: [Self; 7] = [
        Self::Cardiovascular,
        Self::Respiratory,
        Self::Digestive,
        Self::Nervous,
        Self::Urinary,
        Self::Lymphatic,
        Self::Skeletal,
    ];

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cardiovascular => "cardiovascular",
            Self::Respiratory => "respiratory",
            Self::Digestive => "digestive",
            Self::Nervous => "nervous",
            Self::Urinary => "urinary",
            Self::Lymphatic => "lymphatic",
            Self::Skeletal => "skeletal",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cardiovascular => "Cardiovascular",
            Self::Respiratory => "Respiratory",
            Self::Digestive => "Digestive",
            Self::Nervous => "Nervous",
            Self::Urinary => "Urinary",
            Self::Lymphatic => "Lymphatic",
            Self::Skeletal => "Skeletal",
        }
    }

    /// Legend color.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Cardiovascular => Rgb::from_u32(0xE7_4C_3C),
            Self::Respiratory => Rgb::from_u32(0x5D_AD_E2),
            Self::Digestive => Rgb::from_u32(0xF3_9C_12),
            Self::Nervous => Rgb::from_u32(0xAF_7A_C5),
            Self::Urinary => Rgb::from_u32(0xF4_D0_3F),
            Self::Lymphatic => Rgb::from_u32(0x58_D6_8D),
            Self::Skeletal => Rgb::from_u32(0xEC_F0_F1),
        }
    }

    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for OrganSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganSystem {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sys| sys.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseIdError {
                kind: "system",
                input: s.to_string(),
            })
    }
}

/// Identifier of one of the sixteen organs in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrganId {
    /// Brain
    Brain,
    /// Heart
    Heart,
    /// Left lung
    LeftLung,
    /// Right lung
    RightLung,
    /// Liver
    Liver,
    /// Stomach
    Stomach,
    /// Left kidney
    LeftKidney,
    /// Right kidney
    RightKidney,
    /// Spleen
    Spleen,
    /// Pancreas
    Pancreas,
    /// Urinary bladder
    Bladder,
    /// Small intestine
    SmallIntestine,
    /// Large intestine
    LargeIntestine,
    /// Trachea
    Trachea,
    /// Esophagus
    Esophagus,
    /// Aorta
    Aorta,
}

impl OrganId {
    /// Every organ, in table order.
    pub const ALL: [Self; 16] = [
        Self::Brain,
        Self::Heart,
        Self::LeftLung,
        Self::RightLung,
        Self::Liver,
        Self::Stomach,
        Self::LeftKidney,
        Self::RightKidney,
        Self::Spleen,
        Self::Pancreas,
        Self::Bladder,
        Self::SmallIntestine,
        Self::LargeIntestine,
        Self::Trachea,
        Self::Esophagus,
        Self::Aorta,
    ];

    /// Scene identifier (camelCase).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brain => "brain",
            Self::Heart => "heart",
            Self::LeftLung => "leftLung",
            Self::RightLung => "rightLung",
            Self::Liver => "liver",
            Self::Stomach => "stomach",
            Self::LeftKidney => "leftKidney",
            Self::RightKidney => "rightKidney",
            Self::Spleen => "spleen",
            Self::Pancreas => "pancreas",
            Self::Bladder => "bladder",
            Self::SmallIntestine => "smallIntestine",
            Self::LargeIntestine => "largeIntestine",
            Self::Trachea => "trachea",
            Self::Esophagus => "esophagus",
            Self::Aorta => "aorta",
        }
    }

    /// Static metadata for this organ.
    #[must_use]
    pub fn descriptor(self) -> &'static OrganDescriptor {
        &ORGANS[self as usize]
    }

    /// System this organ belongs to.
    #[must_use]
    pub fn system(self) -> OrganSystem {
        self.descriptor().system
    }

    /// Per-frame animation applied to this organ.
    #[must_use]
    pub const fn animation(self) -> AnimationKind {
        match self {
            Self::Heart | Self::Aorta => AnimationKind::Pulse,
            Self::LeftLung | Self::RightLung => AnimationKind::Breathe,
            _ => AnimationKind::Static,
        }
    }
}

impl fmt::Display for OrganId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseIdError {
                kind: "organ",
                input: s.to_string(),
            })
    }
}

/// Time-driven transform animation for an organ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    /// No transform animation
    Static,
    /// Uniform scale oscillation (heartbeat)
    Pulse,
    /// Vertical scale oscillation (respiration)
    Breathe,
}

/// Static per-organ metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrganDescriptor {
    /// Identifier
    pub id: OrganId,
    /// Display name
    pub name: &'static str,
    /// Anatomical system
    pub system: OrganSystem,
    /// Base surface color
    pub color: Rgb,
    /// Emissive tint
    pub emissive: Rgb,
    /// World-space position of the local frame origin
    pub position: Vec3,
    /// World-space scale
    pub scale: Vec3,
}

const fn organ(
    id: OrganId,
    name: &'static str,
    system: OrganSystem,
    color: u32,
    emissive: u32,
    position: [f32; 3],
    scale: f32,
) -> OrganDescriptor {
    OrganDescriptor {
        id,
        name,
        system,
        color: Rgb::from_u32(color),
        emissive: Rgb::from_u32(emissive),
        position: Vec3::from_array(position),
        scale: Vec3::new(scale, scale, scale),
    }
}

/// The organ table, indexed by `OrganId as usize`.
///
/// Paired organs use the viewer's frame: the left organ sits at negative x.
pub static ORGANS: [OrganDescriptor; 16] = [
    organ(OrganId::Brain, "Brain", OrganSystem::Nervous, 0xE8_B4_B8, 0x4A_20_30, [0.0, 2.9, 0.0], 0.6),
    organ(OrganId::Heart, "Heart", OrganSystem::Cardiovascular, 0xC0_39_2B, 0x5A_10_10, [0.05, 1.25, 0.12], 1.0),
    organ(OrganId::LeftLung, "Left Lung", OrganSystem::Respiratory, 0xE8_A0_A0, 0x4A_20_28, [-0.24, 1.3, 0.0], 1.0),
    organ(OrganId::RightLung, "Right Lung", OrganSystem::Respiratory, 0xE8_A0_A0, 0x4A_20_28, [0.24, 1.3, 0.0], 1.0),
    organ(OrganId::Liver, "Liver", OrganSystem::Digestive, 0x8B_3A_3A, 0x3A_10_10, [0.12, 0.82, 0.05], 1.0),
    organ(OrganId::Stomach, "Stomach", OrganSystem::Digestive, 0xD4_A5_74, 0x4A_30_18, [-0.15, 0.7, 0.08], 1.0),
    organ(OrganId::LeftKidney, "Left Kidney", OrganSystem::Urinary, 0x8B_45_13, 0x3A_18_08, [-0.15, 0.45, -0.12], 1.0),
    organ(OrganId::RightKidney, "Right Kidney", OrganSystem::Urinary, 0x8B_45_13, 0x3A_18_08, [0.15, 0.42, -0.12], 1.0),
    organ(OrganId::Spleen, "Spleen", OrganSystem::Lymphatic, 0x6B_2D_5C, 0x2A_10_20, [-0.28, 0.75, -0.05], 1.0),
    organ(OrganId::Pancreas, "Pancreas", OrganSystem::Digestive, 0xE8_C0_7A, 0x4A_38_18, [0.0, 0.58, -0.02], 1.0),
    organ(OrganId::Bladder, "Bladder", OrganSystem::Urinary, 0xD4_B8_96, 0x40_30_20, [0.0, -0.15, 0.08], 1.0),
    organ(OrganId::SmallIntestine, "Small Intestine", OrganSystem::Digestive, 0xE8_B4_A0, 0x48_28_20, [0.0, 0.3, 0.1], 1.0),
    organ(OrganId::LargeIntestine, "Large Intestine", OrganSystem::Digestive, 0xC4_9A_6C, 0x40_28_18, [0.0, 0.3, 0.08], 1.0),
    organ(OrganId::Trachea, "Trachea", OrganSystem::Respiratory, 0xD8_C8_B8, 0x40_38_30, [0.0, 1.75, 0.02], 1.0),
    organ(OrganId::Esophagus, "Esophagus", OrganSystem::Digestive, 0xC8_7C_6E, 0x40_20_18, [0.0, 1.2, -0.06], 1.0),
    organ(OrganId::Aorta, "Aorta", OrganSystem::Cardiovascular, 0xB2_22_22, 0x50_08_08, [0.02, 1.1, -0.05], 1.0),
];

/// Bone color shared by ribs and spine.
pub const SKELETON_COLOR: Rgb = Rgb::from_u32(0xE8_DC_C8);
/// Bone emissive tint.
pub const SKELETON_EMISSIVE: Rgb = Rgb::from_u32(0x2A_24_18);
/// Skin color of the translucent body shell.
pub const BODY_COLOR: Rgb = Rgb::from_u32(0xE8_D4_C0);
/// Body shell emissive tint.
pub const BODY_EMISSIVE: Rgb = Rgb::from_u32(0x3A_28_20);
/// Body shell sheen color.
pub const BODY_SHEEN: Rgb = Rgb::from_u32(0xFF_E0_C8);
/// Body shell subsurface attenuation color.
pub const BODY_ATTENUATION: Rgb = Rgb::from_u32(0xFF_D5_B0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for id in OrganId::ALL {
            assert_eq!(id.descriptor().id, id);
        }
    }

    #[test]
    fn test_id_round_trips_through_str() {
        for id in OrganId::ALL {
            assert_eq!(id.as_str().parse::<OrganId>(), Ok(id));
        }
        let err = "appendix".parse::<OrganId>().unwrap_err();
        assert_eq!(err.kind, "organ");
    }

    #[test]
    fn test_system_parse_ignores_case() {
        assert_eq!("Respiratory".parse::<OrganSystem>(), Ok(OrganSystem::Respiratory));
        assert!("immune".parse::<OrganSystem>().is_err());
    }

    #[test]
    fn test_paired_organs_mirror_position() {
        let l = OrganId::LeftLung.descriptor().position;
        let r = OrganId::RightLung.descriptor().position;
        assert_eq!(l.x, -r.x);
        assert!(l.x < 0.0);
    }

    #[test]
    fn test_rgb_hex() {
        let c = Rgb::from_hex("#E8DCC8").unwrap();
        assert_eq!(c, SKELETON_COLOR);
        assert_eq!(c.to_string(), "#E8DCC8");
        assert!(matches!(Rgb::from_hex("E8DCC8"), Err(ColorError::Malformed { .. })));
        assert!(matches!(Rgb::from_hex("#GGDCC8"), Err(ColorError::InvalidHex { .. })));
    }

    #[test]
    fn test_rgb_hex_rejects_sign() {
        assert!(matches!(Rgb::from_hex("#+12345"), Err(ColorError::InvalidHex { .. })));
        assert!(matches!(Rgb::from_hex("#-12345"), Err(ColorError::InvalidHex { .. })));
        assert_eq!(Rgb::from_hex("#c0392b").unwrap(), Rgb::from_u32(0xC0_39_2B));
    }

    #[test]
    fn test_rgb_scale() {
        let c = Rgb::new(200, 100, 10).scale(0.3);
        assert_eq!(c, Rgb::new(60, 30, 3));
        assert_eq!(Rgb::new(200, 200, 200).scale(2.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_animation_kinds() {
        assert_eq!(OrganId::Heart.animation(), AnimationKind::Pulse);
        assert_eq!(OrganId::Aorta.animation(), AnimationKind::Pulse);
        assert_eq!(OrganId::RightLung.animation(), AnimationKind::Breathe);
        assert_eq!(OrganId::Liver.animation(), AnimationKind::Static);
    }
}
