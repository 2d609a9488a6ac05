//! Texture and material construction errors.
//!
//! Neither is fatal to a scene: the public constructors catch these and
//! degrade to a placeholder map or a simpler material.

use thiserror::Error;

/// A raster surface could not be allocated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureError {
    /// Width or height is zero
    #[error("Texture dimensions {width}x{height} have a zero side")]
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A side exceeds the largest surface the rasterizer supports
    #[error("Texture dimensions {width}x{height} exceed the {max}px surface limit")]
    DimensionTooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Largest supported side
        max: u32,
    },
}

/// A material could not be built as requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// The renderer lacks a feature the material needs
    #[error("Renderer does not support {feature}")]
    UnsupportedFeature {
        /// Missing feature name
        feature: &'static str,
    },
}
