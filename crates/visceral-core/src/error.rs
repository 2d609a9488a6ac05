//! Error types for Visceral core values.
//!
//! Synthesis itself never fails; these cover constructing inputs from
//! untrusted data (hex strings, identifiers, control-point lists).

use thiserror::Error;

/// Failure to parse a `#RRGGBB` color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// String is not 7 characters starting with `#`
    #[error("Malformed color '{input}': expected #RRGGBB")]
    Malformed {
        /// Offending input
        input: String,
    },

    /// A channel is not valid hexadecimal
    #[error("Invalid hex digits in color '{input}'")]
    InvalidHex {
        /// Offending input
        input: String,
    },
}

/// Failure to parse an organ or system identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} identifier '{input}'")]
pub struct ParseIdError {
    /// What was being parsed ("organ" or "system")
    pub kind: &'static str,
    /// Offending input
    pub input: String,
}

/// Failure to build a curve or lathe profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Fewer control points than the construction needs
    #[error("Curve needs at least {need} control points, got {got}")]
    TooFewPoints {
        /// Points supplied
        got: usize,
        /// Minimum required
        need: usize,
    },

    /// A control point has a NaN or infinite coordinate
    #[error("Control point {index} is not finite")]
    NonFinitePoint {
        /// Index of the bad point
        index: usize,
    },
}
