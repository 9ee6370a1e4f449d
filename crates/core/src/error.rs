//! Error types for the pixgrid core.

use thiserror::Error;

/// Errors produced by grid, gradient and sampling operations.
#[derive(Debug, Error)]
pub enum GridError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An (x, y) coordinate was outside the grid bounds for a raw write.
    #[error("index ({x}, {y}) out of bounds for grid of size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A buffer or second grid did not match the expected dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A recognized but unimplemented feature was selected.
    #[error("feature not supported: {0}")]
    UnsupportedFeature(String),

    /// A wrap-mode identifier could not be parsed.
    #[error("unknown wrap mode: '{0}'")]
    UnknownWrapMode(String),

    /// An interpolation-mode identifier could not be parsed.
    #[error("unknown interpolation mode: '{0}'")]
    UnknownInterpolationMode(String),

    /// An easing identifier could not be parsed.
    #[error("unknown easing: '{0}'")]
    UnknownEasing(String),

    /// A scale factor was zero, negative, or not finite.
    #[error("invalid scale factor: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A gradient could not be constructed from the given keyframes or params.
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),

    /// A seed value could not be interpreted.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
}
