//! Pixel algebras: the per-color-model operations a [`Grid`](crate::Grid)
//! needs to sample, resample and display its cells.
//!
//! Four models are provided:
//!
//! | model     | element | `blend`                              |
//! |-----------|---------|--------------------------------------|
//! | RGBA      | [`Rgba`]| alpha-weighted compositing           |
//! | RGB       | [`Rgb`] | per-channel linear                   |
//! | grayscale | `f64`   | scalar linear                        |
//! | boolean   | `bool`  | step at `t > 0.5`                    |
//!
//! All channels live in [0, 255]. The canonical display color is [`Rgba`].

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Rec. 601 luma weight for red.
pub const LUMA_R: f64 = 0.2989;
/// Rec. 601 luma weight for green.
pub const LUMA_G: f64 = 0.5870;
/// Rec. 601 luma weight for blue.
pub const LUMA_B: f64 = 0.1140;

/// Lower bound on the combined alpha in [`Rgba`] blending.
const ALPHA_EPSILON: f64 = 1e-9;

/// Alpha of a fully opaque color.
const OPAQUE: f64 = 255.0;

/// Operations that make a cell type usable in a grid.
///
/// `blend` must return `a` at `t == 0` and `b` at `t == 1` up to rounding;
/// the grid never calls it with `t` outside [0, 1].
pub trait Pixel: Clone {
    /// Mixes `a` toward `b` by `t`.
    fn blend(a: &Self, b: &Self, t: f64) -> Self;

    /// Converts the value to the canonical display color.
    fn to_display_color(&self) -> Rgba;

    /// Builds a value from a display color.
    fn from_display_color(color: Rgba) -> Self;
}

/// Four-channel color, channels in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Three-channel opaque color, channels in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::opaque(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::opaque(255.0, 255.0, 255.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// A color with alpha 255.
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, OPAQUE)
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Weighted luma of the color channels (alpha ignored).
    pub fn luma(&self) -> f64 {
        LUMA_R * self.r + LUMA_G * self.g + LUMA_B * self.b
    }

    /// Quantizes to `[r, g, b, a]` bytes, clamping and rounding each channel.
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(self.a),
        ]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let [r, g, b, a] = bytes.map(f64::from);
        Self { r, g, b, a }
    }

    /// Parses `"#rrggbb"` or `"#rrggbbaa"` (the `#` is optional, case
    /// insensitive). Six-digit colors are opaque.
    ///
    /// Returns `GridError::InvalidColor` for anything else.
    pub fn from_hex(hex: &str) -> Result<Rgba, GridError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(GridError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got '{hex}'"
            )));
        }
        let component = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(f64::from)
                .map_err(|e| GridError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        let r = component(0..2, "red")?;
        let g = component(2..4, "green")?;
        let b = component(4..6, "blue")?;
        let a = if hex.len() == 8 {
            component(6..8, "alpha")?
        } else {
            OPAQUE
        };
        Ok(Rgba { r, g, b, a })
    }

    /// Formats as `"#rrggbb"` when opaque, `"#rrggbbaa"` otherwise.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_bytes();
        if a == u8::MAX {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

fn channel_to_byte(c: f64) -> u8 {
    c.clamp(0.0, 255.0).round() as u8
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Pixel for Rgba {
    /// Alpha-weighted mix: each side contributes in proportion to its
    /// alpha times its weight, and the result alpha is the combined weight.
    fn blend(a: &Self, b: &Self, t: f64) -> Self {
        let alpha_a = a.a * (1.0 - t);
        let alpha_b = b.a * t;
        let total = (alpha_a + alpha_b).max(ALPHA_EPSILON);
        let mix = |ca: f64, cb: f64| (alpha_b * cb + alpha_a * ca) / total;
        Rgba {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: total,
        }
    }

    fn to_display_color(&self) -> Rgba {
        *self
    }

    fn from_display_color(color: Rgba) -> Self {
        color
    }
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        Rgba::opaque(c.r, c.g, c.b)
    }
}

impl Pixel for Rgb {
    fn blend(a: &Self, b: &Self, t: f64) -> Self {
        Rgb {
            r: lerp(a.r, b.r, t),
            g: lerp(a.g, b.g, t),
            b: lerp(a.b, b.b, t),
        }
    }

    fn to_display_color(&self) -> Rgba {
        Rgba::from(*self)
    }

    fn from_display_color(color: Rgba) -> Self {
        Rgb::new(color.r, color.g, color.b)
    }
}

/// Grayscale: a single intensity in [0, 255].
impl Pixel for f64 {
    fn blend(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }

    fn to_display_color(&self) -> Rgba {
        Rgba::opaque(*self, *self, *self)
    }

    fn from_display_color(color: Rgba) -> Self {
        color.luma()
    }
}

/// Boolean masks. `blend` is a step function, so boolean grids only make
/// sense with point-sampling interpolation; bilinear resampling of a mask
/// degenerates to picking the nearer side.
impl Pixel for bool {
    fn blend(a: &Self, b: &Self, t: f64) -> Self {
        if t > 0.5 {
            *b
        } else {
            *a
        }
    }

    fn to_display_color(&self) -> Rgba {
        if *self {
            Rgba::WHITE
        } else {
            Rgba::BLACK
        }
    }

    fn from_display_color(color: Rgba) -> Self {
        color.luma() >= 127.5
    }
}
