//! Reconstruction: how a continuous coordinate becomes a cell value.
//!
//! Every mode reduces to lookups at integer lattice points (which the grid
//! resolves through its [`WrapMode`](crate::WrapMode)) plus, for bilinear,
//! the pixel algebra's [`Pixel::blend`].

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::pixel::Pixel;
use crate::prng::Random;

/// Interpolation mode selectable on a grid.
///
/// `Bicubic` is recognized by name but not implemented; selecting it on a
/// grid fails with `GridError::UnsupportedFeature`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Cell at `(floor(x), floor(y))`.
    Floor,
    /// Cell at `(round(x), round(y))`.
    Nearest,
    /// Dithered nearest neighbour: a random pick between the bracketing
    /// cells, weighted by distance, drawn from the grid's [`Random`].
    Stochastic,
    /// Linear blend along x, then along y.
    #[default]
    Bilinear,
    Bicubic,
}

impl InterpolationMode {
    pub const ALL: [InterpolationMode; 5] = [
        InterpolationMode::Floor,
        InterpolationMode::Nearest,
        InterpolationMode::Stochastic,
        InterpolationMode::Bilinear,
        InterpolationMode::Bicubic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InterpolationMode::Floor => "floor",
            InterpolationMode::Nearest => "nearest",
            InterpolationMode::Stochastic => "stochastic",
            InterpolationMode::Bilinear => "bilinear",
            InterpolationMode::Bicubic => "bicubic",
        }
    }

    /// Whether a grid accepts this mode.
    pub fn is_supported(self) -> bool {
        Reconstruction::try_from(self).is_ok()
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        InterpolationMode::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| GridError::UnknownInterpolationMode(s.to_string()))
    }
}

/// The implemented subset of [`InterpolationMode`]. A grid only ever holds
/// one of these, so sampling has no failure path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Reconstruction {
    Floor,
    Nearest,
    Stochastic,
    #[default]
    Bilinear,
}

impl TryFrom<InterpolationMode> for Reconstruction {
    type Error = GridError;

    fn try_from(mode: InterpolationMode) -> Result<Self, Self::Error> {
        match mode {
            InterpolationMode::Floor => Ok(Reconstruction::Floor),
            InterpolationMode::Nearest => Ok(Reconstruction::Nearest),
            InterpolationMode::Stochastic => Ok(Reconstruction::Stochastic),
            InterpolationMode::Bilinear => Ok(Reconstruction::Bilinear),
            InterpolationMode::Bicubic => Err(GridError::UnsupportedFeature(
                "bicubic interpolation".to_string(),
            )),
        }
    }
}

impl From<Reconstruction> for InterpolationMode {
    fn from(r: Reconstruction) -> Self {
        match r {
            Reconstruction::Floor => InterpolationMode::Floor,
            Reconstruction::Nearest => InterpolationMode::Nearest,
            Reconstruction::Stochastic => InterpolationMode::Stochastic,
            Reconstruction::Bilinear => InterpolationMode::Bilinear,
        }
    }
}

impl Reconstruction {
    /// Reconstructs the value at `(x, y)` from lattice lookups.
    ///
    /// `rng` is borrowed only by the stochastic mode, and only when a
    /// coordinate is fractional.
    pub(crate) fn sample<T, F>(self, x: f64, y: f64, rng: &RefCell<Random>, lookup: F) -> T
    where
        T: Pixel,
        F: Fn(i64, i64) -> T,
    {
        match self {
            Reconstruction::Floor => lookup(x.floor() as i64, y.floor() as i64),
            Reconstruction::Nearest => lookup(x.round() as i64, y.round() as i64),
            Reconstruction::Stochastic => {
                let (x0, fx) = split(x);
                let (y0, fy) = split(y);
                if fx == 0.0 && fy == 0.0 {
                    return lookup(x0, y0);
                }
                let mut rng = rng.borrow_mut();
                let xi = dither(x0, fx, &mut rng);
                let yi = dither(y0, fy, &mut rng);
                lookup(xi, yi)
            }
            Reconstruction::Bilinear => {
                let (x0, fx) = split(x);
                let (y0, fy) = split(y);
                let row = |yi: i64| {
                    let left = lookup(x0, yi);
                    if fx == 0.0 {
                        left
                    } else {
                        T::blend(&left, &lookup(x0.saturating_add(1), yi), fx)
                    }
                };
                let top = row(y0);
                if fy == 0.0 {
                    top
                } else {
                    T::blend(&top, &row(y0.saturating_add(1)), fy)
                }
            }
        }
    }
}

/// Splits a coordinate into its lattice floor and fractional part.
fn split(v: f64) -> (i64, f64) {
    let floor = v.floor();
    (floor as i64, v - floor)
}

/// Picks `base + 1` with probability `frac`, else `base`. Integral
/// coordinates consume no draw.
fn dither(base: i64, frac: f64, rng: &mut Random) -> i64 {
    if frac == 0.0 {
        base
    } else if rng.next_f64() < frac {
        base.saturating_add(1)
    } else {
        base
    }
}
