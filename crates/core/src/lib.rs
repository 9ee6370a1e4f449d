#![deny(unsafe_code)]
//! Core types for the pixgrid sampling engine.
//!
//! Provides the generic `Grid` with wrap and interpolation policies, the
//! `Pixel` trait and its color types (`Rgba`, `Rgb`, grayscale `f64`,
//! boolean masks), `ColorGradient` with easings and auto-generation, the
//! `Random` LCG, `Seed`, Perlin and fractal noise, and parameter helpers.

pub mod error;
pub mod gradient;
pub mod grid;
pub mod interpolation;
pub mod noise;
pub mod params;
pub mod pixel;
pub mod prng;
pub mod seed;
pub mod wrap;

pub use error::GridError;
pub use gradient::{AutoGradientParams, ColorGradient, Easing, GradientWrap, Keyframe};
pub use grid::{CellContext, Grid};
pub use interpolation::InterpolationMode;
pub use crate::noise::{fractal_perlin2d, perlin2d, Perlin};
pub use pixel::{Pixel, Rgb, Rgba};
pub use prng::Random;
pub use seed::Seed;
pub use wrap::WrapMode;
