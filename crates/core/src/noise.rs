//! Gradient (Perlin) noise and fractal octave sums, normalized to [0, 1].
//!
//! [`Perlin`] wraps the `noise` crate's permutation-table Perlin generator.
//! Seeds come from the crate's own [`Random`] stream, so a [`crate::Seed`]
//! fully determines the noise field. Sampling is stateless: the same seed
//! and coordinates always give the same value.

use std::sync::OnceLock;

use ::noise::{NoiseFn, Seedable};

use crate::prng::Random;

/// Seed of the generator behind [`perlin2d`] and [`fractal_perlin2d`].
pub const REFERENCE_SEED: u32 = 0;

/// Per-layer coordinate offset in fractal sums. Non-integer so that layers
/// never share lattice alignment.
const LAYER_OFFSET: f64 = 19.19;

/// Gradient noise generator over a seeded permutation table.
#[derive(Debug, Clone)]
pub struct Perlin {
    source: ::noise::Perlin,
}

impl Perlin {
    /// Builds a generator seeded by the next draw from `rng`.
    pub fn new(rng: &mut Random) -> Self {
        Self::from_seed(rng.next_u32())
    }

    pub fn from_seed(seed: u32) -> Self {
        Self {
            source: ::noise::Perlin::new(seed),
        }
    }

    /// Shared generator seeded with [`REFERENCE_SEED`].
    pub fn reference() -> &'static Perlin {
        static REFERENCE: OnceLock<Perlin> = OnceLock::new();
        REFERENCE.get_or_init(|| Perlin::from_seed(REFERENCE_SEED))
    }

    pub fn seed(&self) -> u32 {
        self.source.seed()
    }

    /// Samples 2D gradient noise at `(x, y)`, normalized to [0, 1].
    ///
    /// Integer lattice points return 0.5. Non-finite input also returns 0.5.
    pub fn get(&self, x: f64, y: f64) -> f64 {
        if !(x.is_finite() && y.is_finite()) {
            return 0.5;
        }
        let n = self.source.get([x, y]);
        if !n.is_finite() {
            return 0.5;
        }
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sums `layers` octaves of noise, normalized back to [0, 1].
    ///
    /// Octave `i` samples at frequency `freq_factor^i` with weight
    /// `|amp_factor|^i`, shifted by a per-layer offset. The sum is divided by
    /// the total weight. `layers == 0` is treated as a single layer.
    pub fn fractal(&self, x: f64, y: f64, layers: u32, freq_factor: f64, amp_factor: f64) -> f64 {
        let (sum, norm, _, _) = (0..layers.max(1)).fold(
            (0.0, 0.0, 1.0_f64, 1.0_f64),
            |(sum, norm, amp, freq), i| {
                let offset = f64::from(i) * LAYER_OFFSET;
                let weight = amp.abs();
                (
                    sum + self.get(x * freq + offset, y * freq + offset) * weight,
                    norm + weight,
                    amp * amp_factor,
                    freq * freq_factor,
                )
            },
        );
        if norm > 0.0 && norm.is_finite() {
            (sum / norm).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

impl PartialEq for Perlin {
    fn eq(&self, other: &Self) -> bool {
        self.seed() == other.seed()
    }
}

impl Eq for Perlin {}

impl Default for Perlin {
    fn default() -> Self {
        Perlin::from_seed(REFERENCE_SEED)
    }
}

/// Reference-seed Perlin noise at `(x, y)`, in [0, 1].
pub fn perlin2d(x: f64, y: f64) -> f64 {
    Perlin::reference().get(x, y)
}

/// Reference-seed fractal Perlin noise, in [0, 1].
pub fn fractal_perlin2d(x: f64, y: f64, layers: u32, freq_factor: f64, amp_factor: f64) -> f64 {
    Perlin::reference().fractal(x, y, layers, freq_factor, amp_factor)
}
