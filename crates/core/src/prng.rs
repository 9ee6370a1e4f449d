//! Deterministic PRNG based on a 32-bit linear congruential generator.
//!
//! Same seed always produces the same sequence on every platform: the core
//! step is pure wrapping `u32` arithmetic. Floating-point draws, Gaussian
//! sampling and shuffling are all derived from that single integer stream.

use serde::{Deserialize, Serialize};

use crate::seed::Seed;

/// LCG multiplier (Numerical Recipes).
const MULTIPLIER: u32 = 1_664_525;
/// LCG increment (Numerical Recipes).
const INCREMENT: u32 = 1_013_904_223;
/// Draws discarded at construction so that nearby seeds decorrelate.
const WARM_UP_DRAWS: usize = 10;
/// 2^32, the LCG modulus, as a float divisor.
const MODULUS: f64 = 4_294_967_296.0;

/// Seeded linear congruential generator (`a = 1664525`, `c = 1013904223`,
/// `m = 2^32`).
///
/// The whole state is one `u32`. It is only advanced by draws; sharing a
/// stream between consumers means passing `&mut Random` explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Random {
    state: u32,
}

impl Random {
    /// Creates a generator from a numeric seed and performs the warm-up draws.
    pub fn new(seed: u32) -> Self {
        let mut rng = Self { state: seed };
        for _ in 0..WARM_UP_DRAWS {
            rng.next_u32();
        }
        rng
    }

    /// Creates a generator from a numeric or phrase seed.
    pub fn from_seed(seed: &Seed) -> Self {
        Self::new(seed.value())
    }

    /// Advances the state and returns it.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / MODULUS
    }

    /// Returns a uniformly distributed f64 in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Returns a uniformly distributed integer in [lo, hi] (both inclusive).
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi as f64 - lo as f64) + 1.0;
        let offset = (self.next_f64() * span).floor() as i64;
        lo.saturating_add(offset).min(hi)
    }

    /// Picks a uniformly random element, or `None` for an empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.uniform_int(0, items.len() as i64 - 1) as usize;
        items.get(idx)
    }

    /// Normally distributed sample via the Box-Muller transform (two draws).
    pub fn gaussian(&mut self, mean: f64, std: f64) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + std * z
    }

    /// Log-normally distributed sample: `exp(gaussian(mean, log_std))`.
    pub fn log_gaussian(&mut self, mean: f64, log_std: f64) -> f64 {
        self.gaussian(mean, log_std).exp()
    }

    /// Shuffles `items` in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.uniform_int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }
}
