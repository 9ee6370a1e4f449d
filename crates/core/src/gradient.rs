//! Color gradients: keyframed colors evaluated at any real input.
//!
//! A [`ColorGradient`] is an ordered list of [`Keyframe`]s plus a
//! [`GradientWrap`] rule for inputs outside the keyframe range. Two curve
//! families exist:
//!
//! - **uniform** gradients ([`ColorGradient::uniform`]) space their colors
//!   evenly over [0, 1] and mix neighbours with an [`Easing`];
//! - **keyframed** gradients ([`ColorGradient::from_keyframes`],
//!   [`ColorGradient::auto`]) locate the bracketing keyframes by binary
//!   search and run a Catmull-Rom spline through them.
//!
//! Spline output is clamped channel-wise to [0, 255].

use std::cell::RefCell;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GridError;
use crate::params::{param_bool, param_color, param_f64, param_parsed};
use crate::pixel::{Pixel, Rgba};
use crate::prng::Random;
use crate::seed::Seed;

/// Upper bound on keyframes produced by the auto-gradient random walk.
const MAX_AUTO_KEYFRAMES: usize = 4096;

/// Upper end of every color channel.
const CHANNEL_MAX: f64 = 255.0;

/// How inputs outside the keyframe range are folded back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientWrap {
    #[default]
    Clamp,
    Repeat,
    Mirror,
    /// Clamp, but outside the range the color's alpha is forced to 0.
    Transparent,
    /// Pass the input through unchanged; the first and last segments are
    /// extrapolated past the domain.
    NoWrap,
}

/// Shaping function applied to the local parameter of a uniform gradient
/// segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    /// Smoothstep `t^2 (3 - 2t)`.
    Cubic,
    /// Half cosine `(1 - cos(pi t)) / 2`.
    #[serde(rename = "sin")]
    Sine,
    /// Not an easing of `t` alone: the segment is evaluated as a
    /// Catmull-Rom spline through the neighbouring colors.
    CatmullRom,
    Floor,
    Ceil,
    Nearest,
    /// Random step: the segment end is chosen with probability `t`.
    Stochastic,
}

macro_rules! named_enum {
    ($ty:ty, $err:ident, [$($variant:path => $name:literal),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = GridError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_ascii_lowercase().replace('_', "-");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == key)
                    .ok_or_else(|| GridError::$err(s.to_string()))
            }
        }
    };
}

named_enum!(GradientWrap, UnknownWrapMode, [
    GradientWrap::Clamp => "clamp",
    GradientWrap::Repeat => "repeat",
    GradientWrap::Mirror => "mirror",
    GradientWrap::Transparent => "transparent",
    GradientWrap::NoWrap => "no-wrap",
]);

named_enum!(Easing, UnknownEasing, [
    Easing::Linear => "linear",
    Easing::Cubic => "cubic",
    Easing::Sine => "sin",
    Easing::CatmullRom => "catmull-rom",
    Easing::Floor => "floor",
    Easing::Ceil => "ceil",
    Easing::Nearest => "nearest",
    Easing::Stochastic => "stochastic",
]);

impl Easing {
    /// Maps a segment parameter `t` in [0, 1] to a blend weight.
    ///
    /// `rng` is drawn from only by [`Easing::Stochastic`].
    pub fn apply(self, t: f64, rng: &mut Random) -> f64 {
        match self {
            Easing::Linear | Easing::CatmullRom => t,
            Easing::Cubic => t * t * (3.0 - 2.0 * t),
            Easing::Sine => (1.0 - (PI * t).cos()) / 2.0,
            Easing::Floor => 0.0,
            Easing::Ceil => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Easing::Nearest => {
                if t < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
            Easing::Stochastic => {
                if rng.next_f64() < t {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A color anchored at a position along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub position: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    Eased(Easing),
    Spline,
}

/// Immutable keyframe sequence with a selectable wrap rule.
#[derive(Debug, Clone)]
pub struct ColorGradient {
    keyframes: Vec<Keyframe>,
    curve: Curve,
    wrap: GradientWrap,
    rng: RefCell<Random>,
}

/// Options for the procedural random-walk gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoGradientParams {
    pub seed: Seed,
    /// Distance between keyframes (mean scale when spacing is not uniform).
    pub step_size: f64,
    /// Per-step channel change, as a fraction of 255 (Gaussian std dev).
    pub color_diff: f64,
    /// Position of the last keyframe; the gradient spans `[0, wrap_bound]`.
    pub wrap_bound: f64,
    /// Fixed `step_size` spacing, or log-normal spacing when `false`.
    pub uniform_spacing: bool,
    /// First keyframe color; random when `None`.
    pub start_color: Option<Rgba>,
    pub wrap: GradientWrap,
}

impl Default for AutoGradientParams {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            step_size: 0.1,
            color_diff: 0.2,
            wrap_bound: 1.0,
            uniform_spacing: true,
            start_color: None,
            wrap: GradientWrap::Clamp,
        }
    }
}

impl AutoGradientParams {
    /// Reads options from a JSON object, falling back to defaults for
    /// missing keys.
    ///
    /// Keys: `seed` (number or phrase), `step_size`, `color_diff`,
    /// `wrap_bound`, `uniform_spacing`, `start_color` (hex), `wrap`.
    /// Unparseable seeds, colors and wrap names are errors.
    pub fn from_json(params: &Value) -> Result<Self, GridError> {
        let d = Self::default();
        let seed = match params.get("seed") {
            None | Some(Value::Null) => d.seed,
            Some(v) => Seed::from_json(v)?,
        };
        Ok(Self {
            seed,
            step_size: param_f64(params, "step_size", d.step_size),
            color_diff: param_f64(params, "color_diff", d.color_diff),
            wrap_bound: param_f64(params, "wrap_bound", d.wrap_bound),
            uniform_spacing: param_bool(params, "uniform_spacing", d.uniform_spacing),
            start_color: param_color(params, "start_color")?,
            wrap: param_parsed(params, "wrap", d.wrap)?,
        })
    }
}

impl ColorGradient {
    fn build(keyframes: Vec<Keyframe>, curve: Curve, wrap: GradientWrap) -> Self {
        Self {
            keyframes,
            curve,
            wrap,
            rng: RefCell::new(Random::new(0)),
        }
    }

    /// Evenly spaces `colors` over [0, 1] and mixes neighbours with `easing`.
    ///
    /// Returns `GridError::InvalidGradient` if `colors` is empty.
    pub fn uniform(colors: Vec<Rgba>, easing: Easing, wrap: GradientWrap) -> Result<Self, GridError> {
        if colors.is_empty() {
            return Err(GridError::InvalidGradient(
                "gradient requires at least 1 color".to_string(),
            ));
        }
        let n = colors.len().saturating_sub(1).max(1) as f64;
        let keyframes = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| Keyframe {
                position: i as f64 / n,
                color,
            })
            .collect();
        Ok(Self::build(keyframes, Curve::Eased(easing), wrap))
    }

    /// Builds a spline gradient through explicit keyframes.
    ///
    /// Positions must be finite and strictly increasing. Returns
    /// `GridError::InvalidGradient` otherwise, or for an empty list.
    pub fn from_keyframes(keyframes: Vec<Keyframe>, wrap: GradientWrap) -> Result<Self, GridError> {
        if keyframes.is_empty() {
            return Err(GridError::InvalidGradient(
                "gradient requires at least 1 keyframe".to_string(),
            ));
        }
        if let Some(k) = keyframes.iter().find(|k| !k.position.is_finite()) {
            return Err(GridError::InvalidGradient(format!(
                "keyframe position {} is not finite",
                k.position
            )));
        }
        if let Some(pair) = keyframes.windows(2).find(|w| w[1].position <= w[0].position) {
            return Err(GridError::InvalidGradient(format!(
                "keyframe positions must strictly increase: {} then {}",
                pair[0].position, pair[1].position
            )));
        }
        Ok(Self::build(keyframes, Curve::Spline, wrap))
    }

    /// Procedural gradient: a seeded random walk through color space.
    ///
    /// Starting at position 0, each step advances by `step_size` (or by
    /// `log_gaussian(0, 1) * step_size` for non-uniform spacing) and moves
    /// every channel by an independent Gaussian with standard deviation
    /// `color_diff * 255`, reflected back into [0, 255]. The walk stops when
    /// it reaches `wrap_bound`; the last keyframe sits exactly on it.
    ///
    /// Returns `GridError::InvalidGradient` for non-positive or non-finite
    /// sizes, or when the walk would need more than 4096 keyframes to reach
    /// `wrap_bound`.
    pub fn auto(params: &AutoGradientParams) -> Result<Self, GridError> {
        if !(params.step_size.is_finite() && params.step_size > 0.0) {
            return Err(GridError::InvalidGradient(format!(
                "step_size must be finite and > 0, got {}",
                params.step_size
            )));
        }
        if !(params.wrap_bound.is_finite() && params.wrap_bound > 0.0) {
            return Err(GridError::InvalidGradient(format!(
                "wrap_bound must be finite and > 0, got {}",
                params.wrap_bound
            )));
        }
        if !(params.color_diff.is_finite() && params.color_diff >= 0.0) {
            return Err(GridError::InvalidGradient(format!(
                "color_diff must be finite and >= 0, got {}",
                params.color_diff
            )));
        }

        let max_steps = (MAX_AUTO_KEYFRAMES - 1) as f64;
        if params.wrap_bound / params.step_size > max_steps {
            return Err(GridError::InvalidGradient(format!(
                "wrap_bound {} / step_size {} needs more than {MAX_AUTO_KEYFRAMES} keyframes",
                params.wrap_bound, params.step_size
            )));
        }

        let mut rng = Random::from_seed(&params.seed);
        let mut color = match params.start_color {
            Some(c) => c,
            None => Rgba::opaque(
                rng.uniform(0.0, CHANNEL_MAX),
                rng.uniform(0.0, CHANNEL_MAX),
                rng.uniform(0.0, CHANNEL_MAX),
            ),
        };
        let std = params.color_diff * CHANNEL_MAX;
        let bound = params.wrap_bound;

        let mut keyframes = vec![Keyframe {
            position: 0.0,
            color,
        }];
        let mut position = 0.0;
        let mut reached = false;
        for step in 1..MAX_AUTO_KEYFRAMES {
            position = if params.uniform_spacing {
                step as f64 * params.step_size
            } else {
                position + rng.log_gaussian(0.0, 1.0) * params.step_size
            };
            color = Rgba {
                r: reflect_channel(color.r + rng.gaussian(0.0, std)),
                g: reflect_channel(color.g + rng.gaussian(0.0, std)),
                b: reflect_channel(color.b + rng.gaussian(0.0, std)),
                a: color.a,
            };
            if position >= bound {
                reached = true;
                break;
            }
            let last = keyframes.last().map_or(0.0, |k| k.position);
            if position > last {
                keyframes.push(Keyframe { position, color });
            }
        }
        if !reached {
            log::warn!("auto gradient: walk did not reach {bound} within {MAX_AUTO_KEYFRAMES} keyframes");
            return Err(GridError::InvalidGradient(format!(
                "random walk did not reach wrap_bound {bound} within {MAX_AUTO_KEYFRAMES} keyframes"
            )));
        }
        keyframes.push(Keyframe {
            position: bound,
            color,
        });
        log::debug!(
            "auto gradient: {} keyframes over [0, {bound}] (seed {})",
            keyframes.len(),
            params.seed
        );
        Self::from_keyframes(keyframes, params.wrap)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// First and last keyframe positions.
    pub fn domain(&self) -> (f64, f64) {
        let first = self.keyframes.first().map_or(0.0, |k| k.position);
        let last = self.keyframes.last().map_or(first, |k| k.position);
        (first, last)
    }

    pub fn wrap_mode(&self) -> GradientWrap {
        self.wrap
    }

    pub fn set_wrap_mode(&mut self, wrap: GradientWrap) {
        self.wrap = wrap;
    }

    /// Replaces the random source used by [`Easing::Stochastic`].
    pub fn with_random(mut self, rng: Random) -> Self {
        self.rng = RefCell::new(rng);
        self
    }

    /// Evaluates the gradient at `value` after applying the wrap rule.
    /// NaN is treated as the start of the domain.
    pub fn get(&self, value: f64) -> Rgba {
        let (lo, hi) = self.domain();
        let value = if value.is_nan() { lo } else { value };
        let len = hi - lo;
        let outside = value < lo || value > hi;

        let wrapped = if len <= 0.0 {
            lo
        } else {
            match self.wrap {
                GradientWrap::Clamp | GradientWrap::Transparent => value.clamp(lo, hi),
                GradientWrap::Repeat => lo + (value - lo).rem_euclid(len),
                GradientWrap::Mirror => {
                    let m = (value - lo).rem_euclid(2.0 * len);
                    lo + if m > len { 2.0 * len - m } else { m }
                }
                GradientWrap::NoWrap => value,
            }
        };

        let color = self.evaluate(wrapped);
        if self.wrap == GradientWrap::Transparent && outside {
            color.with_alpha(0.0)
        } else {
            color
        }
    }

    /// Colors a value already folded by the wrap rule. Under
    /// [`GradientWrap::NoWrap`] values outside the domain extrapolate the
    /// first or last segment.
    fn evaluate(&self, value: f64) -> Rgba {
        let extend = self.wrap == GradientWrap::NoWrap;
        let n = self.keyframes.len() - 1;
        if n == 0 {
            return self.keyframes[0].color;
        }
        match self.curve {
            Curve::Eased(easing) => {
                let (lo, hi) = self.domain();
                let u = (value - lo) / (hi - lo) * n as f64;
                let (i, t) = if extend && (u < 0.0 || u > n as f64) {
                    let i = if u < 0.0 { 0 } else { n - 1 };
                    (i, u - i as f64)
                } else {
                    let i = u.floor().clamp(0.0, n as f64) as usize;
                    (i, (u - i as f64).clamp(0.0, 1.0))
                };
                if easing == Easing::CatmullRom {
                    return self.spline(i, t);
                }
                let current = &self.keyframes[i].color;
                let next = self.keyframes.get(i + 1).map_or(current, |k| &k.color);
                let weight = easing.apply(t, &mut self.rng.borrow_mut());
                if (0.0..=1.0).contains(&weight) {
                    Rgba::blend(current, next, weight)
                } else {
                    extend_segment(current, next, weight)
                }
            }
            Curve::Spline => {
                let idx = self.keyframes.partition_point(|k| k.position <= value);
                let seg = idx.saturating_sub(1).min(n - 1);
                let p0 = self.keyframes[seg].position;
                let p1 = self.keyframes[seg + 1].position;
                let t = (value - p0) / (p1 - p0);
                self.spline(seg, if extend { t } else { t.clamp(0.0, 1.0) })
            }
        }
    }

    /// Catmull-Rom through keyframes `seg - 1 ..= seg + 2`, duplicating the
    /// edge keyframe where a neighbour is missing.
    fn spline(&self, seg: usize, t: f64) -> Rgba {
        let last = self.keyframes.len() - 1;
        let at = |i: usize| self.keyframes[i.min(last)].color;
        let c0 = at(seg.saturating_sub(1));
        let c1 = at(seg);
        let c2 = at(seg + 1);
        let c3 = at(seg + 2);
        let channel = |p0: f64, p1: f64, p2: f64, p3: f64| {
            catmull_rom(p0, p1, p2, p3, t).clamp(0.0, CHANNEL_MAX)
        };
        Rgba {
            r: channel(c0.r, c1.r, c2.r, c3.r),
            g: channel(c0.g, c1.g, c2.g, c3.g),
            b: channel(c0.b, c1.b, c2.b, c3.b),
            a: channel(c0.a, c1.a, c2.a, c3.a),
        }
    }
}

/// Uniform Catmull-Rom segment between `p1` (t = 0) and `p2` (t = 1).
fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Linear extrapolation past either end of a segment, clamped channel-wise
/// to [0, 255].
fn extend_segment(a: &Rgba, b: &Rgba, weight: f64) -> Rgba {
    let channel = |ca: f64, cb: f64| (ca + (cb - ca) * weight).clamp(0.0, CHANNEL_MAX);
    Rgba {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
        a: channel(a.a, b.a),
    }
}

/// Folds a channel value back into [0, 255] by reflection at both ends.
fn reflect_channel(c: f64) -> f64 {
    let period = 2.0 * CHANNEL_MAX;
    let m = c.rem_euclid(period);
    if m > CHANNEL_MAX {
        period - m
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn approx_color(a: Rgba, b: Rgba) -> bool {
        approx_eq(a.r, b.r) && approx_eq(a.g, b.g) && approx_eq(a.b, b.b) && approx_eq(a.a, b.a)
    }

    fn red_green() -> ColorGradient {
        ColorGradient::uniform(
            vec![Rgba::opaque(255.0, 0.0, 0.0), Rgba::opaque(0.0, 255.0, 0.0)],
            Easing::Linear,
            GradientWrap::Clamp,
        )
        .unwrap()
    }

    fn black_white(easing: Easing) -> ColorGradient {
        ColorGradient::uniform(vec![Rgba::BLACK, Rgba::WHITE], easing, GradientWrap::Clamp)
            .unwrap()
    }

    // -- Uniform gradients --

    #[test]
    fn uniform_red_green_scenario() {
        let g = red_green();
        assert_eq!(g.get(0.0), Rgba::opaque(255.0, 0.0, 0.0));
        assert_eq!(g.get(1.0), Rgba::opaque(0.0, 255.0, 0.0));
        assert_eq!(g.get(0.5), Rgba::opaque(127.5, 127.5, 0.0));
    }

    #[test]
    fn uniform_with_three_colors_hits_each_at_its_position() {
        let g = ColorGradient::uniform(
            vec![Rgba::BLACK, Rgba::opaque(255.0, 0.0, 0.0), Rgba::WHITE],
            Easing::Linear,
            GradientWrap::Clamp,
        )
        .unwrap();
        assert!(approx_color(g.get(0.5), Rgba::opaque(255.0, 0.0, 0.0)));
        assert!(approx_color(g.get(0.25), Rgba::opaque(127.5, 0.0, 0.0)));
        assert_eq!(g.keyframes()[1].position, 0.5);
    }

    #[test]
    fn single_color_gradient_is_constant() {
        let c = Rgba::opaque(1.0, 2.0, 3.0);
        let g = ColorGradient::uniform(vec![c], Easing::Linear, GradientWrap::Repeat).unwrap();
        for v in [-3.0, 0.0, 0.4, 1.0, 7.5] {
            assert_eq!(g.get(v), c);
        }
    }

    #[test]
    fn empty_color_list_is_rejected() {
        let err = ColorGradient::uniform(vec![], Easing::Linear, GradientWrap::Clamp).unwrap_err();
        assert!(matches!(err, GridError::InvalidGradient(_)));
    }

    #[test]
    fn nan_samples_start_of_gradient() {
        assert_eq!(red_green().get(f64::NAN), Rgba::opaque(255.0, 0.0, 0.0));
    }

    // -- Wrap modes --

    #[test]
    fn clamp_pins_outside_values_to_endpoints() {
        let g = red_green();
        assert_eq!(g.get(-1.0), g.get(0.0));
        assert_eq!(g.get(2.0), g.get(1.0));
    }

    #[test]
    fn repeat_is_periodic() {
        let mut g = red_green();
        g.set_wrap_mode(GradientWrap::Repeat);
        assert_eq!(g.wrap_mode(), GradientWrap::Repeat);
        assert_eq!(g.get(1.25), g.get(0.25));
        assert_eq!(g.get(-0.25), g.get(0.75));
    }

    #[test]
    fn mirror_folds_at_both_ends() {
        let mut g = red_green();
        g.set_wrap_mode(GradientWrap::Mirror);
        assert_eq!(g.get(1.25), g.get(0.75));
        assert_eq!(g.get(-0.25), g.get(0.25));
        assert_eq!(g.get(2.0), g.get(0.0));
    }

    #[test]
    fn transparent_zeroes_alpha_only_outside() {
        let mut g = red_green();
        g.set_wrap_mode(GradientWrap::Transparent);
        assert_eq!(g.get(1.5), Rgba::new(0.0, 255.0, 0.0, 0.0));
        assert_eq!(g.get(-0.1), Rgba::new(255.0, 0.0, 0.0, 0.0));
        assert_eq!(g.get(0.5).a, 255.0);
        assert_eq!(g.get(1.0).a, 255.0);
    }

    #[test]
    fn no_wrap_extends_end_segments() {
        let g = ColorGradient::uniform(
            vec![Rgba::opaque(100.0, 100.0, 100.0), Rgba::opaque(200.0, 50.0, 0.0)],
            Easing::Linear,
            GradientWrap::NoWrap,
        )
        .unwrap();
        assert!(approx_color(g.get(1.5), Rgba::opaque(250.0, 25.0, 0.0)), "{:?}", g.get(1.5));
        assert!(approx_color(g.get(-0.5), Rgba::opaque(50.0, 125.0, 150.0)), "{:?}", g.get(-0.5));
        assert!(approx_color(g.get(0.5), Rgba::opaque(150.0, 75.0, 50.0)));
    }

    #[test]
    fn no_wrap_differs_from_clamp_outside_domain() {
        let frames = vec![
            Keyframe { position: 0.0, color: Rgba::opaque(100.0, 100.0, 100.0) },
            Keyframe { position: 0.5, color: Rgba::opaque(150.0, 80.0, 60.0) },
            Keyframe { position: 1.0, color: Rgba::opaque(200.0, 60.0, 20.0) },
        ];
        let clamped = ColorGradient::from_keyframes(frames.clone(), GradientWrap::Clamp).unwrap();
        let open = ColorGradient::from_keyframes(frames, GradientWrap::NoWrap).unwrap();
        for v in [-0.5, -0.1, 1.1, 1.5] {
            assert_ne!(open.get(v), clamped.get(v), "spline at {v}");
            let c = open.get(v);
            for ch in [c.r, c.g, c.b, c.a] {
                assert!((0.0..=255.0).contains(&ch), "{c:?} at {v}");
            }
        }
        for v in [0.0, 0.25, 0.7, 1.0] {
            assert_eq!(open.get(v), clamped.get(v), "inside domain at {v}");
        }

        let mut uniform = ColorGradient::uniform(
            vec![Rgba::opaque(100.0, 100.0, 100.0), Rgba::opaque(200.0, 50.0, 0.0)],
            Easing::Linear,
            GradientWrap::Clamp,
        )
        .unwrap();
        let clamped_values: Vec<Rgba> = [-3.0, -0.5, 1.01, 4.0].iter().map(|&v| uniform.get(v)).collect();
        uniform.set_wrap_mode(GradientWrap::NoWrap);
        for (v, c) in [-3.0, -0.5, 1.01, 4.0].iter().zip(clamped_values) {
            assert_ne!(uniform.get(*v), c, "uniform at {v}");
        }
    }

    // -- Easings --

    #[test]
    fn step_easings() {
        assert_eq!(black_white(Easing::Floor).get(0.9), Rgba::BLACK);
        assert_eq!(black_white(Easing::Ceil).get(0.1), Rgba::WHITE);
        assert_eq!(black_white(Easing::Ceil).get(0.0), Rgba::BLACK);
        assert_eq!(black_white(Easing::Nearest).get(0.4), Rgba::BLACK);
        assert_eq!(black_white(Easing::Nearest).get(0.6), Rgba::WHITE);
    }

    #[test]
    fn smooth_easings_are_symmetric_at_midpoint() {
        for easing in [Easing::Cubic, Easing::Sine, Easing::CatmullRom] {
            let mid = black_white(easing).get(0.5);
            assert!((mid.r - 127.5).abs() < 1e-9, "{easing}: {mid:?}");
        }
    }

    #[test]
    fn cubic_easing_value_at_quarter() {
        let c = black_white(Easing::Cubic).get(0.25);
        assert!((c.r - 255.0 * 0.15625).abs() < 1e-9, "got {c:?}");
    }

    #[test]
    fn stochastic_easing_picks_an_endpoint_reproducibly() {
        let a = black_white(Easing::Stochastic).with_random(Random::new(9));
        let b = black_white(Easing::Stochastic).with_random(Random::new(9));
        for i in 0..100 {
            let v = i as f64 / 100.0;
            let ca = a.get(v);
            assert!(ca == Rgba::BLACK || ca == Rgba::WHITE, "{ca:?}");
            assert_eq!(ca, b.get(v));
        }
    }

    #[test]
    fn catmull_rom_easing_passes_through_colors() {
        let colors = vec![
            Rgba::opaque(0.0, 0.0, 0.0),
            Rgba::opaque(200.0, 10.0, 50.0),
            Rgba::opaque(30.0, 250.0, 90.0),
            Rgba::opaque(255.0, 255.0, 255.0),
        ];
        let g = ColorGradient::uniform(colors.clone(), Easing::CatmullRom, GradientWrap::Clamp)
            .unwrap();
        assert!(approx_color(g.get(0.0), colors[0]));
        assert!(approx_color(g.get(1.0 / 3.0), colors[1]));
        assert!(approx_color(g.get(2.0 / 3.0), colors[2]));
        assert!(approx_color(g.get(1.0), colors[3]));
    }

    #[test]
    fn easing_names_parse() {
        assert_eq!("sin".parse::<Easing>().unwrap(), Easing::Sine);
        assert_eq!("catmull_rom".parse::<Easing>().unwrap(), Easing::CatmullRom);
        assert_eq!("no_wrap".parse::<GradientWrap>().unwrap(), GradientWrap::NoWrap);
        assert!(matches!(
            "bounce".parse::<Easing>(),
            Err(GridError::UnknownEasing(_))
        ));
        for e in Easing::ALL {
            assert_eq!(e.name().parse::<Easing>().unwrap(), *e);
        }
    }

    #[test]
    fn serde_names_match_display_names() {
        for e in Easing::ALL {
            assert_eq!(serde_json::to_value(e).unwrap(), json!(e.name()));
        }
        for w in GradientWrap::ALL {
            assert_eq!(serde_json::to_value(w).unwrap(), json!(w.name()));
        }
    }

    // -- Keyframed gradients --

    #[test]
    fn from_keyframes_validates_positions() {
        let k = |position: f64| Keyframe {
            position,
            color: Rgba::BLACK,
        };
        assert!(ColorGradient::from_keyframes(vec![], GradientWrap::Clamp).is_err());
        assert!(ColorGradient::from_keyframes(vec![k(0.0), k(0.0)], GradientWrap::Clamp).is_err());
        assert!(ColorGradient::from_keyframes(vec![k(0.5), k(0.2)], GradientWrap::Clamp).is_err());
        assert!(ColorGradient::from_keyframes(vec![k(0.0), k(f64::NAN)], GradientWrap::Clamp).is_err());
        assert!(ColorGradient::from_keyframes(vec![k(0.0), k(2.0)], GradientWrap::Clamp).is_ok());
    }

    #[test]
    fn keyframed_gradient_hits_keyframe_colors() {
        let frames = vec![
            Keyframe { position: 0.0, color: Rgba::opaque(10.0, 20.0, 30.0) },
            Keyframe { position: 0.3, color: Rgba::opaque(100.0, 0.0, 200.0) },
            Keyframe { position: 2.0, color: Rgba::opaque(50.0, 250.0, 0.0) },
        ];
        let g = ColorGradient::from_keyframes(frames.clone(), GradientWrap::Clamp).unwrap();
        assert_eq!(g.domain(), (0.0, 2.0));
        assert_eq!(g.get(0.0), frames[0].color);
        assert_eq!(g.get(0.3), frames[1].color);
        assert!(approx_color(g.get(2.0), frames[2].color));
    }

    #[test]
    fn keyframed_repeat_uses_domain_length() {
        let frames = vec![
            Keyframe { position: 0.0, color: Rgba::BLACK },
            Keyframe { position: 4.0, color: Rgba::WHITE },
        ];
        let g = ColorGradient::from_keyframes(frames, GradientWrap::Repeat).unwrap();
        assert_eq!(g.get(5.0), g.get(1.0));
    }

    #[test]
    fn catmull_rom_endpoints() {
        assert_eq!(catmull_rom(1.0, 2.0, 3.0, 4.0, 0.0), 2.0);
        assert!(approx_eq(catmull_rom(1.0, 2.0, 3.0, 4.0, 1.0), 3.0));
        assert!(approx_eq(catmull_rom(1.0, 2.0, 3.0, 4.0, 0.5), 2.5));
    }

    #[test]
    fn reflect_channel_folds_into_range() {
        assert_eq!(reflect_channel(-10.0), 10.0);
        assert_eq!(reflect_channel(265.0), 245.0);
        assert_eq!(reflect_channel(128.0), 128.0);
        assert_eq!(reflect_channel(520.0), 10.0);
    }

    // -- Auto gradients --

    #[test]
    fn auto_gradient_is_deterministic() {
        let params = AutoGradientParams {
            seed: Seed::from("dusk"),
            ..AutoGradientParams::default()
        };
        let a = ColorGradient::auto(&params).unwrap();
        let b = ColorGradient::auto(&params).unwrap();
        assert_eq!(a.keyframes(), b.keyframes());
    }

    #[test]
    fn auto_gradient_seeds_differ() {
        let a = ColorGradient::auto(&AutoGradientParams {
            seed: Seed::Number(1),
            ..AutoGradientParams::default()
        })
        .unwrap();
        let b = ColorGradient::auto(&AutoGradientParams {
            seed: Seed::Number(2),
            ..AutoGradientParams::default()
        })
        .unwrap();
        assert_ne!(a.keyframes(), b.keyframes());
    }

    #[test]
    fn auto_gradient_uniform_spacing_layout() {
        let params = AutoGradientParams {
            step_size: 0.25,
            start_color: Some(Rgba::opaque(10.0, 20.0, 30.0)),
            ..AutoGradientParams::default()
        };
        let g = ColorGradient::auto(&params).unwrap();
        let positions: Vec<f64> = g.keyframes().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(g.keyframes()[0].color, Rgba::opaque(10.0, 20.0, 30.0));
    }

    #[test]
    fn auto_gradient_non_uniform_spacing_ends_on_bound() {
        let params = AutoGradientParams {
            seed: Seed::Number(31),
            step_size: 0.5,
            wrap_bound: 10.0,
            uniform_spacing: false,
            ..AutoGradientParams::default()
        };
        let g = ColorGradient::auto(&params).unwrap();
        let frames = g.keyframes();
        assert_eq!(frames.first().unwrap().position, 0.0);
        assert_eq!(frames.last().unwrap().position, 10.0);
        assert!(frames.windows(2).all(|w| w[1].position > w[0].position));
        assert_eq!(g.domain(), (0.0, 10.0));
    }

    #[test]
    fn auto_gradient_keyframes_stay_in_channel_range() {
        let params = AutoGradientParams {
            seed: Seed::Number(5),
            step_size: 0.01,
            color_diff: 0.8,
            ..AutoGradientParams::default()
        };
        let g = ColorGradient::auto(&params).unwrap();
        for k in g.keyframes() {
            for c in [k.color.r, k.color.g, k.color.b] {
                assert!((0.0..=255.0).contains(&c), "channel {c} at {}", k.position);
            }
            assert_eq!(k.color.a, 255.0);
        }
    }

    #[test]
    fn auto_gradient_zero_color_diff_is_flat() {
        let start = Rgba::opaque(40.0, 80.0, 120.0);
        let g = ColorGradient::auto(&AutoGradientParams {
            color_diff: 0.0,
            start_color: Some(start),
            ..AutoGradientParams::default()
        })
        .unwrap();
        assert!(approx_color(g.get(0.37), start));
    }

    #[test]
    fn auto_gradient_rejects_bad_params() {
        for params in [
            AutoGradientParams { step_size: 0.0, ..Default::default() },
            AutoGradientParams { step_size: f64::NAN, ..Default::default() },
            AutoGradientParams { wrap_bound: -1.0, ..Default::default() },
            AutoGradientParams { color_diff: -0.1, ..Default::default() },
        ] {
            assert!(matches!(
                ColorGradient::auto(&params),
                Err(GridError::InvalidGradient(_))
            ));
        }
    }

    #[test]
    fn auto_gradient_rejects_walks_over_keyframe_cap() {
        let err = ColorGradient::auto(&AutoGradientParams {
            step_size: 1e-9,
            ..AutoGradientParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidGradient(ref m) if m.contains("4096")), "{err}");

        let err = ColorGradient::auto(&AutoGradientParams {
            step_size: 0.25,
            wrap_bound: 1024.0,
            ..AutoGradientParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidGradient(_)));
    }

    #[test]
    fn auto_gradient_at_keyframe_cap_is_accepted() {
        let g = ColorGradient::auto(&AutoGradientParams {
            step_size: 0.25,
            wrap_bound: 1023.75,
            ..AutoGradientParams::default()
        })
        .unwrap();
        assert_eq!(g.keyframes().len(), MAX_AUTO_KEYFRAMES);
        assert_eq!(g.domain(), (0.0, 1023.75));
    }

    #[test]
    fn auto_params_from_json() {
        let p = AutoGradientParams::from_json(&json!({
            "seed": "ember",
            "step_size": 0.05,
            "uniform_spacing": false,
            "start_color": "#ff0000",
            "wrap": "mirror"
        }))
        .unwrap();
        assert_eq!(p.seed, Seed::Phrase("ember".into()));
        assert_eq!(p.step_size, 0.05);
        assert_eq!(p.color_diff, AutoGradientParams::default().color_diff);
        assert!(!p.uniform_spacing);
        assert_eq!(p.start_color, Some(Rgba::opaque(255.0, 0.0, 0.0)));
        assert_eq!(p.wrap, GradientWrap::Mirror);
    }

    #[test]
    fn auto_params_from_json_rejects_bad_names() {
        assert!(AutoGradientParams::from_json(&json!({"wrap": "spiral"})).is_err());
        assert!(AutoGradientParams::from_json(&json!({"seed": -4})).is_err());
        assert!(AutoGradientParams::from_json(&json!({"start_color": "red"})).is_err());
    }

    #[test]
    fn auto_params_serde_round_trip() {
        let p = AutoGradientParams {
            seed: Seed::Number(8),
            start_color: Some(Rgba::WHITE),
            ..AutoGradientParams::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: AutoGradientParams = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn auto_gradient_output_in_channel_range(
                seed: u32,
                value in -5.0_f64..5.0,
                uniform_spacing: bool,
            ) {
                let mut g = ColorGradient::auto(&AutoGradientParams {
                    seed: Seed::Number(seed),
                    color_diff: 0.5,
                    uniform_spacing,
                    ..AutoGradientParams::default()
                }).unwrap();
                for wrap in GradientWrap::ALL {
                    g.set_wrap_mode(*wrap);
                    let c = g.get(value);
                    for ch in [c.r, c.g, c.b, c.a] {
                        prop_assert!((0.0..=255.0).contains(&ch), "{wrap}: {c:?} at {value}");
                    }
                }
            }

            #[test]
            fn uniform_gradient_output_in_channel_range(
                value in -5.0_f64..5.0,
                easing_idx in 0_usize..8,
            ) {
                let easing = Easing::ALL[easing_idx];
                let g = ColorGradient::uniform(
                    vec![Rgba::BLACK, Rgba::opaque(255.0, 0.0, 128.0), Rgba::WHITE],
                    easing,
                    GradientWrap::Mirror,
                ).unwrap();
                let c = g.get(value);
                for ch in [c.r, c.g, c.b, c.a] {
                    prop_assert!((-1e-9..=255.0 + 1e-9).contains(&ch), "{easing}: {c:?}");
                }
            }
        }
    }
}
