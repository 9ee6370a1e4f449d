//! Boundary addressing: how integer lattice coordinates outside a grid map
//! back onto it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Rule for resolving out-of-range lattice coordinates.
///
/// Every mode except [`WrapMode::Initial`] resolves to an in-bounds cell.
/// `Initial` resolves out-of-range coordinates to "no cell", and the grid
/// answers with its stored initial value instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Clamp each axis to `[0, dim - 1]`.
    #[default]
    Clamp,
    /// Tile the grid: `((v % dim) + dim) % dim` per axis.
    Repeat,
    /// Reflect at both edges without repeating the edge cell.
    Mirror,
    /// Out-of-range coordinates yield the grid's initial value.
    Initial,
}

impl WrapMode {
    pub const ALL: [WrapMode; 4] = [
        WrapMode::Clamp,
        WrapMode::Repeat,
        WrapMode::Mirror,
        WrapMode::Initial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WrapMode::Clamp => "clamp",
            WrapMode::Repeat => "repeat",
            WrapMode::Mirror => "mirror",
            WrapMode::Initial => "initial",
        }
    }

    /// Resolves `(x, y)` against a `width x height` grid.
    ///
    /// Returns `None` only for [`WrapMode::Initial`] with an out-of-range
    /// coordinate. Both dimensions must be non-zero.
    pub fn resolve(self, x: i64, y: i64, width: usize, height: usize) -> Option<(usize, usize)> {
        match self {
            WrapMode::Clamp => Some((clamp_axis(x, width), clamp_axis(y, height))),
            WrapMode::Repeat => Some((repeat_axis(x, width), repeat_axis(y, height))),
            WrapMode::Mirror => Some((mirror_axis(x, width), mirror_axis(y, height))),
            WrapMode::Initial => {
                let in_x = x >= 0 && (x as u64) < width as u64;
                let in_y = y >= 0 && (y as u64) < height as u64;
                (in_x && in_y).then_some((x as usize, y as usize))
            }
        }
    }
}

fn clamp_axis(v: i64, dim: usize) -> usize {
    v.clamp(0, dim as i64 - 1) as usize
}

fn repeat_axis(v: i64, dim: usize) -> usize {
    v.rem_euclid(dim as i64) as usize
}

/// Triangle wave with period `2 * (dim - 1)`: -1 maps to 1, dim maps to dim - 2.
fn mirror_axis(v: i64, dim: usize) -> usize {
    if dim == 1 {
        return 0;
    }
    let last = dim as i64 - 1;
    let m = v.rem_euclid(2 * last);
    (if m > last { 2 * last - m } else { m }) as usize
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WrapMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        WrapMode::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| GridError::UnknownWrapMode(s.to_string()))
    }
}
