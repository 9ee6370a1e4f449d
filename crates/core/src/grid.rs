//! Generic two-dimensional grid with continuous sampling and resampling.
//!
//! A [`Grid`] stores `width * height` cells of any [`Pixel`] type in
//! row-major order. Reads at real-valued coordinates go through two
//! policies chosen per grid: a [`WrapMode`] for lattice points that fall
//! outside the grid and an [`InterpolationMode`] for points between
//! lattice points. Crop, resize and scale are all built on that sampling
//! contract, so they inherit whatever boundary and reconstruction rules
//! the source grid uses.

use std::cell::RefCell;

use crate::error::GridError;
use crate::gradient::ColorGradient;
use crate::interpolation::{InterpolationMode, Reconstruction};
use crate::pixel::{Pixel, Rgba};
use crate::prng::Random;
use crate::wrap::WrapMode;

/// Bytes per pixel in [`Grid::render_to_bitmap`] output.
pub const BYTES_PER_PIXEL: usize = 4;

/// Smallest per-axis factor a single smooth-minification pass may apply.
const MAX_SHRINK_PER_PASS: f64 = 0.5;

/// Seed of the stochastic-sampling PRNG until [`Grid::set_random`] is called.
const DEFAULT_SAMPLING_SEED: u32 = 0;

/// Where a generator is being asked for a value during construction or
/// [`Grid::fill_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContext {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellContext {
    fn at(index: usize, width: usize, height: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
            width,
            height,
        }
    }

    /// Position scaled into [0, 1) on both axes.
    pub fn normalized(&self) -> (f64, f64) {
        (
            self.x as f64 / self.width as f64,
            self.y as f64 / self.height as f64,
        )
    }
}

/// A dense `width x height` grid of pixel values.
///
/// Cloning deep-copies every cell; two grids never share storage.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
    initial: T,
    wrap: WrapMode,
    reconstruction: Reconstruction,
    rng: RefCell<Random>,
}

/// Validates dimensions and returns the cell count.
fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(GridError::InvalidDimensions)
}

fn check_factor(factor: f64) -> Result<f64, GridError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(GridError::InvalidScale(factor))
    }
}

/// `round(dim * factor)`, never less than one cell.
fn scaled_dim(dim: usize, factor: f64) -> usize {
    ((dim as f64 * factor).round() as usize).max(1)
}

/// Per-axis `(offset, step)` mapping target index `i` to source coordinate
/// `offset + i * step`. A single-cell target samples the source midpoint.
fn axis_mapping(src: usize, dst: usize) -> (f64, f64) {
    let span = (src - 1) as f64;
    if dst == 1 {
        (span / 2.0, 0.0)
    } else {
        (0.0, span / (dst - 1) as f64)
    }
}

impl<T: Pixel> Grid<T> {
    fn assemble(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        let initial = data.first().cloned().ok_or(GridError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data,
            initial,
            wrap: WrapMode::default(),
            reconstruction: Reconstruction::default(),
            rng: RefCell::new(Random::new(DEFAULT_SAMPLING_SEED)),
        })
    }

    /// Creates a grid with every cell set to a copy of `value`.
    ///
    /// Returns `GridError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        Self::assemble(width, height, vec![value; len])
    }

    /// Creates a grid by calling `generator` once per cell in row-major
    /// order. The value generated at the origin becomes the initial value.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut generator: impl FnMut(CellContext) -> T,
    ) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        let data = (0..len)
            .map(|i| generator(CellContext::at(i, width, height)))
            .collect();
        Self::assemble(width, height, data)
    }

    /// Creates a grid from a pre-built row-major vector.
    ///
    /// Returns `GridError::DimensionMismatch` if `data.len() != width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        if data.len() != len {
            return Err(GridError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Self::assemble(width, height, data)
    }

    /// Decodes a row-major R,G,B,A byte buffer through
    /// [`Pixel::from_display_color`]. Inverse of [`Grid::render_to_bitmap`]
    /// for lossless pixel types.
    pub fn from_bitmap(width: usize, height: usize, bytes: &[u8]) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        if bytes.len() != len * BYTES_PER_PIXEL {
            return Err(GridError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: bytes.len() / BYTES_PER_PIXEL,
                rhs_h: 1,
            });
        }
        let data = bytes
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| T::from_display_color(Rgba::from_bytes([px[0], px[1], px[2], px[3]])))
            .collect();
        Self::assemble(width, height, data)
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The value returned for out-of-range reads under [`WrapMode::Initial`].
    pub fn initial_value(&self) -> &T {
        &self.initial
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap = mode;
    }

    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap = mode;
        self
    }

    pub fn interpolation_mode(&self) -> InterpolationMode {
        self.reconstruction.into()
    }

    /// Selects the interpolation mode.
    ///
    /// Returns `GridError::UnsupportedFeature` for
    /// [`InterpolationMode::Bicubic`]; the current mode is kept.
    pub fn set_interpolation_mode(&mut self, mode: InterpolationMode) -> Result<(), GridError> {
        self.reconstruction = Reconstruction::try_from(mode)?;
        Ok(())
    }

    pub fn with_interpolation_mode(mut self, mode: InterpolationMode) -> Result<Self, GridError> {
        self.set_interpolation_mode(mode)?;
        Ok(self)
    }

    /// Replaces the random source used by stochastic interpolation.
    pub fn set_random(&mut self, rng: Random) {
        self.rng = RefCell::new(rng);
    }

    pub fn with_random(mut self, rng: Random) -> Self {
        self.set_random(rng);
        self
    }

    fn lattice(&self, x: i64, y: i64) -> T {
        match self.wrap.resolve(x, y, self.width, self.height) {
            Some((cx, cy)) => self.data[cy * self.width + cx].clone(),
            None => self.initial.clone(),
        }
    }

    /// Samples the grid at a real-valued coordinate.
    ///
    /// Total for every finite coordinate: out-of-range lattice points are
    /// resolved by the wrap mode, and points between them by the
    /// interpolation mode.
    pub fn get(&self, x: f64, y: f64) -> T {
        self.reconstruction
            .sample(x, y, &self.rng, |xi, yi| self.lattice(xi, yi))
    }

    /// Raw indexed read with no wrapping or interpolation.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`, or in debug builds if `x >= width`.
    pub fn get_fast(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x].clone()
    }

    /// Indexed read returning `None` outside the grid.
    pub fn get_checked(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Writes one cell.
    ///
    /// Returns `GridError::OutOfBounds` if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<(), GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.data[y * self.width + x] = value;
        Ok(())
    }

    /// Iterates over all cells yielding `(x, y, &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (i % self.width, i / self.width, v))
    }

    /// Visits every cell in row-major order.
    pub fn for_each(&self, mut f: impl FnMut(usize, usize, &T)) {
        self.iter().for_each(|(x, y, v)| f(x, y, v));
    }

    /// Returns `true` as soon as `pred` matches a cell (row-major order).
    pub fn some(&self, mut pred: impl FnMut(usize, usize, &T) -> bool) -> bool {
        self.iter().any(|(x, y, v)| pred(x, y, v))
    }

    /// Overwrites every cell with a copy of `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Overwrites every cell with the generator's output, row-major.
    pub fn fill_with(&mut self, mut generator: impl FnMut(CellContext) -> T) {
        let (w, h) = (self.width, self.height);
        self.data
            .iter_mut()
            .enumerate()
            .for_each(|(i, cell)| *cell = generator(CellContext::at(i, w, h)));
    }

    /// In-place transform. Each result is written before the next cell is
    /// computed, so a transform that reads neighbours sees the cells
    /// already visited in their new state. Use [`Grid::filter_buffered`]
    /// for neighbourhood filters.
    pub fn filter(&mut self, mut f: impl FnMut(&Self, usize, usize) -> T) {
        for i in 0..self.data.len() {
            let value = f(self, i % self.width, i / self.width);
            self.data[i] = value;
        }
    }

    /// Double-buffered transform: every cell is computed from the
    /// unmodified grid, then all results replace the data at once.
    pub fn filter_buffered(&mut self, mut f: impl FnMut(&Self, usize, usize) -> T) {
        let source = &*self;
        let next: Vec<T> = (0..source.data.len())
            .map(|i| f(source, i % source.width, i / source.width))
            .collect();
        self.data = next;
    }

    /// Converts every cell (and the initial value) to another pixel type.
    /// Wrap mode, interpolation mode and random source carry over.
    pub fn map<U: Pixel>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(&mut f).collect(),
            initial: f(&self.initial),
            wrap: self.wrap,
            reconstruction: self.reconstruction,
            rng: self.rng.clone(),
        }
    }

    /// Builds a `width x height` grid whose cell `(x, y)` samples this grid
    /// at `coord(x, y)`. The result keeps this grid's modes and continues
    /// its random stream.
    fn resample(
        &self,
        width: usize,
        height: usize,
        coord: impl Fn(usize, usize) -> (f64, f64),
    ) -> Result<Grid<T>, GridError> {
        let len = cell_count(width, height)?;
        let data: Vec<T> = (0..len)
            .map(|i| {
                let (sx, sy) = coord(i % width, i / width);
                self.get(sx, sy)
            })
            .collect();
        let mut grid = Grid::assemble(width, height, data)?;
        grid.wrap = self.wrap;
        grid.reconstruction = self.reconstruction;
        grid.rng = self.rng.clone();
        Ok(grid)
    }

    /// Cuts a `width x height` window whose origin is at `(x0, y0)` in this
    /// grid. The offset may be fractional; cells are sampled with [`Grid::get`].
    pub fn crop(&self, x0: f64, y0: f64, width: usize, height: usize) -> Result<Grid<T>, GridError> {
        self.resample(width, height, |x, y| (x0 + x as f64, y0 + y as f64))
    }

    /// Resamples to `width x height`, mapping corners to corners: target
    /// `(x, y)` reads source `(x * (srcW - 1) / (width - 1), ...)`. A target
    /// axis of length one samples the source midpoint on that axis.
    pub fn resize(&self, width: usize, height: usize) -> Result<Grid<T>, GridError> {
        cell_count(width, height)?;
        let (ox, sx) = axis_mapping(self.width, width);
        let (oy, sy) = axis_mapping(self.height, height);
        self.resample(width, height, |x, y| (ox + x as f64 * sx, oy + y as f64 * sy))
    }

    /// Resizes to `round(width * sx) x round(height * sy)` (at least 1x1).
    ///
    /// Returns `GridError::InvalidScale` unless both factors are finite and
    /// positive.
    pub fn scale(&self, sx: f64, sy: f64) -> Result<Grid<T>, GridError> {
        let sx = check_factor(sx)?;
        let sy = check_factor(sy)?;
        self.resize(scaled_dim(self.width, sx), scaled_dim(self.height, sy))
    }

    /// [`Grid::scale`] with the same factor on both axes.
    pub fn scale_uniform(&self, factor: f64) -> Result<Grid<T>, GridError> {
        self.scale(factor, factor)
    }

    /// Alias-aware [`Grid::scale`]: large reductions are split into passes
    /// that each shrink an axis by at most half.
    pub fn scale_smooth(&self, sx: f64, sy: f64) -> Result<Grid<T>, GridError> {
        let sx = check_factor(sx)?;
        let sy = check_factor(sy)?;
        self.minify_to(scaled_dim(self.width, sx), scaled_dim(self.height, sy))
    }

    /// Alias-aware [`Grid::resize`], exact target dimensions.
    pub fn resize_smooth(&self, width: usize, height: usize) -> Result<Grid<T>, GridError> {
        cell_count(width, height)?;
        self.minify_to(width, height)
    }

    /// Halves each axis that is still more than 2x too large, until one
    /// final resize reaches the target. Every pass strictly shrinks at least
    /// one axis, so the loop terminates.
    fn minify_to(&self, width: usize, height: usize) -> Result<Grid<T>, GridError> {
        let mut current: Option<Grid<T>> = None;
        let mut pass = 0usize;
        loop {
            let src = current.as_ref().unwrap_or(self);
            let fx = width as f64 / src.width as f64;
            let fy = height as f64 / src.height as f64;
            if fx >= MAX_SHRINK_PER_PASS && fy >= MAX_SHRINK_PER_PASS {
                log::debug!(
                    "minify: final pass {pass} {}x{} -> {width}x{height}",
                    src.width,
                    src.height
                );
                return src.resize(width, height);
            }
            let step_w = scaled_dim(src.width, fx.max(MAX_SHRINK_PER_PASS));
            let step_h = scaled_dim(src.height, fy.max(MAX_SHRINK_PER_PASS));
            log::debug!(
                "minify: pass {pass} {}x{} -> {step_w}x{step_h} (target {width}x{height})",
                src.width,
                src.height
            );
            let next = src.resize(step_w, step_h)?;
            current = Some(next);
            pass += 1;
        }
    }

    /// Flattens the grid into row-major R,G,B,A bytes (4 per pixel) via
    /// [`Pixel::to_display_color`].
    pub fn render_to_bitmap(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|cell| cell.to_display_color().to_bytes())
            .collect()
    }
}

impl Grid<f64> {
    /// Maps each scalar through a color gradient.
    pub fn colorize(&self, gradient: &ColorGradient) -> Grid<Rgba> {
        self.map(|&v| gradient.get(v))
    }
}
