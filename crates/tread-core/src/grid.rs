//! The [`TerrainGrid`] type: a fixed-extent, row-major map of [`Terrain`]
//! cells.
//!
//! Every cell is explicitly tagged as an obstacle or as traversable ground
//! with a non-negative height. Raw samples coming from a loader use
//! `+inf` as the single obstacle marker (see [`Terrain::from_sample`]).

use crate::config::RoughnessConfig;
use crate::error::{GridError, Result};
use crate::geom::{Coord, Point3};
use crate::roughness::RoughnessEvaluator;

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Content of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Obstacle,
    /// Ground at the given height (also its traversal cost).
    Traversable(f64),
}

impl Terrain {
    /// Obstacle marker used by raw sample arrays.
    pub const OBSTACLE_SAMPLE: f64 = f64::INFINITY;

    /// Classify a raw sample. `+inf` is an obstacle, finite non-negative
    /// values are heights, anything else is rejected.
    #[inline]
    pub fn from_sample(value: f64) -> Option<Self> {
        if value == Self::OBSTACLE_SAMPLE {
            Some(Terrain::Obstacle)
        } else if value.is_finite() && value >= 0.0 {
            Some(Terrain::Traversable(value))
        } else {
            None
        }
    }

    /// The raw sample this cell would be written as.
    #[inline]
    pub fn to_sample(self) -> f64 {
        match self {
            Terrain::Obstacle => Self::OBSTACLE_SAMPLE,
            Terrain::Traversable(h) => h,
        }
    }

    #[inline]
    pub fn height(self) -> Option<f64> {
        match self {
            Terrain::Obstacle => None,
            Terrain::Traversable(h) => Some(h),
        }
    }

    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, Terrain::Obstacle)
    }

    /// Obstacles always; ground only at a finite non-negative height.
    #[inline]
    pub fn is_valid(self) -> bool {
        match self {
            Terrain::Obstacle => true,
            Terrain::Traversable(h) => h.is_finite() && h >= 0.0,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::Traversable(0.0)
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// How [`TerrainGrid::coarsen`] collapses a block of fine cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregate {
    /// Lowest traversable height in the block.
    #[default]
    Minimum,
    /// Roughness score of the block; infeasible blocks become obstacles.
    Roughness,
    /// Population variance of traversable heights over a window reaching
    /// one block side around the block center.
    Variance,
}

// ---------------------------------------------------------------------------
// TerrainGrid
// ---------------------------------------------------------------------------

/// A rectangular terrain map with an extent fixed at construction.
///
/// Deserialized grids go through [`TerrainGrid::new`] and are validated the
/// same way.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct TerrainGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for TerrainGrid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        Self::new(raw.rows, raw.cols, raw.cells)
    }
}

/// Number of cells in a `rows` by `cols` extent.
fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows > 0 && cols == 0 {
        return Err(GridError::NoColumns { rows });
    }
    if rows > i32::MAX as usize || cols > i32::MAX as usize {
        return Err(GridError::TooLarge { rows, cols });
    }
    rows.checked_mul(cols).ok_or(GridError::TooLarge { rows, cols })
}

impl TerrainGrid {
    /// Build a grid from row-major cells.
    ///
    /// Every traversable cell must carry a finite, non-negative height.
    pub fn new(rows: usize, cols: usize, cells: Vec<Terrain>) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        if cells.len() != len {
            return Err(GridError::DataLength {
                rows,
                cols,
                found: cells.len(),
            });
        }
        if let Some(i) = cells.iter().position(|t| !t.is_valid()) {
            return Err(GridError::InvalidSample {
                row: i / cols,
                col: i % cols,
                value: cells[i].to_sample(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid from row-major raw samples (`+inf` marks obstacles).
    pub fn from_samples(rows: usize, cols: usize, samples: &[f64]) -> Result<Self> {
        if samples.len() != cell_count(rows, cols)? {
            return Err(GridError::DataLength {
                rows,
                cols,
                found: samples.len(),
            });
        }
        let cells = samples
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                Terrain::from_sample(value).ok_or(GridError::InvalidSample {
                    row: i / cols,
                    col: i % cols,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows, cols, cells)
    }

    /// Build a grid from nested rows of raw samples, as a loader hands them
    /// over.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut samples = Vec::with_capacity(rows.iter().map(|r| r.as_ref().len()).sum());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    found: r.len(),
                });
            }
            samples.extend_from_slice(r);
        }
        Self::from_samples(rows.len(), cols, &samples)
    }

    /// A grid where every cell is traversable at `height`.
    pub fn flat(rows: usize, cols: usize, height: f64) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        Self::new(rows, cols, vec![Terrain::Traversable(height); len])
    }

    /// The zero-extent grid.
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the grid has zero extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.row >= 0 && c.col >= 0 && (c.row as usize) < self.rows && (c.col as usize) < self.cols
    }

    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            Some(c.row as usize * self.cols + c.col as usize)
        } else {
            None
        }
    }

    /// The cell at `c`, or `None` outside the grid.
    #[inline]
    pub fn at(&self, c: Coord) -> Option<Terrain> {
        self.index(c).map(|i| self.cells[i])
    }

    /// Height of a traversable cell; `None` for obstacles and out-of-bounds.
    #[inline]
    pub fn height(&self, c: Coord) -> Option<f64> {
        self.at(c).and_then(Terrain::height)
    }

    /// Whether `c` is an in-bounds obstacle cell.
    #[inline]
    pub fn is_obstacle(&self, c: Coord) -> bool {
        self.at(c).is_some_and(Terrain::is_obstacle)
    }

    /// Whether `c` is in bounds and not an obstacle.
    #[inline]
    pub fn is_traversable(&self, c: Coord) -> bool {
        self.height(c).is_some()
    }

    /// Replace the cell at `c`. Returns `false` (and does nothing) when `c`
    /// is outside the grid or `terrain` is ground at an invalid height.
    pub fn set(&mut self, c: Coord, terrain: Terrain) -> bool {
        if !terrain.is_valid() {
            log::warn!("refusing to set {c} to {terrain:?}");
            return false;
        }
        match self.index(c) {
            Some(i) => {
                self.cells[i] = terrain;
                true
            }
            None => false,
        }
    }

    /// Traversable orthogonal neighbours of `c`, in the fixed order up, down,
    /// left, right.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        c.neighbors_4()
            .into_iter()
            .filter(move |&n| self.is_traversable(n))
    }

    /// Cost of stepping from `at` onto `to`: the Manhattan step length plus
    /// the height of the destination. Infinite if `to` cannot be entered.
    #[inline]
    pub fn cost(&self, at: Coord, to: Coord) -> f64 {
        match self.height(to) {
            Some(h) => f64::from(at.manhattan(to)) + h,
            None => f64::INFINITY,
        }
    }

    /// Lift a traversable cell into a 3D sample.
    #[inline]
    pub fn point3(&self, c: Coord) -> Option<Point3> {
        self.height(c).map(|z| Point3::from_coord(c, z))
    }

    /// Nearest in-bounds cell, clamping each axis independently.
    ///
    /// Meaningless on an empty grid, where `c` is returned unchanged.
    pub fn clamp(&self, c: Coord) -> Coord {
        if self.is_empty() {
            return c;
        }
        Coord::new(
            c.row.clamp(0, self.rows as i32 - 1),
            c.col.clamp(0, self.cols as i32 - 1),
        )
    }

    /// Center of the rectangle spanned by two cells after clamping both into
    /// the grid.
    pub fn local_center(&self, a: Coord, b: Coord) -> Coord {
        let a = self.clamp(a);
        let b = self.clamp(b);
        Coord::new((a.row + b.row) / 2, (a.col + b.col) / 2)
    }

    /// Row-major iterator over `(Coord, Terrain)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Coord, Terrain)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &t)| (Coord::from_index(i, cols), t))
    }

    // -----------------------------------------------------------------------
    // Coarsening
    // -----------------------------------------------------------------------

    /// Fine-grid center cell of coarse block `coarse`, clamped into the grid.
    #[inline]
    pub fn block_center(&self, coarse: Coord, scale: f64) -> Coord {
        self.clamp(coarse.restored(scale))
    }

    /// Inclusive `(min, max)` fine cells mapping onto coarse block `coarse`,
    /// clamped into the grid.
    pub fn block_bounds(&self, coarse: Coord, scale: f64) -> (Coord, Coord) {
        let lo = |i: i32| (f64::from(i) / scale).ceil() as i32;
        let min = Coord::new(lo(coarse.row), lo(coarse.col));
        let max = Coord::new(lo(coarse.row + 1) - 1, lo(coarse.col + 1) - 1);
        (self.clamp(min), self.clamp(max))
    }

    /// Whether two fine cells fall into the same coarse block.
    #[inline]
    pub fn in_same_block(a: Coord, b: Coord, scale: f64) -> bool {
        a.scaled(scale) == b.scaled(scale)
    }

    /// Extent of the coarse grid for `scale`: `ceil(rows * scale)` by
    /// `ceil(cols * scale)`. Never larger than the grid for `scale <= 1`.
    #[inline]
    pub fn scaled_shape(&self, scale: f64) -> (usize, usize) {
        (
            (self.rows as f64 * scale).ceil() as usize,
            (self.cols as f64 * scale).ceil() as usize,
        )
    }

    /// Side length of the square sampled around a block center. Saturates
    /// for vanishing scales.
    #[inline]
    pub fn block_side(scale: f64) -> usize {
        ((1.0 / scale).floor() as usize).max(1)
    }

    /// Build a coarse grid whose cells summarise blocks of this one.
    ///
    /// `scale` must lie in `(0, 1]`; anything else returns an unchanged copy.
    pub fn coarsen(&self, scale: f64, aggregate: Aggregate, roughness: &RoughnessConfig) -> Self {
        if !(scale > 0.0 && scale <= 1.0) {
            log::warn!("coarsen called with invalid scale {scale}; returning a copy");
            return self.clone();
        }
        if self.is_empty() {
            return Self::empty();
        }
        let (rows, cols) = self.scaled_shape(scale);
        let side = Self::block_side(scale);
        let evaluator = RoughnessEvaluator::new(*roughness);

        // rows <= self.rows and cols <= self.cols, so the product fits.
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows as i32 {
            for j in 0..cols as i32 {
                let center = self.block_center(Coord::new(i, j), scale);
                let value = match aggregate {
                    Aggregate::Minimum => self.block_minimum(center, side),
                    Aggregate::Roughness => evaluator.evaluate_block(self, center, side),
                    Aggregate::Variance => self.window_variance(center, side),
                };
                cells.push(value.map_or(Terrain::Obstacle, Terrain::Traversable));
            }
        }
        log::debug!(
            "coarsened {}x{} -> {}x{} ({:?}, side {})",
            self.rows,
            self.cols,
            rows,
            cols,
            aggregate,
            side
        );
        Self { rows, cols, cells }
    }

    /// Traversable heights in the square of side `side` around `center`,
    /// clipped to the grid, together with the number of cells visited.
    pub fn block_heights(&self, center: Coord, side: usize) -> (Vec<f64>, usize) {
        let half = i32::try_from(side / 2).unwrap_or(i32::MAX);
        self.window_heights(center, half)
    }

    fn window_heights(&self, center: Coord, half: i32) -> (Vec<f64>, usize) {
        if self.is_empty() {
            return (Vec::new(), 0);
        }
        let lo = self.clamp(Coord::new(
            center.row.saturating_sub(half),
            center.col.saturating_sub(half),
        ));
        let hi = self.clamp(Coord::new(
            center.row.saturating_add(half),
            center.col.saturating_add(half),
        ));
        let span = |a: i32, b: i32| usize::try_from(b - a + 1).unwrap_or(0);
        let mut heights = Vec::with_capacity(span(lo.row, hi.row) * span(lo.col, hi.col));
        let mut visited = 0;
        for row in lo.row..=hi.row {
            for col in lo.col..=hi.col {
                visited += 1;
                if let Some(h) = self.height(Coord::new(row, col)) {
                    heights.push(h);
                }
            }
        }
        (heights, visited)
    }

    fn block_minimum(&self, center: Coord, side: usize) -> Option<f64> {
        let (heights, _) = self.block_heights(center, side);
        heights.into_iter().reduce(f64::min)
    }

    fn window_variance(&self, center: Coord, side: usize) -> Option<f64> {
        let (heights, _) = self.window_heights(center, i32::try_from(side).unwrap_or(i32::MAX));
        if heights.is_empty() {
            return None;
        }
        let n = heights.len() as f64;
        let mean = heights.iter().sum::<f64>() / n;
        Some(heights.iter().map(|h| (h - mean) * (h - mean)).sum::<f64>() / n)
    }
}
