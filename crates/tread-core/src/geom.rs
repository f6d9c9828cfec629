//! Geometry primitives: [`Coord`], [`Position`] and [`Point3`].
//!
//! `Coord` is the only discrete coordinate type. Moving between grid indices,
//! continuous positions and coarse (scaled) indices always goes through one of
//! the named conversions below; nothing truncates implicitly.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// An integer `(row, col)` grid index. Rows grow downwards, columns grow to
/// the right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a coordinate shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// The four orthogonal neighbours in the fixed order up, down, left, right.
    #[inline]
    pub const fn neighbors_4(self) -> [Coord; 4] {
        [
            self.shift(-1, 0),
            self.shift(1, 0),
            self.shift(0, -1),
            self.shift(0, 1),
        ]
    }

    /// Whether `other` is one of the four orthogonal neighbours of `self`.
    #[inline]
    pub fn is_adjacent_4(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }

    /// Manhattan (L1) distance.
    #[inline]
    pub fn manhattan(self, other: Coord) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Euclidean (L2) distance.
    #[inline]
    pub fn euclidean(self, other: Coord) -> f64 {
        let dr = f64::from(self.row - other.row);
        let dc = f64::from(self.col - other.col);
        dr.hypot(dc)
    }

    /// Flattened row-major index for a grid with `cols` columns.
    ///
    /// Returns `None` for negative coordinates or a column outside `cols`.
    #[inline]
    pub fn to_index(self, cols: usize) -> Option<usize> {
        if self.row < 0 || self.col < 0 || self.col as usize >= cols {
            return None;
        }
        Some(self.row as usize * cols + self.col as usize)
    }

    /// Inverse of [`to_index`](Coord::to_index).
    #[inline]
    pub fn from_index(idx: usize, cols: usize) -> Self {
        Self::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// The cell as a continuous position.
    #[inline]
    pub fn to_continuous(self) -> Position {
        Position::new(f64::from(self.row), f64::from(self.col))
    }

    /// Map a fine index onto the coarse grid obtained by multiplying the
    /// extent by `scale`. The coarse index is the block containing the cell.
    ///
    /// Floors rather than rounds, so `c.restored(scale).scaled(scale) == c`
    /// for every coarse `c` when `0 < scale <= 1`.
    #[inline]
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(
            (f64::from(self.row) * scale).floor() as i32,
            (f64::from(self.col) * scale).floor() as i32,
        )
    }

    /// Map a coarse index back onto the fine grid, landing on the center cell
    /// of the block (`coarse / scale + 0.5 / scale`). Callers clamp the result
    /// to their grid's extent.
    #[inline]
    pub fn restored(self, scale: f64) -> Self {
        Self::new(
            ((f64::from(self.row) + 0.5) / scale).floor() as i32,
            ((f64::from(self.col) + 0.5) / scale).floor() as i32,
        )
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Add for Coord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Coord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Mul<i32> for Coord {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.row * rhs, self.col * rhs)
    }
}

impl Neg for Coord {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.row, -self.col)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A continuous position in grid units, sharing the `(row, col)` axes of
/// [`Coord`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: f64,
    pub col: f64,
}

impl Position {
    /// Origin (0.0, 0.0).
    pub const ZERO: Self = Self { row: 0.0, col: 0.0 };

    #[inline]
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Nearest grid cell (half away from zero).
    #[inline]
    pub fn to_coord(self) -> Coord {
        Coord::new(self.row.round() as i32, self.col.round() as i32)
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (self.row - other.row).hypot(self.col - other.col)
    }

    /// Length of the position seen as a vector from the origin.
    #[inline]
    pub fn length(self) -> f64 {
        self.row.hypot(self.col)
    }
}

impl From<Coord> for Position {
    fn from(c: Coord) -> Self {
        c.to_continuous()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.row, self.col)
    }
}

impl Add for Position {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign for Position {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.row += rhs.row;
        self.col += rhs.col;
    }
}

impl Sub for Position {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Mul<f64> for Position {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.row * rhs, self.col * rhs)
    }
}

// ---------------------------------------------------------------------------
// Point3
// ---------------------------------------------------------------------------

/// A 3D sample: `(x, y)` are the grid row and column, `z` the terrain height.
///
/// Also used as a plain 3-vector (plane normals, edge vectors).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a grid cell to a 3D sample at height `z`.
    #[inline]
    pub fn from_coord(c: Coord, z: f64) -> Self {
        Self::new(f64::from(c.row), f64::from(c.col), z)
    }

    #[inline]
    pub fn cross(self, rhs: Point3) -> Point3 {
        Point3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn dot(self, rhs: Point3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Squared distance in the horizontal (x, y) plane.
    #[inline]
    pub fn planar_distance_sq(self, other: Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Horizontal slide offset implied by this vector taken as a surface
    /// normal.
    ///
    /// The horizontal component is scaled by the full magnitude, so a vertical
    /// normal (level ground) gives a zero offset and a horizontal normal (a
    /// wall) gives a unit-length one. The result is rounded to whole cells.
    pub fn slide(self) -> Coord {
        let magnitude = self.length();
        if magnitude == 0.0 {
            return Coord::ZERO;
        }
        Coord::new(
            (self.x / magnitude).round() as i32,
            (self.y / magnitude).round() as i32,
        )
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn coord_arithmetic() {
        let a = Coord::new(1, 2);
        let b = Coord::new(3, 4);
        assert_eq!(a + b, Coord::new(4, 6));
        assert_eq!(b - a, Coord::new(2, 2));
        assert_eq!(a * 3, Coord::new(3, 6));
        assert_eq!(-a, Coord::new(-1, -2));
    }

    #[test]
    fn coord_order_is_row_then_col() {
        let mut v = vec![Coord::new(1, 0), Coord::new(0, 5), Coord::new(0, 1)];
        v.sort();
        assert_eq!(v, vec![Coord::new(0, 1), Coord::new(0, 5), Coord::new(1, 0)]);
    }

    #[test]
    fn coord_hashes_by_value() {
        let mut set = HashSet::new();
        set.insert(Coord::new(2, 3));
        assert!(set.contains(&Coord::new(2, 3)));
        assert!(!set.contains(&Coord::new(3, 2)));
    }

    #[test]
    fn neighbors_fixed_order() {
        let n = Coord::new(5, 5).neighbors_4();
        assert_eq!(
            n,
            [
                Coord::new(4, 5),
                Coord::new(6, 5),
                Coord::new(5, 4),
                Coord::new(5, 6)
            ]
        );
        assert!(n.iter().all(|&c| c.is_adjacent_4(Coord::new(5, 5))));
    }

    #[test]
    fn distances() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert_eq!(a.manhattan(b), 7);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn index_conversion() {
        let c = Coord::new(2, 3);
        assert_eq!(c.to_index(5), Some(13));
        assert_eq!(Coord::from_index(13, 5), c);
        assert_eq!(Coord::new(-1, 0).to_index(5), None);
        assert_eq!(Coord::new(0, 5).to_index(5), None);
    }

    #[test]
    fn scale_and_restore_hit_block_center() {
        let scale = 0.5;
        assert_eq!(Coord::new(0, 1).scaled(scale), Coord::new(0, 0));
        assert_eq!(Coord::new(4, 5).scaled(scale), Coord::new(2, 2));
        assert_eq!(Coord::new(0, 0).restored(scale), Coord::new(1, 1));
        assert_eq!(Coord::new(1, 2).restored(scale), Coord::new(3, 5));
        // A restored block center maps back into the same block.
        for r in 0..6 {
            let coarse = Coord::new(r, r);
            assert_eq!(coarse.restored(scale).scaled(scale), coarse);
        }
    }

    #[test]
    fn scaled_floors_toward_block_origin() {
        // Rounding would put (2, 5) into block (1, 2).
        assert_eq!(Coord::new(2, 5).scaled(1.0 / 3.0), Coord::new(0, 1));
        for scale in [1.0 / 3.0, 0.25, 0.2, 1.0] {
            for r in 0..8 {
                let coarse = Coord::new(r, 7 - r);
                assert_eq!(coarse.restored(scale).scaled(scale), coarse, "scale {scale}");
            }
        }
    }

    #[test]
    fn position_rounding() {
        assert_eq!(Position::new(1.5, -0.4).to_coord(), Coord::new(2, 0));
        assert_eq!(Coord::new(3, 4).to_continuous(), Position::new(3.0, 4.0));
        assert!((Position::new(3.0, 4.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn cross_product() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Point3::new(0.0, 0.0, 1.0));
        assert!(x.cross(x).is_zero());
    }

    #[test]
    fn slide_of_level_and_wall_normals() {
        assert_eq!(Point3::new(0.0, 0.0, 4.0).slide(), Coord::ZERO);
        assert_eq!(Point3::new(2.0, 0.0, 0.0).slide(), Coord::new(1, 0));
        assert_eq!(Point3::new(0.0, -3.0, 0.0).slide(), Coord::new(0, -1));
        // Steeper than 60 degrees in x rounds to a one-cell slide.
        assert_eq!(Point3::new(1.0, 0.0, 0.5).slide(), Coord::new(1, 0));
        // Gentle slopes round to nothing.
        assert_eq!(Point3::new(0.2, 0.0, 1.0).slide(), Coord::ZERO);
        assert_eq!(Point3::ZERO.slide(), Coord::ZERO);
    }
}
