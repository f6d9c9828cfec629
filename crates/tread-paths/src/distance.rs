use tread_core::Coord;

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Coord, b: Coord) -> f64 {
    f64::from(a.manhattan(b))
}

/// Euclidean (L2) distance between two cells.
#[inline]
pub fn euclidean(a: Coord, b: Coord) -> f64 {
    a.euclidean(b)
}
