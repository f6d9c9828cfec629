use tread_core::Coord;

/// Graph view of a terrain grid: which cells a walker may stand on and step
/// to next.
pub trait Pather {
    /// Append the enterable orthogonal neighbours of `c` into `buf`. The
    /// caller clears `buf` before calling.
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>);

    /// Whether a search may start or end on `c`. Obstacle cells are not.
    fn passable(&self, _c: Coord) -> bool {
        true
    }
}

/// Pather with terrain-weighted steps.
pub trait WeightedPather: Pather {
    /// Cost of stepping from `from` onto adjacent `to`: step length plus
    /// whatever the destination terrain adds. `None` when the step is
    /// blocked. Never below the step length, since heights are non-negative.
    fn cost(&self, from: Coord, to: Coord) -> Option<f64>;
}

/// Pather with a goal-distance estimate for A*.
pub trait AstarPather: WeightedPather {
    /// Lower bound on the cost from `from` to `to`, in step-length units.
    /// A plain grid distance qualifies because every step costs at least
    /// its length.
    fn estimate(&self, from: Coord, to: Coord) -> f64;
}
