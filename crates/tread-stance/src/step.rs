use tread_core::{Coord, Position};

/// The cell a single stride from `from` can reach toward `goal`.
///
/// `goal` itself when it is within `max_stride`, otherwise the cell nearest
/// the point `max_stride` along the straight line to `goal`. A non-positive
/// or non-finite stride stays at `from`.
pub fn clamp_step(from: Coord, goal: Coord, max_stride: f64) -> Coord {
    if !(max_stride.is_finite() && max_stride > 0.0) {
        return from;
    }
    let distance = from.euclidean(goal);
    if distance <= max_stride {
        return goal;
    }
    let dir = (goal.to_continuous() - from.to_continuous()) * distance.recip();
    (from.to_continuous() + dir * max_stride).to_coord()
}

/// Continuous counterpart of [`clamp_step`], without rounding.
pub fn clamp_position(from: Position, goal: Position, max_stride: f64) -> Position {
    if !(max_stride.is_finite() && max_stride > 0.0) {
        return from;
    }
    let distance = from.distance(goal);
    if distance <= max_stride {
        return goal;
    }
    from + (goal - from) * (max_stride / distance)
}
