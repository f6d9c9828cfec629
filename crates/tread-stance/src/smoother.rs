//! Collapsing a guide sequence into a single aim point.
//!
//! Guide points are weighted by a geometric decay, nearest first: the point
//! at rank `k` (1-based, of `n`) gets weight `α^(n-k)`, normalised so the
//! weights sum to one. With `α > 1` the nearest point dominates and far
//! points still bend the aim toward where the path is heading.

use tread_core::{Coord, PlannerConfig, Position, SmootherConfig};

/// `a + a·α + … + a·α^(n-1)`.
pub fn geometric_sum(a: f64, alpha: f64, n: usize) -> f64 {
    if alpha == 1.0 {
        return a * n as f64;
    }
    a * (1.0 - alpha.powf(n as f64)) / (1.0 - alpha)
}

/// Normalised decay weights for `n` points, nearest first.
///
/// A non-positive or non-finite `alpha` falls back to uniform weights.
pub fn geometric_decay(alpha: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let alpha = if alpha.is_finite() && alpha > 0.0 {
        alpha
    } else {
        1.0
    };

    // Scale so the largest weight is 1; the powers then only shrink.
    let (ratio, nearest_first) = if alpha > 1.0 {
        (alpha.recip(), true)
    } else {
        (alpha, false)
    };
    let total = geometric_sum(1.0, ratio, n);
    let mut weights: Vec<f64> = (0..n).map(|k| ratio.powf(k as f64) / total).collect();
    if !nearest_first {
        weights.reverse();
    }
    weights
}

/// Turns guide sequences into aim points.
#[derive(Clone, Copy, Debug, Default)]
pub struct Smoother {
    config: SmootherConfig,
}

impl Smoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.smoother)
    }

    /// Weights for `n` guide points, nearest first.
    #[inline]
    pub fn coefficients(&self, n: usize) -> Vec<f64> {
        geometric_decay(self.config.alpha, n)
    }

    /// Weighted average of `guides` (nearest first).
    ///
    /// `_at` is the walker's current position; it does not enter the
    /// weighting. An empty guide list yields [`Position::ZERO`], which the
    /// caller must treat as "no aim".
    pub fn aim_point(&self, _at: Position, guides: &[Coord]) -> Position {
        let mut aim = Position::ZERO;
        for (&g, w) in guides.iter().zip(self.coefficients(guides.len())) {
            aim += g.to_continuous() * w;
        }
        aim
    }
}

/// [`Smoother::aim_point`] with default settings.
pub fn aim_point(at: Position, guides: &[Coord]) -> Position {
    Smoother::default().aim_point(at, guides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums() {
        assert_eq!(geometric_sum(2.0, 1.0, 5), 10.0);
        assert_eq!(geometric_sum(1.0, 2.0, 3), 7.0);
        assert_eq!(geometric_sum(1.0, 3.0, 0), 0.0);
    }

    #[test]
    fn decay_is_normalised_and_non_increasing() {
        for alpha in [1.5, 3.0, 10.0] {
            for n in 1..60 {
                let w = geometric_decay(alpha, n);
                assert_eq!(w.len(), n);
                assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-3);
                assert!(w.windows(2).all(|p| p[0] >= p[1]));
            }
        }
    }

    #[test]
    fn decay_matches_raw_powers() {
        // 9, 3, 1 over 13.
        let w = geometric_decay(3.0, 3);
        for (got, want) in w.iter().zip([9.0 / 13.0, 3.0 / 13.0, 1.0 / 13.0]) {
            assert!((got - want).abs() < 1e-12);
        }
        // Below one the farthest point dominates.
        let w = geometric_decay(0.5, 3);
        assert!(w[0] < w[1] && w[1] < w[2]);
    }

    #[test]
    fn long_sequences_stay_finite() {
        let w = geometric_decay(3.0, 5000);
        assert!(w.iter().all(|x| x.is_finite()));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn bad_alpha_is_uniform() {
        for alpha in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let w = geometric_decay(alpha, 4);
            assert!(w.iter().all(|x| (x - 0.25).abs() < 1e-12));
        }
    }

    #[test]
    fn aim_point_weights_nearest() {
        let guides = [Coord::new(0, 0), Coord::new(4, 0)];
        let aim = aim_point(Position::ZERO, &guides);
        assert!((aim.row - 1.0).abs() < 1e-12);
        assert_eq!(aim.col, 0.0);

        let single = aim_point(Position::new(9.0, 9.0), &[Coord::new(2, 3)]);
        assert_eq!(single, Position::new(2.0, 3.0));
    }

    #[test]
    fn empty_guides_give_zero() {
        assert_eq!(aim_point(Position::new(1.0, 1.0), &[]), Position::ZERO);
    }

    #[test]
    fn configured_alpha() {
        let s = Smoother::new(SmootherConfig { alpha: 1.0 });
        let aim = s.aim_point(Position::ZERO, &[Coord::new(0, 0), Coord::new(0, 6), Coord::new(0, 3)]);
        assert!((aim.col - 3.0).abs() < 1e-12);
    }
}
