//! Terrain roughness scoring.
//!
//! The score blends dispersion and extremes of a block's heights:
//! `stddev_weight * stddev + range_weight * (max - min)`. The standard
//! deviation alone underweights a single spike, the range term catches it.
//! Blocks that are mostly obstacle, or contain no ground at all, are
//! infeasible and score `None`.

use crate::config::RoughnessConfig;
use crate::geom::Coord;
use crate::grid::TerrainGrid;

/// Scores blocks of terrain; lower is flatter.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoughnessEvaluator {
    config: RoughnessConfig,
}

impl RoughnessEvaluator {
    pub fn new(config: RoughnessConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RoughnessConfig {
        &self.config
    }

    /// Score a list of height samples.
    ///
    /// Negative and non-finite samples are ignored. No usable sample is
    /// infeasible, a single sample is perfectly flat.
    pub fn evaluate(&self, heights: &[f64]) -> Option<f64> {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &h in heights.iter().filter(|h| h.is_finite() && **h >= 0.0) {
            n += 1;
            sum += h;
            min = min.min(h);
            max = max.max(h);
        }
        match n {
            0 => return None,
            1 => return Some(0.0),
            _ => {}
        }

        let mean = sum / n as f64;
        let variance = heights
            .iter()
            .filter(|h| h.is_finite() && **h >= 0.0)
            .map(|h| (h - mean) * (h - mean))
            .sum::<f64>()
            / n as f64;

        Some(self.config.stddev_weight * variance.sqrt() + self.config.range_weight * (max - min))
    }

    /// Score the square block of side `side` centered on `center`, clipped to
    /// the grid.
    ///
    /// Returns `None` when the obstacle share of the clipped block reaches
    /// the configured limit.
    pub fn evaluate_block(&self, grid: &TerrainGrid, center: Coord, side: usize) -> Option<f64> {
        let (heights, visited) = grid.block_heights(center, side);
        if visited == 0 {
            return None;
        }
        let blocked = visited - heights.len();
        if blocked as f64 / visited as f64 >= self.config.obstacle_fraction_limit {
            log::trace!("block at {center} infeasible: {blocked}/{visited} obstacle cells");
            return None;
        }
        self.evaluate(&heights)
    }
}
