//! Nudging footprints toward flatter ground.

use tread_core::{Coord, PlannerConfig, SlideConfig, TerrainGrid};

use crate::fit::PlaneFitter;

/// Outcome of [`Slider::slide`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlideResult {
    /// The region was already the best candidate, or there was nothing to
    /// slide along.
    NoModification,
    /// The region was replaced by a flatter translation of itself.
    Modified,
    /// The grid has no cells.
    NotApplicable,
}

/// Bounded local search translating a footprint along the downhill axis of
/// its contact plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Slider {
    config: SlideConfig,
    fitter: PlaneFitter,
}

impl Slider {
    pub fn new(config: SlideConfig, fitter: PlaneFitter) -> Self {
        Self { config, fitter }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.slide, PlaneFitter::new(config.plane_fit))
    }

    /// Try translations of `region` by `1..=max_steps` multiples of the slide
    /// vector, both ways, and keep the one with the smallest stand angle if
    /// it is strictly flatter than the current placement.
    ///
    /// Candidates leaving the grid or touching an obstacle are skipped.
    pub fn slide(&self, region: &mut [Coord], grid: &TerrainGrid) -> SlideResult {
        if grid.is_empty() {
            return SlideResult::NotApplicable;
        }

        let plane = self.fitter.fit(region, grid);
        let dir = plane.normal().slide();
        if dir == Coord::ZERO {
            return SlideResult::NoModification;
        }

        let original = plane.normal_angle();
        let mut best_angle = original;
        let mut best_offset = None;
        let mut candidate = Vec::with_capacity(region.len());

        for sign in [1, -1] {
            for step in 1..=self.config.max_steps {
                let offset = dir * (sign * step);
                candidate.clear();
                candidate.extend(region.iter().map(|&c| c + offset));
                if !candidate.iter().all(|&c| grid.in_bounds(c)) {
                    continue;
                }
                let fitted = self.fitter.fit(&candidate, grid);
                if fitted.is_degenerate() {
                    continue;
                }
                let angle = fitted.normal_angle();
                if angle < best_angle {
                    best_angle = angle;
                    best_offset = Some(offset);
                }
            }
        }

        let Some(offset) = best_offset else {
            log::trace!("slide along {dir}: nothing flatter than {original:.4}");
            return SlideResult::NoModification;
        };
        for c in region.iter_mut() {
            *c = *c + offset;
        }
        log::debug!("slide by {offset}: stand angle {original:.4} -> {best_angle:.4}");
        SlideResult::Modified
    }
}

/// [`Slider::slide`] with default settings.
pub fn slide(region: &mut [Coord], grid: &TerrainGrid) -> SlideResult {
    Slider::default().slide(region, grid)
}
