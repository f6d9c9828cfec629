//! Tunable constants for every planning stage.
//!
//! Each section carries its own `Default`. With the `serde` feature enabled,
//! missing fields fall back to those defaults so partial documents load.

use crate::grid::Aggregate;

/// Weights of the roughness score and the obstacle cut-off.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoughnessConfig {
    /// Weight of the population standard deviation.
    pub stddev_weight: f64,
    /// Weight of the height range (max - min).
    pub range_weight: f64,
    /// Obstacle share of a block at or above which it is infeasible.
    pub obstacle_fraction_limit: f64,
}

impl Default for RoughnessConfig {
    fn default() -> Self {
        Self {
            stddev_weight: 0.7,
            range_weight: 0.3,
            obstacle_fraction_limit: 0.5,
        }
    }
}

/// Coarse search settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Fine cells per coarse cell along each axis. `1.0` searches at full
    /// resolution; smaller values are rejected.
    pub stride: f64,
    /// How a block of fine cells collapses into one coarse cell value.
    pub aggregate: Aggregate,
}

impl SearchConfig {
    /// The grid scale factor, `1 / stride`.
    #[inline]
    pub fn scale(&self) -> f64 {
        1.0 / self.stride
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stride: 1.0,
            aggregate: Aggregate::Minimum,
        }
    }
}

/// Robust plane fitting settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaneFitConfig {
    /// Upper bound on refinement rounds.
    pub max_iterations: usize,
    /// Signed-distance tolerance for classifying a point as on the plane.
    pub epsilon: f64,
}

impl Default for PlaneFitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            epsilon: 1e-9,
        }
    }
}

/// Footprint slide settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlideConfig {
    /// Largest multiple of the slide vector tried in each direction.
    pub max_steps: i32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self { max_steps: 3 }
    }
}

/// Guide-point smoothing settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmootherConfig {
    /// Decay ratio between consecutive guide weights. Values above 1 favour
    /// the nearest guide point.
    pub alpha: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self { alpha: 3.0 }
    }
}

/// All planner sections in one value, handed to the stages at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    pub roughness: RoughnessConfig,
    pub search: SearchConfig,
    pub plane_fit: PlaneFitConfig,
    pub slide: SlideConfig,
    pub smoother: SmootherConfig,
}
