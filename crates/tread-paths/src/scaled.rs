//! Two-resolution search producing guide sequences.
//!
//! The fine grid is coarsened by `scale = 1 / stride`, A* runs on the coarse
//! grid with roughness-augmented edge costs, and the coarse path is mapped
//! back to fine block centers.

use tread_core::{
    Coord, PlannerConfig, RoughnessConfig, RoughnessEvaluator, SearchConfig, TerrainGrid,
};

use crate::distance::euclidean;
use crate::space::SearchSpace;
use crate::traits::{AstarPather, Pather, WeightedPather};

// ---------------------------------------------------------------------------
// CoarsePather
// ---------------------------------------------------------------------------

/// Pather over a coarsened grid.
///
/// Entering coarse cell `v` costs `coarse.cost(u, v)` plus the roughness of
/// the fine block under `v`. Blocks whose roughness is infeasible prune every
/// edge into them. Roughness is evaluated once per coarse cell up front.
pub struct CoarsePather<'a> {
    coarse: &'a TerrainGrid,
    roughness: Vec<Option<f64>>,
}

impl<'a> CoarsePather<'a> {
    pub fn new(
        fine: &TerrainGrid,
        coarse: &'a TerrainGrid,
        scale: f64,
        evaluator: &RoughnessEvaluator,
    ) -> Self {
        let side = TerrainGrid::block_side(scale);
        let roughness = coarse
            .iter()
            .map(|(c, _)| evaluator.evaluate_block(fine, fine.block_center(c, scale), side))
            .collect();
        Self { coarse, roughness }
    }

    /// Roughness of the fine block under coarse cell `c`, `None` when the
    /// block is infeasible or `c` is outside the coarse grid.
    pub fn roughness(&self, c: Coord) -> Option<f64> {
        if !self.coarse.in_bounds(c) {
            return None;
        }
        c.to_index(self.coarse.cols())
            .and_then(|i| self.roughness.get(i).copied().flatten())
    }
}

impl Pather for CoarsePather<'_> {
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        buf.extend(self.coarse.neighbors(c));
    }
}

impl WeightedPather for CoarsePather<'_> {
    fn cost(&self, from: Coord, to: Coord) -> Option<f64> {
        let step = self.coarse.cost(from, to);
        if !step.is_finite() {
            return None;
        }
        Some(step + self.roughness(to)?)
    }
}

impl AstarPather for CoarsePather<'_> {
    fn estimate(&self, from: Coord, to: Coord) -> f64 {
        euclidean(from, to)
    }
}

// ---------------------------------------------------------------------------
// ScaledSearch
// ---------------------------------------------------------------------------

/// Coarse-to-fine guide search with a reusable coarse workspace.
pub struct ScaledSearch {
    search: SearchConfig,
    evaluator: RoughnessEvaluator,
    space: SearchSpace,
}

impl ScaledSearch {
    pub fn new(search: SearchConfig, roughness: RoughnessConfig) -> Self {
        Self {
            search,
            evaluator: RoughnessEvaluator::new(roughness),
            space: SearchSpace::new(0, 0),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.search, config.roughness)
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.search
    }

    /// Compute the guide sequence from `start` to `goal` on `grid`.
    ///
    /// Interior elements are the fine centers of the coarse path's blocks;
    /// the first and last elements are always exactly `start` and `goal`.
    /// Returns an empty sequence if the coarse goal is unreachable, if either
    /// endpoint is outside `grid` or on an obstacle, or if the configured
    /// stride is not a finite number of at least one cell.
    pub fn guide_path(&mut self, grid: &TerrainGrid, start: Coord, goal: Coord) -> Vec<Coord> {
        let stride = self.search.stride;
        if !(stride.is_finite() && stride >= 1.0) {
            log::warn!("guide search with invalid stride {stride}");
            return Vec::new();
        }
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            log::warn!(
                "guide endpoints {start} -> {goal} outside {}x{} grid",
                grid.rows(),
                grid.cols()
            );
            return Vec::new();
        }
        if !grid.is_traversable(start) || !grid.is_traversable(goal) {
            log::debug!("guide endpoints {start} -> {goal}: endpoint on obstacle");
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let scale = self.search.scale();
        let coarse = grid.coarsen(scale, self.search.aggregate, self.evaluator.config());
        let pather = CoarsePather::new(grid, &coarse, scale, &self.evaluator);

        let from = coarse.clamp(start.scaled(scale));
        let to = coarse.clamp(goal.scaled(scale));

        self.space.set_shape(coarse.rows(), coarse.cols());
        let path = self.space.astar_path(&pather, from, to);
        if path.is_empty() {
            log::debug!("no coarse route {from} -> {to} at stride {stride}");
            return Vec::new();
        }

        let mut guides: Vec<Coord> = path.iter().map(|&c| grid.block_center(c, scale)).collect();
        if guides.len() == 1 {
            // Both endpoints share a block.
            guides.push(goal);
        }
        let last = guides.len() - 1;
        guides[0] = start;
        guides[last] = goal;
        log::debug!(
            "guide {start} -> {goal}: {} points over {}x{} coarse grid",
            guides.len(),
            coarse.rows(),
            coarse.cols()
        );
        guides
    }
}

impl Default for ScaledSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default(), RoughnessConfig::default())
    }
}

/// One-shot guide search at `stride` with default aggregation and roughness
/// weights.
pub fn guide_path(grid: &TerrainGrid, start: Coord, goal: Coord, stride: f64) -> Vec<Coord> {
    let search = SearchConfig {
        stride,
        ..Default::default()
    };
    ScaledSearch::new(search, RoughnessConfig::default()).guide_path(grid, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::{find_path, path_cost};
    use tread_core::{Aggregate, Terrain};

    #[test]
    fn endpoints_are_exact() {
        let g = TerrainGrid::flat(10, 10, 0.0).unwrap();
        let start = Coord::new(1, 2);
        let goal = Coord::new(9, 8);
        let guides = guide_path(&g, start, goal, 4.0);
        // 3x3 coarse grid, corner to corner.
        assert_eq!(guides.len(), 5);
        assert_eq!(guides.first(), Some(&start));
        assert_eq!(guides.last(), Some(&goal));
        for c in &guides[1..guides.len() - 1] {
            assert!(g.in_bounds(*c));
            assert!([2, 6, 9].contains(&c.row) && [2, 6, 9].contains(&c.col));
        }
    }

    #[test]
    fn unit_stride_matches_fine_cost() {
        let samples: Vec<f64> = (0..64).map(|i| ((i * 7) % 5) as f64).collect();
        let g = TerrainGrid::from_samples(8, 8, &samples).unwrap();
        let start = Coord::new(0, 1);
        let goal = Coord::new(7, 6);
        let guides = guide_path(&g, start, goal, 1.0);
        let fine = find_path(&g, start, goal);
        assert_eq!(path_cost(&g, &guides), path_cost(&g, &fine));
    }

    #[test]
    fn same_block_endpoints() {
        let g = TerrainGrid::flat(8, 8, 0.0).unwrap();
        assert_eq!(
            guide_path(&g, Coord::new(0, 0), Coord::new(1, 1), 4.0),
            vec![Coord::new(0, 0), Coord::new(1, 1)]
        );
        assert_eq!(
            guide_path(&g, Coord::new(3, 3), Coord::new(3, 3), 4.0),
            vec![Coord::new(3, 3)]
        );
    }

    #[test]
    fn infeasible_blocks_prune_route() {
        // Columns 3 and 4 are walls; every coarse block straddling them is
        // at least half obstacle.
        let mut g = TerrainGrid::flat(8, 8, 0.0).unwrap();
        for row in 0..8 {
            g.set(Coord::new(row, 3), Terrain::Obstacle);
            g.set(Coord::new(row, 4), Terrain::Obstacle);
        }
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(0, 7), 2.0).is_empty());
        assert!(!guide_path(&g, Coord::new(0, 0), Coord::new(7, 0), 2.0).is_empty());
    }

    #[test]
    fn rough_block_costs_more() {
        let mut g = TerrainGrid::flat(6, 6, 1.0).unwrap();
        g.set(Coord::new(1, 3), Terrain::Traversable(4.0));
        let coarse = g.coarsen(0.5, Aggregate::Minimum, &RoughnessConfig::default());
        let pather = CoarsePather::new(&g, &coarse, 0.5, &RoughnessEvaluator::default());
        let flat = pather.cost(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        let rough = pather.cost(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        assert_eq!(flat, 2.0);
        assert!(rough > flat);
        assert_eq!(pather.roughness(Coord::new(5, 5)), None);
    }

    #[test]
    fn rejects_bad_input() {
        let g = TerrainGrid::flat(4, 4, 0.0).unwrap();
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(4, 0), 2.0).is_empty());
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(3, 3), 0.0).is_empty());
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(3, 3), f64::NAN).is_empty());
        assert!(guide_path(&TerrainGrid::empty(), Coord::ZERO, Coord::ZERO, 1.0).is_empty());
    }

    #[test]
    fn sub_cell_strides_are_rejected() {
        let g = TerrainGrid::flat(4, 4, 0.0).unwrap();
        for stride in [0.5, 1e-300, f64::INFINITY] {
            assert!(guide_path(&g, Coord::new(0, 0), Coord::new(3, 3), stride).is_empty());
        }
    }

    #[test]
    fn huge_stride_collapses_to_endpoints() {
        let g = TerrainGrid::flat(4, 4, 0.0).unwrap();
        assert_eq!(
            guide_path(&g, Coord::new(0, 0), Coord::new(3, 3), 1e300),
            vec![Coord::new(0, 0), Coord::new(3, 3)]
        );
    }

    #[test]
    fn obstacle_endpoints_yield_empty_guide() {
        let mut g = TerrainGrid::flat(8, 8, 0.0).unwrap();
        g.set(Coord::new(0, 0), Terrain::Obstacle);
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(7, 7), 2.0).is_empty());
        assert!(guide_path(&g, Coord::new(7, 7), Coord::new(0, 0), 2.0).is_empty());
        assert!(guide_path(&g, Coord::new(0, 0), Coord::new(0, 0), 2.0).is_empty());
        assert!(!guide_path(&g, Coord::new(0, 1), Coord::new(7, 7), 2.0).is_empty());
    }

    #[test]
    fn reusable_across_grids() {
        let mut search = ScaledSearch::new(
            SearchConfig {
                stride: 2.0,
                aggregate: Aggregate::Roughness,
            },
            RoughnessConfig::default(),
        );
        let small = TerrainGrid::flat(4, 4, 0.0).unwrap();
        let big = TerrainGrid::flat(12, 12, 0.0).unwrap();
        assert_eq!(search.guide_path(&big, Coord::ZERO, Coord::new(11, 11)).len(), 11);
        assert_eq!(search.guide_path(&small, Coord::ZERO, Coord::new(3, 3)).len(), 3);
        assert_eq!(search.config().stride, 2.0);
    }

    #[test]
    fn random_fields_keep_endpoints() {
        const N: usize = 16;
        for _ in 0..30 {
            let samples: Vec<f64> = (0..N * N)
                .map(|_| {
                    let r: f64 = rand::random();
                    if r < 0.2 { f64::INFINITY } else { r * 3.0 }
                })
                .collect();
            let g = TerrainGrid::from_samples(N, N, &samples).unwrap();
            let start = Coord::new(1, 0);
            let goal = Coord::new(N as i32 - 2, N as i32 - 1);
            let guides = guide_path(&g, start, goal, 3.0);
            if guides.is_empty() {
                continue;
            }
            assert_eq!(guides[0], start);
            assert_eq!(guides[guides.len() - 1], goal);
            assert!(guides.iter().all(|&c| g.in_bounds(c)));
        }
    }
}
