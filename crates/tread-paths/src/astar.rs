use std::collections::BinaryHeap;

use tread_core::{Coord, TerrainGrid};

use crate::distance::manhattan;
use crate::space::{NodeRef, SearchSpace};
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Full-resolution pather over a [`TerrainGrid`].
///
/// Steps are orthogonal, edge costs are [`TerrainGrid::cost`] and the
/// heuristic is the Manhattan distance, which never overestimates since every
/// step costs at least one.
#[derive(Clone, Copy)]
pub struct TerrainPather<'a> {
    grid: &'a TerrainGrid,
}

impl<'a> TerrainPather<'a> {
    pub fn new(grid: &'a TerrainGrid) -> Self {
        Self { grid }
    }
}

impl Pather for TerrainPather<'_> {
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        buf.extend(self.grid.neighbors(c));
    }

    fn passable(&self, c: Coord) -> bool {
        self.grid.is_traversable(c)
    }
}

impl WeightedPather for TerrainPather<'_> {
    fn cost(&self, from: Coord, to: Coord) -> Option<f64> {
        let cost = self.grid.cost(from, to);
        cost.is_finite().then_some(cost)
    }
}

impl AstarPather for TerrainPather<'_> {
    fn estimate(&self, from: Coord, to: Coord) -> f64 {
        manhattan(from, to)
    }
}

impl SearchSpace {
    /// Compute the cheapest path from `from` to `to` using A*.
    ///
    /// Returns the full path (including both endpoints), `[from]` when the
    /// endpoints coincide, or an empty path if the goal is unreachable.
    /// Endpoints outside the workspace extent are a caller error and also
    /// yield an empty path, as do endpoints the pather reports impassable.
    pub fn astar_path<P: AstarPather>(&mut self, pather: &P, from: Coord, to: Coord) -> Vec<Coord> {
        let (Some(start_idx), Some(goal_idx)) = (self.idx(from), self.idx(to)) else {
            log::warn!(
                "A* endpoints {from} -> {to} outside {}x{} search space",
                self.rows,
                self.cols
            );
            return Vec::new();
        };

        if !pather.passable(from) || !pather.passable(to) {
            log::debug!("A* {from} -> {to}: endpoint on impassable cell");
            return Vec::new();
        }

        if start_idx == goal_idx {
            return vec![from];
        }

        let cur_gen = self.next_generation();

        // Initialise the start node.
        {
            let node = &mut self.nodes[start_idx];
            node.g = 0.0;
            node.f = pather.estimate(from, to);
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.closed = false;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: self.nodes[start_idx].f,
            coord: from,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut expanded = 0usize;

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip stale and already-closed entries.
            if self.nodes[ci].generation != cur_gen || self.nodes[ci].closed {
                continue;
            }

            if ci == goal_idx {
                break 'search true;
            }

            self.nodes[ci].closed = true;
            expanded += 1;
            let current_g = self.nodes[ci].g;
            let current_coord = current.coord;

            nbuf.clear();
            pather.neighbors(current_coord, &mut nbuf);

            for &nc in nbuf.iter() {
                let Some(ni) = self.idx(nc) else {
                    continue;
                };
                let Some(step) = pather.cost(current_coord, nc) else {
                    continue;
                };
                let tentative_g = current_g + step;

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen {
                    if n.closed || tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                    n.closed = false;
                }

                n.g = tentative_g;
                n.f = tentative_g + pather.estimate(nc, to);
                n.parent = ci;

                open.push(NodeRef {
                    idx: ni,
                    f: n.f,
                    coord: nc,
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            log::debug!("A* {from} -> {to}: unreachable after {expanded} expansions");
            return Vec::new();
        }

        // Reconstruct path.
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.coord(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        log::debug!(
            "A* {from} -> {to}: {} cells, cost {:.3}, {expanded} expansions",
            path.len(),
            self.nodes[goal_idx].g
        );
        path
    }
}

/// One-shot full-resolution A* over `grid`.
///
/// Allocates a fresh [`SearchSpace`]; keep one around and call
/// [`SearchSpace::astar_path`] with a [`TerrainPather`] for repeated queries.
pub fn find_path(grid: &TerrainGrid, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut space = SearchSpace::new(grid.rows(), grid.cols());
    space.astar_path(&TerrainPather::new(grid), start, goal)
}

/// Sum of [`TerrainGrid::cost`] along consecutive cells of `path`.
pub fn path_cost(grid: &TerrainGrid, path: &[Coord]) -> f64 {
    path.windows(2).map(|w| grid.cost(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tread_core::Terrain;

    fn assert_valid(grid: &TerrainGrid, path: &[Coord], start: Coord, goal: Coord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent_4(w[1]), "{} -> {} not adjacent", w[0], w[1]);
        }
        for &c in path {
            assert!(grid.in_bounds(c));
            assert!(!grid.is_obstacle(c), "path crosses obstacle at {c}");
        }
    }

    #[test]
    fn open_grid_is_manhattan_optimal() {
        let g = TerrainGrid::flat(5, 5, 0.0).unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(4, 4);
        let path = find_path(&g, start, goal);
        assert_eq!(path.len(), 9);
        assert_valid(&g, &path, start, goal);
        assert!(path.iter().all(|c| (0..5).contains(&c.row) && (0..5).contains(&c.col)));
    }

    #[test]
    fn same_start_and_goal() {
        let g = TerrainGrid::flat(3, 3, 0.0).unwrap();
        assert_eq!(find_path(&g, Coord::new(1, 1), Coord::new(1, 1)), vec![Coord::new(1, 1)]);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut g = TerrainGrid::flat(5, 5, 0.0).unwrap();
        for c in Coord::new(2, 2).neighbors_4() {
            g.set(c, Terrain::Obstacle);
        }
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(2, 2)).is_empty());
    }

    #[test]
    fn routes_around_wall() {
        let mut g = TerrainGrid::flat(5, 5, 0.0).unwrap();
        for row in 0..4 {
            g.set(Coord::new(row, 2), Terrain::Obstacle);
        }
        let start = Coord::new(0, 0);
        let goal = Coord::new(0, 4);
        let path = find_path(&g, start, goal);
        assert_valid(&g, &path, start, goal);
        assert!(path.contains(&Coord::new(4, 2)));
        assert_eq!(path.len(), 13);
    }

    #[test]
    fn prefers_low_ground() {
        // A high ridge through the middle row, except one gap far to the
        // side.
        let mut g = TerrainGrid::flat(3, 7, 0.0).unwrap();
        for col in 0..6 {
            g.set(Coord::new(1, col), Terrain::Traversable(20.0));
        }
        let path = find_path(&g, Coord::new(0, 0), Coord::new(2, 0));
        assert!(path.contains(&Coord::new(1, 6)));
        assert_eq!(path_cost(&g, &path), 14.0);
    }

    #[test]
    fn out_of_bounds_endpoints_yield_empty_path() {
        let g = TerrainGrid::flat(3, 3, 0.0).unwrap();
        assert!(find_path(&g, Coord::new(-1, 0), Coord::new(2, 2)).is_empty());
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(3, 3)).is_empty());
    }

    #[test]
    fn terrain_steps_cost_at_least_their_estimate() {
        let mut g = TerrainGrid::from_rows(&[[0.0, 3.0, 1.5], [2.0, 0.0, 4.0]]).unwrap();
        g.set(Coord::new(1, 2), Terrain::Obstacle);
        let pather = TerrainPather::new(&g);
        let mut buf = Vec::new();
        for (c, _) in g.iter().filter(|(_, t)| !t.is_obstacle()) {
            assert!(pather.passable(c));
            buf.clear();
            pather.neighbors(c, &mut buf);
            for &n in &buf {
                let cost = pather.cost(c, n).unwrap();
                assert_eq!(cost, 1.0 + g.height(n).unwrap());
                assert!(pather.estimate(c, n) <= cost);
            }
        }
        assert!(!pather.passable(Coord::new(1, 2)));
        assert_eq!(pather.cost(Coord::new(0, 2), Coord::new(1, 2)), None);
    }

    #[test]
    fn obstacle_endpoints_yield_empty_path() {
        let mut g = TerrainGrid::flat(3, 3, 0.0).unwrap();
        g.set(Coord::new(0, 0), Terrain::Obstacle);
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(2, 2)).is_empty());
        assert!(find_path(&g, Coord::new(2, 2), Coord::new(0, 0)).is_empty());
        assert!(find_path(&g, Coord::new(0, 0), Coord::new(0, 0)).is_empty());
        assert_eq!(find_path(&g, Coord::new(0, 1), Coord::new(1, 0)).len(), 3);
    }

    #[test]
    fn deterministic_tie_breaking() {
        let g = TerrainGrid::flat(4, 4, 0.0).unwrap();
        let a = find_path(&g, Coord::new(0, 0), Coord::new(3, 3));
        let mut space = SearchSpace::new(4, 4);
        let pather = TerrainPather::new(&g);
        for _ in 0..3 {
            assert_eq!(space.astar_path(&pather, Coord::new(0, 0), Coord::new(3, 3)), a);
        }
    }

    #[test]
    fn reused_space_after_shape_change() {
        let small = TerrainGrid::flat(3, 3, 0.0).unwrap();
        let big = TerrainGrid::flat(6, 6, 0.0).unwrap();
        let mut space = SearchSpace::new(6, 6);
        assert_eq!(
            space.astar_path(&TerrainPather::new(&big), Coord::ZERO, Coord::new(5, 5)).len(),
            11
        );
        space.set_shape(3, 3);
        assert_eq!(
            space.astar_path(&TerrainPather::new(&small), Coord::ZERO, Coord::new(2, 2)).len(),
            5
        );
    }

    /// Same terrain, zero heuristic: plain Dijkstra.
    struct Dijkstra<'a>(TerrainPather<'a>);

    impl Pather for Dijkstra<'_> {
        fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
            self.0.neighbors(c, buf);
        }
    }

    impl WeightedPather for Dijkstra<'_> {
        fn cost(&self, from: Coord, to: Coord) -> Option<f64> {
            self.0.cost(from, to)
        }
    }

    impl AstarPather for Dijkstra<'_> {
        fn estimate(&self, _: Coord, _: Coord) -> f64 {
            0.0
        }
    }

    fn reachable(grid: &TerrainGrid, start: Coord, goal: Coord) -> bool {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([start]);
        seen[start.to_index(grid.cols()).unwrap()] = true;
        while let Some(c) = queue.pop_front() {
            if c == goal {
                return true;
            }
            for n in grid.neighbors(c) {
                let i = n.to_index(grid.cols()).unwrap();
                if !seen[i] {
                    seen[i] = true;
                    queue.push_back(n);
                }
            }
        }
        false
    }

    #[test]
    fn random_fields_match_dijkstra() {
        const N: usize = 12;
        for _ in 0..50 {
            let mut samples = vec![0.0; N * N];
            for s in samples.iter_mut() {
                let r: f64 = rand::random();
                *s = if r < 0.25 { f64::INFINITY } else { (r * 8.0).floor() };
            }
            samples[0] = 0.0;
            samples[N * N - 1] = 0.0;
            let g = TerrainGrid::from_samples(N, N, &samples).unwrap();
            let start = Coord::new(0, 0);
            let goal = Coord::new(N as i32 - 1, N as i32 - 1);

            let path = find_path(&g, start, goal);
            assert_eq!(path.is_empty(), !reachable(&g, start, goal));
            if path.is_empty() {
                continue;
            }
            assert_valid(&g, &path, start, goal);

            let mut space = SearchSpace::new(N, N);
            let reference = space.astar_path(&Dijkstra(TerrainPather::new(&g)), start, goal);
            assert!((path_cost(&g, &path) - path_cost(&g, &reference)).abs() < 1e-9);
        }
    }
}
