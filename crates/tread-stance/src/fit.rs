//! Robust contact-plane fitting for footprint regions.
//!
//! The fit anchors on the upper surface of a point cloud: it seeds a triangle
//! from the highest point and the widest spread around it, then repeatedly
//! pulls in the point lying furthest above the plane if swapping it into the
//! triangle brings the plane closer to the rest of the cloud. Every returned
//! plane has its normal pointing up, so stand angles live in `[0, π/2]`.

use tread_core::{Coord, PlaneFitConfig, Point3, TerrainGrid};

use crate::plane::{Plane, Side};

/// Fits contact planes to regions of a [`TerrainGrid`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaneFitter {
    config: PlaneFitConfig,
}

impl PlaneFitter {
    pub fn new(config: PlaneFitConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &PlaneFitConfig {
        &self.config
    }

    /// Best-fit plane through the cells of `region`.
    ///
    /// Returns [`Plane::DEGENERATE`] if any cell is outside the grid or an
    /// obstacle, if fewer than three cells are given, or if the defining
    /// points are collinear.
    pub fn fit(&self, region: &[Coord], grid: &TerrainGrid) -> Plane {
        let Some(points) = region
            .iter()
            .map(|&c| grid.point3(c))
            .collect::<Option<Vec<Point3>>>()
        else {
            log::trace!("plane fit over {} cells: region leaves the ground", region.len());
            return Plane::DEGENERATE;
        };
        self.fit_points(points)
    }

    /// Best-fit plane through a point cloud. See [`fit`](Self::fit).
    pub fn fit_points(&self, mut pool: Vec<Point3>) -> Plane {
        match pool.len() {
            0..=2 => return Plane::DEGENERATE,
            3 => {
                return Plane::from_points([pool[0], pool[1], pool[2]])
                    .map_or(Plane::DEGENERATE, Plane::oriented_up);
            }
            _ => {}
        }

        let mut triple = seed_triple(&mut pool);
        let Some(mut plane) = Plane::from_points(triple).map(Plane::oriented_up) else {
            return Plane::DEGENERATE;
        };

        let eps = self.config.epsilon;
        let mut iterations = 0;
        let mut adopted = 0;
        while iterations < self.config.max_iterations {
            let Some(ci) = furthest_above(&plane, &pool, eps) else {
                break;
            };
            iterations += 1;
            let candidate = pool.remove(ci);

            let mut best_total = total_distance(&plane, &pool);
            let mut best = None;
            for k in 0..3 {
                let mut hypothesis = triple;
                hypothesis[k] = candidate;
                let Some(h) = Plane::from_points(hypothesis).map(Plane::oriented_up) else {
                    continue;
                };
                let total = total_distance(&h, &pool);
                if total < best_total {
                    best_total = total;
                    best = Some((hypothesis, h));
                }
            }
            if let Some((t, h)) = best {
                triple = t;
                plane = h;
                adopted += 1;
            }
            log::trace!("plane fit round {iterations}: total distance {best_total:.6}");
        }
        log::debug!(
            "plane fit: {iterations} rounds, {adopted} swaps, {} points left, angle {:.4}",
            pool.len(),
            plane.normal_angle()
        );
        plane
    }

    /// Stand angle of `region`: the contact plane's tilt from vertical.
    #[inline]
    pub fn stand_angle(&self, region: &[Coord], grid: &TerrainGrid) -> f64 {
        self.fit(region, grid).normal_angle()
    }

    /// Upward contact-plane normal of `region`, zero when degenerate.
    #[inline]
    pub fn normal(&self, region: &[Coord], grid: &TerrainGrid) -> Point3 {
        self.fit(region, grid).normal()
    }
}

/// [`PlaneFitter::stand_angle`] with default settings.
pub fn stand_angle(region: &[Coord], grid: &TerrainGrid) -> f64 {
    PlaneFitter::default().stand_angle(region, grid)
}

/// [`PlaneFitter::normal`] with default settings.
pub fn normal(region: &[Coord], grid: &TerrainGrid) -> Point3 {
    PlaneFitter::default().normal(region, grid)
}

/// Pick the highest point, the point furthest from it horizontally, and the
/// point spanning the largest horizontal triangle with those two, removing
/// all three from `pool`. Requires at least three points.
fn seed_triple(pool: &mut Vec<Point3>) -> [Point3; 3] {
    pool.sort_by(|p, q| p.z.total_cmp(&q.z));
    let Some(top) = pool.pop() else {
        return [Point3::ZERO; 3];
    };

    let far = first_max_by(pool, |p| p.planar_distance_sq(top));
    let second = pool.remove(far);

    let (ax, ay) = (second.x - top.x, second.y - top.y);
    let wide = first_max_by(pool, |p| (ax * (p.y - top.y) - ay * (p.x - top.x)).abs());
    let third = pool.remove(wide);

    [top, second, third]
}

/// Index of the first element maximising `key`; 0 for an empty slice.
fn first_max_by(points: &[Point3], key: impl Fn(&Point3) -> f64) -> usize {
    let mut best = 0;
    let mut best_key = f64::NEG_INFINITY;
    for (i, p) in points.iter().enumerate() {
        let k = key(p);
        if k > best_key {
            best = i;
            best_key = k;
        }
    }
    best
}

fn furthest_above(plane: &Plane, pool: &[Point3], eps: f64) -> Option<usize> {
    let mut best = None;
    let mut best_dist = 0.0;
    for (i, &p) in pool.iter().enumerate() {
        if plane.side(p, eps) != Side::Above {
            continue;
        }
        let d = plane.distance(p);
        if best.is_none() || d > best_dist {
            best = Some(i);
            best_dist = d;
        }
    }
    best
}

fn total_distance(plane: &Plane, pool: &[Point3]) -> f64 {
    pool.iter().map(|&p| plane.distance(p)).sum()
}
