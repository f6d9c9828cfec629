//! Planes in `A·x + B·y + C·z + D = 0` form.

use tread_core::Point3;

/// Below this normal magnitude a plane is treated as degenerate.
const DEGENERATE_NORM: f64 = 1e-9;

/// Position of a point relative to a plane's normal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// On the side the normal points to.
    Above,
    Below,
    /// Within tolerance of the plane.
    Inside,
}

/// A plane with normal `(a, b, c)` and offset `d`.
///
/// The all-zero plane is the degenerate value returned when no plane could be
/// defined; its normal is zero and every derived query is neutral.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    pub const DEGENERATE: Self = Self {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
    };

    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Plane through three points, with normal `(p1 - p0) × (p2 - p0)`.
    ///
    /// Returns `None` when the points are collinear.
    pub fn from_points([p0, p1, p2]: [Point3; 3]) -> Option<Self> {
        let n = (p1 - p0).cross(p2 - p0);
        if n.is_zero() {
            return None;
        }
        Some(Self::new(n.x, n.y, n.z, -n.dot(p0)))
    }

    #[inline]
    pub fn normal(&self) -> Point3 {
        Point3::new(self.a, self.b, self.c)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal().length() < DEGENERATE_NORM
    }

    /// The same plane with its normal pointing up (`c >= 0`).
    pub fn oriented_up(self) -> Self {
        if self.c < 0.0 {
            Self::new(-self.a, -self.b, -self.c, -self.d)
        } else {
            self
        }
    }

    /// Angle between the normal and the vertical axis, in `[0, π]`.
    ///
    /// Zero for a level plane and for the degenerate plane.
    pub fn normal_angle(&self) -> f64 {
        let horizontal = self.a.hypot(self.b);
        if horizontal == 0.0 && self.c == 0.0 {
            return 0.0;
        }
        horizontal.atan2(self.c)
    }

    /// `A·x + B·y + C·z + D`, unnormalised.
    #[inline]
    pub fn signed_value(&self, p: Point3) -> f64 {
        self.normal().dot(p) + self.d
    }

    /// Signed perpendicular distance; positive on the normal's side.
    pub fn signed_distance(&self, p: Point3) -> f64 {
        let norm = self.normal().length();
        if norm < DEGENERATE_NORM {
            return 0.0;
        }
        self.signed_value(p) / norm
    }

    /// Perpendicular distance from `p`. Zero for the degenerate plane.
    #[inline]
    pub fn distance(&self, p: Point3) -> f64 {
        self.signed_distance(p).abs()
    }

    /// Classify `p` with tolerance `eps` on the signed distance.
    pub fn side(&self, p: Point3, eps: f64) -> Side {
        let s = self.signed_distance(p);
        if s > eps {
            Side::Above
        } else if s < -eps {
            Side::Below
        } else {
            Side::Inside
        }
    }
}
