use std::collections::BTreeSet;

use tread_core::Coord;

/// Spacing of the samples taken across the foot sole.
const SCAN_STEP: f64 = 0.5;

/// Rectangular foot sole, `length` along the heading and `width` across it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FootShape {
    pub length: f64,
    pub width: f64,
}

impl FootShape {
    pub const fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    /// Whether the foot-local point `(l, w)` lies on the sole (edges
    /// included).
    pub fn contains(&self, l: f64, w: f64) -> bool {
        l.abs() <= self.length / 2.0 && w.abs() <= self.width / 2.0
    }

    /// Grid cells covered by the sole centered on `center` and rotated by
    /// `yaw` radians, sorted and without duplicates.
    ///
    /// The sole is sampled every half cell; each sample is rotated and
    /// rounded to its nearest cell. A negative or non-finite extent covers
    /// nothing.
    pub fn cover(&self, center: Coord, yaw: f64) -> Vec<Coord> {
        let (Some(nl), Some(nw)) = (samples(self.length), samples(self.width)) else {
            return Vec::new();
        };
        let (sin, cos) = yaw.sin_cos();
        let (half_l, half_w) = (self.length / 2.0, self.width / 2.0);

        let mut cells = BTreeSet::new();
        for i in 0..=nl {
            let l = -half_l + i as f64 * SCAN_STEP;
            for j in 0..=nw {
                let w = -half_w + j as f64 * SCAN_STEP;
                let row = (l * cos - w * sin).round() as i32;
                let col = (l * sin + w * cos).round() as i32;
                cells.insert(center.shift(row, col));
            }
        }
        cells.into_iter().collect()
    }
}

/// Number of scan steps across `extent`.
fn samples(extent: f64) -> Option<usize> {
    (extent.is_finite() && extent >= 0.0).then(|| (extent / SCAN_STEP).floor() as usize)
}
