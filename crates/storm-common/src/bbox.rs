//! Bounding box of the rendering window.

use serde::{Deserialize, Serialize};

/// Spatial window in molecule-list units (typically camera pixels).
///
/// The window is half-open: a coordinate on `min_x`/`min_y` is inside,
/// one on `max_x`/`max_y` is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest integer-aligned box covering every finite point.
    ///
    /// Returns `None` when no finite point is supplied.
    pub fn from_extent<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a [f64], &'a [f64])>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for (xs, ys) in points {
            for (&x, &y) in xs.iter().zip(ys) {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        if !min_x.is_finite() {
            return None;
        }

        Some(Self {
            min_x: min_x.floor(),
            min_y: min_y.floor(),
            max_x: max_x.ceil(),
            max_y: max_y.ceil(),
        })
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Half-open containment test: `[min_x, max_x) x [min_y, max_y)`.
    #[inline]
    pub fn contains_half_open(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}
