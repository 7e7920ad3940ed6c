//! Geometric primitives shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

/// Number of coordinate steps per point used by [`normalize`].
const COORD_SCALE: f64 = 1000.0;

/// Snap a coordinate onto the fixed 1/1000 pt lattice.
///
/// Every coordinate that enters edge extraction goes through this function,
/// so an explicit boundary given as `100` and a ruling drawn at
/// `100.00000001` end up as the same value and compare with `==`.
pub fn normalize(v: f64) -> f64 {
    let n = (v * COORD_SCALE).round() / COORD_SCALE;
    // Avoid -0.0 leaking into keys and output.
    if n == 0.0 { 0.0 } else { n }
}

/// Integer key of a normalized coordinate, for ordered maps and sets.
pub(crate) fn coord_key(v: f64) -> i64 {
    (v * COORD_SCALE).round() as i64
}

/// Orientation of an edge or line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Neither axis-aligned. Never valid input to the edge merger.
    Diagonal,
}

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow pdfplumber convention:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Centre point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Half-open containment: left/top inclusive, right/bottom exclusive.
    ///
    /// A point on a boundary shared by two adjacent boxes belongs to exactly
    /// one of them.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.top && y < self.bottom
    }

    /// True when the boxes overlap or touch along a segment.
    ///
    /// Boxes meeting at a single corner point do not count.
    pub fn overlaps(&self, other: &BBox) -> bool {
        let width = self.x1.min(other.x1) - self.x0.max(other.x0);
        let height = self.bottom.min(other.bottom) - self.top.max(other.top);
        width >= 0.0 && height >= 0.0 && width + height > 0.0
    }
}
