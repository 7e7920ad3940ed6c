//! Intersections of merged edges and the row/column grid of a table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::edges::Edge;
use crate::geometry::{BBox, Orientation, coord_key};

/// An intersection point between horizontal and vertical edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// X coordinate of the intersection point.
    pub x: f64,
    /// Y coordinate of the intersection point.
    pub y: f64,
}

/// Intersection points together with the edges that produce them.
///
/// Edges are referred to by their index in the slice the index was built
/// from. Two points are connected along an axis when some edge of that
/// axis passes through both.
#[derive(Debug, Default)]
pub(crate) struct IntersectionIndex {
    /// Points in `(x, y)` order, unique.
    pub(crate) points: Vec<Intersection>,
    verticals: Vec<Vec<usize>>,
    horizontals: Vec<Vec<usize>>,
    by_key: BTreeMap<(i64, i64), usize>,
}

impl IntersectionIndex {
    /// Index every crossing of a vertical and a horizontal edge.
    ///
    /// A vertical edge crosses a horizontal one when its x lies within the
    /// horizontal's span widened by `x_tolerance`, and the horizontal's y
    /// lies within the vertical's span widened by `y_tolerance`. The point
    /// takes the vertical's x and the horizontal's y.
    pub(crate) fn build(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Self {
        let mut horizontals: Vec<usize> = (0..edges.len())
            .filter(|&i| edges[i].orientation == Orientation::Horizontal)
            .collect();
        let mut verticals: Vec<usize> = (0..edges.len())
            .filter(|&i| edges[i].orientation == Orientation::Vertical)
            .collect();
        horizontals.sort_by(|&a, &b| {
            let (ea, eb) = (&edges[a], &edges[b]);
            ea.top.total_cmp(&eb.top).then(ea.x0.total_cmp(&eb.x0)).then(a.cmp(&b))
        });
        verticals.sort_by(|&a, &b| {
            let (ea, eb) = (&edges[a], &edges[b]);
            ea.x0.total_cmp(&eb.x0).then(ea.top.total_cmp(&eb.top)).then(a.cmp(&b))
        });

        let mut found: BTreeMap<(i64, i64), (Intersection, Vec<usize>, Vec<usize>)> =
            BTreeMap::new();
        for &vi in &verticals {
            let v = &edges[vi];
            for &hi in &horizontals {
                let h = &edges[hi];
                if v.top <= h.top + y_tolerance
                    && v.bottom >= h.top - y_tolerance
                    && v.x0 >= h.x0 - x_tolerance
                    && v.x0 <= h.x1 + x_tolerance
                {
                    let entry = found
                        .entry((coord_key(v.x0), coord_key(h.top)))
                        .or_insert_with(|| {
                            (Intersection { x: v.x0, y: h.top }, Vec::new(), Vec::new())
                        });
                    entry.1.push(vi);
                    entry.2.push(hi);
                }
            }
        }

        let mut index = Self::default();
        for (key, (point, v, h)) in found {
            index.by_key.insert(key, index.points.len());
            index.points.push(point);
            index.verticals.push(v);
            index.horizontals.push(h);
        }
        index
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// Position of the point at `(x, y)`, if there is one.
    pub(crate) fn find(&self, x: f64, y: f64) -> Option<usize> {
        self.by_key.get(&(coord_key(x), coord_key(y))).copied()
    }

    /// True when one edge runs through both points.
    ///
    /// Points sharing an x are joined by a vertical edge, points sharing a y
    /// by a horizontal one; any other pair is never connected.
    pub(crate) fn connected(&self, a: usize, b: usize) -> bool {
        let (pa, pb) = (self.points[a], self.points[b]);
        let shared = |ids: &[Vec<usize>]| ids[a].iter().any(|e| ids[b].contains(e));
        if pa.x == pb.x {
            shared(&self.verticals)
        } else if pa.y == pb.y {
            shared(&self.horizontals)
        } else {
            false
        }
    }
}

/// Find all intersection points between horizontal and vertical edges.
///
/// Only actual overlapping segments count, not infinite line extensions.
/// Diagonal edges are ignored. Points come back sorted by x, then y, with
/// no duplicates.
pub fn edges_to_intersections(
    edges: &[Edge],
    x_tolerance: f64,
    y_tolerance: f64,
) -> Vec<Intersection> {
    IntersectionIndex::build(edges, x_tolerance, y_tolerance).points
}

/// Distinct column and row boundaries of one table.
///
/// Both sequences are strictly increasing. Column `i` spans
/// `columns[i]..columns[i + 1]`, row `j` spans `rows[j]..rows[j + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// X coordinates of the column boundaries, left to right.
    pub columns: Vec<f64>,
    /// Y coordinates of the row boundaries, top to bottom.
    pub rows: Vec<f64>,
}

impl Grid {
    /// Collect the distinct boundaries of a set of cell boxes.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a BBox>) -> Self {
        let mut columns: BTreeMap<i64, f64> = BTreeMap::new();
        let mut rows: BTreeMap<i64, f64> = BTreeMap::new();
        for cell in cells {
            for x in [cell.x0, cell.x1] {
                columns.entry(coord_key(x)).or_insert(x);
            }
            for y in [cell.top, cell.bottom] {
                rows.entry(coord_key(y)).or_insert(y);
            }
        }
        Self {
            columns: columns.into_values().collect(),
            rows: rows.into_values().collect(),
        }
    }

    /// Number of grid columns (one less than the column boundaries).
    pub fn column_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Number of grid rows (one less than the row boundaries).
    pub fn row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Index of the column boundary at `x`.
    pub fn column_index(&self, x: f64) -> Option<usize> {
        boundary_index(&self.columns, x)
    }

    /// Index of the row boundary at `y`.
    pub fn row_index(&self, y: f64) -> Option<usize> {
        boundary_index(&self.rows, y)
    }

    /// Box of the single grid unit at `(row, column)`.
    pub fn unit_bbox(&self, row: usize, column: usize) -> Option<BBox> {
        Some(BBox::new(
            *self.columns.get(column)?,
            *self.rows.get(row)?,
            *self.columns.get(column + 1)?,
            *self.rows.get(row + 1)?,
        ))
    }
}

fn boundary_index(boundaries: &[f64], v: f64) -> Option<usize> {
    let key = coord_key(v);
    boundaries
        .binary_search_by(|b| coord_key(*b).cmp(&key))
        .ok()
}
