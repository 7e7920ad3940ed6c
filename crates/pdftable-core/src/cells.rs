//! Cell assembly: closed rectangles from intersections, grouped into tables.

use std::collections::BTreeMap;

use crate::edges::Edge;
use crate::geometry::{BBox, coord_key};
use crate::grid::IntersectionIndex;

/// Build cell boxes from the crossings of `edges`.
///
/// Convenience wrapper over the intersection index; see
/// [`intersections_to_cells`] for the rectangle rule.
pub fn edges_to_cells(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<BBox> {
    intersections_to_cells(&IntersectionIndex::build(edges, x_tolerance, y_tolerance))
}

/// Emit one cell per intersection that is the top-left corner of a closed
/// rectangle.
///
/// For each point, in `(x, y)` order, the candidates are the points
/// directly below it and directly to its right, nearest first. The first
/// pair connected to the point by an edge, whose bottom-right corner also
/// exists and connects back to both, closes the cell. When an interior
/// edge is missing the nearest closed rectangle is larger than one grid
/// unit, which is how span cells arise.
pub(crate) fn intersections_to_cells(index: &IntersectionIndex) -> Vec<BBox> {
    let mut columns: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    let mut rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    // Points are sorted by (x, y): columns fill top to bottom, rows left to right.
    for (i, p) in index.points.iter().enumerate() {
        columns.entry(coord_key(p.x)).or_default().push(i);
        rows.entry(coord_key(p.y)).or_default().push(i);
    }

    (0..index.len())
        .filter_map(|i| {
            let p = index.points[i];
            let below = columns.get(&coord_key(p.x))?;
            let right = rows.get(&coord_key(p.y))?;
            smallest_cell(index, i, below, right)
        })
        .collect()
}

fn smallest_cell(
    index: &IntersectionIndex,
    origin: usize,
    column: &[usize],
    row: &[usize],
) -> Option<BBox> {
    let p = index.points[origin];
    let below = column
        .iter()
        .copied()
        .filter(|&j| index.points[j].y > p.y && index.connected(origin, j));
    for b in below {
        let right = row
            .iter()
            .copied()
            .filter(|&j| index.points[j].x > p.x && index.connected(origin, j));
        for r in right {
            let (pb, pr) = (index.points[b], index.points[r]);
            let Some(corner) = index.find(pr.x, pb.y) else {
                continue;
            };
            if index.connected(corner, r) && index.connected(corner, b) {
                return Some(BBox::new(p.x, p.y, pr.x, pb.y));
            }
        }
    }
    None
}

/// Group cells that share a corner into tables.
///
/// Groups with a single cell are dropped. Tables come back ordered by their
/// topmost-then-leftmost cell corner; cells within a table keep their input
/// order.
pub fn cells_to_tables(cells: &[BBox]) -> Vec<Vec<BBox>> {
    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    fn union(parent: &mut [usize], a: usize, b: usize) {
        let ra = find(parent, a);
        let rb = find(parent, b);
        if ra != rb {
            parent[ra.max(rb)] = ra.min(rb);
        }
    }

    let mut corner_owner: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    for (i, cell) in cells.iter().enumerate() {
        for (x, y) in [
            (cell.x0, cell.top),
            (cell.x0, cell.bottom),
            (cell.x1, cell.top),
            (cell.x1, cell.bottom),
        ] {
            match corner_owner.get(&(coord_key(x), coord_key(y))) {
                Some(&owner) => union(&mut parent, owner, i),
                None => {
                    corner_owner.insert((coord_key(x), coord_key(y)), i);
                }
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<BBox>> = BTreeMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(cells[i]);
    }

    let mut tables: Vec<Vec<BBox>> = groups.into_values().filter(|g| g.len() > 1).collect();
    // Stable, so equal anchors keep discovery order.
    tables.sort_by(|a, b| {
        let (at, ax) = top_left(a);
        let (bt, bx) = top_left(b);
        at.total_cmp(&bt).then(ax.total_cmp(&bx))
    });
    tables
}

/// Smallest `(top, x0)` over the cells, compared top first.
fn top_left(cells: &[BBox]) -> (f64, f64) {
    cells
        .iter()
        .map(|c| (c.top, c.x0))
        .fold((f64::INFINITY, f64::INFINITY), |acc, c| {
            if c.0 < acc.0 || (c.0 == acc.0 && c.1 < acc.1) {
                c
            } else {
                acc
            }
        })
}
