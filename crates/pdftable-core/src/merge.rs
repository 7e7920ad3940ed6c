//! Edge merging: snap nearby parallel edges, then join colinear segments.
//!
//! Every step sorts with a total order before looking at neighbours, so the
//! output depends only on the set of input edges, never on their order.

use std::cmp::Ordering;

use crate::edges::Edge;
use crate::error::TableError;
use crate::geometry::Orientation;

/// Total order used before snapping and joining.
fn edge_order(a: &Edge, b: &Edge) -> Ordering {
    let (a_start, a_end) = a.span();
    let (b_start, b_end) = b.span();
    a.position()
        .total_cmp(&b.position())
        .then(a_start.total_cmp(&b_start))
        .then(a_end.total_cmp(&b_end))
        .then(a.source.cmp(&b.source))
}

/// Snap nearby parallel edges to aligned positions.
///
/// Horizontal edges are clustered by y within `snap_y_tolerance`, vertical
/// edges by x within `snap_x_tolerance`; each cluster moves to its mean.
/// Diagonal edges pass through unchanged.
///
/// This does **not** merge edges. It only aligns their positions.
pub fn snap_edges(edges: Vec<Edge>, snap_x_tolerance: f64, snap_y_tolerance: f64) -> Vec<Edge> {
    let mut horizontals: Vec<Edge> = Vec::new();
    let mut verticals: Vec<Edge> = Vec::new();
    let mut others: Vec<Edge> = Vec::new();

    for edge in edges {
        match edge.orientation {
            Orientation::Horizontal => horizontals.push(edge),
            Orientation::Vertical => verticals.push(edge),
            Orientation::Diagonal => others.push(edge),
        }
    }

    let mut result = snap_group(horizontals, snap_y_tolerance);
    result.extend(snap_group(verticals, snap_x_tolerance));
    result.extend(others);
    result
}

/// Cluster same-orientation edges by position and snap each cluster to its mean.
///
/// Positions are chained: a cluster grows while the next position is within
/// `tolerance` of the previous one. Means of neighbouring clusters therefore
/// end up more than `tolerance` apart, and snapping the output again is a
/// no-op.
fn snap_group(mut edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    if edges.is_empty() {
        return edges;
    }
    edges.sort_by(edge_order);

    let mut result = Vec::with_capacity(edges.len());
    let mut cluster_start = 0;
    for i in 1..=edges.len() {
        let end_of_cluster = i == edges.len()
            || edges[i].position() - edges[i - 1].position() > tolerance;
        if end_of_cluster {
            let cluster = &edges[cluster_start..i];
            let mean = cluster.iter().map(Edge::position).sum::<f64>() / cluster.len() as f64;
            result.extend(cluster.iter().map(|e| e.with_position(mean)));
            cluster_start = i;
        }
    }
    result
}

/// Join overlapping or nearly-touching colinear segments of one orientation.
///
/// Edges are sorted by position and span; consecutive edges at the same
/// position merge when the next one starts no more than `tolerance` past
/// the end of the current run. The merged edge keeps the run's position and
/// the union of the spans. Edges at different positions are never joined,
/// so snap first (see [`merge_edges`]).
///
/// Fails with [`TableError::InvalidOrientation`] when `orientation` is not
/// horizontal or vertical, or when an edge does not have that orientation.
pub fn join_edge_group(
    edges: Vec<Edge>,
    orientation: Orientation,
    tolerance: f64,
) -> Result<Vec<Edge>, TableError> {
    if orientation == Orientation::Diagonal {
        return Err(TableError::InvalidOrientation(
            "edges can only be joined along Horizontal or Vertical".to_string(),
        ));
    }
    if let Some(stray) = edges.iter().find(|e| e.orientation != orientation) {
        return Err(TableError::InvalidOrientation(format!(
            "{:?} edge in a {orientation:?} group",
            stray.orientation
        )));
    }

    Ok(join_colinear(edges, tolerance))
}

/// Join runs of one already-partitioned orientation.
fn join_colinear(mut edges: Vec<Edge>, tolerance: f64) -> Vec<Edge> {
    edges.sort_by(edge_order);

    let mut result: Vec<Edge> = Vec::new();
    for edge in edges {
        let (start, end) = edge.span();
        if let Some(last) = result.last_mut() {
            let (last_start, last_end) = last.span();
            if last.position() == edge.position() && start <= last_end + tolerance {
                if end > last_end {
                    *last = last.with_span(last_start, end);
                }
                continue;
            }
        }
        result.push(edge);
    }
    result
}

/// Snap, then join each colinear group.
///
/// Output holds the joined horizontal edges followed by the joined vertical
/// edges, each sorted by position then span start. Diagonal edges are
/// dropped: no table boundary can use them.
pub fn merge_edges(
    edges: Vec<Edge>,
    snap_x_tolerance: f64,
    snap_y_tolerance: f64,
    join_x_tolerance: f64,
    join_y_tolerance: f64,
) -> Vec<Edge> {
    let edges = if snap_x_tolerance > 0.0 || snap_y_tolerance > 0.0 {
        snap_edges(edges, snap_x_tolerance, snap_y_tolerance)
    } else {
        edges
    };

    let (horizontals, rest): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal);
    let verticals: Vec<Edge> = rest
        .into_iter()
        .filter(|e| e.orientation == Orientation::Vertical)
        .collect();

    let mut result = join_colinear(horizontals, join_x_tolerance);
    result.extend(join_colinear(verticals, join_y_tolerance));
    result
}

/// Keep edges at least `min_length` long.
pub fn filter_edges(edges: Vec<Edge>, min_length: f64) -> Vec<Edge> {
    edges.into_iter().filter(|e| e.length() >= min_length).collect()
}
