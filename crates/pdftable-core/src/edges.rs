//! Edge derivation from page primitives.
//!
//! Each axis gets its edges from one [`Strategy`]: drawn lines (with or
//! without rectangle borders), word alignment, or caller-supplied
//! coordinates. Explicit coordinates are appended to whatever the strategy
//! produced, so a caller can add a missing boundary on top of detected
//! rulings.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Orientation, normalize};
use crate::page::{Line, Page, Rect, Word};
use crate::settings::{Strategy, TableSettings};

/// Largest perpendicular extent at which a line still counts as a ruling
/// under the lenient `lines` strategy. Such lines collapse onto their
/// midline.
const LINE_SKEW_TOLERANCE: f64 = 1.0;

/// Source of an edge, tracking which primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeSource {
    /// Derived directly from a Line object.
    Line,
    /// Top edge of a Rect.
    RectTop,
    /// Bottom edge of a Rect.
    RectBottom,
    /// Left edge of a Rect.
    RectLeft,
    /// Right edge of a Rect.
    RectRight,
    /// Inferred from word alignment.
    Text,
    /// Caller-supplied coordinate.
    Explicit,
}

/// An axis-aligned boundary segment.
///
/// Horizontal edges have `top == bottom`, vertical edges `x0 == x1`.
/// Coordinates are always [`normalize`]d.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    pub orientation: Orientation,
    /// Where this edge was derived from.
    pub source: EdgeSource,
}

impl Edge {
    /// Horizontal edge at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f64, y: f64, x1: f64, source: EdgeSource) -> Self {
        let y = normalize(y);
        Self {
            x0: normalize(x0.min(x1)),
            top: y,
            x1: normalize(x0.max(x1)),
            bottom: y,
            orientation: Orientation::Horizontal,
            source,
        }
    }

    /// Vertical edge at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Self {
        let x = normalize(x);
        Self {
            x0: x,
            top: normalize(top.min(bottom)),
            x1: x,
            bottom: normalize(top.max(bottom)),
            orientation: Orientation::Vertical,
            source,
        }
    }

    /// The fixed coordinate: `top` for horizontal edges, `x0` otherwise.
    pub fn position(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.top,
            _ => self.x0,
        }
    }

    /// Extent `(start, end)` along the edge's own axis.
    pub fn span(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.x0, self.x1),
            _ => (self.top, self.bottom),
        }
    }

    /// Length along the primary axis.
    pub fn length(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }

    /// Copy with a new fixed coordinate, span untouched.
    pub(crate) fn with_position(&self, position: f64) -> Self {
        let position = normalize(position);
        let mut edge = self.clone();
        match self.orientation {
            Orientation::Horizontal => {
                edge.top = position;
                edge.bottom = position;
            }
            _ => {
                edge.x0 = position;
                edge.x1 = position;
            }
        }
        edge
    }

    /// Copy with a new span, fixed coordinate untouched.
    pub(crate) fn with_span(&self, start: f64, end: f64) -> Self {
        let mut edge = self.clone();
        match self.orientation {
            Orientation::Horizontal => {
                edge.x0 = start;
                edge.x1 = end;
            }
            _ => {
                edge.top = start;
                edge.bottom = end;
            }
        }
        edge
    }
}

/// Classify a line as a ruling along `orientation`.
///
/// Strict mode only accepts exactly axis-aligned lines; lenient mode
/// tolerates [`LINE_SKEW_TOLERANCE`] of skew and collapses the line onto its
/// midline.
fn edge_from_line(line: &Line, orientation: Orientation, strict: bool) -> Option<Edge> {
    let skew = if strict { 0.0 } else { LINE_SKEW_TOLERANCE };
    let (width, height) = (normalize(line.width()), normalize(line.height()));
    match orientation {
        Orientation::Horizontal if height <= skew && width >= height => Some(Edge::horizontal(
            line.x0,
            (line.top + line.bottom) / 2.0,
            line.x1,
            EdgeSource::Line,
        )),
        Orientation::Vertical if width <= skew && height > width => Some(Edge::vertical(
            (line.x0 + line.x1) / 2.0,
            line.top,
            line.bottom,
            EdgeSource::Line,
        )),
        _ => None,
    }
}

/// Derive 4 Edges from a Rect (top, bottom, left, right).
pub fn edges_from_rect(rect: &Rect) -> Vec<Edge> {
    vec![
        Edge::horizontal(rect.x0, rect.top, rect.x1, EdgeSource::RectTop),
        Edge::horizontal(rect.x0, rect.bottom, rect.x1, EdgeSource::RectBottom),
        Edge::vertical(rect.x0, rect.top, rect.bottom, EdgeSource::RectLeft),
        Edge::vertical(rect.x1, rect.top, rect.bottom, EdgeSource::RectRight),
    ]
}

/// Rulings along `orientation` for the `lines` strategy: lines and rect
/// borders, lightly skewed lines included, shorter than `min_length` dropped.
pub fn lines_to_edges(
    lines: &[Line],
    rects: &[Rect],
    orientation: Orientation,
    min_length: f64,
) -> Vec<Edge> {
    lines
        .iter()
        .filter_map(|line| edge_from_line(line, orientation, false))
        .chain(
            rects
                .iter()
                .flat_map(edges_from_rect)
                .filter(|e| e.orientation == orientation),
        )
        .filter(|e| e.length() >= min_length)
        .collect()
}

/// Rulings along `orientation` for the `lines_strict` strategy: drawn lines
/// only, exactly axis-aligned, at least `min_length` long.
pub fn lines_strict_to_edges(
    lines: &[Line],
    orientation: Orientation,
    min_length: f64,
) -> Vec<Edge> {
    lines
        .iter()
        .filter_map(|line| edge_from_line(line, orientation, true))
        .filter(|e| e.length() >= min_length)
        .collect()
}

/// Group words whose `key` values chain within `tolerance` of each other.
///
/// Clusters come out in ascending key order; ties keep input order.
fn cluster_words<'a, F>(words: &'a [Word], key: F, tolerance: f64) -> Vec<Vec<&'a Word>>
where
    F: Fn(&Word) -> f64,
{
    let mut indices: Vec<usize> = (0..words.len()).collect();
    indices.sort_by(|&a, &b| key(&words[a]).total_cmp(&key(&words[b])).then(a.cmp(&b)));

    let mut clusters: Vec<Vec<&Word>> = Vec::new();
    let mut last_key = f64::NEG_INFINITY;
    for i in indices {
        let k = key(&words[i]);
        match clusters.last_mut() {
            Some(cluster) if k - last_key <= tolerance => cluster.push(&words[i]),
            _ => clusters.push(vec![&words[i]]),
        }
        last_key = k;
    }
    clusters
}

fn cluster_bbox(cluster: &[&Word]) -> BBox {
    cluster
        .iter()
        .map(|w| w.bbox)
        .fold(cluster[0].bbox, |acc, b| acc.union(&b))
}

/// Infer row boundaries from words sharing a `top`.
///
/// Every cluster of at least `word_threshold` words yields an edge along its
/// top and one along its bottom, all spanning the combined width of the
/// qualifying clusters. No words, no edges.
pub fn words_to_edges_h(words: &[Word], word_threshold: usize, tolerance: f64) -> Vec<Edge> {
    let rows: Vec<BBox> = cluster_words(words, |w| w.bbox.top, tolerance)
        .into_iter()
        .filter(|c| !c.is_empty() && c.len() >= word_threshold)
        .map(|c| cluster_bbox(&c))
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let min_x0 = rows.iter().map(|r| r.x0).fold(f64::INFINITY, f64::min);
    let max_x1 = rows.iter().map(|r| r.x1).fold(f64::NEG_INFINITY, f64::max);

    rows.iter()
        .flat_map(|r| {
            [
                Edge::horizontal(min_x0, r.top, max_x1, EdgeSource::Text),
                Edge::horizontal(min_x0, r.bottom, max_x1, EdgeSource::Text),
            ]
        })
        .collect()
}

/// Infer column boundaries from words sharing a left edge, right edge, or
/// centre.
///
/// Alignment clusters of at least `word_threshold` words are taken largest
/// first; a cluster whose bounding box overlaps an already-accepted one is
/// discarded. Each accepted box contributes a vertical edge at its left,
/// plus one closing edge at the rightmost right edge, all spanning the
/// combined height. No words, no edges.
pub fn words_to_edges_v(words: &[Word], word_threshold: usize, tolerance: f64) -> Vec<Edge> {
    let mut clusters = cluster_words(words, |w| w.bbox.x0, tolerance);
    clusters.extend(cluster_words(words, |w| w.bbox.x1, tolerance));
    clusters.extend(cluster_words(words, |w| w.bbox.center().0, tolerance));
    // Stable: equal-sized clusters keep left, right, centre order.
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));

    let mut columns: Vec<BBox> = Vec::new();
    for cluster in clusters
        .iter()
        .filter(|c| !c.is_empty() && c.len() >= word_threshold)
    {
        let bbox = cluster_bbox(cluster);
        if !columns.iter().any(|kept| kept.overlaps(&bbox)) {
            columns.push(bbox);
        }
    }
    if columns.is_empty() {
        return Vec::new();
    }

    columns.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    let max_x1 = columns.iter().map(|c| c.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_top = columns.iter().map(|c| c.top).fold(f64::INFINITY, f64::min);
    let max_bottom = columns
        .iter()
        .map(|c| c.bottom)
        .fold(f64::NEG_INFINITY, f64::max);

    columns
        .iter()
        .map(|c| c.x0)
        .chain(std::iter::once(max_x1))
        .map(|x| Edge::vertical(x, min_top, max_bottom, EdgeSource::Text))
        .collect()
}

/// Turn explicit coordinates into edges spanning the whole page.
pub fn explicit_lines_to_edges(coords: &[f64], orientation: Orientation, page: &BBox) -> Vec<Edge> {
    coords
        .iter()
        .filter_map(|&v| match orientation {
            Orientation::Horizontal => Some(Edge::horizontal(
                page.x0,
                v,
                page.x1,
                EdgeSource::Explicit,
            )),
            Orientation::Vertical => Some(Edge::vertical(
                v,
                page.top,
                page.bottom,
                EdgeSource::Explicit,
            )),
            Orientation::Diagonal => None,
        })
        .collect()
}

/// Raw (unmerged) edges for one axis under its configured strategy.
///
/// `words` is only read by the `text` strategy. Explicit coordinates for
/// the axis are always appended.
pub fn axis_edges(
    page: &Page,
    words: &[Word],
    orientation: Orientation,
    settings: &TableSettings,
) -> Vec<Edge> {
    let (strategy, explicit, min_words) = match orientation {
        Orientation::Horizontal => (
            settings.horizontal_strategy,
            &settings.explicit_horizontal_lines,
            settings.min_words_horizontal,
        ),
        _ => (
            settings.vertical_strategy,
            &settings.explicit_vertical_lines,
            settings.min_words_vertical,
        ),
    };

    let mut edges = match strategy {
        Strategy::Lines => lines_to_edges(
            &page.lines,
            &page.rects,
            orientation,
            settings.edge_min_length_prefilter,
        ),
        Strategy::LinesStrict => {
            lines_strict_to_edges(&page.lines, orientation, settings.edge_min_length)
        }
        Strategy::Text => match orientation {
            Orientation::Horizontal => {
                words_to_edges_h(words, min_words, settings.word_alignment_tolerance)
            }
            _ => words_to_edges_v(words, min_words, settings.word_alignment_tolerance),
        },
        Strategy::Explicit => Vec::new(),
    };
    edges.extend(explicit_lines_to_edges(explicit, orientation, &page.bbox));
    edges
}
