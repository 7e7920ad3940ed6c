//! Table detection types and pipeline.
//!
//! [`TableFinder`] runs the whole pipeline for one page: edges per axis,
//! merge, intersections, cells, tables, text. Every [`Table`] it produces is
//! immutable; [`Table::extract`] only reads it.

use std::cmp::Reverse;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binder::ContentBinder;
use crate::cells::{cells_to_tables, intersections_to_cells};
use crate::edges::{Edge, axis_edges};
use crate::error::TableError;
use crate::geometry::{BBox, Orientation};
use crate::grid::{Grid, Intersection, IntersectionIndex};
use crate::merge::{filter_edges, merge_edges};
use crate::page::Page;
use crate::settings::TableSettings;

/// A detected table cell.
///
/// A cell covers one or more grid units. `row_span` and `col_span` index
/// into the owning table's [`Grid`]; a span cell covers more than one unit
/// because an interior edge is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Bounding box of the cell.
    pub bbox: BBox,
    /// Grid rows covered, top to bottom.
    pub row_span: Range<usize>,
    /// Grid columns covered, left to right.
    pub col_span: Range<usize>,
    /// Text bound to the cell; empty when nothing falls inside.
    pub text: String,
}

impl Cell {
    /// True when the cell covers more than one grid unit.
    pub fn is_span(&self) -> bool {
        self.row_span.len() > 1 || self.col_span.len() > 1
    }

    /// True when grid position `(row, column)` lies inside the cell.
    pub fn covers(&self, row: usize, column: usize) -> bool {
        self.row_span.contains(&row) && self.col_span.contains(&column)
    }

    /// The cell's top-left grid position.
    pub fn anchor(&self) -> (usize, usize) {
        (self.row_span.start, self.col_span.start)
    }
}

/// One row or column of a table.
///
/// `cells` has one entry per grid position: the box of the cell anchored
/// there, or `None` where the position is absorbed into a span or not
/// covered at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGroup {
    pub bbox: BBox,
    pub cells: Vec<Option<BBox>>,
}

pub type Row = CellGroup;
pub type Column = CellGroup;

/// A detected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// Column and row boundaries.
    pub grid: Grid,
    /// All cells, in reading order (top-to-bottom, left-to-right).
    pub cells: Vec<Cell>,
    /// Whether [`Table::extract`] repeats span text at absorbed positions.
    pub merged_cell_fullfill: bool,
}

impl Table {
    /// Build a table from a group of cell boxes, binding text as it goes.
    fn from_boxes(mut boxes: Vec<BBox>, binder: &ContentBinder<'_>, fullfill: bool) -> Self {
        boxes.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));
        let grid = Grid::from_cells(&boxes);
        let bbox = boxes
            .iter()
            .fold(boxes[0], |acc: BBox, b| acc.union(b));
        let cells = boxes
            .iter()
            .filter_map(|b| {
                Some(Cell {
                    bbox: *b,
                    row_span: grid.row_index(b.top)?..grid.row_index(b.bottom)?,
                    col_span: grid.column_index(b.x0)?..grid.column_index(b.x1)?,
                    text: binder.text_in(b),
                })
            })
            .collect();
        Self {
            bbox,
            grid,
            cells,
            merged_cell_fullfill: fullfill,
        }
    }

    /// Number of grid rows.
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    /// Number of grid columns.
    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    /// The cell covering grid position `(row, column)`, if any.
    ///
    /// Anchored cells win over spans that also cover the position.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|c| c.anchor() == (row, column))
            .or_else(|| self.cells.iter().find(|c| c.covers(row, column)))
    }

    fn anchored_box(&self, row: usize, column: usize) -> Option<BBox> {
        self.cells
            .iter()
            .find(|c| c.anchor() == (row, column))
            .map(|c| c.bbox)
    }

    /// Rows top to bottom, one entry per grid column in each.
    pub fn rows(&self) -> Vec<Row> {
        let (x0, x1) = match (self.grid.columns.first(), self.grid.columns.last()) {
            (Some(&x0), Some(&x1)) => (x0, x1),
            _ => return Vec::new(),
        };
        self.grid
            .rows
            .windows(2)
            .enumerate()
            .map(|(r, band)| CellGroup {
                bbox: BBox::new(x0, band[0], x1, band[1]),
                cells: (0..self.column_count())
                    .map(|c| self.anchored_box(r, c))
                    .collect(),
            })
            .collect()
    }

    /// Columns left to right, one entry per grid row in each.
    pub fn columns(&self) -> Vec<Column> {
        let (top, bottom) = match (self.grid.rows.first(), self.grid.rows.last()) {
            (Some(&top), Some(&bottom)) => (top, bottom),
            _ => return Vec::new(),
        };
        self.grid
            .columns
            .windows(2)
            .enumerate()
            .map(|(c, band)| CellGroup {
                bbox: BBox::new(band[0], top, band[1], bottom),
                cells: (0..self.row_count())
                    .map(|r| self.anchored_box(r, c))
                    .collect(),
            })
            .collect()
    }

    /// Cell text as a row-major matrix.
    ///
    /// A cell's anchor position holds its text (`""` when empty). Positions
    /// absorbed into a span hold `None`, or the span's text when
    /// `merged_cell_fullfill` is set. Positions no cell covers are `None`.
    pub fn extract(&self) -> Vec<Vec<Option<String>>> {
        let mut out = vec![vec![None; self.column_count()]; self.row_count()];
        if self.merged_cell_fullfill {
            for cell in self.cells.iter().filter(|c| c.is_span()) {
                for r in cell.row_span.clone() {
                    for c in cell.col_span.clone() {
                        out[r][c] = Some(cell.text.clone());
                    }
                }
            }
        }
        for cell in &self.cells {
            let (r, c) = cell.anchor();
            out[r][c] = Some(cell.text.clone());
        }
        out
    }
}

/// Orchestrator for the table detection pipeline on one page.
///
/// Settings are validated before any geometric work; the pipeline then runs
/// once and its intermediate results stay available for inspection.
#[derive(Debug, Clone)]
pub struct TableFinder {
    settings: TableSettings,
    edges: Vec<Edge>,
    intersections: Vec<Intersection>,
    cells: Vec<BBox>,
    tables: Vec<Table>,
}

impl TableFinder {
    /// Validate `settings` and detect the tables on `page`.
    ///
    /// Pipeline: edges per axis → snap → join → length filter →
    /// intersections → cells → tables → text.
    pub fn new(page: &Page, settings: TableSettings) -> Result<Self, TableError> {
        settings.validate()?;

        let word_options = settings.word_options();
        let words = page.words_with(&word_options);

        let vertical = axis_edges(page, &words, Orientation::Vertical, &settings);
        let horizontal = axis_edges(page, &words, Orientation::Horizontal, &settings);
        debug!(
            vertical = vertical.len(),
            horizontal = horizontal.len(),
            vertical_strategy = %settings.vertical_strategy,
            horizontal_strategy = %settings.horizontal_strategy,
            "extracted raw edges"
        );

        let mut edges = vertical;
        edges.extend(horizontal);
        let edges = merge_edges(
            edges,
            settings.snap_x_tolerance,
            settings.snap_y_tolerance,
            settings.join_x_tolerance,
            settings.join_y_tolerance,
        );
        let edges = filter_edges(edges, settings.edge_min_length);
        debug!(edges = edges.len(), "merged edges");

        let index = IntersectionIndex::build(
            &edges,
            settings.intersection_x_tolerance,
            settings.intersection_y_tolerance,
        );
        let cells = intersections_to_cells(&index);
        debug!(
            intersections = index.len(),
            cells = cells.len(),
            "assembled cells"
        );

        let binder = ContentBinder::new(page, &words, word_options);
        let tables: Vec<Table> = cells_to_tables(&cells)
            .into_iter()
            .map(|group| Table::from_boxes(group, &binder, settings.merged_cell_fullfill))
            .collect();
        debug!(tables = tables.len(), "found tables");

        Ok(Self {
            settings,
            edges,
            intersections: index.points,
            cells,
            tables,
        })
    }

    /// Build settings from a pdfplumber-style mapping, then detect.
    pub fn from_value(page: &Page, settings: &serde_json::Value) -> Result<Self, TableError> {
        Self::new(page, TableSettings::from_value(settings)?)
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Merged edges the grid was built from.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Every cell box found on the page, before grouping into tables.
    pub fn cells(&self) -> &[BBox] {
        &self.cells
    }

    /// Detected tables, top-to-bottom then left-to-right.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }

    /// Extract the largest table on the page.
    ///
    /// Largest means most cells; ties go to the table found first, i.e. the
    /// topmost, then leftmost.
    pub fn extract_table(&self) -> Option<Vec<Vec<Option<String>>>> {
        self.tables
            .iter()
            .min_by_key(|t| Reverse(t.cells.len()))
            .map(Table::extract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Line, Word};
    use crate::settings::Strategy;

    fn make_word(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Word {
        Word::new(text, BBox::new(x0, top, x1, bottom))
    }

    /// Ruled grid over the given boundaries.
    fn make_ruled_page(xs: &[f64], ys: &[f64]) -> Page {
        let (x_min, x_max) = (xs[0], xs[xs.len() - 1]);
        let (y_min, y_max) = (ys[0], ys[ys.len() - 1]);
        let mut lines: Vec<Line> = ys
            .iter()
            .map(|&y| Line::horizontal(x_min, y, x_max))
            .collect();
        lines.extend(xs.iter().map(|&x| Line::vertical(x, y_min, y_max)));
        Page::new(400.0, 400.0).with_lines(lines)
    }

    #[test]
    fn test_empty_page_finds_nothing() {
        let finder = TableFinder::new(&Page::new(612.0, 792.0), TableSettings::default()).unwrap();
        assert!(finder.tables().is_empty());
        assert!(finder.edges().is_empty());
        assert!(finder.extract_table().is_none());
    }

    #[test]
    fn test_invalid_settings_fail_before_detection() {
        let settings = TableSettings {
            vertical_strategy: Strategy::Explicit,
            ..TableSettings::default()
        };
        assert!(matches!(
            TableFinder::new(&Page::new(100.0, 100.0), settings),
            Err(TableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_simple_grid_with_text() {
        let page = make_ruled_page(&[10.0, 60.0, 110.0], &[10.0, 30.0, 50.0]).with_words(vec![
            make_word("a", 20.0, 15.0, 30.0, 25.0),
            make_word("b", 70.0, 15.0, 80.0, 25.0),
            make_word("c", 20.0, 35.0, 30.0, 45.0),
        ]);
        let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
        assert_eq!(finder.tables().len(), 1);
        let table = &finder.tables()[0];
        assert_eq!(table.bbox, BBox::new(10.0, 10.0, 110.0, 50.0));
        assert_eq!(table.grid.columns, vec![10.0, 60.0, 110.0]);
        assert_eq!(table.cells.len(), 4);
        assert_eq!(
            table.extract(),
            vec![
                vec![Some("a".to_string()), Some("b".to_string())],
                vec![Some("c".to_string()), Some(String::new())],
            ]
        );
        assert_eq!(finder.intersections().len(), 9);
        assert_eq!(finder.cells().len(), 4);
    }

    #[test]
    fn test_rows_and_columns_views() {
        let page = make_ruled_page(&[10.0, 60.0, 110.0], &[10.0, 30.0, 50.0]);
        let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
        let table = &finder.tables()[0];

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bbox, BBox::new(10.0, 10.0, 110.0, 30.0));
        assert_eq!(
            rows[1].cells,
            vec![
                Some(BBox::new(10.0, 30.0, 60.0, 50.0)),
                Some(BBox::new(60.0, 30.0, 110.0, 50.0)),
            ]
        );

        let columns = table.columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].bbox, BBox::new(60.0, 10.0, 110.0, 50.0));
        assert_eq!(columns[1].cells[0], Some(BBox::new(60.0, 10.0, 110.0, 30.0)));
    }

    #[test]
    fn test_span_cell_positions() {
        // Header spans both columns
        let mut page = make_ruled_page(&[10.0, 110.0], &[10.0, 30.0, 50.0]);
        page.lines.push(Line::vertical(60.0, 30.0, 50.0));
        let page = page.with_words(vec![make_word("head", 40.0, 15.0, 70.0, 25.0)]);
        let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
        let table = &finder.tables()[0];

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        let head = table.cell_at(0, 1).unwrap();
        assert!(head.is_span());
        assert_eq!(head.anchor(), (0, 0));
        assert_eq!(head.text, "head");
        assert_eq!(table.rows()[0].cells[1], None);
        assert_eq!(
            table.extract()[0],
            vec![Some("head".to_string()), None]
        );

        let filled = Table {
            merged_cell_fullfill: true,
            ..table.clone()
        };
        assert_eq!(
            filled.extract()[0],
            vec![Some("head".to_string()), Some("head".to_string())]
        );
    }

    #[test]
    fn test_extract_table_prefers_most_cells() {
        // Small 2x1 table above a larger 2x2 table
        let mut page = make_ruled_page(&[10.0, 60.0, 110.0], &[10.0, 30.0]);
        let big = make_ruled_page(&[10.0, 60.0, 110.0], &[100.0, 120.0, 140.0]);
        page.lines.extend(big.lines);
        let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
        assert_eq!(finder.tables().len(), 2);
        assert_eq!(finder.tables()[0].bbox.top, 10.0);
        let largest = finder.extract_table().unwrap();
        assert_eq!(largest.len(), 2);
        assert_eq!(finder.into_tables()[1].cells.len(), 4);
    }
}
