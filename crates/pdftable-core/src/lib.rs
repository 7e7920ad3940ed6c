//! pdftable-core: table structure recovery from parsed PDF page primitives.
//!
//! The input is one [`Page`] of already-decoded primitives (line segments,
//! rectangles, characters and/or words, all in top-left-origin points). The
//! output is a list of [`Table`]s: a grid of row and column boundaries, the
//! cells laid over it (including cells spanning several grid units), and
//! the text bound to each cell.
//!
//! Detection runs in stages, each usable on its own:
//!
//! 1. **edges**: per-axis edges from lines and rects, word alignment, or
//!    explicit coordinates ([`Strategy`]).
//! 2. **merge**: snap nearby parallel edges, join colinear segments
//!    ([`join_edge_group`]).
//! 3. **grid**: edge intersections and table grids.
//! 4. **cells**: closed rectangles (span cells where an interior edge is
//!    missing), grouped into tables.
//! 5. **binder**: text assigned to cells by centre containment.
//!
//! [`TableFinder`] runs them all for one page:
//!
//! ```
//! use pdftable_core::{Line, Page, TableFinder, TableSettings};
//!
//! let mut lines = Vec::new();
//! for y in [0.0, 20.0, 40.0] {
//!     lines.push(Line::horizontal(0.0, y, 100.0));
//! }
//! for x in [0.0, 50.0, 100.0] {
//!     lines.push(Line::vertical(x, 0.0, 40.0));
//! }
//! let page = Page::new(612.0, 792.0).with_lines(lines);
//!
//! let finder = TableFinder::new(&page, TableSettings::default())?;
//! assert_eq!(finder.tables().len(), 1);
//! assert_eq!(finder.tables()[0].extract().len(), 2);
//! # Ok::<(), pdftable_core::TableError>(())
//! ```

pub mod binder;
pub mod cells;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod merge;
pub mod page;
pub mod settings;
pub mod table;
pub mod words;

pub use binder::ContentBinder;
pub use cells::{cells_to_tables, edges_to_cells};
pub use edges::{
    Edge, EdgeSource, axis_edges, edges_from_rect, explicit_lines_to_edges, lines_strict_to_edges,
    lines_to_edges, words_to_edges_h, words_to_edges_v,
};
pub use error::TableError;
pub use geometry::{BBox, Orientation, normalize};
pub use grid::{Grid, Intersection, edges_to_intersections};
pub use merge::{filter_edges, join_edge_group, merge_edges, snap_edges};
pub use page::{Char, Line, Page, Rect, Word};
pub use settings::{Strategy, TableSettings};
pub use table::{Cell, CellGroup, Column, Row, Table, TableFinder};
pub use words::{WordExtractor, WordOptions};
