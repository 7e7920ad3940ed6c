//! Synthetic page fixtures shared by the integration tests.
//!
//! Coordinates are top-left origin points, like pdfplumber's.

#![allow(dead_code)]

use pdftable_core::{BBox, Line, Page, Rect, Word};

pub const WORD_HEIGHT: f64 = 8.0;

pub fn word(text: &str, x0: f64, top: f64, x1: f64) -> Word {
    Word::new(text, BBox::new(x0, top, x1, top + WORD_HEIGHT))
}

/// Long two-line text of the merged-cell fixture's second row.
pub const WRAPPED_FIRST: &str = "dfdfdddddddddffljlllllllllllllllllf";
pub const WRAPPED_SECOND: &str = "fdfffff";

/// A 7x3 ruled table with several merged regions.
///
/// Column boundaries are x = 50, 150, 250, 350 and row boundaries
/// y = 50, 80, ..., 260. Missing interior rulings merge:
///
/// - row 0, columns 1-2 ("vTest a")
/// - row 2, columns 1-2 ("33")
/// - rows 3-4, column 0 ("4") and column 2 ("9.57")
/// - rows 5-6, columns 1-2 ("happy")
pub fn merged_cells_page() -> Page {
    let lines = vec![
        // Outer box
        Line::horizontal(50.0, 50.0, 350.0),
        Line::horizontal(50.0, 260.0, 350.0),
        Line::vertical(50.0, 50.0, 260.0),
        Line::vertical(350.0, 50.0, 260.0),
        // Interior verticals
        Line::vertical(150.0, 50.0, 260.0),
        Line::vertical(250.0, 80.0, 110.0),
        Line::vertical(250.0, 140.0, 200.0),
        // Interior horizontals
        Line::horizontal(50.0, 80.0, 350.0),
        Line::horizontal(50.0, 110.0, 350.0),
        Line::horizontal(50.0, 140.0, 350.0),
        Line::horizontal(150.0, 170.0, 250.0),
        Line::horizontal(50.0, 200.0, 350.0),
        Line::horizontal(50.0, 230.0, 150.0),
    ];
    let words = vec![
        word("a", 95.0, 60.0, 102.0),
        word("vTest", 200.0, 60.0, 230.0),
        word("a", 235.0, 60.0, 241.0),
        word(WRAPPED_FIRST, 55.0, 83.0, 145.0),
        word(WRAPPED_SECOND, 55.0, 96.0, 95.0),
        word("6", 195.0, 90.0, 201.0),
        word("b", 295.0, 90.0, 301.0),
        word("33", 240.0, 120.0, 252.0),
        word("4", 95.0, 165.0, 101.0),
        word("8", 195.0, 150.0, 201.0),
        word("6", 195.0, 180.0, 201.0),
        word("9.57", 290.0, 165.0, 310.0),
        word("6", 95.0, 210.0, 101.0),
        word("90", 95.0, 240.0, 107.0),
        word("happy", 235.0, 225.0, 265.0),
    ];
    Page::new(400.0, 300.0).with_lines(lines).with_words(words)
}

/// A ruled box whose interior rulings are drawn as several strokes, each
/// within 3pt of the next.
///
/// Horizontals at y = 50, 52, 54 and verticals at x = 40, 42.5, 45 should
/// each collapse to a single boundary, leaving a 2x2 grid.
pub fn chained_rulings_page() -> Page {
    let mut lines = vec![
        Line::horizontal(0.0, 0.0, 100.0),
        Line::horizontal(0.0, 100.0, 100.0),
        Line::vertical(0.0, 0.0, 100.0),
        Line::vertical(100.0, 0.0, 100.0),
    ];
    lines.extend([50.0, 52.0, 54.0].map(|y| Line::horizontal(0.0, y, 100.0)));
    lines.extend([40.0, 42.5, 45.0].map(|x| Line::vertical(x, 0.0, 100.0)));
    Page::new(200.0, 200.0).with_lines(lines)
}

/// Column boundaries of the ruled invoice.
pub const INVOICE_COLUMNS: [f64; 10] = [
    20.0, 60.0, 160.0, 260.0, 420.0, 470.0, 530.0, 600.0, 660.0, 700.0,
];
/// Row boundaries of the ruled invoice.
pub const INVOICE_ROWS: [f64; 4] = [100.0, 120.0, 140.0, 160.0];

/// Expected last row of the invoice under `lines_strict`.
pub const INVOICE_LAST_ROW: [&str; 9] = [
    "",
    "0085648100300",
    "CENTRAL KMA",
    "LILYS 55% DARK CHOC BAR",
    "415",
    "$ 0.61",
    "$ 253.15",
    "0.0000",
    "",
];

/// A fully ruled three-row invoice with decoy graphics.
///
/// The rulings are exact, axis-aligned lines. The decoys are a highlight
/// rectangle inside the last row and a slightly skewed underline through
/// the middle row: both produce extra boundaries under the lenient `lines`
/// strategy, and neither counts under `lines_strict`.
pub fn strict_invoice_page() -> Page {
    let (left, right) = (INVOICE_COLUMNS[0], INVOICE_COLUMNS[9]);
    let (top, bottom) = (INVOICE_ROWS[0], INVOICE_ROWS[3]);
    let mut lines: Vec<Line> = INVOICE_ROWS
        .iter()
        .map(|&y| Line::horizontal(left, y, right))
        .collect();
    lines.extend(INVOICE_COLUMNS.iter().map(|&x| Line::vertical(x, top, bottom)));
    // Skewed underline
    lines.push(Line::from_points((left, 130.0), (right, 130.5)));

    let rects = vec![Rect::new(300.0, 142.0, 380.0, 158.0)];

    let words = vec![
        // Header
        word("#", 30.0, 105.0, 36.0),
        word("UPC", 70.0, 105.0, 90.0),
        word("STORE", 170.0, 105.0, 200.0),
        word("DESCRIPTION", 270.0, 105.0, 330.0),
        word("QTY", 430.0, 105.0, 450.0),
        word("PRICE", 480.0, 105.0, 505.0),
        word("TOTAL", 540.0, 105.0, 570.0),
        word("DISC", 610.0, 105.0, 630.0),
        // First data row
        word("1", 30.0, 122.0, 36.0),
        word("0085648100305", 70.0, 122.0, 140.0),
        word("NORTH", 165.0, 122.0, 195.0),
        word("COCOA", 265.0, 122.0, 300.0),
        word("12", 430.0, 122.0, 442.0),
        word("$", 475.0, 122.0, 480.0),
        word("1.10", 485.0, 122.0, 505.0),
        word("$", 535.0, 122.0, 540.0),
        word("13.20", 545.0, 122.0, 575.0),
        word("0.0000", 605.0, 122.0, 640.0),
        // Last row
        word("0085648100300", 70.0, 143.0, 140.0),
        word("CENTRAL", 165.0, 143.0, 205.0),
        word("KMA", 210.0, 143.0, 235.0),
        word("LILYS", 265.0, 143.0, 295.0),
        word("55%", 300.0, 143.0, 320.0),
        word("DARK", 325.0, 143.0, 350.0),
        word("CHOC", 355.0, 143.0, 380.0),
        word("BAR", 385.0, 143.0, 405.0),
        word("415", 430.0, 143.0, 450.0),
        word("$", 475.0, 143.0, 480.0),
        word("0.61", 485.0, 143.0, 505.0),
        word("$", 535.0, 143.0, 540.0),
        word("253.15", 545.0, 143.0, 580.0),
        word("0.0000", 605.0, 143.0, 640.0),
    ];

    Page::new(720.0, 300.0)
        .with_lines(lines)
        .with_rects(rects)
        .with_words(words)
}

/// Three left-aligned columns of four rows, with no rulings at all.
pub fn borderless_page() -> Page {
    let mut words = Vec::new();
    for (r, top) in [100.0, 120.0, 140.0, 160.0].into_iter().enumerate() {
        for (c, x0) in [50.0, 150.0, 250.0].into_iter().enumerate() {
            words.push(Word::new(
                format!("r{r}c{c}"),
                BBox::new(x0, top, x0 + 40.0, top + 10.0),
            ));
        }
    }
    Page::new(400.0, 300.0).with_words(words)
}

/// Plain text scattered over a page with no rulings.
pub fn text_only_page() -> Page {
    Page::new(400.0, 300.0).with_words(vec![
        word("alpha", 110.0, 110.0, 140.0),
        word("beta", 210.0, 110.0, 240.0),
        word("gamma", 110.0, 210.0, 150.0),
        word("delta", 210.0, 210.0, 240.0),
    ])
}

pub fn strings(row: &[&str]) -> Vec<Option<String>> {
    row.iter().map(|s| Some(s.to_string())).collect()
}
