//! Read-only snapshot of one page's parsed primitives.
//!
//! The table pipeline never decodes PDF content itself. Whatever produced the
//! page (a content-stream interpreter, a test fixture, a JSON dump) hands over
//! lines, rects, chars and optionally pre-grouped words in top-left origin
//! coordinates, and the pipeline only reads them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;
use crate::words::{WordExtractor, WordOptions};

/// A stroked line segment.
///
/// Coordinates use pdfplumber's top-left origin system. A horizontal ruling
/// has `top == bottom`, a vertical one `x0 == x1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
}

impl Line {
    /// Build a line from two endpoints in any order.
    pub fn from_points(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            top: a.1.min(b.1),
            x1: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    /// Horizontal ruling at `y` from `x0` to `x1`.
    pub fn horizontal(x0: f64, y: f64, x1: f64) -> Self {
        Self::from_points((x0, y), (x1, y))
    }

    /// Vertical ruling at `x` from `top` to `bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        Self::from_points((x, top), (x, bottom))
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// A rectangle painted on the page (stroked, filled, or both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
}

impl Rect {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }
}

/// A single positioned glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
}

impl Char {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A positioned run of text treated as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Immutable primitives of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page bounds; explicit boundaries span this box.
    pub bbox: BBox,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub rects: Vec<Rect>,
    #[serde(default)]
    pub chars: Vec<Char>,
    /// Pre-grouped words. When absent, words are grouped from `chars`.
    #[serde(default)]
    pub words: Option<Vec<Word>>,
}

impl Page {
    /// Empty page of the given size, origin at the top-left corner.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bbox: BBox::new(0.0, 0.0, width, height),
            lines: Vec::new(),
            rects: Vec::new(),
            chars: Vec::new(),
            words: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_rects(mut self, rects: Vec<Rect>) -> Self {
        self.rects = rects;
        self
    }

    pub fn with_chars(mut self, chars: Vec<Char>) -> Self {
        self.chars = chars;
        self
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = Some(words);
        self
    }

    /// Words on this page.
    ///
    /// Returns the supplied words unchanged, or groups `chars` into words
    /// with the given options when none were supplied.
    pub fn words_with(&self, options: &WordOptions) -> Cow<'_, [Word]> {
        match &self.words {
            Some(words) => Cow::Borrowed(words.as_slice()),
            None => Cow::Owned(WordExtractor::extract(&self.chars, options)),
        }
    }
}
