//! Assign page text to cells.

use crate::geometry::BBox;
use crate::page::{Char, Page, Word};
use crate::words::{WordExtractor, WordOptions};

/// Binds text primitives to cell boxes by centre containment.
///
/// A primitive belongs to a cell when its centre lies inside the cell box,
/// left/top inclusive and right/bottom exclusive, so text sitting exactly on
/// a shared boundary is never counted twice. Character-level input is
/// preferred; pages that only carry words are bound word by word.
pub struct ContentBinder<'a> {
    chars: &'a [Char],
    words: &'a [Word],
    options: WordOptions,
}

impl<'a> ContentBinder<'a> {
    /// Bind against `page`, using `words` when the page has no chars.
    pub fn new(page: &'a Page, words: &'a [Word], options: WordOptions) -> Self {
        Self {
            chars: &page.chars,
            words,
            options,
        }
    }

    /// Text of the cell at `bbox`.
    ///
    /// Words on one line are joined with a space, lines with `\n`, in
    /// reading order. An empty cell yields an empty string.
    pub fn text_in(&self, bbox: &BBox) -> String {
        let words: Vec<Word> = if self.chars.is_empty() {
            self.words
                .iter()
                .filter(|w| centre_in(&w.bbox, bbox))
                .cloned()
                .collect()
        } else {
            let cell_chars: Vec<Char> = self
                .chars
                .iter()
                .filter(|c| centre_in(&c.bbox, bbox))
                .cloned()
                .collect();
            WordExtractor::extract(&cell_chars, &self.options)
        };
        join_lines(&words, self.options.y_tolerance)
    }
}

fn centre_in(item: &BBox, cell: &BBox) -> bool {
    let (x, y) = item.center();
    cell.contains_point(x, y)
}

/// Group words into lines by `top` and join them into text.
///
/// A word continues the current line when its `top` is within `y_tolerance`
/// of the previous word's, so a slowly drifting baseline stays one line.
fn join_lines(words: &[Word], y_tolerance: f64) -> String {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some(line)
                if line
                    .last()
                    .is_some_and(|prev| word.bbox.top - prev.bbox.top <= y_tolerance) =>
            {
                line.push(word)
            }
            _ => lines.push(vec![word]),
        }
    }

    lines
        .iter_mut()
        .map(|line| {
            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            line.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
