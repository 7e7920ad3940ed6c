//! Character-to-word grouping.
//!
//! Pages that only carry glyphs still need words: the `text` strategy aligns
//! on them and the binder joins them into cell text.

use crate::geometry::BBox;
use crate::page::{Char, Word};

/// Latin presentation-form ligatures and their spelled-out text.
const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "\u{017F}t"),
    ('\u{FB06}', "st"),
];

/// How glyphs are grouped into words. Defaults follow pdfplumber.
#[derive(Debug, Clone, PartialEq)]
pub struct WordOptions {
    /// Largest horizontal gap between neighbouring glyphs of one word.
    pub x_tolerance: f64,
    /// Largest difference in `top` between neighbouring glyphs of one word.
    pub y_tolerance: f64,
    /// Treat whitespace glyphs as part of words rather than separators.
    pub keep_blank_chars: bool,
    /// Spell out ligature glyphs (`ﬁ` becomes `fi`).
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            expand_ligatures: true,
        }
    }
}

/// Groups characters into words based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Group `chars` into words in reading order.
    ///
    /// Glyphs are visited top-to-bottom, then left-to-right. A word ends at
    /// a whitespace glyph (unless `keep_blank_chars`), at a horizontal gap
    /// wider than `x_tolerance`, or when `top` jumps by more than
    /// `y_tolerance`.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let mut order: Vec<&Char> = chars.iter().collect();
        order.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut words = Vec::new();
        let mut run: Vec<&Char> = Vec::new();
        for ch in order {
            let blank = ch.text.chars().all(char::is_whitespace);
            let breaks = match run.last() {
                Some(prev) => (blank && !options.keep_blank_chars) || Self::apart(prev, ch, options),
                None => false,
            };
            if breaks {
                words.push(Self::finish(&run, options));
                run.clear();
            }
            if blank && !options.keep_blank_chars {
                continue;
            }
            run.push(ch);
        }
        if !run.is_empty() {
            words.push(Self::finish(&run, options));
        }
        words
    }

    /// Overlapping glyphs (fake bold, kerning) count as a zero gap.
    fn apart(prev: &Char, next: &Char, options: &WordOptions) -> bool {
        let gap = (next.bbox.x0.max(prev.bbox.x0) - next.bbox.x1.min(prev.bbox.x1)).max(0.0);
        gap > options.x_tolerance || (next.bbox.top - prev.bbox.top).abs() > options.y_tolerance
    }

    fn finish(run: &[&Char], options: &WordOptions) -> Word {
        let mut text = String::new();
        for ch in run {
            if options.expand_ligatures {
                push_expanded(&mut text, &ch.text);
            } else {
                text.push_str(&ch.text);
            }
        }
        let bbox = run
            .iter()
            .skip(1)
            .fold(run[0].bbox, |acc: BBox, c| acc.union(&c.bbox));
        Word { text, bbox }
    }
}

fn push_expanded(out: &mut String, glyph: &str) {
    for c in glyph.chars() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, spelled)) => out.push_str(spelled),
            None => out.push(c),
        }
    }
}
