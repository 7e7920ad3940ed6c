//! Table detection settings and their validation.
//!
//! [`TableSettings`] is the resolved, strongly typed configuration. Callers
//! holding a loose key/value mapping (the pdfplumber `table_settings` dict)
//! go through [`TableSettings::from_value`], which applies defaults, lets
//! general tolerances fill in their per-axis variants, ignores unknown keys,
//! and validates the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TableError;
use crate::words::WordOptions;

/// Method used to derive the edges of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Drawn lines plus rectangle borders.
    #[default]
    Lines,
    /// Drawn lines only, exactly axis-aligned and long enough.
    LinesStrict,
    /// Boundaries inferred from word alignment.
    Text,
    /// Caller-supplied coordinates only.
    Explicit,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Lines => "lines",
            Strategy::LinesStrict => "lines_strict",
            Strategy::Text => "text",
            Strategy::Explicit => "explicit",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lines" => Ok(Strategy::Lines),
            "lines_strict" => Ok(Strategy::LinesStrict),
            "text" => Ok(Strategy::Text),
            "explicit" => Ok(Strategy::Explicit),
            other => Err(TableError::InvalidConfiguration(format!(
                "unknown strategy '{other}' (expected one of: lines, lines_strict, text, explicit)"
            ))),
        }
    }
}

/// Configuration for table detection.
///
/// Defaults match Python pdfplumber's `DEFAULT_TABLE_SETTINGS`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Strategy for vertical edges (column boundaries).
    pub vertical_strategy: Strategy,
    /// Strategy for horizontal edges (row boundaries).
    pub horizontal_strategy: Strategy,
    /// X-coordinates turned into page-spanning vertical edges.
    pub explicit_vertical_lines: Vec<f64>,
    /// Y-coordinates turned into page-spanning horizontal edges.
    pub explicit_horizontal_lines: Vec<f64>,
    /// Vertical edges closer than this along x are snapped together.
    pub snap_x_tolerance: f64,
    /// Horizontal edges closer than this along y are snapped together.
    pub snap_y_tolerance: f64,
    /// Maximum gap between colinear horizontal segments that still joins them.
    pub join_x_tolerance: f64,
    /// Maximum gap between colinear vertical segments that still joins them.
    pub join_y_tolerance: f64,
    /// Merged edges shorter than this are discarded.
    pub edge_min_length: f64,
    /// Raw `lines` edges shorter than this are discarded before merging.
    pub edge_min_length_prefilter: f64,
    /// Minimum words sharing an alignment to infer a vertical edge (`text`).
    pub min_words_vertical: usize,
    /// Minimum words sharing a row to infer horizontal edges (`text`).
    pub min_words_horizontal: usize,
    pub intersection_x_tolerance: f64,
    pub intersection_y_tolerance: f64,
    /// Word grouping tolerance along x.
    pub text_x_tolerance: f64,
    /// Word grouping and line clustering tolerance along y.
    pub text_y_tolerance: f64,
    pub text_keep_blank_chars: bool,
    /// Distance within which word edges count as aligned (`text` strategy).
    pub word_alignment_tolerance: f64,
    /// Report a span cell's text at every grid position it covers.
    pub merged_cell_fullfill: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            snap_x_tolerance: 3.0,
            snap_y_tolerance: 3.0,
            join_x_tolerance: 3.0,
            join_y_tolerance: 3.0,
            edge_min_length: 3.0,
            edge_min_length_prefilter: 1.0,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_x_tolerance: 3.0,
            intersection_y_tolerance: 3.0,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
            text_keep_blank_chars: false,
            word_alignment_tolerance: 1.0,
            merged_cell_fullfill: false,
        }
    }
}

/// Loose mapping form. Every key is optional and unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawTableSettings {
    strategy: Option<String>,
    vertical_strategy: Option<String>,
    horizontal_strategy: Option<String>,
    explicit_vertical_lines: Option<Vec<f64>>,
    explicit_horizontal_lines: Option<Vec<f64>>,
    snap_tolerance: Option<f64>,
    snap_x_tolerance: Option<f64>,
    snap_y_tolerance: Option<f64>,
    join_tolerance: Option<f64>,
    join_x_tolerance: Option<f64>,
    join_y_tolerance: Option<f64>,
    edge_min_length: Option<f64>,
    edge_min_length_prefilter: Option<f64>,
    min_words_vertical: Option<usize>,
    min_words_horizontal: Option<usize>,
    intersection_tolerance: Option<f64>,
    intersection_x_tolerance: Option<f64>,
    intersection_y_tolerance: Option<f64>,
    text_tolerance: Option<f64>,
    text_x_tolerance: Option<f64>,
    text_y_tolerance: Option<f64>,
    text_keep_blank_chars: Option<bool>,
    word_alignment_tolerance: Option<f64>,
    merged_cell_fullfill: Option<bool>,
}

/// Per-axis value, else the general value, else the default.
fn axis_value(specific: Option<f64>, general: Option<f64>, default: f64) -> f64 {
    specific.or(general).unwrap_or(default)
}

impl TableSettings {
    /// Build settings from a pdfplumber-style mapping.
    ///
    /// `null` yields the defaults. The result is validated; any
    /// recognized key with a wrong type or value is an
    /// [`TableError::InvalidConfiguration`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, TableError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let raw = RawTableSettings::deserialize(value)
            .map_err(|e| TableError::InvalidConfiguration(e.to_string()))?;
        let defaults = Self::default();

        let shared = raw.strategy.as_deref().map(Strategy::from_str).transpose()?;
        let vertical_strategy = match raw.vertical_strategy.as_deref() {
            Some(s) => s.parse()?,
            None => shared.unwrap_or(defaults.vertical_strategy),
        };
        let horizontal_strategy = match raw.horizontal_strategy.as_deref() {
            Some(s) => s.parse()?,
            None => shared.unwrap_or(defaults.horizontal_strategy),
        };

        let settings = Self {
            vertical_strategy,
            horizontal_strategy,
            explicit_vertical_lines: raw.explicit_vertical_lines.unwrap_or_default(),
            explicit_horizontal_lines: raw.explicit_horizontal_lines.unwrap_or_default(),
            snap_x_tolerance: axis_value(
                raw.snap_x_tolerance,
                raw.snap_tolerance,
                defaults.snap_x_tolerance,
            ),
            snap_y_tolerance: axis_value(
                raw.snap_y_tolerance,
                raw.snap_tolerance,
                defaults.snap_y_tolerance,
            ),
            join_x_tolerance: axis_value(
                raw.join_x_tolerance,
                raw.join_tolerance,
                defaults.join_x_tolerance,
            ),
            join_y_tolerance: axis_value(
                raw.join_y_tolerance,
                raw.join_tolerance,
                defaults.join_y_tolerance,
            ),
            edge_min_length: raw.edge_min_length.unwrap_or(defaults.edge_min_length),
            edge_min_length_prefilter: raw
                .edge_min_length_prefilter
                .unwrap_or(defaults.edge_min_length_prefilter),
            min_words_vertical: raw.min_words_vertical.unwrap_or(defaults.min_words_vertical),
            min_words_horizontal: raw
                .min_words_horizontal
                .unwrap_or(defaults.min_words_horizontal),
            intersection_x_tolerance: axis_value(
                raw.intersection_x_tolerance,
                raw.intersection_tolerance,
                defaults.intersection_x_tolerance,
            ),
            intersection_y_tolerance: axis_value(
                raw.intersection_y_tolerance,
                raw.intersection_tolerance,
                defaults.intersection_y_tolerance,
            ),
            text_x_tolerance: axis_value(
                raw.text_x_tolerance,
                raw.text_tolerance,
                defaults.text_x_tolerance,
            ),
            text_y_tolerance: axis_value(
                raw.text_y_tolerance,
                raw.text_tolerance,
                defaults.text_y_tolerance,
            ),
            text_keep_blank_chars: raw
                .text_keep_blank_chars
                .unwrap_or(defaults.text_keep_blank_chars),
            word_alignment_tolerance: raw
                .word_alignment_tolerance
                .unwrap_or(defaults.word_alignment_tolerance),
            merged_cell_fullfill: raw
                .merged_cell_fullfill
                .unwrap_or(defaults.merged_cell_fullfill),
        };
        trace!(?settings, "resolved table settings");
        settings.validate()?;
        Ok(settings)
    }

    /// Check every constraint on the settings.
    ///
    /// - an `explicit` axis needs at least two coordinates on that axis;
    /// - tolerances and lengths must be finite and non-negative;
    /// - explicit coordinates must be finite.
    pub fn validate(&self) -> Result<(), TableError> {
        let explicit_axes = [
            (
                "vertical",
                self.vertical_strategy,
                &self.explicit_vertical_lines,
            ),
            (
                "horizontal",
                self.horizontal_strategy,
                &self.explicit_horizontal_lines,
            ),
        ];
        for (axis, strategy, lines) in explicit_axes {
            if strategy == Strategy::Explicit && lines.len() < 2 {
                return Err(TableError::InvalidConfiguration(format!(
                    "{axis}_strategy is 'explicit' but explicit_{axis}_lines has {} \
                     coordinate(s); at least two are required",
                    lines.len()
                )));
            }
            if let Some(bad) = lines.iter().find(|v| !v.is_finite()) {
                return Err(TableError::InvalidConfiguration(format!(
                    "explicit_{axis}_lines contains a non-finite coordinate: {bad}"
                )));
            }
        }

        let tolerances = [
            ("snap_x_tolerance", self.snap_x_tolerance),
            ("snap_y_tolerance", self.snap_y_tolerance),
            ("join_x_tolerance", self.join_x_tolerance),
            ("join_y_tolerance", self.join_y_tolerance),
            ("edge_min_length", self.edge_min_length),
            ("edge_min_length_prefilter", self.edge_min_length_prefilter),
            ("intersection_x_tolerance", self.intersection_x_tolerance),
            ("intersection_y_tolerance", self.intersection_y_tolerance),
            ("text_x_tolerance", self.text_x_tolerance),
            ("text_y_tolerance", self.text_y_tolerance),
            ("word_alignment_tolerance", self.word_alignment_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(TableError::InvalidConfiguration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// True when either axis needs words from the page.
    pub fn uses_text(&self) -> bool {
        self.vertical_strategy == Strategy::Text || self.horizontal_strategy == Strategy::Text
    }

    /// Word grouping options derived from the `text_*` settings.
    pub fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.text_x_tolerance,
            y_tolerance: self.text_y_tolerance,
            keep_blank_chars: self.text_keep_blank_chars,
            ..WordOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_err(value: serde_json::Value) -> String {
        match TableSettings::from_value(&value) {
            Err(TableError::InvalidConfiguration(msg)) => msg,
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_strategy_default_is_lines() {
        assert_eq!(Strategy::default(), Strategy::Lines);
    }

    #[test]
    fn test_strategy_parse_and_display() {
        for s in [
            Strategy::Lines,
            Strategy::LinesStrict,
            Strategy::Text,
            Strategy::Explicit,
        ] {
            assert_eq!(s.as_str().parse::<Strategy>().unwrap(), s);
            assert_eq!(s.to_string(), s.as_str());
        }
        assert!("lattice".parse::<Strategy>().is_err());
        assert!("Lines".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_table_settings_default_values() {
        let settings = TableSettings::default();
        assert_eq!(settings.vertical_strategy, Strategy::Lines);
        assert_eq!(settings.horizontal_strategy, Strategy::Lines);
        assert_eq!(settings.snap_x_tolerance, 3.0);
        assert_eq!(settings.join_y_tolerance, 3.0);
        assert_eq!(settings.edge_min_length, 3.0);
        assert_eq!(settings.edge_min_length_prefilter, 1.0);
        assert_eq!(settings.min_words_vertical, 3);
        assert_eq!(settings.min_words_horizontal, 1);
        assert_eq!(settings.intersection_x_tolerance, 3.0);
        assert_eq!(settings.word_alignment_tolerance, 1.0);
        assert!(!settings.merged_cell_fullfill);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_value_null_is_default() {
        let settings = TableSettings::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(settings, TableSettings::default());
    }

    #[test]
    fn test_from_value_general_tolerance_fills_axes() {
        let settings = TableSettings::from_value(&json!({
            "snap_tolerance": 5,
            "snap_y_tolerance": 1.5,
            "join_tolerance": 0,
            "intersection_tolerance": 2,
            "text_tolerance": 4,
        }))
        .unwrap();
        assert_eq!(settings.snap_x_tolerance, 5.0);
        assert_eq!(settings.snap_y_tolerance, 1.5);
        assert_eq!(settings.join_x_tolerance, 0.0);
        assert_eq!(settings.join_y_tolerance, 0.0);
        assert_eq!(settings.intersection_x_tolerance, 2.0);
        assert_eq!(settings.intersection_y_tolerance, 2.0);
        assert_eq!(settings.text_x_tolerance, 4.0);
        assert_eq!(settings.text_y_tolerance, 4.0);
    }

    #[test]
    fn test_from_value_shorthand_strategy() {
        let settings = TableSettings::from_value(&json!({ "strategy": "text" })).unwrap();
        assert_eq!(settings.vertical_strategy, Strategy::Text);
        assert_eq!(settings.horizontal_strategy, Strategy::Text);

        let settings = TableSettings::from_value(&json!({
            "strategy": "text",
            "horizontal_strategy": "lines_strict",
        }))
        .unwrap();
        assert_eq!(settings.vertical_strategy, Strategy::Text);
        assert_eq!(settings.horizontal_strategy, Strategy::LinesStrict);
    }

    #[test]
    fn test_from_value_ignores_unknown_keys() {
        let settings = TableSettings::from_value(&json!({
            "merged_cell_fullfill": true,
            "some_future_option": [1, 2, 3],
        }))
        .unwrap();
        assert!(settings.merged_cell_fullfill);
    }

    #[test]
    fn test_from_value_integer_explicit_lines() {
        let settings = TableSettings::from_value(&json!({
            "vertical_strategy": "explicit",
            "explicit_vertical_lines": [100, 200.5, 300],
        }))
        .unwrap();
        assert_eq!(settings.explicit_vertical_lines, vec![100.0, 200.5, 300.0]);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(config_err(json!({ "strategy": "x" })).contains("'x'"));
        assert!(config_err(json!({ "vertical_strategy": "x" })).contains("'x'"));
        assert!(config_err(json!({ "horizontal_strategy": "stream" })).contains("'stream'"));
    }

    #[test]
    fn test_explicit_without_lines_rejected() {
        let msg = config_err(json!({
            "vertical_strategy": "explicit",
            "explicit_vertical_lines": [],
        }));
        assert!(msg.contains("explicit_vertical_lines"));

        let msg = config_err(json!({ "horizontal_strategy": "explicit" }));
        assert!(msg.contains("explicit_horizontal_lines"));
    }

    #[test]
    fn test_explicit_single_line_rejected() {
        let settings = TableSettings {
            vertical_strategy: Strategy::Explicit,
            explicit_vertical_lines: vec![100.0],
            ..TableSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(TableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(config_err(json!({ "snap_tolerance": -1 })).contains("snap_x_tolerance"));
        assert!(config_err(json!({ "edge_min_length": -0.5 })).contains("edge_min_length"));

        let settings = TableSettings {
            join_y_tolerance: f64::NAN,
            ..TableSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_wrong_value_type_rejected() {
        config_err(json!({ "min_words_vertical": -3 }));
        config_err(json!({ "explicit_vertical_lines": ["100"] }));
        config_err(json!({ "merged_cell_fullfill": "yes" }));
        config_err(json!(["not", "a", "mapping"]));
    }

    #[test]
    fn test_word_options_follow_text_settings() {
        let settings = TableSettings {
            text_x_tolerance: 1.0,
            text_y_tolerance: 2.0,
            text_keep_blank_chars: true,
            ..TableSettings::default()
        };
        let options = settings.word_options();
        assert_eq!(options.x_tolerance, 1.0);
        assert_eq!(options.y_tolerance, 2.0);
        assert!(options.keep_blank_chars);
        assert!(options.expand_ligatures);
    }

    #[test]
    fn test_uses_text() {
        assert!(!TableSettings::default().uses_text());
        let settings = TableSettings {
            horizontal_strategy: Strategy::Text,
            ..TableSettings::default()
        };
        assert!(settings.uses_text());
    }
}
