//! Error types for table detection.
//!
//! Uses [`thiserror`] for error derivation. Geometric ambiguity is never an
//! error: an empty page, zero edges, or no table found all produce empty
//! results. Only caller mistakes surface here.

use thiserror::Error;

/// Error type for table detection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A settings value is unknown or out of range.
    ///
    /// Raised by [`TableSettings::validate`](crate::TableSettings::validate)
    /// before any geometric work starts.
    #[error("invalid table configuration: {0}")]
    InvalidConfiguration(String),

    /// The edge merger was handed an orientation it cannot join along.
    #[error("invalid edge orientation: {0}")]
    InvalidOrientation(String),
}
