//! Error types for terrain grid construction.

use thiserror::Error;

/// Rejected terrain grid input.
///
/// Only construction is fallible; planning queries report infeasibility
/// through empty or degenerate return values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid has {rows} rows but zero columns")]
    NoColumns { rows: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("data length {found} does not match extent {rows}x{cols}")]
    DataLength {
        rows: usize,
        cols: usize,
        found: usize,
    },

    #[error("sample {value} at ({row}, {col}) is neither a height nor the obstacle marker")]
    InvalidSample { row: usize, col: usize, value: f64 },

    #[error("extent {rows}x{cols} exceeds the addressable coordinate range")]
    TooLarge { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;
