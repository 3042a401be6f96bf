//! Error types for board validation and parsing

use thiserror::Error;

/// Errors raised before a formula is built or while reading a board
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MinesweeperError {
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("hint {value} at ({row}, {col}) is outside 0..=8")]
    HintOutOfRange { row: usize, col: usize, value: u8 },

    #[error("grid dimensions {actual_rows}x{actual_cols} don't match expected {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, MinesweeperError>;
