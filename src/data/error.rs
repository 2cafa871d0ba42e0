use std::path::PathBuf;

use thiserror::Error;

/// Anything that prevents a file from becoming a [`super::model::BattedBallDataset`].
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Cannot open workbook: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Invalid column range '{0}', expected something like A:M")]
    InvalidColumnRange(String),

    #[error("Header row is empty")]
    EmptyHeader,

    #[error("Missing required column '{column}' (found: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Row {row}: '{value}' in column {column} is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Malformed {format} input: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataLoadError {
    pub(crate) fn malformed(format: &'static str, err: impl std::fmt::Display) -> Self {
        DataLoadError::Malformed {
            format,
            message: format!("{err:#}"),
        }
    }
}
