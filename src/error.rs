//! Error types for melting and exporting.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised before or during normalization.
#[derive(Debug, Error)]
pub enum MeltError {
    /// The input text could not be decoded as JSON.
    #[error("JSON parsing failed: {0}")]
    Parse(String),

    /// The input contained no document at all.
    #[error("no document found in input")]
    EmptyDocument,

    /// Reading the input failed.
    #[error("failed to read input")]
    Io(#[from] std::io::Error),

    /// The document nests deeper than the configured limit.
    #[error("document nesting exceeds the maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Errors raised while writing tables to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory could not be created or is not a directory.
    #[error("cannot prepare output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single table file could not be created or written.
    #[error("could not write {path}")]
    Table {
        table: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Table name for per-table failures.
    pub fn table(&self) -> Option<&str> {
        match self {
            ExportError::Table { table, .. } => Some(table),
            ExportError::OutputDir { .. } => None,
        }
    }
}
