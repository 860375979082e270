use std::io;

use thiserror::Error;

/// Failure to read the uploaded export. Raised before the pipeline starts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("input has no header row")]
    NoHeader,
    #[error("CSV row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Fatal pipeline failure. No partial output accompanies it.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("missing required column(s) for the '{variant}' layout: {}", .fields.join(", "))]
    MissingFields {
        variant: &'static str,
        fields: Vec<String>,
    },
}
