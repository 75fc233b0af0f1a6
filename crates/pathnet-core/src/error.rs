//! Error types for pathnet core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, checking or rewriting tables
#[derive(Error, Debug)]
pub enum PathnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Table is empty")]
    EmptySheet,

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Table needs at least {needed} columns, found {found}")]
    TooFewColumns { needed: usize, found: usize },

    #[error("No Pathway: columns in node table")]
    NoPathwayColumns,

    #[error("{} is locked by another program (gave up after {attempts} attempts)", path.display())]
    FileLocked { path: PathBuf, attempts: u32 },

    #[error("No file path set")]
    NoFilePath,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PathnetError>;
