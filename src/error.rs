use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{filename}:{line}:{column}: {message}")]
    Parse {
        filename: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Language error: {0}")]
    Language(String),

    #[error("Multiple packages found in directory: {}", .0.join(", "))]
    MultiplePackages(Vec<String>),

    #[error("Unknown type expression {kind}: {text}")]
    UnsupportedTypeExpr { kind: String, text: String },

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocError>;
