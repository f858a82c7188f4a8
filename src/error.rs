use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxsegError {
    #[error("could not open or read PDF '{}': {reason}", .path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("no matching ground truth for '{}'", .pdf.display())]
    MissingGroundTruth { pdf: PathBuf },

    #[error("invalid ground truth file '{}': {source}", .path.display())]
    GroundTruthParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TaxsegError>;

impl TaxsegError {
    /// Wraps any failure while reading a document as [`TaxsegError::DocumentOpen`],
    /// keeping the full context chain in the reason.
    pub fn document_open(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        TaxsegError::DocumentOpen {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
