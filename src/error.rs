use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading models, tables and configuration.
///
/// Classification itself never fails; these only surface at startup.
#[derive(Debug, Error)]
pub enum KhmerNewsError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid vector table: {0}")]
    InvalidVectors(String),
    #[error("invalid classifier model: {0}")]
    InvalidModel(String),
    #[error("unknown category label: {0}")]
    UnknownCategory(String),
    #[error("dimension mismatch: vector table has {vectors}, classifier expects {classifier}")]
    DimensionMismatch { vectors: usize, classifier: usize },
    #[error("model directory not found (searched {searched:?})")]
    ModelDirNotFound { searched: Vec<PathBuf> },
}

pub type Result<T> = std::result::Result<T, KhmerNewsError>;
