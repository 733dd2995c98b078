//! Model Errors
//!
//! Every failure a model artifact or a forward pass can produce.
//! None of these cross the `Engine` boundary; callers see fallback results.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading a model artifact from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("corrupt artifact {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("incompatible artifact: {0}")]
    Incompatible(String),

    #[error("model disabled by configuration")]
    Disabled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure during a single forward pass
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("inference runtime error: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    Shape(String),
}

impl From<ndarray::ShapeError> for InferenceError {
    fn from(e: ndarray::ShapeError) -> Self {
        InferenceError::Shape(e.to_string())
    }
}

impl From<image::ImageError> for InferenceError {
    fn from(e: image::ImageError) -> Self {
        InferenceError::Decode(e.to_string())
    }
}
