//! Error types for forcebox
//!
//! Every failure is reported at the call that detects it. Invalid input never
//! starts a simulation, and a boundary exit is not an error at all, it just
//! yields a shorter trajectory

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Input of the wrong value or range (unknown force type, non-positive step, ...)
    #[error("invalid argument `{field}`: expected {expected}")]
    InvalidArgument { field: String, expected: String },

    /// A vector that must have exactly two components has some other length
    #[error("shape error in `{field}`: expected {expected} components, got {got}")]
    Shape { field: String, expected: usize, got: usize },

    /// Persistence target already exists
    #[error("refusing to overwrite existing path {}", .0.display())]
    ResourceConflict(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn invalid(field: impl Into<String>, expected: impl Into<String>) -> Self {
        SimError::InvalidArgument {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
