//! Error types for local diffusion
//!
//! Provides the core error type shared by all diffusion crates.

use thiserror::Error;

/// Core error type for grid, tensor and execution operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Arrays that must share extents do not
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// A plane schedule whose stride cannot keep write windows disjoint
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for two extents that should agree
    pub fn shape_mismatch<E: std::fmt::Debug>(expected: E, actual: E, context: &str) -> Self {
        Self::ShapeMismatch {
            context: context.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Create an error for a flat buffer of the wrong length
    pub fn length_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::ShapeMismatch {
            context: context.to_string(),
            expected: format!("{expected} samples"),
            actual: format!("{actual} samples"),
        }
    }

    /// Create an error from a worker panic payload
    pub fn worker_panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::Execution(format!("worker panicked: {message}"))
    }
}
