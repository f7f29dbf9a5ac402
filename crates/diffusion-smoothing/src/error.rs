//! Error types for smoothing filters

use thiserror::Error;

/// Errors that can occur while smoothing
#[derive(Error, Debug)]
pub enum Error {
    /// Conjugate gradients met a direction with non-positive curvature
    #[error("Conjugate gradient breakdown: {0}")]
    Breakdown(String),

    /// Error from the diffusion kernel
    #[error("Kernel error: {0}")]
    Kernel(#[from] diffusion_kernel::Error),

    /// Core validation or execution error
    #[error("Core computation error: {0}")]
    Core(#[from] diffusion_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        Error::Core(diffusion_core::Error::InvalidParameter(msg.into()))
    }
}
