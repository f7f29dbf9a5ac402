//! Error types for diffusion kernels

use crate::Stencil;
use thiserror::Error;

/// Errors that can occur when applying a diffusion kernel
#[derive(Error, Debug)]
pub enum Error {
    /// The stencil has no implementation for arrays of this rank
    #[error("Stencil {stencil:?} is not supported for {dims}D arrays")]
    UnsupportedStencil { stencil: Stencil, dims: usize },

    /// Core validation or execution error
    #[error("Core computation error: {0}")]
    Core(#[from] diffusion_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions
impl Error {
    /// Check that the number of kernel passes is usable
    pub fn check_passes(passes: usize) -> Result<()> {
        if passes == 0 {
            return Err(diffusion_core::Error::InvalidParameter(
                "number of kernel passes must be positive".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
