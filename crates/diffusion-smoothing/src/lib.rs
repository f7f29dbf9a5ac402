//! Local anisotropic smoothing
//!
//! This crate smooths 1D, 2D and 3D sampled fields by solving
//! `(I + G'DG) y = x`, where `G'DG` is a local diffusion kernel from
//! `diffusion-kernel`. The tensors `D` steer the smoothing so that, for
//! example, an image is smoothed along its features but not across them.
//!
//! # Overview
//!
//! - **[`LocalSmoothingFilter`]**: conjugate-gradient solves with optional
//!   Jacobi preconditioning, plus a direct tridiagonal solve for 1D arrays
//! - **Simple averages**: the 3×3 and 3×3×3 weighted averages `S`
//! - **[`ConjugateGradient`]**: the solver itself, generic over any
//!   [`SpdOperator`]
//!
//! # Example
//!
//! ```rust
//! use diffusion_core::{Array3, IdentityTensors};
//! use diffusion_smoothing::LocalSmoothingFilter;
//!
//! let x = Array3::from_fn(12, 10, 8, |i1, i2, i3| ((i1 * i2 + i3) % 3) as f32);
//! let mut y = Array3::zeros(12, 10, 8);
//! let report = LocalSmoothingFilter::new()
//!     .with_preconditioner(true)
//!     .apply3(&IdentityTensors, 2.0, None, &x, &mut y)
//!     .unwrap();
//! assert!(report.final_residual <= report.initial_residual);
//! ```

mod cg;
pub mod error;
mod filter;
pub mod operator;
mod smooth;
mod vector;

pub use cg::{ConjugateGradient, SolveReport};
pub use error::{Error, Result};
pub use filter::LocalSmoothingFilter;
pub use operator::{DiagonalPreconditioner, DiffusionOperator2, DiffusionOperator3, SpdOperator};
pub use vector::Field;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Error, LocalSmoothingFilter, Result, SolveReport};
}
