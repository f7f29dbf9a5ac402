//! Anisotropic local diffusion and smoothing
//!
//! This crate re-exports the workspace crates:
//!
//! - [`core`]: grids, tensor fields and plane-parallel execution
//! - [`kernel`]: the `y += G'DG x` diffusion kernels
//! - [`smoothing`]: filters that solve `(I + G'DG) y = x`
//!
//! # Example
//!
//! ```rust
//! use local_diffusion::prelude::*;
//!
//! let x = Array3::from_fn(16, 12, 10, |i1, i2, i3| ((i1 + 2 * i2 + 3 * i3) % 7) as f32);
//! let mut y = Array3::zeros(16, 12, 10);
//! let report = LocalSmoothingFilter::new()
//!     .with_kernel(LocalDiffusionKernel::new(Stencil::D71))
//!     .apply3(&IdentityTensors, 2.0, None, &x, &mut y)
//!     .unwrap();
//! assert!(report.converged);
//! ```

pub use diffusion_core as core;
pub use diffusion_kernel as kernel;
pub use diffusion_smoothing as smoothing;

pub use diffusion_core::{Array2, Array3, ExecutionStrategy, IdentityTensors, Tensors2, Tensors3};
pub use diffusion_kernel::{LocalDiffusionKernel, Stencil};
pub use diffusion_smoothing::{LocalSmoothingFilter, SolveReport};

pub mod prelude {
    pub use diffusion_core::prelude::*;
    pub use diffusion_kernel::{LocalDiffusionKernel, Stencil};
    pub use diffusion_smoothing::{LocalSmoothingFilter, SolveReport};
}
