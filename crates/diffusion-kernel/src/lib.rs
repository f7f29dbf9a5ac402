//! Local anisotropic diffusion kernels
//!
//! This crate implements the filter `y += G'DG x`, where `G` is a
//! finite-difference gradient, `G'` its adjoint and `D` a field of local
//! diffusion tensors. Such kernels are the building block of anisotropic
//! smoothing and notch filters, which solve systems like `(I + G'DG) y = x`.
//!
//! # Features
//!
//! - **Four Stencils**: D22, D24 (2D only), D33 and D71
//! - **Self-Adjoint**: every stencil yields a symmetric operator
//! - **Parallel 3D**: planes are processed in passes of disjoint write
//!   windows, bit-identical to sequential execution
//! - **Multi-Pass**: optional repeated application `y += G'DG y`
//!
//! # Example
//!
//! ```rust
//! use diffusion_core::{Array3, ConstantTensors3};
//! use diffusion_kernel::{LocalDiffusionKernel, Stencil};
//!
//! let d = ConstantTensors3::from_eigen([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], 0.1, 1.0, 1.0);
//! let x = Array3::from_fn(8, 8, 8, |i1, i2, i3| (i1 + i2 * i3) as f32);
//! let mut y = x.clone();
//!
//! // y = (I + G'DG) x
//! LocalDiffusionKernel::new(Stencil::D33)
//!     .apply3(&d, &x, &mut y)
//!     .unwrap();
//! ```

pub mod error;
mod kernel;
mod kernels;
mod stencil;

pub use error::{Error, Result};
pub use kernel::LocalDiffusionKernel;
pub use stencil::Stencil;

// Re-export from diffusion-core
pub use diffusion_core::{Array2, Array3, ExecutionStrategy, PlaneDispatcher, Tensors2, Tensors3};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Error, LocalDiffusionKernel, Result, Stencil};
    pub use diffusion_core::prelude::*;
}
