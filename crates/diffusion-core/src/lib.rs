//! Core types for local anisotropic diffusion
//!
//! This crate provides the foundation shared by the diffusion kernels and
//! the smoothing filters built on them.
//!
//! # Architecture Overview
//!
//! 1. **Grids** - dense 2D and 3D `f32` arrays, dimension 1 fastest
//! 2. **Tensor Fields** - read-only accessors for per-sample symmetric tensors
//! 3. **Execution** - plane schedules and the pass-based parallel dispatcher
//!
//! # Example
//!
//! ```rust
//! use diffusion_core::{
//!     execution::{PlaneDispatcher, PlaneSchedule, PlaneWindow},
//!     Extent3,
//! };
//!
//! // Every plane visit writes itself and the plane below.
//! let schedule = PlaneSchedule { start: 1, step: 2, stop: 6, below: 1, above: 0 };
//! let extent = Extent3::new(4, 4, 6);
//! let mut y = vec![0.0_f32; extent.len()];
//!
//! PlaneDispatcher::parallel()
//!     .run(&schedule, extent, &mut y, |w: &mut PlaneWindow<'_>| {
//!         w.data_mut().iter_mut().for_each(|v| *v += 1.0);
//!     })
//!     .unwrap();
//!
//! // Plane 0 is written once, planes 1..5 twice.
//! assert_eq!(y[0], 1.0);
//! assert_eq!(y[extent.index(0, 0, 3)], 2.0);
//! ```

pub mod error;
pub mod execution;
pub mod grid;
pub mod tensors;

// Re-export core types
pub use error::{Error, Result};

pub use execution::{ExecutionStrategy, PlaneDispatcher, PlaneSchedule, PlaneWindow};

pub use grid::{ensure_same_extent2, ensure_same_extent3, Array2, Array3, Extent2, Extent3};

pub use tensors::{
    eigen_tensor2, eigen_tensor3, ensure_tensor_extent2, ensure_tensor_extent3,
    ConstantTensors2, ConstantTensors3, DenseTensors2, DenseTensors3, IdentityTensors, Tensors2,
    Tensors3,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{
        Array2, Array3, ConstantTensors2, ConstantTensors3, DenseTensors2, DenseTensors3,
        ExecutionStrategy, Extent2, Extent3, IdentityTensors, PlaneDispatcher, Result, Tensors2,
        Tensors3,
    };
}
