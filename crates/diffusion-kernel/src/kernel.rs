//! The local diffusion kernel front end

use crate::kernels::{d22, d24, d33, d71};
use crate::{Error, Result, Stencil};
use diffusion_core::{
    ensure_same_extent2, ensure_same_extent3, ensure_tensor_extent2, ensure_tensor_extent3,
    Array2, Array3, ExecutionStrategy, Extent2, Extent3, IdentityTensors, PlaneDispatcher,
    PlaneWindow, Tensors2, Tensors3,
};
use tracing::{debug, trace};

/// A local diffusion kernel computing `y += G'DG x`
///
/// `G` is a finite-difference gradient approximated with the chosen
/// [`Stencil`], `G'` its adjoint, and `D` a field of symmetric tensors,
/// optionally scaled by a constant `c` and per-sample factors `s`. Given
/// `y = 0` the kernel computes `G'DG x`; given `y = x` it computes
/// `(I + G'DG) x`. The operator is self-adjoint.
///
/// 3D arrays are processed plane by plane through a [`PlaneDispatcher`];
/// sequential and parallel dispatch give bit-identical results.
///
/// # Example
///
/// ```rust
/// use diffusion_core::{Array2, IdentityTensors};
/// use diffusion_kernel::{LocalDiffusionKernel, Stencil};
///
/// let kernel = LocalDiffusionKernel::new(Stencil::D22);
/// let mut x = Array2::zeros(5, 5);
/// x[(2, 2)] = 1.0;
/// let mut y = Array2::zeros(5, 5);
/// kernel.apply2(&IdentityTensors, &x, &mut y).unwrap();
/// assert!((y[(2, 2)] - 2.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct LocalDiffusionKernel {
    stencil: Stencil,
    passes: usize,
    dispatcher: PlaneDispatcher,
}

impl Default for LocalDiffusionKernel {
    fn default() -> Self {
        Self::new(Stencil::default())
    }
}

impl LocalDiffusionKernel {
    pub fn new(stencil: Stencil) -> Self {
        Self {
            stencil,
            passes: 1,
            dispatcher: PlaneDispatcher::default(),
        }
    }

    /// Compute the output in `passes` kernel passes
    ///
    /// Pass 0 computes `y += G'DG x`; each later pass computes
    /// `y += G'DG y'` where `y'` is a copy of `y` taken before that pass.
    pub fn with_passes(mut self, passes: usize) -> Result<Self> {
        Error::check_passes(passes)?;
        self.passes = passes;
        Ok(self)
    }

    /// Use the given strategy for 3D plane dispatch
    pub fn with_execution(mut self, strategy: ExecutionStrategy) -> Self {
        self.dispatcher = PlaneDispatcher::new(strategy);
        self
    }

    /// Use a preconfigured dispatcher, e.g. one with a dedicated pool
    pub fn with_dispatcher(mut self, dispatcher: PlaneDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn stencil(&self) -> Stencil {
        self.stencil
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn dispatcher(&self) -> &PlaneDispatcher {
        &self.dispatcher
    }

    /// `y += G'DG x` with unit scale
    pub fn apply2<T: Tensors2 + ?Sized>(&self, d: &T, x: &Array2, y: &mut Array2) -> Result<()> {
        self.apply2_with(d, 1.0, None, x, y)
    }

    /// `y += G'(cD)G x`
    pub fn apply2_scaled<T: Tensors2 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        x: &Array2,
        y: &mut Array2,
    ) -> Result<()> {
        self.apply2_with(d, c, None, x, y)
    }

    /// `y += G'(c I)G x` with identity tensors
    pub fn apply2_isotropic(&self, c: f32, x: &Array2, y: &mut Array2) -> Result<()> {
        self.apply2_with(&IdentityTensors, c, None, x, y)
    }

    /// `y += G'(c s D)G x`
    ///
    /// Extents of `x`, `y`, `s` and of array-backed tensors such as
    /// [`DenseTensors2`](diffusion_core::DenseTensors2) must agree; on
    /// mismatch `y` is untouched.
    pub fn apply2_with<T: Tensors2 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        s: Option<&Array2>,
        x: &Array2,
        y: &mut Array2,
    ) -> Result<()> {
        let extent = x.extent();
        ensure_same_extent2(extent, y.extent(), "kernel output")?;
        if let Some(s) = s {
            ensure_same_extent2(extent, s.extent(), "kernel scale factors")?;
        }
        ensure_tensor_extent2(d, extent, "kernel tensors")?;
        debug!(
            stencil = %self.stencil,
            n1 = extent.n1,
            n2 = extent.n2,
            passes = self.passes,
            "applying 2D diffusion kernel"
        );

        let kernel = kernel2::<T>(self.stencil);
        let s = s.map(Array2::as_slice);
        let mut scratch = Vec::new();
        for pass in 0..self.passes {
            let y = y.as_mut_slice();
            if pass == 0 {
                kernel(d, c, s, x.as_slice(), y, extent);
            } else {
                scratch.clear();
                scratch.extend_from_slice(y);
                kernel(d, c, s, &scratch, y, extent);
            }
        }
        Ok(())
    }

    /// `y += G'DG x` with unit scale
    pub fn apply3<T: Tensors3 + ?Sized>(&self, d: &T, x: &Array3, y: &mut Array3) -> Result<()> {
        self.apply3_with(d, 1.0, None, x, y)
    }

    /// `y += G'(cD)G x`
    pub fn apply3_scaled<T: Tensors3 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        x: &Array3,
        y: &mut Array3,
    ) -> Result<()> {
        self.apply3_with(d, c, None, x, y)
    }

    /// `y += G'(c I)G x` with identity tensors
    pub fn apply3_isotropic(&self, c: f32, x: &Array3, y: &mut Array3) -> Result<()> {
        self.apply3_with(&IdentityTensors, c, None, x, y)
    }

    /// `y += G'(c s D)G x`
    ///
    /// Fails with [`Error::UnsupportedStencil`] for [`Stencil::D24`], and
    /// with a shape mismatch when `y`, `s` or array-backed tensors do not
    /// have the extents of `x`. All checks happen before the first plane is
    /// processed, so on error `y` is untouched.
    pub fn apply3_with<T: Tensors3 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        s: Option<&Array3>,
        x: &Array3,
        y: &mut Array3,
    ) -> Result<()> {
        let extent = x.extent();
        let (schedule, kernel) = match (self.stencil.schedule(extent.n3), kernel3::<T>(self.stencil)) {
            (Some(schedule), Some(kernel)) => (schedule, kernel),
            _ => {
                return Err(Error::UnsupportedStencil {
                    stencil: self.stencil,
                    dims: 3,
                })
            }
        };
        ensure_same_extent3(extent, y.extent(), "kernel output")?;
        if let Some(s) = s {
            ensure_same_extent3(extent, s.extent(), "kernel scale factors")?;
        }
        ensure_tensor_extent3(d, extent, "kernel tensors")?;
        schedule.validate()?;
        debug!(
            stencil = %self.stencil,
            n1 = extent.n1,
            n2 = extent.n2,
            n3 = extent.n3,
            passes = self.passes,
            parallel = self.dispatcher.is_parallel(),
            "applying 3D diffusion kernel"
        );

        let s = s.map(Array3::as_slice);
        let mut scratch = Vec::new();
        for pass in 0..self.passes {
            let x = if pass == 0 {
                x.as_slice()
            } else {
                scratch.clear();
                scratch.extend_from_slice(y.as_slice());
                scratch.as_slice()
            };
            trace!(pass, "kernel pass");
            self.dispatcher.run(
                &schedule,
                extent,
                y.as_mut_slice(),
                |w: &mut PlaneWindow<'_>| kernel(d, c, s, x, extent, w),
            )?;
        }
        Ok(())
    }
}

/// Inner loop for 2D arrays
fn kernel2<T: Tensors2 + ?Sized>(
    stencil: Stencil,
) -> fn(&T, f32, Option<&[f32]>, &[f32], &mut [f32], Extent2) {
    match stencil {
        Stencil::D22 => d22::apply2::<T>,
        Stencil::D24 => d24::apply2::<T>,
        Stencil::D33 => d33::apply2::<T>,
        Stencil::D71 => d71::apply2::<T>,
    }
}

/// Per-plane inner loop for 3D arrays, if the stencil has one
fn kernel3<T: Tensors3 + ?Sized>(
    stencil: Stencil,
) -> Option<fn(&T, f32, Option<&[f32]>, &[f32], Extent3, &mut PlaneWindow<'_>)> {
    match stencil {
        Stencil::D22 => Some(d22::apply_plane::<T>),
        Stencil::D24 => None,
        Stencil::D33 => Some(d33::apply_plane::<T>),
        Stencil::D71 => Some(d71::apply_plane::<T>),
    }
}
