//! Local anisotropic smoothing filter

use crate::cg::{ConjugateGradient, SolveReport};
use crate::operator::{DiagonalPreconditioner, DiffusionOperator2, DiffusionOperator3, SpdOperator};
use crate::smooth::{smooth_s2, smooth_s3, solve_tridiagonal};
use crate::{Error, Result};
use diffusion_core::{
    ensure_same_extent2, ensure_same_extent3, ensure_tensor_extent2, ensure_tensor_extent3, Array2,
    Array3, Tensors2, Tensors3,
};
use diffusion_kernel::LocalDiffusionKernel;
use tracing::instrument;

/// Iterations between exact residual recomputations for 3D solves
const RESIDUAL_REFRESH_3D: usize = 50;

/// Smooths by solving `(I + G'DG) y = x`
///
/// The tensors `D` control the direction and amount of smoothing: large
/// eigenvalues smooth strongly along their eigenvectors, zero eigenvalues
/// not at all. The symmetric positive-definite system is solved by
/// conjugate-gradient iterations that start from `y = x` and stop when the
/// residual norm falls below `small` times the norm of `x`, or after a
/// maximum number of iterations.
///
/// # Example
///
/// ```rust
/// use diffusion_core::{Array2, ConstantTensors2};
/// use diffusion_smoothing::LocalSmoothingFilter;
///
/// // smooth along axis 1 only
/// let d = ConstantTensors2::new(1.0, 0.0, 0.0);
/// let x = Array2::from_fn(32, 16, |i1, _| (i1 % 4) as f32);
/// let mut y = Array2::zeros(32, 16);
/// let report = LocalSmoothingFilter::new()
///     .apply2(&d, 8.0, None, &x, &mut y)
///     .unwrap();
/// assert!(report.converged);
/// ```
#[derive(Clone, Debug)]
pub struct LocalSmoothingFilter {
    small: f32,
    max_iterations: usize,
    preconditioner: bool,
    kernel: LocalDiffusionKernel,
}

impl Default for LocalSmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSmoothingFilter {
    /// Filter with `small = 0.01`, at most 100 iterations and a D22 kernel
    pub fn new() -> Self {
        Self {
            small: 0.01,
            max_iterations: 100,
            preconditioner: false,
            kernel: LocalDiffusionKernel::default(),
        }
    }

    /// Stop when `‖r‖ <= small ‖x‖`
    pub fn with_tolerance(mut self, small: f32) -> Result<Self> {
        if !(small.is_finite() && small >= 0.0) {
            return Err(Error::invalid_parameter(format!(
                "tolerance must be finite and non-negative, got {small}"
            )));
        }
        self.small = small;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Kernel that computes `y += G'DG x`
    pub fn with_kernel(mut self, kernel: LocalDiffusionKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Use a Jacobi preconditioner
    ///
    /// Costs one extra array and more work per iteration, but may reduce
    /// the number of iterations.
    pub fn with_preconditioner(mut self, enabled: bool) -> Self {
        self.preconditioner = enabled;
        self
    }

    pub fn tolerance(&self) -> f32 {
        self.small
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn kernel(&self) -> &LocalDiffusionKernel {
        &self.kernel
    }

    fn solver(&self, refresh_every: Option<usize>) -> ConjugateGradient {
        ConjugateGradient {
            small: self.small,
            max_iterations: self.max_iterations,
            refresh_every,
        }
    }

    /// Smooth a 1D array with scale `c` and optional factors `s`
    ///
    /// All tensors are implicitly one, so the system is tridiagonal and is
    /// solved directly.
    pub fn apply1(&self, c: f32, s: Option<&[f32]>, x: &[f32], y: &mut [f32]) -> Result<()> {
        solve_tridiagonal(c, s, x, y)
    }

    /// Smooth a 2D array; `y` is overwritten
    #[instrument(skip_all, fields(n1 = x.n1(), n2 = x.n2()))]
    pub fn apply2<T: Tensors2 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        s: Option<&Array2>,
        x: &Array2,
        y: &mut Array2,
    ) -> Result<SolveReport> {
        ensure_same_extent2(x.extent(), y.extent(), "smoothing output")?;
        if let Some(s) = s {
            ensure_same_extent2(x.extent(), s.extent(), "smoothing scale factors")?;
        }
        ensure_tensor_extent2(d, x.extent(), "smoothing tensors")?;
        let a = DiffusionOperator2::new(&self.kernel, d, c, s);
        let m = self
            .preconditioner
            .then(|| DiagonalPreconditioner::for_tensors2(d, c, s, x));
        y.copy_from(x)?;
        self.solver(None).solve(
            &a,
            m.as_ref().map(|m| m as &dyn SpdOperator<Array2>),
            x,
            y,
        )
    }

    /// Smooth a 3D array; `y` is overwritten
    #[instrument(skip_all, fields(n1 = x.n1(), n2 = x.n2(), n3 = x.n3()))]
    pub fn apply3<T: Tensors3 + ?Sized>(
        &self,
        d: &T,
        c: f32,
        s: Option<&Array3>,
        x: &Array3,
        y: &mut Array3,
    ) -> Result<SolveReport> {
        ensure_same_extent3(x.extent(), y.extent(), "smoothing output")?;
        if let Some(s) = s {
            ensure_same_extent3(x.extent(), s.extent(), "smoothing scale factors")?;
        }
        ensure_tensor_extent3(d, x.extent(), "smoothing tensors")?;
        if self.kernel.stencil().schedule(x.n3()).is_none() {
            return Err(diffusion_kernel::Error::UnsupportedStencil {
                stencil: self.kernel.stencil(),
                dims: 3,
            }
            .into());
        }
        let a = DiffusionOperator3::new(&self.kernel, d, c, s);
        let m = self
            .preconditioner
            .then(|| DiagonalPreconditioner::for_tensors3(d, c, s, x));
        y.copy_from(x)?;
        self.solver(Some(RESIDUAL_REFRESH_3D)).solve(
            &a,
            m.as_ref().map(|m| m as &dyn SpdOperator<Array3>),
            x,
            y,
        )
    }

    /// `y = S x` for the 3×3 weighted average `S`
    pub fn apply_smooth_s2(&self, x: &Array2, y: &mut Array2) -> Result<()> {
        smooth_s2(x, y)
    }

    /// `y = S x` for the 3×3×3 weighted average `S`
    pub fn apply_smooth_s3(&self, x: &Array3, y: &mut Array3) -> Result<()> {
        smooth_s3(x, y)
    }
}
