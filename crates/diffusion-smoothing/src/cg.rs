//! Conjugate-gradient solver for `A x = b`

use crate::operator::SpdOperator;
use crate::vector::{axpy, dot, subtract_from, xpay, Field};
use crate::{Error, Result};
use tracing::{debug, trace};

/// Outcome of one smoothing solve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveReport {
    /// Iterations performed
    pub iterations: usize,
    /// Norm of `b - A x` for the initial guess
    pub initial_residual: f32,
    /// Norm of the residual when iterations stopped
    pub final_residual: f32,
    /// Whether the residual fell below the requested fraction of `‖b‖`
    pub converged: bool,
}

/// Stopping rules and residual maintenance for conjugate gradients
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConjugateGradient {
    /// Stop when `‖r‖ <= small ‖b‖`
    pub small: f32,
    /// Stop after this many iterations
    pub max_iterations: usize,
    /// Recompute `r = b - A x` exactly on every iteration `k` with
    /// `k % n == n - 1`, instead of updating it recursively
    pub refresh_every: Option<usize>,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            small: 0.01,
            max_iterations: 100,
            refresh_every: None,
        }
    }
}

impl ConjugateGradient {
    /// Solve `A x = b`, starting from the current contents of `x`
    ///
    /// With a preconditioner `m` the iteration minimizes in the `M`-weighted
    /// inner product; the stopping rule always uses the plain residual norm.
    pub fn solve<V, A>(
        &self,
        a: &A,
        m: Option<&dyn SpdOperator<V>>,
        b: &V,
        x: &mut V,
    ) -> Result<SolveReport>
    where
        V: Field,
        A: SpdOperator<V> + ?Sized,
    {
        let mut q = b.zeros_like();
        let mut r = b.zeros_like();
        a.apply(x, &mut r)?;
        subtract_from(b.values(), r.values_mut()); // r = b - Ax

        let bnorm = dot(b.values(), b.values()).sqrt() as f32;
        let mut rnorm = dot(r.values(), r.values()).sqrt() as f32;
        let rnorm_begin = rnorm;
        let rnorm_small = bnorm * self.small;

        // s = Mr, or r itself without a preconditioner
        let mut s = match m {
            Some(m) => {
                let mut s = b.zeros_like();
                m.apply(&r, &mut s)?;
                Some(s)
            }
            None => None,
        };
        let mut d = s.as_ref().unwrap_or(&r).clone();
        let mut delta = dot(r.values(), s.as_ref().unwrap_or(&r).values());

        debug!(bnorm, rnorm, preconditioned = m.is_some(), "conjugate gradient start");
        let mut iter = 0;
        while iter < self.max_iterations && rnorm > rnorm_small {
            trace!(iter, rnorm, ratio = rnorm / rnorm_begin, "conjugate gradient iteration");
            a.apply(&d, &mut q)?; // q = Ad
            let dq = dot(d.values(), q.values());
            if !(dq.is_finite() && dq > 0.0) {
                return Err(Error::Breakdown(format!(
                    "d'Ad = {dq} at iteration {iter}"
                )));
            }
            let alpha = (delta / dq) as f32;
            axpy(alpha, d.values(), x.values_mut());
            if self.refreshes(iter) {
                a.apply(x, &mut r)?;
                subtract_from(b.values(), r.values_mut());
            } else {
                axpy(-alpha, q.values(), r.values_mut());
            }
            let delta_old = delta;
            match (m, s.as_mut()) {
                (Some(m), Some(s)) => {
                    m.apply(&r, s)?;
                    delta = dot(r.values(), s.values());
                    xpay((delta / delta_old) as f32, s.values(), d.values_mut());
                    rnorm = dot(r.values(), r.values()).sqrt() as f32;
                }
                _ => {
                    delta = dot(r.values(), r.values());
                    xpay((delta / delta_old) as f32, r.values(), d.values_mut());
                    rnorm = delta.sqrt() as f32;
                }
            }
            iter += 1;
        }
        debug!(iter, rnorm, ratio = rnorm / rnorm_begin, "conjugate gradient end");

        Ok(SolveReport {
            iterations: iter,
            initial_residual: rnorm_begin,
            final_residual: rnorm,
            converged: rnorm <= rnorm_small,
        })
    }

    fn refreshes(&self, iter: usize) -> bool {
        match self.refresh_every {
            Some(n) if n > 0 => iter % n == n - 1,
            _ => false,
        }
    }
}
