//! Vector arithmetic for the conjugate-gradient solver
//!
//! Arrays are treated as flat vectors. Inner products are accumulated in
//! `f64` over fixed-size chunks and the chunk sums are added in order, so
//! the result does not depend on whether chunks ran in parallel.

use diffusion_core::{Array2, Array3};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Samples per chunk of work
const CHUNK: usize = 4096;

/// Below this many samples everything runs on the calling thread
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 1 << 16;

/// A sampled field that the solver can treat as a vector
pub trait Field: Clone + Send + Sync {
    fn values(&self) -> &[f32];
    fn values_mut(&mut self) -> &mut [f32];
    /// A zeroed field of the same shape
    fn zeros_like(&self) -> Self;
}

impl Field for Array2 {
    fn values(&self) -> &[f32] {
        self.as_slice()
    }

    fn values_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }

    fn zeros_like(&self) -> Self {
        Array2::zeros(self.n1(), self.n2())
    }
}

impl Field for Array3 {
    fn values(&self) -> &[f32] {
        self.as_slice()
    }

    fn values_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }

    fn zeros_like(&self) -> Self {
        Array3::zeros(self.n1(), self.n2(), self.n3())
    }
}

fn dot_chunk(x: &[f32], y: &[f32]) -> f64 {
    x.iter().zip(y).map(|(&a, &b)| a as f64 * b as f64).sum()
}

/// `x'y`
pub(crate) fn dot(x: &[f32], y: &[f32]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    #[cfg(feature = "parallel")]
    if x.len() >= PARALLEL_THRESHOLD {
        let partials: Vec<f64> = x
            .par_chunks(CHUNK)
            .zip(y.par_chunks(CHUNK))
            .map(|(a, b)| dot_chunk(a, b))
            .collect();
        return partials.iter().sum();
    }
    x.chunks(CHUNK)
        .zip(y.chunks(CHUNK))
        .map(|(a, b)| dot_chunk(a, b))
        .sum()
}

/// Apply `f(x[i], y[i])` to every pair, writing into `y`
fn zip_apply<F>(x: &[f32], y: &mut [f32], f: F)
where
    F: Fn(f32, &mut f32) + Sync + Send,
{
    debug_assert_eq!(x.len(), y.len());
    #[cfg(feature = "parallel")]
    if x.len() >= PARALLEL_THRESHOLD {
        y.par_chunks_mut(CHUNK)
            .zip(x.par_chunks(CHUNK))
            .for_each(|(yc, xc)| xc.iter().zip(yc).for_each(|(&a, b)| f(a, b)));
        return;
    }
    x.iter().zip(y.iter_mut()).for_each(|(&a, b)| f(a, b));
}

/// `y += a x`
pub(crate) fn axpy(a: f32, x: &[f32], y: &mut [f32]) {
    zip_apply(x, y, |xi, yi| *yi += a * xi);
}

/// `y = x + a y`
pub(crate) fn xpay(a: f32, x: &[f32], y: &mut [f32]) {
    zip_apply(x, y, |xi, yi| *yi = xi + a * *yi);
}

/// `y = p .* x`
pub(crate) fn multiply(p: &[f32], x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(p.len(), x.len());
    y.iter_mut()
        .zip(p.iter().zip(x))
        .for_each(|(yi, (&pi, &xi))| *yi = pi * xi);
}

/// `y = b - y`
pub(crate) fn subtract_from(b: &[f32], y: &mut [f32]) {
    zip_apply(b, y, |bi, yi| *yi = bi - *yi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_blas_like_ops() {
        let x = [1.0, 2.0, 3.0];
        let mut y = [1.0, 1.0, 1.0];
        axpy(2.0, &x, &mut y);
        assert_eq!(y, [3.0, 5.0, 7.0]);
        xpay(0.5, &x, &mut y);
        assert_eq!(y, [2.5, 4.5, 6.5]);
        subtract_from(&x, &mut y);
        assert_eq!(y, [-1.5, -2.5, -3.5]);
        multiply(&[2.0, 0.0, -1.0], &x, &mut y);
        assert_eq!(y, [2.0, 0.0, -3.0]);
        assert_relative_eq!(dot(&x, &x), 14.0);
    }

    #[test]
    fn test_dot_spans_chunks() {
        let n = CHUNK * 3 + 17;
        let x = vec![0.5_f32; n];
        let y = vec![2.0_f32; n];
        assert_relative_eq!(dot(&x, &y), n as f64);
    }

    #[test]
    fn test_fields_report_shape() {
        let a = Array3::filled(2, 3, 4, 1.0);
        let z = a.zeros_like();
        assert_eq!(z.extent(), a.extent());
        assert!(z.values().iter().all(|&v| v == 0.0));
    }
}
