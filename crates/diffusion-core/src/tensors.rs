//! Tensor field accessors
//!
//! A tensor field supplies, for every sample, the independent entries of a
//! symmetric positive-semidefinite matrix:
//!
//! - 2D: `[a11, a12, a22]`
//! - 3D: `[a11, a12, a13, a22, a23, a33]`
//!
//! Kernels call the accessor concurrently from several threads, so every
//! implementation must be `Sync` and free of interior mutation. Any
//! `Fn(usize, usize) -> [f32; 3] + Sync` closure is a 2D tensor field, and
//! likewise for 3D.

use crate::grid::{ensure_same_extent2, ensure_same_extent3, Extent2, Extent3};
use crate::{Error, Result};

/// Read-only access to a 2D tensor field
pub trait Tensors2: Sync {
    /// Tensor entries `[a11, a12, a22]` at sample `(i1, i2)`
    fn tensor(&self, i1: usize, i2: usize) -> [f32; 3];

    /// Extents of the stored samples, for fields backed by arrays
    fn sampled_extent(&self) -> Option<Extent2> {
        None
    }
}

/// Read-only access to a 3D tensor field
pub trait Tensors3: Sync {
    /// Tensor entries `[a11, a12, a13, a22, a23, a33]` at sample `(i1, i2, i3)`
    fn tensor(&self, i1: usize, i2: usize, i3: usize) -> [f32; 6];

    /// Extents of the stored samples, for fields backed by arrays
    fn sampled_extent(&self) -> Option<Extent3> {
        None
    }
}

/// Check that a field backed by arrays has the extents of the grid it is
/// applied to; computed fields always pass
pub fn ensure_tensor_extent2<T: Tensors2 + ?Sized>(
    d: &T,
    extent: Extent2,
    context: &str,
) -> Result<()> {
    match d.sampled_extent() {
        Some(sampled) => ensure_same_extent2(extent, sampled, context),
        None => Ok(()),
    }
}

/// 3D analogue of [`ensure_tensor_extent2`]
pub fn ensure_tensor_extent3<T: Tensors3 + ?Sized>(
    d: &T,
    extent: Extent3,
    context: &str,
) -> Result<()> {
    match d.sampled_extent() {
        Some(sampled) => ensure_same_extent3(extent, sampled, context),
        None => Ok(()),
    }
}

impl<F> Tensors2 for F
where
    F: Fn(usize, usize) -> [f32; 3] + Sync,
{
    #[inline]
    fn tensor(&self, i1: usize, i2: usize) -> [f32; 3] {
        self(i1, i2)
    }
}

impl<F> Tensors3 for F
where
    F: Fn(usize, usize, usize) -> [f32; 6] + Sync,
{
    #[inline]
    fn tensor(&self, i1: usize, i2: usize, i3: usize) -> [f32; 6] {
        self(i1, i2, i3)
    }
}

/// The identity tensor at every sample (isotropic diffusion)
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTensors;

impl Tensors2 for IdentityTensors {
    #[inline]
    fn tensor(&self, _i1: usize, _i2: usize) -> [f32; 3] {
        [1.0, 0.0, 1.0]
    }
}

impl Tensors3 for IdentityTensors {
    #[inline]
    fn tensor(&self, _i1: usize, _i2: usize, _i3: usize) -> [f32; 6] {
        [1.0, 0.0, 0.0, 1.0, 0.0, 1.0]
    }
}

/// The same 2D tensor at every sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantTensors2(pub [f32; 3]);

impl ConstantTensors2 {
    pub fn new(a11: f32, a12: f32, a22: f32) -> Self {
        Self([a11, a12, a22])
    }

    /// Tensor with eigenvalues `au`, `av` and unit eigenvector `u` for `au`
    pub fn from_eigen(u: [f32; 2], au: f32, av: f32) -> Self {
        Self(eigen_tensor2(u, au, av))
    }
}

impl Tensors2 for ConstantTensors2 {
    #[inline]
    fn tensor(&self, _i1: usize, _i2: usize) -> [f32; 3] {
        self.0
    }
}

/// The same 3D tensor at every sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantTensors3(pub [f32; 6]);

impl ConstantTensors3 {
    pub fn new(a11: f32, a12: f32, a13: f32, a22: f32, a23: f32, a33: f32) -> Self {
        Self([a11, a12, a13, a22, a23, a33])
    }

    /// Tensor with eigenvalues `au`, `av`, `aw` for unit eigenvectors `u`,
    /// `v = w × u` and `w`
    pub fn from_eigen(u: [f32; 3], w: [f32; 3], au: f32, av: f32, aw: f32) -> Self {
        Self(eigen_tensor3(u, w, au, av, aw))
    }
}

impl Tensors3 for ConstantTensors3 {
    #[inline]
    fn tensor(&self, _i1: usize, _i2: usize, _i3: usize) -> [f32; 6] {
        self.0
    }
}

/// Build `A = (au - av) u u' + av I` for a unit vector `u`
pub fn eigen_tensor2(u: [f32; 2], au: f32, av: f32) -> [f32; 3] {
    let [u1, u2] = u;
    let d = au - av;
    [d * u1 * u1 + av, d * u1 * u2, d * u2 * u2 + av]
}

/// Build `A = au u u' + av v v' + aw w w'` where `v = w × u`
pub fn eigen_tensor3(u: [f32; 3], w: [f32; 3], au: f32, av: f32, aw: f32) -> [f32; 6] {
    let [u1, u2, u3] = u;
    let [w1, w2, w3] = w;
    let v1 = w2 * u3 - w3 * u2;
    let v2 = w3 * u1 - w1 * u3;
    let v3 = w1 * u2 - w2 * u1;
    [
        au * u1 * u1 + av * v1 * v1 + aw * w1 * w1,
        au * u1 * u2 + av * v1 * v2 + aw * w1 * w2,
        au * u1 * u3 + av * v1 * v3 + aw * w1 * w3,
        au * u2 * u2 + av * v2 * v2 + aw * w2 * w2,
        au * u2 * u3 + av * v2 * v3 + aw * w2 * w3,
        au * u3 * u3 + av * v3 * v3 + aw * w3 * w3,
    ]
}

/// A 2D tensor field stored sample by sample
#[derive(Clone, Debug, PartialEq)]
pub struct DenseTensors2 {
    extent: Extent2,
    coefficients: Vec<[f32; 3]>,
}

impl DenseTensors2 {
    /// Identity tensors everywhere
    pub fn new(n1: usize, n2: usize) -> Self {
        let extent = Extent2::new(n1, n2);
        Self {
            extent,
            coefficients: vec![[1.0, 0.0, 1.0]; extent.len()],
        }
    }

    /// Evaluate `f(i1, i2)` once per sample
    pub fn from_fn<F: FnMut(usize, usize) -> [f32; 3]>(n1: usize, n2: usize, mut f: F) -> Self {
        let extent = Extent2::new(n1, n2);
        let mut coefficients = Vec::with_capacity(extent.len());
        for i2 in 0..n2 {
            for i1 in 0..n1 {
                coefficients.push(f(i1, i2));
            }
        }
        Self { extent, coefficients }
    }

    /// Build from per-sample unit eigenvectors `u` and eigenvalues `au`, `av`
    pub fn from_eigen(
        n1: usize,
        n2: usize,
        u1: &[f32],
        u2: &[f32],
        au: &[f32],
        av: &[f32],
    ) -> Result<Self> {
        let extent = Extent2::new(n1, n2);
        for (name, a) in [("u1", u1), ("u2", u2), ("au", au), ("av", av)] {
            if a.len() != extent.len() {
                return Err(Error::length_mismatch(extent.len(), a.len(), name));
            }
        }
        let coefficients = (0..extent.len())
            .map(|k| eigen_tensor2([u1[k], u2[k]], au[k], av[k]))
            .collect();
        Ok(Self { extent, coefficients })
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn set_tensor(&mut self, i1: usize, i2: usize, a: [f32; 3]) {
        let k = self.extent.index(i1, i2);
        self.coefficients[k] = a;
    }

    pub fn fill(&mut self, a: [f32; 3]) {
        self.coefficients.fill(a);
    }
}

impl Tensors2 for DenseTensors2 {
    #[inline]
    fn tensor(&self, i1: usize, i2: usize) -> [f32; 3] {
        self.coefficients[self.extent.index(i1, i2)]
    }

    fn sampled_extent(&self) -> Option<Extent2> {
        Some(self.extent)
    }
}

/// A 3D tensor field stored sample by sample
#[derive(Clone, Debug, PartialEq)]
pub struct DenseTensors3 {
    extent: Extent3,
    coefficients: Vec<[f32; 6]>,
}

impl DenseTensors3 {
    /// Identity tensors everywhere
    pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
        let extent = Extent3::new(n1, n2, n3);
        Self {
            extent,
            coefficients: vec![[1.0, 0.0, 0.0, 1.0, 0.0, 1.0]; extent.len()],
        }
    }

    /// Evaluate `f(i1, i2, i3)` once per sample
    pub fn from_fn<F: FnMut(usize, usize, usize) -> [f32; 6]>(
        n1: usize,
        n2: usize,
        n3: usize,
        mut f: F,
    ) -> Self {
        let extent = Extent3::new(n1, n2, n3);
        let mut coefficients = Vec::with_capacity(extent.len());
        for i3 in 0..n3 {
            for i2 in 0..n2 {
                for i1 in 0..n1 {
                    coefficients.push(f(i1, i2, i3));
                }
            }
        }
        Self { extent, coefficients }
    }

    /// Build from per-sample unit eigenvectors `u`, `w` and eigenvalues
    pub fn from_eigen(
        n1: usize,
        n2: usize,
        n3: usize,
        u: &[[f32; 3]],
        w: &[[f32; 3]],
        eigenvalues: &[[f32; 3]],
    ) -> Result<Self> {
        let extent = Extent3::new(n1, n2, n3);
        for (name, len) in [("u", u.len()), ("w", w.len()), ("eigenvalues", eigenvalues.len())] {
            if len != extent.len() {
                return Err(Error::length_mismatch(extent.len(), len, name));
            }
        }
        let coefficients = u
            .iter()
            .zip(w)
            .zip(eigenvalues)
            .map(|((&u, &w), &[au, av, aw])| eigen_tensor3(u, w, au, av, aw))
            .collect();
        Ok(Self { extent, coefficients })
    }

    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    pub fn set_tensor(&mut self, i1: usize, i2: usize, i3: usize, a: [f32; 6]) {
        let k = self.extent.index(i1, i2, i3);
        self.coefficients[k] = a;
    }

    pub fn fill(&mut self, a: [f32; 6]) {
        self.coefficients.fill(a);
    }
}

impl Tensors3 for DenseTensors3 {
    #[inline]
    fn tensor(&self, i1: usize, i2: usize, i3: usize) -> [f32; 6] {
        self.coefficients[self.extent.index(i1, i2, i3)]
    }

    fn sampled_extent(&self) -> Option<Extent3> {
        Some(self.extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closures_are_tensor_fields() {
        let t2 = |i1: usize, i2: usize| [i1 as f32, 0.5, i2 as f32];
        assert_eq!(Tensors2::tensor(&t2, 3, 4), [3.0, 0.5, 4.0]);

        let t3 = |_: usize, _: usize, i3: usize| [1.0, 0.0, 0.0, 1.0, 0.0, i3 as f32];
        assert_eq!(Tensors3::tensor(&t3, 0, 0, 2)[5], 2.0);
    }

    #[test]
    fn test_eigen_tensor2_reconstructs_eigenpairs() {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let [a11, a12, a22] = eigen_tensor2([s, s], 1.0, 0.25);
        // A u = au u
        assert_relative_eq!(a11 * s + a12 * s, s, epsilon = 1e-6);
        assert_relative_eq!(a12 * s + a22 * s, s, epsilon = 1e-6);
        // A v = av v for v = (-s, s)
        assert_relative_eq!(-a11 * s + a12 * s, -0.25 * s, epsilon = 1e-6);
        assert_relative_eq!(-a12 * s + a22 * s, 0.25 * s, epsilon = 1e-6);
    }

    #[test]
    fn test_eigen_tensor3_axis_aligned() {
        let a = eigen_tensor3([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], 3.0, 2.0, 1.0);
        assert_eq!(a, [3.0, 0.0, 0.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_dense_tensors_indexing() {
        let mut d = DenseTensors2::new(3, 2);
        assert_eq!(d.tensor(2, 1), [1.0, 0.0, 1.0]);
        d.set_tensor(2, 1, [4.0, 1.0, 2.0]);
        assert_eq!(d.tensor(2, 1), [4.0, 1.0, 2.0]);
        assert_eq!(d.tensor(1, 1), [1.0, 0.0, 1.0]);

        let d3 = DenseTensors3::from_fn(2, 2, 2, |i1, i2, i3| {
            [i1 as f32, i2 as f32, i3 as f32, 0.0, 0.0, 0.0]
        });
        assert_eq!(d3.tensor(1, 0, 1)[..3], [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_tensor_extent_checks() {
        let d = DenseTensors2::new(4, 3);
        assert!(ensure_tensor_extent2(&d, Extent2::new(4, 3), "tensors").is_ok());
        assert!(matches!(
            ensure_tensor_extent2(&d, Extent2::new(5, 3), "tensors"),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(ensure_tensor_extent2(&IdentityTensors, Extent2::new(9, 9), "tensors").is_ok());

        let d3 = DenseTensors3::new(2, 3, 4);
        assert!(ensure_tensor_extent3(&d3, Extent3::new(2, 3, 5), "tensors").is_err());
        let f = |_: usize, _: usize, _: usize| [1.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        assert!(ensure_tensor_extent3(&f, Extent3::new(2, 3, 5), "tensors").is_ok());
    }

    #[test]
    fn test_dense_from_eigen_rejects_short_arrays() {
        let ones = vec![1.0; 6];
        let short = vec![0.0; 5];
        assert!(DenseTensors2::from_eigen(3, 2, &ones, &short, &ones, &ones).is_err());
        assert!(DenseTensors2::from_eigen(3, 2, &ones, &vec![0.0; 6], &ones, &ones).is_ok());

        let u = vec![[1.0, 0.0, 0.0]; 8];
        let w = vec![[0.0, 0.0, 1.0]; 7];
        let e = vec![[1.0, 1.0, 1.0]; 8];
        assert!(DenseTensors3::from_eigen(2, 2, 2, &u, &w, &e).is_err());
    }
}
