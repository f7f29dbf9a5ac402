//! Symmetric positive-definite operators for smoothing

use crate::vector::{multiply, Field};
use crate::Result;
use diffusion_core::{Array2, Array3, Tensors2, Tensors3};
use diffusion_kernel::LocalDiffusionKernel;

/// A symmetric positive-definite linear operator `y = A x`
pub trait SpdOperator<V: Field> {
    fn apply(&self, x: &V, y: &mut V) -> Result<()>;
}

/// `A = I + G'(c s D)G` for 2D arrays
pub struct DiffusionOperator2<'a, T: Tensors2 + ?Sized> {
    kernel: &'a LocalDiffusionKernel,
    d: &'a T,
    c: f32,
    s: Option<&'a Array2>,
}

impl<'a, T: Tensors2 + ?Sized> DiffusionOperator2<'a, T> {
    pub fn new(kernel: &'a LocalDiffusionKernel, d: &'a T, c: f32, s: Option<&'a Array2>) -> Self {
        Self { kernel, d, c, s }
    }
}

impl<T: Tensors2 + ?Sized> SpdOperator<Array2> for DiffusionOperator2<'_, T> {
    fn apply(&self, x: &Array2, y: &mut Array2) -> Result<()> {
        y.copy_from(x)?;
        self.kernel.apply2_with(self.d, self.c, self.s, x, y)?;
        Ok(())
    }
}

/// `A = I + G'(c s D)G` for 3D arrays
pub struct DiffusionOperator3<'a, T: Tensors3 + ?Sized> {
    kernel: &'a LocalDiffusionKernel,
    d: &'a T,
    c: f32,
    s: Option<&'a Array3>,
}

impl<'a, T: Tensors3 + ?Sized> DiffusionOperator3<'a, T> {
    pub fn new(kernel: &'a LocalDiffusionKernel, d: &'a T, c: f32, s: Option<&'a Array3>) -> Self {
        Self { kernel, d, c, s }
    }
}

impl<T: Tensors3 + ?Sized> SpdOperator<Array3> for DiffusionOperator3<'_, T> {
    fn apply(&self, x: &Array3, y: &mut Array3) -> Result<()> {
        y.copy_from(x)?;
        self.kernel.apply3_with(self.d, self.c, self.s, x, y)?;
        Ok(())
    }
}

/// Jacobi preconditioner `M = diag(A)^-1`
///
/// The diagonal is that of `I + G'DG` for the 2×2 stencil, whatever stencil
/// the operator itself uses.
#[derive(Clone, Debug)]
pub struct DiagonalPreconditioner<V: Field> {
    inverse: V,
}

impl DiagonalPreconditioner<Array2> {
    pub fn for_tensors2<T: Tensors2 + ?Sized>(d: &T, c: f32, s: Option<&Array2>, like: &Array2) -> Self {
        let (n1, n2) = (like.n1(), like.n2());
        let mut p = Array2::filled(n1, n2, 1.0);
        let c = c * 0.25;
        for i2 in 1..n2 {
            let m2 = i2 - 1;
            for i1 in 1..n1 {
                let m1 = i1 - 1;
                let csi = c * s.map_or(1.0, |s| s[(i1, i2)]);
                let [d11, d12, d22] = d.tensor(i1, i2).map(|v| v * csi);
                let along = (d11 + d12) + (d12 + d22);
                let across = (d11 - d12) + (-d12 + d22);
                p[(i1, i2)] += along;
                p[(m1, m2)] += along;
                p[(m1, i2)] += across;
                p[(i1, m2)] += across;
            }
        }
        p.as_mut_slice().iter_mut().for_each(|v| *v = 1.0 / *v);
        Self { inverse: p }
    }
}

impl DiagonalPreconditioner<Array3> {
    pub fn for_tensors3<T: Tensors3 + ?Sized>(d: &T, c: f32, s: Option<&Array3>, like: &Array3) -> Self {
        let (n1, n2, n3) = (like.n1(), like.n2(), like.n3());
        let mut p = Array3::filled(n1, n2, n3, 1.0);
        let c = c * 0.0625;
        for i3 in 1..n3 {
            let m3 = i3 - 1;
            for i2 in 1..n2 {
                let m2 = i2 - 1;
                for i1 in 1..n1 {
                    let m1 = i1 - 1;
                    let csi = c * s.map_or(1.0, |s| s[(i1, i2, i3)]);
                    let [d11, d12, d13, d22, d23, d33] = d.tensor(i1, i2, i3).map(|v| v * csi);
                    let ppp = (d11 + d12 + d13) + (d12 + d22 + d23) + (d13 + d23 + d33);
                    let pmp = (d11 - d12 + d13) + (-d12 + d22 - d23) + (d13 - d23 + d33);
                    let ppm = (d11 + d12 - d13) + (d12 + d22 - d23) + (-d13 - d23 + d33);
                    let pmm = (d11 - d12 - d13) + (-d12 + d22 + d23) + (-d13 + d23 + d33);
                    p[(i1, i2, i3)] += ppp;
                    p[(m1, m2, m3)] += ppp;
                    p[(i1, m2, i3)] += pmp;
                    p[(m1, i2, m3)] += pmp;
                    p[(i1, i2, m3)] += ppm;
                    p[(m1, m2, i3)] += ppm;
                    p[(i1, m2, m3)] += pmm;
                    p[(m1, i2, i3)] += pmm;
                }
            }
        }
        p.as_mut_slice().iter_mut().for_each(|v| *v = 1.0 / *v);
        Self { inverse: p }
    }
}

impl<V: Field> DiagonalPreconditioner<V> {
    /// The inverse diagonal
    pub fn inverse(&self) -> &V {
        &self.inverse
    }
}

impl<V: Field> SpdOperator<V> for DiagonalPreconditioner<V> {
    fn apply(&self, x: &V, y: &mut V) -> Result<()> {
        multiply(self.inverse.values(), x.values(), y.values_mut());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use diffusion_core::IdentityTensors;
    use diffusion_kernel::Stencil;

    #[test]
    fn test_preconditioner_matches_operator_diagonal_2d() {
        let kernel = LocalDiffusionKernel::new(Stencil::D22);
        let like = Array2::zeros(5, 4);
        let m = DiagonalPreconditioner::for_tensors2(&IdentityTensors, 2.0, None, &like);
        let a = DiffusionOperator2::new(&kernel, &IdentityTensors, 2.0, None);
        for (i1, i2) in [(0, 0), (2, 1), (4, 3), (3, 0)] {
            let mut e = Array2::zeros(5, 4);
            e[(i1, i2)] = 1.0;
            let mut ae = Array2::zeros(5, 4);
            a.apply(&e, &mut ae).unwrap();
            assert_relative_eq!(m.inverse()[(i1, i2)], 1.0 / ae[(i1, i2)], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_preconditioner_matches_operator_diagonal_3d() {
        let kernel = LocalDiffusionKernel::new(Stencil::D22);
        let like = Array3::zeros(4, 3, 5);
        let m = DiagonalPreconditioner::for_tensors3(&IdentityTensors, 1.5, None, &like);
        let a = DiffusionOperator3::new(&kernel, &IdentityTensors, 1.5, None);
        for (i1, i2, i3) in [(0, 0, 0), (2, 1, 3), (3, 2, 4)] {
            let mut e = Array3::zeros(4, 3, 5);
            e[(i1, i2, i3)] = 1.0;
            let mut ae = Array3::zeros(4, 3, 5);
            a.apply(&e, &mut ae).unwrap();
            assert_relative_eq!(
                m.inverse()[(i1, i2, i3)],
                1.0 / ae[(i1, i2, i3)],
                epsilon = 1e-6
            );
        }
    }
}
