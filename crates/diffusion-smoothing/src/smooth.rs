//! Direct smoothing filters that need no iterative solve

use diffusion_core::{Array2, Array3, Error as CoreError};

use crate::Result;

/// Solve the tridiagonal system `(I + G'DG) y = x` for a 1D array
///
/// All tensors are scalar ones, so the sub-diagonal is `-c` or, with scale
/// factors, `-c (s[i] + s[i-1]) / 2`.
pub(crate) fn solve_tridiagonal(c: f32, s: Option<&[f32]>, x: &[f32], y: &mut [f32]) -> Result<()> {
    let n = x.len();
    if y.len() != n {
        return Err(CoreError::length_mismatch(n, y.len(), "smoothing output").into());
    }
    if let Some(s) = s {
        if s.len() != n {
            return Err(CoreError::length_mismatch(n, s.len(), "smoothing scale factors").into());
        }
    }
    if n == 0 {
        return Ok(());
    }

    // sub-diagonal with e[0] = e[n] = 0
    let mut e = vec![0.0_f32; n + 1];
    match s {
        Some(s) => {
            let c = -0.5 * c;
            for i in 1..n {
                e[i] = c * (s[i] + s[i - 1]);
            }
        }
        None => e[1..n].fill(-c),
    }

    // forward elimination; w reuses e
    let mut t = 1.0 - e[0] - e[1];
    y[0] = x[0] / t;
    for i in 1..n {
        let di = 1.0 - e[i] - e[i + 1];
        let ei = e[i];
        e[i] = ei / t;
        t = di - ei * e[i];
        y[i] = (x[i] - ei * y[i - 1]) / t;
    }
    for i in (1..n).rev() {
        y[i - 1] -= e[i] * y[i];
    }
    Ok(())
}

/// 3×3 weighted average with edge samples repeated
pub(crate) fn smooth_s2(x: &Array2, y: &mut Array2) -> Result<()> {
    diffusion_core::ensure_same_extent2(x.extent(), y.extent(), "smoothing output")?;
    let (n1, n2) = (x.n1(), x.n2());
    for i2 in 0..n2 {
        let i2m = i2.saturating_sub(1);
        let i2p = (i2 + 1).min(n2 - 1);
        for i1 in 0..n1 {
            let i1m = i1.saturating_sub(1);
            let i1p = (i1 + 1).min(n1 - 1);
            y[(i1, i2)] = 0.2500 * x[(i1, i2)]
                + 0.1250 * (x[(i1m, i2)] + x[(i1p, i2)] + x[(i1, i2m)] + x[(i1, i2p)])
                + 0.0625 * (x[(i1m, i2m)] + x[(i1p, i2m)] + x[(i1m, i2p)] + x[(i1p, i2p)]);
        }
    }
    Ok(())
}

/// 3×3×3 weighted average with edge samples repeated
pub(crate) fn smooth_s3(x: &Array3, y: &mut Array3) -> Result<()> {
    diffusion_core::ensure_same_extent3(x.extent(), y.extent(), "smoothing output")?;
    let (n1, n2, n3) = (x.n1(), x.n2(), x.n3());
    let v = |j1: usize, j2: usize, j3: usize| x[(j1, j2, j3)];
    for i3 in 0..n3 {
        let (m3, p3) = (i3.saturating_sub(1), (i3 + 1).min(n3 - 1));
        for i2 in 0..n2 {
            let (m2, p2) = (i2.saturating_sub(1), (i2 + 1).min(n2 - 1));
            for i1 in 0..n1 {
                let (m1, p1) = (i1.saturating_sub(1), (i1 + 1).min(n1 - 1));
                y[(i1, i2, i3)] = 0.125000 * v(i1, i2, i3)
                    + 0.062500
                        * (v(m1, i2, i3)
                            + v(p1, i2, i3)
                            + v(i1, m2, i3)
                            + v(i1, p2, i3)
                            + v(i1, i2, m3)
                            + v(i1, i2, p3))
                    + 0.031250
                        * (v(m1, i2, m3)
                            + v(p1, i2, m3)
                            + v(i1, m2, m3)
                            + v(i1, p2, m3)
                            + v(m1, m2, i3)
                            + v(p1, m2, i3)
                            + v(m1, p2, i3)
                            + v(p1, p2, i3)
                            + v(m1, i2, p3)
                            + v(p1, i2, p3)
                            + v(i1, m2, p3)
                            + v(i1, p2, p3))
                    + 0.015625
                        * (v(m1, m2, m3)
                            + v(p1, m2, m3)
                            + v(m1, p2, m3)
                            + v(p1, p2, m3)
                            + v(m1, m2, p3)
                            + v(p1, m2, p3)
                            + v(m1, p2, p3)
                            + v(p1, p2, p3));
            }
        }
    }
    Ok(())
}
