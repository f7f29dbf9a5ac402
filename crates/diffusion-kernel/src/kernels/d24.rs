//! 2×4 derivative stencil, 2D only
//!
//! Each derivative uses 2 samples along its own axis and 4 across it.
//! Neighbour indices beyond the grid are clamped to the nearest edge.

use super::{mul2, scale_at, scaled2};
use diffusion_core::{Extent2, Tensors2};

const P: f32 = 0.18;

pub(crate) fn apply2<T: Tensors2 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    y: &mut [f32],
    e: Extent2,
) {
    let a = 0.5 * (1.0 + P);
    let b = 0.5 * -P / a;
    let c = c * a * a;
    let (n1, n2) = (e.n1, e.n2);
    for i2 in 1..n2 {
        let rm2 = i2.saturating_sub(2) * n1;
        let rm1 = (i2 - 1) * n1;
        let rp0 = i2 * n1;
        let rp1 = (i2 + 1).min(n2 - 1) * n1;
        for i1 in 1..n1 {
            let m2 = i1.saturating_sub(2);
            let m1 = i1 - 1;
            let p0 = i1;
            let p1 = (i1 + 1).min(n1 - 1);
            let csi = scale_at(c, s, rp0 + i1);
            let dc = scaled2(d.tensor(i1, i2), csi);
            let xa = x[rp0 + p0] - x[rm1 + m1];
            let xb = x[rm1 + p0] - x[rp0 + m1];
            let x1 = xa + xb + b * (x[rp1 + p0] + x[rm2 + p0] - x[rp1 + m1] - x[rm2 + m1]);
            let x2 = xa - xb + b * (x[rp0 + p1] + x[rp0 + m2] - x[rm1 + p1] - x[rm1 + m2]);
            let (y1, y2) = mul2(dc, x1, x2);
            let ya = y1 + y2;
            let yb = y1 - y2;
            let yc = b * y1;
            let yd = b * y2;
            y[rp0 + p0] += ya;
            y[rm1 + m1] -= ya;
            y[rm1 + p0] += yb;
            y[rp0 + m1] -= yb;
            y[rp1 + p0] += yc;
            y[rm2 + m1] -= yc;
            y[rm2 + p0] += yc;
            y[rp1 + m1] -= yc;
            y[rp0 + p1] += yd;
            y[rm1 + m2] -= yd;
            y[rp0 + m2] += yd;
            y[rm1 + p1] -= yd;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffusion_core::ConstantTensors2;

    #[test]
    fn test_constant_input_has_no_response() {
        let e = Extent2::new(5, 7);
        let x = vec![-2.0; e.len()];
        let mut y = vec![0.0; e.len()];
        apply2(&ConstantTensors2::new(0.9, -0.2, 0.4), 1.0, None, &x, &mut y, e);
        assert!(y.iter().all(|&v| v.abs() < 1e-5));
    }

    #[test]
    fn test_non_square_grid_stays_in_bounds() {
        // more rows than columns exercises the row clamp
        let e = Extent2::new(2, 6);
        let x: Vec<f32> = (0..e.len()).map(|k| (k as f32).sin()).collect();
        let mut y = vec![0.0; e.len()];
        apply2(&ConstantTensors2::new(1.0, 0.0, 1.0), 1.0, None, &x, &mut y, e);
        assert!(y.iter().all(|v| v.is_finite()));
    }
}
