//! 2×2 derivative stencil
//!
//! Derivatives are averaged over the corners of each 2×2 (2×2×2) cell, so
//! cell `(i1, i2)` couples samples `i1-1..=i1` and `i2-1..=i2`.

use super::{mul2, mul3, scale_at, scaled2, scaled3};
use diffusion_core::{Extent2, Extent3, PlaneWindow, Tensors2, Tensors3};

pub(crate) fn apply2<T: Tensors2 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    y: &mut [f32],
    e: Extent2,
) {
    let c = c * 0.25;
    let n1 = e.n1;
    for i2 in 1..e.n2 {
        let r0 = i2 * n1;
        let rm = r0 - n1;
        for i1 in 1..n1 {
            let m1 = i1 - 1;
            let csi = scale_at(c, s, r0 + i1);
            let dc = scaled2(d.tensor(i1, i2), csi);
            let xa = x[r0 + i1] - x[rm + m1];
            let xb = x[r0 + m1] - x[rm + i1];
            let x1 = xa - xb;
            let x2 = xa + xb;
            let (y1, y2) = mul2(dc, x1, x2);
            let ya = y1 + y2;
            let yb = y1 - y2;
            y[r0 + i1] += ya;
            y[r0 + m1] -= yb;
            y[rm + i1] += yb;
            y[rm + m1] -= ya;
        }
    }
}

/// Process plane `i3 >= 1`; the window holds planes `i3-1` and `i3`.
pub(crate) fn apply_plane<T: Tensors3 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    e: Extent3,
    w: &mut PlaneWindow<'_>,
) {
    let c = c * 0.0625;
    let i3 = w.plane();
    let (n1, plane) = (e.n1, e.plane_len());
    let (w0, wm) = (w.offset(i3), w.offset(i3 - 1));
    let y = w.data_mut();
    for i2 in 1..e.n2 {
        // x rows
        let x00 = i3 * plane + i2 * n1;
        let x0m = x00 - n1;
        let xm0 = x00 - plane;
        let xmm = xm0 - n1;
        // y rows, relative to the window
        let y00 = w0 + i2 * n1;
        let y0m = y00 - n1;
        let ym0 = wm + i2 * n1;
        let ymm = ym0 - n1;
        for i1 in 1..n1 {
            let m1 = i1 - 1;
            let csi = scale_at(c, s, x00 + i1);
            let dc = scaled3(d.tensor(i1, i2, i3), csi);
            let xa = x[x00 + i1] - x[xmm + m1];
            let xb = x[x00 + m1] - x[xmm + i1];
            let xc = x[x0m + i1] - x[xm0 + m1];
            let xd = x[xm0 + i1] - x[x0m + m1];
            let x1 = xa - xb + xc + xd;
            let x2 = xa + xb - xc + xd;
            let x3 = xa + xb + xc - xd;
            let (y1, y2, y3) = mul3(dc, x1, x2, x3);
            let ya = y1 + y2 + y3;
            y[y00 + i1] += ya;
            y[ymm + m1] -= ya;
            let yb = y1 - y2 + y3;
            y[y0m + i1] += yb;
            y[ym0 + m1] -= yb;
            let yc = y1 + y2 - y3;
            y[ym0 + i1] += yc;
            y[y0m + m1] -= yc;
            let yd = y1 - y2 - y3;
            y[ymm + i1] += yd;
            y[y00 + m1] -= yd;
        }
    }
}
