//! 7×1 derivative stencil
//!
//! Antisymmetric 7-tap differences along each axis, no smoothing across
//! axes. Every sample is visited; taps beyond the grid are clamped to the
//! nearest edge sample.

use super::{mul2, mul3, scale_at, scaled2, scaled3};
use diffusion_core::{Extent2, Extent3, PlaneWindow, Tensors2, Tensors3};

const C1: f32 = 0.830893;
const C2: f32 = -0.227266;
const C3: f32 = 0.042877;
const TAPS: [f32; 3] = [C1, C2, C3];

/// Indices `[i-3, i-2, i-1]` and `[i+1, i+2, i+3]` clamped to `[0, n)`
#[inline(always)]
fn neighbours(i: usize, n: usize) -> ([usize; 3], [usize; 3]) {
    let last = n - 1;
    (
        [i.saturating_sub(1), i.saturating_sub(2), i.saturating_sub(3)],
        [(i + 1).min(last), (i + 2).min(last), (i + 3).min(last)],
    )
}

pub(crate) fn apply2<T: Tensors2 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    y: &mut [f32],
    e: Extent2,
) {
    let (n1, n2) = (e.n1, e.n2);
    for i2 in 0..n2 {
        let (m2, p2) = neighbours(i2, n2);
        let r0 = i2 * n1;
        for i1 in 0..n1 {
            let (m1, p1) = neighbours(i1, n1);
            let csi = scale_at(c, s, r0 + i1);
            let dc = scaled2(d.tensor(i1, i2), csi);
            let mut x1 = 0.0;
            let mut x2 = 0.0;
            for k in 0..3 {
                x1 += TAPS[k] * (x[r0 + p1[k]] - x[r0 + m1[k]]);
            }
            for k in 0..3 {
                x2 += TAPS[k] * (x[p2[k] * n1 + i1] - x[m2[k] * n1 + i1]);
            }
            let (y1, y2) = mul2(dc, x1, x2);
            for k in 0..3 {
                let cy1 = TAPS[k] * y1;
                y[r0 + p1[k]] += cy1;
                y[r0 + m1[k]] -= cy1;
            }
            for k in 0..3 {
                let cy2 = TAPS[k] * y2;
                y[p2[k] * n1 + i1] += cy2;
                y[m2[k] * n1 + i1] -= cy2;
            }
        }
    }
}

/// Process plane `i3`; the window holds planes `i3-3..=i3+3` clipped to the grid.
pub(crate) fn apply_plane<T: Tensors3 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    e: Extent3,
    w: &mut PlaneWindow<'_>,
) {
    let i3 = w.plane();
    let (n1, n2, plane) = (e.n1, e.n2, e.plane_len());
    let (m3, p3) = neighbours(i3, e.n3);
    let w0 = w.offset(i3);
    let wm3 = m3.map(|j| w.offset(j));
    let wp3 = p3.map(|j| w.offset(j));
    let x0 = i3 * plane;
    let y = w.data_mut();
    for i2 in 0..n2 {
        let (m2, p2) = neighbours(i2, n2);
        let r0 = i2 * n1;
        for i1 in 0..n1 {
            let (m1, p1) = neighbours(i1, n1);
            let csi = scale_at(c, s, x0 + r0 + i1);
            let dc = scaled3(d.tensor(i1, i2, i3), csi);
            let (mut x1, mut x2, mut x3) = (0.0, 0.0, 0.0);
            for k in 0..3 {
                x1 += TAPS[k] * (x[x0 + r0 + p1[k]] - x[x0 + r0 + m1[k]]);
            }
            for k in 0..3 {
                x2 += TAPS[k] * (x[x0 + p2[k] * n1 + i1] - x[x0 + m2[k] * n1 + i1]);
            }
            for k in 0..3 {
                x3 += TAPS[k] * (x[p3[k] * plane + r0 + i1] - x[m3[k] * plane + r0 + i1]);
            }
            let (y1, y2, y3) = mul3(dc, x1, x2, x3);
            for k in 0..3 {
                let cy1 = TAPS[k] * y1;
                y[w0 + r0 + p1[k]] += cy1;
                y[w0 + r0 + m1[k]] -= cy1;
            }
            for k in 0..3 {
                let cy2 = TAPS[k] * y2;
                y[w0 + p2[k] * n1 + i1] += cy2;
                y[w0 + m2[k] * n1 + i1] -= cy2;
            }
            for k in 0..3 {
                let cy3 = TAPS[k] * y3;
                y[wp3[k] + r0 + i1] += cy3;
                y[wm3[k] + r0 + i1] -= cy3;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffusion_core::IdentityTensors;

    #[test]
    fn test_neighbours_clamp_at_edges() {
        assert_eq!(neighbours(0, 5), ([0, 0, 0], [1, 2, 3]));
        assert_eq!(neighbours(4, 5), ([3, 2, 1], [4, 4, 4]));
        assert_eq!(neighbours(0, 1), ([0, 0, 0], [0, 0, 0]));
    }

    #[test]
    fn test_single_sample_grid_is_untouched() {
        let e = Extent2::new(1, 1);
        let mut y = vec![4.0];
        apply2(&IdentityTensors, 1.0, None, &[7.0], &mut y, e);
        assert_eq!(y, vec![4.0]);
    }
}
