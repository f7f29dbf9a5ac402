//! 3×3 derivative stencil (Scharr-like weights)
//!
//! Central differences smoothed across the orthogonal axes. Only interior
//! samples are visited, so grids with fewer than 3 samples along any axis
//! produce no output.

use super::{mul2, mul3, scale_at, scaled2, scaled3};
use diffusion_core::{Extent2, Extent3, PlaneWindow, Tensors2, Tensors3};

const P2: f32 = 0.182962;
const P3: f32 = 0.174654;

pub(crate) fn apply2<T: Tensors2 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    y: &mut [f32],
    e: Extent2,
) {
    let a = 0.5 - P2;
    let b = 0.5 * P2 / a;
    let c = c * a * a;
    let n1 = e.n1;
    for i2 in 1..e.n2.saturating_sub(1) {
        let r0 = i2 * n1;
        let rm = r0 - n1;
        let rp = r0 + n1;
        for i1 in 1..n1.saturating_sub(1) {
            let (m1, p1) = (i1 - 1, i1 + 1);
            let csi = scale_at(c, s, r0 + i1);
            let dc = scaled2(d.tensor(i1, i2), csi);
            let xa = b * (x[rp + p1] - x[rm + m1]);
            let xb = b * (x[rm + p1] - x[rp + m1]);
            let x1 = x[r0 + p1] - x[r0 + m1] + xa + xb;
            let x2 = x[rp + i1] - x[rm + i1] + xa - xb;
            let (y1, y2) = mul2(dc, x1, x2);
            let ya = b * (y1 + y2);
            let yb = b * (y1 - y2);
            y[r0 + p1] += y1;
            y[r0 + m1] -= y1;
            y[rp + p1] += ya;
            y[rm + m1] -= ya;
            y[rm + p1] += yb;
            y[rp + m1] -= yb;
            y[rp + i1] += y2;
            y[rm + i1] -= y2;
        }
    }
}

/// Process plane `1 <= i3 < n3-1`; the window holds planes `i3-1..=i3+1`.
///
/// Row names follow the plane offset then the row offset: `mp` is plane
/// `i3-1`, row `i2+1`.
pub(crate) fn apply_plane<T: Tensors3 + ?Sized>(
    d: &T,
    c: f32,
    s: Option<&[f32]>,
    x: &[f32],
    e: Extent3,
    w: &mut PlaneWindow<'_>,
) {
    let a = 1.0 - 2.0 * P3;
    let b = P3;
    let aa = 0.5 * a * a;
    let ab = 0.5 * a * b;
    let bb = 0.5 * b * b;
    let i3 = w.plane();
    let (n1, plane) = (e.n1, e.plane_len());
    let (wm, w0, wp) = (w.offset(i3 - 1), w.offset(i3), w.offset(i3 + 1));
    let y = w.data_mut();
    for i2 in 1..e.n2.saturating_sub(1) {
        let xrow = |p3: usize, p2: usize| p3 * plane + p2 * n1;
        let (xmm, xm0, xmp) = (xrow(i3 - 1, i2 - 1), xrow(i3 - 1, i2), xrow(i3 - 1, i2 + 1));
        let (x0m, x00, x0p) = (xrow(i3, i2 - 1), xrow(i3, i2), xrow(i3, i2 + 1));
        let (xpm, xp0, xpp) = (xrow(i3 + 1, i2 - 1), xrow(i3 + 1, i2), xrow(i3 + 1, i2 + 1));
        let (ymm, ym0, ymp) = (wm + (i2 - 1) * n1, wm + i2 * n1, wm + (i2 + 1) * n1);
        let (y0m, y00, y0p) = (w0 + (i2 - 1) * n1, w0 + i2 * n1, w0 + (i2 + 1) * n1);
        let (ypm, yp0, ypp) = (wp + (i2 - 1) * n1, wp + i2 * n1, wp + (i2 + 1) * n1);
        for i1 in 1..n1.saturating_sub(1) {
            let (m1, p1) = (i1 - 1, i1 + 1);
            let csi = scale_at(c, s, x00 + i1);
            let dc = scaled3(d.tensor(i1, i2, i3), csi);

            let (xmmm, xmm0, xmmp) = (x[xmm + m1], x[xmm + i1], x[xmm + p1]);
            let (xm0m, xm00, xm0p) = (x[xm0 + m1], x[xm0 + i1], x[xm0 + p1]);
            let (xmpm, xmp0, xmpp) = (x[xmp + m1], x[xmp + i1], x[xmp + p1]);
            let (x0mm, x0m0, x0mp) = (x[x0m + m1], x[x0m + i1], x[x0m + p1]);
            let (x00m, x00p) = (x[x00 + m1], x[x00 + p1]);
            let (x0pm, x0p0, x0pp) = (x[x0p + m1], x[x0p + i1], x[x0p + p1]);
            let (xpmm, xpm0, xpmp) = (x[xpm + m1], x[xpm + i1], x[xpm + p1]);
            let (xp0m, xp00, xp0p) = (x[xp0 + m1], x[xp0 + i1], x[xp0 + p1]);
            let (xppm, xpp0, xppp) = (x[xpp + m1], x[xpp + i1], x[xpp + p1]);

            // aa differences
            let x00p00m = x00p - x00m;
            let x0p00m0 = x0p0 - x0m0;
            let xp00m00 = xp00 - xm00;
            // ab differences
            let xmp0mm0 = xmp0 - xmm0;
            let xpp0pm0 = xpp0 - xpm0;
            let xpm0mm0 = xpm0 - xmm0;
            let xpp0mp0 = xpp0 - xmp0;
            let xm0pm0m = xm0p - xm0m;
            let xp0pp0m = xp0p - xp0m;
            let xp0mm0m = xp0m - xm0m;
            let xp0pm0p = xp0p - xm0p;
            let x0mp0mm = x0mp - x0mm;
            let x0pp0pm = x0pp - x0pm;
            let x0pm0mm = x0pm - x0mm;
            let x0pp0mp = x0pp - x0mp;
            // bb differences
            let xpppmmm = xppp - xmmm;
            let xppmmmp = xppm - xmmp;
            let xpmpmpm = xpmp - xmpm;
            let xmpppmm = xmpp - xpmm;

            let x1 = aa * x00p00m
                + ab * (x0pp0pm + x0mp0mm + xp0pp0m + xm0pm0m)
                + bb * (xpppmmm - xppmmmp + xpmpmpm + xmpppmm);
            let x2 = aa * x0p00m0
                + ab * (x0pp0mp + x0pm0mm + xpp0pm0 + xmp0mm0)
                + bb * (xpppmmm + xppmmmp - xpmpmpm + xmpppmm);
            let x3 = aa * xp00m00
                + ab * (xp0pm0p + xp0mm0m + xpp0mp0 + xpm0mm0)
                + bb * (xpppmmm + xppmmmp + xpmpmpm - xmpppmm);
            let (y1, y2, y3) = mul3(dc, x1, x2, x3);

            let aa00p = aa * y1;
            y[y00 + p1] += aa00p;
            y[y00 + m1] -= aa00p;
            let aa0p0 = aa * y2;
            y[y0p + i1] += aa0p0;
            y[y0m + i1] -= aa0p0;
            let aap00 = aa * y3;
            y[yp0 + i1] += aap00;
            y[ym0 + i1] -= aap00;

            let ab0pp = ab * (y1 + y2);
            y[y0p + p1] += ab0pp;
            y[y0m + m1] -= ab0pp;
            let ab0mp = ab * (y1 - y2);
            y[y0m + p1] += ab0mp;
            y[y0p + m1] -= ab0mp;
            let abp0p = ab * (y1 + y3);
            y[yp0 + p1] += abp0p;
            y[ym0 + m1] -= abp0p;
            let abm0p = ab * (y1 - y3);
            y[ym0 + p1] += abm0p;
            y[yp0 + m1] -= abm0p;
            let abpp0 = ab * (y2 + y3);
            y[ypp + i1] += abpp0;
            y[ymm + i1] -= abpp0;
            let abmp0 = ab * (y2 - y3);
            y[ymp + i1] += abmp0;
            y[ypm + i1] -= abmp0;

            let bbppp = bb * (y1 + y2 + y3);
            y[ypp + p1] += bbppp;
            y[ymm + m1] -= bbppp;
            let bbmmp = bb * (y1 - y2 - y3);
            y[ymm + p1] += bbmmp;
            y[ypp + m1] -= bbmmp;
            let bbpmp = bb * (y1 - y2 + y3);
            y[ypm + p1] += bbpmp;
            y[ymp + m1] -= bbpmp;
            let bbmpp = bb * (y1 + y2 - y3);
            y[ymp + p1] += bbmpp;
            y[ypm + m1] -= bbmpp;
        }
    }
}
