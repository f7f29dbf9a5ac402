//! Per-stencil inner loops
//!
//! Each stencil module provides a 2D kernel over whole arrays and a 3D kernel
//! that processes one plane `i3` into a [`PlaneWindow`] holding exactly the
//! output planes that plane may write. All kernels accumulate into `y`.
//!
//! Arrays are flat, dimension 1 fastest. Scale factors `s`, when present,
//! have the same layout as `x`.
//!
//! [`PlaneWindow`]: diffusion_core::PlaneWindow

pub(crate) mod d22;
pub(crate) mod d24;
pub(crate) mod d33;
pub(crate) mod d71;

/// Effective scale factor at flat index `k`
#[inline(always)]
pub(crate) fn scale_at(c: f32, s: Option<&[f32]>, k: usize) -> f32 {
    match s {
        Some(s) => c * s[k],
        None => c,
    }
}

/// 2D tensor `(d11, d12, d22)` multiplied by `csi`
#[inline(always)]
pub(crate) fn scaled2(d: [f32; 3], csi: f32) -> [f32; 3] {
    [d[0] * csi, d[1] * csi, d[2] * csi]
}

/// 3D tensor `(d11, d12, d13, d22, d23, d33)` multiplied by `csi`
#[inline(always)]
pub(crate) fn scaled3(d: [f32; 6], csi: f32) -> [f32; 6] {
    [
        d[0] * csi,
        d[1] * csi,
        d[2] * csi,
        d[3] * csi,
        d[4] * csi,
        d[5] * csi,
    ]
}

/// `y = D g` for a 2D tensor
#[inline(always)]
pub(crate) fn mul2(d: [f32; 3], g1: f32, g2: f32) -> (f32, f32) {
    let [d11, d12, d22] = d;
    (d11 * g1 + d12 * g2, d12 * g1 + d22 * g2)
}

/// `y = D g` for a 3D tensor
#[inline(always)]
pub(crate) fn mul3(d: [f32; 6], g1: f32, g2: f32, g3: f32) -> (f32, f32, f32) {
    let [d11, d12, d13, d22, d23, d33] = d;
    (
        d11 * g1 + d12 * g2 + d13 * g3,
        d12 * g1 + d22 * g2 + d23 * g3,
        d13 * g1 + d23 * g2 + d33 * g3,
    )
}
