//! Finite-difference stencils and their 3D plane footprints

use diffusion_core::PlaneSchedule;
use std::fmt;

/// The stencil used to approximate derivatives in `G`
///
/// In each name the first digit is the number of samples along the
/// derivative and the second the number of samples across it. The stencil
/// of `G'DG` is larger: a 2×2 derivative implies a 3×3 operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Stencil {
    /// 2×2 cell averages; 4 taps in 2D, 8 in 3D
    #[default]
    D22,
    /// 2×4 stencil tuned for high anisotropy; 2D only
    D24,
    /// 3×3 Scharr-like stencil; 6 taps in 2D, 18 in 3D
    D33,
    /// 7-tap antisymmetric differences along each axis
    D71,
}

impl Stencil {
    pub const ALL: [Stencil; 4] = [Stencil::D22, Stencil::D24, Stencil::D33, Stencil::D71];

    /// Whether the stencil is implemented for arrays of rank `dims`
    pub fn supports(self, dims: usize) -> bool {
        match dims {
            2 => true,
            3 => !matches!(self, Stencil::D24),
            _ => false,
        }
    }

    /// Plane schedule for a 3D array with `n3` planes
    ///
    /// Returns `None` for stencils without a 3D kernel. The stride equals the
    /// write footprint, so planes of one pass never share output planes.
    pub fn schedule(self, n3: usize) -> Option<PlaneSchedule> {
        let (start, step, stop, below, above) = match self {
            Stencil::D22 => (1, 2, n3, 1, 0),
            Stencil::D24 => return None,
            Stencil::D33 => (1, 3, n3.saturating_sub(1), 1, 1),
            Stencil::D71 => (0, 7, n3, 3, 3),
        };
        Some(PlaneSchedule {
            start,
            step,
            stop,
            below,
            above,
        })
    }
}

impl fmt::Display for Stencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stencil::D22 => "D22",
            Stencil::D24 => "D24",
            Stencil::D33 => "D33",
            Stencil::D71 => "D71",
        };
        f.write_str(name)
    }
}
