//! Plane schedules and write windows for 3D kernels
//!
//! A 3D kernel visits planes `i3` in `[start, stop)`. Processing plane `i3`
//! writes the output planes `[i3 - below, i3 + above]`, clipped to the grid.
//! Planes are grouped into `step` passes; pass `p` visits
//! `start + p, start + p + step, ...`. With `step >= below + above + 1` the
//! write windows of one pass never overlap, so a pass may be processed in any
//! order or concurrently.

use crate::{Error, Result};
use std::ops::Range;

/// Which planes a 3D kernel visits and which planes each visit writes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneSchedule {
    /// First plane visited
    pub start: usize,
    /// Stride between planes of one pass, and the number of passes
    pub step: usize,
    /// One past the last plane visited
    pub stop: usize,
    /// Planes written below the visited plane
    pub below: usize,
    /// Planes written above the visited plane
    pub above: usize,
}

impl PlaneSchedule {
    /// Number of consecutive planes one visit may write
    pub fn footprint(&self) -> usize {
        self.below + self.above + 1
    }

    /// Check that windows of one pass are disjoint
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(Error::InvalidSchedule("plane step must be positive".to_string()));
        }
        if self.step < self.footprint() {
            return Err(Error::InvalidSchedule(format!(
                "plane step {} is smaller than the write footprint {}",
                self.step,
                self.footprint()
            )));
        }
        Ok(())
    }

    /// Planes visited in pass `pass`, in increasing order
    pub fn pass(&self, pass: usize) -> impl Iterator<Item = usize> {
        (self.start + pass..self.stop).step_by(self.step.max(1))
    }

    /// All visited planes, pass by pass
    pub fn visit_order(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.step).flat_map(move |p| self.pass(p))
    }

    /// Output planes written when visiting plane `i3` of a grid with `n3` planes
    pub fn window(&self, i3: usize, n3: usize) -> Range<usize> {
        let first = i3.saturating_sub(self.below);
        let end = (i3 + self.above + 1).min(n3);
        first..end
    }
}

/// The output planes one plane visit may write
///
/// Holds a mutable view of `len` consecutive planes starting at plane
/// `first`. Samples are addressed with global plane indices.
#[derive(Debug)]
pub struct PlaneWindow<'a> {
    plane: usize,
    first: usize,
    plane_len: usize,
    data: &'a mut [f32],
}

impl<'a> PlaneWindow<'a> {
    /// Wrap planes `first..` of some output array
    pub fn new(plane: usize, first: usize, plane_len: usize, data: &'a mut [f32]) -> Self {
        Self {
            plane,
            first,
            plane_len,
            data,
        }
    }

    /// The plane being visited
    pub fn plane(&self) -> usize {
        self.plane
    }

    /// Global index of the first writable plane
    pub fn first(&self) -> usize {
        self.first
    }

    /// Global planes covered by this window
    pub fn planes(&self) -> Range<usize> {
        let n = if self.plane_len == 0 {
            0
        } else {
            self.data.len() / self.plane_len
        };
        self.first..self.first + n
    }

    /// Offset into [`Self::data_mut`] of the start of global plane `i3`
    #[inline]
    pub fn offset(&self, i3: usize) -> usize {
        debug_assert!(i3 >= self.first, "plane {i3} below window start {}", self.first);
        (i3 - self.first) * self.plane_len
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut *self.data
    }
}

/// Carve the write windows of `planes` out of `y`
///
/// `planes` must be increasing with disjoint windows; a violation is reported
/// as an error rather than producing aliased views.
pub fn split_windows<'a>(
    y: &'a mut [f32],
    plane_len: usize,
    n3: usize,
    schedule: &PlaneSchedule,
    planes: &[usize],
) -> Result<Vec<PlaneWindow<'a>>> {
    let mut windows = Vec::with_capacity(planes.len());
    let mut rest: &'a mut [f32] = y;
    let mut offset = 0;
    for &i3 in planes {
        let window = schedule.window(i3, n3);
        if window.start < offset {
            return Err(Error::InvalidSchedule(format!(
                "write window {window:?} of plane {i3} overlaps planes already handed out (< {offset})"
            )));
        }
        let skip = (window.start - offset) * plane_len;
        let len = window.len() * plane_len;
        if skip + len > rest.len() {
            return Err(Error::length_mismatch(
                n3 * plane_len,
                (offset * plane_len) + rest.len(),
                "plane window",
            ));
        }
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(skip);
        let (head, tail) = tail.split_at_mut(len);
        windows.push(PlaneWindow::new(i3, window.start, plane_len, head));
        rest = tail;
        offset = window.end;
    }
    Ok(windows)
}
