//! Dense sample grids
//!
//! Samples are stored row-major with dimension 1 varying fastest, so the
//! flat index of `(i1, i2, i3)` is `i1 + n1 * (i2 + n2 * i3)`.

use crate::{Error, Result};
use std::ops::{Index, IndexMut};

/// Extents of a 2D grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent2 {
    pub n1: usize,
    pub n2: usize,
}

impl Extent2 {
    pub fn new(n1: usize, n2: usize) -> Self {
        Self { n1, n2 }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.n1 * self.n2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, i1: usize, i2: usize) -> usize {
        i1 + self.n1 * i2
    }
}

/// Extents of a 3D grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent3 {
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
}

impl Extent3 {
    pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
        Self { n1, n2, n3 }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.n1 * self.n2 * self.n3
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of samples in one `i3` plane
    pub fn plane_len(&self) -> usize {
        self.n1 * self.n2
    }

    #[inline]
    pub fn index(&self, i1: usize, i2: usize, i3: usize) -> usize {
        i1 + self.n1 * (i2 + self.n2 * i3)
    }
}

/// A dense 2D array of `f32` samples
#[derive(Clone, Debug, PartialEq)]
pub struct Array2 {
    extent: Extent2,
    data: Vec<f32>,
}

impl Array2 {
    /// Create an array filled with zeros
    pub fn zeros(n1: usize, n2: usize) -> Self {
        Self::filled(n1, n2, 0.0)
    }

    /// Create an array filled with a constant
    pub fn filled(n1: usize, n2: usize, value: f32) -> Self {
        let extent = Extent2::new(n1, n2);
        Self {
            extent,
            data: vec![value; extent.len()],
        }
    }

    /// Wrap an existing buffer
    pub fn from_vec(n1: usize, n2: usize, data: Vec<f32>) -> Result<Self> {
        let extent = Extent2::new(n1, n2);
        if data.len() != extent.len() {
            return Err(Error::length_mismatch(extent.len(), data.len(), "Array2::from_vec"));
        }
        Ok(Self { extent, data })
    }

    /// Create an array by evaluating `f(i1, i2)` at every sample
    pub fn from_fn<F: FnMut(usize, usize) -> f32>(n1: usize, n2: usize, mut f: F) -> Self {
        let extent = Extent2::new(n1, n2);
        let mut data = Vec::with_capacity(extent.len());
        for i2 in 0..n2 {
            for i1 in 0..n1 {
                data.push(f(i1, i2));
            }
        }
        Self { extent, data }
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn n1(&self) -> usize {
        self.extent.n1
    }

    pub fn n2(&self) -> usize {
        self.extent.n2
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Overwrite all samples with those of `other`
    pub fn copy_from(&mut self, other: &Array2) -> Result<()> {
        ensure_same_extent2(self.extent, other.extent, "Array2::copy_from")?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}

impl Index<(usize, usize)> for Array2 {
    type Output = f32;

    fn index(&self, (i1, i2): (usize, usize)) -> &f32 {
        &self.data[self.extent.index(i1, i2)]
    }
}

impl IndexMut<(usize, usize)> for Array2 {
    fn index_mut(&mut self, (i1, i2): (usize, usize)) -> &mut f32 {
        let k = self.extent.index(i1, i2);
        &mut self.data[k]
    }
}

/// A dense 3D array of `f32` samples
#[derive(Clone, Debug, PartialEq)]
pub struct Array3 {
    extent: Extent3,
    data: Vec<f32>,
}

impl Array3 {
    /// Create an array filled with zeros
    pub fn zeros(n1: usize, n2: usize, n3: usize) -> Self {
        Self::filled(n1, n2, n3, 0.0)
    }

    /// Create an array filled with a constant
    pub fn filled(n1: usize, n2: usize, n3: usize, value: f32) -> Self {
        let extent = Extent3::new(n1, n2, n3);
        Self {
            extent,
            data: vec![value; extent.len()],
        }
    }

    /// Wrap an existing buffer
    pub fn from_vec(n1: usize, n2: usize, n3: usize, data: Vec<f32>) -> Result<Self> {
        let extent = Extent3::new(n1, n2, n3);
        if data.len() != extent.len() {
            return Err(Error::length_mismatch(extent.len(), data.len(), "Array3::from_vec"));
        }
        Ok(Self { extent, data })
    }

    /// Create an array by evaluating `f(i1, i2, i3)` at every sample
    pub fn from_fn<F: FnMut(usize, usize, usize) -> f32>(
        n1: usize,
        n2: usize,
        n3: usize,
        mut f: F,
    ) -> Self {
        let extent = Extent3::new(n1, n2, n3);
        let mut data = Vec::with_capacity(extent.len());
        for i3 in 0..n3 {
            for i2 in 0..n2 {
                for i1 in 0..n1 {
                    data.push(f(i1, i2, i3));
                }
            }
        }
        Self { extent, data }
    }

    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    pub fn n1(&self) -> usize {
        self.extent.n1
    }

    pub fn n2(&self) -> usize {
        self.extent.n2
    }

    pub fn n3(&self) -> usize {
        self.extent.n3
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Samples of plane `i3`
    pub fn plane(&self, i3: usize) -> &[f32] {
        let len = self.extent.plane_len();
        &self.data[i3 * len..(i3 + 1) * len]
    }

    /// Overwrite all samples with those of `other`
    pub fn copy_from(&mut self, other: &Array3) -> Result<()> {
        ensure_same_extent3(self.extent, other.extent, "Array3::copy_from")?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}

impl Index<(usize, usize, usize)> for Array3 {
    type Output = f32;

    fn index(&self, (i1, i2, i3): (usize, usize, usize)) -> &f32 {
        &self.data[self.extent.index(i1, i2, i3)]
    }
}

impl IndexMut<(usize, usize, usize)> for Array3 {
    fn index_mut(&mut self, (i1, i2, i3): (usize, usize, usize)) -> &mut f32 {
        let k = self.extent.index(i1, i2, i3);
        &mut self.data[k]
    }
}

/// Check that two 2D extents agree
pub fn ensure_same_extent2(expected: Extent2, actual: Extent2, context: &str) -> Result<()> {
    if expected != actual {
        return Err(Error::shape_mismatch(expected, actual, context));
    }
    Ok(())
}

/// Check that two 3D extents agree
pub fn ensure_same_extent3(expected: Extent3, actual: Extent3, context: &str) -> Result<()> {
    if expected != actual {
        return Err(Error::shape_mismatch(expected, actual, context));
    }
    Ok(())
}
