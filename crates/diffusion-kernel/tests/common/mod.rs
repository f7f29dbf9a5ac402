//! Shared utilities for integration tests

#![allow(dead_code)]

use diffusion_core::{Array2, Array3, DenseTensors2, DenseTensors3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use approx::assert_relative_eq;

/// Seeded generator so failures reproduce
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random2(rng: &mut impl Rng, n1: usize, n2: usize) -> Array2 {
    Array2::from_fn(n1, n2, |_, _| rng.gen_range(-1.0..1.0))
}

pub fn random3(rng: &mut impl Rng, n1: usize, n2: usize, n3: usize) -> Array3 {
    Array3::from_fn(n1, n2, n3, |_, _, _| rng.gen_range(-1.0..1.0))
}

/// Random symmetric positive definite tensors
pub fn random_tensors2(rng: &mut impl Rng, n1: usize, n2: usize) -> DenseTensors2 {
    DenseTensors2::from_fn(n1, n2, |_, _| {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::PI);
        let au = rng.gen_range(0.01..1.0);
        let av = rng.gen_range(0.01..1.0);
        diffusion_core::eigen_tensor2([angle.cos(), angle.sin()], au, av)
    })
}

/// Random symmetric tensors with a dominant diagonal
pub fn random_tensors3(rng: &mut impl Rng, n1: usize, n2: usize, n3: usize) -> DenseTensors3 {
    DenseTensors3::from_fn(n1, n2, n3, |_, _, _| {
        let d11 = rng.gen_range(0.5..1.0);
        let d22 = rng.gen_range(0.5..1.0);
        let d33 = rng.gen_range(0.5..1.0);
        let d12 = rng.gen_range(-0.2..0.2);
        let d13 = rng.gen_range(-0.2..0.2);
        let d23 = rng.gen_range(-0.2..0.2);
        [d11, d12, d13, d22, d23, d33]
    })
}

/// Inner product accumulated in f64
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum()
}

/// Assert two dot products agree relative to the size of their terms
pub fn assert_symmetric(apq: f64, aqp: f64, scale: f64, context: &str) {
    let tolerance = 1e-4 * scale.max(1.0);
    assert!(
        (apq - aqp).abs() <= tolerance,
        "{context}: <Ap,q> = {apq} but <Aq,p> = {aqp}"
    );
}
