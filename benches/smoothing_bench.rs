//! Benchmarks for conjugate-gradient smoothing with and without preconditioning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use local_diffusion::core::ConstantTensors2;
use local_diffusion::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

fn generate_noise2(n: usize) -> Array2 {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let normal = Normal::new(0.0_f32, 1.0).unwrap();
    Array2::from_fn(n, n, |_, _| normal.sample(&mut rng))
}

fn generate_noise3(n: usize) -> Array3 {
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    let normal = Normal::new(0.0_f32, 1.0).unwrap();
    Array3::from_fn(n, n, n, |_, _, _| normal.sample(&mut rng))
}

fn bench_smoothing_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing_2d");
    let d = ConstantTensors2::from_eigen([0.8, 0.6], 0.1, 1.0);

    for &n in &[128, 512] {
        let x = generate_noise2(n);
        for preconditioned in [false, true] {
            let filter = LocalSmoothingFilter::new().with_preconditioner(preconditioned);
            let mut y = Array2::zeros(n, n);
            let label = if preconditioned { "jacobi" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(label, n), &x, |b, x| {
                b.iter(|| black_box(filter.apply2(&d, 10.0, None, black_box(x), &mut y).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_smoothing_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing_3d");
    group.sample_size(10);

    for &n in &[32, 64] {
        let x = generate_noise3(n);
        for stencil in [Stencil::D22, Stencil::D71] {
            let filter = LocalSmoothingFilter::new().with_kernel(LocalDiffusionKernel::new(stencil));
            let mut y = Array3::zeros(n, n, n);
            group.bench_with_input(BenchmarkId::new(stencil.to_string(), n), &x, |b, x| {
                b.iter(|| {
                    black_box(
                        filter
                            .apply3(&IdentityTensors, 4.0, None, black_box(x), &mut y)
                            .unwrap(),
                    )
                });
            });
        }
    }

    group.finish();
}

fn bench_tridiagonal(c: &mut Criterion) {
    let x: Vec<f32> = (0..1 << 16).map(|i| ((i * 13) % 17) as f32).collect();
    let mut y = vec![0.0; x.len()];
    let filter = LocalSmoothingFilter::new();
    c.bench_function("smoothing_1d_65536", |b| {
        b.iter(|| filter.apply1(8.0, None, black_box(&x), &mut y).unwrap());
    });
}

criterion_group!(benches, bench_smoothing_2d, bench_smoothing_3d, bench_tridiagonal);
criterion_main!(benches);
