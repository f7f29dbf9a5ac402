//! Benchmarks for the diffusion kernels across stencils and execution strategies

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use local_diffusion::core::{eigen_tensor3, DenseTensors3};
use local_diffusion::prelude::*;

/// Smooth test field with some high-frequency content
fn generate_field(n: usize) -> Array3 {
    Array3::from_fn(n, n, n, |i1, i2, i3| {
        (i1 as f32 * 0.3).sin() + (i2 as f32 * 0.7).cos() * (i3 as f32 * 0.2).sin()
    })
}

/// Tensors that rotate slowly through the volume
fn generate_tensors(n: usize) -> DenseTensors3 {
    DenseTensors3::from_fn(n, n, n, |i1, i2, i3| {
        let a = (i1 + i2 + i3) as f32 * 0.05;
        let u = [a.cos(), a.sin(), 0.0];
        let w = [0.0, 0.0, 1.0];
        eigen_tensor3(u, w, 0.05, 1.0, 0.5)
    })
}

fn bench_stencils_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_3d");

    for &n in &[32, 64, 96] {
        let x = generate_field(n);
        let d = generate_tensors(n);
        group.throughput(Throughput::Elements((n * n * n) as u64));

        for stencil in [Stencil::D22, Stencil::D33, Stencil::D71] {
            for (label, strategy) in [
                ("sequential", ExecutionStrategy::Sequential),
                ("parallel", ExecutionStrategy::Parallel),
            ] {
                let kernel = LocalDiffusionKernel::new(stencil).with_execution(strategy);
                let mut y = Array3::zeros(n, n, n);
                group.bench_with_input(
                    BenchmarkId::new(format!("{stencil}_{label}"), n),
                    &x,
                    |b, x| {
                        b.iter(|| {
                            kernel.apply3(&d, black_box(x), &mut y).unwrap();
                            black_box(&y);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

fn bench_stencils_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_2d");

    for &n in &[256, 1024] {
        let x = Array2::from_fn(n, n, |i1, i2| ((i1 * 7 + i2 * 3) % 11) as f32);
        group.throughput(Throughput::Elements((n * n) as u64));

        for stencil in Stencil::ALL {
            let kernel = LocalDiffusionKernel::new(stencil);
            let mut y = Array2::zeros(n, n);
            group.bench_with_input(BenchmarkId::new(stencil.to_string(), n), &x, |b, x| {
                b.iter(|| {
                    kernel.apply2(&IdentityTensors, black_box(x), &mut y).unwrap();
                    black_box(&y);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_stencils_3d, bench_stencils_2d);
criterion_main!(benches);
