//! Operator-level properties of every stencil

mod common;

use common::*;
use diffusion_core::{Array2, Array3, ConstantTensors2, ConstantTensors3, IdentityTensors};
use diffusion_kernel::{LocalDiffusionKernel, Stencil};
use proptest::prelude::*;

const STENCILS_3D: [Stencil; 3] = [Stencil::D22, Stencil::D33, Stencil::D71];

fn apply2(kernel: &LocalDiffusionKernel, d: &diffusion_core::DenseTensors2, x: &Array2) -> Array2 {
    let mut y = Array2::zeros(x.n1(), x.n2());
    kernel.apply2(d, x, &mut y).unwrap();
    y
}

fn apply3(kernel: &LocalDiffusionKernel, d: &diffusion_core::DenseTensors3, x: &Array3) -> Array3 {
    let mut y = Array3::zeros(x.n1(), x.n2(), x.n3());
    kernel.apply3(d, x, &mut y).unwrap();
    y
}

#[test]
fn test_self_adjoint_2d() {
    let mut rng = rng(7);
    for (n1, n2) in [(9, 11), (4, 13), (17, 5)] {
        let d = random_tensors2(&mut rng, n1, n2);
        let p = random2(&mut rng, n1, n2);
        let q = random2(&mut rng, n1, n2);
        for stencil in Stencil::ALL {
            let kernel = LocalDiffusionKernel::new(stencil);
            let ap = apply2(&kernel, &d, &p);
            let aq = apply2(&kernel, &d, &q);
            let apq = dot(ap.as_slice(), q.as_slice());
            let aqp = dot(aq.as_slice(), p.as_slice());
            assert_symmetric(apq, aqp, apq.abs(), &format!("{stencil} {n1}x{n2}"));
        }
    }
}

#[test]
fn test_self_adjoint_3d() {
    let mut rng = rng(11);
    for (n1, n2, n3) in [(7, 6, 9), (5, 8, 4), (6, 5, 15)] {
        let d = random_tensors3(&mut rng, n1, n2, n3);
        let p = random3(&mut rng, n1, n2, n3);
        let q = random3(&mut rng, n1, n2, n3);
        for stencil in STENCILS_3D {
            let kernel = LocalDiffusionKernel::new(stencil);
            let ap = apply3(&kernel, &d, &p);
            let aq = apply3(&kernel, &d, &q);
            let apq = dot(ap.as_slice(), q.as_slice());
            let aqp = dot(aq.as_slice(), p.as_slice());
            assert_symmetric(apq, aqp, apq.abs(), &format!("{stencil} {n1}x{n2}x{n3}"));
        }
    }
}

#[test]
fn test_operator_is_non_negative() {
    // <G'DG x, x> = <DGx, Gx> >= 0 for positive semi-definite D
    let mut rng = rng(3);
    let d = random_tensors2(&mut rng, 12, 10);
    for stencil in Stencil::ALL {
        let kernel = LocalDiffusionKernel::new(stencil);
        let x = random2(&mut rng, 12, 10);
        let ax = apply2(&kernel, &d, &x);
        assert!(dot(ax.as_slice(), x.as_slice()) >= -1e-5, "{stencil}");
    }
}

#[test]
fn test_zero_tensors_leave_output_unchanged() {
    let mut rng = rng(5);
    let x2 = random2(&mut rng, 8, 9);
    let y2 = random2(&mut rng, 8, 9);
    for stencil in Stencil::ALL {
        let mut y = y2.clone();
        LocalDiffusionKernel::new(stencil)
            .apply2(&ConstantTensors2::new(0.0, 0.0, 0.0), &x2, &mut y)
            .unwrap();
        assert_eq!(y, y2, "{stencil}");
    }

    let x3 = random3(&mut rng, 6, 5, 8);
    let y3 = random3(&mut rng, 6, 5, 8);
    for stencil in STENCILS_3D {
        let mut y = y3.clone();
        LocalDiffusionKernel::new(stencil)
            .apply3_scaled(&ConstantTensors3([0.0; 6]), 4.0, &x3, &mut y)
            .unwrap();
        assert_eq!(y, y3, "{stencil}");
    }
}

#[test]
fn test_impulse_response_d22() {
    let mut x = Array2::zeros(5, 5);
    x[(2, 2)] = 1.0;
    let mut y = Array2::zeros(5, 5);
    LocalDiffusionKernel::new(Stencil::D22)
        .apply2(&IdentityTensors, &x, &mut y)
        .unwrap();

    for i2 in 0..5 {
        for i1 in 0..5 {
            let expected = match (i1, i2) {
                (2, 2) => 2.0,
                (1, 1) | (3, 1) | (1, 3) | (3, 3) => -0.5,
                _ => 0.0,
            };
            assert_relative_eq!(y[(i1, i2)], expected, epsilon = 1e-6);
            assert_relative_eq!(y[(i1, i2)], y[(4 - i1, 4 - i2)], epsilon = 1e-6);
        }
    }
}

#[test]
fn test_isotropic_matches_identity_tensors() {
    let mut rng = rng(13);
    let x = random3(&mut rng, 5, 6, 7);
    for stencil in STENCILS_3D {
        let kernel = LocalDiffusionKernel::new(stencil);
        let mut a = Array3::zeros(5, 6, 7);
        let mut b = Array3::zeros(5, 6, 7);
        kernel.apply3_isotropic(0.5, &x, &mut a).unwrap();
        kernel.apply3_scaled(&IdentityTensors, 0.5, &x, &mut b).unwrap();
        assert_eq!(a, b, "{stencil}");
    }
}

#[test]
fn test_thin_3d_grids_are_untouched() {
    let cases = [(Stencil::D22, 1), (Stencil::D33, 2), (Stencil::D33, 1)];
    for (stencil, n3) in cases {
        let x = Array3::from_fn(4, 4, n3, |i1, i2, _| (i1 * i2) as f32);
        let mut y = Array3::filled(4, 4, n3, 1.5);
        LocalDiffusionKernel::new(stencil)
            .apply3(&IdentityTensors, &x, &mut y)
            .unwrap();
        assert!(y.as_slice().iter().all(|&v| v == 1.5), "{stencil} n3={n3}");
    }
}

#[test]
fn test_3d_kernel_matches_2d_on_constant_planes() {
    // x independent of i3 has no gradient along axis 3, so every interior
    // plane of the 3D D71 response equals the 2D response.
    let mut rng = rng(17);
    let x2 = random2(&mut rng, 7, 6);
    let x3 = Array3::from_fn(7, 6, 5, |i1, i2, _| x2[(i1, i2)]);
    let kernel = LocalDiffusionKernel::new(Stencil::D71);
    let mut y2 = Array2::zeros(7, 6);
    kernel.apply2(&IdentityTensors, &x2, &mut y2).unwrap();
    let mut y3 = Array3::zeros(7, 6, 5);
    kernel.apply3(&IdentityTensors, &x3, &mut y3).unwrap();
    for i2 in 0..6 {
        for i1 in 0..7 {
            assert_relative_eq!(y3[(i1, i2, 2)], y2[(i1, i2)], epsilon = 1e-5);
        }
    }
}

proptest! {
    #[test]
    fn prop_self_adjoint_any_extent(
        n1 in 1usize..12,
        n2 in 1usize..12,
        seed in 0u64..1000,
        stencil_index in 0usize..4,
    ) {
        let stencil = Stencil::ALL[stencil_index];
        let mut rng = rng(seed);
        let d = random_tensors2(&mut rng, n1, n2);
        let p = random2(&mut rng, n1, n2);
        let q = random2(&mut rng, n1, n2);
        let kernel = LocalDiffusionKernel::new(stencil);
        let apq = dot(apply2(&kernel, &d, &p).as_slice(), q.as_slice());
        let aqp = dot(apply2(&kernel, &d, &q).as_slice(), p.as_slice());
        prop_assert!((apq - aqp).abs() <= 1e-4 * apq.abs().max(1.0));
    }

    #[test]
    fn prop_constant_input_is_annihilated(
        value in -10.0f32..10.0,
        n3 in 1usize..10,
        stencil_index in 0usize..3,
    ) {
        let stencil = STENCILS_3D[stencil_index];
        let x = Array3::filled(6, 5, n3, value);
        let mut y = Array3::zeros(6, 5, n3);
        LocalDiffusionKernel::new(stencil)
            .apply3(&ConstantTensors3::new(1.0, 0.3, 0.1, 0.8, -0.2, 0.6), &x, &mut y)
            .unwrap();
        prop_assert!(y.as_slice().iter().all(|v| v.abs() < 1e-4));
    }
}
