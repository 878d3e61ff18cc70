//! Cross-checks of batch arithmetic against plain scalar loops.
//!
//! Every test here runs the same computation twice, once through the
//! active kernel tier and once lane by lane in scalar Rust, and
//! requires bit-identical integer results. Random inputs use a fixed
//! seed so failures reproduce.

use batchly::simd::traits::{SimdBatch, SimdFloat, SimdMask};
use batchly::simd::{cast, F32s, I32s, U32s, U8s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn int32_add_store_narrow_hadd() {
    let a = I32s::from_fn(|i| (i + 1) as i32);
    let b = I32s::from_fn(|i| ((i + 1) * 10) as i32);
    let sum = a + b;

    let mut expected_hadd = 0i32;
    for i in 0..I32s::LANES {
        assert_eq!(sum.extract(i), ((i + 1) * 11) as i32);
        expected_hadd += ((i + 1) * 11) as i32;
    }
    assert_eq!(sum.hadd(), expected_hadd);

    // Narrowing store to i16: every lane is in range, so values pass
    // through unchanged.
    let mut narrow = vec![0i16; I32s::LANES];
    cast::store_converted(sum, &mut narrow);
    for i in 0..I32s::LANES {
        assert_eq!(narrow[i], ((i + 1) * 11) as i16);
    }
}

#[test]
fn float_division_by_zero_is_ieee() {
    let num = F32s::from_fn(|i| match i % 4 {
        0 => 1.0,
        1 => 2.0,
        2 => 3.0,
        _ => 4.0,
    });
    let den = F32s::from_fn(|i| match i % 4 {
        0 => 0.0,
        1 => 1.0,
        2 => 2.0,
        _ => 0.0,
    });
    let q = num / den;

    for i in (0..F32s::LANES).step_by(4) {
        assert_eq!(q.extract(i), f32::INFINITY);
        assert_eq!(q.extract(i + 1), 2.0);
        assert_eq!(q.extract(i + 2), 1.5);
        assert_eq!(q.extract(i + 3), f32::INFINITY);
    }
}

#[test]
fn wrapping_arithmetic_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let xs: Vec<i32> = (0..I32s::LANES).map(|_| rng.random()).collect();
        let ys: Vec<i32> = (0..I32s::LANES).map(|_| rng.random()).collect();
        let a = I32s::from(xs.as_slice());
        let b = I32s::from(ys.as_slice());

        let sum = a + b;
        let diff = a - b;
        let prod = a * b;
        for i in 0..I32s::LANES {
            assert_eq!(sum.extract(i), xs[i].wrapping_add(ys[i]));
            assert_eq!(diff.extract(i), xs[i].wrapping_sub(ys[i]));
            assert_eq!(prod.extract(i), xs[i].wrapping_mul(ys[i]));
        }

        // Commutativity, wraparound included.
        let flipped = b + a;
        for i in 0..I32s::LANES {
            assert_eq!(sum.extract(i), flipped.extract(i));
        }
    }
}

#[test]
fn select_obeys_full_and_empty_masks() {
    let a = U8s::from_fn(|i| i as u8);
    let b = U8s::from_fn(|i| 200 - i as u8);

    let picked_a = U8s::select(<U8s as SimdBatch>::Mask::splat(true), a, b);
    let picked_b = U8s::select(<U8s as SimdBatch>::Mask::splat(false), a, b);
    for i in 0..U8s::LANES {
        assert_eq!(picked_a.extract(i), a.extract(i));
        assert_eq!(picked_b.extract(i), b.extract(i));
    }
}

#[test]
fn unsigned_compare_straddles_the_sign_bit() {
    let a = U32s::splat(0x7FFF_FFFF);
    let b = U32s::splat(0x8000_0000);
    assert!(a.simd_lt(b).all());
    assert!(!b.simd_lt(a).any());

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let xs: Vec<u32> = (0..U32s::LANES).map(|_| rng.random()).collect();
        let ys: Vec<u32> = (0..U32s::LANES).map(|_| rng.random()).collect();
        let lt = U32s::from(xs.as_slice()).simd_lt(U32s::from(ys.as_slice()));
        for i in 0..U32s::LANES {
            assert_eq!(lt.extract(i), xs[i] < ys[i]);
        }
    }
}

#[test]
fn float_reductions_and_nan_probes() {
    assert_eq!(F32s::splat(0.0).hadd(), 0.0);
    assert_eq!(I32s::splat(1).hadd(), I32s::LANES as i32);

    let x = F32s::from_fn(|i| if i == 1 { f32::NAN } else { i as f32 });
    let nan_lanes = x.is_nan();
    for i in 0..F32s::LANES {
        assert_eq!(nan_lanes.extract(i), i == 1);
    }
    assert!(!F32s::splat(f32::INFINITY).is_nan().any());
}

#[test]
fn fma_matches_mul_add() {
    let mut rng = StdRng::seed_from_u64(11);
    let xs: Vec<f32> = (0..F32s::LANES).map(|_| rng.random_range(-8.0..8.0)).collect();
    let ys: Vec<f32> = (0..F32s::LANES).map(|_| rng.random_range(-8.0..8.0)).collect();
    let zs: Vec<f32> = (0..F32s::LANES).map(|_| rng.random_range(-8.0..8.0)).collect();

    let x = F32s::from(xs.as_slice());
    let y = F32s::from(ys.as_slice());
    let z = F32s::from(zs.as_slice());

    // Fused and two-step results agree to a ulp-scale tolerance; the
    // sign structure of all four variants must match exactly.
    let fma = x.fma(y, z);
    let fnms = x.fnms(y, z);
    for i in 0..F32s::LANES {
        let exact = xs[i].mul_add(ys[i], zs[i]);
        assert!((fma.extract(i) - exact).abs() <= 1e-4 * exact.abs().max(1.0));
        assert!((fnms.extract(i) + exact).abs() <= 1e-4 * exact.abs().max(1.0));
    }
}
