//! Complex batch arithmetic cross-checked against scalar complex math.

use batchly::simd::complex::Complex;
use batchly::simd::traits::SimdBatch;
use batchly::simd::{F32s, F64s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn interleaved_round_trip() {
    let src: Vec<f32> = (0..2 * F32s::LANES).map(|i| i as f32 * 0.5).collect();
    let z = Complex::<F32s>::load_complex(&src);

    for i in 0..F32s::LANES {
        assert_eq!(z.re.extract(i), (2 * i) as f32 * 0.5);
        assert_eq!(z.im.extract(i), (2 * i + 1) as f32 * 0.5);
    }

    let mut dst = vec![0.0f32; 2 * F32s::LANES];
    z.store_complex(&mut dst);
    assert_eq!(src, dst);
}

#[test]
fn product_matches_scalar_complex_algebra() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let a_re: Vec<f64> = (0..F64s::LANES).map(|_| rng.random_range(-4.0..4.0)).collect();
        let a_im: Vec<f64> = (0..F64s::LANES).map(|_| rng.random_range(-4.0..4.0)).collect();
        let b_re: Vec<f64> = (0..F64s::LANES).map(|_| rng.random_range(-4.0..4.0)).collect();
        let b_im: Vec<f64> = (0..F64s::LANES).map(|_| rng.random_range(-4.0..4.0)).collect();

        let a = Complex::<F64s>::new(F64s::from(a_re.as_slice()), F64s::from(a_im.as_slice()));
        let b = Complex::<F64s>::new(F64s::from(b_re.as_slice()), F64s::from(b_im.as_slice()));
        let prod = a * b;

        for i in 0..F64s::LANES {
            let re = a_re[i] * b_re[i] - a_im[i] * b_im[i];
            let im = a_re[i] * b_im[i] + a_im[i] * b_re[i];
            // Fused products differ from the two-step scalar form by
            // at most one rounding per component.
            assert!((prod.re.extract(i) - re).abs() < 1e-12);
            assert!((prod.im.extract(i) - im).abs() < 1e-12);
        }
    }
}

#[test]
fn addition_and_negation_are_componentwise() {
    let a = Complex::<F32s>::splat(1.5, -2.5);
    let b = Complex::<F32s>::splat(0.5, 0.25);

    let sum = a + b;
    let diff = a - b;
    let neg = -a;
    for i in 0..F32s::LANES {
        assert_eq!(sum.re.extract(i), 2.0);
        assert_eq!(sum.im.extract(i), -2.25);
        assert_eq!(diff.re.extract(i), 1.0);
        assert_eq!(diff.im.extract(i), -2.75);
        assert_eq!(neg.re.extract(i), -1.5);
        assert_eq!(neg.im.extract(i), 2.5);
    }
}
