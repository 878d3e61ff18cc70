//! Saturating arithmetic stays inside the scalar's representable range
//! on every tier, for every lane width.

use batchly::simd::traits::{SimdBatch, SimdInt};
use batchly::simd::{I16s, I32s, I64s, I8s, U16s, U32s, U64s, U8s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

macro_rules! check_saturation_against_scalar {
    ($batch:ty, $scalar:ty, $rng:expr) => {
        for _ in 0..200 {
            let xs: Vec<$scalar> = (0..<$batch>::LANES).map(|_| $rng.random()).collect();
            let ys: Vec<$scalar> = (0..<$batch>::LANES).map(|_| $rng.random()).collect();
            let a = <$batch>::from(xs.as_slice());
            let b = <$batch>::from(ys.as_slice());

            let sadd = a.sadd(b);
            let ssub = a.ssub(b);
            for i in 0..<$batch>::LANES {
                assert_eq!(sadd.extract(i), xs[i].saturating_add(ys[i]));
                assert_eq!(ssub.extract(i), xs[i].saturating_sub(ys[i]));
            }
        }
    };
}

#[test]
fn saturating_ops_match_scalar_all_widths() {
    let mut rng = StdRng::seed_from_u64(42);

    check_saturation_against_scalar!(I8s, i8, rng);
    check_saturation_against_scalar!(U8s, u8, rng);
    check_saturation_against_scalar!(I16s, i16, rng);
    check_saturation_against_scalar!(U16s, u16, rng);
    check_saturation_against_scalar!(I32s, i32, rng);
    check_saturation_against_scalar!(U32s, u32, rng);
    check_saturation_against_scalar!(I64s, i64, rng);
    check_saturation_against_scalar!(U64s, u64, rng);
}

#[test]
fn unsigned_subtract_clamps_to_zero() {
    // 5 - 10 clamps to 0, never wraps to 251.
    let clamped = U8s::splat(5).ssub(U8s::splat(10));
    for i in 0..U8s::LANES {
        assert_eq!(clamped.extract(i), 0);
    }
}

#[test]
fn signed_extremes_clamp_both_directions() {
    let top = I32s::splat(i32::MAX).sadd(I32s::splat(i32::MAX));
    let bottom = I32s::splat(i32::MIN).sadd(I32s::splat(i32::MIN));
    let across = I32s::splat(1).ssub(I32s::splat(i32::MIN));
    for i in 0..I32s::LANES {
        assert_eq!(top.extract(i), i32::MAX);
        assert_eq!(bottom.extract(i), i32::MIN);
        assert_eq!(across.extract(i), i32::MAX);
    }

    let wide = I64s::splat(i64::MIN).ssub(I64s::splat(1));
    for i in 0..I64s::LANES {
        assert_eq!(wide.extract(i), i64::MIN);
    }
}

#[test]
fn shift_counts_normalize_at_lane_width() {
    let bytes = U8s::splat(0xFF);
    let shorts = I16s::splat(-1);

    // Logical shifts at or past the width drain to zero; arithmetic
    // shifts clamp to width - 1 and keep filling with the sign bit.
    for count in [8u32, 9, 31, 64] {
        for i in 0..U8s::LANES {
            assert_eq!(bytes.shl(count).extract(i), 0);
            assert_eq!(bytes.shr(count).extract(i), 0);
        }
        for i in 0..I16s::LANES {
            assert_eq!(shorts.shr(count.max(16)).extract(i), -1);
        }
    }
}
