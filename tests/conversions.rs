//! Memory round trips, value casts and bitwise reinterpretation.

use batchly::simd::cast::{batch_cast, bitwise_cast, narrow, widen_hi, widen_lo};
use batchly::simd::traits::{SimdBatch, SimdLoad, SimdStore};
use batchly::simd::{F32s, F64s, I16s, I32s, I64s, I8s, U32s, U64s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn load_store_round_trips_extremes() {
    let values = [i32::MIN, -1, 0, 1, i32::MAX, 42, -42, 7];
    let src: Vec<i32> = (0..I32s::LANES).map(|i| values[i % values.len()]).collect();

    let x = unsafe { I32s::load_unaligned(src.as_ptr()) };
    let mut dst = vec![0i32; I32s::LANES];
    unsafe { x.store_unaligned_at(dst.as_mut_ptr()) };
    assert_eq!(src, dst);
}

#[test]
fn float_bit_patterns_survive_memory() {
    let patterns = [
        0x7FC0_0001u32, // quiet NaN with payload
        0xFF80_0000,    // -inf
        0x8000_0000,    // -0.0
        0x0000_0001,    // smallest subnormal
    ];
    let src: Vec<f32> = (0..F32s::LANES)
        .map(|i| f32::from_bits(patterns[i % patterns.len()]))
        .collect();

    let x = unsafe { F32s::load_unaligned(src.as_ptr()) };
    let mut dst = vec![0.0f32; F32s::LANES];
    unsafe { x.store_unaligned_at(dst.as_mut_ptr()) };
    for i in 0..F32s::LANES {
        // NaN compares unequal to itself; the raw bits must match.
        assert_eq!(src[i].to_bits(), dst[i].to_bits());
    }
}

#[test]
fn bitwise_cast_round_trips_arbitrary_bits() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let bits: Vec<u32> = (0..U32s::LANES).map(|_| rng.random()).collect();
        let x = U32s::from(bits.as_slice());

        let as_float: F32s = bitwise_cast(x);
        let back: U32s = bitwise_cast(as_float);
        for i in 0..U32s::LANES {
            assert_eq!(back.extract(i), bits[i]);
        }

        // Same 128/256 bits viewed at 64-bit granularity.
        let wide: U64s = bitwise_cast(x);
        let narrow_again: U32s = bitwise_cast(wide);
        for i in 0..U32s::LANES {
            assert_eq!(narrow_again.extract(i), bits[i]);
        }
    }
}

#[test]
fn double_bits_view_as_int64() {
    let x = F64s::from_fn(|i| if i % 2 == 0 { -0.0 } else { f64::NAN });
    let bits: I64s = bitwise_cast(x);
    for i in 0..F64s::LANES {
        assert_eq!(bits.extract(i) as u64, x.extract(i).to_bits());
    }
}

#[test]
fn sign_flip_reinterprets_lane_bits() {
    let x = I32s::splat(-1);
    let u: U32s = x.into();
    let back: I32s = u.into();
    for i in 0..I32s::LANES {
        assert_eq!(u.extract(i), u32::MAX);
        assert_eq!(back.extract(i), -1);
    }
}

#[test]
fn value_casts_and_width_moves() {
    let x = I32s::from_fn(|i| i as i32 * 1000 - 2000);
    let as_float: F32s = batch_cast(x);
    let back: I32s = batch_cast(as_float);
    for i in 0..I32s::LANES {
        assert_eq!(back.extract(i), x.extract(i));
    }

    let bytes = I8s::from_fn(|i| i as i8 - 7);
    let lo: I16s = widen_lo(bytes);
    let hi: I16s = widen_hi(bytes);
    let rejoined: I8s = narrow(lo, hi);
    for i in 0..I8s::LANES {
        assert_eq!(rejoined.extract(i), bytes.extract(i));
    }
}
