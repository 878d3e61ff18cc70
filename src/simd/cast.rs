//! Value conversion and bitwise reinterpretation between batch types.
//!
//! Two distinct moves live here and must never be confused:
//!
//! - [`batch_cast`] converts lane *values* (`as`-cast semantics, one
//!   lane at a time) between batches of the same lane count.
//! - [`bitwise_cast`] reinterprets the same register *bits* as a batch
//!   of a different scalar type, valid between batches of equal total
//!   byte size. No value changes, NaN payloads included.
//!
//! The widening and narrowing helpers move between lane widths
//! (`i8 -> i16 -> i32` and back), sign- or zero-extending per the
//! source scalar's signedness and truncating or saturating on the way
//! down. [`load_converted`]/[`store_converted`] are the cross-type
//! memory paths: a batch of `T` read from a buffer of `U` lane by lane.

use num::traits::AsPrimitive;

use crate::simd::traits::{Narrow, SimdBatch, SimdLoad, SimdStore, Widen};

/// Per-lane value conversion between batches of the same lane count.
///
/// Each lane goes through Rust `as`-cast semantics: float-to-int
/// saturates and maps NaN to zero, int-to-float rounds to nearest,
/// int-to-int truncates. When source and destination scalar types
/// match this compiles to the identity.
#[inline(always)]
pub fn batch_cast<A, B>(x: A) -> B
where
    A: SimdBatch,
    B: SimdBatch,
    A::Scalar: AsPrimitive<B::Scalar>,
    B::Scalar: 'static + Copy,
{
    debug_assert_eq!(A::LANES, B::LANES, "value casts preserve lane count");
    B::from_fn(|i| x.extract(i).as_())
}

/// Reinterprets a batch's bits as a batch of a different scalar type.
///
/// The two types must occupy the same number of bytes; a mismatch is a
/// compile-time error at monomorphization. The round trip through a
/// `bytemuck`-viewed stack buffer folds to a plain register
/// reinterpret under optimization, so arbitrary bit patterns (NaN
/// payloads, negative zero) survive exactly.
#[inline(always)]
pub fn bitwise_cast<A, B>(x: A) -> B
where
    A: SimdBatch + SimdStore<A::Scalar>,
    B: SimdBatch + SimdLoad<B::Scalar>,
    A::Scalar: bytemuck::Pod,
    B::Scalar: bytemuck::Pod,
{
    const {
        assert!(
            A::LANES * std::mem::size_of::<A::Scalar>()
                == B::LANES * std::mem::size_of::<B::Scalar>(),
            "bitwise casts require equal byte size"
        );
    }

    // u64 backing keeps the buffer aligned for every scalar width.
    let mut buf = [0u64; 4];
    unsafe {
        let src: &mut [A::Scalar] = bytemuck::cast_slice_mut(&mut buf);
        x.store_unaligned_at(src.as_mut_ptr());
    }
    let dst: &[B::Scalar] = bytemuck::cast_slice(&buf);
    unsafe { B::load_unaligned(dst.as_ptr()) }
}

/// Widens the low half of `x` into a batch of a twice-wider scalar.
///
/// Lane i of the result is `x` lane i converted; signed scalars
/// sign-extend, unsigned scalars zero-extend, through the tier's
/// native extension path.
#[inline(always)]
pub fn widen_lo<A: Widen>(x: A) -> A::Wide {
    x.widen_lo()
}

/// Widens the high half of `x`; lane i of the result is `x` lane
/// `Wide::LANES + i` converted.
#[inline(always)]
pub fn widen_hi<A: Widen>(x: A) -> A::Wide {
    x.widen_hi()
}

/// Concatenates two wide batches into one narrow batch, truncating
/// each lane to the destination width. `lo` fills the low half of the
/// result, `hi` the high half.
#[inline(always)]
pub fn narrow<W: Narrow>(lo: W, hi: W) -> W::Narrowed {
    lo.narrow(hi)
}

/// Like [`narrow`], but lanes outside the destination's representable
/// range clamp to its bounds instead of truncating, matching the pack
/// instructions.
#[inline(always)]
pub fn narrow_saturating<W: Narrow>(lo: W, hi: W) -> W::Narrowed {
    lo.narrow_saturating(hi)
}

/// Loads a batch from a buffer of a different scalar type, converting
/// each lane with `as`-cast semantics. Never a reinterpretation.
#[inline(always)]
pub fn load_converted<B, U>(src: &[U]) -> B
where
    B: SimdBatch,
    U: Copy + AsPrimitive<B::Scalar>,
    B::Scalar: 'static + Copy,
{
    debug_assert!(
        src.len() >= B::LANES,
        "source must hold at least one batch of values"
    );
    B::from_fn(|i| src[i].as_())
}

/// Stores a batch to a buffer of a different scalar type, converting
/// each lane with `as`-cast semantics.
#[inline(always)]
pub fn store_converted<B, U>(x: B, dst: &mut [U])
where
    B: SimdBatch,
    B::Scalar: AsPrimitive<U>,
    U: 'static + Copy,
{
    debug_assert!(
        dst.len() >= B::LANES,
        "destination must hold at least one batch of values"
    );
    for (i, slot) in dst.iter_mut().take(B::LANES).enumerate() {
        *slot = x.extract(i).as_();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::{F32s, I16s, I32s, I64s, I8s, U16s, U32s, U8s};

    #[test]
    fn value_cast_follows_as_semantics() {
        let x = F32s::from_fn(|i| i as f32 + 0.75);
        let y: I32s = batch_cast(x);
        for i in 0..F32s::LANES {
            assert_eq!(y.extract(i), i as i32);
        }

        let neg: I32s = batch_cast(F32s::splat(-2.75));
        assert_eq!(neg.extract(0), -2);

        let from_nan: I32s = batch_cast(F32s::splat(f32::NAN));
        assert_eq!(from_nan.extract(0), 0);
    }

    #[test]
    fn bitwise_cast_round_trips_nan_payloads() {
        let x = F32s::from_fn(|i| f32::from_bits(0x7FC0_1000 | i as u32));
        let bits: U32s = bitwise_cast(x);
        for i in 0..F32s::LANES {
            assert_eq!(bits.extract(i), 0x7FC0_1000 | i as u32);
        }

        let back: F32s = bitwise_cast(bits);
        for i in 0..F32s::LANES {
            assert_eq!(back.extract(i).to_bits(), x.extract(i).to_bits());
        }
    }

    #[test]
    fn widen_then_narrow_is_identity() {
        let x = I8s::from_fn(|i| i as i8 - 8);
        let lo: I16s = widen_lo(x);
        let hi: I16s = widen_hi(x);
        assert_eq!(lo.extract(0), -8);
        assert_eq!(hi.extract(0), (I16s::LANES as i16) - 8);

        let back: I8s = narrow(lo, hi);
        for i in 0..I8s::LANES {
            assert_eq!(back.extract(i), x.extract(i));
        }
    }

    #[test]
    fn saturating_narrow_clamps_out_of_range_lanes() {
        let lo = I16s::splat(300);
        let hi = I16s::splat(-300);
        let packed: I8s = narrow_saturating(lo, hi);
        assert_eq!(packed.extract(0), i8::MAX);
        assert_eq!(packed.extract(I8s::LANES - 1), i8::MIN);

        // Unsigned lanes past the signed boundary clamp upward.
        let big: U8s = narrow_saturating(U16s::splat(0x9000), U16s::splat(3));
        assert_eq!(big.extract(0), u8::MAX);
        assert_eq!(big.extract(U8s::LANES - 1), 3);
    }

    #[test]
    fn widening_extends_per_signedness() {
        let signed: I16s = widen_lo(I8s::splat(-100));
        assert_eq!(signed.extract(0), -100);
        let unsigned: U16s = widen_lo(U8s::splat(200));
        assert_eq!(unsigned.extract(0), 200);
    }

    #[test]
    fn narrowing_64_bit_lanes() {
        let lo = I64s::from_fn(|i| i as i64);
        let hi = I64s::from_fn(|i| (I64s::LANES + i) as i64);
        let joined: I32s = narrow(lo, hi);
        for i in 0..I32s::LANES {
            assert_eq!(joined.extract(i), i as i32);
        }

        let wide = I64s::splat(i64::from(i32::MAX) + 10);
        let clamped: I32s = narrow_saturating(wide, -wide);
        assert_eq!(clamped.extract(0), i32::MAX);
        assert_eq!(clamped.extract(I32s::LANES - 1), i32::MIN);
    }

    #[test]
    fn converting_loads_and_stores() {
        let src: Vec<i16> = (0..I32s::LANES as i16).collect();
        let x: I32s = load_converted(&src);
        assert_eq!(x.extract(I32s::LANES - 1), I32s::LANES as i32 - 1);

        let wide = I32s::from_fn(|i| i as i32 * 11);
        let mut dst = vec![0i16; I32s::LANES];
        store_converted(wide, &mut dst);
        assert_eq!(dst[1], 11);
    }
}
