//! SSE 4-lane 32-bit integer batches, signed and unsigned.
//!
//! `I32x4` and `U32x4` wrap `__m128i`. SSE4.1 covers most of the
//! contract natively (`pmulld`, `pminsd`/`pminud`, `pblendvb`); the two
//! places the ISA has no instruction are handled with standard
//! derivations:
//!
//! - 32-bit saturating add/sub have no native form, so the signed
//!   variants use a branch-free clamp selected by the addend's sign and
//!   the unsigned variants clamp against the distance to the type
//!   bounds.
//! - x86 has no unsigned 32-bit ordered compare, so `U32x4` XORs both
//!   operands with the sign bit and runs the signed compare. The bias
//!   maps unsigned ordering onto signed ordering exactly.
//!
//! `+`, `-` and `*` wrap, matching the native instructions. `/` is the
//! bit-exact per-lane path; `div_fast` is the opt-in float round-trip.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::sse::int16x8::{I16x8, U16x8};
use crate::simd::sse::int64x2::{I64x2, U64x2};
use crate::simd::sse::masks::M32x4;
use crate::simd::sse::{sse_sign_flip, SSE_ALIGNMENT};
use crate::simd::traits::{Alignment, Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 32-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// SSE batch of 4 packed i32 values.
#[derive(Copy, Clone, Debug)]
pub struct I32x4 {
    /// 128-bit register holding 4 packed i32 lanes.
    pub elements: __m128i,
}

/// SSE batch of 4 packed u32 values.
#[derive(Copy, Clone, Debug)]
pub struct U32x4 {
    /// 128-bit register holding 4 packed u32 lanes.
    pub elements: __m128i,
}

macro_rules! int32_common {
    ($name:ident, $scalar:ty) => {
        impl $name {
            /// Builds a batch from 4 lane values, lane 0 first.
            #[inline(always)]
            pub fn new(e0: $scalar, e1: $scalar, e2: $scalar, e3: $scalar) -> Self {
                Self::from_array([e0, e1, e2, e3])
            }

            /// Builds a batch from an array, lane order preserved.
            #[inline(always)]
            pub fn from_array(lanes: [$scalar; LANE_COUNT]) -> Self {
                unsafe { Self::load_unaligned(lanes.as_ptr()) }
            }

            /// Copies the lanes out into an array.
            #[inline(always)]
            pub fn to_array(self) -> [$scalar; LANE_COUNT] {
                let mut out = [0 as $scalar; LANE_COUNT];
                unsafe { self.store_unaligned_at(out.as_mut_ptr()) };
                out
            }

            /// Per-lane scalar fallback for operations SSE has no
            /// instruction for. Bit-identical to what a native
            /// instruction would produce.
            #[inline(always)]
            fn map2(self, rhs: Self, f: impl Fn($scalar, $scalar) -> $scalar) -> Self {
                let a = self.to_array();
                let b = rhs.to_array();
                Self::from_array(std::array::from_fn(|i| f(a[i], b[i])))
            }
        }

        impl From<&[$scalar]> for $name {
            fn from(slice: &[$scalar]) -> Self {
                debug_assert!(
                    slice.len() >= LANE_COUNT,
                    "slice must hold at least {LANE_COUNT} values"
                );
                unsafe { Self::load(slice.as_ptr()) }
            }
        }

        impl Alignment<$scalar> for $name {
            #[inline(always)]
            fn is_aligned(ptr: *const $scalar) -> bool {
                (ptr as usize) % SSE_ALIGNMENT == 0
            }
        }

        impl SimdLoad<$scalar> for $name {
            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "pointer must not be null");

                match Self::is_aligned(ptr) {
                    true => Self::load_aligned(ptr),
                    false => Self::load_unaligned(ptr),
                }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm_load_si128(ptr as *const __m128i),
                }
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm_loadu_si128(ptr as *const __m128i),
                }
            }
        }

        impl SimdStore<$scalar> for $name {
            #[inline(always)]
            unsafe fn store_at(&self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "pointer must not be null");

                match Self::is_aligned(ptr) {
                    true => self.store_aligned_at(ptr),
                    false => self.store_unaligned_at(ptr),
                }
            }

            #[inline(always)]
            unsafe fn store_aligned_at(&self, ptr: *mut $scalar) {
                _mm_store_si128(ptr as *mut __m128i, self.elements)
            }

            #[inline(always)]
            unsafe fn store_unaligned_at(&self, ptr: *mut $scalar) {
                _mm_storeu_si128(ptr as *mut __m128i, self.elements)
            }
        }

        impl Add for $name {
            type Output = Self;

            /// Wrapping lane addition (`paddd`).
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_add_epi32(self.elements, rhs.elements) },
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_sub_epi32(self.elements, rhs.elements) },
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            /// Wrapping low-half lane product (`pmulld`).
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_mullo_epi32(self.elements, rhs.elements) },
                }
            }
        }

        impl Div for $name {
            type Output = Self;

            /// Bit-exact per-lane division; panics on a zero divisor.
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                self.div_exact(rhs)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_and_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_or_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, _mm_set1_epi8(-1)) },
                }
            }
        }
        impl std::ops::AddAssign for $name {
            #[inline(always)]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $name {
            #[inline(always)]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }
    };
}

int32_common!(I32x4, i32);
int32_common!(U32x4, u32);

sse_sign_flip!(I32x4, U32x4);

macro_rules! int32_batch_shared {
    ($name:ident, $scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm_set1_epi32(value as i32) },
            }
        }

        #[inline(always)]
        fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
            Self::from_array([f(0), f(1), f(2), f(3)])
        }

        #[inline(always)]
        fn extract(self, lane: usize) -> $scalar {
            debug_assert!(lane < LANE_COUNT, "lane index out of range");
            self.to_array()[lane]
        }

        #[inline(always)]
        fn replace(self, lane: usize, value: $scalar) -> Self {
            debug_assert!(lane < LANE_COUNT, "lane index out of range");
            let mut lanes = self.to_array();
            lanes[lane] = value;
            Self::from_array(lanes)
        }

        #[inline(always)]
        fn andnot(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_andnot_si128(other.elements, self.elements) },
            }
        }

        #[inline(always)]
        fn select(mask: M32x4, a: Self, b: Self) -> Self {
            Self {
                elements: unsafe { _mm_blendv_epi8(b.elements, a.elements, mask.mask) },
            }
        }

        #[inline(always)]
        fn zip_lo(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpacklo_epi32(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpackhi_epi32(self.elements, other.elements) },
            }
        }

        /// Pairwise tree reduction via two `phaddd`; the sum wraps.
        #[inline(always)]
        fn hadd(self) -> $scalar {
            unsafe {
                let tmp = _mm_hadd_epi32(self.elements, self.elements);
                _mm_cvtsi128_si32(_mm_hadd_epi32(tmp, tmp)) as $scalar
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M32x4 {
            M32x4::from_raw(unsafe { _mm_cmpeq_epi32(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M32x4 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M32x4 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M32x4 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I32x4 {
    type Scalar = i32;
    type Mask = M32x4;

    const LANES: usize = LANE_COUNT;

    int32_batch_shared!(I32x4, i32);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { _mm_cmplt_epi32(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { _mm_cmpgt_epi32(self.elements, other.elements) })
    }
}

impl SimdBatch for U32x4 {
    type Scalar = u32;
    type Mask = M32x4;

    const LANES: usize = LANE_COUNT;

    int32_batch_shared!(U32x4, u32);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epu32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epu32(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare: x86 has no unsigned ordered
    /// compare, and XORing both operands with `0x8000_0000` maps the
    /// unsigned order onto the signed one exactly.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x4 {
        unsafe {
            let bias = _mm_set1_epi32(i32::MIN);
            M32x4::from_raw(_mm_cmplt_epi32(
                _mm_xor_si128(self.elements, bias),
                _mm_xor_si128(other.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x4 {
        other.simd_lt(self)
    }
}

impl SimdInt for I32x4 {
    /// Branch-free saturating add: clamp `self` against the distance to
    /// the bound the addend's sign can overflow toward, then add.
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        unsafe {
            // All-ones where the addend is negative.
            let neg_mask = M32x4::from_raw(_mm_srai_epi32(other.elements, 31));
            let pos_branch = SimdBatch::min(Self::splat(i32::MAX) - other, self);
            let neg_branch = SimdBatch::max(Self::splat(i32::MIN) - other, self);
            other + Self::select(neg_mask, neg_branch, pos_branch)
        }
    }

    /// Mirror of [`sadd`](SimdInt::sadd) with the clamp bound offset by
    /// the subtrahend, so `other == i32::MIN` saturates correctly.
    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        unsafe {
            let neg_mask = M32x4::from_raw(_mm_srai_epi32(other.elements, 31));
            let pos_branch = SimdBatch::max(Self::splat(i32::MIN) + other, self);
            let neg_branch = SimdBatch::min(Self::splat(i32::MAX) + other, self);
            Self::select(neg_mask, neg_branch, pos_branch) - other
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_abs_epi32(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm_sll_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Arithmetic shift: the sign bit fills vacated lanes.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm_sra_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl I32x4 {
    /// Fast division through f64: convert, divide, truncate back.
    ///
    /// Every i32 is exactly representable in f64 and the correctly
    /// rounded double quotient truncates to the exact integer quotient,
    /// so this path is bit-exact for all inputs while staying entirely
    /// in vector registers. A zero divisor does not panic: the ±inf
    /// quotient truncates to the x86 integer-indefinite value
    /// (`i32::MIN`), matching `cvttpd2dq`.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        unsafe {
            let a_lo = _mm_cvtepi32_pd(self.elements);
            let a_hi = _mm_cvtepi32_pd(_mm_unpackhi_epi64(self.elements, self.elements));
            let b_lo = _mm_cvtepi32_pd(rhs.elements);
            let b_hi = _mm_cvtepi32_pd(_mm_unpackhi_epi64(rhs.elements, rhs.elements));

            let q_lo = _mm_cvttpd_epi32(_mm_div_pd(a_lo, b_lo));
            let q_hi = _mm_cvttpd_epi32(_mm_div_pd(a_hi, b_hi));

            Self {
                elements: _mm_unpacklo_epi64(q_lo, q_hi),
            }
        }
    }
}

impl SimdInt for U32x4 {
    /// `l + min(!l, r)`: `!l` is the lane's distance to `u32::MAX`, so
    /// the addend is clamped to what fits.
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        self + SimdBatch::min(!self, other)
    }

    /// `l - min(l, r)`: clamps at zero instead of wrapping.
    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        self - SimdBatch::min(self, other)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm_sll_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Logical shift: zeros fill vacated bits.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm_srl_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl U32x4 {
    /// Fast division through f64, per lane. Exact for every u32 input
    /// (u32 fits the f64 mantissa); kept per-lane because x86 has no
    /// packed unsigned-to-double conversion before AVX-512.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as u32)
    }
}

impl Neg for I32x4 {
    type Output = Self;

    /// Wrapping negation: `i32::MIN` stays `i32::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_sub_epi32(_mm_setzero_si128(), self.elements) },
        }
    }
}

impl Widen for I32x4 {
    type Wide = I64x2;

    /// `pmovsxdq`; the high half shifts down into reach first.
    #[inline(always)]
    fn widen_lo(self) -> I64x2 {
        I64x2 {
            elements: unsafe { _mm_cvtepi32_epi64(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I64x2 {
        I64x2 {
            elements: unsafe { _mm_cvtepi32_epi64(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

impl Widen for U32x4 {
    type Wide = U64x2;

    /// `pmovzxdq` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U64x2 {
        U64x2 {
            elements: unsafe { _mm_cvtepu32_epi64(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U64x2 {
        U64x2 {
            elements: unsafe { _mm_cvtepu32_epi64(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

impl Narrow for I32x4 {
    type Narrowed = I16x8;

    /// Masking to the low word keeps every lane in `packusdw` range,
    /// so the pack passes the truncated bits through unchanged.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I16x8 {
        I16x8 {
            elements: unsafe {
                let keep = _mm_set1_epi32(0xFFFF);
                _mm_packus_epi32(
                    _mm_and_si128(self.elements, keep),
                    _mm_and_si128(hi.elements, keep),
                )
            },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I16x8 {
        I16x8 {
            elements: unsafe { _mm_packs_epi32(self.elements, hi.elements) },
        }
    }
}

impl Narrow for U32x4 {
    type Narrowed = U16x8;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U16x8 {
        U16x8 {
            elements: unsafe {
                let keep = _mm_set1_epi32(0xFFFF);
                _mm_packus_epi32(
                    _mm_and_si128(self.elements, keep),
                    _mm_and_si128(hi.elements, keep),
                )
            },
        }
    }

    /// `packusdw` reads its input as signed, so lanes at or above
    /// 0x8000_0000 would clamp to zero; an unsigned min caps them at
    /// 0xFFFF first.
    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U16x8 {
        U16x8 {
            elements: unsafe {
                let cap = _mm_set1_epi32(0xFFFF);
                _mm_packus_epi32(
                    _mm_min_epu32(self.elements, cap),
                    _mm_min_epu32(hi.elements, cap),
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    mod signed {
        use super::*;

        #[test]
        fn wrapping_arithmetic() {
            let a = I32x4::new(1, 2, 3, 4);
            let b = I32x4::new(10, 20, 30, 40);

            assert_eq!((a + b).to_array(), [11, 22, 33, 44]);
            assert_eq!((b - a).to_array(), [9, 18, 27, 36]);
            assert_eq!((a * b).to_array(), [10, 40, 90, 160]);
            assert_eq!(
                (I32x4::splat(i32::MAX) + I32x4::splat(1)).to_array(),
                [i32::MIN; 4]
            );
        }

        #[test]
        fn saturating_add_clamps_both_bounds() {
            let max = I32x4::splat(i32::MAX);
            let min = I32x4::splat(i32::MIN);

            assert_eq!(max.sadd(I32x4::splat(1)).to_array(), [i32::MAX; 4]);
            assert_eq!(min.sadd(I32x4::splat(-1)).to_array(), [i32::MIN; 4]);
            assert_eq!(
                I32x4::new(5, -5, 100, -100).sadd(I32x4::splat(3)).to_array(),
                [8, -2, 103, -97]
            );
        }

        #[test]
        fn saturating_sub_handles_min_subtrahend() {
            let v = I32x4::new(0, -5, 5, -1);
            let out = v.ssub(I32x4::splat(i32::MIN)).to_array();
            assert_eq!(out, [i32::MAX, i32::MAX - 4, i32::MAX, i32::MAX]);

            assert_eq!(
                I32x4::splat(i32::MIN).ssub(I32x4::splat(1)).to_array(),
                [i32::MIN; 4]
            );
        }

        #[test]
        fn division_paths_agree() {
            let a = I32x4::new(100, -100, 7, i32::MIN);
            let b = I32x4::new(3, 3, -2, 2);

            assert_eq!((a / b).to_array(), [33, -33, -3, i32::MIN / 2]);
            assert_eq!(a.div_fast(b).to_array(), (a / b).to_array());
        }

        #[test]
        fn comparisons_and_select() {
            let a = I32x4::new(-1, 0, 1, 2);
            let b = I32x4::splat(1);

            let lt = a.simd_lt(b);
            assert_eq!(lt.to_array(), [true, true, false, false]);
            assert_eq!(
                I32x4::select(lt, I32x4::splat(1), I32x4::splat(0)).to_array(),
                [1, 1, 0, 0]
            );
        }

        #[test]
        fn hadd_and_shifts() {
            assert_eq!(I32x4::splat(1).hadd(), 4);
            assert_eq!(I32x4::new(1, 2, 3, 4).hadd(), 10);
            assert_eq!(I32x4::new(1, 2, 3, 4).shl(2).to_array(), [4, 8, 12, 16]);
            assert_eq!(I32x4::new(-8, 8, -1, 1).shr(1).to_array(), [-4, 4, -1, 0]);
        }

        #[test]
        fn abs_and_neg() {
            assert_eq!(
                I32x4::new(-3, 3, i32::MIN, 0).abs().to_array(),
                [3, 3, i32::MIN, 0]
            );
            assert_eq!((-I32x4::new(1, -2, 0, i32::MIN)).to_array(), [-1, 2, 0, i32::MIN]);
        }
    }

    mod unsigned {
        use super::*;

        #[test]
        fn unsigned_compare_crosses_sign_boundary() {
            // Values straddling the signed/unsigned boundary: a naive
            // signed compare would invert these.
            let a = U32x4::new(0x7FFF_FFFF, 0x8000_0000, 0, u32::MAX);
            let b = U32x4::new(0x8000_0000, 0x7FFF_FFFF, u32::MAX, 0);

            assert_eq!(a.simd_lt(b).to_array(), [true, false, true, false]);
            assert_eq!(a.simd_gt(b).to_array(), [false, true, false, true]);
            assert_eq!(a.simd_ge(b).to_array(), [false, true, false, true]);
        }

        #[test]
        fn saturating_unsigned_arithmetic() {
            assert_eq!(
                U32x4::splat(u32::MAX - 1).sadd(U32x4::splat(5)).to_array(),
                [u32::MAX; 4]
            );
            assert_eq!(U32x4::splat(5).ssub(U32x4::splat(10)).to_array(), [0; 4]);
            assert_eq!(U32x4::splat(10).ssub(U32x4::splat(4)).to_array(), [6; 4]);
        }

        #[test]
        fn min_max_and_hadd() {
            let a = U32x4::new(1, u32::MAX, 7, 0);
            let b = U32x4::new(2, 3, 7, u32::MAX);

            assert_eq!(SimdBatch::min(a, b).to_array(), [1, 3, 7, 0]);
            assert_eq!(SimdBatch::max(a, b).to_array(), [2, u32::MAX, 7, u32::MAX]);
            assert_eq!(U32x4::splat(1).hadd(), 4);
        }

        #[test]
        fn division_paths_agree() {
            let a = U32x4::new(u32::MAX, 100, 7, 1);
            let b = U32x4::new(2, 3, 7, u32::MAX);

            assert_eq!((a / b).to_array(), [u32::MAX / 2, 33, 1, 0]);
            assert_eq!(a.div_fast(b).to_array(), (a / b).to_array());
        }
    }
}
