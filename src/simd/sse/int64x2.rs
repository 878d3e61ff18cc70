//! SSE 2-lane 64-bit integer batches, signed and unsigned.
//!
//! SSE4.1 covers add, sub, equality and shifts at this width; the
//! product is assembled from `pmuludq` 32-bit partial products. Ordered
//! compares, min/max, saturating arithmetic and division have no
//! instruction at all before AVX-512, so they run per lane through
//! `map2`, which the optimizer keeps in registers at this width anyway.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::sse::int32x4::{I32x4, U32x4};
use crate::simd::sse::masks::M64x2;
use crate::simd::sse::{sse_int_common, sse_sign_flip};
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore};

/// Number of 64-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 2;

/// SSE batch of 2 packed i64 values.
#[derive(Copy, Clone, Debug)]
pub struct I64x2 {
    /// 128-bit register holding 2 packed i64 lanes.
    pub elements: __m128i,
}

/// SSE batch of 2 packed u64 values.
#[derive(Copy, Clone, Debug)]
pub struct U64x2 {
    /// 128-bit register holding 2 packed u64 lanes.
    pub elements: __m128i,
}

sse_int_common!(I64x2, i64, 2, _mm_add_epi64, _mm_sub_epi64);
sse_int_common!(U64x2, u64, 2, _mm_add_epi64, _mm_sub_epi64);

sse_sign_flip!(I64x2, U64x2);

impl I64x2 {
    /// Builds a batch from the two lanes in order.
    #[inline(always)]
    pub fn new(e0: i64, e1: i64) -> Self {
        Self {
            elements: unsafe { _mm_set_epi64x(e1, e0) },
        }
    }
}

impl U64x2 {
    /// Builds a batch from the two lanes in order.
    #[inline(always)]
    pub fn new(e0: u64, e1: u64) -> Self {
        Self {
            elements: unsafe { _mm_set_epi64x(e1 as i64, e0 as i64) },
        }
    }
}

/// 64-bit wrapping product from three `pmuludq` partial products. The
/// two cross terms land in the high half, so the discarded high*high
/// term never affects the result; correct for both signs.
macro_rules! int64_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe {
                    let low = _mm_mul_epu32(self.elements, rhs.elements);
                    let cross = _mm_add_epi64(
                        _mm_mul_epu32(_mm_srli_epi64(self.elements, 32), rhs.elements),
                        _mm_mul_epu32(self.elements, _mm_srli_epi64(rhs.elements, 32)),
                    );
                    Self {
                        elements: _mm_add_epi64(low, _mm_slli_epi64(cross, 32)),
                    }
                }
            }
        }
    };
}

int64_mul!(I64x2);
int64_mul!(U64x2);

macro_rules! int64_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm_set1_epi64x(value as i64) },
            }
        }

        #[inline(always)]
        fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
            Self::from_array(std::array::from_fn(|i| f(i)))
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
        fn min(self, other: Self) -> Self {
            self.map2(other, |a, b| a.min(b))
        }

        #[inline(always)]
        fn max(self, other: Self) -> Self {
            self.map2(other, |a, b| a.max(b))
        }

        #[inline(always)]
        fn andnot(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_andnot_si128(other.elements, self.elements) },
            }
        }

        #[inline(always)]
        fn select(mask: M64x2, a: Self, b: Self) -> Self {
            Self {
                elements: unsafe { _mm_blendv_epi8(b.elements, a.elements, mask.mask) },
            }
        }

        #[inline(always)]
        fn zip_lo(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpacklo_epi64(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpackhi_epi64(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn hadd(self) -> $scalar {
            let lanes = self.to_array();
            lanes[0].wrapping_add(lanes[1])
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M64x2 {
            M64x2::from_raw(unsafe { _mm_cmpeq_epi64(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M64x2 {
            !self.simd_eq(other)
        }

        /// No 64-bit ordered compare before AVX-512; per lane.
        #[inline(always)]
        fn simd_lt(self, other: Self) -> M64x2 {
            let a = self.to_array();
            let b = other.to_array();
            M64x2::new([a[0] < b[0], a[1] < b[1]])
        }

        #[inline(always)]
        fn simd_gt(self, other: Self) -> M64x2 {
            other.simd_lt(self)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M64x2 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M64x2 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I64x2 {
    type Scalar = i64;
    type Mask = M64x2;

    const LANES: usize = LANE_COUNT;

    int64_batch_shared!(i64);
}

impl SimdBatch for U64x2 {
    type Scalar = u64;
    type Mask = M64x2;

    const LANES: usize = LANE_COUNT;

    int64_batch_shared!(u64);
}

impl SimdInt for I64x2 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        self.map2(other, |a, b| a.saturating_add(b))
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        self.map2(other, |a, b| a.saturating_sub(b))
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.map2(self, |a, _| a.wrapping_abs())
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self {
            elements: unsafe { _mm_sll_epi64(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }

    /// Arithmetic shift per lane; `psraq` only exists in AVX-512.
    /// Counts past 63 fill with the sign bit.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(63);
        self.map2(self, |a, _| a >> count)
    }
}

impl SimdInt for U64x2 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        self.map2(other, |a, b| a.saturating_add(b))
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        self.map2(other, |a, b| a.saturating_sub(b))
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
            elements: unsafe { _mm_sll_epi64(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe { _mm_srl_epi64(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }
}

impl I64x2 {
    /// Approximate division through f64; exact only while both operands
    /// stay within f64's 2^53 integer range. `/` and
    /// [`SimdInt::div_exact`] are always exact.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as i64)
    }
}

impl U64x2 {
    /// Approximate division through f64; exact only while both operands
    /// stay within f64's 2^53 integer range.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as u64)
    }
}

impl Neg for I64x2 {
    type Output = Self;

    /// Wrapping negation: `i64::MIN` stays `i64::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_sub_epi64(_mm_setzero_si128(), self.elements) },
        }
    }
}

impl Narrow for I64x2 {
    type Narrowed = I32x4;

    /// A dword shuffle gathers each lane's low half, then the two
    /// pairs meet in `punpcklqdq`.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I32x4 {
        I32x4 {
            elements: unsafe {
                _mm_unpacklo_epi64(
                    _mm_shuffle_epi32(self.elements, 0b00_00_10_00),
                    _mm_shuffle_epi32(hi.elements, 0b00_00_10_00),
                )
            },
        }
    }

    /// No 64-to-32 pack exists before AVX-512, so the clamp runs per
    /// lane.
    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I32x4 {
        let a = self.to_array();
        let b = hi.to_array();
        let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        I32x4::from_array([clamp(a[0]), clamp(a[1]), clamp(b[0]), clamp(b[1])])
    }
}

impl Narrow for U64x2 {
    type Narrowed = U32x4;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U32x4 {
        U32x4 {
            elements: unsafe {
                _mm_unpacklo_epi64(
                    _mm_shuffle_epi32(self.elements, 0b00_00_10_00),
                    _mm_shuffle_epi32(hi.elements, 0b00_00_10_00),
                )
            },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U32x4 {
        let a = self.to_array();
        let b = hi.to_array();
        let clamp = |v: u64| v.min(u64::from(u32::MAX)) as u32;
        U32x4::from_array([clamp(a[0]), clamp(a[1]), clamp(b[0]), clamp(b[1])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn partial_product_mul() {
        let a = I64x2::new(0x1_0000_0001, -7);
        let b = I64x2::new(0x1_0000_0001, 3);
        let expect = [
            0x1_0000_0001i64.wrapping_mul(0x1_0000_0001),
            -21,
        ];
        assert_eq!((a * b).to_array(), expect);

        let c = U64x2::new(u64::MAX, 1 << 40);
        let d = U64x2::new(2, 1 << 30);
        assert_eq!(
            (c * d).to_array(),
            [u64::MAX.wrapping_mul(2), (1u64 << 40).wrapping_mul(1 << 30)]
        );
    }

    #[test]
    fn per_lane_ordered_compare() {
        let a = I64x2::new(-1, 5);
        let b = I64x2::new(1, 5);
        assert_eq!(a.simd_lt(b).to_array(), [true, false]);
        assert!(a.simd_le(b).all());

        // Top-bit values order correctly without any bias trick.
        let c = U64x2::new(u64::MAX, 0);
        let d = U64x2::new(0, 0);
        assert_eq!(c.simd_gt(d).to_array(), [true, false]);
    }

    #[test]
    fn saturation_at_64_bits() {
        let a = I64x2::new(i64::MAX, i64::MIN);
        let b = I64x2::new(1, 1);
        assert_eq!(a.sadd(b).to_array(), [i64::MAX, i64::MIN + 1]);
        assert_eq!(a.ssub(b).to_array(), [i64::MAX - 1, i64::MIN]);
        assert_eq!(
            U64x2::new(5, u64::MAX).ssub(U64x2::new(10, 0)).to_array(),
            [0, u64::MAX]
        );
    }

    #[test]
    fn shifts() {
        assert_eq!(I64x2::splat(-64).shr(3).to_array(), [-8i64; 2]);
        assert_eq!(I64x2::splat(-1).shr(200).to_array(), [-1i64; 2]);
        assert_eq!(U64x2::splat(1 << 63).shr(63).to_array(), [1u64; 2]);
        assert_eq!(U64x2::splat(1).shr(64).to_array(), [0u64; 2]);
        assert_eq!(I64x2::splat(3).shl(10).to_array(), [3072i64; 2]);
    }

    #[test]
    fn div_fast_within_53_bits() {
        let a = I64x2::new(1 << 52, -9);
        let b = I64x2::new(2, 3);
        assert_eq!(a.div_fast(b).to_array(), a.div_exact(b).to_array());
    }

    #[test]
    fn hadd_and_zip() {
        assert_eq!(I64x2::new(3, 4).hadd(), 7);
        assert_eq!(I64x2::new(i64::MAX, 1).hadd(), i64::MIN);
        let a = U64x2::new(1, 2);
        let b = U64x2::new(10, 20);
        assert_eq!(a.zip_lo(b).to_array(), [1, 10]);
        assert_eq!(a.zip_hi(b).to_array(), [2, 20]);
    }

    #[test]
    fn narrowing_truncates_and_clamps() {
        let lo = I64x2::new(0x1_0000_0005, -3);
        let hi = I64x2::new(i64::MIN, i64::MAX);
        assert_eq!(lo.narrow(hi).to_array(), [5, -3, 0, -1]);
        assert_eq!(
            lo.narrow_saturating(hi).to_array(),
            [i32::MAX, -3, i32::MIN, i32::MAX]
        );

        let u = U64x2::new(u64::MAX, 7);
        assert_eq!(u.narrow(u).to_array(), [u32::MAX, 7, u32::MAX, 7]);
        assert_eq!(
            u.narrow_saturating(u).to_array(),
            [u32::MAX, 7, u32::MAX, 7]
        );
    }
}
