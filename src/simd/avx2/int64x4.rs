//! AVX2 4-lane 64-bit integer batches, signed and unsigned.
//!
//! Unlike the 128-bit tier, AVX2 has an ordered 64-bit compare
//! (`vpcmpgtq`), so ordered compares, min/max and the saturation
//! clamps all stay in vector registers. Still emulated: the product
//! (32-bit partial products), the arithmetic right shift (AVX-512
//! only) and division.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::avx2::int32x8::{I32x8, U32x8};
use crate::simd::avx2::{avx2_int_common, avx2_sign_flip};
use crate::simd::avx2::masks::M64x4;
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore};

/// Number of 64-bit lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX2 batch of 4 packed i64 values.
#[derive(Copy, Clone, Debug)]
pub struct I64x4 {
    /// 256-bit register holding 4 packed i64 lanes.
    pub elements: __m256i,
}

/// AVX2 batch of 4 packed u64 values.
#[derive(Copy, Clone, Debug)]
pub struct U64x4 {
    /// 256-bit register holding 4 packed u64 lanes.
    pub elements: __m256i,
}

avx2_int_common!(I64x4, i64, 4, _mm256_add_epi64, _mm256_sub_epi64);
avx2_int_common!(U64x4, u64, 4, _mm256_add_epi64, _mm256_sub_epi64);

avx2_sign_flip!(I64x4, U64x4);

impl I64x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: i64, e1: i64, e2: i64, e3: i64) -> Self {
        Self {
            elements: unsafe { _mm256_setr_epi64x(e0, e1, e2, e3) },
        }
    }
}

impl U64x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: u64, e1: u64, e2: u64, e3: u64) -> Self {
        Self {
            elements: unsafe {
                _mm256_setr_epi64x(e0 as i64, e1 as i64, e2 as i64, e3 as i64)
            },
        }
    }
}

/// 64-bit wrapping product from three `vpmuludq` partial products; the
/// cross terms land in the high half, correct for both signs.
macro_rules! int64_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe {
                    let low = _mm256_mul_epu32(self.elements, rhs.elements);
                    let cross = _mm256_add_epi64(
                        _mm256_mul_epu32(_mm256_srli_epi64(self.elements, 32), rhs.elements),
                        _mm256_mul_epu32(self.elements, _mm256_srli_epi64(rhs.elements, 32)),
                    );
                    Self {
                        elements: _mm256_add_epi64(low, _mm256_slli_epi64(cross, 32)),
                    }
                }
            }
        }
    };
}

int64_mul!(I64x4);
int64_mul!(U64x4);

macro_rules! int64_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm256_set1_epi64x(value as i64) },
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
            Self::select(self.simd_lt(other), self, other)
        }

        #[inline(always)]
        fn max(self, other: Self) -> Self {
            Self::select(self.simd_gt(other), self, other)
        }

        #[inline(always)]
        fn andnot(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm256_andnot_si256(other.elements, self.elements) },
            }
        }

        #[inline(always)]
        fn select(mask: M64x4, a: Self, b: Self) -> Self {
            Self {
                elements: unsafe { _mm256_blendv_epi8(b.elements, a.elements, mask.mask) },
            }
        }

        /// The unpacks interleave per 128-bit half; `vperm2i128` puts
        /// the halves back in whole-register lane order.
        #[inline(always)]
        fn zip_lo(self, other: Self) -> Self {
            Self {
                elements: unsafe {
                    let even = _mm256_unpacklo_epi64(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi64(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x20)
                },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe {
                    let even = _mm256_unpacklo_epi64(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi64(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x31)
                },
            }
        }

        #[inline(always)]
        fn hadd(self) -> $scalar {
            let lanes = self.to_array();
            lanes[0]
                .wrapping_add(lanes[1])
                .wrapping_add(lanes[2])
                .wrapping_add(lanes[3])
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M64x4 {
            M64x4::from_raw(unsafe { _mm256_cmpeq_epi64(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M64x4 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_gt(self, other: Self) -> M64x4 {
            other.simd_lt(self)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M64x4 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M64x4 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I64x4 {
    type Scalar = i64;
    type Mask = M64x4;

    const LANES: usize = LANE_COUNT;

    int64_batch_shared!(i64);

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe { _mm256_cmpgt_epi64(other.elements, self.elements) })
    }
}

impl SimdBatch for U64x4 {
    type Scalar = u64;
    type Mask = M64x4;

    const LANES: usize = LANE_COUNT;

    int64_batch_shared!(u64);

    /// Sign-bit bias then signed compare.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M64x4 {
        unsafe {
            let bias = _mm256_set1_epi64x(i64::MIN);
            M64x4::from_raw(_mm256_cmpgt_epi64(
                _mm256_xor_si256(other.elements, bias),
                _mm256_xor_si256(self.elements, bias),
            ))
        }
    }
}

impl SimdInt for I64x4 {
    /// Same branch-free clamp as the 32-bit tier; the negative-addend
    /// mask comes from `vpcmpgtq` against zero since there is no 64-bit
    /// arithmetic shift.
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        unsafe {
            let neg_mask = M64x4::from_raw(_mm256_cmpgt_epi64(
                _mm256_setzero_si256(),
                other.elements,
            ));
            let pos_branch = SimdBatch::min(Self::splat(i64::MAX) - other, self);
            let neg_branch = SimdBatch::max(Self::splat(i64::MIN) - other, self);
            other + Self::select(neg_mask, neg_branch, pos_branch)
        }
    }

    /// Mirror of [`sadd`](SimdInt::sadd) with the clamp bound offset by
    /// the subtrahend, so `other == i64::MIN` saturates correctly.
    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        unsafe {
            let neg_mask = M64x4::from_raw(_mm256_cmpgt_epi64(
                _mm256_setzero_si256(),
                other.elements,
            ));
            let pos_branch = SimdBatch::max(Self::splat(i64::MIN) + other, self);
            let neg_branch = SimdBatch::min(Self::splat(i64::MAX) + other, self);
            Self::select(neg_mask, neg_branch, pos_branch) - other
        }
    }

    /// Wrapping magnitude via compare-and-negate; `i64::MIN` stays put.
    #[inline(always)]
    fn abs(self) -> Self {
        let neg = Self::splat(0) - self;
        Self::select(self.simd_lt(Self::splat(0)), neg, self)
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_sll_epi64(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Arithmetic shift per lane; `vpsraq` only exists in AVX-512.
    /// Counts past 63 fill with the sign bit.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(63);
        self.map2(self, |a, _| a >> count)
    }
}

impl SimdInt for U64x4 {
    /// `l + min(!l, r)` with the biased-compare min.
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
                _mm256_sll_epi64(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_srl_epi64(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl I64x4 {
    /// Approximate division through f64; exact only while both operands
    /// stay within f64's 2^53 integer range. `/` and
    /// [`SimdInt::div_exact`] are always exact.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as i64)
    }
}

impl U64x4 {
    /// Approximate division through f64; exact only while both operands
    /// stay within f64's 2^53 integer range.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as u64)
    }
}

impl Neg for I64x4 {
    type Output = Self;

    /// Wrapping negation: `i64::MIN` stays `i64::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_epi64(_mm256_setzero_si256(), self.elements) },
        }
    }
}

macro_rules! int64_narrow {
    ($name:ident, $narrowed:ident, $clamp:expr) => {
        impl Narrow for $name {
            type Narrowed = $narrowed;

            /// A dword shuffle gathers each lane's low half per
            /// 128-bit half; `punpcklqdq` then `vpermq` put the four
            /// pairs in whole-register order.
            #[inline(always)]
            fn narrow(self, hi: Self) -> $narrowed {
                $narrowed {
                    elements: unsafe {
                        let a = _mm256_shuffle_epi32(self.elements, 0b00_00_10_00);
                        let b = _mm256_shuffle_epi32(hi.elements, 0b00_00_10_00);
                        _mm256_permute4x64_epi64(_mm256_unpacklo_epi64(a, b), 0b11_01_10_00)
                    },
                }
            }

            /// No 64-to-32 pack exists before AVX-512, so the clamp
            /// runs per lane.
            #[inline(always)]
            fn narrow_saturating(self, hi: Self) -> $narrowed {
                let a = self.to_array();
                let b = hi.to_array();
                let clamp = $clamp;
                $narrowed::from_array([
                    clamp(a[0]),
                    clamp(a[1]),
                    clamp(a[2]),
                    clamp(a[3]),
                    clamp(b[0]),
                    clamp(b[1]),
                    clamp(b[2]),
                    clamp(b[3]),
                ])
            }
        }
    };
}

int64_narrow!(I64x4, I32x8, |v: i64| {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
});
int64_narrow!(U64x4, U32x8, |v: u64| v.min(u64::from(u32::MAX)) as u32);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn vector_compare_and_minmax() {
        let a = I64x4::new(-5, 0, 5, i64::MIN);
        let b = I64x4::new(5, 0, -5, i64::MAX);
        assert_eq!(a.simd_lt(b).to_array(), [true, false, false, true]);
        assert_eq!(a.min(b).to_array(), [-5, 0, -5, i64::MIN]);
        assert_eq!(a.max(b).to_array(), [5, 0, 5, i64::MAX]);

        let c = U64x4::new(u64::MAX, 0, 1 << 63, 1);
        let d = U64x4::new(0, u64::MAX, (1 << 63) - 1, 1);
        assert_eq!(c.simd_gt(d).to_array(), [true, false, true, false]);
        assert_eq!(c.min(d).to_array(), [0, 0, (1 << 63) - 1, 1]);
    }

    #[test]
    fn partial_product_mul() {
        let a = I64x4::new(0x1_0000_0001, -7, 1 << 40, i64::MIN);
        let b = I64x4::new(0x1_0000_0001, 3, 1 << 30, 3);
        let ax = a.to_array();
        let bx = b.to_array();
        let expect: [i64; 4] = std::array::from_fn(|i| ax[i].wrapping_mul(bx[i]));
        assert_eq!((a * b).to_array(), expect);
    }

    #[test]
    fn saturation_clamps() {
        let a = I64x4::splat(i64::MAX);
        assert_eq!(a.sadd(I64x4::splat(1)).to_array(), [i64::MAX; 4]);
        assert_eq!(
            I64x4::splat(1).ssub(I64x4::splat(i64::MIN)).to_array(),
            [i64::MAX; 4]
        );
        assert_eq!(
            I64x4::splat(i64::MIN).ssub(I64x4::splat(1)).to_array(),
            [i64::MIN; 4]
        );
        assert_eq!(U64x4::splat(5).ssub(U64x4::splat(10)).to_array(), [0u64; 4]);
        assert_eq!(
            U64x4::splat(u64::MAX).sadd(U64x4::splat(1)).to_array(),
            [u64::MAX; 4]
        );
    }

    #[test]
    fn abs_and_shifts() {
        assert_eq!(
            I64x4::new(-3, 3, i64::MIN, 0).abs().to_array(),
            [3, 3, i64::MIN, 0]
        );
        assert_eq!(I64x4::splat(-64).shr(3).to_array(), [-8i64; 4]);
        assert_eq!(U64x4::splat(1 << 63).shr(63).to_array(), [1u64; 4]);
        assert_eq!(I64x4::splat(3).shl(10).to_array(), [3072i64; 4]);
    }

    #[test]
    fn hadd_wraps() {
        assert_eq!(I64x4::new(1, 2, 3, 4).hadd(), 10);
        assert_eq!(I64x4::new(i64::MAX, 1, 0, 0).hadd(), i64::MIN);
    }

    #[test]
    fn narrowing_keeps_whole_register_order() {
        let lo = I64x4::new(0, 1, 2, 3);
        let hi = I64x4::new(4, 5, 6, 7);
        assert_eq!(lo.narrow(hi).to_array(), [0, 1, 2, 3, 4, 5, 6, 7]);

        let wide = I64x4::new(i64::MIN, -1, i64::MAX, 0x1_0000_0002);
        assert_eq!(
            wide.narrow_saturating(wide).to_array()[..4],
            [i32::MIN, -1, i32::MAX, i32::MAX]
        );
        assert_eq!(wide.narrow(wide).to_array()[..4], [0, -1, -1, 2]);

        let u = U64x4::new(u64::MAX, 9, 1 << 40, 0);
        assert_eq!(
            u.narrow_saturating(u).to_array()[..4],
            [u32::MAX, 9, u32::MAX, 0]
        );
    }
}
