//! AVX2 8-lane 32-bit integer batches, signed and unsigned.
//!
//! Same instruction set as the 128-bit 32-bit tier at double width:
//! native product, min/max and ordered signed compares, the sign-bit
//! bias for unsigned order, branch-free clamps for signed saturation,
//! and whole-batch division through packed f64 on the signed side.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::avx2::int16x16::{I16x16, U16x16};
use crate::simd::avx2::int64x4::{I64x4, U64x4};
use crate::simd::avx2::{avx2_int_common, avx2_sign_flip};
use crate::simd::avx2::masks::M32x8;
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 32-bit lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX2 batch of 8 packed i32 values.
#[derive(Copy, Clone, Debug)]
pub struct I32x8 {
    /// 256-bit register holding 8 packed i32 lanes.
    pub elements: __m256i,
}

/// AVX2 batch of 8 packed u32 values.
#[derive(Copy, Clone, Debug)]
pub struct U32x8 {
    /// 256-bit register holding 8 packed u32 lanes.
    pub elements: __m256i,
}

avx2_int_common!(I32x8, i32, 8, _mm256_add_epi32, _mm256_sub_epi32);
avx2_int_common!(U32x8, u32, 8, _mm256_add_epi32, _mm256_sub_epi32);

avx2_sign_flip!(I32x8, U32x8);

macro_rules! int32_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            /// Wrapping lane product, low 32 bits.
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm256_mullo_epi32(self.elements, rhs.elements) },
                }
            }
        }
    };
}

int32_mul!(I32x8);
int32_mul!(U32x8);

macro_rules! int32_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm256_set1_epi32(value as i32) },
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
        fn andnot(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm256_andnot_si256(other.elements, self.elements) },
            }
        }

        #[inline(always)]
        fn select(mask: M32x8, a: Self, b: Self) -> Self {
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
                    let even = _mm256_unpacklo_epi32(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi32(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x20)
                },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe {
                    let even = _mm256_unpacklo_epi32(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi32(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x31)
                },
            }
        }

        /// Two in-half `vphaddd` passes, then the half-sums meet in a
        /// 128-bit add. Wraps at lane width.
        #[inline(always)]
        fn hadd(self) -> $scalar {
            unsafe {
                let pairs = _mm256_hadd_epi32(self.elements, self.elements);
                let quads = _mm256_hadd_epi32(pairs, pairs);
                _mm_cvtsi128_si32(_mm_add_epi32(
                    _mm256_castsi256_si128(quads),
                    _mm256_extracti128_si256(quads, 1),
                )) as $scalar
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M32x8 {
            M32x8::from_raw(unsafe { _mm256_cmpeq_epi32(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M32x8 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M32x8 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M32x8 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I32x8 {
    type Scalar = i32;
    type Mask = M32x8;

    const LANES: usize = LANE_COUNT;

    int32_batch_shared!(i32);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe { _mm256_cmpgt_epi32(other.elements, self.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe { _mm256_cmpgt_epi32(self.elements, other.elements) })
    }
}

impl SimdBatch for U32x8 {
    type Scalar = u32;
    type Mask = M32x8;

    const LANES: usize = LANE_COUNT;

    int32_batch_shared!(u32);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epu32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epu32(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x8 {
        unsafe {
            let bias = _mm256_set1_epi32(i32::MIN);
            M32x8::from_raw(_mm256_cmpgt_epi32(
                _mm256_xor_si256(other.elements, bias),
                _mm256_xor_si256(self.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x8 {
        other.simd_lt(self)
    }
}

impl SimdInt for I32x8 {
    /// Branch-free clamp: the addend picks which bound applies, and the
    /// bound is offset so the final add cannot overflow.
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        unsafe {
            // All-ones where the addend is negative.
            let neg_mask = M32x8::from_raw(_mm256_srai_epi32(other.elements, 31));
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
            let neg_mask = M32x8::from_raw(_mm256_srai_epi32(other.elements, 31));
            let pos_branch = SimdBatch::max(Self::splat(i32::MIN) + other, self);
            let neg_branch = SimdBatch::min(Self::splat(i32::MAX) + other, self);
            Self::select(neg_mask, neg_branch, pos_branch) - other
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_abs_epi32(self.elements) },
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
                _mm256_sll_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Arithmetic shift: the sign bit fills vacated bits.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_sra_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl I32x8 {
    /// Fast division through f64, one 128-bit half at a time: convert,
    /// divide, truncate back. Bit-exact for all inputs (every i32 fits
    /// the f64 mantissa). A zero divisor does not panic: the ±inf
    /// quotient truncates to the x86 integer-indefinite value
    /// (`i32::MIN`), matching `cvttpd2dq`.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        unsafe {
            let a_lo = _mm256_cvtepi32_pd(_mm256_castsi256_si128(self.elements));
            let a_hi = _mm256_cvtepi32_pd(_mm256_extracti128_si256(self.elements, 1));
            let b_lo = _mm256_cvtepi32_pd(_mm256_castsi256_si128(rhs.elements));
            let b_hi = _mm256_cvtepi32_pd(_mm256_extracti128_si256(rhs.elements, 1));

            let q_lo = _mm256_cvttpd_epi32(_mm256_div_pd(a_lo, b_lo));
            let q_hi = _mm256_cvttpd_epi32(_mm256_div_pd(a_hi, b_hi));

            Self {
                elements: _mm256_set_m128i(q_hi, q_lo),
            }
        }
    }
}

impl SimdInt for U32x8 {
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
                _mm256_sll_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Logical shift: zeros fill vacated bits.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_srl_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl U32x8 {
    /// Fast division through f64, per lane; exact for every u32 input.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| (a as f64 / b as f64) as u32)
    }
}

impl Neg for I32x8 {
    type Output = Self;

    /// Wrapping negation: `i32::MIN` stays `i32::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_epi32(_mm256_setzero_si256(), self.elements) },
        }
    }
}

impl Widen for I32x8 {
    type Wide = I64x4;

    /// `vpmovsxdq` widens one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I64x4 {
        I64x4 {
            elements: unsafe { _mm256_cvtepi32_epi64(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I64x4 {
        I64x4 {
            elements: unsafe { _mm256_cvtepi32_epi64(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

impl Widen for U32x8 {
    type Wide = U64x4;

    /// `vpmovzxdq` zero-extends, one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> U64x4 {
        U64x4 {
            elements: unsafe { _mm256_cvtepu32_epi64(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U64x4 {
        U64x4 {
            elements: unsafe { _mm256_cvtepu32_epi64(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

impl Narrow for I32x8 {
    type Narrowed = I16x16;

    /// The pack works per 128-bit half, so `vpermq` restores
    /// whole-register lane order; masking to the low word keeps every
    /// lane in `packusdw` range so truncation passes through unchanged.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I16x16 {
        I16x16 {
            elements: unsafe {
                let keep = _mm256_set1_epi32(0xFFFF);
                let packed = _mm256_packus_epi32(
                    _mm256_and_si256(self.elements, keep),
                    _mm256_and_si256(hi.elements, keep),
                );
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I16x16 {
        I16x16 {
            elements: unsafe {
                let packed = _mm256_packs_epi32(self.elements, hi.elements);
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }
}

impl Narrow for U32x8 {
    type Narrowed = U16x16;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U16x16 {
        U16x16 {
            elements: unsafe {
                let keep = _mm256_set1_epi32(0xFFFF);
                let packed = _mm256_packus_epi32(
                    _mm256_and_si256(self.elements, keep),
                    _mm256_and_si256(hi.elements, keep),
                );
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }

    /// `vpackusdw` reads its input as signed, so lanes at or above
    /// 0x8000_0000 would clamp to zero; an unsigned min caps them at
    /// 0xFFFF first.
    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U16x16 {
        U16x16 {
            elements: unsafe {
                let cap = _mm256_set1_epi32(0xFFFF);
                let packed = _mm256_packus_epi32(
                    _mm256_min_epu32(self.elements, cap),
                    _mm256_min_epu32(hi.elements, cap),
                );
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn wrapping_arithmetic_and_hadd() {
        let a = I32x8::from_fn(|i| (i + 1) as i32);
        let b = I32x8::from_fn(|i| ((i + 1) * 10) as i32);
        assert_eq!(
            (a + b).to_array(),
            [11, 22, 33, 44, 55, 66, 77, 88]
        );
        assert_eq!(a.hadd(), 36);
        assert_eq!(I32x8::splat(i32::MAX).sadd(I32x8::splat(1)).to_array(), [i32::MAX; 8]);
    }

    #[test]
    fn saturation_bounds() {
        let a = I32x8::splat(i32::MIN);
        assert_eq!(a.ssub(I32x8::splat(1)).to_array(), [i32::MIN; 8]);
        // Subtrahend of i32::MIN must saturate positive values upward.
        assert_eq!(
            I32x8::splat(1).ssub(I32x8::splat(i32::MIN)).to_array(),
            [i32::MAX; 8]
        );
        assert_eq!(U32x8::splat(5).ssub(U32x8::splat(10)).to_array(), [0u32; 8]);
        assert_eq!(
            U32x8::splat(u32::MAX - 1).sadd(U32x8::splat(5)).to_array(),
            [u32::MAX; 8]
        );
    }

    #[test]
    fn unsigned_compare_crosses_sign_boundary() {
        let a = U32x8::splat(0x8000_0000);
        let b = U32x8::splat(0x7FFF_FFFF);
        assert!(a.simd_gt(b).all());
        assert!(!a.simd_lt(b).any());
    }

    #[test]
    fn division_paths_agree() {
        let a = I32x8::from_fn(|i| (i as i32 - 4) * 1_000_003);
        let b = I32x8::from_fn(|i| if i % 2 == 0 { 7 } else { -13 });
        assert_eq!(a.div_fast(b).to_array(), a.div_exact(b).to_array());
        assert_eq!((a / b).to_array(), a.div_exact(b).to_array());
    }

    #[test]
    fn zip_interleaves_in_whole_register_order() {
        let a = I32x8::from_fn(|i| i as i32);
        let b = I32x8::from_fn(|i| i as i32 + 10);
        assert_eq!(a.zip_lo(b).to_array(), [0, 10, 1, 11, 2, 12, 3, 13]);
        assert_eq!(a.zip_hi(b).to_array(), [4, 14, 5, 15, 6, 16, 7, 17]);
    }

    #[test]
    fn shifts_and_abs() {
        assert_eq!(I32x8::splat(-64).shr(3).to_array(), [-8i32; 8]);
        assert_eq!(U32x8::splat(0x8000_0000).shr(31).to_array(), [1u32; 8]);
        assert_eq!(I32x8::splat(3).shl(4).to_array(), [48i32; 8]);
        assert_eq!(I32x8::splat(i32::MIN).abs().to_array(), [i32::MIN; 8]);
    }
}
