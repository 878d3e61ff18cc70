//! SSE 8-lane 16-bit integer batches, signed and unsigned.
//!
//! The richest integer width on x86: products (`pmullw`), saturating
//! arithmetic, min/max and all three shift directions are single
//! instructions. Only the unsigned ordered compare needs the sign-bit
//! bias, and the horizontal sum goes through `pmaddwd` against a vector
//! of ones to widen to 32 bits before reducing.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::sse::int32x4::{I32x4, U32x4};
use crate::simd::sse::int8x16::{I8x16, U8x16};
use crate::simd::sse::masks::M16x8;
use crate::simd::sse::{sse_int_common, sse_sign_flip};
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 16-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// SSE batch of 8 packed i16 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    /// 128-bit register holding 8 packed i16 lanes.
    pub elements: __m128i,
}

/// SSE batch of 8 packed u16 values.
#[derive(Copy, Clone, Debug)]
pub struct U16x8 {
    /// 128-bit register holding 8 packed u16 lanes.
    pub elements: __m128i,
}

sse_int_common!(I16x8, i16, 8, _mm_add_epi16, _mm_sub_epi16);
sse_int_common!(U16x8, u16, 8, _mm_add_epi16, _mm_sub_epi16);

sse_sign_flip!(I16x8, U16x8);

macro_rules! int16_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            /// Wrapping lane product; `pmullw` keeps the low 16 bits,
            /// which is the two's-complement result for both signs.
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_mullo_epi16(self.elements, rhs.elements) },
                }
            }
        }
    };
}

int16_mul!(I16x8);
int16_mul!(U16x8);

macro_rules! int16_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm_set1_epi16(value as i16) },
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
                elements: unsafe { _mm_andnot_si128(other.elements, self.elements) },
            }
        }

        #[inline(always)]
        fn select(mask: M16x8, a: Self, b: Self) -> Self {
            Self {
                elements: unsafe { _mm_blendv_epi8(b.elements, a.elements, mask.mask) },
            }
        }

        #[inline(always)]
        fn zip_lo(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpacklo_epi16(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpackhi_epi16(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M16x8 {
            M16x8::from_raw(unsafe { _mm_cmpeq_epi16(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M16x8 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M16x8 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M16x8 {
            !self.simd_lt(other)
        }

        /// Widen to 32-bit partial sums with `pmaddwd`, then reduce.
        /// Wraps at lane width.
        #[inline(always)]
        fn hadd(self) -> $scalar {
            unsafe {
                let partial = _mm_madd_epi16(self.elements, _mm_set1_epi16(1));
                let folded = _mm_hadd_epi32(partial, partial);
                _mm_cvtsi128_si32(_mm_hadd_epi32(folded, folded)) as $scalar
            }
        }
    };
}

impl SimdBatch for I16x8 {
    type Scalar = i16;
    type Mask = M16x8;

    const LANES: usize = LANE_COUNT;

    int16_batch_shared!(i16);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M16x8 {
        M16x8::from_raw(unsafe { _mm_cmplt_epi16(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M16x8 {
        M16x8::from_raw(unsafe { _mm_cmpgt_epi16(self.elements, other.elements) })
    }
}

impl SimdBatch for U16x8 {
    type Scalar = u16;
    type Mask = M16x8;

    const LANES: usize = LANE_COUNT;

    int16_batch_shared!(u16);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epu16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epu16(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M16x8 {
        unsafe {
            let bias = _mm_set1_epi16(i16::MIN);
            M16x8::from_raw(_mm_cmplt_epi16(
                _mm_xor_si128(self.elements, bias),
                _mm_xor_si128(other.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M16x8 {
        other.simd_lt(self)
    }
}

impl SimdInt for I16x8 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_adds_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_subs_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_abs_epi16(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self {
            elements: unsafe { _mm_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }

    /// Arithmetic shift; counts past the lane width fill with the sign.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe { _mm_sra_epi16(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }
}

impl SimdInt for U16x8 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_adds_epu16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_subs_epu16(self.elements, other.elements) },
        }
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
            elements: unsafe { _mm_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe { _mm_srl_epi16(self.elements, _mm_cvtsi32_si128(count as i32)) },
        }
    }
}

impl Neg for I16x8 {
    type Output = Self;

    /// Wrapping negation: `i16::MIN` stays `i16::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_sub_epi16(_mm_setzero_si128(), self.elements) },
        }
    }
}

impl Widen for I16x8 {
    type Wide = I32x4;

    /// `pmovsxwd`; the high half shifts down into reach first.
    #[inline(always)]
    fn widen_lo(self) -> I32x4 {
        I32x4 {
            elements: unsafe { _mm_cvtepi16_epi32(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I32x4 {
        I32x4 {
            elements: unsafe { _mm_cvtepi16_epi32(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

impl Widen for U16x8 {
    type Wide = U32x4;

    /// `pmovzxwd` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U32x4 {
        U32x4 {
            elements: unsafe { _mm_cvtepu16_epi32(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U32x4 {
        U32x4 {
            elements: unsafe { _mm_cvtepu16_epi32(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

impl Narrow for I16x8 {
    type Narrowed = I8x16;

    /// Masking to the low byte keeps every lane in `packus` range, so
    /// the pack passes the truncated bits through unchanged.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I8x16 {
        I8x16 {
            elements: unsafe {
                let keep = _mm_set1_epi16(0x00FF);
                _mm_packus_epi16(
                    _mm_and_si128(self.elements, keep),
                    _mm_and_si128(hi.elements, keep),
                )
            },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I8x16 {
        I8x16 {
            elements: unsafe { _mm_packs_epi16(self.elements, hi.elements) },
        }
    }
}

impl Narrow for U16x8 {
    type Narrowed = U8x16;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U8x16 {
        U8x16 {
            elements: unsafe {
                let keep = _mm_set1_epi16(0x00FF);
                _mm_packus_epi16(
                    _mm_and_si128(self.elements, keep),
                    _mm_and_si128(hi.elements, keep),
                )
            },
        }
    }

    /// `packus` reads its input as signed, so lanes at or above 0x8000
    /// would clamp to zero; an unsigned min caps them at 255 first.
    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U8x16 {
        U8x16 {
            elements: unsafe {
                let cap = _mm_set1_epi16(0x00FF);
                _mm_packus_epi16(
                    _mm_min_epu16(self.elements, cap),
                    _mm_min_epu16(hi.elements, cap),
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mullo_keeps_low_bits() {
        let a = I16x8::splat(1000);
        assert_eq!((a * a).to_array(), [1000i16.wrapping_mul(1000); 8]);
        let b = U16x8::splat(500);
        assert_eq!((b * b).to_array(), [500u16.wrapping_mul(500); 8]);
    }

    #[test]
    fn native_saturation() {
        assert_eq!(
            I16x8::splat(i16::MAX).sadd(I16x8::splat(1)).to_array(),
            [i16::MAX; 8]
        );
        assert_eq!(
            I16x8::splat(i16::MIN).ssub(I16x8::splat(1)).to_array(),
            [i16::MIN; 8]
        );
        assert_eq!(U16x8::splat(5).ssub(U16x8::splat(10)).to_array(), [0u16; 8]);
    }

    #[test]
    fn unsigned_compare_bias() {
        use crate::simd::traits::SimdMask;
        let small = U16x8::splat(0x7FFF);
        let big = U16x8::splat(0x8000);
        assert!(small.simd_lt(big).all());
        assert!(!small.simd_ge(big).any());
    }

    #[test]
    fn hadd_via_madd() {
        let a = I16x8::from_fn(|i| (i as i16 + 1) * 100);
        assert_eq!(a.hadd(), 3600);
        assert_eq!(I16x8::splat(-1).hadd(), -8);
        // 8 * 10_000 = 80_000 wraps mod 65_536 = 14_464.
        assert_eq!(U16x8::splat(10_000).hadd(), 14_464);
    }

    #[test]
    fn shift_semantics() {
        assert_eq!(I16x8::splat(-256).shr(4).to_array(), [-16i16; 8]);
        assert_eq!(I16x8::splat(-1).shr(40).to_array(), [-1i16; 8]);
        assert_eq!(U16x8::splat(0x8000).shr(15).to_array(), [1u16; 8]);
        assert_eq!(U16x8::splat(1).shr(16).to_array(), [0u16; 8]);
        assert_eq!(U16x8::splat(3).shl(2).to_array(), [12u16; 8]);
    }

    #[test]
    fn narrowing_packs_truncate_and_saturate() {
        // 0x0180 truncates to the low byte, saturates to the bound.
        let lo = I16x8::splat(0x0180);
        let hi = I16x8::splat(-0x0180);
        assert_eq!(lo.narrow(hi).to_array()[0], -0x80i8);
        assert_eq!(lo.narrow(hi).to_array()[8], -0x80i8);
        assert_eq!(lo.narrow_saturating(hi).to_array()[0], i8::MAX);
        assert_eq!(lo.narrow_saturating(hi).to_array()[8], i8::MIN);

        // Unsigned lanes past 0x8000 must clamp to 255, not 0.
        let big = U16x8::splat(0x9000);
        assert_eq!(big.narrow_saturating(big).to_array(), [u8::MAX; 16]);
        assert_eq!(big.narrow(big).to_array(), [0u8; 16]);
    }

    #[test]
    fn widening_extends_per_signedness() {
        let signed = I16x8::splat(-2).widen_lo();
        assert_eq!(signed.to_array(), [-2i32; 4]);
        let hi = I16x8::from_fn(|i| i as i16).widen_hi();
        assert_eq!(hi.to_array(), [4, 5, 6, 7]);
        let unsigned = U16x8::splat(0xFFFE).widen_lo();
        assert_eq!(unsigned.to_array(), [0xFFFEu32; 4]);
    }

    #[test]
    fn min_max_across_sign_boundary() {
        let a = I16x8::splat(-1);
        let b = I16x8::splat(1);
        assert_eq!(a.min(b).to_array(), [-1i16; 8]);
        let c = U16x8::splat(0xFFFF);
        let d = U16x8::splat(1);
        assert_eq!(c.max(d).to_array(), [0xFFFFu16; 8]);
    }
}
