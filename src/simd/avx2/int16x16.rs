//! AVX2 16-lane 16-bit integer batches, signed and unsigned.
//!
//! Everything the 128-bit 16-bit tier has, at double width: native
//! product, saturating arithmetic, min/max and all three shifts. The
//! horizontal sum widens through `vpmaddwd` before reducing across
//! halves.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::avx2::int32x8::{I32x8, U32x8};
use crate::simd::avx2::int8x32::{I8x32, U8x32};
use crate::simd::avx2::{avx2_int_common, avx2_sign_flip};
use crate::simd::avx2::masks::M16x16;
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 16-bit lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 16;

/// AVX2 batch of 16 packed i16 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x16 {
    /// 256-bit register holding 16 packed i16 lanes.
    pub elements: __m256i,
}

/// AVX2 batch of 16 packed u16 values.
#[derive(Copy, Clone, Debug)]
pub struct U16x16 {
    /// 256-bit register holding 16 packed u16 lanes.
    pub elements: __m256i,
}

avx2_int_common!(I16x16, i16, 16, _mm256_add_epi16, _mm256_sub_epi16);
avx2_int_common!(U16x16, u16, 16, _mm256_add_epi16, _mm256_sub_epi16);

avx2_sign_flip!(I16x16, U16x16);

macro_rules! int16_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            /// Wrapping lane product, low 16 bits.
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm256_mullo_epi16(self.elements, rhs.elements) },
                }
            }
        }
    };
}

int16_mul!(I16x16);
int16_mul!(U16x16);

macro_rules! int16_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm256_set1_epi16(value as i16) },
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
        fn select(mask: M16x16, a: Self, b: Self) -> Self {
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
                    let even = _mm256_unpacklo_epi16(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi16(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x20)
                },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe {
                    let even = _mm256_unpacklo_epi16(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi16(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x31)
                },
            }
        }

        /// Widen to 32-bit partial sums with `vpmaddwd`, reduce across
        /// halves, wrap back to lane width.
        #[inline(always)]
        fn hadd(self) -> $scalar {
            unsafe {
                let partial = _mm256_madd_epi16(self.elements, _mm256_set1_epi16(1));
                let folded = _mm256_hadd_epi32(partial, partial);
                let folded = _mm256_hadd_epi32(folded, folded);
                _mm_cvtsi128_si32(_mm_add_epi32(
                    _mm256_castsi256_si128(folded),
                    _mm256_extracti128_si256(folded, 1),
                )) as $scalar
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M16x16 {
            M16x16::from_raw(unsafe { _mm256_cmpeq_epi16(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M16x16 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M16x16 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M16x16 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I16x16 {
    type Scalar = i16;
    type Mask = M16x16;

    const LANES: usize = LANE_COUNT;

    int16_batch_shared!(i16);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M16x16 {
        M16x16::from_raw(unsafe { _mm256_cmpgt_epi16(other.elements, self.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M16x16 {
        M16x16::from_raw(unsafe { _mm256_cmpgt_epi16(self.elements, other.elements) })
    }
}

impl SimdBatch for U16x16 {
    type Scalar = u16;
    type Mask = M16x16;

    const LANES: usize = LANE_COUNT;

    int16_batch_shared!(u16);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epu16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epu16(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M16x16 {
        unsafe {
            let bias = _mm256_set1_epi16(i16::MIN);
            M16x16::from_raw(_mm256_cmpgt_epi16(
                _mm256_xor_si256(other.elements, bias),
                _mm256_xor_si256(self.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M16x16 {
        other.simd_lt(self)
    }
}

impl SimdInt for I16x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_adds_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_subs_epi16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_abs_epi16(self.elements) },
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
                _mm256_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Arithmetic shift; counts past the lane width fill with the sign.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_sra_epi16(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl SimdInt for U16x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_adds_epu16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_subs_epu16(self.elements, other.elements) },
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
            elements: unsafe {
                _mm256_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self {
            elements: unsafe {
                _mm256_srl_epi16(self.elements, _mm_cvtsi32_si128(count as i32))
            },
        }
    }
}

impl Neg for I16x16 {
    type Output = Self;

    /// Wrapping negation: `i16::MIN` stays `i16::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_epi16(_mm256_setzero_si256(), self.elements) },
        }
    }
}

impl Widen for I16x16 {
    type Wide = I32x8;

    /// `vpmovsxwd` widens one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I32x8 {
        I32x8 {
            elements: unsafe { _mm256_cvtepi16_epi32(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I32x8 {
        I32x8 {
            elements: unsafe { _mm256_cvtepi16_epi32(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

impl Widen for U16x16 {
    type Wide = U32x8;

    /// `vpmovzxwd` zero-extends, one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> U32x8 {
        U32x8 {
            elements: unsafe { _mm256_cvtepu16_epi32(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U32x8 {
        U32x8 {
            elements: unsafe { _mm256_cvtepu16_epi32(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

impl Narrow for I16x16 {
    type Narrowed = I8x32;

    /// The pack works per 128-bit half, so `vpermq` restores
    /// whole-register lane order; masking to the low byte keeps every
    /// lane in `packus` range so truncation passes through unchanged.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I8x32 {
        I8x32 {
            elements: unsafe {
                let keep = _mm256_set1_epi16(0x00FF);
                let packed = _mm256_packus_epi16(
                    _mm256_and_si256(self.elements, keep),
                    _mm256_and_si256(hi.elements, keep),
                );
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I8x32 {
        I8x32 {
            elements: unsafe {
                let packed = _mm256_packs_epi16(self.elements, hi.elements);
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }
}

impl Narrow for U16x16 {
    type Narrowed = U8x32;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U8x32 {
        U8x32 {
            elements: unsafe {
                let keep = _mm256_set1_epi16(0x00FF);
                let packed = _mm256_packus_epi16(
                    _mm256_and_si256(self.elements, keep),
                    _mm256_and_si256(hi.elements, keep),
                );
                _mm256_permute4x64_epi64(packed, 0b11_01_10_00)
            },
        }
    }

    /// `vpackuswb` reads its input as signed, so lanes at or above
    /// 0x8000 would clamp to zero; an unsigned min caps them at 255
    /// first.
    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U8x32 {
        U8x32 {
            elements: unsafe {
                let cap = _mm256_set1_epi16(0x00FF);
                let packed = _mm256_packus_epi16(
                    _mm256_min_epu16(self.elements, cap),
                    _mm256_min_epu16(hi.elements, cap),
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
    fn arithmetic_and_saturation() {
        let a = I16x16::splat(1000);
        assert_eq!((a * a).to_array(), [1000i16.wrapping_mul(1000); 16]);
        assert_eq!(
            I16x16::splat(i16::MAX).sadd(I16x16::splat(1)).to_array(),
            [i16::MAX; 16]
        );
        assert_eq!(
            U16x16::splat(5).ssub(U16x16::splat(10)).to_array(),
            [0u16; 16]
        );
    }

    #[test]
    fn hadd_crosses_halves() {
        let a = I16x16::from_fn(|i| (i as i16 + 1) * 10);
        // 10 + 20 + ... + 160 = 1360.
        assert_eq!(a.hadd(), 1360);
        assert_eq!(U16x16::splat(10_000).hadd(), (160_000u32 % 65_536) as u16);
    }

    #[test]
    fn unsigned_order() {
        let a = U16x16::splat(0x8000);
        let b = U16x16::splat(0x7FFF);
        assert!(a.simd_gt(b).all());
        assert!(!a.simd_le(b).any());
    }

    #[test]
    fn shifts() {
        assert_eq!(I16x16::splat(-256).shr(4).to_array(), [-16i16; 16]);
        assert_eq!(U16x16::splat(0x8000).shr(15).to_array(), [1u16; 16]);
        assert_eq!(I16x16::splat(3).shl(2).to_array(), [12i16; 16]);
    }

    #[test]
    fn width_moves_keep_whole_register_order() {
        let a = I16x16::from_fn(|i| i as i16);
        let b = I16x16::from_fn(|i| i as i16 + 16);
        let packed = a.narrow(b);
        for i in 0..32 {
            assert_eq!(packed.to_array()[i], i as i8);
        }

        let wide = a.widen_hi();
        assert_eq!(wide.to_array(), [8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn saturating_narrow_clamps_both_signednesses() {
        let over = I16x16::splat(300);
        let under = I16x16::splat(-300);
        let packed = over.narrow_saturating(under);
        assert_eq!(packed.to_array()[0], i8::MAX);
        assert_eq!(packed.to_array()[16], i8::MIN);

        // Unsigned lanes past 0x8000 must clamp to 255, not 0.
        let big = U16x16::splat(0x9000);
        assert_eq!(big.narrow_saturating(big).to_array(), [u8::MAX; 32]);
    }
}
