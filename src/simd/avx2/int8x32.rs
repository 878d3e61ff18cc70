//! AVX2 32-lane 8-bit integer batches, signed and unsigned.
//!
//! Same emulations as the 128-bit 8-bit tier at double width: product
//! from 16-bit partial products, unsigned order via the sign-bit bias,
//! shifts through 16-bit lanes. The horizontal sum runs one `vpsadbw`
//! and folds its four group sums; the arithmetic byte shift widens per
//! half and repairs the in-half `vpacksswb` lane order with a 64-bit
//! permute.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::avx2::int16x16::{I16x16, U16x16};
use crate::simd::avx2::{avx2_int_common, avx2_sign_flip};
use crate::simd::avx2::masks::M8x32;
use crate::simd::traits::{SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 8-bit lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 32;

/// AVX2 batch of 32 packed i8 values.
#[derive(Copy, Clone, Debug)]
pub struct I8x32 {
    /// 256-bit register holding 32 packed i8 lanes.
    pub elements: __m256i,
}

/// AVX2 batch of 32 packed u8 values.
#[derive(Copy, Clone, Debug)]
pub struct U8x32 {
    /// 256-bit register holding 32 packed u8 lanes.
    pub elements: __m256i,
}

avx2_int_common!(I8x32, i8, 32, _mm256_add_epi8, _mm256_sub_epi8);
avx2_int_common!(U8x32, u8, 32, _mm256_add_epi8, _mm256_sub_epi8);

avx2_sign_flip!(I8x32, U8x32);

macro_rules! int8_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe {
                    let even = _mm256_mullo_epi16(self.elements, rhs.elements);
                    let odd = _mm256_mullo_epi16(
                        _mm256_srli_epi16(self.elements, 8),
                        _mm256_srli_epi16(rhs.elements, 8),
                    );
                    Self {
                        elements: _mm256_or_si256(
                            _mm256_and_si256(even, _mm256_set1_epi16(0x00FF)),
                            _mm256_slli_epi16(odd, 8),
                        ),
                    }
                }
            }
        }
    };
}

int8_mul!(I8x32);
int8_mul!(U8x32);

/// Folds the four `vpsadbw` group sums into one i32.
#[inline(always)]
unsafe fn fold_sad(sums: __m256i) -> i32 {
    let halves = _mm_add_epi64(
        _mm256_castsi256_si128(sums),
        _mm256_extracti128_si256(sums, 1),
    );
    _mm_cvtsi128_si32(_mm_add_epi64(halves, _mm_unpackhi_epi64(halves, halves)))
}

macro_rules! int8_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm256_set1_epi8(value as i8) },
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
        fn select(mask: M8x32, a: Self, b: Self) -> Self {
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
                    let even = _mm256_unpacklo_epi8(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi8(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x20)
                },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe {
                    let even = _mm256_unpacklo_epi8(self.elements, other.elements);
                    let odd = _mm256_unpackhi_epi8(self.elements, other.elements);
                    _mm256_permute2x128_si256(even, odd, 0x31)
                },
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M8x32 {
            M8x32::from_raw(unsafe { _mm256_cmpeq_epi8(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M8x32 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M8x32 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M8x32 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I8x32 {
    type Scalar = i8;
    type Mask = M8x32;

    const LANES: usize = LANE_COUNT;

    int8_batch_shared!(i8);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M8x32 {
        M8x32::from_raw(unsafe { _mm256_cmpgt_epi8(other.elements, self.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M8x32 {
        M8x32::from_raw(unsafe { _mm256_cmpgt_epi8(self.elements, other.elements) })
    }

    /// Signed byte sum: bias into unsigned range, `vpsadbw`, undo the
    /// 32-lane bias. Wraps into i8.
    #[inline(always)]
    fn hadd(self) -> i8 {
        unsafe {
            let biased = _mm256_xor_si256(self.elements, _mm256_set1_epi8(i8::MIN));
            let total = fold_sad(_mm256_sad_epu8(biased, _mm256_setzero_si256()));
            (total - LANE_COUNT as i32 * 128) as i8
        }
    }
}

impl SimdBatch for U8x32 {
    type Scalar = u8;
    type Mask = M8x32;

    const LANES: usize = LANE_COUNT;

    int8_batch_shared!(u8);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epu8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epu8(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M8x32 {
        unsafe {
            let bias = _mm256_set1_epi8(i8::MIN);
            M8x32::from_raw(_mm256_cmpgt_epi8(
                _mm256_xor_si256(other.elements, bias),
                _mm256_xor_si256(self.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M8x32 {
        other.simd_lt(self)
    }

    /// Unsigned byte sum in one `vpsadbw`; wraps into u8.
    #[inline(always)]
    fn hadd(self) -> u8 {
        unsafe { fold_sad(_mm256_sad_epu8(self.elements, _mm256_setzero_si256())) as u8 }
    }
}

impl SimdInt for I8x32 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_adds_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_subs_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_abs_epi8(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    /// 16-bit shift plus byte mask; x86 has no 8-bit shift.
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        if count >= 8 {
            return Self::splat(0);
        }
        unsafe {
            let shifted = _mm256_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm256_set1_epi8(((0xFFu32 << count) & 0xFF) as u8 as i8);
            Self {
                elements: _mm256_and_si256(shifted, keep),
            }
        }
    }

    /// Arithmetic shift through sign-extended 16-bit lanes; the 64-bit
    /// permute repairs `vpacksswb`'s in-half lane order.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            let cnt = _mm_cvtsi32_si128(count.min(15) as i32);
            let lo = _mm256_sra_epi16(
                _mm256_cvtepi8_epi16(_mm256_castsi256_si128(self.elements)),
                cnt,
            );
            let hi = _mm256_sra_epi16(
                _mm256_cvtepi8_epi16(_mm256_extracti128_si256(self.elements, 1)),
                cnt,
            );
            Self {
                elements: _mm256_permute4x64_epi64(
                    _mm256_packs_epi16(lo, hi),
                    0b1101_1000,
                ),
            }
        }
    }
}

impl SimdInt for U8x32 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_adds_epu8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_subs_epu8(self.elements, other.elements) },
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
        if count >= 8 {
            return Self::splat(0);
        }
        unsafe {
            let shifted = _mm256_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm256_set1_epi8(((0xFFu32 << count) & 0xFF) as u8 as i8);
            Self {
                elements: _mm256_and_si256(shifted, keep),
            }
        }
    }

    /// Logical shift: 16-bit shift plus byte mask.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        if count >= 8 {
            return Self::splat(0);
        }
        unsafe {
            let shifted = _mm256_srl_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm256_set1_epi8((0xFFu32 >> count) as u8 as i8);
            Self {
                elements: _mm256_and_si256(shifted, keep),
            }
        }
    }
}

impl Neg for I8x32 {
    type Output = Self;

    /// Wrapping negation: `i8::MIN` stays `i8::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_epi8(_mm256_setzero_si256(), self.elements) },
        }
    }
}

impl Widen for I8x32 {
    type Wide = I16x16;

    /// `vpmovsxbw` widens one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I16x16 {
        I16x16 {
            elements: unsafe { _mm256_cvtepi8_epi16(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I16x16 {
        I16x16 {
            elements: unsafe { _mm256_cvtepi8_epi16(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

impl Widen for U8x32 {
    type Wide = U16x16;

    /// `vpmovzxbw` zero-extends, one 128-bit half at a time.
    #[inline(always)]
    fn widen_lo(self) -> U16x16 {
        U16x16 {
            elements: unsafe { _mm256_cvtepu8_epi16(_mm256_castsi256_si128(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U16x16 {
        U16x16 {
            elements: unsafe { _mm256_cvtepu8_epi16(_mm256_extracti128_si256(self.elements, 1)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn mul_and_saturation() {
        let a = I8x32::from_fn(|i| (i as i8) - 16);
        let expect: [i8; 32] = std::array::from_fn(|i| ((i as i8) - 16).wrapping_mul(5));
        assert_eq!((a * I8x32::splat(5)).to_array(), expect);
        assert_eq!(
            I8x32::splat(120).sadd(I8x32::splat(10)).to_array(),
            [i8::MAX; 32]
        );
        assert_eq!(U8x32::splat(5).ssub(U8x32::splat(10)).to_array(), [0u8; 32]);
    }

    #[test]
    fn hadd_folds_four_sad_groups() {
        assert_eq!(U8x32::splat(1).hadd(), 32);
        assert_eq!(I8x32::splat(-1).hadd(), -32);
        let ramp = U8x32::from_fn(|i| i as u8);
        // 0 + 1 + ... + 31 = 496 wraps mod 256 = 240.
        assert_eq!(ramp.hadd(), 240);
    }

    #[test]
    fn byte_shifts() {
        assert_eq!(I8x32::splat(1).shl(3).to_array(), [8i8; 32]);
        assert_eq!(I8x32::splat(-16).shr(2).to_array(), [-4i8; 32]);
        assert_eq!(I8x32::splat(-1).shr(9).to_array(), [-1i8; 32]);
        assert_eq!(U8x32::splat(0x80).shr(7).to_array(), [1u8; 32]);
    }

    #[test]
    fn arithmetic_shr_keeps_lane_order() {
        let ramp = I8x32::from_fn(|i| (i as i8) * 2 - 31);
        let expect: [i8; 32] = std::array::from_fn(|i| ((i as i8) * 2 - 31) >> 1);
        assert_eq!(ramp.shr(1).to_array(), expect);
    }

    #[test]
    fn unsigned_order() {
        let a = U8x32::splat(0xFF);
        let b = U8x32::splat(1);
        assert!(a.simd_gt(b).all());
        assert!(b.simd_lt(a).all());
    }
}
