//! SSE 16-lane 8-bit integer batches, signed and unsigned.
//!
//! Saturating arithmetic is native at this width (`paddsb`/`paddusb`
//! family). The gaps are the 8-bit product, built from 16-bit partial
//! products, the unsigned ordered compare (sign-bit bias), and shifts,
//! which x86 only offers from 16-bit lanes up and are emulated with a
//! 16-bit shift plus a byte mask.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Mul, Neg};

use crate::simd::sse::int16x8::{I16x8, U16x8};
use crate::simd::sse::masks::M8x16;
use crate::simd::sse::{sse_int_common, sse_sign_flip};
use crate::simd::traits::{SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 8-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 16;

/// SSE batch of 16 packed i8 values.
#[derive(Copy, Clone, Debug)]
pub struct I8x16 {
    /// 128-bit register holding 16 packed i8 lanes.
    pub elements: __m128i,
}

/// SSE batch of 16 packed u8 values.
#[derive(Copy, Clone, Debug)]
pub struct U8x16 {
    /// 128-bit register holding 16 packed u8 lanes.
    pub elements: __m128i,
}

sse_int_common!(I8x16, i8, 16, _mm_add_epi8, _mm_sub_epi8);
sse_int_common!(U8x16, u8, 16, _mm_add_epi8, _mm_sub_epi8);

sse_sign_flip!(I8x16, U8x16);

/// 8-bit wrapping product from 16-bit partial products: even bytes are
/// multiplied in place, odd bytes after a right shift, and the low byte
/// of each 16-bit product is recombined.
macro_rules! int8_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe {
                    let even = _mm_mullo_epi16(self.elements, rhs.elements);
                    let odd = _mm_mullo_epi16(
                        _mm_srli_epi16(self.elements, 8),
                        _mm_srli_epi16(rhs.elements, 8),
                    );
                    Self {
                        elements: _mm_or_si128(
                            _mm_and_si128(even, _mm_set1_epi16(0x00FF)),
                            _mm_slli_epi16(odd, 8),
                        ),
                    }
                }
            }
        }
    };
}

int8_mul!(I8x16);
int8_mul!(U8x16);

macro_rules! int8_batch_shared {
    ($scalar:ty) => {
        #[inline(always)]
        fn splat(value: $scalar) -> Self {
            Self {
                elements: unsafe { _mm_set1_epi8(value as i8) },
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
        fn select(mask: M8x16, a: Self, b: Self) -> Self {
            Self {
                elements: unsafe { _mm_blendv_epi8(b.elements, a.elements, mask.mask) },
            }
        }

        #[inline(always)]
        fn zip_lo(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpacklo_epi8(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn zip_hi(self, other: Self) -> Self {
            Self {
                elements: unsafe { _mm_unpackhi_epi8(self.elements, other.elements) },
            }
        }

        #[inline(always)]
        fn simd_eq(self, other: Self) -> M8x16 {
            M8x16::from_raw(unsafe { _mm_cmpeq_epi8(self.elements, other.elements) })
        }

        #[inline(always)]
        fn simd_ne(self, other: Self) -> M8x16 {
            !self.simd_eq(other)
        }

        #[inline(always)]
        fn simd_le(self, other: Self) -> M8x16 {
            !self.simd_gt(other)
        }

        #[inline(always)]
        fn simd_ge(self, other: Self) -> M8x16 {
            !self.simd_lt(other)
        }
    };
}

impl SimdBatch for I8x16 {
    type Scalar = i8;
    type Mask = M8x16;

    const LANES: usize = LANE_COUNT;

    int8_batch_shared!(i8);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M8x16 {
        M8x16::from_raw(unsafe { _mm_cmplt_epi8(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M8x16 {
        M8x16::from_raw(unsafe { _mm_cmpgt_epi8(self.elements, other.elements) })
    }

    /// Signed byte sum: bias every lane into unsigned range, reduce with
    /// `psadbw`, then undo the 16-lane bias. Wraps into i8.
    #[inline(always)]
    fn hadd(self) -> i8 {
        unsafe {
            let biased = _mm_xor_si128(self.elements, _mm_set1_epi8(i8::MIN));
            let sums = _mm_sad_epu8(biased, _mm_setzero_si128());
            let total = _mm_extract_epi16(sums, 0) + _mm_extract_epi16(sums, 4);
            (total - LANE_COUNT as i32 * 128) as i8
        }
    }
}

impl SimdBatch for U8x16 {
    type Scalar = u8;
    type Mask = M8x16;

    const LANES: usize = LANE_COUNT;

    int8_batch_shared!(u8);

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_epu8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_epu8(self.elements, other.elements) },
        }
    }

    /// Sign-bit bias then signed compare; see the module docs.
    #[inline(always)]
    fn simd_lt(self, other: Self) -> M8x16 {
        unsafe {
            let bias = _mm_set1_epi8(i8::MIN);
            M8x16::from_raw(_mm_cmplt_epi8(
                _mm_xor_si128(self.elements, bias),
                _mm_xor_si128(other.elements, bias),
            ))
        }
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M8x16 {
        other.simd_lt(self)
    }

    /// Unsigned byte sum in one `psadbw`; wraps into u8.
    #[inline(always)]
    fn hadd(self) -> u8 {
        unsafe {
            let sums = _mm_sad_epu8(self.elements, _mm_setzero_si128());
            (_mm_extract_epi16(sums, 0) + _mm_extract_epi16(sums, 4)) as u8
        }
    }
}

impl SimdInt for I8x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_adds_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_subs_epi8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_abs_epi8(self.elements) },
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
            let shifted = _mm_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm_set1_epi8(((0xFFu32 << count) & 0xFF) as u8 as i8);
            Self {
                elements: _mm_and_si128(shifted, keep),
            }
        }
    }

    /// Arithmetic shift through sign-extended 16-bit lanes, packed back
    /// with saturation (a no-op here: shifted values stay in i8 range).
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            let cnt = _mm_cvtsi32_si128(count.min(15) as i32);
            let lo = _mm_sra_epi16(_mm_cvtepi8_epi16(self.elements), cnt);
            let hi = _mm_sra_epi16(
                _mm_cvtepi8_epi16(_mm_unpackhi_epi64(self.elements, self.elements)),
                cnt,
            );
            Self {
                elements: _mm_packs_epi16(lo, hi),
            }
        }
    }
}

impl SimdInt for U8x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_adds_epu8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_subs_epu8(self.elements, other.elements) },
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
            let shifted = _mm_sll_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm_set1_epi8(((0xFFu32 << count) & 0xFF) as u8 as i8);
            Self {
                elements: _mm_and_si128(shifted, keep),
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
            let shifted = _mm_srl_epi16(self.elements, _mm_cvtsi32_si128(count as i32));
            let keep = _mm_set1_epi8((0xFFu32 >> count) as u8 as i8);
            Self {
                elements: _mm_and_si128(shifted, keep),
            }
        }
    }
}

impl Neg for I8x16 {
    type Output = Self;

    /// Wrapping negation: `i8::MIN` stays `i8::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_sub_epi8(_mm_setzero_si128(), self.elements) },
        }
    }
}

impl Widen for I8x16 {
    type Wide = I16x8;

    /// `pmovsxbw`; the high half shifts down into reach first.
    #[inline(always)]
    fn widen_lo(self) -> I16x8 {
        I16x8 {
            elements: unsafe { _mm_cvtepi8_epi16(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I16x8 {
        I16x8 {
            elements: unsafe { _mm_cvtepi8_epi16(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

impl Widen for U8x16 {
    type Wide = U16x8;

    /// `pmovzxbw` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U16x8 {
        U16x8 {
            elements: unsafe { _mm_cvtepu8_epi16(self.elements) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U16x8 {
        U16x8 {
            elements: unsafe { _mm_cvtepu8_epi16(_mm_srli_si128(self.elements, 8)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_mul_both_signs() {
        let a = I8x16::from_fn(|i| (i as i8) - 8);
        let b = I8x16::splat(3);
        let expect: [i8; 16] = std::array::from_fn(|i| ((i as i8) - 8).wrapping_mul(3));
        assert_eq!((a * b).to_array(), expect);

        let c = U8x16::splat(100);
        assert_eq!((c * U8x16::splat(3)).to_array(), [44u8; 16]); // 300 mod 256
    }

    #[test]
    fn native_saturation() {
        assert_eq!(
            I8x16::splat(120).sadd(I8x16::splat(10)).to_array(),
            [i8::MAX; 16]
        );
        assert_eq!(
            I8x16::splat(-120).ssub(I8x16::splat(10)).to_array(),
            [i8::MIN; 16]
        );
        // 5 - 10 clamps to 0, not 251.
        assert_eq!(U8x16::splat(5).ssub(U8x16::splat(10)).to_array(), [0u8; 16]);
        assert_eq!(
            U8x16::splat(250).sadd(U8x16::splat(10)).to_array(),
            [u8::MAX; 16]
        );
    }

    #[test]
    fn unsigned_compare_bias() {
        let a = U8x16::splat(0x7F);
        let b = U8x16::splat(0x80);
        assert!(crate::simd::traits::SimdMask::all(a.simd_lt(b)));
        assert!(!crate::simd::traits::SimdMask::any(a.simd_gt(b)));
    }

    #[test]
    fn hadd_wraps_at_lane_width() {
        assert_eq!(I8x16::splat(1).hadd(), 16);
        assert_eq!(U8x16::splat(1).hadd(), 16);
        assert_eq!(I8x16::splat(-1).hadd(), -16);
        // 16 * 100 = 1600 wraps mod 256 = 64.
        assert_eq!(U8x16::splat(100).hadd(), 64);
    }

    #[test]
    fn shifts() {
        assert_eq!(I8x16::splat(1).shl(3).to_array(), [8i8; 16]);
        assert_eq!(I8x16::splat(-16).shr(2).to_array(), [-4i8; 16]);
        assert_eq!(I8x16::splat(-1).shr(9).to_array(), [-1i8; 16]);
        assert_eq!(U8x16::splat(0x80).shr(7).to_array(), [1u8; 16]);
        assert_eq!(U8x16::splat(1).shl(8).to_array(), [0u8; 16]);
    }

    #[test]
    fn zip_interleaves_bytes() {
        let a = I8x16::from_fn(|i| i as i8);
        let b = I8x16::from_fn(|i| (i + 16) as i8);
        let lo = a.zip_lo(b).to_array();
        assert_eq!(&lo[..4], &[0, 16, 1, 17]);
        let hi = a.zip_hi(b).to_array();
        assert_eq!(&hi[..4], &[8, 24, 9, 25]);
    }
}
