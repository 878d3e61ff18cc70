//! NEON 16-lane 8-bit integer batches, signed and unsigned.
//!
//! Nothing at this width needs emulating except division: product,
//! saturating arithmetic, unsigned ordered compares, min/max and the
//! whole-register sum are all single instructions. Shift counts past
//! the lane width are normalized to the x86 tiers' semantics (zero for
//! left/logical, sign fill for arithmetic) before reaching `vshlq`.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Mul, Neg};

use crate::simd::neon::int16x8::{I16x8, U16x8};
use crate::simd::neon::masks::M8x16;
use crate::simd::neon::{neon_int_batch, neon_int_common, neon_sign_flip};
use crate::simd::traits::{SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 8-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 16;

/// NEON batch of 16 packed i8 values.
#[derive(Copy, Clone, Debug)]
pub struct I8x16 {
    /// 128-bit register holding 16 packed i8 lanes.
    pub elements: int8x16_t,
}

/// NEON batch of 16 packed u8 values.
#[derive(Copy, Clone, Debug)]
pub struct U8x16 {
    /// 128-bit register holding 16 packed u8 lanes.
    pub elements: uint8x16_t,
}

neon_int_common!(
    I8x16, i8, 16, int8x16_t, vld1q_s8, vst1q_s8, vaddq_s8, vsubq_s8, vandq_s8, vorrq_s8,
    veorq_s8, vdupq_n_s8
);
neon_int_common!(
    U8x16, u8, 16, uint8x16_t, vld1q_u8, vst1q_u8, vaddq_u8, vsubq_u8, vandq_u8, vorrq_u8,
    veorq_u8, vdupq_n_u8
);

neon_int_batch!(
    I8x16, i8, M8x16, vdupq_n_s8, vminq_s8, vmaxq_s8, vceqq_s8, vcltq_s8, vcgtq_s8, vcleq_s8,
    vcgeq_s8, vbicq_s8, vbslq_s8, vzip1q_s8, vzip2q_s8, vaddvq_s8
);
neon_int_batch!(
    U8x16, u8, M8x16, vdupq_n_u8, vminq_u8, vmaxq_u8, vceqq_u8, vcltq_u8, vcgtq_u8, vcleq_u8,
    vcgeq_u8, vbicq_u8, vbslq_u8, vzip1q_u8, vzip2q_u8, vaddvq_u8
);

neon_sign_flip!(I8x16, U8x16, vreinterpretq_u8_s8, vreinterpretq_s8_u8);

impl Mul for I8x16 {
    type Output = Self;

    /// Wrapping lane product.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_s8(self.elements, rhs.elements) },
        }
    }
}

impl Mul for U8x16 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_u8(self.elements, rhs.elements) },
        }
    }
}

impl SimdInt for I8x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_s8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_s8(self.elements, other.elements) },
        }
    }

    /// Wrapping magnitude; `i8::MIN` stays put.
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_s8(self.elements) },
        }
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
        Self {
            elements: unsafe { vshlq_s8(self.elements, vdupq_n_s8(count as i8)) },
        }
    }

    /// Arithmetic shift via `sshl` with a negated count; counts past
    /// the lane width fill with the sign bit.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(7) as i8;
        Self {
            elements: unsafe { vshlq_s8(self.elements, vdupq_n_s8(-count)) },
        }
    }
}

impl SimdInt for U8x16 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_u8(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_u8(self.elements, other.elements) },
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
        Self {
            elements: unsafe { vshlq_u8(self.elements, vdupq_n_s8(count as i8)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        if count >= 8 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u8(self.elements, vdupq_n_s8(-(count as i8))) },
        }
    }
}

impl Neg for I8x16 {
    type Output = Self;

    /// Wrapping negation: `i8::MIN` stays `i8::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_s8(self.elements) },
        }
    }
}

impl Widen for I8x16 {
    type Wide = I16x8;

    /// `sshll` sign-extends one doubleword half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I16x8 {
        I16x8 {
            elements: unsafe { vmovl_s8(vget_low_s8(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I16x8 {
        I16x8 {
            elements: unsafe { vmovl_s8(vget_high_s8(self.elements)) },
        }
    }
}

impl Widen for U8x16 {
    type Wide = U16x8;

    /// `ushll` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U16x8 {
        U16x8 {
            elements: unsafe { vmovl_u8(vget_low_u8(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U16x8 {
        U16x8 {
            elements: unsafe { vmovl_u8(vget_high_u8(self.elements)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn native_saturation() {
        assert_eq!(
            I8x16::splat(120).sadd(I8x16::splat(10)).to_array(),
            [i8::MAX; 16]
        );
        assert_eq!(U8x16::splat(5).ssub(U8x16::splat(10)).to_array(), [0u8; 16]);
        assert_eq!(
            U8x16::splat(250).sadd(U8x16::splat(10)).to_array(),
            [u8::MAX; 16]
        );
    }

    #[test]
    fn native_unsigned_order() {
        let a = U8x16::splat(0x7F);
        let b = U8x16::splat(0x80);
        assert!(a.simd_lt(b).all());
        assert!(!a.simd_ge(b).any());
    }

    #[test]
    fn mul_hadd_shifts() {
        let a = I8x16::from_fn(|i| (i as i8) - 8);
        let expect: [i8; 16] = std::array::from_fn(|i| ((i as i8) - 8).wrapping_mul(3));
        assert_eq!((a * I8x16::splat(3)).to_array(), expect);

        assert_eq!(U8x16::splat(100).hadd(), 64); // 1600 mod 256
        assert_eq!(I8x16::splat(-1).hadd(), -16);

        assert_eq!(I8x16::splat(-16).shr(2).to_array(), [-4i8; 16]);
        assert_eq!(I8x16::splat(-1).shr(9).to_array(), [-1i8; 16]);
        assert_eq!(U8x16::splat(1).shl(8).to_array(), [0u8; 16]);
    }
}
