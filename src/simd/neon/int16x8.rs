//! NEON 8-lane 16-bit integer batches, signed and unsigned.
//!
//! Entirely native except division; see [`super::int8x16`] for the
//! shift-count normalization.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Mul, Neg};

use crate::simd::neon::int32x4::{I32x4, U32x4};
use crate::simd::neon::int8x16::{I8x16, U8x16};
use crate::simd::neon::masks::M16x8;
use crate::simd::neon::{neon_int_batch, neon_int_common, neon_sign_flip};
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 16-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// NEON batch of 8 packed i16 values.
#[derive(Copy, Clone, Debug)]
pub struct I16x8 {
    /// 128-bit register holding 8 packed i16 lanes.
    pub elements: int16x8_t,
}

/// NEON batch of 8 packed u16 values.
#[derive(Copy, Clone, Debug)]
pub struct U16x8 {
    /// 128-bit register holding 8 packed u16 lanes.
    pub elements: uint16x8_t,
}

neon_int_common!(
    I16x8, i16, 8, int16x8_t, vld1q_s16, vst1q_s16, vaddq_s16, vsubq_s16, vandq_s16,
    vorrq_s16, veorq_s16, vdupq_n_s16
);
neon_int_common!(
    U16x8, u16, 8, uint16x8_t, vld1q_u16, vst1q_u16, vaddq_u16, vsubq_u16, vandq_u16,
    vorrq_u16, veorq_u16, vdupq_n_u16
);

neon_int_batch!(
    I16x8, i16, M16x8, vdupq_n_s16, vminq_s16, vmaxq_s16, vceqq_s16, vcltq_s16, vcgtq_s16,
    vcleq_s16, vcgeq_s16, vbicq_s16, vbslq_s16, vzip1q_s16, vzip2q_s16, vaddvq_s16
);
neon_int_batch!(
    U16x8, u16, M16x8, vdupq_n_u16, vminq_u16, vmaxq_u16, vceqq_u16, vcltq_u16, vcgtq_u16,
    vcleq_u16, vcgeq_u16, vbicq_u16, vbslq_u16, vzip1q_u16, vzip2q_u16, vaddvq_u16
);

neon_sign_flip!(I16x8, U16x8, vreinterpretq_u16_s16, vreinterpretq_s16_u16);

impl Mul for I16x8 {
    type Output = Self;

    /// Wrapping lane product.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_s16(self.elements, rhs.elements) },
        }
    }
}

impl Mul for U16x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_u16(self.elements, rhs.elements) },
        }
    }
}

impl SimdInt for I16x8 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_s16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_s16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_s16(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        if count >= 16 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_s16(self.elements, vdupq_n_s16(count as i16)) },
        }
    }

    /// Arithmetic shift; counts past the lane width fill with the sign.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(15) as i16;
        Self {
            elements: unsafe { vshlq_s16(self.elements, vdupq_n_s16(-count)) },
        }
    }
}

impl SimdInt for U16x8 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_u16(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_u16(self.elements, other.elements) },
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
        if count >= 16 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u16(self.elements, vdupq_n_s16(count as i16)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        if count >= 16 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u16(self.elements, vdupq_n_s16(-(count as i16))) },
        }
    }
}

impl Neg for I16x8 {
    type Output = Self;

    /// Wrapping negation: `i16::MIN` stays `i16::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_s16(self.elements) },
        }
    }
}

impl Widen for I16x8 {
    type Wide = I32x4;

    /// `sshll` sign-extends one doubleword half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I32x4 {
        I32x4 {
            elements: unsafe { vmovl_s16(vget_low_s16(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I32x4 {
        I32x4 {
            elements: unsafe { vmovl_s16(vget_high_s16(self.elements)) },
        }
    }
}

impl Widen for U16x8 {
    type Wide = U32x4;

    /// `ushll` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U32x4 {
        U32x4 {
            elements: unsafe { vmovl_u16(vget_low_u16(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U32x4 {
        U32x4 {
            elements: unsafe { vmovl_u16(vget_high_u16(self.elements)) },
        }
    }
}

impl Narrow for I16x8 {
    type Narrowed = I8x16;

    /// `xtn` keeps each lane's low byte; `sqxtn` is the saturating
    /// form.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I8x16 {
        I8x16 {
            elements: unsafe { vcombine_s8(vmovn_s16(self.elements), vmovn_s16(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I8x16 {
        I8x16 {
            elements: unsafe { vcombine_s8(vqmovn_s16(self.elements), vqmovn_s16(hi.elements)) },
        }
    }
}

impl Narrow for U16x8 {
    type Narrowed = U8x16;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U8x16 {
        U8x16 {
            elements: unsafe { vcombine_u8(vmovn_u16(self.elements), vmovn_u16(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U8x16 {
        U8x16 {
            elements: unsafe { vcombine_u8(vqmovn_u16(self.elements), vqmovn_u16(hi.elements)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn saturation_and_order() {
        assert_eq!(
            I16x8::splat(i16::MAX).sadd(I16x8::splat(1)).to_array(),
            [i16::MAX; 8]
        );
        assert_eq!(U16x8::splat(5).ssub(U16x8::splat(10)).to_array(), [0u16; 8]);
        assert!(U16x8::splat(0x7FFF).simd_lt(U16x8::splat(0x8000)).all());
    }

    #[test]
    fn mul_hadd_shifts() {
        let a = I16x8::splat(1000);
        assert_eq!((a * a).to_array(), [1000i16.wrapping_mul(1000); 8]);
        assert_eq!(U16x8::splat(10_000).hadd(), 14_464); // 80_000 mod 65_536
        assert_eq!(I16x8::splat(-256).shr(4).to_array(), [-16i16; 8]);
        assert_eq!(U16x8::splat(1).shr(16).to_array(), [0u16; 8]);
    }
}
