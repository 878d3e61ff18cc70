//! NEON 4-lane 32-bit integer batches, signed and unsigned.
//!
//! Entirely native except division. `div_fast` mirrors the x86 tiers'
//! f64 round-trip and stays exact for every 32-bit input.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Mul, Neg};

use crate::simd::neon::int16x8::{I16x8, U16x8};
use crate::simd::neon::int64x2::{I64x2, U64x2};
use crate::simd::neon::masks::M32x4;
use crate::simd::neon::{neon_int_batch, neon_int_common, neon_sign_flip};
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore, Widen};

/// Number of 32-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// NEON batch of 4 packed i32 values.
#[derive(Copy, Clone, Debug)]
pub struct I32x4 {
    /// 128-bit register holding 4 packed i32 lanes.
    pub elements: int32x4_t,
}

/// NEON batch of 4 packed u32 values.
#[derive(Copy, Clone, Debug)]
pub struct U32x4 {
    /// 128-bit register holding 4 packed u32 lanes.
    pub elements: uint32x4_t,
}

impl I32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: i32, e1: i32, e2: i32, e3: i32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }
}

impl U32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: u32, e1: u32, e2: u32, e3: u32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }
}

neon_int_common!(
    I32x4, i32, 4, int32x4_t, vld1q_s32, vst1q_s32, vaddq_s32, vsubq_s32, vandq_s32,
    vorrq_s32, veorq_s32, vdupq_n_s32
);
neon_int_common!(
    U32x4, u32, 4, uint32x4_t, vld1q_u32, vst1q_u32, vaddq_u32, vsubq_u32, vandq_u32,
    vorrq_u32, veorq_u32, vdupq_n_u32
);

neon_int_batch!(
    I32x4, i32, M32x4, vdupq_n_s32, vminq_s32, vmaxq_s32, vceqq_s32, vcltq_s32, vcgtq_s32,
    vcleq_s32, vcgeq_s32, vbicq_s32, vbslq_s32, vzip1q_s32, vzip2q_s32, vaddvq_s32
);
neon_int_batch!(
    U32x4, u32, M32x4, vdupq_n_u32, vminq_u32, vmaxq_u32, vceqq_u32, vcltq_u32, vcgtq_u32,
    vcleq_u32, vcgeq_u32, vbicq_u32, vbslq_u32, vzip1q_u32, vzip2q_u32, vaddvq_u32
);

neon_sign_flip!(I32x4, U32x4, vreinterpretq_u32_s32, vreinterpretq_s32_u32);

impl Mul for I32x4 {
    type Output = Self;

    /// Wrapping lane product.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_s32(self.elements, rhs.elements) },
        }
    }
}

impl Mul for U32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_u32(self.elements, rhs.elements) },
        }
    }
}

impl SimdInt for I32x4 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_s32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_s32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_s32(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        if count >= 32 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_s32(self.elements, vdupq_n_s32(count as i32)) },
        }
    }

    /// Arithmetic shift; counts past the lane width fill with the sign.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(31) as i32;
        Self {
            elements: unsafe { vshlq_s32(self.elements, vdupq_n_s32(-count)) },
        }
    }
}

impl I32x4 {
    /// Fast division through f64: convert, divide, truncate back.
    /// Bit-exact for all inputs (every i32 fits the f64 mantissa);
    /// the low and high lane pairs each widen to a `float64x2_t`.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        unsafe {
            let a_lo = vcvtq_f64_s64(vmovl_s32(vget_low_s32(self.elements)));
            let a_hi = vcvtq_f64_s64(vmovl_high_s32(self.elements));
            let b_lo = vcvtq_f64_s64(vmovl_s32(vget_low_s32(rhs.elements)));
            let b_hi = vcvtq_f64_s64(vmovl_high_s32(rhs.elements));

            let q_lo = vmovn_s64(vcvtq_s64_f64(vdivq_f64(a_lo, b_lo)));
            let q_hi = vmovn_s64(vcvtq_s64_f64(vdivq_f64(a_hi, b_hi)));

            Self {
                elements: vcombine_s32(q_lo, q_hi),
            }
        }
    }
}

impl SimdInt for U32x4 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_u32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_u32(self.elements, other.elements) },
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
        if count >= 32 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u32(self.elements, vdupq_n_s32(count as i32)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        if count >= 32 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u32(self.elements, vdupq_n_s32(-(count as i32))) },
        }
    }
}

impl U32x4 {
    /// Fast division through f64; exact for every u32 input.
    #[inline(always)]
    pub fn div_fast(self, rhs: Self) -> Self {
        unsafe {
            let a_lo = vcvtq_f64_u64(vmovl_u32(vget_low_u32(self.elements)));
            let a_hi = vcvtq_f64_u64(vmovl_high_u32(self.elements));
            let b_lo = vcvtq_f64_u64(vmovl_u32(vget_low_u32(rhs.elements)));
            let b_hi = vcvtq_f64_u64(vmovl_high_u32(rhs.elements));

            let q_lo = vmovn_u64(vcvtq_u64_f64(vdivq_f64(a_lo, b_lo)));
            let q_hi = vmovn_u64(vcvtq_u64_f64(vdivq_f64(a_hi, b_hi)));

            Self {
                elements: vcombine_u32(q_lo, q_hi),
            }
        }
    }
}

impl Neg for I32x4 {
    type Output = Self;

    /// Wrapping negation: `i32::MIN` stays `i32::MIN`.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_s32(self.elements) },
        }
    }
}

impl Widen for I32x4 {
    type Wide = I64x2;

    /// `sshll` sign-extends one doubleword half at a time.
    #[inline(always)]
    fn widen_lo(self) -> I64x2 {
        I64x2 {
            elements: unsafe { vmovl_s32(vget_low_s32(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> I64x2 {
        I64x2 {
            elements: unsafe { vmovl_s32(vget_high_s32(self.elements)) },
        }
    }
}

impl Widen for U32x4 {
    type Wide = U64x2;

    /// `ushll` zero-extends.
    #[inline(always)]
    fn widen_lo(self) -> U64x2 {
        U64x2 {
            elements: unsafe { vmovl_u32(vget_low_u32(self.elements)) },
        }
    }

    #[inline(always)]
    fn widen_hi(self) -> U64x2 {
        U64x2 {
            elements: unsafe { vmovl_u32(vget_high_u32(self.elements)) },
        }
    }
}

impl Narrow for I32x4 {
    type Narrowed = I16x8;

    /// `xtn` keeps each lane's low word; `sqxtn` is the saturating
    /// form.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I16x8 {
        I16x8 {
            elements: unsafe { vcombine_s16(vmovn_s32(self.elements), vmovn_s32(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I16x8 {
        I16x8 {
            elements: unsafe { vcombine_s16(vqmovn_s32(self.elements), vqmovn_s32(hi.elements)) },
        }
    }
}

impl Narrow for U32x4 {
    type Narrowed = U16x8;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U16x8 {
        U16x8 {
            elements: unsafe { vcombine_u16(vmovn_u32(self.elements), vmovn_u32(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U16x8 {
        U16x8 {
            elements: unsafe { vcombine_u16(vqmovn_u32(self.elements), vqmovn_u32(hi.elements)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn arithmetic_and_saturation() {
        let a = I32x4::new(1, 2, 3, 4);
        let b = I32x4::new(10, 20, 30, 40);
        assert_eq!((a + b).to_array(), [11, 22, 33, 44]);
        assert_eq!(a.hadd(), 10);
        assert_eq!(
            I32x4::splat(i32::MAX).sadd(I32x4::splat(1)).to_array(),
            [i32::MAX; 4]
        );
        assert_eq!(
            I32x4::splat(1).ssub(I32x4::splat(i32::MIN)).to_array(),
            [i32::MAX; 4]
        );
        assert_eq!(U32x4::splat(5).ssub(U32x4::splat(10)).to_array(), [0u32; 4]);
    }

    #[test]
    fn native_unsigned_order() {
        let a = U32x4::new(0x7FFF_FFFF, 0x8000_0000, 0, u32::MAX);
        let b = U32x4::new(0x8000_0000, 0x7FFF_FFFF, u32::MAX, 0);
        assert_eq!(a.simd_lt(b).to_array(), [true, false, true, false]);
        assert_eq!(a.simd_gt(b).to_array(), [false, true, false, true]);
    }

    #[test]
    fn division_paths_agree() {
        let a = I32x4::new(1_000_003, -999_983, i32::MAX, i32::MIN);
        let b = I32x4::new(7, -13, 3, 2);
        assert_eq!(a.div_fast(b).to_array(), a.div_exact(b).to_array());
        assert_eq!((a / b).to_array(), a.div_exact(b).to_array());

        let c = U32x4::new(u32::MAX, 1, 100, 7);
        let d = U32x4::new(3, 2, 10, 7);
        assert_eq!(c.div_fast(d).to_array(), c.div_exact(d).to_array());
    }

    #[test]
    fn select_and_minmax() {
        let a = I32x4::new(-5, 10, 0, 7);
        let b = I32x4::new(5, -10, 0, 3);
        assert_eq!(a.min(b).to_array(), [-5, -10, 0, 3]);
        assert_eq!(a.max(b).to_array(), [5, 10, 0, 7]);
        let picked = I32x4::select(a.simd_lt(b), a, b);
        assert_eq!(picked.to_array(), [-5, -10, 0, 3]);
        assert!(I32x4::splat(1).simd_eq(I32x4::splat(1)).all());
    }
}
