//! NEON 2-lane 64-bit integer batches, signed and unsigned.
//!
//! NEON still has ordered compares and saturating arithmetic at this
//! width, which x86 only grows into at AVX2 and AVX-512 respectively.
//! Missing here: min/max (compare plus `vbslq`), the product and
//! division (per lane).

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Mul, Neg};

use crate::simd::neon::int32x4::{I32x4, U32x4};
use crate::simd::neon::masks::M64x2;
use crate::simd::neon::{neon_int_common, neon_sign_flip};
use crate::simd::traits::{Narrow, SimdBatch, SimdInt, SimdLoad, SimdStore};

/// Number of 64-bit lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 2;

/// NEON batch of 2 packed i64 values.
#[derive(Copy, Clone, Debug)]
pub struct I64x2 {
    /// 128-bit register holding 2 packed i64 lanes.
    pub elements: int64x2_t,
}

/// NEON batch of 2 packed u64 values.
#[derive(Copy, Clone, Debug)]
pub struct U64x2 {
    /// 128-bit register holding 2 packed u64 lanes.
    pub elements: uint64x2_t,
}

impl I64x2 {
    /// Builds a batch from the two lanes in order.
    #[inline(always)]
    pub fn new(e0: i64, e1: i64) -> Self {
        Self::from_array([e0, e1])
    }
}

impl U64x2 {
    /// Builds a batch from the two lanes in order.
    #[inline(always)]
    pub fn new(e0: u64, e1: u64) -> Self {
        Self::from_array([e0, e1])
    }
}

neon_int_common!(
    I64x2, i64, 2, int64x2_t, vld1q_s64, vst1q_s64, vaddq_s64, vsubq_s64, vandq_s64,
    vorrq_s64, veorq_s64, vdupq_n_s64
);
neon_int_common!(
    U64x2, u64, 2, uint64x2_t, vld1q_u64, vst1q_u64, vaddq_u64, vsubq_u64, vandq_u64,
    vorrq_u64, veorq_u64, vdupq_n_u64
);

neon_sign_flip!(I64x2, U64x2, vreinterpretq_u64_s64, vreinterpretq_s64_u64);

/// Per-lane product; NEON has no 64-bit multiply.
macro_rules! int64_mul {
    ($name:ident) => {
        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a.wrapping_mul(b))
            }
        }
    };
}

int64_mul!(I64x2);
int64_mul!(U64x2);

macro_rules! int64_batch_shared {
    ($name:ident, $scalar:ty, $dup:ident, $ceq:ident, $clt:ident, $cgt:ident, $cle:ident,
     $cge:ident, $bic:ident, $bsl:ident, $zip1:ident, $zip2:ident, $addv:ident) => {
        impl SimdBatch for $name {
            type Scalar = $scalar;
            type Mask = M64x2;

            const LANES: usize = LANE_COUNT;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: unsafe { $dup(value) },
                }
            }

            #[inline(always)]
            fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
                Self::from_array([f(0), f(1)])
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

            /// No 64-bit `vminq`; compare and select.
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
                    elements: unsafe { $bic(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn select(mask: M64x2, a: Self, b: Self) -> Self {
                Self {
                    elements: unsafe { $bsl(mask.raw(), a.elements, b.elements) },
                }
            }

            #[inline(always)]
            fn zip_lo(self, other: Self) -> Self {
                Self {
                    elements: unsafe { $zip1(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn zip_hi(self, other: Self) -> Self {
                Self {
                    elements: unsafe { $zip2(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn hadd(self) -> $scalar {
                let lanes = self.to_array();
                lanes[0].wrapping_add(lanes[1])
            }

            #[inline(always)]
            fn simd_eq(self, other: Self) -> M64x2 {
                M64x2::from_raw(unsafe { $ceq(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_ne(self, other: Self) -> M64x2 {
                !self.simd_eq(other)
            }

            #[inline(always)]
            fn simd_lt(self, other: Self) -> M64x2 {
                M64x2::from_raw(unsafe { $clt(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_le(self, other: Self) -> M64x2 {
                M64x2::from_raw(unsafe { $cle(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_gt(self, other: Self) -> M64x2 {
                M64x2::from_raw(unsafe { $cgt(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_ge(self, other: Self) -> M64x2 {
                M64x2::from_raw(unsafe { $cge(self.elements, other.elements) })
            }
        }
    };
}

int64_batch_shared!(
    I64x2, i64, vdupq_n_s64, vceqq_s64, vcltq_s64, vcgtq_s64, vcleq_s64, vcgeq_s64,
    vbicq_s64, vbslq_s64, vzip1q_s64, vzip2q_s64, vaddvq_s64
);
int64_batch_shared!(
    U64x2, u64, vdupq_n_u64, vceqq_u64, vcltq_u64, vcgtq_u64, vcleq_u64, vcgeq_u64,
    vbicq_u64, vbslq_u64, vzip1q_u64, vzip2q_u64, vaddvq_u64
);

impl SimdInt for I64x2 {
    /// Native 64-bit saturation, one `sqadd`.
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_s64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_s64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_s64(self.elements) },
        }
    }

    #[inline(always)]
    fn div_exact(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a.wrapping_div(b))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        if count >= 64 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_s64(self.elements, vdupq_n_s64(count as i64)) },
        }
    }

    /// Arithmetic shift; counts past the lane width fill with the sign.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        let count = count.min(63) as i64;
        Self {
            elements: unsafe { vshlq_s64(self.elements, vdupq_n_s64(-count)) },
        }
    }
}

impl SimdInt for U64x2 {
    #[inline(always)]
    fn sadd(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqaddq_u64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn ssub(self, other: Self) -> Self {
        Self {
            elements: unsafe { vqsubq_u64(self.elements, other.elements) },
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
        if count >= 64 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u64(self.elements, vdupq_n_s64(count as i64)) },
        }
    }

    /// Logical shift; counts past the lane width produce zero.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        if count >= 64 {
            return Self::splat(0);
        }
        Self {
            elements: unsafe { vshlq_u64(self.elements, vdupq_n_s64(-(count as i64))) },
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
            elements: unsafe { vnegq_s64(self.elements) },
        }
    }
}

impl Narrow for I64x2 {
    type Narrowed = I32x4;

    /// `xtn` keeps each lane's low doubleword; `sqxtn` is the
    /// saturating form.
    #[inline(always)]
    fn narrow(self, hi: Self) -> I32x4 {
        I32x4 {
            elements: unsafe { vcombine_s32(vmovn_s64(self.elements), vmovn_s64(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> I32x4 {
        I32x4 {
            elements: unsafe { vcombine_s32(vqmovn_s64(self.elements), vqmovn_s64(hi.elements)) },
        }
    }
}

impl Narrow for U64x2 {
    type Narrowed = U32x4;

    #[inline(always)]
    fn narrow(self, hi: Self) -> U32x4 {
        U32x4 {
            elements: unsafe { vcombine_u32(vmovn_u64(self.elements), vmovn_u64(hi.elements)) },
        }
    }

    #[inline(always)]
    fn narrow_saturating(self, hi: Self) -> U32x4 {
        U32x4 {
            elements: unsafe { vcombine_u32(vqmovn_u64(self.elements), vqmovn_u64(hi.elements)) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn native_saturation_at_64_bits() {
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
    fn native_ordered_compare() {
        let a = I64x2::new(-1, 5);
        let b = I64x2::new(1, 5);
        assert_eq!(a.simd_lt(b).to_array(), [true, false]);
        assert!(a.simd_le(b).all());

        let c = U64x2::new(u64::MAX, 0);
        let d = U64x2::new(0, 0);
        assert_eq!(c.simd_gt(d).to_array(), [true, false]);
        assert_eq!(c.min(d).to_array(), [0, 0]);
        assert_eq!(c.max(d).to_array(), [u64::MAX, 0]);
    }

    #[test]
    fn mul_shifts_hadd() {
        let a = I64x2::new(0x1_0000_0001, -7);
        let b = I64x2::new(0x1_0000_0001, 3);
        assert_eq!(
            (a * b).to_array(),
            [0x1_0000_0001i64.wrapping_mul(0x1_0000_0001), -21]
        );
        assert_eq!(I64x2::splat(-64).shr(3).to_array(), [-8i64; 2]);
        assert_eq!(U64x2::splat(1).shl(64).to_array(), [0u64; 2]);
        assert_eq!(I64x2::new(i64::MAX, 1).hadd(), i64::MIN);
    }
}
