//! NEON 2-lane f64 batch.
//!
//! Double-precision sibling of [`super::f32x4`], same contracts: IEEE
//! arithmetic that never traps, NaN-propagating `fmin`/`fmax`, fused
//! multiply-add.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::neon::masks::M64x2;
use crate::simd::neon::NEON_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f64 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 2;

/// NEON batch of 2 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x2 {
    /// 128-bit register holding 2 packed f64 lanes.
    pub elements: float64x2_t,
}

impl F64x2 {
    /// Builds a batch from 2 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64) -> Self {
        Self::from_array([e0, e1])
    }

    /// Builds a batch from an array, lane order preserved.
    #[inline(always)]
    pub fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    /// Copies the lanes out into an array.
    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut out = [0.0f64; LANE_COUNT];
        unsafe { self.store_unaligned_at(out.as_mut_ptr()) };
        out
    }

    /// Transposes 2 rows and sums each in one `faddp`.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { vpaddq_f64(rows[0].elements, rows[1].elements) },
        }
    }
}

impl From<&[f64]> for F64x2 {
    /// Loads the first 2 values of a slice.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the slice holds fewer than 2 values.
    fn from(slice: &[f64]) -> Self {
        debug_assert!(
            slice.len() >= LANE_COUNT,
            "slice must hold at least {LANE_COUNT} values"
        );
        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Alignment<f64> for F64x2 {
    #[inline(always)]
    fn is_aligned(ptr: *const f64) -> bool {
        (ptr as usize) % NEON_ALIGNMENT == 0
    }
}

impl SimdLoad<f64> for F64x2 {
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self::load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        Self::load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        Self {
            elements: vld1q_f64(ptr),
        }
    }
}

impl SimdStore<f64> for F64x2 {
    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        self.store_unaligned_at(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f64) {
        self.store_unaligned_at(ptr)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f64) {
        vst1q_f64(ptr, self.elements)
    }
}

impl SimdBatch for F64x2 {
    type Scalar = f64;
    type Mask = M64x2;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { vdupq_n_f64(value) },
        }
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Self::from_array([f(0), f(1)])
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        debug_assert!(lane < LANE_COUNT, "lane index out of range");
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: f64) -> Self {
        debug_assert!(lane < LANE_COUNT, "lane index out of range");
        let mut lanes = self.to_array();
        lanes[lane] = value;
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { vminq_f64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { vmaxq_f64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(vbicq_u64(
                    vreinterpretq_u64_f64(self.elements),
                    vreinterpretq_u64_f64(other.elements),
                ))
            },
        }
    }

    #[inline(always)]
    fn select(mask: M64x2, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe { vbslq_f64(mask.raw(), a.elements, b.elements) },
        }
    }

    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe { vzip1q_f64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe { vzip2q_f64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn hadd(self) -> f64 {
        unsafe { vaddvq_f64(self.elements) }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe { vceqq_f64(self.elements, other.elements) })
    }

    /// Unordered inequality: true against NaN.
    #[inline(always)]
    fn simd_ne(self, other: Self) -> M64x2 {
        !self.simd_eq(other)
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe { vcltq_f64(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe { vcleq_f64(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe { vcgtq_f64(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe { vcgeq_f64(self.elements, other.elements) })
    }
}

impl SimdFloat for F64x2 {
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe { vfmaq_f64(z.elements, self.elements, y.elements) },
        }
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe {
                vnegq_f64(vfmsq_f64(z.elements, self.elements, y.elements))
            },
        }
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe { vfmsq_f64(z.elements, self.elements, y.elements) },
        }
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe {
                vnegq_f64(vfmaq_f64(z.elements, self.elements, y.elements))
            },
        }
    }

    #[inline(always)]
    fn fabs(self) -> Self {
        Self {
            elements: unsafe { vabsq_f64(self.elements) },
        }
    }

    #[inline(always)]
    fn fmin(self, other: Self) -> Self {
        SimdBatch::min(self, other)
    }

    #[inline(always)]
    fn fmax(self, other: Self) -> Self {
        SimdBatch::max(self, other)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { vsqrtq_f64(self.elements) },
        }
    }

    #[inline(always)]
    fn is_nan(self) -> M64x2 {
        !self.simd_eq(self)
    }
}

impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vaddq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vsubq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x2 {
    type Output = Self;

    /// IEEE division; a zero divisor produces ±inf, never a trap.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vdivq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_f64(self.elements) },
        }
    }
}

impl BitAnd for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(vandq_u64(
                    vreinterpretq_u64_f64(self.elements),
                    vreinterpretq_u64_f64(rhs.elements),
                ))
            },
        }
    }
}

impl BitOr for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(vorrq_u64(
                    vreinterpretq_u64_f64(self.elements),
                    vreinterpretq_u64_f64(rhs.elements),
                ))
            },
        }
    }
}

impl BitXor for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(veorq_u64(
                    vreinterpretq_u64_f64(self.elements),
                    vreinterpretq_u64_f64(rhs.elements),
                ))
            },
        }
    }
}

impl Not for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(veorq_u64(
                    vreinterpretq_u64_f64(self.elements),
                    vdupq_n_u64(u64::MAX),
                ))
            },
        }
    }
}

impl std::ops::AddAssign for F64x2 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for F64x2 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn arithmetic_and_reduction() {
        let x = F64x2::new(1.5, 2.5);
        let y = F64x2::new(2.0, 4.0);
        assert_eq!((x * y).to_array(), [3.0, 10.0]);
        assert_eq!(x.hadd(), 4.0);
        assert_eq!(
            F64x2::haddp(&[x, y]).to_array(),
            [4.0, 6.0]
        );
    }

    #[test]
    fn ieee_edges() {
        let q = (F64x2::new(1.0, 0.0) / F64x2::new(0.0, 0.0)).to_array();
        assert_eq!(q[0], f64::INFINITY);
        assert!(q[1].is_nan());

        let nan = F64x2::splat(f64::NAN);
        assert!(nan.is_nan().all());
        assert!(nan.fmin(F64x2::splat(1.0)).to_array().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn fused_ops_and_select() {
        let x = F64x2::splat(2.0);
        assert_eq!(x.fma(F64x2::splat(3.0), F64x2::splat(1.0)).to_array(), [7.0; 2]);
        let m = F64x2::new(1.0, 4.0).simd_lt(F64x2::new(2.0, 3.0));
        assert_eq!(m.to_array(), [true, false]);
        let picked = F64x2::select(m, F64x2::splat(-1.0), F64x2::splat(1.0));
        assert_eq!(picked.to_array(), [-1.0, 1.0]);
    }
}
