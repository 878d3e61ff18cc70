//! NEON 4-lane f32 batch.
//!
//! `F32x4` wraps the `float32x4_t` register. Numeric contracts:
//!
//! - Arithmetic is IEEE-754: division by zero yields ±inf, `0.0 / 0.0`
//!   yields NaN, nothing traps.
//! - `fmin`/`fmax` follow `fmin`/`fmax` instruction semantics: NaN in
//!   either operand propagates to the result. This differs from the
//!   x86 tiers, where the second operand wins.
//! - `fma` is always fused on this tier; NEON has no unfused multiply-add.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::neon::masks::M32x4;
use crate::simd::neon::NEON_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f32 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// NEON batch of 4 packed f32 values.
///
/// A fixed-width, immutable `Copy` value type; every operation returns a
/// new batch. Comparisons return [`M32x4`] masks.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    /// 128-bit register holding 4 packed f32 lanes.
    pub elements: float32x4_t,
}

impl F32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f32, e1: f32, e2: f32, e3: f32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }

    /// Builds a batch from an array, lane order preserved.
    #[inline(always)]
    pub fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    /// Copies the lanes out into an array.
    #[inline(always)]
    pub fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        unsafe { self.store_unaligned_at(out.as_mut_ptr()) };
        out
    }

    /// Transposes 4 rows and sums each: lane i of the result is the
    /// horizontal sum of `rows[i]`, reduced in `faddp` pairwise order.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        unsafe {
            Self {
                elements: vpaddq_f32(
                    vpaddq_f32(rows[0].elements, rows[1].elements),
                    vpaddq_f32(rows[2].elements, rows[3].elements),
                ),
            }
        }
    }
}

impl From<&[f32]> for F32x4 {
    /// Loads the first 4 values of a slice.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the slice holds fewer than 4 values.
    fn from(slice: &[f32]) -> Self {
        debug_assert!(
            slice.len() >= LANE_COUNT,
            "slice must hold at least {LANE_COUNT} values"
        );
        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Alignment<f32> for F32x4 {
    /// Reports 16-byte alignment; NEON loads do not require it.
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % NEON_ALIGNMENT == 0
    }
}

impl SimdLoad<f32> for F32x4 {
    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self::load_unaligned(ptr)
    }

    // vld1q has no alignment requirement; both paths are the same
    // instruction.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        Self::load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: vld1q_f32(ptr),
        }
    }
}

impl SimdStore<f32> for F32x4 {
    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        self.store_unaligned_at(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        self.store_unaligned_at(ptr)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f32) {
        vst1q_f32(ptr, self.elements)
    }
}

impl SimdBatch for F32x4 {
    type Scalar = f32;
    type Mask = M32x4;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { vdupq_n_f32(value) },
        }
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f32) -> Self {
        Self::from_array([f(0), f(1), f(2), f(3)])
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        debug_assert!(lane < LANE_COUNT, "lane index out of range");
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: f32) -> Self {
        debug_assert!(lane < LANE_COUNT, "lane index out of range");
        let mut lanes = self.to_array();
        lanes[lane] = value;
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { vminq_f32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { vmaxq_f32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(vbicq_u32(
                    vreinterpretq_u32_f32(self.elements),
                    vreinterpretq_u32_f32(other.elements),
                ))
            },
        }
    }

    #[inline(always)]
    fn select(mask: M32x4, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe { vbslq_f32(mask.raw(), a.elements, b.elements) },
        }
    }

    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe { vzip1q_f32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe { vzip2q_f32(self.elements, other.elements) },
        }
    }

    /// Whole-register pairwise sum, one `faddv`.
    #[inline(always)]
    fn hadd(self) -> f32 {
        unsafe { vaddvq_f32(self.elements) }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { vceqq_f32(self.elements, other.elements) })
    }

    /// Unordered inequality: true against NaN, matching the x86 tiers.
    #[inline(always)]
    fn simd_ne(self, other: Self) -> M32x4 {
        !self.simd_eq(other)
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { vcltq_f32(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { vcleq_f32(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { vcgtq_f32(self.elements, other.elements) })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe { vcgeq_f32(self.elements, other.elements) })
    }
}

impl SimdFloat for F32x4 {
    /// Fused: `vfmaq` accumulates into its first operand.
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe { vfmaq_f32(z.elements, self.elements, y.elements) },
        }
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        // x*y - z = -(z - x*y)
        Self {
            elements: unsafe {
                vnegq_f32(vfmsq_f32(z.elements, self.elements, y.elements))
            },
        }
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe { vfmsq_f32(z.elements, self.elements, y.elements) },
        }
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        Self {
            elements: unsafe {
                vnegq_f32(vfmaq_f32(z.elements, self.elements, y.elements))
            },
        }
    }

    /// Clears the sign bit; NaN payloads pass through untouched.
    #[inline(always)]
    fn fabs(self) -> Self {
        Self {
            elements: unsafe { vabsq_f32(self.elements) },
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
            elements: unsafe { vsqrtq_f32(self.elements) },
        }
    }

    /// IEEE unordered self-comparison: true exactly in NaN lanes.
    #[inline(always)]
    fn is_nan(self) -> M32x4 {
        !self.simd_eq(self)
    }
}

impl Add for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vaddq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vsubq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Div for F32x4 {
    type Output = Self;

    /// IEEE division: a zero divisor produces ±inf (or NaN for 0/0),
    /// never a trap.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vdivq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F32x4 {
    type Output = Self;

    /// Flips the sign bit of every lane.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_f32(self.elements) },
        }
    }
}

impl BitAnd for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(vandq_u32(
                    vreinterpretq_u32_f32(self.elements),
                    vreinterpretq_u32_f32(rhs.elements),
                ))
            },
        }
    }
}

impl BitOr for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(vorrq_u32(
                    vreinterpretq_u32_f32(self.elements),
                    vreinterpretq_u32_f32(rhs.elements),
                ))
            },
        }
    }
}

impl BitXor for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(veorq_u32(
                    vreinterpretq_u32_f32(self.elements),
                    vreinterpretq_u32_f32(rhs.elements),
                ))
            },
        }
    }
}

impl Not for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(vmvnq_u32(vreinterpretq_u32_f32(self.elements)))
            },
        }
    }
}

impl std::ops::AddAssign for F32x4 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for F32x4 {
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
    fn load_store_round_trip() {
        let values = [1.5f32, -2.5, 3.0, 0.0];
        assert_eq!(F32x4::from_array(values).to_array(), values);
        let data: Vec<f32> = (0..5).map(|i| i as f32).collect();
        assert_eq!(F32x4::from(&data[1..]).to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn ieee_division_edges() {
        let x = F32x4::new(1.0, -1.0, 0.0, 4.5);
        let y = F32x4::new(0.0, 0.0, 0.0, 1.5);
        let q = (x / y).to_array();
        assert_eq!(q[0], f32::INFINITY);
        assert_eq!(q[1], f32::NEG_INFINITY);
        assert!(q[2].is_nan());
        assert_eq!(q[3], 3.0);
    }

    #[test]
    fn fma_family_is_fused() {
        let x = F32x4::splat(2.0);
        let y = F32x4::splat(3.0);
        let z = F32x4::splat(1.0);
        assert_eq!(x.fma(y, z).to_array(), [7.0; 4]);
        assert_eq!(x.fms(y, z).to_array(), [5.0; 4]);
        assert_eq!(x.fnma(y, z).to_array(), [-5.0; 4]);
        assert_eq!(x.fnms(y, z).to_array(), [-7.0; 4]);
    }

    #[test]
    fn minmax_propagate_nan() {
        let nan = F32x4::splat(f32::NAN);
        let two = F32x4::splat(2.0);
        assert!(nan.fmin(two).to_array().iter().all(|v| v.is_nan()));
        assert!(two.fmax(nan).to_array().iter().all(|v| v.is_nan()));
        assert_eq!(two.fmin(F32x4::splat(3.0)).to_array(), [2.0; 4]);
    }

    #[test]
    fn compares_and_nan_probe() {
        let a = F32x4::new(1.0, 5.0, f32::NAN, 3.0);
        let b = F32x4::new(2.0, 4.0, 1.0, 3.0);
        assert_eq!(a.simd_lt(b).to_array(), [true, false, false, false]);
        assert_eq!(a.simd_eq(b).to_array(), [false, false, false, true]);
        assert_eq!(a.simd_ne(b).to_array(), [true, true, true, false]);
        assert_eq!(a.is_nan().to_array(), [false, false, true, false]);
    }

    #[test]
    fn reductions_and_zips() {
        let x = F32x4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(x.hadd(), 10.0);

        let rows = [
            F32x4::new(1.0, 2.0, 3.0, 4.0),
            F32x4::new(10.0, 20.0, 30.0, 40.0),
            F32x4::new(0.5, 0.5, 0.5, 0.5),
            F32x4::new(-1.0, 1.0, -1.0, 1.0),
        ];
        assert_eq!(F32x4::haddp(&rows).to_array(), [10.0, 100.0, 2.0, 0.0]);

        let y = F32x4::new(10.0, 11.0, 12.0, 13.0);
        assert_eq!(x.zip_lo(y).to_array(), [1.0, 10.0, 2.0, 11.0]);
        assert_eq!(x.zip_hi(y).to_array(), [3.0, 12.0, 4.0, 13.0]);
    }

    #[test]
    fn select_truth_table() {
        let a = F32x4::splat(1.0);
        let b = F32x4::splat(2.0);
        let m = M32x4::new([true, false, true, false]);
        assert_eq!(F32x4::select(m, a, b).to_array(), [1.0, 2.0, 1.0, 2.0]);
        assert!(M32x4::splat(true).all());
    }
}
