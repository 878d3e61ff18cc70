//! AVX2 4-lane f64 batch.
//!
//! Double-precision sibling of [`super::f32x8`], same contracts at half
//! the lane count. `vhaddpd` also works within 128-bit halves, so the
//! reductions carry the same cross-half recombination.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::avx2::masks::M64x4;
use crate::simd::avx2::AVX_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f64 lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX2 batch of 4 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    /// 256-bit register holding 4 packed f64 lanes.
    pub elements: __m256d,
}

impl F64x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64, e2: f64, e3: f64) -> Self {
        Self {
            elements: unsafe { _mm256_setr_pd(e0, e1, e2, e3) },
        }
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

    /// Transposes 4 rows and sums each: lane i of the result is the
    /// horizontal sum of `rows[i]`.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        unsafe {
            let halves_01 = _mm256_hadd_pd(rows[0].elements, rows[1].elements);
            let halves_23 = _mm256_hadd_pd(rows[2].elements, rows[3].elements);
            let in_place = _mm256_blend_pd(halves_01, halves_23, 0b1100);
            let swapped = _mm256_permute2f128_pd(halves_01, halves_23, 0x21);
            Self {
                elements: _mm256_add_pd(in_place, swapped),
            }
        }
    }
}

impl From<&[f64]> for F64x4 {
    /// Loads the first 4 values of a slice.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the slice holds fewer than 4 values.
    fn from(slice: &[f64]) -> Self {
        debug_assert!(
            slice.len() >= LANE_COUNT,
            "slice must hold at least {LANE_COUNT} values"
        );
        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Alignment<f64> for F64x4 {
    #[inline(always)]
    fn is_aligned(ptr: *const f64) -> bool {
        (ptr as usize) % AVX_ALIGNMENT == 0
    }
}

impl SimdLoad<f64> for F64x4 {
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");

        match Self::is_aligned(ptr) {
            true => Self::load_aligned(ptr),
            false => Self::load_unaligned(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_load_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_loadu_pd(ptr),
        }
    }
}

impl SimdStore<f64> for F64x4 {
    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");

        match Self::is_aligned(ptr) {
            true => self.store_aligned_at(ptr),
            false => self.store_unaligned_at(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f64) {
        _mm256_store_pd(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f64) {
        _mm256_storeu_pd(ptr, self.elements)
    }
}

impl SimdBatch for F64x4 {
    type Scalar = f64;
    type Mask = M64x4;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm256_set1_pd(value) },
        }
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Self::from_array([f(0), f(1), f(2), f(3)])
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
            elements: unsafe { _mm256_min_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_pd(other.elements, self.elements) },
        }
    }

    #[inline(always)]
    fn select(mask: M64x4, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe {
                _mm256_blendv_pd(b.elements, a.elements, _mm256_castsi256_pd(mask.mask))
            },
        }
    }

    /// The unpacks interleave per 128-bit half; `vperm2f128` puts the
    /// halves back in whole-register lane order.
    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                let even = _mm256_unpacklo_pd(self.elements, other.elements);
                let odd = _mm256_unpackhi_pd(self.elements, other.elements);
                _mm256_permute2f128_pd(even, odd, 0x20)
            },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                let even = _mm256_unpacklo_pd(self.elements, other.elements);
                let odd = _mm256_unpackhi_pd(self.elements, other.elements);
                _mm256_permute2f128_pd(even, odd, 0x31)
            },
        }
    }

    /// In-half `vhaddpd`, then the two half-sums meet in a scalar add.
    #[inline(always)]
    fn hadd(self) -> f64 {
        unsafe {
            let pairs = _mm256_hadd_pd(self.elements, self.elements);
            _mm_cvtsd_f64(_mm_add_sd(
                _mm256_castpd256_pd128(pairs),
                _mm256_extractf128_pd(pairs, 1),
            ))
        }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_EQ_OQ))
        })
    }

    #[inline(always)]
    fn simd_ne(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_NEQ_UQ))
        })
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_LT_OQ))
        })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_LE_OQ))
        })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_GT_OQ))
        })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, other.elements, _CMP_GE_OQ))
        })
    }
}

impl SimdFloat for F64x4 {
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm256_fmadd_pd(self.elements, y.elements, z.elements),
            }
        }
        #[cfg(not(target_feature = "fma"))]
        {
            self * y + z
        }
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm256_fmsub_pd(self.elements, y.elements, z.elements),
            }
        }
        #[cfg(not(target_feature = "fma"))]
        {
            self * y - z
        }
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm256_fnmadd_pd(self.elements, y.elements, z.elements),
            }
        }
        #[cfg(not(target_feature = "fma"))]
        {
            z - self * y
        }
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm256_fnmsub_pd(self.elements, y.elements, z.elements),
            }
        }
        #[cfg(not(target_feature = "fma"))]
        {
            -(self * y) - z
        }
    }

    /// Clears the sign bit; NaN payloads pass through untouched.
    #[inline(always)]
    fn fabs(self) -> Self {
        Self {
            elements: unsafe {
                _mm256_and_pd(
                    self.elements,
                    _mm256_castsi256_pd(_mm256_set1_epi64x(0x7FFF_FFFF_FFFF_FFFF)),
                )
            },
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
            elements: unsafe { _mm256_sqrt_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn is_nan(self) -> M64x4 {
        M64x4::from_raw(unsafe {
            _mm256_castpd_si256(_mm256_cmp_pd(self.elements, self.elements, _CMP_UNORD_Q))
        })
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x4 {
    type Output = Self;

    /// IEEE division; a zero divisor produces ±inf, never a trap.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_div_pd(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe {
                _mm256_xor_pd(self.elements, _mm256_castsi256_pd(_mm256_set1_epi64x(i64::MIN)))
            },
        }
    }
}

impl BitAnd for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_and_pd(self.elements, rhs.elements) },
        }
    }
}

impl BitOr for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_or_pd(self.elements, rhs.elements) },
        }
    }
}

impl BitXor for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_xor_pd(self.elements, rhs.elements) },
        }
    }
}

impl Not for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                _mm256_xor_pd(self.elements, _mm256_castsi256_pd(_mm256_set1_epi64x(-1)))
            },
        }
    }
}

impl std::ops::AddAssign for F64x4 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for F64x4 {
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
        let x = F64x4::new(1.0, 2.0, 3.0, 4.0);
        let y = F64x4::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!((x + y).to_array(), [11.0, 22.0, 33.0, 44.0]);
        assert_eq!((x * y).to_array(), [10.0, 40.0, 90.0, 160.0]);
        assert_eq!(x.hadd(), 10.0);
    }

    #[test]
    fn haddp_sums_rows() {
        let rows = [
            F64x4::new(1.0, 2.0, 3.0, 4.0),
            F64x4::new(10.0, 20.0, 30.0, 40.0),
            F64x4::new(0.5, 0.25, 0.125, 0.0625),
            F64x4::new(-1.0, 1.0, -1.0, 1.0),
        ];
        assert_eq!(F64x4::haddp(&rows).to_array(), [10.0, 100.0, 0.9375, 0.0]);
    }

    #[test]
    fn ieee_edges() {
        let x = F64x4::new(1.0, -1.0, 0.0, 9.0);
        let y = F64x4::new(0.0, 0.0, 0.0, 3.0);
        let q = (x / y).to_array();
        assert_eq!(q[0], f64::INFINITY);
        assert_eq!(q[1], f64::NEG_INFINITY);
        assert!(q[2].is_nan());
        assert_eq!(q[3], 3.0);

        let nan = F64x4::splat(f64::NAN);
        assert!(nan.is_nan().all());
        assert_eq!(nan.fmin(x).to_array(), x.to_array());
    }

    #[test]
    fn fma_and_sign_ops() {
        let x = F64x4::splat(2.0);
        assert_eq!(x.fma(F64x4::splat(3.0), F64x4::splat(1.0)).to_array(), [7.0; 4]);
        assert_eq!((-x).to_array(), [-2.0; 4]);
        assert_eq!(F64x4::splat(-3.5).fabs().to_array(), [3.5; 4]);
        assert_eq!(F64x4::splat(9.0).sqrt().to_array(), [3.0; 4]);
    }

    #[test]
    fn compare_and_select() {
        let a = F64x4::new(1.0, 5.0, 3.0, 8.0);
        let b = F64x4::new(4.0, 2.0, 3.0, 9.0);
        assert_eq!(a.simd_lt(b).to_array(), [true, false, false, true]);
        assert_eq!(a.simd_eq(b).to_array(), [false, false, true, false]);
        let lesser = F64x4::select(a.simd_lt(b), a, b);
        assert_eq!(lesser.to_array(), [1.0, 2.0, 3.0, 8.0]);
    }
}
