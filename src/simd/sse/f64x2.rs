//! SSE 2-lane f64 batch.
//!
//! `F64x2` wraps `__m128d` to operate on 2 double-precision values at
//! once. Contracts match [`F32x4`](crate::simd::sse::f32x4::F32x4) at
//! double width: IEEE arithmetic, `minpd`/`maxpd` NaN behavior, pairwise
//! `hadd` order.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::sse::masks::M64x2;
use crate::simd::sse::SSE_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f64 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 2;

/// SSE batch of 2 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x2 {
    /// 128-bit register holding 2 packed f64 lanes.
    pub elements: __m128d,
}

impl F64x2 {
    /// Builds a batch from 2 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64) -> Self {
        Self {
            elements: unsafe { _mm_setr_pd(e0, e1) },
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

    /// Lane i of the result is the horizontal sum of `rows[i]`.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm_hadd_pd(rows[0].elements, rows[1].elements) },
        }
    }
}

impl From<&[f64]> for F64x2 {
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
        (ptr as usize) % SSE_ALIGNMENT == 0
    }
}

impl SimdLoad<f64> for F64x2 {
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
            elements: _mm_load_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm_loadu_pd(ptr),
        }
    }
}

impl SimdStore<f64> for F64x2 {
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
        _mm_store_pd(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f64) {
        _mm_storeu_pd(ptr, self.elements)
    }
}

impl SimdBatch for F64x2 {
    type Scalar = f64;
    type Mask = M64x2;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm_set1_pd(value) },
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
            elements: unsafe { _mm_min_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_pd(other.elements, self.elements) },
        }
    }

    #[inline(always)]
    fn select(mask: M64x2, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe {
                _mm_blendv_pd(b.elements, a.elements, _mm_castsi128_pd(mask.mask))
            },
        }
    }

    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_unpacklo_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_unpackhi_pd(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn hadd(self) -> f64 {
        unsafe { _mm_cvtsd_f64(_mm_hadd_pd(self.elements, self.elements)) }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmpeq_pd(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_ne(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmpneq_pd(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmplt_pd(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmple_pd(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmpgt_pd(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmpge_pd(self.elements, other.elements))
        })
    }
}

impl SimdFloat for F64x2 {
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm_fmadd_pd(self.elements, y.elements, z.elements),
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
                elements: _mm_fmsub_pd(self.elements, y.elements, z.elements),
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
                elements: _mm_fnmadd_pd(self.elements, y.elements, z.elements),
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
                elements: _mm_fnmsub_pd(self.elements, y.elements, z.elements),
            }
        }
        #[cfg(not(target_feature = "fma"))]
        {
            -(self * y) - z
        }
    }

    #[inline(always)]
    fn fabs(self) -> Self {
        Self {
            elements: unsafe {
                _mm_and_pd(
                    self.elements,
                    _mm_castsi128_pd(_mm_set1_epi64x(0x7FFF_FFFF_FFFF_FFFF)),
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
            elements: unsafe { _mm_sqrt_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn is_nan(self) -> M64x2 {
        M64x2::from_raw(unsafe {
            _mm_castpd_si128(_mm_cmpunord_pd(self.elements, self.elements))
        })
    }
}

impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_div_pd(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe {
                _mm_xor_pd(self.elements, _mm_castsi128_pd(_mm_set1_epi64x(i64::MIN)))
            },
        }
    }
}

impl BitAnd for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_and_pd(self.elements, rhs.elements) },
        }
    }
}

impl BitOr for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_or_pd(self.elements, rhs.elements) },
        }
    }
}

impl BitXor for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_xor_pd(self.elements, rhs.elements) },
        }
    }
}

impl Not for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                _mm_xor_pd(self.elements, _mm_castsi128_pd(_mm_set1_epi64x(-1)))
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

    #[test]
    fn arithmetic_and_hadd() {
        let a = F64x2::new(1.5, 2.5);
        let b = F64x2::new(0.5, 0.5);

        assert_eq!((a + b).to_array(), [2.0, 3.0]);
        assert_eq!((a * b).to_array(), [0.75, 1.25]);
        assert_eq!(a.hadd(), 4.0);
        assert_eq!(F64x2::haddp(&[a, b]).to_array(), [4.0, 1.0]);
    }

    #[test]
    fn nan_and_infinity_semantics() {
        let v = F64x2::new(f64::NAN, 1.0);
        assert_eq!(v.is_nan().to_array(), [true, false]);

        let q = (F64x2::new(1.0, -1.0) / F64x2::splat(0.0)).to_array();
        assert_eq!(q, [f64::INFINITY, f64::NEG_INFINITY]);
    }

    #[test]
    fn zip_and_sign_ops() {
        let a = F64x2::new(1.0, 2.0);
        let b = F64x2::new(-1.0, -2.0);

        assert_eq!(a.zip_lo(b).to_array(), [1.0, -1.0]);
        assert_eq!(a.zip_hi(b).to_array(), [2.0, -2.0]);
        assert_eq!(b.fabs().to_array(), [1.0, 2.0]);
        assert_eq!((-a).to_array(), [-1.0, -2.0]);
    }
}
