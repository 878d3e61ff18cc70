//! AVX2 8-lane f32 batch.
//!
//! `F32x8` wraps the `__m256` register to operate on 8 single-precision
//! values at once. Same numeric contracts as the 128-bit f32 kernel:
//! IEEE arithmetic that never traps, `minps`/`maxps` NaN behavior where
//! the second operand wins, and pairwise horizontal reduction. The
//! 256-bit register is two 128-bit halves; `vhaddps` and the unpack
//! instructions work within halves, so the reductions here carry an
//! extra cross-half recombination step.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::avx2::masks::M32x8;
use crate::simd::avx2::AVX_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f32 lanes in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX2 batch of 8 packed f32 values.
///
/// A fixed-width, immutable `Copy` value type; every operation returns a
/// new batch. Comparisons return [`M32x8`] masks.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// 256-bit register holding 8 packed f32 lanes.
    pub elements: __m256,
}

impl F32x8 {
    /// Builds a batch from 8 lane values, lane 0 first.
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub fn new(
        e0: f32,
        e1: f32,
        e2: f32,
        e3: f32,
        e4: f32,
        e5: f32,
        e6: f32,
        e7: f32,
    ) -> Self {
        Self {
            elements: unsafe { _mm256_setr_ps(e0, e1, e2, e3, e4, e5, e6, e7) },
        }
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

    /// Transposes 8 rows and sums each: lane i of the result is the
    /// horizontal sum of `rows[i]`, reduced in pairwise order. The two
    /// four-row `vhaddps` trees land half-swapped across the 128-bit
    /// halves; the final blend plus half-permute straightens them out.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        unsafe {
            let sums_0123 = _mm256_hadd_ps(
                _mm256_hadd_ps(rows[0].elements, rows[1].elements),
                _mm256_hadd_ps(rows[2].elements, rows[3].elements),
            );
            let sums_4567 = _mm256_hadd_ps(
                _mm256_hadd_ps(rows[4].elements, rows[5].elements),
                _mm256_hadd_ps(rows[6].elements, rows[7].elements),
            );
            let in_place = _mm256_blend_ps(sums_0123, sums_4567, 0b1111_0000);
            let swapped = _mm256_permute2f128_ps(sums_0123, sums_4567, 0x21);
            Self {
                elements: _mm256_add_ps(in_place, swapped),
            }
        }
    }
}

impl From<&[f32]> for F32x8 {
    /// Loads the first 8 values of a slice.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the slice holds fewer than 8 values.
    fn from(slice: &[f32]) -> Self {
        debug_assert!(
            slice.len() >= LANE_COUNT,
            "slice must hold at least {LANE_COUNT} values"
        );
        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Alignment<f32> for F32x8 {
    /// Checks 32-byte alignment, the natural alignment of `__m256`.
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % AVX_ALIGNMENT == 0
    }
}

impl SimdLoad<f32> for F32x8 {
    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");

        match Self::is_aligned(ptr) {
            true => Self::load_aligned(ptr),
            false => Self::load_unaligned(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_load_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_loadu_ps(ptr),
        }
    }
}

impl SimdStore<f32> for F32x8 {
    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");

        match Self::is_aligned(ptr) {
            true => self.store_aligned_at(ptr),
            false => self.store_unaligned_at(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store_aligned_at(&self, ptr: *mut f32) {
        _mm256_store_ps(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f32) {
        _mm256_storeu_ps(ptr, self.elements)
    }
}

impl SimdBatch for F32x8 {
    type Scalar = f32;
    type Mask = M32x8;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f32) -> Self {
        Self::from_array(std::array::from_fn(|i| f(i)))
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
            elements: unsafe { _mm256_min_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        // _mm256_andnot_ps computes (!a) & b, so the operands swap.
        Self {
            elements: unsafe { _mm256_andnot_ps(other.elements, self.elements) },
        }
    }

    #[inline(always)]
    fn select(mask: M32x8, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe {
                _mm256_blendv_ps(b.elements, a.elements, _mm256_castsi256_ps(mask.mask))
            },
        }
    }

    /// `vunpcklps`/`vunpckhps` interleave within each 128-bit half, so
    /// a `vperm2f128` pass recombines the halves into whole-register
    /// lane order.
    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                let even = _mm256_unpacklo_ps(self.elements, other.elements);
                let odd = _mm256_unpackhi_ps(self.elements, other.elements);
                _mm256_permute2f128_ps(even, odd, 0x20)
            },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe {
                let even = _mm256_unpacklo_ps(self.elements, other.elements);
                let odd = _mm256_unpackhi_ps(self.elements, other.elements);
                _mm256_permute2f128_ps(even, odd, 0x31)
            },
        }
    }

    /// Pairwise tree reduction: two in-half `vhaddps` passes, then the
    /// two half-sums are added with a scalar `addss`.
    #[inline(always)]
    fn hadd(self) -> f32 {
        unsafe {
            let pairs = _mm256_hadd_ps(self.elements, self.elements);
            let quads = _mm256_hadd_ps(pairs, pairs);
            _mm_cvtss_f32(_mm_add_ss(
                _mm256_castps256_ps128(quads),
                _mm256_extractf128_ps(quads, 1),
            ))
        }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_EQ_OQ))
        })
    }

    #[inline(always)]
    fn simd_ne(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_NEQ_UQ))
        })
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_LT_OQ))
        })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_LE_OQ))
        })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_GT_OQ))
        })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, other.elements, _CMP_GE_OQ))
        })
    }
}

impl SimdFloat for F32x8 {
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm256_fmadd_ps(self.elements, y.elements, z.elements),
            }
        }
        // Two roundings without the fused instruction.
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
                elements: _mm256_fmsub_ps(self.elements, y.elements, z.elements),
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
                elements: _mm256_fnmadd_ps(self.elements, y.elements, z.elements),
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
                elements: _mm256_fnmsub_ps(self.elements, y.elements, z.elements),
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
                _mm256_and_ps(
                    self.elements,
                    _mm256_castsi256_ps(_mm256_set1_epi32(0x7FFF_FFFF)),
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
            elements: unsafe { _mm256_sqrt_ps(self.elements) },
        }
    }

    /// IEEE unordered self-comparison: true exactly in NaN lanes.
    #[inline(always)]
    fn is_nan(self) -> M32x8 {
        M32x8::from_raw(unsafe {
            _mm256_castps_si256(_mm256_cmp_ps(self.elements, self.elements, _CMP_UNORD_Q))
        })
    }
}

impl Add for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_add_ps(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_ps(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_mul_ps(self.elements, rhs.elements) },
        }
    }
}

impl Div for F32x8 {
    type Output = Self;

    /// IEEE division: a zero divisor produces ±inf (or NaN for 0/0),
    /// never a trap.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_div_ps(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F32x8 {
    type Output = Self;

    /// Flips the sign bit of every lane.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe {
                _mm256_xor_ps(self.elements, _mm256_castsi256_ps(_mm256_set1_epi32(i32::MIN)))
            },
        }
    }
}

impl BitAnd for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_and_ps(self.elements, rhs.elements) },
        }
    }
}

impl BitOr for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_or_ps(self.elements, rhs.elements) },
        }
    }
}

impl BitXor for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_xor_ps(self.elements, rhs.elements) },
        }
    }
}

impl Not for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                _mm256_xor_ps(self.elements, _mm256_castsi256_ps(_mm256_set1_epi32(-1)))
            },
        }
    }
}

impl std::ops::AddAssign for F32x8 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for F32x8 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;
    use std::alloc::{alloc, dealloc, Layout};

    fn alloc_aligned(len: usize, align: usize) -> *mut f32 {
        let layout = Layout::from_size_align(len * std::mem::size_of::<f32>(), align).unwrap();
        unsafe { alloc(layout) as *mut f32 }
    }

    fn dealloc_aligned(ptr: *mut f32, len: usize, align: usize) {
        let layout = Layout::from_size_align(len * std::mem::size_of::<f32>(), align).unwrap();
        unsafe { dealloc(ptr as *mut u8, layout) };
    }

    mod load_store_tests {
        use super::*;

        #[test]
        fn aligned_round_trip() {
            let ptr = alloc_aligned(8, AVX_ALIGNMENT);
            let values = [1.5f32, -2.5, 3.0, 0.0, 4.25, -0.5, 6.0, 7.75];
            unsafe {
                F32x8::from_array(values).store_at(ptr);
                assert!(F32x8::is_aligned(ptr));
                assert_eq!(F32x8::load(ptr).to_array(), values);
            }
            dealloc_aligned(ptr, 8, AVX_ALIGNMENT);
        }

        #[test]
        fn unaligned_slice_load() {
            let data: Vec<f32> = (0..9).map(|i| i as f32).collect();
            let batch = F32x8::from(&data[1..]);
            assert_eq!(batch.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        }
    }

    mod reduction_tests {
        use super::*;

        #[test]
        fn hadd_crosses_register_halves() {
            let x = F32x8::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0);
            assert_eq!(x.hadd(), 36.0);
        }

        #[test]
        fn haddp_sums_each_row_in_place() {
            let rows: [F32x8; 8] =
                std::array::from_fn(|r| F32x8::from_fn(|lane| (r * 8 + lane) as f32));
            let sums = F32x8::haddp(&rows).to_array();
            for (r, sum) in sums.iter().enumerate() {
                let expect: f32 = (0..8).map(|lane| (r * 8 + lane) as f32).sum();
                assert_eq!(*sum, expect);
            }
        }
    }

    mod float_math_tests {
        use super::*;

        #[test]
        fn division_by_zero_is_ieee() {
            let x = F32x8::new(1.0, -1.0, 0.0, 4.5, 1.0, 1.0, 1.0, 1.0);
            let y = F32x8::new(0.0, 0.0, 0.0, 1.5, 2.0, 4.0, 8.0, 0.5);
            let q = (x / y).to_array();
            assert_eq!(q[0], f32::INFINITY);
            assert_eq!(q[1], f32::NEG_INFINITY);
            assert!(q[2].is_nan());
            assert_eq!(&q[3..], &[3.0, 0.5, 0.25, 0.125, 2.0]);
        }

        #[test]
        fn fma_family() {
            let x = F32x8::splat(2.0);
            let y = F32x8::splat(3.0);
            let z = F32x8::splat(1.0);
            assert_eq!(x.fma(y, z).to_array(), [7.0; 8]);
            assert_eq!(x.fms(y, z).to_array(), [5.0; 8]);
            assert_eq!(x.fnma(y, z).to_array(), [-5.0; 8]);
            assert_eq!(x.fnms(y, z).to_array(), [-7.0; 8]);
        }

        #[test]
        fn fabs_and_neg_touch_only_the_sign_bit() {
            let x = F32x8::new(-1.5, 2.5, -0.0, 3.0, -4.0, 5.0, -6.0, 7.0);
            assert_eq!(x.fabs().to_array(), [1.5, 2.5, 0.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
            assert_eq!((-x).to_array(), [1.5, -2.5, 0.0, -3.0, 4.0, -5.0, 6.0, -7.0]);
        }

        #[test]
        fn minmax_second_operand_wins_on_nan() {
            let nan = F32x8::splat(f32::NAN);
            let two = F32x8::splat(2.0);
            assert_eq!(nan.fmin(two).to_array(), [2.0; 8]);
            assert!(two.fmin(nan).to_array().iter().all(|v| v.is_nan()));
        }
    }

    mod compare_select_tests {
        use super::*;

        #[test]
        fn ordered_compares_are_false_on_nan() {
            let a = F32x8::splat(f32::NAN);
            let b = F32x8::splat(1.0);
            assert!(!a.simd_eq(b).any());
            assert!(!a.simd_lt(b).any());
            // NEQ is the unordered predicate: true against NaN.
            assert!(a.simd_ne(b).all());
            assert!(a.is_nan().all());
            assert!(!b.is_nan().any());
        }

        #[test]
        fn select_picks_per_lane() {
            let a = F32x8::splat(1.0);
            let b = F32x8::splat(2.0);
            let picked = F32x8::select(a.simd_lt(b), a, b);
            assert_eq!(picked.to_array(), [1.0; 8]);
            let picked = F32x8::select(a.simd_gt(b), a, b);
            assert_eq!(picked.to_array(), [2.0; 8]);
        }
    }

    #[test]
    fn zip_interleaves_in_whole_register_order() {
        let a = F32x8::new(0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0);
        let b = F32x8::new(10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0);
        assert_eq!(
            a.zip_lo(b).to_array(),
            [0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 3.0, 13.0]
        );
        assert_eq!(
            a.zip_hi(b).to_array(),
            [4.0, 14.0, 5.0, 15.0, 6.0, 16.0, 7.0, 17.0]
        );
    }
}
