//! SSE 4-lane f32 batch.
//!
//! `F32x4` wraps the `__m128` register to operate on 4 single-precision
//! values at once. It is the 128-bit x86 kernel for `f32` lanes and the
//! reference for the tier's file layout: construction and memory traffic
//! first, then the shared batch contract, then the float extensions and
//! operator impls, with the test suite at the bottom.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: any x86-64 CPU with SSE4.1 (Penryn and later)
//! - **Compilation**: compiled in when the build script emits `cfg(sse)`
//!
//! # Numeric contracts
//!
//! - Arithmetic is IEEE-754: division by zero yields ±inf, `0.0 / 0.0`
//!   yields NaN, nothing traps.
//! - `fmin`/`fmax` follow `minps`/`maxps`: the second operand wins when
//!   either input is NaN.
//! - `hadd` reduces pairwise (`haddps` order), not left-to-right.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::sse::masks::M32x4;
use crate::simd::sse::SSE_ALIGNMENT;
use crate::simd::traits::{Alignment, SimdBatch, SimdFloat, SimdLoad, SimdStore};

/// Number of f32 lanes in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// SSE batch of 4 packed f32 values.
///
/// A fixed-width, immutable `Copy` value type; every operation returns a
/// new batch. Comparisons return [`M32x4`] masks.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    /// 128-bit register holding 4 packed f32 lanes.
    pub elements: __m128,
}

impl F32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f32, e1: f32, e2: f32, e3: f32) -> Self {
        Self {
            elements: unsafe { _mm_setr_ps(e0, e1, e2, e3) },
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

    /// Transposes 4 rows and sums each: lane i of the result is the
    /// horizontal sum of `rows[i]`, reduced in `haddps` pairwise order.
    #[inline(always)]
    pub fn haddp(rows: &[Self; LANE_COUNT]) -> Self {
        unsafe {
            Self {
                elements: _mm_hadd_ps(
                    _mm_hadd_ps(rows[0].elements, rows[1].elements),
                    _mm_hadd_ps(rows[2].elements, rows[3].elements),
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
    /// Checks 16-byte alignment, the natural alignment of `__m128`.
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % SSE_ALIGNMENT == 0
    }
}

impl SimdLoad<f32> for F32x4 {
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
            elements: _mm_load_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm_loadu_ps(ptr),
        }
    }
}

impl SimdStore<f32> for F32x4 {
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
        _mm_store_ps(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn store_unaligned_at(&self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, self.elements)
    }
}

impl SimdBatch for F32x4 {
    type Scalar = f32;
    type Mask = M32x4;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm_set1_ps(value) },
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
            elements: unsafe { _mm_min_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn andnot(self, other: Self) -> Self {
        // _mm_andnot_ps computes (!a) & b, so the operands swap.
        Self {
            elements: unsafe { _mm_andnot_ps(other.elements, self.elements) },
        }
    }

    #[inline(always)]
    fn select(mask: M32x4, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe {
                _mm_blendv_ps(b.elements, a.elements, _mm_castsi128_ps(mask.mask))
            },
        }
    }

    #[inline(always)]
    fn zip_lo(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_unpacklo_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn zip_hi(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm_unpackhi_ps(self.elements, other.elements) },
        }
    }

    /// Pairwise tree reduction: `(x0+x1) + (x2+x3)` via two `haddps`.
    #[inline(always)]
    fn hadd(self) -> f32 {
        unsafe {
            let tmp = _mm_hadd_ps(self.elements, self.elements);
            _mm_cvtss_f32(_mm_hadd_ps(tmp, tmp))
        }
    }

    #[inline(always)]
    fn simd_eq(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmpeq_ps(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_ne(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmpneq_ps(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_lt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmplt_ps(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_le(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmple_ps(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_gt(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmpgt_ps(self.elements, other.elements))
        })
    }

    #[inline(always)]
    fn simd_ge(self, other: Self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmpge_ps(self.elements, other.elements))
        })
    }
}

impl SimdFloat for F32x4 {
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        #[cfg(target_feature = "fma")]
        unsafe {
            Self {
                elements: _mm_fmadd_ps(self.elements, y.elements, z.elements),
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
                elements: _mm_fmsub_ps(self.elements, y.elements, z.elements),
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
                elements: _mm_fnmadd_ps(self.elements, y.elements, z.elements),
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
                elements: _mm_fnmsub_ps(self.elements, y.elements, z.elements),
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
                _mm_and_ps(self.elements, _mm_castsi128_ps(_mm_set1_epi32(0x7FFF_FFFF)))
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
            elements: unsafe { _mm_sqrt_ps(self.elements) },
        }
    }

    /// IEEE unordered self-comparison: true exactly in NaN lanes.
    #[inline(always)]
    fn is_nan(self) -> M32x4 {
        M32x4::from_raw(unsafe {
            _mm_castps_si128(_mm_cmpunord_ps(self.elements, self.elements))
        })
    }
}

impl Add for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_add_ps(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_sub_ps(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_mul_ps(self.elements, rhs.elements) },
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
            elements: unsafe { _mm_div_ps(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F32x4 {
    type Output = Self;

    /// Flips the sign bit of every lane.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe {
                _mm_xor_ps(self.elements, _mm_castsi128_ps(_mm_set1_epi32(i32::MIN)))
            },
        }
    }
}

impl BitAnd for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_and_ps(self.elements, rhs.elements) },
        }
    }
}

impl BitOr for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_or_ps(self.elements, rhs.elements) },
        }
    }
}

impl BitXor for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_xor_ps(self.elements, rhs.elements) },
        }
    }
}

impl Not for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe {
                _mm_xor_ps(self.elements, _mm_castsi128_ps(_mm_set1_epi32(-1)))
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
    use std::alloc::{alloc, dealloc, Layout};

    fn alloc_aligned(len: usize, align: usize) -> *mut f32 {
        let layout = Layout::from_size_align(len * std::mem::size_of::<f32>(), align).unwrap();
        unsafe { alloc(layout) as *mut f32 }
    }

    fn dealloc_aligned(ptr: *mut f32, len: usize, align: usize) {
        let layout = Layout::from_size_align(len * std::mem::size_of::<f32>(), align).unwrap();
        unsafe { dealloc(ptr as *mut u8, layout) };
    }

    mod alignment_tests {
        use super::*;

        #[test]
        fn aligned_allocation_is_aligned() {
            let ptr = alloc_aligned(4, SSE_ALIGNMENT);
            assert!(F32x4::is_aligned(ptr));
            dealloc_aligned(ptr, 4, SSE_ALIGNMENT);
        }

        #[test]
        fn offset_pointer_is_not_aligned() {
            let data = [0.0f32; 8];
            let ptr = unsafe { data.as_ptr().add(1) };
            assert!(!F32x4::is_aligned(ptr));
        }
    }

    mod load_store_tests {
        use super::*;

        #[test]
        fn aligned_round_trip() {
            let src = alloc_aligned(4, SSE_ALIGNMENT);
            let dst = alloc_aligned(4, SSE_ALIGNMENT);
            let data = [1.0f32, 2.0, 3.0, 4.0];

            unsafe {
                std::ptr::copy_nonoverlapping(data.as_ptr(), src, 4);
                let v = F32x4::load_aligned(src);
                v.store_aligned_at(dst);
                assert_eq!(std::slice::from_raw_parts(dst, 4), &data);
            }

            dealloc_aligned(src, 4, SSE_ALIGNMENT);
            dealloc_aligned(dst, 4, SSE_ALIGNMENT);
        }

        #[test]
        fn unaligned_round_trip() {
            let data = [0.0f32, 1.0, 2.0, 3.0, 4.0];
            let v = unsafe { F32x4::load_unaligned(data.as_ptr().add(1)) };
            assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
        }

        #[test]
        fn special_values_round_trip() {
            let special = [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -0.0];
            let out = F32x4::from_array(special).to_array();

            assert_eq!(out[0], f32::INFINITY);
            assert_eq!(out[1], f32::NEG_INFINITY);
            assert!(out[2].is_nan());
            assert_eq!(out[3].to_bits(), (-0.0f32).to_bits());
        }

        #[test]
        fn nan_payload_round_trips_exactly() {
            let payload = f32::from_bits(0x7FC0_1234);
            let out = F32x4::splat(payload).to_array();
            for lane in out {
                assert_eq!(lane.to_bits(), 0x7FC0_1234);
            }
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn elementwise_ops() {
            let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
            let b = F32x4::new(4.0, 3.0, 2.0, 1.0);

            assert_eq!((a + b).to_array(), [5.0; 4]);
            assert_eq!((a - b).to_array(), [-3.0, -1.0, 1.0, 3.0]);
            assert_eq!((a * b).to_array(), [4.0, 6.0, 6.0, 4.0]);
            assert_eq!((a / b).to_array(), [0.25, 2.0 / 3.0, 1.5, 4.0]);
            assert_eq!((-a).to_array(), [-1.0, -2.0, -3.0, -4.0]);
        }

        #[test]
        fn division_by_zero_is_ieee() {
            let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
            let b = F32x4::new(0.0, 1.0, 2.0, 0.0);
            let q = (a / b).to_array();
            assert_eq!(q, [f32::INFINITY, 2.0, 1.5, f32::INFINITY]);
        }

        #[test]
        fn hadd_pairwise_sum() {
            assert_eq!(F32x4::new(1.0, 2.0, 3.0, 4.0).hadd(), 10.0);
            assert_eq!(F32x4::splat(0.0).hadd(), 0.0);
        }

        #[test]
        fn haddp_sums_each_row() {
            let rows = [
                F32x4::new(1.0, 2.0, 3.0, 4.0),
                F32x4::splat(1.0),
                F32x4::new(0.5, 0.5, 0.25, 0.25),
                F32x4::splat(0.0),
            ];
            assert_eq!(F32x4::haddp(&rows).to_array(), [10.0, 4.0, 1.5, 0.0]);
        }

        #[test]
        fn fma_matches_reference() {
            let x = F32x4::new(1.5, -2.0, 3.0, 0.5);
            let y = F32x4::splat(2.0);
            let z = F32x4::splat(1.0);

            assert_eq!(x.fma(y, z).to_array(), [4.0, -3.0, 7.0, 2.0]);
            assert_eq!(x.fms(y, z).to_array(), [2.0, -5.0, 5.0, 0.0]);
            assert_eq!(x.fnma(y, z).to_array(), [-2.0, 5.0, -5.0, 0.0]);
            assert_eq!(x.fnms(y, z).to_array(), [-4.0, 3.0, -7.0, -2.0]);
        }
    }

    mod predicate_tests {
        use super::*;

        #[test]
        fn comparisons_yield_full_lane_masks() {
            let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
            let b = F32x4::new(2.0, 2.0, 2.0, 2.0);

            assert_eq!(a.simd_lt(b).to_array(), [true, false, false, false]);
            assert_eq!(a.simd_le(b).to_array(), [true, true, false, false]);
            assert_eq!(a.simd_gt(b).to_array(), [false, false, true, true]);
            assert_eq!(a.simd_eq(b).to_array(), [false, true, false, false]);
        }

        #[test]
        fn nan_compares_unordered() {
            let v = F32x4::new(f32::NAN, 1.0, f32::INFINITY, 0.0);
            assert_eq!(v.is_nan().to_array(), [true, false, false, false]);
            // NaN is unequal to itself through the lane compare as well.
            assert_eq!(v.simd_eq(v).to_array(), [false, true, true, true]);
        }

        #[test]
        fn select_picks_per_lane() {
            let on_true = F32x4::splat(1.0);
            let on_false = F32x4::splat(-1.0);

            let all = F32x4::select(M32x4::splat(true), on_true, on_false);
            assert_eq!(all.to_array(), [1.0; 4]);

            let none = F32x4::select(M32x4::splat(false), on_true, on_false);
            assert_eq!(none.to_array(), [-1.0; 4]);

            let mixed = F32x4::select(M32x4::new([true, false, true, false]), on_true, on_false);
            assert_eq!(mixed.to_array(), [1.0, -1.0, 1.0, -1.0]);
        }

        #[test]
        fn min_max_nan_second_operand_wins() {
            let nan = F32x4::splat(f32::NAN);
            let one = F32x4::splat(1.0);

            // minps/maxps return the second operand when either input is NaN.
            assert_eq!(nan.fmin(one).to_array(), [1.0; 4]);
            assert!(one.fmin(nan).to_array()[0].is_nan());
        }
    }

    mod shuffle_tests {
        use super::*;

        #[test]
        fn zip_interleaves_halves() {
            let a = F32x4::new(0.0, 1.0, 2.0, 3.0);
            let b = F32x4::new(10.0, 11.0, 12.0, 13.0);

            assert_eq!(a.zip_lo(b).to_array(), [0.0, 10.0, 1.0, 11.0]);
            assert_eq!(a.zip_hi(b).to_array(), [2.0, 12.0, 3.0, 13.0]);
        }

        #[test]
        fn bitwise_ops_treat_bits_opaquely() {
            let v = F32x4::splat(-1.5);
            let sign = F32x4::splat(f32::from_bits(0x8000_0000));

            let cleared = v.andnot(sign);
            assert_eq!(cleared.to_array(), [1.5; 4]);

            let restored = cleared | sign;
            assert_eq!(restored.to_array(), [-1.5; 4]);
        }
    }
}
