//! 256-bit x86 kernel tier (AVX2, with FMA).
//!
//! Compiled in when the build script detects AVX2 (`cfg(avx2)`); the
//! 128-bit tier stays available alongside it. Lane layouts follow the
//! two-128-bit-half structure of the register file: cross-half
//! operations (horizontal sums, zips) say so where it matters.
//!
//! AVX2 closes most of the SSE-era gaps at 64 bits (`vpcmpgtq` gives
//! ordered compares, and with them vector min/max and saturation
//! clamps); what remains emulated is the 64-bit product, 8-bit shifts
//! and integer division, same tricks as the 128-bit tier at double
//! width.

pub mod masks;

pub mod f32x8;
pub mod f64x4;
pub mod int16x16;
pub mod int32x8;
pub mod int64x4;
pub mod int8x32;

/// Natural alignment of a 256-bit register, in bytes.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Stamps the structural surface shared by every AVX2 integer batch;
/// the 256-bit counterpart of the 128-bit tier's macro.
macro_rules! avx2_int_common {
    ($name:ident, $scalar:ty, $lanes:expr, $add:ident, $sub:ident) => {
        impl $name {
            /// Builds a batch from an array, lane order preserved.
            #[inline(always)]
            pub fn from_array(lanes: [$scalar; LANE_COUNT]) -> Self {
                unsafe { Self::load_unaligned(lanes.as_ptr()) }
            }

            /// Copies the lanes out into an array.
            #[inline(always)]
            pub fn to_array(self) -> [$scalar; LANE_COUNT] {
                let mut out = [0 as $scalar; LANE_COUNT];
                unsafe { self.store_unaligned_at(out.as_mut_ptr()) };
                out
            }

            /// Per-lane scalar fallback for operations AVX2 has no
            /// instruction for.
            #[inline(always)]
            fn map2(self, rhs: Self, f: impl Fn($scalar, $scalar) -> $scalar) -> Self {
                let a = self.to_array();
                let b = rhs.to_array();
                Self::from_array(std::array::from_fn(|i| f(a[i], b[i])))
            }
        }

        impl From<&[$scalar]> for $name {
            fn from(slice: &[$scalar]) -> Self {
                debug_assert!(
                    slice.len() >= LANE_COUNT,
                    "slice must hold at least {LANE_COUNT} values"
                );
                unsafe { Self::load(slice.as_ptr()) }
            }
        }

        impl crate::simd::traits::Alignment<$scalar> for $name {
            #[inline(always)]
            fn is_aligned(ptr: *const $scalar) -> bool {
                (ptr as usize) % crate::simd::avx2::AVX_ALIGNMENT == 0
            }
        }

        impl crate::simd::traits::SimdLoad<$scalar> for $name {
            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "pointer must not be null");

                match <Self as crate::simd::traits::Alignment<$scalar>>::is_aligned(ptr) {
                    true => Self::load_aligned(ptr),
                    false => Self::load_unaligned(ptr),
                }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm256_load_si256(ptr as *const __m256i),
                }
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm256_loadu_si256(ptr as *const __m256i),
                }
            }
        }

        impl crate::simd::traits::SimdStore<$scalar> for $name {
            #[inline(always)]
            unsafe fn store_at(&self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "pointer must not be null");

                match <Self as crate::simd::traits::Alignment<$scalar>>::is_aligned(ptr) {
                    true => self.store_aligned_at(ptr),
                    false => self.store_unaligned_at(ptr),
                }
            }

            #[inline(always)]
            unsafe fn store_aligned_at(&self, ptr: *mut $scalar) {
                _mm256_store_si256(ptr as *mut __m256i, self.elements)
            }

            #[inline(always)]
            unsafe fn store_unaligned_at(&self, ptr: *mut $scalar) {
                _mm256_storeu_si256(ptr as *mut __m256i, self.elements)
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            /// Wrapping lane addition.
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { $add(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { $sub(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::Div for $name {
            type Output = Self;

            /// Bit-exact per-lane division; panics on a zero divisor.
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                crate::simd::traits::SimdInt::div_exact(self, rhs)
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm256_and_si256(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm256_or_si256(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm256_xor_si256(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { _mm256_xor_si256(self.elements, _mm256_set1_epi8(-1)) },
                }
            }
        }
        impl std::ops::AddAssign for $name {
            #[inline(always)]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $name {
            #[inline(always)]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }
    };
}

pub(crate) use avx2_int_common;

/// Bitwise `From` conversions between the signed and unsigned batch of
/// one lane width, as in the 128-bit tier.
macro_rules! avx2_sign_flip {
    ($signed:ident, $unsigned:ident) => {
        impl From<$signed> for $unsigned {
            #[inline(always)]
            fn from(v: $signed) -> Self {
                Self {
                    elements: v.elements,
                }
            }
        }

        impl From<$unsigned> for $signed {
            #[inline(always)]
            fn from(v: $unsigned) -> Self {
                Self {
                    elements: v.elements,
                }
            }
        }
    };
}

pub(crate) use avx2_sign_flip;
