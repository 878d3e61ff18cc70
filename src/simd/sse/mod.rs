//! 128-bit x86 kernel tier (SSE2 through SSE4.1).
//!
//! Compiled in when the build script detects SSE4.1 (`cfg(sse)`), and
//! also alongside the AVX2 tier, whose conversion layer moves between
//! both register widths. Each submodule holds one lane width; masks for
//! the whole tier live in [`masks`].
//!
//! Operations with no SSE4.1 instruction are emulated with documented
//! sequences that match a native instruction bit for bit: saturating
//! 32/64-bit arithmetic via branch-free clamps, unsigned compares via
//! the sign-bit bias, 64-bit products via 32-bit partial products, and
//! per-lane scalar loops where the ISA offers nothing at all (64-bit
//! ordered compares, integer division).

pub mod masks;

pub mod f32x4;
pub mod f64x2;
pub mod int16x8;
pub mod int32x4;
pub mod int64x2;
pub mod int8x16;

/// Natural alignment of a 128-bit register, in bytes.
pub(crate) const SSE_ALIGNMENT: usize = 16;

/// Stamps the structural surface shared by every SSE integer batch:
/// array construction, aligned/unaligned memory traffic, wrapping
/// add/sub, bitwise operators, the per-lane `map2` escape hatch, and
/// `/` routed through `div_exact`. The width-specific operations stay
/// longhand in each type's module.
macro_rules! sse_int_common {
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

            /// Per-lane scalar fallback for operations SSE has no
            /// instruction for. Bit-identical to what a native
            /// instruction would produce.
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
                (ptr as usize) % crate::simd::sse::SSE_ALIGNMENT == 0
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
                    elements: _mm_load_si128(ptr as *const __m128i),
                }
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm_loadu_si128(ptr as *const __m128i),
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
                _mm_store_si128(ptr as *mut __m128i, self.elements)
            }

            #[inline(always)]
            unsafe fn store_unaligned_at(&self, ptr: *mut $scalar) {
                _mm_storeu_si128(ptr as *mut __m128i, self.elements)
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
                    elements: unsafe { _mm_and_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_or_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, _mm_set1_epi8(-1)) },
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

pub(crate) use sse_int_common;

/// Bitwise `From` conversions between the signed and unsigned batch of
/// one lane width. Reinterpretation, never value conversion: a kernel
/// written for signed lanes can alias an unsigned buffer this way.
macro_rules! sse_sign_flip {
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

pub(crate) use sse_sign_flip;
