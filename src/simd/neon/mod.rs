//! 128-bit AArch64 kernel tier (NEON).
//!
//! Compiled in when the build script detects NEON (`cfg(neon)`). Same
//! module layout and lane widths as the 128-bit x86 tier, much less
//! emulation: saturating arithmetic, unsigned ordered compares and
//! whole-register reductions (`vaddvq`, `vminvq`) are all single
//! instructions here. What does get emulated is the 64-bit product and
//! integer division (per lane) and 64-bit min/max (compare plus
//! `vbslq`).
//!
//! NEON loads are alignment-agnostic; `vld1q`/`vst1q` serve both the
//! aligned and unaligned entry points and the alignment probe only
//! reports whether a pointer happens to sit on a 16-byte boundary.

pub mod masks;

pub mod f32x4;
pub mod f64x2;
pub mod int16x8;
pub mod int32x4;
pub mod int64x2;
pub mod int8x16;

/// Natural alignment of a 128-bit register, in bytes.
pub(crate) const NEON_ALIGNMENT: usize = 16;

/// Stamps the structural surface shared by every NEON integer batch:
/// array construction, memory traffic, wrapping add/sub, bitwise
/// operators, the per-lane `map2` escape hatch, and `/` routed through
/// `div_exact`.
macro_rules! neon_int_common {
    ($name:ident, $scalar:ty, $lanes:expr, $vec:ty, $load:ident, $store:ident,
     $add:ident, $sub:ident, $and:ident, $orr:ident, $eor:ident, $dup:ident) => {
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

            /// Per-lane scalar fallback for operations NEON has no
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
                (ptr as usize) % crate::simd::neon::NEON_ALIGNMENT == 0
            }
        }

        impl crate::simd::traits::SimdLoad<$scalar> for $name {
            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "pointer must not be null");
                Self::load_unaligned(ptr)
            }

            // vld1q has no alignment requirement; both paths are the
            // same instruction.
            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                Self::load_unaligned(ptr)
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: $load(ptr),
                }
            }
        }

        impl crate::simd::traits::SimdStore<$scalar> for $name {
            #[inline(always)]
            unsafe fn store_at(&self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "pointer must not be null");
                self.store_unaligned_at(ptr)
            }

            #[inline(always)]
            unsafe fn store_aligned_at(&self, ptr: *mut $scalar) {
                self.store_unaligned_at(ptr)
            }

            #[inline(always)]
            unsafe fn store_unaligned_at(&self, ptr: *mut $scalar) {
                $store(ptr, self.elements)
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
                    elements: unsafe { $and(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { $orr(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { $eor(self.elements, rhs.elements) },
                }
            }
        }

        impl std::ops::Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { $eor(self.elements, $dup(!(0 as $scalar))) },
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

pub(crate) use neon_int_common;

/// Stamps a full [`SimdBatch`](crate::simd::traits::SimdBatch) impl
/// from the tier's per-type intrinsic names. NEON covers the whole
/// batch contract natively at 8/16/32 bits; the 64-bit module rolls
/// its own min/max on top of `vcgtq_s64`.
macro_rules! neon_int_batch {
    ($name:ident, $scalar:ty, $mask:ident, $dup:ident, $min:ident, $max:ident, $ceq:ident,
     $clt:ident, $cgt:ident, $cle:ident, $cge:ident, $bic:ident, $bsl:ident, $zip1:ident,
     $zip2:ident, $addv:ident) => {
        impl crate::simd::traits::SimdBatch for $name {
            type Scalar = $scalar;
            type Mask = $mask;

            const LANES: usize = LANE_COUNT;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: unsafe { $dup(value) },
                }
            }

            #[inline(always)]
            fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
                Self::from_array(std::array::from_fn(|i| f(i)))
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

            #[inline(always)]
            fn min(self, other: Self) -> Self {
                Self {
                    elements: unsafe { $min(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn max(self, other: Self) -> Self {
                Self {
                    elements: unsafe { $max(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                Self {
                    elements: unsafe { $bic(self.elements, other.elements) },
                }
            }

            #[inline(always)]
            fn select(mask: $mask, a: Self, b: Self) -> Self {
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

            /// Whole-register sum, one `addv`; wraps at lane width.
            #[inline(always)]
            fn hadd(self) -> $scalar {
                unsafe { $addv(self.elements) }
            }

            #[inline(always)]
            fn simd_eq(self, other: Self) -> $mask {
                $mask::from_raw(unsafe { $ceq(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_ne(self, other: Self) -> $mask {
                !self.simd_eq(other)
            }

            #[inline(always)]
            fn simd_lt(self, other: Self) -> $mask {
                $mask::from_raw(unsafe { $clt(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_le(self, other: Self) -> $mask {
                $mask::from_raw(unsafe { $cle(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_gt(self, other: Self) -> $mask {
                $mask::from_raw(unsafe { $cgt(self.elements, other.elements) })
            }

            #[inline(always)]
            fn simd_ge(self, other: Self) -> $mask {
                $mask::from_raw(unsafe { $cge(self.elements, other.elements) })
            }
        }
    };
}

pub(crate) use neon_int_batch;

/// Bitwise `From` conversions between the signed and unsigned batch of
/// one lane width, through the matching `vreinterpretq` pair.
macro_rules! neon_sign_flip {
    ($signed:ident, $unsigned:ident, $to_unsigned:ident, $to_signed:ident) => {
        impl From<$signed> for $unsigned {
            #[inline(always)]
            fn from(v: $signed) -> Self {
                Self {
                    elements: unsafe { $to_unsigned(v.elements) },
                }
            }
        }

        impl From<$unsigned> for $signed {
            #[inline(always)]
            fn from(v: $unsigned) -> Self {
                Self {
                    elements: unsafe { $to_signed(v.elements) },
                }
            }
        }
    };
}

pub(crate) use neon_sign_flip;
