//! Scalar batch types, stamped per lane width.
//!
//! Each batch is a `[T; N]` at the 128-bit tier's lane count. The
//! macros split by scalar kind: integer batches get wrapping operator
//! arithmetic, saturating `sadd`/`ssub` and shift-count normalization;
//! float batches get IEEE arithmetic, fused `mul_add` and x86-style
//! NaN handling in `fmin`/`fmax`.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::fallback::masks::{M16x8, M32x4, M64x2, M8x16};
use crate::simd::fallback::FALLBACK_ALIGNMENT;
use crate::simd::traits::{
    Alignment, Narrow, SimdBatch, SimdFloat, SimdInt, SimdLoad, SimdStore, Widen,
};

macro_rules! fallback_common {
    ($name:ident, $scalar:ty, $lanes:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug)]
        pub struct $name {
            /// Lane array, lane 0 first.
            pub elements: [$scalar; $lanes],
        }

        impl $name {
            /// Builds a batch from an array, lane order preserved.
            #[inline(always)]
            pub fn from_array(lanes: [$scalar; $lanes]) -> Self {
                Self { elements: lanes }
            }

            /// Copies the lanes out into an array.
            #[inline(always)]
            pub fn to_array(self) -> [$scalar; $lanes] {
                self.elements
            }

            #[inline(always)]
            fn map(self, f: impl Fn($scalar) -> $scalar) -> Self {
                Self {
                    elements: std::array::from_fn(|i| f(self.elements[i])),
                }
            }

            #[inline(always)]
            fn map2(self, rhs: Self, f: impl Fn($scalar, $scalar) -> $scalar) -> Self {
                Self {
                    elements: std::array::from_fn(|i| f(self.elements[i], rhs.elements[i])),
                }
            }
        }

        impl From<&[$scalar]> for $name {
            fn from(slice: &[$scalar]) -> Self {
                debug_assert!(
                    slice.len() >= $lanes,
                    "slice must hold at least {} values",
                    $lanes
                );
                unsafe { Self::load(slice.as_ptr()) }
            }
        }

        impl Alignment<$scalar> for $name {
            #[inline(always)]
            fn is_aligned(ptr: *const $scalar) -> bool {
                (ptr as usize) % FALLBACK_ALIGNMENT == 0
            }
        }

        impl SimdLoad<$scalar> for $name {
            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "pointer must not be null");
                Self::load_unaligned(ptr)
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: (ptr as *const [$scalar; $lanes]).read(),
                }
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $scalar) -> Self {
                Self {
                    elements: (ptr as *const [$scalar; $lanes]).read_unaligned(),
                }
            }
        }

        impl SimdStore<$scalar> for $name {
            #[inline(always)]
            unsafe fn store_at(&self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "pointer must not be null");
                self.store_unaligned_at(ptr)
            }

            #[inline(always)]
            unsafe fn store_aligned_at(&self, ptr: *mut $scalar) {
                (ptr as *mut [$scalar; $lanes]).write(self.elements)
            }

            #[inline(always)]
            unsafe fn store_unaligned_at(&self, ptr: *mut $scalar) {
                (ptr as *mut [$scalar; $lanes]).write_unaligned(self.elements)
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

macro_rules! fallback_int_ops {
    ($name:ident, $scalar:ty, $lanes:expr, $mask:ident, $signedness:ident) => {
        impl SimdBatch for $name {
            type Scalar = $scalar;
            type Mask = $mask;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: [value; $lanes],
                }
            }

            #[inline(always)]
            fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
                Self {
                    elements: std::array::from_fn(|i| f(i)),
                }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $scalar {
                debug_assert!(lane < $lanes, "lane index out of range");
                self.elements[lane]
            }

            #[inline(always)]
            fn replace(self, lane: usize, value: $scalar) -> Self {
                debug_assert!(lane < $lanes, "lane index out of range");
                let mut lanes = self.elements;
                lanes[lane] = value;
                Self { elements: lanes }
            }

            #[inline(always)]
            fn min(self, other: Self) -> Self {
                self.map2(other, |a, b| a.min(b))
            }

            #[inline(always)]
            fn max(self, other: Self) -> Self {
                self.map2(other, |a, b| a.max(b))
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                self.map2(other, |a, b| a & !b)
            }

            #[inline(always)]
            fn select(mask: $mask, a: Self, b: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if mask.lanes[i] {
                            a.elements[i]
                        } else {
                            b.elements[i]
                        }
                    }),
                }
            }

            #[inline(always)]
            fn zip_lo(self, other: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if i % 2 == 0 {
                            self.elements[i / 2]
                        } else {
                            other.elements[i / 2]
                        }
                    }),
                }
            }

            #[inline(always)]
            fn zip_hi(self, other: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if i % 2 == 0 {
                            self.elements[$lanes / 2 + i / 2]
                        } else {
                            other.elements[$lanes / 2 + i / 2]
                        }
                    }),
                }
            }

            /// Lane-order sum; wraps at lane width.
            #[inline(always)]
            fn hadd(self) -> $scalar {
                self.elements
                    .iter()
                    .fold(0 as $scalar, |acc, &v| acc.wrapping_add(v))
            }

            #[inline(always)]
            fn simd_eq(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] == other.elements[i]))
            }

            #[inline(always)]
            fn simd_ne(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] != other.elements[i]))
            }

            #[inline(always)]
            fn simd_lt(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] < other.elements[i]))
            }

            #[inline(always)]
            fn simd_le(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] <= other.elements[i]))
            }

            #[inline(always)]
            fn simd_gt(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] > other.elements[i]))
            }

            #[inline(always)]
            fn simd_ge(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] >= other.elements[i]))
            }
        }

        impl SimdInt for $name {
            #[inline(always)]
            fn sadd(self, other: Self) -> Self {
                self.map2(other, |a, b| a.saturating_add(b))
            }

            #[inline(always)]
            fn ssub(self, other: Self) -> Self {
                self.map2(other, |a, b| a.saturating_sub(b))
            }

            fallback_int_ops!(@abs $signedness);

            #[inline(always)]
            fn div_exact(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a.wrapping_div(b))
            }

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                if count >= <$scalar>::BITS {
                    return Self::splat(0);
                }
                self.map(|a| a << count)
            }

            fallback_int_ops!(@shr $signedness, $scalar);
        }

        impl Add for $name {
            type Output = Self;

            /// Wrapping lane addition.
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a.wrapping_add(b))
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a.wrapping_sub(b))
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a.wrapping_mul(b))
            }
        }

        impl Div for $name {
            type Output = Self;

            /// Bit-exact per-lane division; panics on a zero divisor.
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                self.div_exact(rhs)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a & b)
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a | b)
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a ^ b)
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                self.map(|a| !a)
            }
        }
    };

    (@abs signed) => {
        /// Wrapping magnitude; the minimum stays put.
        #[inline(always)]
        fn abs(self) -> Self {
            self.map(|a| a.wrapping_abs())
        }
    };
    (@abs unsigned) => {
        #[inline(always)]
        fn abs(self) -> Self {
            self
        }
    };

    (@shr signed, $scalar:ty) => {
        /// Arithmetic shift; counts past the lane width fill with the
        /// sign bit.
        #[inline(always)]
        fn shr(self, count: u32) -> Self {
            let count = count.min(<$scalar>::BITS - 1);
            self.map(|a| a >> count)
        }
    };
    (@shr unsigned, $scalar:ty) => {
        /// Logical shift; counts past the lane width produce zero.
        #[inline(always)]
        fn shr(self, count: u32) -> Self {
            if count >= <$scalar>::BITS {
                return Self::splat(0);
            }
            self.map(|a| a >> count)
        }
    };
}

macro_rules! fallback_float_ops {
    ($name:ident, $scalar:ty, $lanes:expr, $mask:ident) => {
        impl $name {
            /// Transposes rows and sums each: lane i of the result is
            /// the horizontal sum of `rows[i]`.
            #[inline(always)]
            pub fn haddp(rows: &[Self; $lanes]) -> Self {
                Self {
                    elements: std::array::from_fn(|i| rows[i].hadd()),
                }
            }
        }

        impl SimdBatch for $name {
            type Scalar = $scalar;
            type Mask = $mask;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: [value; $lanes],
                }
            }

            #[inline(always)]
            fn from_fn(mut f: impl FnMut(usize) -> $scalar) -> Self {
                Self {
                    elements: std::array::from_fn(|i| f(i)),
                }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $scalar {
                debug_assert!(lane < $lanes, "lane index out of range");
                self.elements[lane]
            }

            #[inline(always)]
            fn replace(self, lane: usize, value: $scalar) -> Self {
                debug_assert!(lane < $lanes, "lane index out of range");
                let mut lanes = self.elements;
                lanes[lane] = value;
                Self { elements: lanes }
            }

            /// `minps` semantics: the second operand wins when either
            /// input is NaN.
            #[inline(always)]
            fn min(self, other: Self) -> Self {
                self.map2(other, |a, b| if a < b { a } else { b })
            }

            #[inline(always)]
            fn max(self, other: Self) -> Self {
                self.map2(other, |a, b| if a > b { a } else { b })
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                self.map2(other, |a, b| {
                    <$scalar>::from_bits(a.to_bits() & !b.to_bits())
                })
            }

            #[inline(always)]
            fn select(mask: $mask, a: Self, b: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if mask.lanes[i] {
                            a.elements[i]
                        } else {
                            b.elements[i]
                        }
                    }),
                }
            }

            #[inline(always)]
            fn zip_lo(self, other: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if i % 2 == 0 {
                            self.elements[i / 2]
                        } else {
                            other.elements[i / 2]
                        }
                    }),
                }
            }

            #[inline(always)]
            fn zip_hi(self, other: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        if i % 2 == 0 {
                            self.elements[$lanes / 2 + i / 2]
                        } else {
                            other.elements[$lanes / 2 + i / 2]
                        }
                    }),
                }
            }

            /// Lane-order sum.
            #[inline(always)]
            fn hadd(self) -> $scalar {
                self.elements.iter().sum()
            }

            #[inline(always)]
            fn simd_eq(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] == other.elements[i]))
            }

            /// Unordered inequality: true against NaN.
            #[inline(always)]
            fn simd_ne(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] != other.elements[i]))
            }

            #[inline(always)]
            fn simd_lt(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] < other.elements[i]))
            }

            #[inline(always)]
            fn simd_le(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] <= other.elements[i]))
            }

            #[inline(always)]
            fn simd_gt(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] > other.elements[i]))
            }

            #[inline(always)]
            fn simd_ge(self, other: Self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i] >= other.elements[i]))
            }
        }

        impl SimdFloat for $name {
            /// Fused through `mul_add`.
            #[inline(always)]
            fn fma(self, y: Self, z: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        self.elements[i].mul_add(y.elements[i], z.elements[i])
                    }),
                }
            }

            #[inline(always)]
            fn fms(self, y: Self, z: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        self.elements[i].mul_add(y.elements[i], -z.elements[i])
                    }),
                }
            }

            #[inline(always)]
            fn fnma(self, y: Self, z: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        (-self.elements[i]).mul_add(y.elements[i], z.elements[i])
                    }),
                }
            }

            #[inline(always)]
            fn fnms(self, y: Self, z: Self) -> Self {
                Self {
                    elements: std::array::from_fn(|i| {
                        (-self.elements[i]).mul_add(y.elements[i], -z.elements[i])
                    }),
                }
            }

            #[inline(always)]
            fn fabs(self) -> Self {
                self.map(|a| a.abs())
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
                self.map(|a| a.sqrt())
            }

            #[inline(always)]
            fn is_nan(self) -> $mask {
                $mask::new(std::array::from_fn(|i| self.elements[i].is_nan()))
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a + b)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a - b)
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a * b)
            }
        }

        impl Div for $name {
            type Output = Self;

            /// IEEE division: a zero divisor produces ±inf (or NaN for
            /// 0/0), never a trap.
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a / b)
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline(always)]
            fn neg(self) -> Self {
                self.map(|a| -a)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| <$scalar>::from_bits(a.to_bits() & b.to_bits()))
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| <$scalar>::from_bits(a.to_bits() | b.to_bits()))
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| <$scalar>::from_bits(a.to_bits() ^ b.to_bits()))
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                self.map(|a| <$scalar>::from_bits(!a.to_bits()))
            }
        }
    };
}

/// Wrapping negation for the signed batches; the minimum stays put.
macro_rules! fallback_neg {
    ($name:ident) => {
        impl Neg for $name {
            type Output = Self;

            #[inline(always)]
            fn neg(self) -> Self {
                self.map(|a| a.wrapping_neg())
            }
        }
    };
}

/// Approximate division through f64; exact while both operands stay
/// within f64's 2^53 integer range (always, for 32-bit lanes).
macro_rules! fallback_div_fast {
    ($name:ident, $scalar:ty) => {
        impl $name {
            #[inline(always)]
            pub fn div_fast(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| (a as f64 / b as f64) as $scalar)
            }
        }
    };
}

fallback_common!(F32x4, f32, 4, "Scalar batch of 4 f32 values.");
fallback_common!(F64x2, f64, 2, "Scalar batch of 2 f64 values.");
fallback_common!(I8x16, i8, 16, "Scalar batch of 16 i8 values.");
fallback_common!(U8x16, u8, 16, "Scalar batch of 16 u8 values.");
fallback_common!(I16x8, i16, 8, "Scalar batch of 8 i16 values.");
fallback_common!(U16x8, u16, 8, "Scalar batch of 8 u16 values.");
fallback_common!(I32x4, i32, 4, "Scalar batch of 4 i32 values.");
fallback_common!(U32x4, u32, 4, "Scalar batch of 4 u32 values.");
fallback_common!(I64x2, i64, 2, "Scalar batch of 2 i64 values.");
fallback_common!(U64x2, u64, 2, "Scalar batch of 2 u64 values.");

fallback_float_ops!(F32x4, f32, 4, M32x4);
fallback_float_ops!(F64x2, f64, 2, M64x2);

fallback_int_ops!(I8x16, i8, 16, M8x16, signed);
fallback_int_ops!(U8x16, u8, 16, M8x16, unsigned);
fallback_int_ops!(I16x8, i16, 8, M16x8, signed);
fallback_int_ops!(U16x8, u16, 8, M16x8, unsigned);
fallback_int_ops!(I32x4, i32, 4, M32x4, signed);
fallback_int_ops!(U32x4, u32, 4, M32x4, unsigned);
fallback_int_ops!(I64x2, i64, 2, M64x2, signed);
fallback_int_ops!(U64x2, u64, 2, M64x2, unsigned);

/// Bitwise `From` conversions between the signed and unsigned batch of
/// one lane width; same-width `as` casts reinterpret the lane bits.
macro_rules! fallback_sign_flip {
    ($signed:ident, $signed_scalar:ty, $unsigned:ident, $unsigned_scalar:ty) => {
        impl From<$signed> for $unsigned {
            #[inline(always)]
            fn from(v: $signed) -> Self {
                Self {
                    elements: v.elements.map(|x| x as $unsigned_scalar),
                }
            }
        }

        impl From<$unsigned> for $signed {
            #[inline(always)]
            fn from(v: $unsigned) -> Self {
                Self {
                    elements: v.elements.map(|x| x as $signed_scalar),
                }
            }
        }
    };
}

fallback_sign_flip!(I8x16, i8, U8x16, u8);
fallback_sign_flip!(I16x8, i16, U16x8, u16);
fallback_sign_flip!(I32x4, i32, U32x4, u32);
fallback_sign_flip!(I64x2, i64, U64x2, u64);

fallback_neg!(I8x16);
fallback_neg!(I16x8);
fallback_neg!(I32x4);
fallback_neg!(I64x2);

fallback_div_fast!(I32x4, i32);
fallback_div_fast!(U32x4, u32);
fallback_div_fast!(I64x2, i64);
fallback_div_fast!(U64x2, u64);

/// Width moves between adjacent lane widths; `as` handles sign or zero
/// extension and truncation, the saturating narrow clamps to the
/// destination's bounds.
macro_rules! fallback_width_moves {
    ($narrow:ident, $nscalar:ty, $wide:ident, $wscalar:ty) => {
        impl Widen for $narrow {
            type Wide = $wide;

            #[inline(always)]
            fn widen_lo(self) -> $wide {
                $wide::from_fn(|i| self.elements[i] as $wscalar)
            }

            #[inline(always)]
            fn widen_hi(self) -> $wide {
                $wide::from_fn(|i| self.elements[$wide::LANES + i] as $wscalar)
            }
        }

        impl Narrow for $wide {
            type Narrowed = $narrow;

            #[inline(always)]
            fn narrow(self, hi: Self) -> $narrow {
                $narrow::from_fn(|i| {
                    if i < Self::LANES {
                        self.elements[i] as $nscalar
                    } else {
                        hi.elements[i - Self::LANES] as $nscalar
                    }
                })
            }

            #[inline(always)]
            fn narrow_saturating(self, hi: Self) -> $narrow {
                let clamp = |v: $wscalar| {
                    v.clamp(<$nscalar>::MIN as $wscalar, <$nscalar>::MAX as $wscalar) as $nscalar
                };
                $narrow::from_fn(|i| {
                    if i < Self::LANES {
                        clamp(self.elements[i])
                    } else {
                        clamp(hi.elements[i - Self::LANES])
                    }
                })
            }
        }
    };
}

fallback_width_moves!(I8x16, i8, I16x8, i16);
fallback_width_moves!(U8x16, u8, U16x8, u16);
fallback_width_moves!(I16x8, i16, I32x4, i32);
fallback_width_moves!(U16x8, u16, U32x4, u32);
fallback_width_moves!(I32x4, i32, I64x2, i64);
fallback_width_moves!(U32x4, u32, U64x2, u64);

impl F32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f32, e1: f32, e2: f32, e3: f32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }
}

impl F64x2 {
    /// Builds a batch from 2 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64) -> Self {
        Self::from_array([e0, e1])
    }
}

impl I32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: i32, e1: i32, e2: i32, e3: i32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }
}

impl U32x4 {
    /// Builds a batch from 4 lane values, lane 0 first.
    #[inline(always)]
    pub fn new(e0: u32, e1: u32, e2: u32, e3: u32) -> Self {
        Self::from_array([e0, e1, e2, e3])
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn wrapping_and_saturating_integers() {
        let a = I32x4::new(1, 2, 3, 4);
        let b = I32x4::new(10, 20, 30, 40);
        assert_eq!((a + b).to_array(), [11, 22, 33, 44]);
        assert_eq!(a.hadd(), 10);
        assert_eq!(
            I32x4::splat(i32::MAX).sadd(I32x4::splat(1)).to_array(),
            [i32::MAX; 4]
        );
        assert_eq!(U8x16::splat(5).ssub(U8x16::splat(10)).to_array(), [0u8; 16]);
        assert_eq!(
            I32x4::splat(1).ssub(I32x4::splat(i32::MIN)).to_array(),
            [i32::MAX; 4]
        );
    }

    #[test]
    fn float_edges_match_vector_tiers() {
        let q = (F32x4::new(1.0, -1.0, 0.0, 4.5) / F32x4::new(0.0, 0.0, 0.0, 1.5)).to_array();
        assert_eq!(q[0], f32::INFINITY);
        assert_eq!(q[1], f32::NEG_INFINITY);
        assert!(q[2].is_nan());
        assert_eq!(q[3], 3.0);

        // Second operand wins against NaN, like minps.
        let nan = F32x4::splat(f32::NAN);
        let two = F32x4::splat(2.0);
        assert_eq!(nan.fmin(two).to_array(), [2.0; 4]);
        assert!(two.fmin(nan).to_array().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn shifts_normalize_counts() {
        assert_eq!(I8x16::splat(-1).shr(9).to_array(), [-1i8; 16]);
        assert_eq!(U16x8::splat(1).shr(16).to_array(), [0u16; 8]);
        assert_eq!(U16x8::splat(1).shl(20).to_array(), [0u16; 8]);
        assert_eq!(I32x4::splat(-64).shr(3).to_array(), [-8i32; 4]);
    }

    #[test]
    fn zips_select_and_compares() {
        let a = I16x8::from_fn(|i| i as i16);
        let b = I16x8::from_fn(|i| (i + 8) as i16);
        assert_eq!(&a.zip_lo(b).to_array()[..4], &[0, 8, 1, 9]);
        assert_eq!(&a.zip_hi(b).to_array()[..4], &[4, 12, 5, 13]);

        let m = a.simd_lt(I16x8::splat(4));
        assert_eq!(I16x8::select(m, a, b).to_array()[0], 0);
        assert_eq!(I16x8::select(m, a, b).to_array()[7], 15);
        assert!(a.simd_eq(a).all());
    }

    #[test]
    fn haddp_and_fma() {
        let rows = [
            F32x4::new(1.0, 2.0, 3.0, 4.0),
            F32x4::splat(0.5),
            F32x4::splat(-1.0),
            F32x4::new(10.0, 20.0, 30.0, 40.0),
        ];
        assert_eq!(F32x4::haddp(&rows).to_array(), [10.0, 2.0, -4.0, 100.0]);
        assert_eq!(
            F32x4::splat(2.0)
                .fma(F32x4::splat(3.0), F32x4::splat(1.0))
                .to_array(),
            [7.0; 4]
        );
    }

    #[test]
    fn division_paths() {
        let a = I64x2::new(1 << 52, -9);
        let b = I64x2::new(2, 3);
        assert_eq!(a.div_fast(b).to_array(), a.div_exact(b).to_array());
        assert_eq!((a / b).to_array(), [1 << 51, -3]);
    }

    #[test]
    fn width_moves() {
        let x = I8x16::from_fn(|i| i as i8 - 8);
        let lo = x.widen_lo();
        let hi = x.widen_hi();
        assert_eq!(lo.to_array(), [-8, -7, -6, -5, -4, -3, -2, -1]);
        assert_eq!(hi.to_array(), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(lo.narrow(hi).to_array(), x.to_array());

        let over = I16x8::splat(300);
        let under = I16x8::splat(-300);
        let packed = over.narrow_saturating(under);
        assert_eq!(packed.to_array()[0], i8::MAX);
        assert_eq!(packed.to_array()[8], i8::MIN);

        let big = U16x8::splat(0x9000);
        assert_eq!(big.narrow_saturating(big).to_array(), [u8::MAX; 16]);
        assert_eq!(U16x8::splat(0xFFFE).widen_lo().to_array(), [0xFFFEu32; 4]);
    }
}
