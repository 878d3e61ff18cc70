//! Core trait surface shared by every kernel tier.
//!
//! These traits describe the abstract batch contract: how batches move
//! between registers and memory (`SimdLoad`, `SimdStore`, `Alignment`),
//! the lane-wise operation set every batch supports (`SimdBatch`), and
//! the float- and integer-specific extensions (`SimdFloat`, `SimdInt`).
//! Boolean masks implement `SimdMask`.
//!
//! All dispatch is resolved at compile time: the build script selects one
//! kernel tier (`sse`, `avx2`, `neon` or `fallback`) and the concrete
//! types in that tier implement these traits with native intrinsics or
//! documented software sequences. There are no trait objects and no
//! runtime branching in any operator.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Sub};

/// Pointer alignment check against a batch type's natural alignment.
///
/// The natural alignment equals the register byte width (16 bytes for the
/// 128-bit tiers, 32 bytes for AVX2). Aligned loads and stores require it;
/// unaligned variants accept any address.
pub trait Alignment<T> {
    /// Returns `true` if `ptr` meets the batch's natural alignment.
    fn is_aligned(ptr: *const T) -> bool;
}

/// Loading batches from raw memory.
///
/// The aligned variants wrap the platform's aligned load instruction and
/// inherit its contract: passing a misaligned pointer is undefined
/// behavior. The unaligned variants accept any address and produce the
/// same value, only with a weaker precondition.
pub trait SimdLoad<T>: Sized {
    /// Loads a full batch, dispatching on the pointer's actual alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and readable for `LANES` values of `T`.
    unsafe fn load(ptr: *const T) -> Self;

    /// Loads a full batch from memory aligned to the register width.
    ///
    /// # Safety
    ///
    /// `ptr` must meet the batch's natural alignment and be readable for
    /// `LANES` values of `T`.
    unsafe fn load_aligned(ptr: *const T) -> Self;

    /// Loads a full batch from memory at any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and readable for `LANES` values of `T`.
    unsafe fn load_unaligned(ptr: *const T) -> Self;
}

/// Storing batches to raw memory. Mirrors [`SimdLoad`].
pub trait SimdStore<T> {
    /// Stores a full batch, dispatching on the pointer's actual alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and writable for `LANES` values of `T`.
    unsafe fn store_at(&self, ptr: *mut T);

    /// Stores a full batch to memory aligned to the register width.
    ///
    /// # Safety
    ///
    /// `ptr` must meet the batch's natural alignment and be writable for
    /// `LANES` values of `T`.
    unsafe fn store_aligned_at(&self, ptr: *mut T);

    /// Stores a full batch to memory at any alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and writable for `LANES` values of `T`.
    unsafe fn store_unaligned_at(&self, ptr: *mut T);
}

/// Boolean lane mask paired with a batch type.
///
/// Each lane is physically all-ones or all-zeros at the width of the
/// batch's scalar, so a mask combines with batches through plain bitwise
/// instructions and drives branch-free `select`. The public API never
/// produces a partial bit pattern.
pub trait SimdMask:
    Copy
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Number of boolean lanes.
    const LANES: usize;

    /// Broadcasts one boolean to every lane.
    fn splat(value: bool) -> Self;

    /// `self & !other`, one instruction on hardware tiers.
    fn andnot(self, other: Self) -> Self;

    /// True iff every lane is true. O(1) on hardware tiers (movemask or
    /// horizontal min), an unrolled scan in the fallback tier.
    fn all(self) -> bool;

    /// True iff at least one lane is true. Same cost model as [`all`].
    ///
    /// [`all`]: SimdMask::all
    fn any(self) -> bool;

    /// Reads one lane as a boolean.
    fn extract(self, lane: usize) -> bool;

    /// Returns a copy with one lane overwritten; writing `true` stores
    /// all-ones, `false` stores all-zeros in that lane's bit pattern.
    fn replace(self, lane: usize, value: bool) -> Self;
}

/// The lane-wise operation set common to every batch type.
///
/// Batches are immutable `Copy` value types; every operation returns a
/// new batch. Arithmetic on integer lanes wraps, matching the native
/// instructions; comparisons return the paired [`SimdMask`] type.
pub trait SimdBatch:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Scalar lane type.
    type Scalar: Copy + PartialEq + core::fmt::Debug;

    /// Paired boolean mask type of the same lane count.
    type Mask: SimdMask;

    /// Number of lanes; `LANES * size_of::<Scalar>()` equals the register
    /// byte width for the hardware tiers.
    const LANES: usize;

    /// Broadcasts one scalar to every lane.
    fn splat(value: Self::Scalar) -> Self;

    /// Builds a batch lane by lane from a generator function.
    ///
    /// This is the portable construction path behind lane-converting
    /// loads and the complex de-interleave; hardware tiers route it
    /// through a stack buffer rather than per-lane inserts.
    fn from_fn(f: impl FnMut(usize) -> Self::Scalar) -> Self;

    /// Reads one lane. May be emulated by extract-and-store; the lane
    /// index is bounds-checked in debug builds only.
    fn extract(self, lane: usize) -> Self::Scalar;

    /// Returns a copy with one lane overwritten.
    fn replace(self, lane: usize, value: Self::Scalar) -> Self;

    /// Lane-wise minimum. For float batches this is the raw native
    /// instruction; see [`SimdFloat::fmin`] for its NaN contract.
    fn min(self, other: Self) -> Self;

    /// Lane-wise maximum.
    fn max(self, other: Self) -> Self;

    /// `self & !other` on the raw lane bits.
    fn andnot(self, other: Self) -> Self;

    /// Branch-free per-lane choice: lane i of the result is `a`'s lane
    /// where `mask` is true, `b`'s lane where it is false.
    ///
    /// `mask` must hold proper all-ones/all-zeros lane patterns, which
    /// every [`SimdMask`] produced by this crate does.
    fn select(mask: Self::Mask, a: Self, b: Self) -> Self;

    /// Interleaves the low halves of two batches:
    /// `(a0, b0, a1, b1, ...)`.
    fn zip_lo(self, other: Self) -> Self;

    /// Interleaves the high halves of two batches:
    /// `(aN/2, bN/2, aN/2+1, bN/2+1, ...)`.
    fn zip_hi(self, other: Self) -> Self;

    /// Sums every lane into one scalar.
    ///
    /// The summation order is the tier's pairwise reduction tree, so
    /// float results may differ in the last bit from a left-to-right
    /// sum and are not required to match bit-for-bit across tiers.
    /// Integer sums wrap.
    fn hadd(self) -> Self::Scalar;

    /// Lane-wise equality.
    fn simd_eq(self, other: Self) -> Self::Mask;

    /// Lane-wise inequality.
    fn simd_ne(self, other: Self) -> Self::Mask;

    /// Lane-wise `<`. Unsigned batches on x86 bias both operands by the
    /// sign bit before the signed compare, yielding a correct unsigned
    /// ordering.
    fn simd_lt(self, other: Self) -> Self::Mask;

    /// Lane-wise `<=`.
    fn simd_le(self, other: Self) -> Self::Mask;

    /// Lane-wise `>`.
    fn simd_gt(self, other: Self) -> Self::Mask;

    /// Lane-wise `>=`.
    fn simd_ge(self, other: Self) -> Self::Mask;
}

/// Floating-point batch extensions.
pub trait SimdFloat: SimdBatch + std::ops::Neg<Output = Self> {
    /// `(self * y) + z`. A single rounding step when the tier is compiled
    /// with a fused instruction (`fma` target feature, or NEON); two
    /// roundings otherwise. Callers must not assume bit-identical
    /// results across tiers when the fused form is unavailable.
    fn fma(self, y: Self, z: Self) -> Self;

    /// `(self * y) - z`. Same rounding contract as [`fma`].
    ///
    /// [`fma`]: SimdFloat::fma
    fn fms(self, y: Self, z: Self) -> Self;

    /// `-(self * y) + z`. Same rounding contract as [`fma`].
    ///
    /// [`fma`]: SimdFloat::fma
    fn fnma(self, y: Self, z: Self) -> Self;

    /// `-(self * y) - z`. Same rounding contract as [`fma`].
    ///
    /// [`fma`]: SimdFloat::fma
    fn fnms(self, y: Self, z: Self) -> Self;

    /// Lane-wise absolute value by clearing the sign bit; `-0.0` maps to
    /// `0.0`, NaN payloads are preserved.
    fn fabs(self) -> Self;

    /// Lane-wise minimum with the tier's native NaN behavior: on x86 the
    /// second operand wins when either input is NaN (`minps` semantics),
    /// on NEON a NaN input propagates. This is an observable, testable
    /// per-tier contract.
    fn fmin(self, other: Self) -> Self;

    /// Lane-wise maximum; NaN behavior as in [`fmin`].
    ///
    /// [`fmin`]: SimdFloat::fmin
    fn fmax(self, other: Self) -> Self;

    /// Lane-wise square root.
    fn sqrt(self) -> Self;

    /// True in every lane holding a NaN bit pattern, via the hardware
    /// unordered comparison (`x != x`).
    fn is_nan(self) -> Self::Mask;
}

/// Integer batches whose lanes widen to a twice-wider scalar.
///
/// Widening halves the lane count, so a full batch widens in two steps:
/// [`widen_lo`] converts the low half of the lanes, [`widen_hi`] the
/// high half. Signed scalars sign-extend, unsigned scalars zero-extend,
/// through the native extension instructions (`pmovsx`/`pmovzx` on x86,
/// `vmovl` on NEON).
///
/// [`widen_lo`]: Widen::widen_lo
/// [`widen_hi`]: Widen::widen_hi
pub trait Widen: SimdBatch {
    /// Batch type holding half the lanes at twice the scalar width.
    type Wide: SimdBatch;

    /// Widens the low half of the lanes; lane i of the result is lane i
    /// of `self` converted.
    fn widen_lo(self) -> Self::Wide;

    /// Widens the high half of the lanes; lane i of the result is lane
    /// `Wide::LANES + i` of `self` converted.
    fn widen_hi(self) -> Self::Wide;
}

/// Integer batches whose lanes narrow to a half-width scalar.
pub trait Narrow: SimdBatch {
    /// Batch type holding double the lanes at half the scalar width.
    type Narrowed: SimdBatch;

    /// Concatenates `self` and `hi` into one narrow batch, truncating
    /// each lane to the destination width. `self` fills the low half of
    /// the result.
    fn narrow(self, hi: Self) -> Self::Narrowed;

    /// Like [`narrow`], but lanes outside the destination's
    /// representable range clamp to its bounds, matching the pack
    /// instructions.
    ///
    /// [`narrow`]: Narrow::narrow
    fn narrow_saturating(self, hi: Self) -> Self::Narrowed;
}

/// Integer batch extensions.
pub trait SimdInt: SimdBatch {
    /// Saturating addition: lanes clamp to the scalar's representable
    /// range instead of wrapping.
    fn sadd(self, other: Self) -> Self;

    /// Saturating subtraction.
    fn ssub(self, other: Self) -> Self;

    /// Lane-wise absolute value. Identity for unsigned batches; for
    /// signed batches `MIN` stays `MIN` (wrapping), matching `pabs`.
    fn abs(self) -> Self;

    /// Bit-exact per-lane division. This is also what the `/` operator
    /// does. Panics on a zero divisor, like scalar Rust division;
    /// `MIN / -1` wraps to `MIN`.
    fn div_exact(self, rhs: Self) -> Self;

    /// Lane-wise left shift by a runtime count. Shifting by the lane
    /// width or more yields zero.
    fn shl(self, count: u32) -> Self;

    /// Lane-wise right shift: arithmetic for signed scalars, logical for
    /// unsigned.
    fn shr(self, count: u32) -> Self;
}
