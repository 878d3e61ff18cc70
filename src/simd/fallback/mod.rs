//! Portable scalar kernel tier.
//!
//! Compiled in when the build script detects no vector unit
//! (`cfg(fallback)`). Batches are plain arrays at the 128-bit tier's
//! lane counts, so code written against the batch API keeps the exact
//! same shape and semantics on targets with no SIMD at all; the
//! optimizer frequently autovectorizes these loops anyway.
//!
//! Semantics follow the x86 tiers where tiers disagree: `fmin`/`fmax`
//! return the second operand when either input is NaN, integer
//! horizontal sums wrap at lane width, and out-of-range shift counts
//! zero-fill (or sign-fill for arithmetic shifts) instead of
//! panicking.

pub mod batches;
pub mod masks;

/// Lane-count-matching alignment for the scalar tier, in bytes.
pub(crate) const FALLBACK_ALIGNMENT: usize = 16;
