//! Portable SIMD batch types with uniform semantics across ISA tiers.
//!
//! A batch is a fixed-width vector of scalars (`i8` through `i64`,
//! their unsigned counterparts, `f32`, `f64`) stored in one hardware
//! register. The build script probes the host CPU and compiles exactly
//! one kernel tier (SSE4.1, AVX2, NEON or a plain-array fallback), so
//! every operation dispatches at compile time with no runtime
//! branching.
//!
//! All tiers honour the same contracts: integer operator arithmetic
//! wraps, `sadd`/`ssub` saturate, comparisons yield boolean masks with
//! all-ones/all-zeros lanes, shifts normalize out-of-range counts, and
//! float edge cases (division by zero, NaN in compares) follow IEEE
//! 754. The one documented divergence is the NaN operand preferred by
//! `fmin`/`fmax`, which tracks each platform's native instruction.

pub mod simd;
