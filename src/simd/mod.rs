//! Batch types, kernel tiers and the traits that bind them.
//!
//! The build script detects the host CPU and compiles exactly one
//! hardware tier (`avx2` also keeps the 128-bit `sse` types for the
//! conversion layer); machines with none of the detected feature sets
//! get the portable `fallback` tier. The `F32s`/`I32s`-style aliases
//! below name the widest batch of each scalar type on the active tier,
//! so generic call sites and the test suite stay tier-agnostic.

#[cfg(avx2)]
pub mod avx2;

#[cfg(fallback)]
pub mod fallback;

#[cfg(neon)]
pub mod neon;

#[cfg(sse)]
pub mod sse;

pub mod cast;
pub mod complex;
pub mod traits;

#[cfg(avx2)]
pub use avx2::{
    f32x8::F32x8 as F32s,
    f64x4::F64x4 as F64s,
    int16x16::{I16x16 as I16s, U16x16 as U16s},
    int32x8::{I32x8 as I32s, U32x8 as U32s},
    int64x4::{I64x4 as I64s, U64x4 as U64s},
    int8x32::{I8x32 as I8s, U8x32 as U8s},
    masks::{M16x16 as M16s, M32x8 as M32s, M64x4 as M64s, M8x32 as M8s},
};

#[cfg(all(sse, not(avx2)))]
pub use sse::{
    f32x4::F32x4 as F32s,
    f64x2::F64x2 as F64s,
    int16x8::{I16x8 as I16s, U16x8 as U16s},
    int32x4::{I32x4 as I32s, U32x4 as U32s},
    int64x2::{I64x2 as I64s, U64x2 as U64s},
    int8x16::{I8x16 as I8s, U8x16 as U8s},
    masks::{M16x8 as M16s, M32x4 as M32s, M64x2 as M64s, M8x16 as M8s},
};

#[cfg(neon)]
pub use neon::{
    f32x4::F32x4 as F32s,
    f64x2::F64x2 as F64s,
    int16x8::{I16x8 as I16s, U16x8 as U16s},
    int32x4::{I32x4 as I32s, U32x4 as U32s},
    int64x2::{I64x2 as I64s, U64x2 as U64s},
    int8x16::{I8x16 as I8s, U8x16 as U8s},
    masks::{M16x8 as M16s, M32x4 as M32s, M64x2 as M64s, M8x16 as M8s},
};

#[cfg(fallback)]
pub use fallback::{
    batches::{
        F32x4 as F32s, F64x2 as F64s, I16x8 as I16s, I32x4 as I32s, I64x2 as I64s, I8x16 as I8s,
        U16x8 as U16s, U32x4 as U32s, U64x2 as U64s, U8x16 as U8s,
    },
    masks::{M16x8 as M16s, M32x4 as M32s, M64x2 as M64s, M8x16 as M8s},
};
