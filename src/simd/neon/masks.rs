//! Boolean lane masks for the NEON tier.
//!
//! Every mask stores its lanes in one `uint8x16_t`, whatever the paired
//! lane width; compare results arrive typed (`uint32x4_t` from an f32
//! compare, and so on) and `from_raw` reinterprets them down to bytes.
//! Lanes are always all-ones or all-zeros, so byte-granular reductions
//! (`vminvq_u8`/`vmaxvq_u8`) answer `all`/`any` for every width, and
//! `select` reinterprets back up to the width `vbslq` wants.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::simd::traits::SimdMask;

macro_rules! neon_mask_type {
    ($name:ident, $lanes:expr, $lane_bytes:expr, $raw:ty, $narrow:ident, $widen:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug)]
        pub struct $name {
            /// Byte view of the mask; every lane all-ones or all-zeros.
            pub(crate) mask: uint8x16_t,
        }

        impl $name {
            /// Builds a mask from one boolean per lane.
            #[inline(always)]
            pub fn new(lanes: [bool; $lanes]) -> Self {
                let mut bytes = [0u8; 16];
                for (lane, flag) in lanes.iter().enumerate() {
                    if *flag {
                        for b in 0..$lane_bytes {
                            bytes[lane * $lane_bytes + b] = 0xFF;
                        }
                    }
                }
                Self {
                    mask: unsafe { vld1q_u8(bytes.as_ptr()) },
                }
            }

            /// Reads every lane back as plain booleans.
            #[inline(always)]
            pub fn to_array(self) -> [bool; $lanes] {
                let mut bytes = [0u8; 16];
                unsafe { vst1q_u8(bytes.as_mut_ptr(), self.mask) };
                let mut out = [false; $lanes];
                for (lane, flag) in out.iter_mut().enumerate() {
                    *flag = bytes[lane * $lane_bytes] != 0;
                }
                out
            }

            /// Wraps a typed compare result.
            #[inline(always)]
            pub(crate) fn from_raw(mask: $raw) -> Self {
                Self {
                    mask: unsafe { $narrow(mask) },
                }
            }

            /// The mask at the lane width `vbslq` expects.
            #[inline(always)]
            pub(crate) fn raw(self) -> $raw {
                unsafe { $widen(self.mask) }
            }
        }

        impl SimdMask for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: bool) -> Self {
                Self {
                    mask: unsafe { vdupq_n_u8(if value { 0xFF } else { 0 }) },
                }
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                // vbicq computes a & !b, operand order as written.
                Self {
                    mask: unsafe { vbicq_u8(self.mask, other.mask) },
                }
            }

            #[inline(always)]
            fn all(self) -> bool {
                unsafe { vminvq_u8(self.mask) == 0xFF }
            }

            #[inline(always)]
            fn any(self) -> bool {
                unsafe { vmaxvq_u8(self.mask) != 0 }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> bool {
                debug_assert!(lane < $lanes, "lane index out of range");
                self.to_array()[lane]
            }

            #[inline(always)]
            fn replace(self, lane: usize, value: bool) -> Self {
                debug_assert!(lane < $lanes, "lane index out of range");
                let mut lanes = self.to_array();
                lanes[lane] = value;
                Self::new(lanes)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { vandq_u8(self.mask, rhs.mask) },
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { vorrq_u8(self.mask, rhs.mask) },
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { veorq_u8(self.mask, rhs.mask) },
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    mask: unsafe { vmvnq_u8(self.mask) },
                }
            }
        }

        impl PartialEq for $name {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                unsafe { vminvq_u8(vceqq_u8(self.mask, other.mask)) == 0xFF }
            }
        }
    };
}

/// Identity reinterpret for the byte-width mask.
#[inline(always)]
unsafe fn ident_u8(v: uint8x16_t) -> uint8x16_t {
    v
}

neon_mask_type!(
    M8x16,
    16,
    1,
    uint8x16_t,
    ident_u8,
    ident_u8,
    "Mask paired with the 16-lane 8-bit batches."
);
neon_mask_type!(
    M16x8,
    8,
    2,
    uint16x8_t,
    vreinterpretq_u8_u16,
    vreinterpretq_u16_u8,
    "Mask paired with the 8-lane 16-bit batches."
);
neon_mask_type!(
    M32x4,
    4,
    4,
    uint32x4_t,
    vreinterpretq_u8_u32,
    vreinterpretq_u32_u8,
    "Mask paired with the 4-lane 32-bit batches."
);
neon_mask_type!(
    M64x2,
    2,
    8,
    uint64x2_t,
    vreinterpretq_u8_u64,
    vreinterpretq_u64_u8,
    "Mask paired with the 2-lane 64-bit batches."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_and_reductions() {
        let m = M32x4::new([true, false, false, true]);
        assert_eq!(m.to_array(), [true, false, false, true]);
        assert!(m.any());
        assert!(!m.all());
        assert!(M32x4::splat(true).all());
        assert!(!M32x4::splat(false).any());
    }

    #[test]
    fn bitwise_combinations() {
        let a = M64x2::new([true, false]);
        let b = M64x2::new([true, true]);
        assert_eq!((a & b).to_array(), [true, false]);
        assert_eq!((a | b).to_array(), [true, true]);
        assert_eq!((a ^ b).to_array(), [false, true]);
        assert_eq!(b.andnot(a).to_array(), [false, true]);
        assert_eq!((!a).to_array(), [false, true]);
    }

    #[test]
    fn replace_updates_one_lane() {
        let m = M8x16::splat(false).replace(3, true);
        let mut expect = [false; 16];
        expect[3] = true;
        assert_eq!(m.to_array(), expect);
    }
}
