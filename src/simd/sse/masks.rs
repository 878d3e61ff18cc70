//! Boolean lane masks for the 128-bit x86 tier.
//!
//! Comparison results land here: one mask type per lane width, each lane
//! holding all-ones or all-zeros at the width of the paired scalar. The
//! masks combine with batches through plain bitwise instructions and
//! feed `select`. `all`/`any` reduce through `_mm_movemask_epi8`, which
//! works for every lane width because lanes never hold partial patterns.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::simd::traits::SimdMask;

macro_rules! sse_mask_type {
    ($name:ident, $lanes:expr, $lane_bytes:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug)]
        pub struct $name {
            /// 128-bit register; every lane is all-ones or all-zeros.
            pub(crate) mask: __m128i,
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
                    mask: unsafe { _mm_loadu_si128(bytes.as_ptr() as *const __m128i) },
                }
            }

            /// Reads every lane back as plain booleans.
            #[inline(always)]
            pub fn to_array(self) -> [bool; $lanes] {
                let mut bytes = [0u8; 16];
                unsafe { _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, self.mask) };
                let mut out = [false; $lanes];
                for (lane, flag) in out.iter_mut().enumerate() {
                    *flag = bytes[lane * $lane_bytes] != 0;
                }
                out
            }

            #[inline(always)]
            pub(crate) fn from_raw(mask: __m128i) -> Self {
                Self { mask }
            }
        }

        impl SimdMask for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: bool) -> Self {
                Self {
                    mask: unsafe {
                        if value {
                            _mm_set1_epi8(-1)
                        } else {
                            _mm_setzero_si128()
                        }
                    },
                }
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                // _mm_andnot_si128 computes (!a) & b, so the operands swap.
                Self {
                    mask: unsafe { _mm_andnot_si128(other.mask, self.mask) },
                }
            }

            #[inline(always)]
            fn all(self) -> bool {
                unsafe { _mm_movemask_epi8(self.mask) == 0xFFFF }
            }

            #[inline(always)]
            fn any(self) -> bool {
                unsafe { _mm_movemask_epi8(self.mask) != 0 }
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
                    mask: unsafe { _mm_and_si128(self.mask, rhs.mask) },
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { _mm_or_si128(self.mask, rhs.mask) },
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { _mm_xor_si128(self.mask, rhs.mask) },
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    mask: unsafe { _mm_xor_si128(self.mask, _mm_set1_epi8(-1)) },
                }
            }
        }

        impl PartialEq for $name {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                unsafe {
                    _mm_movemask_epi8(_mm_cmpeq_epi8(self.mask, other.mask)) == 0xFFFF
                }
            }
        }

        impl Eq for $name {}
    };
}

sse_mask_type!(M8x16, 16, 1, "Boolean mask paired with the 16-lane 8-bit batches.");
sse_mask_type!(M16x8, 8, 2, "Boolean mask paired with the 8-lane 16-bit batches.");
sse_mask_type!(M32x4, 4, 4, "Boolean mask paired with the 4-lane 32-bit batches.");
sse_mask_type!(M64x2, 2, 8, "Boolean mask paired with the 2-lane 64-bit batches.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splat_true_sets_every_lane() {
        let m = M32x4::splat(true);
        assert!(m.all());
        assert!(m.any());
        assert_eq!(m.to_array(), [true; 4]);
    }

    #[test]
    fn splat_false_clears_every_lane() {
        let m = M8x16::splat(false);
        assert!(!m.all());
        assert!(!m.any());
        assert_eq!(m.to_array(), [false; 16]);
    }

    #[test]
    fn mixed_lanes_round_trip() {
        let lanes = [true, false, false, true];
        let m = M32x4::new(lanes);
        assert_eq!(m.to_array(), lanes);
        assert!(m.any());
        assert!(!m.all());
    }

    #[test]
    fn bitwise_logic() {
        let a = M32x4::new([true, true, false, false]);
        let b = M32x4::new([true, false, true, false]);

        assert_eq!((a & b).to_array(), [true, false, false, false]);
        assert_eq!((a | b).to_array(), [true, true, true, false]);
        assert_eq!((a ^ b).to_array(), [false, true, true, false]);
        assert_eq!((!a).to_array(), [false, false, true, true]);
        assert_eq!(a.andnot(b).to_array(), [false, true, false, false]);
    }

    #[test]
    fn replace_and_extract() {
        let m = M16x8::splat(false).replace(3, true);
        assert!(m.extract(3));
        assert!(!m.extract(2));
        assert!(m.any());
    }

    #[test]
    fn mask_equality() {
        let a = M64x2::new([true, false]);
        let b = M64x2::new([true, false]);
        let c = M64x2::new([false, false]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
