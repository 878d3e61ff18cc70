//! Boolean lane masks for the 256-bit x86 tier.
//!
//! Same shape as the 128-bit tier's masks at double width: one type per
//! lane width, all-ones or all-zeros lanes, `all`/`any` through
//! `_mm256_movemask_epi8` (whose 32-bit result is compared against -1
//! rather than a mask constant).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::simd::traits::SimdMask;

macro_rules! avx2_mask_type {
    ($name:ident, $lanes:expr, $lane_bytes:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug)]
        pub struct $name {
            /// 256-bit register; every lane is all-ones or all-zeros.
            pub(crate) mask: __m256i,
        }

        impl $name {
            /// Builds a mask from one boolean per lane.
            #[inline(always)]
            pub fn new(lanes: [bool; $lanes]) -> Self {
                let mut bytes = [0u8; 32];
                for (lane, flag) in lanes.iter().enumerate() {
                    if *flag {
                        for b in 0..$lane_bytes {
                            bytes[lane * $lane_bytes + b] = 0xFF;
                        }
                    }
                }
                Self {
                    mask: unsafe { _mm256_loadu_si256(bytes.as_ptr() as *const __m256i) },
                }
            }

            /// Reads every lane back as plain booleans.
            #[inline(always)]
            pub fn to_array(self) -> [bool; $lanes] {
                let mut bytes = [0u8; 32];
                unsafe { _mm256_storeu_si256(bytes.as_mut_ptr() as *mut __m256i, self.mask) };
                let mut out = [false; $lanes];
                for (lane, flag) in out.iter_mut().enumerate() {
                    *flag = bytes[lane * $lane_bytes] != 0;
                }
                out
            }

            #[inline(always)]
            pub(crate) fn from_raw(mask: __m256i) -> Self {
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
                            _mm256_set1_epi8(-1)
                        } else {
                            _mm256_setzero_si256()
                        }
                    },
                }
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                // _mm256_andnot_si256 computes (!a) & b, so the operands swap.
                Self {
                    mask: unsafe { _mm256_andnot_si256(other.mask, self.mask) },
                }
            }

            #[inline(always)]
            fn all(self) -> bool {
                unsafe { _mm256_movemask_epi8(self.mask) == -1 }
            }

            #[inline(always)]
            fn any(self) -> bool {
                unsafe { _mm256_movemask_epi8(self.mask) != 0 }
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
                    mask: unsafe { _mm256_and_si256(self.mask, rhs.mask) },
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { _mm256_or_si256(self.mask, rhs.mask) },
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    mask: unsafe { _mm256_xor_si256(self.mask, rhs.mask) },
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    mask: unsafe { _mm256_xor_si256(self.mask, _mm256_set1_epi8(-1)) },
                }
            }
        }

        impl PartialEq for $name {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                unsafe {
                    _mm256_movemask_epi8(_mm256_cmpeq_epi8(self.mask, other.mask)) == -1
                }
            }
        }
    };
}

avx2_mask_type!(M8x32, 32, 1, "Mask paired with the 32-lane 8-bit batches.");
avx2_mask_type!(M16x16, 16, 2, "Mask paired with the 16-lane 16-bit batches.");
avx2_mask_type!(M32x8, 8, 4, "Mask paired with the 8-lane 32-bit batches.");
avx2_mask_type!(M64x4, 4, 8, "Mask paired with the 4-lane 64-bit batches.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_and_reductions() {
        let mut lanes = [false; 8];
        lanes[0] = true;
        lanes[7] = true;
        let m = M32x8::new(lanes);
        assert_eq!(m.to_array(), lanes);
        assert!(m.any());
        assert!(!m.all());
        assert!(M32x8::splat(true).all());
        assert!(!M32x8::splat(false).any());
    }

    #[test]
    fn bitwise_combinations() {
        let a = M64x4::new([true, true, false, false]);
        let b = M64x4::new([true, false, true, false]);
        assert_eq!((a & b).to_array(), [true, false, false, false]);
        assert_eq!((a | b).to_array(), [true, true, true, false]);
        assert_eq!((a ^ b).to_array(), [false, true, true, false]);
        assert_eq!(a.andnot(b).to_array(), [false, true, false, false]);
        assert_eq!((!a).to_array(), [false, false, true, true]);
    }

    #[test]
    fn wide_mask_movemask_covers_every_byte() {
        let mut lanes = [true; 32];
        lanes[31] = false;
        let m = M8x32::new(lanes);
        assert!(!m.all());
        assert!(m.replace(31, true).all());
    }
}
