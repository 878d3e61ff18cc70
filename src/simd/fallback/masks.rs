//! Boolean lane masks for the scalar tier: plain `[bool; N]` wrappers.

use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::simd::traits::SimdMask;

macro_rules! fallback_mask_type {
    ($name:ident, $lanes:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            pub(crate) lanes: [bool; $lanes],
        }

        impl $name {
            /// Builds a mask from one boolean per lane.
            #[inline(always)]
            pub fn new(lanes: [bool; $lanes]) -> Self {
                Self { lanes }
            }

            /// Reads every lane back as plain booleans.
            #[inline(always)]
            pub fn to_array(self) -> [bool; $lanes] {
                self.lanes
            }
        }

        impl SimdMask for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: bool) -> Self {
                Self {
                    lanes: [value; $lanes],
                }
            }

            #[inline(always)]
            fn andnot(self, other: Self) -> Self {
                Self {
                    lanes: std::array::from_fn(|i| self.lanes[i] && !other.lanes[i]),
                }
            }

            #[inline(always)]
            fn all(self) -> bool {
                self.lanes.iter().all(|&b| b)
            }

            #[inline(always)]
            fn any(self) -> bool {
                self.lanes.iter().any(|&b| b)
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> bool {
                debug_assert!(lane < $lanes, "lane index out of range");
                self.lanes[lane]
            }

            #[inline(always)]
            fn replace(self, lane: usize, value: bool) -> Self {
                debug_assert!(lane < $lanes, "lane index out of range");
                let mut lanes = self.lanes;
                lanes[lane] = value;
                Self { lanes }
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self {
                    lanes: std::array::from_fn(|i| self.lanes[i] && rhs.lanes[i]),
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    lanes: std::array::from_fn(|i| self.lanes[i] || rhs.lanes[i]),
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    lanes: std::array::from_fn(|i| self.lanes[i] != rhs.lanes[i]),
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    lanes: std::array::from_fn(|i| !self.lanes[i]),
                }
            }
        }
    };
}

fallback_mask_type!(M8x16, 16, "Mask paired with the 16-lane 8-bit batches.");
fallback_mask_type!(M16x8, 8, "Mask paired with the 8-lane 16-bit batches.");
fallback_mask_type!(M32x4, 4, "Mask paired with the 4-lane 32-bit batches.");
fallback_mask_type!(M64x2, 2, "Mask paired with the 2-lane 64-bit batches.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reductions_and_bitwise() {
        let a = M32x4::new([true, true, false, false]);
        let b = M32x4::new([true, false, true, false]);
        assert!(a.any());
        assert!(!a.all());
        assert_eq!((a & b).to_array(), [true, false, false, false]);
        assert_eq!((a | b).to_array(), [true, true, true, false]);
        assert_eq!((a ^ b).to_array(), [false, true, true, false]);
        assert_eq!(a.andnot(b).to_array(), [false, true, false, false]);
        assert_eq!((!a).to_array(), [false, false, true, true]);
    }
}
