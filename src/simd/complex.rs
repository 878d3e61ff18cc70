//! Complex batches built from pairs of real float batches.
//!
//! No hardware tier has a complex register, so `Complex<B>` keeps the
//! real parts in one batch and the imaginary parts in another and
//! decomposes every operation into real-batch arithmetic. Memory holds
//! complex values interleaved (`re, im, re, im, ...`); the load path
//! de-interleaves into the split form and [`Complex::lo`]/
//! [`Complex::hi`] re-interleave through the real batches' zip
//! primitives. Conjugate, modulus and the rest of complex math are out
//! of scope here and belong to callers.

use std::ops::{Add, Mul, Neg, Sub};

use crate::simd::traits::{SimdBatch, SimdFloat, SimdStore};

/// A batch of complex values split into real and imaginary parts.
#[derive(Copy, Clone, Debug)]
pub struct Complex<B> {
    /// Real parts, one lane per complex value.
    pub re: B,
    /// Imaginary parts, lane-aligned with `re`.
    pub im: B,
}

impl<B: SimdFloat> Complex<B> {
    /// Pairs two real batches into a complex batch.
    #[inline(always)]
    pub fn new(re: B, im: B) -> Self {
        Self { re, im }
    }

    /// Broadcasts one complex value to every lane.
    #[inline(always)]
    pub fn splat(re: B::Scalar, im: B::Scalar) -> Self {
        Self {
            re: B::splat(re),
            im: B::splat(im),
        }
    }

    /// Loads `LANES` complex values from an interleaved buffer
    /// (`re, im, re, im, ...`, at least `2 * LANES` scalars).
    #[inline(always)]
    pub fn load_complex(src: &[B::Scalar]) -> Self {
        debug_assert!(
            src.len() >= 2 * B::LANES,
            "interleaved source must hold 2 * LANES values"
        );
        Self {
            re: B::from_fn(|i| src[2 * i]),
            im: B::from_fn(|i| src[2 * i + 1]),
        }
    }

    /// Re-interleaves the low half of the lanes:
    /// `(re0, im0, re1, im1, ...)`.
    #[inline(always)]
    pub fn lo(self) -> B {
        self.re.zip_lo(self.im)
    }

    /// Re-interleaves the high half of the lanes.
    #[inline(always)]
    pub fn hi(self) -> B {
        self.re.zip_hi(self.im)
    }
}

impl<B: SimdFloat + SimdStore<<B as SimdBatch>::Scalar>> Complex<B> {
    /// Stores `LANES` complex values to an interleaved buffer, the
    /// inverse of [`Complex::load_complex`].
    #[inline(always)]
    pub fn store_complex(self, dst: &mut [B::Scalar]) {
        debug_assert!(
            dst.len() >= 2 * B::LANES,
            "interleaved destination must hold 2 * LANES values"
        );
        unsafe {
            self.lo().store_unaligned_at(dst.as_mut_ptr());
            self.hi().store_unaligned_at(dst.as_mut_ptr().add(B::LANES));
        }
    }
}

impl<B: SimdFloat> Add for Complex<B> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<B: SimdFloat> Sub for Complex<B> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl<B: SimdFloat> Mul for Complex<B> {
    type Output = Self;

    /// `(a + bi)(c + di) = (ac - bd) + (ad + bc)i`, with the products
    /// fused where the tier fuses.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re.fms(rhs.re, self.im * rhs.im),
            im: self.re.fma(rhs.im, self.im * rhs.re),
        }
    }
}

impl<B: SimdFloat> Neg for Complex<B> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::F32s;

    #[test]
    fn complex_algebra() {
        let a = Complex::<F32s>::splat(1.0, 2.0);
        let b = Complex::<F32s>::splat(3.0, 4.0);

        let sum = a + b;
        assert_eq!(sum.re.extract(0), 4.0);
        assert_eq!(sum.im.extract(0), 6.0);

        // (1 + 2i)(3 + 4i) = -5 + 10i
        let prod = a * b;
        assert_eq!(prod.re.extract(0), -5.0);
        assert_eq!(prod.im.extract(0), 10.0);

        let neg = -a;
        assert_eq!(neg.re.extract(0), -1.0);
        assert_eq!(neg.im.extract(0), -2.0);
    }

    #[test]
    fn interleave_round_trip() {
        let src: Vec<f32> = (0..2 * F32s::LANES).map(|i| i as f32).collect();
        let z = Complex::<F32s>::load_complex(&src);
        assert_eq!(z.re.extract(0), 0.0);
        assert_eq!(z.im.extract(0), 1.0);
        assert_eq!(z.re.extract(1), 2.0);

        let mut dst = vec![0.0f32; 2 * F32s::LANES];
        z.store_complex(&mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn zip_halves_interleave_in_lane_order() {
        let z = Complex::<F32s>::new(
            F32s::from_fn(|i| i as f32),
            F32s::from_fn(|i| i as f32 + 100.0),
        );
        let lo = z.lo();
        assert_eq!(lo.extract(0), 0.0);
        assert_eq!(lo.extract(1), 100.0);
    }
}
