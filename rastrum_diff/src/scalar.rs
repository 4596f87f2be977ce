// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric scalar abstraction shared by every differentiable evaluation.

use core::fmt::Debug;
use core::iter::Sum;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric scalar used by density fields, signed distances, and transforms.
///
/// The rasterization path is written once against this trait and evaluated either with plain
/// `f64` (no bookkeeping) or with [`Var`](crate::Var) (recorded on a [`Tape`](crate::Tape)).
///
/// Comparisons are always made on [`Scalar::value`]. They select branches but never carry
/// derivatives, so `min`, `max` and `clamp` are differentiable almost everywhere and route the
/// whole adjoint to the selected operand.
pub trait Scalar:
    Copy
    + Debug
    + Sum
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Lift a plain number. Constants have zero derivative with respect to everything.
    fn constant(value: f64) -> Self;

    /// The primal value.
    fn value(self) -> f64;

    /// Leave the differentiable graph.
    ///
    /// Returns the primal value with no link back to whatever recorded it. Anything computed from
    /// the returned `f64` is invisible to reverse accumulation; this is the stop-gradient boundary.
    #[inline]
    fn detach(self) -> f64 {
        self.value()
    }

    /// Additive identity.
    #[inline]
    fn zero() -> Self {
        Self::constant(0.0)
    }

    /// Sine.
    fn sin(self) -> Self;

    /// Cosine.
    fn cos(self) -> Self;

    /// Natural exponential.
    fn exp(self) -> Self;

    /// Square root. The derivative at zero is reported as zero.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Minimum of two scalars; ties select `self`.
    #[inline]
    fn min(self, other: Self) -> Self {
        if self.value() <= other.value() {
            self
        } else {
            other
        }
    }

    /// Maximum of two scalars; ties select `self`.
    #[inline]
    fn max(self, other: Self) -> Self {
        if self.value() >= other.value() {
            self
        } else {
            other
        }
    }

    /// Clamp to `[lo, hi]`.
    ///
    /// Values inside the closed interval pass through unchanged (derivative one); values outside
    /// are replaced by a constant bound.
    #[inline]
    fn clamp(self, lo: f64, hi: f64) -> Self {
        let v = self.value();
        if v < lo {
            Self::constant(lo)
        } else if v > hi {
            Self::constant(hi)
        } else {
            self
        }
    }

    /// Euclidean length of `(self, other)`.
    #[inline]
    fn hypot(self, other: Self) -> Self {
        (self * self + other * other).sqrt()
    }
}

impl Scalar for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(self) -> f64 {
        self
    }

    #[inline]
    fn sin(self) -> Self {
        Self::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        Self::cos(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Self::exp(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        Self::abs(self)
    }
}

/// Lift a slice of plain numbers into constants of `S`.
pub fn lift<S: Scalar>(values: &[f64]) -> Vec<S> {
    values.iter().copied().map(S::constant).collect()
}

/// Detach every element of `values`, see [`Scalar::detach`].
pub fn detach_all<S: Scalar>(values: &[S]) -> Vec<f64> {
    values.iter().map(|v| v.detach()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp<S: Scalar>(x: S) -> S {
        (x * 2.0 - 1.0).clamp(0.0, 1.0)
    }

    #[test]
    fn f64_is_a_plain_scalar() {
        assert_eq!(<f64 as Scalar>::constant(3.5), 3.5);
        assert_eq!(Scalar::detach(2.0_f64), 2.0);
        assert_eq!(Scalar::hypot(3.0_f64, 4.0), 5.0);
        assert_eq!(<f64 as Scalar>::zero(), 0.0);
    }

    #[test]
    fn clamp_bounds_are_inclusive() {
        assert_eq!(ramp(0.25_f64), 0.0);
        assert_eq!(ramp(0.5_f64), 0.0);
        assert_eq!(ramp(0.75_f64), 0.5);
        assert_eq!(ramp(1.0_f64), 1.0);
        assert_eq!(ramp(4.0_f64), 1.0);
    }

    #[test]
    fn min_max_tie_selects_self() {
        assert_eq!(Scalar::min(1.0_f64, 2.0), 1.0);
        assert_eq!(Scalar::max(1.0_f64, 2.0), 2.0);
        assert_eq!(Scalar::max(-0.0_f64, 0.0).to_bits(), (-0.0_f64).to_bits());
    }

    #[test]
    fn lift_and_detach_round_trip() {
        let xs = [0.0, 1.5, -2.0];
        let lifted: Vec<f64> = lift(&xs);
        assert_eq!(detach_all(&lifted), xs.to_vec());
    }
}
