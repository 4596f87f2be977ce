// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Density fields and bounded sampling.

use rastrum_diff::Scalar;

use crate::{BoundingBox, GeomError, check_lengths};

/// A continuous map from a point to a fill value.
///
/// Implementations must be pure: the same inputs always give the same output. Values outside
/// `[0, 1]` are allowed; [`bounded_sample`] clamps them.
///
/// Every `Fn(S, S) -> S` is a density field:
///
/// ```rust
/// use rastrum_geom::{BoundingBox, DensityField, bounded_sample};
///
/// let ramp = |x: f64, _y: f64| x / 4.0;
/// assert_eq!(ramp.sample(2.0, 0.0), 0.5);
///
/// let bbox = BoundingBox::new((0.0, 0.0), (3.0, 1.0)).unwrap();
/// assert_eq!(bounded_sample(&ramp, &bbox, 2.0, 0.5), 0.5);
/// assert_eq!(bounded_sample(&ramp, &bbox, 3.5, 0.5), 0.0);
/// ```
pub trait DensityField<S: Scalar> {
    /// Field value at `(x, y)`.
    fn sample(&self, x: S, y: S) -> S;
}

impl<S: Scalar, F: Fn(S, S) -> S> DensityField<S> for F {
    #[inline]
    fn sample(&self, x: S, y: S) -> S {
        self(x, y)
    }
}

/// Sample a field restricted to a bounding box.
///
/// Inside the (closed) box the value is clamped to `[0, 1]`; outside it is exactly zero and
/// does not depend on the field at all.
#[inline]
pub fn bounded_sample<S, F>(field: &F, bbox: &BoundingBox, x: S, y: S) -> S
where
    S: Scalar,
    F: DensityField<S> + ?Sized,
{
    if bbox.contains(x.value(), y.value()) {
        field.sample(x, y).clamp(0.0, 1.0)
    } else {
        S::zero()
    }
}

/// [`bounded_sample`] over paired coordinate slices.
pub fn bounded_raster<S, F>(
    field: &F,
    bbox: &BoundingBox,
    xs: &[S],
    ys: &[S],
) -> Result<Vec<S>, GeomError>
where
    S: Scalar,
    F: DensityField<S> + ?Sized,
{
    check_lengths(xs, ys)?;
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| bounded_sample(field, bbox, x, y))
        .collect())
}
