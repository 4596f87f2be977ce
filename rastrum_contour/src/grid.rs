// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padded sampling grids and the stop-gradient sampling step.

use rastrum_diff::Scalar;
use rastrum_geom::{BoundingBox, DensityField, bounded_sample};

use crate::DerasterError;

/// Grid points covering `[x0, x1]` with spacing at most `resolution`, plus one guard point on
/// each side.
///
/// With `n = ceil((x1 - x0) / resolution)` (at least 1) and `dx = (x1 - x0) / n`, the result is
/// `x0 - dx, x0, x0 + dx, ..., x1, x1 + dx`: `n + 3` points, both endpoints exact.
pub fn gridpoints(x0: f64, x1: f64, resolution: f64) -> Result<Vec<f64>, DerasterError> {
    if !(resolution > 0.0 && resolution.is_finite()) {
        return Err(DerasterError::InvalidParameter {
            name: "resolution",
            value: resolution,
        });
    }
    let length = x1 - x0;
    let steps = (length / resolution).ceil().max(1.0);
    if !steps.is_finite() || steps > f64::from(u32::MAX) {
        return Err(DerasterError::InvalidParameter {
            name: "resolution",
            value: resolution,
        });
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "steps is a positive integer below u32::MAX."
    )]
    let n = steps as u32;
    let dx = length / f64::from(n);
    let mut points = Vec::with_capacity(n as usize + 3);
    points.push(x0 - dx);
    points.extend((0..n).map(|k| x0 + f64::from(k) * dx));
    points.push(x1);
    points.push(x1 + dx);
    Ok(points)
}

/// Field values sampled on the cartesian product of two axes, detached from any tape.
///
/// `value(i, j)` is the sample at `(xs[i], ys[j])`.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl SampleGrid {
    /// Sample `field` through [`bounded_sample`] and detach every value.
    ///
    /// This is the only place derasterization reads the field, and nothing computed from the
    /// result is connected to the field's parameters.
    pub fn sample<S, F>(field: &F, bbox: &BoundingBox, xs: Vec<f64>, ys: Vec<f64>) -> Self
    where
        S: Scalar,
        F: DensityField<S> + ?Sized,
    {
        let mut values = Vec::with_capacity(xs.len() * ys.len());
        for &x in &xs {
            for &y in &ys {
                let v = bounded_sample(field, bbox, S::constant(x), S::constant(y));
                values.push(v.detach());
            }
        }
        Self { xs, ys, values }
    }

    /// Wrap precomputed values laid out as `values[i * ys.len() + j]`.
    pub fn from_values(xs: Vec<f64>, ys: Vec<f64>, values: Vec<f64>) -> Result<Self, DerasterError> {
        if values.len() != xs.len() * ys.len() {
            return Err(DerasterError::InvalidParameter {
                name: "values",
                value: values.len() as f64,
            });
        }
        Ok(Self { xs, ys, values })
    }

    /// Grid points along x.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Grid points along y.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of points along `(x, y)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    /// Sample at index `(i, j)`.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ys.len() + j]
    }

    /// Map a fractional index pair to real coordinates.
    pub fn to_world(&self, i: f64, j: f64) -> (f64, f64) {
        (interp(i, &self.xs), interp(j, &self.ys))
    }
}

/// Piecewise-linear lookup of a fractional index into `axis`, clamped to its ends.
pub(crate) fn interp(index: f64, axis: &[f64]) -> f64 {
    let Some(last) = axis.len().checked_sub(1) else {
        return f64::NAN;
    };
    if index <= 0.0 {
        return axis[0];
    }
    let floor = index.floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "index is positive and compared against the axis length."
    )]
    let k = floor as usize;
    if k >= last {
        return axis[last];
    }
    let t = index - floor;
    axis[k] + t * (axis[k + 1] - axis[k])
}
