// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query grids.

use crate::GeomError;

/// Evenly spaced values `start + k * step` in the half-open interval `[start, stop)`.
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, GeomError> {
    if !(step > 0.0 && step.is_finite()) {
        return Err(GeomError::InvalidParameter {
            name: "step",
            value: step,
        });
    }
    if !(start.is_finite() && stop.is_finite()) {
        return Err(GeomError::InvalidParameter {
            name: "range",
            value: if start.is_finite() { stop } else { start },
        });
    }
    let n = ((stop - start) / step).ceil().max(0.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "n is a finite, non-negative count."
    )]
    let n = n as usize;
    Ok((0..n).map(|k| start + k as f64 * step).collect())
}

/// Flattened cartesian product of two axes, x varying fastest.
///
/// Returns `(xs, ys)` with `xs.len() == ys.len() == x.len() * y.len()`; entry `j * x.len() + i`
/// is `(x[i], y[j])`.
pub fn meshgrid(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let xs = y.iter().flat_map(|_| x.iter().copied()).collect();
    let ys = y
        .iter()
        .flat_map(|&yj| core::iter::repeat_n(yj, x.len()))
        .collect();
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arange_is_half_open() {
        let xs = arange(-5.0, 15.0, 0.1).unwrap();
        assert_eq!(xs.len(), 200);
        assert_eq!(xs[0], -5.0);
        assert!((xs[199] - 14.9).abs() < 1e-9, "{}", xs[199]);
        assert_eq!(arange(0.0, 1.0, 0.25).unwrap(), vec![0.0, 0.25, 0.5, 0.75]);
        assert!(arange(1.0, 0.0, 0.5).unwrap().is_empty());
        assert!(arange(0.0, 1.0, 0.0).is_err());
        assert!(arange(0.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn meshgrid_layout() {
        let (xs, ys) = meshgrid(&[0.0, 1.0, 2.0], &[10.0, 20.0]);
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(ys, vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
        let (xs, ys) = meshgrid(&[], &[1.0]);
        assert!(xs.is_empty() && ys.is_empty(), "empty axis gives an empty grid");
    }
}
