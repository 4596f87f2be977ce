// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rastrum_contour --heading-base-level=0

//! Rastrum Contour: derasterization of density fields into explicit polygons.
//!
//! [`deraster`] samples a field on a padded grid, traces the threshold iso-lines with marching
//! squares, assembles the contours by symmetric difference, clips the result to the bounding box,
//! and returns plain [`Polygon`]s. Holes come back as keyhole polygons: each hole is joined to its
//! outer ring by a doubled bridge edge, which the even-odd signed distance reads as outside.
//!
//! Sampling goes through [`Scalar::detach`], so a field built from tracked parameters can be
//! derasterized but the polygons carry no gradient.
//!
//! # Example
//!
//! ```rust
//! use rastrum_contour::{DerasterOptions, deraster};
//! use rastrum_geom::BoundingBox;
//!
//! let disk = |x: f64, y: f64| 2.0 - x.hypot(y);
//! let bbox = BoundingBox::new((-2.0, -2.0), (2.0, 2.0)).unwrap();
//! let polygons = deraster(&disk, &bbox, DerasterOptions::new(0.05)).unwrap();
//!
//! assert_eq!(polygons.len(), 1);
//! let area = polygons[0].area();
//! assert!((area - core::f64::consts::PI * 1.5 * 1.5).abs() < 0.05);
//! ```

mod assemble;
mod error;
mod grid;
mod march;

pub use error::DerasterError;
pub use grid::{SampleGrid, gridpoints};
pub use march::find_contours;

use kurbo::Point;
use rastrum_diff::Scalar;
use rastrum_geom::{BoundingBox, DensityField, Polygon};

/// Sampling resolution and iso-level for [`deraster`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DerasterOptions {
    /// Maximum grid spacing along each axis.
    pub resolution: f64,
    /// Field value the boundary is traced at; samples strictly above it are inside.
    pub threshold: f64,
}

impl Default for DerasterOptions {
    /// Resolution `0.1`, threshold `0.5`.
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl DerasterOptions {
    /// Threshold used unless overridden.
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Options with the given resolution and the default threshold.
    pub const fn new(resolution: f64) -> Self {
        Self {
            resolution,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Set the threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check that the resolution is positive and finite and the threshold lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), DerasterError> {
        if !(self.resolution > 0.0 && self.resolution.is_finite()) {
            return Err(DerasterError::InvalidParameter {
                name: "resolution",
                value: self.resolution,
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(DerasterError::InvalidParameter {
                name: "threshold",
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// Convert `field`, restricted to `bbox`, into polygons.
///
/// The field is sampled at [`gridpoints`] along each axis, including one guard point beyond each
/// side of the box. Guard samples are outside the box and therefore zero, so every traced contour
/// closes. Contours are XORed together in tracing order and the region is intersected with the
/// box, so no polygon extends past it.
///
/// A zero-area `bbox` yields no polygons, as does a field that never exceeds the threshold.
pub fn deraster<S, F>(
    field: &F,
    bbox: &BoundingBox,
    options: DerasterOptions,
) -> Result<Vec<Polygon>, DerasterError>
where
    S: Scalar,
    F: DensityField<S> + ?Sized,
{
    options.validate()?;
    if bbox.is_degenerate() {
        tracing::debug!(?bbox, "zero-area bounding box, nothing to deraster");
        return Ok(Vec::new());
    }
    let _span = tracing::debug_span!(
        "deraster",
        resolution = options.resolution,
        threshold = options.threshold
    )
    .entered();

    let (min, max) = (bbox.min(), bbox.max());
    let xs = gridpoints(min.x, max.x, options.resolution)?;
    let ys = gridpoints(min.y, max.y, options.resolution)?;
    let grid = SampleGrid::sample(field, bbox, xs, ys);
    let (nx, ny) = grid.shape();

    let contours: Vec<Vec<Point>> = find_contours(&grid, options.threshold)?
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|(i, j)| {
                    let (x, y) = grid.to_world(i, j);
                    Point::new(x, y)
                })
                .collect()
        })
        .collect();
    tracing::debug!(nx, ny, contours = contours.len(), "traced contours");

    let polygons = assemble::assemble(&contours, bbox)?;
    tracing::debug!(polygons = polygons.len(), "assembled polygons");
    Ok(polygons)
}

/// [`deraster`] at the default threshold.
pub fn deraster_at<S, F>(
    field: &F,
    bbox: &BoundingBox,
    resolution: f64,
) -> Result<Vec<Polygon>, DerasterError>
where
    S: Scalar,
    F: DensityField<S> + ?Sized,
{
    deraster(field, bbox, DerasterOptions::new(resolution))
}
