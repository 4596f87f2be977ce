// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rastrum_geom --heading-base-level=0

//! Rastrum Geom: the geometric vocabulary shared by rasterization and derasterization.
//!
//! - [`BoundingBox`]: closed axis-aligned box; supports implicit shapes and clips derasterized output.
//! - [`Polygon`]: simple closed polygon with a differentiable [`Polygon::signed_distance`]
//!   (negative inside, positive outside).
//! - [`SpatialTransform`]: reference placement (origin, rotation, reflection, magnification).
//!   [`SpatialTransform::to_affine`] places polygons; [`SpatialTransform::apply`] and
//!   [`apply_chain`] pull query points back into a child frame.
//! - [`DensityField`]: any pure `Fn(S, S) -> S`, sampled through [`bounded_sample`].
//!
//! Everything that touches query points is generic over [`rastrum_diff::Scalar`], so the same
//! code runs on plain `f64` or on tracked values.
//!
//! # Example
//!
//! ```rust
//! use rastrum_geom::{Polygon, SpatialTransform, apply_chain};
//!
//! let waveguide = Polygon::rectangle((0.0, 0.0), (5.0, 1.0)).unwrap();
//! assert!(waveguide.signed_distance(2.5, 0.5) < 0.0);
//!
//! // Place the waveguide rotated a quarter turn at (10, 0) ...
//! let placement = SpatialTransform::translate((10.0, 0.0)).with_rotation(90.0);
//! let placed = waveguide.transformed(placement.to_affine()).unwrap();
//! assert!(placed.contains(9.5, 2.5));
//!
//! // ... and sample it in its own frame instead.
//! let (x, y) = apply_chain(&[placement], 9.5, 2.5);
//! assert!(waveguide.contains(x, y));
//! ```

mod bbox;
mod error;
mod field;
mod polygon;
mod sampling;
mod transform;

pub use bbox::BoundingBox;
pub use error::{GeomError, check_lengths};
pub use field::{DensityField, bounded_raster, bounded_sample};
pub use polygon::Polygon;
pub use sampling::{arange, meshgrid};
pub use transform::{SpatialTransform, apply_chain};

/// Re-exported geometry primitives.
pub use kurbo::{Affine, Point, Rect, Vec2};
