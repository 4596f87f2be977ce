// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derasterization errors.

use rastrum_geom::GeomError;

/// Errors raised while converting a density field to polygons.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DerasterError {
    /// Invalid geometry input, such as mismatched coordinate arrays.
    #[error(transparent)]
    Geom(#[from] GeomError),
    /// A resolution or threshold outside its valid range.
    #[error("invalid deraster parameter `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The contour tracer produced a chain that does not close.
    #[error("contour tracer left an open chain after {points} points")]
    OpenContour {
        /// Number of points traced before the chain ran out.
        points: usize,
    },
    /// No exterior vertex could be joined to a hole without the join crossing the boundary.
    #[error("no clear bridge to the hole vertex at ({x}, {y})")]
    UnbridgedHole {
        /// Hole vertex the bridge had to reach.
        x: f64,
        /// Hole vertex the bridge had to reach.
        y: f64,
    },
}
