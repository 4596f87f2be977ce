// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry errors.

use kurbo::Point;

/// Errors raised when geometry or sampling parameters violate their preconditions.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeomError {
    /// A bounding box whose minimum corner exceeds its maximum corner on some axis, or that has a
    /// non-finite corner.
    #[error("invalid bounding box: min {min:?}, max {max:?}")]
    InvalidBoundingBox {
        /// Requested minimum corner.
        min: Point,
        /// Requested maximum corner.
        max: Point,
    },
    /// A polygon that does not have at least three distinct, finite vertices.
    #[error("invalid polygon ({reason}): {vertices} usable vertices")]
    InvalidGeometry {
        /// What was wrong with the vertex list.
        reason: &'static str,
        /// Number of vertices left after normalization.
        vertices: usize,
    },
    /// A numeric parameter outside its valid range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Query coordinate arrays of different lengths.
    #[error("query coordinates differ in length: x has {x}, y has {y}")]
    LengthMismatch {
        /// Length of the x array.
        x: usize,
        /// Length of the y array.
        y: usize,
    },
}

/// Check that paired query arrays have the same length.
///
/// Query points are passed as two parallel slices throughout the workspace.
pub fn check_lengths<T>(xs: &[T], ys: &[T]) -> Result<(), GeomError> {
    if xs.len() == ys.len() {
        Ok(())
    } else {
        Err(GeomError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        })
    }
}
