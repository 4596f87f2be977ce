// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes: the support of implicit shapes and the derasterization clip.

use kurbo::{Point, Rect};

use crate::GeomError;

/// Axis-aligned bounding box in 2D, closed on all four sides.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`, both corners finite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl BoundingBox {
    /// Create a bounding box from its minimum and maximum corners.
    ///
    /// Fails with [`GeomError::InvalidBoundingBox`] if a corner is not finite or the minimum
    /// exceeds the maximum on either axis.
    pub fn new(min: impl Into<Point>, max: impl Into<Point>) -> Result<Self, GeomError> {
        let (min, max) = (min.into(), max.into());
        let finite = min.is_finite() && max.is_finite();
        if !finite || min.x > max.x || min.y > max.y {
            return Err(GeomError::InvalidBoundingBox { min, max });
        }
        Ok(Self { min, max })
    }

    /// Bounding box of a kurbo rectangle, normalizing its orientation.
    pub fn from_rect(rect: Rect) -> Result<Self, GeomError> {
        let r = rect.abs();
        Self::new((r.x0, r.y0), (r.x1, r.y1))
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        Some(Self::enclosing(first, it))
    }

    pub(crate) fn enclosing(first: Point, rest: impl IntoIterator<Item = Point>) -> Self {
        let (min, max) = rest.into_iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Self { min, max }
    }

    /// Minimum corner.
    pub const fn min(&self) -> Point {
        self.min
    }

    /// Maximum corner.
    pub const fn max(&self) -> Point {
        self.max
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether the box contains the point. Boundary points are inside; NaN is never inside.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min.x <= x && x <= self.max.x && self.min.y <= y && y <= self.max.y
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// The four corners, counter-clockwise from the minimum corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// The box as a kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_non_finite_corners() {
        assert!(matches!(
            BoundingBox::new((1.0, 0.0), (0.0, 1.0)),
            Err(GeomError::InvalidBoundingBox { .. })
        ));
        assert!(BoundingBox::new((0.0, 1.0), (1.0, 0.0)).is_err());
        assert!(BoundingBox::new((0.0, f64::NAN), (1.0, 1.0)).is_err());
        assert!(BoundingBox::new((0.0, 0.0), (f64::INFINITY, 1.0)).is_err());
        // Zero-area boxes are allowed.
        let line = BoundingBox::new((0.0, 0.0), (0.0, 2.0)).unwrap();
        assert!(line.is_degenerate());
    }

    #[test]
    fn contains_is_closed() {
        let b = BoundingBox::new((0.0, 0.0), (5.0, 1.0)).unwrap();
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(5.0, 1.0));
        assert!(b.contains(2.5, 0.5));
        assert!(!b.contains(-1e-12, 0.5));
        assert!(!b.contains(2.5, 1.0 + 1e-12));
        assert!(!b.contains(f64::NAN, 0.5));
    }

    #[test]
    fn from_points_and_union() {
        let b = BoundingBox::from_points([
            Point::new(1.0, 2.0),
            Point::new(-1.0, 4.0),
            Point::new(0.5, -3.0),
        ])
        .unwrap();
        assert_eq!(b.min(), Point::new(-1.0, -3.0));
        assert_eq!(b.max(), Point::new(1.0, 4.0));
        assert!(BoundingBox::from_points([]).is_none());

        let other = BoundingBox::new((2.0, 0.0), (3.0, 1.0)).unwrap();
        let u = b.union(&other);
        assert_eq!(u.min(), Point::new(-1.0, -3.0));
        assert_eq!(u.max(), Point::new(3.0, 4.0));
    }

    #[test]
    fn rect_round_trip() {
        let b = BoundingBox::from_rect(Rect::new(3.0, 4.0, 1.0, 2.0)).unwrap();
        assert_eq!(b.min(), Point::new(1.0, 2.0));
        assert_eq!(b.to_rect(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(b.corners()[2], Point::new(3.0, 4.0));
    }
}
