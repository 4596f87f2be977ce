// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple closed polygons and their differentiable signed distance.

use kurbo::{Affine, Point, Vec2};
use rastrum_diff::Scalar;

use crate::{BoundingBox, GeomError, check_lengths};

/// A closed polygon given by its vertices; the closing edge is implicit.
///
/// Invariant: at least three vertices, all finite, no two consecutive (cyclically) equal.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from a vertex list.
    ///
    /// An explicit closing vertex equal to the first one is dropped and runs of repeated
    /// vertices are collapsed. Fewer than three remaining vertices, or a non-finite vertex, is
    /// [`GeomError::InvalidGeometry`].
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Result<Self, GeomError> {
        let mut out: Vec<Point> = Vec::new();
        for p in points {
            let p = p.into();
            if !p.is_finite() {
                return Err(GeomError::InvalidGeometry {
                    reason: "non-finite vertex",
                    vertices: out.len(),
                });
            }
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
        while out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        if out.len() < 3 {
            return Err(GeomError::InvalidGeometry {
                reason: "fewer than three distinct vertices",
                vertices: out.len(),
            });
        }
        Ok(Self { points: out })
    }

    /// Axis-aligned rectangle with the given opposite corners.
    pub fn rectangle(a: impl Into<Point>, b: impl Into<Point>) -> Result<Self, GeomError> {
        let (a, b) = (a.into(), b.into());
        Self::new([
            Point::new(a.x, a.y),
            Point::new(b.x, a.y),
            Point::new(b.x, b.y),
            Point::new(a.x, b.y),
        ])
    }

    /// The rectangle covered by a bounding box. Zero-area boxes are rejected.
    pub fn from_bbox(bbox: &BoundingBox) -> Result<Self, GeomError> {
        Self::new(bbox.corners())
    }

    /// Vertices, without the closing repeat.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Map every vertex through `affine`.
    ///
    /// Fails only when the map is singular enough to merge vertices.
    pub fn transformed(&self, affine: Affine) -> Result<Self, GeomError> {
        Self::new(self.points.iter().map(|&p| affine * p))
    }

    /// Tight bounding box of the vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing(self.points[0], self.points[1..].iter().copied())
    }

    /// Signed shoelace area; positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (self.points[i], self.points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        0.5 * twice
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Signed distance from `(x, y)` to the polygon boundary: negative inside, positive outside.
    ///
    /// The magnitude is the Euclidean distance to the nearest edge. The sign comes from an
    /// even-odd crossing test, so self-touching (keyhole) polygons read their bridged holes as
    /// outside. Points exactly on an edge get a deterministic but unspecified sign.
    ///
    /// Only [`Scalar`] arithmetic is used, so derivatives with respect to the query point flow
    /// when `S` is tracked. Branches are decided on primal values.
    pub fn signed_distance<S: Scalar>(&self, x: S, y: S) -> S {
        let pts = &self.points;
        let n = pts.len();
        let (px, py) = (x.value(), y.value());
        let mut nearest = (x - pts[0].x).hypot(y - pts[0].y);
        let mut inside = false;
        for i in 0..n {
            let v = pts[i];
            let prev = pts[(i + n - 1) % n];
            let e: Vec2 = prev - v;
            let (wx, wy) = (x - v.x, y - v.y);

            let t = ((wx * e.x + wy * e.y) / e.hypot2()).clamp(0.0, 1.0);
            let d = (wx - t * e.x).hypot(wy - t * e.y);
            nearest = nearest.min(d);

            let above = py >= v.y;
            let below_prev = py < prev.y;
            let left = e.x * (py - v.y) > e.y * (px - v.x);
            if (above && below_prev && left) || (!above && !below_prev && !left) {
                inside = !inside;
            }
        }
        if inside { -nearest } else { nearest }
    }

    /// [`Self::signed_distance`] over paired coordinate slices.
    pub fn signed_distances<S: Scalar>(&self, xs: &[S], ys: &[S]) -> Result<Vec<S>, GeomError> {
        check_lengths(xs, ys)?;
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| self.signed_distance(x, y))
            .collect())
    }

    /// Whether the point is inside or on the boundary (signed distance `<= 0`).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.signed_distance(x, y) <= 0.0
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeomError;

    fn try_from(points: Vec<Point>) -> Result<Self, GeomError> {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastrum_diff::Tape;

    fn triangle() -> Polygon {
        Polygon::new([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn triangle_signed_distance() {
        let tri = triangle();
        let cases = [((-1.0, 0.0), 1.0), ((1.0, 0.2), -0.2), ((1.0, 2.0), 1.0)];
        for ((x, y), expected) in cases {
            let d = tri.signed_distance(x, y);
            assert!(close(d, expected), "sdf({x}, {y}) = {d}, expected {expected}");
        }
    }

    #[test]
    fn batch_matches_pointwise_and_checks_lengths() {
        let tri = triangle();
        let xs = [-1.0, 1.0, 1.0];
        let ys = [0.0, 0.2, 2.0];
        let batch = tri.signed_distances(&xs, &ys).unwrap();
        assert_eq!(batch.len(), 3);
        for i in 0..3 {
            assert_eq!(batch[i], tri.signed_distance(xs[i], ys[i]));
        }
        assert_eq!(
            tri.signed_distances(&xs, &ys[..2]),
            Err(GeomError::LengthMismatch { x: 3, y: 2 })
        );
    }

    #[test]
    fn orientation_does_not_change_sign() {
        let ccw = Polygon::rectangle((0.0, 0.0), (5.0, 1.0)).unwrap();
        let cw = Polygon::new(ccw.points().iter().rev().copied()).unwrap();
        for (x, y) in [(2.5, 0.5), (6.0, 0.5), (2.5, -2.0), (0.1, 0.9)] {
            let a = ccw.signed_distance(x, y);
            let b = cw.signed_distance(x, y);
            assert!(close(a, b), "({x}, {y}): {a} vs {b}");
        }
        assert!(close(ccw.signed_distance(2.5, 0.5), -0.5));
        assert!(close(ccw.signed_distance(7.0, 0.5), 2.0));
    }

    #[test]
    fn gradient_points_away_from_the_boundary() {
        let rect = Polygon::rectangle((0.0, 0.0), (5.0, 1.0)).unwrap();
        let tape = Tape::new();
        let x = tape.var(2.0);
        let y = tape.var(3.0);
        let g = rect.signed_distance(x, y).gradients();
        assert!(close(g.wrt(x), 0.0), "d/dx = {}", g.wrt(x));
        assert!(close(g.wrt(y), 1.0), "d/dy = {}", g.wrt(y));

        let x = tape.var(2.0);
        let y = tape.var(0.25);
        let g = rect.signed_distance(x, y).gradients();
        assert!(close(g.wrt(y), -1.0), "inside, nearest edge below: d/dy = {}", g.wrt(y));
    }

    #[test]
    fn normalization_and_rejection() {
        let p = Polygon::new([(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(p.vertex_count(), 3);
        assert!(matches!(
            Polygon::new([(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]),
            Err(GeomError::InvalidGeometry { vertices: 2, .. })
        ));
        assert!(matches!(
            Polygon::new([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]),
            Err(GeomError::InvalidGeometry { .. })
        ));
        let bbox = BoundingBox::new((0.0, 0.0), (0.0, 1.0)).unwrap();
        assert!(Polygon::from_bbox(&bbox).is_err());
    }

    #[test]
    fn area_bbox_and_transform() {
        let rect = Polygon::rectangle((0.0, 0.0), (5.0, 1.0)).unwrap();
        assert!(close(rect.area(), 5.0));
        assert!(rect.signed_area() > 0.0);
        let moved = rect
            .transformed(Affine::translate((-5.0, 0.0)) * Affine::rotate(core::f64::consts::FRAC_PI_2))
            .unwrap();
        assert!(close(moved.area(), 5.0));
        let bbox = moved.bounding_box();
        assert!(close(bbox.min().x, -6.0) && close(bbox.max().x, -5.0), "{bbox:?}");
        assert!(close(bbox.min().y, 0.0) && close(bbox.max().y, 5.0), "{bbox:?}");
        assert!(rect.contains(0.0, 0.0));
        assert!(!rect.contains(-0.01, 0.5));
    }
}
