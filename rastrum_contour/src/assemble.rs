// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean assembly of traced contours and conversion back to simple polygons.

use geo::{BooleanOps, Coord, LineString, MultiPolygon};
use kurbo::Point;
use rastrum_geom::{BoundingBox, Polygon};

use crate::DerasterError;

/// XOR the contours together in order, clip to `bbox`, and flatten holes into keyholes.
///
/// Pieces that collapse below three distinct vertices are dropped.
pub(crate) fn assemble(
    contours: &[Vec<Point>],
    bbox: &BoundingBox,
) -> Result<Vec<Polygon>, DerasterError> {
    let mut region = MultiPolygon::<f64>::new(Vec::new());
    for contour in contours {
        let piece = MultiPolygon::new(vec![to_geo(contour)]);
        region = region.xor(&piece);
    }
    let clip = MultiPolygon::new(vec![to_geo(&bbox.corners())]);
    let clipped = region.intersection(&clip);

    let mut polygons = Vec::with_capacity(clipped.0.len());
    for piece in clipped.iter() {
        let holes = piece.interiors().iter().map(open_ring).collect();
        let ring = keyhole(open_ring(piece.exterior()), holes)?;
        match Polygon::new(ring) {
            Ok(polygon) => polygons.push(polygon),
            Err(err) => tracing::trace!(error = %err, "dropping degenerate piece"),
        }
    }
    Ok(polygons)
}

fn to_geo(ring: &[Point]) -> geo::Polygon<f64> {
    let exterior: LineString<f64> = ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    geo::Polygon::new(exterior, Vec::new())
}

fn open_ring(ring: &LineString<f64>) -> Vec<Point> {
    let mut points: Vec<Point> = ring.coords().map(|c| Point::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Splice every hole into `exterior` through a zero-width bridge.
///
/// Holes are taken rightmost first. Each is entered at its rightmost vertex from the nearest
/// exterior vertex whose bridge neither crosses an edge nor runs through a vertex, walked once
/// around against the exterior's orientation, and left along the same bridge. Under the even-odd
/// rule the doubled bridge edges cancel, so the hole stays outside.
///
/// Fails with [`DerasterError::UnbridgedHole`] when every candidate bridge is blocked.
pub(crate) fn keyhole(
    exterior: Vec<Point>,
    mut holes: Vec<Vec<Point>>,
) -> Result<Vec<Point>, DerasterError> {
    holes.retain(|h| h.len() >= 3);
    let outer_sign = twice_area(&exterior).signum();
    for hole in &mut holes {
        if twice_area(hole).signum() == outer_sign {
            hole.reverse();
        }
    }
    holes.sort_by(|a, b| max_x(b).total_cmp(&max_x(a)));
    let mut ring = exterior;
    for h in 0..holes.len() {
        let hole = &holes[h];
        let entry = rightmost(hole);
        let anchor = hole[entry];
        let k = bridge_vertex(&ring, anchor, &holes[h..]).ok_or(DerasterError::UnbridgedHole {
            x: anchor.x,
            y: anchor.y,
        })?;
        let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
        spliced.extend_from_slice(&ring[..=k]);
        spliced.extend(hole[entry..].iter().chain(&hole[..entry]).copied());
        spliced.push(anchor);
        spliced.push(ring[k]);
        spliced.extend_from_slice(&ring[k + 1..]);
        ring = spliced;
    }
    Ok(ring)
}

fn twice_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|k| ring[k].to_vec2().cross(ring[(k + 1) % n].to_vec2()))
        .sum()
}

fn max_x(ring: &[Point]) -> f64 {
    ring.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max)
}

fn rightmost(ring: &[Point]) -> usize {
    let mut best = 0;
    for (k, p) in ring.iter().enumerate().skip(1) {
        if p.x > ring[best].x {
            best = k;
        }
    }
    best
}

/// Index of the nearest ring vertex with a clear bridge to `anchor`.
fn bridge_vertex(ring: &[Point], anchor: Point, holes: &[Vec<Point>]) -> Option<usize> {
    let mut order: Vec<usize> = (0..ring.len()).collect();
    order.sort_by(|&a, &b| {
        (ring[a] - anchor)
            .hypot2()
            .total_cmp(&(ring[b] - anchor).hypot2())
    });
    let edges = || {
        core::iter::once(ring)
            .chain(holes.iter().map(Vec::as_slice))
            .flat_map(|r| (0..r.len()).map(move |k| (r[k], r[(k + 1) % r.len()])))
    };
    order
        .into_iter()
        .find(|&k| !edges().any(|(p, q)| blocks(ring[k], anchor, p, q)))
}

fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Whether segments `ab` and `pq` cross at a point interior to both.
fn crosses(a: Point, b: Point, p: Point, q: Point) -> bool {
    let (o1, o2) = (orient(a, b, p), orient(a, b, q));
    let (o3, o4) = (orient(p, q, a), orient(p, q, b));
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Whether `p` lies on segment `ab` strictly between its endpoints.
fn strictly_between(a: Point, b: Point, p: Point) -> bool {
    orient(a, b, p) == 0.0
        && p != a
        && p != b
        && (p - a).dot(b - a) > 0.0
        && (p - b).dot(a - b) > 0.0
}

/// Whether edge `pq` obstructs a bridge along `ab`.
///
/// Contour vertices share exact grid-line coordinates, so a bridge that merely grazes a vertex is
/// as bad as a proper crossing.
fn blocks(a: Point, b: Point, p: Point, q: Point) -> bool {
    crosses(a, b, p, q) || strictly_between(a, b, p) || strictly_between(a, b, q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, half: f64) -> Vec<Point> {
        vec![
            Point::new(cx - half, cy - half),
            Point::new(cx + half, cy - half),
            Point::new(cx + half, cy + half),
            Point::new(cx - half, cy + half),
        ]
    }

    #[test]
    fn keyhole_keeps_the_hole_outside() {
        let ring = keyhole(square(0.0, 0.0, 4.0), vec![square(0.0, 0.0, 1.0)]).unwrap();
        assert_eq!(ring.len(), 4 + 4 + 2);
        let poly = Polygon::new(ring).unwrap();
        assert!(!poly.contains(0.0, 0.3), "centre of the hole");
        assert!(poly.contains(-2.5, 0.0), "between hole and border");
        assert!(poly.contains(0.0, 3.0), "above the hole");
        assert!(!poly.contains(5.0, 0.0), "outside");
        assert!((poly.area() - 60.0).abs() < 1e-6, "area {}", poly.area());
    }

    #[test]
    fn two_holes_get_separate_bridges() {
        let ring = keyhole(
            square(0.0, 0.0, 6.0),
            vec![square(-3.0, 0.0, 1.0), square(3.0, 0.0, 1.0)],
        )
        .unwrap();
        let poly = Polygon::new(ring).unwrap();
        assert!(!poly.contains(-3.0, 0.5), "left hole");
        assert!(!poly.contains(3.0, 0.5), "right hole");
        assert!(poly.contains(0.0, 0.5), "between the holes");
        assert!((poly.area() - 136.0).abs() < 1e-6, "area {}", poly.area());
    }

    /// A square with a spike reaching in from the left, its tip at `(-1.2, 0)`.
    fn spiked_exterior() -> Vec<Point> {
        vec![
            Point::new(-5.0, -5.0),
            Point::new(5.0, -5.0),
            Point::new(5.0, 5.0),
            Point::new(-5.0, 5.0),
            Point::new(-5.0, 0.1),
            Point::new(-1.2, 0.0),
            Point::new(-5.0, -0.1),
        ]
    }

    #[test]
    fn bridge_avoids_crossing_edges() {
        // The spike tip is the nearest exterior vertex, but a bridge from it would cut through
        // the hole.
        let ring = keyhole(spiked_exterior(), vec![square(0.0, 0.0, 1.0)]).unwrap();
        let entry = ring.iter().position(|p| p.x == 1.0).unwrap();
        assert_ne!(ring[entry - 1], Point::new(-1.2, 0.0), "bridge from the spike tip");
        for w in ring.windows(2) {
            for v in ring.windows(2) {
                assert!(!crosses(w[0], w[1], v[0], v[1]), "edges {w:?} and {v:?} cross");
            }
        }
        let poly = Polygon::new(ring).unwrap();
        assert!(!poly.contains(0.0, 0.0), "hole");
        assert!(!poly.contains(-3.0, 0.0), "spike");
        assert!(poly.contains(3.0, 0.0));
    }

    #[test]
    fn bridge_avoids_running_through_a_vertex() {
        // A diamond hole: the bridge from the spike tip runs exactly along y = 0 through the
        // hole's left corner without properly crossing any edge.
        let diamond = vec![
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, -1.0),
        ];
        let ring = keyhole(spiked_exterior(), vec![diamond]).unwrap();
        let entry = ring.iter().position(|&p| p == Point::new(1.0, 0.0)).unwrap();
        assert_eq!(ring[entry - 1], Point::new(5.0, -5.0), "nearest clear vertex");
        let poly = Polygon::new(ring).unwrap();
        assert!(!poly.contains(0.0, 0.2), "hole");
        assert!(!poly.contains(-3.0, 0.0), "spike");
        assert!(poly.contains(-0.9, 0.5), "beside the hole");
        assert!(poly.contains(3.0, 0.0));
    }

    #[test]
    fn blocked_hole_is_an_error() {
        // The hole wraps the exterior and its rightmost corner sits at the end of a narrow
        // spike, so every candidate bridge hits the hole's own walls.
        let hole = vec![
            Point::new(-3.0, -3.0),
            Point::new(3.0, -3.0),
            Point::new(3.0, -0.1),
            Point::new(6.0, 0.0),
            Point::new(3.0, 0.1),
            Point::new(3.0, 3.0),
            Point::new(-3.0, 3.0),
        ];
        assert_eq!(
            keyhole(square(0.0, 0.0, 1.0), vec![hole]),
            Err(DerasterError::UnbridgedHole { x: 6.0, y: 0.0 })
        );
    }

    #[test]
    fn xor_and_clip() {
        let bbox = BoundingBox::new((0.0, 0.0), (4.0, 4.0)).unwrap();
        // An outer square spilling over the box and an inner square that becomes a hole.
        let pieces = assemble(&[square(2.0, 2.0, 3.0), square(2.0, 2.0, 1.0)], &bbox).unwrap();
        assert_eq!(pieces.len(), 1);
        let poly = &pieces[0];
        assert!((poly.area() - 12.0).abs() < 1e-6, "area {}", poly.area());
        assert!(!poly.contains(2.0, 2.2), "hole");
        assert!(poly.contains(0.5, 0.5));
        let b = poly.bounding_box();
        assert!(b.min().x.abs() < 1e-6 && (b.max().y - 4.0).abs() < 1e-6, "{b:?}");
    }
}
