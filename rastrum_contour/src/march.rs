// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marching squares over a [`SampleGrid`], producing closed contours in index space.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::{DerasterError, SampleGrid};

bitflags! {
    /// Corners of a grid cell whose sample lies strictly above the level.
    ///
    /// For the cell at `(i, j)`: `A = (i, j)`, `B = (i, j + 1)`, `C = (i + 1, j)`,
    /// `D = (i + 1, j + 1)`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub(crate) struct CornerMask: u8 {
        const A = 0b0001;
        const B = 0b0010;
        const C = 0b0100;
        const D = 0b1000;
    }
}

/// A grid edge that a contour crosses, named by its lower grid node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum EdgeKey {
    /// From `(i, j)` to `(i, j + 1)`.
    J { i: usize, j: usize },
    /// From `(i, j)` to `(i + 1, j)`.
    I { i: usize, j: usize },
}

/// The four edges of the cell at `(i, j)`.
struct CellEdges {
    top: EdgeKey,
    bottom: EdgeKey,
    left: EdgeKey,
    right: EdgeKey,
}

impl CellEdges {
    fn new(i: usize, j: usize) -> Self {
        Self {
            top: EdgeKey::J { i, j },
            bottom: EdgeKey::J { i: i + 1, j },
            left: EdgeKey::I { i, j },
            right: EdgeKey::I { i, j: j + 1 },
        }
    }
}

impl SampleGrid {
    fn mask(&self, i: usize, j: usize, level: f64) -> CornerMask {
        let mut mask = CornerMask::empty();
        mask.set(CornerMask::A, self.value(i, j) > level);
        mask.set(CornerMask::B, self.value(i, j + 1) > level);
        mask.set(CornerMask::C, self.value(i + 1, j) > level);
        mask.set(CornerMask::D, self.value(i + 1, j + 1) > level);
        mask
    }

    /// Index-space point where the level crosses `edge`.
    fn crossing(&self, edge: EdgeKey, level: f64) -> (f64, f64) {
        let (i, j, v0, v1) = match edge {
            EdgeKey::J { i, j } => (i, j, self.value(i, j), self.value(i, j + 1)),
            EdgeKey::I { i, j } => (i, j, self.value(i, j), self.value(i + 1, j)),
        };
        let t = if v1 == v0 { 0.5 } else { (level - v0) / (v1 - v0) };
        let (fi, fj) = (i as f64, j as f64);
        match edge {
            EdgeKey::J { .. } => (fi, fj + t),
            EdgeKey::I { .. } => (fi + t, fj),
        }
    }
}

/// Segments of one cell, as pairs of crossed edges.
fn cell_segments(mask: CornerMask, centre_above: bool, e: &CellEdges) -> [Option<[EdgeKey; 2]>; 2] {
    use CornerMask as M;
    let one = |a, b| [Some([a, b]), None];
    let two = |a, b, c, d| [Some([a, b]), Some([c, d])];
    // A mask and its complement cross the same edges.
    let m = if mask.bits().count_ones() > 2 {
        mask.complement()
    } else {
        mask
    };
    if m == M::A {
        one(e.top, e.left)
    } else if m == M::B {
        one(e.top, e.right)
    } else if m == M::C {
        one(e.left, e.bottom)
    } else if m == M::D {
        one(e.right, e.bottom)
    } else if m == M::A | M::B || m == M::C | M::D {
        one(e.left, e.right)
    } else if m == M::A | M::C || m == M::B | M::D {
        one(e.top, e.bottom)
    } else if m == M::A | M::D {
        // Saddle: with the centre above, A and D connect and B, C are cut off.
        if centre_above {
            two(e.top, e.right, e.left, e.bottom)
        } else {
            two(e.top, e.left, e.right, e.bottom)
        }
    } else if m == M::B | M::C {
        if centre_above {
            two(e.top, e.left, e.right, e.bottom)
        } else {
            two(e.top, e.right, e.left, e.bottom)
        }
    } else {
        [None, None]
    }
}

/// Trace every iso-line of `grid` at `level`.
///
/// Samples strictly greater than `level` are inside. Each contour is returned as a closed ring
/// of fractional `(i, j)` indices, without repeating the first point. A chain that cannot be
/// closed is an error; this does not happen when the outermost ring of samples is below the
/// level.
pub fn find_contours(grid: &SampleGrid, level: f64) -> Result<Vec<Vec<(f64, f64)>>, DerasterError> {
    let (nx, ny) = grid.shape();
    let mut segments: Vec<[EdgeKey; 2]> = Vec::new();
    for i in 0..nx.saturating_sub(1) {
        for j in 0..ny.saturating_sub(1) {
            let mask = grid.mask(i, j, level);
            if mask.is_empty() || mask.is_all() {
                continue;
            }
            let centre = 0.25
                * (grid.value(i, j)
                    + grid.value(i, j + 1)
                    + grid.value(i + 1, j)
                    + grid.value(i + 1, j + 1));
            let edges = CellEdges::new(i, j);
            segments.extend(cell_segments(mask, centre > level, &edges).into_iter().flatten());
        }
    }

    let mut incident: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (s, seg) in segments.iter().enumerate() {
        for key in seg {
            incident.entry(*key).or_default().push(s);
        }
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [first, mut cursor] = segments[start];
        let mut ring = vec![grid.crossing(first, level)];
        let mut current = start;
        while cursor != first {
            ring.push(grid.crossing(cursor, level));
            let next = incident
                .get(&cursor)
                .and_then(|segs| segs.iter().copied().find(|&s| s != current && !used[s]));
            let Some(next) = next else {
                return Err(DerasterError::OpenContour { points: ring.len() });
            };
            used[next] = true;
            let [a, b] = segments[next];
            cursor = if a == cursor { b } else { a };
            current = next;
        }
        contours.push(ring);
    }
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[f64]]) -> SampleGrid {
        let nx = rows.len();
        let ny = rows[0].len();
        let xs = (0..nx).map(|i| i as f64).collect();
        let ys = (0..ny).map(|j| j as f64).collect();
        let values = rows.iter().flat_map(|r| r.iter().copied()).collect();
        SampleGrid::from_values(xs, ys, values).unwrap()
    }

    fn shoelace(ring: &[(f64, f64)]) -> f64 {
        let n = ring.len();
        0.5 * (0..n)
            .map(|k| {
                let (a, b) = (ring[k], ring[(k + 1) % n]);
                a.0 * b.1 - b.0 * a.1
            })
            .sum::<f64>()
            .abs()
    }

    #[test]
    fn single_peak_gives_a_diamond() {
        let g = grid(&[
            &[0.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0],
        ]);
        let contours = find_contours(&g, 0.5).unwrap();
        assert_eq!(contours.len(), 1);
        let ring = &contours[0];
        assert_eq!(ring.len(), 4);
        for p in [(0.5, 1.0), (1.5, 1.0), (1.0, 0.5), (1.0, 1.5)] {
            assert!(ring.contains(&p), "missing {p:?} in {ring:?}");
        }
        assert!((shoelace(ring) - 0.5).abs() < 1e-12, "diamond area");
    }

    #[test]
    fn flat_and_empty_grids_have_no_contours() {
        let g = grid(&[&[0.0; 4], &[0.0; 4], &[0.0; 4]]);
        assert!(find_contours(&g, 0.5).unwrap().is_empty());
        let g = grid(&[&[0.9; 3], &[0.9; 3]]);
        assert!(find_contours(&g, 0.5).unwrap().is_empty());
    }

    #[test]
    fn ring_of_samples_gives_two_contours() {
        let g = grid(&[
            &[0.0, 0.0, 0.0, 0.0, 0.0],
            &[0.0, 1.0, 1.0, 1.0, 0.0],
            &[0.0, 1.0, 0.0, 1.0, 0.0],
            &[0.0, 1.0, 1.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        let mut contours = find_contours(&g, 0.5).unwrap();
        assert_eq!(contours.len(), 2);
        contours.sort_by(|a, b| shoelace(b).total_cmp(&shoelace(a)));
        // Outer: the 3x3 square around the ones, minus four corner triangles.
        assert!((shoelace(&contours[0]) - 8.5).abs() < 1e-12, "{}", shoelace(&contours[0]));
        // Inner: diamond around the centre zero.
        assert!((shoelace(&contours[1]) - 0.5).abs() < 1e-12, "{}", shoelace(&contours[1]));
    }

    #[test]
    fn saddle_follows_the_centre() {
        // Diagonal ones; the centre average is 0.5.
        let rows: [&[f64]; 4] = [
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0, 0.0],
        ];
        // Centre 0.5 is above 0.4: the diagonal joins into one contour.
        assert_eq!(find_contours(&grid(&rows), 0.4).unwrap().len(), 1);
        // Centre 0.5 is below 0.6: two separate peaks.
        assert_eq!(find_contours(&grid(&rows), 0.6).unwrap().len(), 2);
    }

    #[test]
    fn touching_the_border_is_an_open_chain() {
        let g = grid(&[&[1.0, 0.0], &[0.0, 0.0]]);
        assert!(matches!(
            find_contours(&g, 0.5),
            Err(DerasterError::OpenContour { .. })
        ));
    }
}
