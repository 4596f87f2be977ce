// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical rasterization: explicit polygons and implicit leaves sampled on one set of points.

use rastrum_diff::Scalar;
use rastrum_geom::{apply_chain, check_lengths};

use crate::{DeviceId, DeviceTree, LayerSpec, LayoutError};

/// Rasterize the hierarchy under `root` on `spec` at the points `(xs[k], ys[k])`.
///
/// Each value is the larger of the explicit and implicit contributions, see
/// [`raster_explicit`] and [`raster_implicit`]. Results lie in `[0, 1]`.
///
/// Only the implicit contribution depends on the fields, so when `S` is a tracked scalar the
/// output is differentiable with respect to field parameters wherever an implicit leaf
/// determines the value. Polygons and transforms are constants.
pub fn raster<S: Scalar>(
    tree: &DeviceTree<'_, S>,
    root: DeviceId,
    spec: LayerSpec,
    xs: &[S],
    ys: &[S],
) -> Result<Vec<S>, LayoutError> {
    let _span = tracing::debug_span!(
        "raster",
        root = %root,
        layer = spec.layer,
        datatype = spec.datatype,
        points = xs.len()
    )
    .entered();
    let explicit = raster_explicit(tree, root, spec, xs, ys)?;
    let implicit = raster_implicit(tree, root, spec, xs, ys)?;
    Ok(explicit
        .into_iter()
        .zip(implicit)
        .map(|(p, f)| p.max(f))
        .collect())
}

/// The explicit contribution: `1` where some polygon on `spec` covers the point, else `0`.
///
/// Implicit leaves are filtered out first, so their previews do not count. A point covers when
/// its signed distance is `<= 0`; points exactly on an edge follow the sign the distance
/// evaluator happens to give them.
pub fn raster_explicit<S: Scalar>(
    tree: &DeviceTree<'_, S>,
    root: DeviceId,
    spec: LayerSpec,
    xs: &[S],
    ys: &[S],
) -> Result<Vec<S>, LayoutError> {
    check_lengths(xs, ys)?;
    let (explicit, explicit_root) = tree.filter_implicit(root)?;
    let polygons = explicit.polygons(explicit_root, spec)?;
    tracing::debug!(polygons = polygons.len(), "flattened explicit geometry");
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            let (x, y) = (x.value(), y.value());
            let covered = polygons.iter().any(|p| p.contains(x, y));
            S::constant(if covered { 1.0 } else { 0.0 })
        })
        .collect())
}

/// The implicit contribution: the pointwise maximum over the implicit leaves on `spec`.
///
/// Query points are pulled back through each leaf's reference chain and sampled inside the
/// leaf's bounding box. Zero everywhere when no leaf matches.
pub fn raster_implicit<S: Scalar>(
    tree: &DeviceTree<'_, S>,
    root: DeviceId,
    spec: LayerSpec,
    xs: &[S],
    ys: &[S],
) -> Result<Vec<S>, LayoutError> {
    check_lengths(xs, ys)?;
    let mut leaves = tree.extract_implicit(root)?;
    leaves.retain(|leaf| leaf.shape.spec() == spec);
    tracing::debug!(leaves = leaves.len(), "collected implicit leaves");
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            leaves.iter().fold(S::zero(), |acc, leaf| {
                let (lx, ly) = apply_chain(&leaf.chain, x, y);
                acc.max(leaf.shape.sample(lx, ly))
            })
        })
        .collect())
}
