// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waveguide raster.
//!
//! Build two waveguides joined by an implicit segment, instance them twice, rasterize the
//! layout on a grid, and print a coarse picture plus the gradient of the total fill with
//! respect to the segment's fill level.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p rastrum_demos --example waveguide_raster`

use rastrum_diff::{Scalar, Tape, Var, lift};
use rastrum_geom::{BoundingBox, DensityField, Polygon, SpatialTransform, arange, meshgrid};
use rastrum_layout::{DeviceId, DeviceTree, ImplicitShape, LayerSpec, LayoutError, raster};

const SPEC: LayerSpec = LayerSpec::new(0, 0);

fn uniform<S: Scalar>(level: S) -> impl Fn(S, S) -> S {
    move |_, _| level
}

fn layout<'f, S: Scalar>(
    field: impl DensityField<S> + 'f,
) -> Result<(DeviceTree<'f, S>, DeviceId), LayoutError> {
    let mut tree = DeviceTree::new();
    let rect = tree.add_cell("rect");
    tree.add_polygon(rect, SPEC, Polygon::rectangle((0.0, 0.0), (5.0, 1.0))?)?;

    let bbox = BoundingBox::new((0.0, 0.0), (5.0, 1.0))?;
    let segment = tree.add_implicit_device("segment", ImplicitShape::new(SPEC, field, bbox), 0.1)?;

    let waveguide = tree.add_cell("waveguide");
    tree.add_reference(waveguide, rect, SpatialTransform::translate((-5.0, 0.0)))?;
    tree.add_reference(waveguide, rect, SpatialTransform::translate((5.0, 0.0)))?;
    tree.add_reference(waveguide, segment, SpatialTransform::IDENTITY)?;

    let top = tree.add_cell("top");
    tree.add_reference(top, waveguide, SpatialTransform::translate((-2.95, 2.05)))?;
    let turned = SpatialTransform::translate((12.05, 0.05))
        .with_rotation(90.0)
        .with_reflection(true);
    tree.add_reference(top, waveguide, turned)?;
    Ok((tree, top))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let axis = arange(-5.0, 15.0, 0.1)?;
    let (gx, gy) = meshgrid(&axis, &axis);

    let (tree, top) = layout(uniform(0.8))?;
    let values = raster(&tree, top, SPEC, &gx, &gy)?;
    let total: f64 = values.iter().sum();
    tracing::info!(points = values.len(), total, "rasterized layout");

    // Every fourth row and column, top row first.
    let n = axis.len();
    for j in (0..n).rev().step_by(4) {
        let line: String = (0..n)
            .step_by(4)
            .map(|i| match values[j * n + i] {
                v if v >= 1.0 => '#',
                v if v > 0.0 => '+',
                _ => '.',
            })
            .collect();
        println!("{line}");
    }

    let previews = tree.polygons(top, SPEC)?;
    println!("{} polygons on {SPEC:?}, previews included", previews.len());

    let tape = Tape::new();
    let level = tape.var(0.8);
    let (tracked, top) = layout(uniform(level))?;
    let xs: Vec<Var<'_>> = lift(&gx);
    let ys: Vec<Var<'_>> = lift(&gy);
    let total: Var<'_> = raster(&tracked, top, SPEC, &xs, &ys)?.into_iter().sum();
    println!(
        "total fill {:.3}, d(total)/d(level) = {}",
        total.value(),
        total.gradients().wrt(level)
    );
    Ok(())
}
