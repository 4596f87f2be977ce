// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gradient step.
//!
//! Fit the width of an implicit waveguide to a target raster by gradient descent on the squared
//! error, using tape gradients through the hierarchy.
//!
//! Run:
//! - `cargo run -p rastrum_demos --example gradient_step`

use rastrum_diff::{Scalar, Tape, Var, lift};
use rastrum_geom::{BoundingBox, SpatialTransform, arange, meshgrid};
use rastrum_layout::{DeviceTree, ImplicitShape, LayerSpec, LayoutError, raster};

const SPEC: LayerSpec = LayerSpec::new(1, 0);

/// Smooth strip along x, about `width` wide.
fn strip<S: Scalar>(width: S) -> impl Fn(S, S) -> S {
    move |_x, y| {
        let edge = (y.abs() - width * 0.5) * 8.0;
        S::constant(1.0) / (edge.exp() + 1.0)
    }
}

fn fill<S: Scalar>(width: S, xs: &[S], ys: &[S]) -> Result<Vec<S>, LayoutError> {
    let bbox = BoundingBox::new((0.0, -2.0), (6.0, 2.0))?;
    let mut tree = DeviceTree::new();
    let leaf = tree.add_implicit("strip", ImplicitShape::new(SPEC, strip(width), bbox), Vec::new());
    let top = tree.add_cell("top");
    tree.add_reference(top, leaf, SpatialTransform::translate((1.0, 1.0)).with_rotation(15.0))?;
    raster(&tree, top, SPEC, xs, ys)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let axis = arange(-1.0, 8.0, 0.1)?;
    let (gx, gy) = meshgrid(&axis, &axis);
    let target = fill(1.2, &gx, &gy)?;

    let mut width = 0.5;
    for step in 0..25 {
        let tape = Tape::new();
        let w = tape.var(width);
        let xs: Vec<Var<'_>> = lift(&gx);
        let ys: Vec<Var<'_>> = lift(&gy);
        let loss: Var<'_> = fill(w, &xs, &ys)?
            .into_iter()
            .zip(&target)
            .map(|(v, &t)| {
                let d = v - t;
                d * d
            })
            .sum();
        let slope = loss.gradients().wrt(w);
        println!("step {step:>2}: width {width:.4}, loss {:.4}", loss.value());
        width -= 1e-3 * slope;
    }
    println!("fitted width {width:.4} (target 1.2)");
    Ok(())
}
