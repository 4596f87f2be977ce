// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rastrum_diff::{Scalar, Tape, Var, lift};
use rastrum_geom::{BoundingBox, DensityField, Polygon, SpatialTransform, arange, meshgrid};
use rastrum_layout::{DeviceId, DeviceTree, ImplicitShape, LayerSpec, raster};

const SPEC: LayerSpec = LayerSpec::new(0, 0);

fn ripple<S: Scalar>(amplitude: S) -> impl Fn(S, S) -> S {
    move |x, y| amplitude * (x * 2.0).sin() * (y * 3.0).cos() + 0.5
}

/// A `rows x rows` array of waveguide pairs, each pair joined by one implicit segment.
fn array<'f, S: Scalar>(rows: usize, field: impl DensityField<S> + 'f) -> (DeviceTree<'f, S>, DeviceId) {
    let mut tree = DeviceTree::new();
    let rect = tree.add_cell("rect");
    tree.add_polygon(rect, SPEC, Polygon::rectangle((0.0, 0.0), (5.0, 1.0)).unwrap())
        .unwrap();
    let bbox = BoundingBox::new((0.0, 0.0), (5.0, 1.0)).unwrap();
    let segment = tree
        .add_implicit_device("segment", ImplicitShape::new(SPEC, field, bbox), 0.25)
        .unwrap();
    let unit = tree.add_cell("unit");
    for (child, x) in [(rect, -5.0), (segment, 0.0), (rect, 5.0)] {
        tree.add_reference(unit, child, SpatialTransform::translate((x, 0.0)))
            .unwrap();
    }
    let top = tree.add_cell("top");
    for row in 0..rows {
        for col in 0..rows {
            let origin = (20.0 * col as f64, 3.0 * row as f64);
            let rotation = if (row + col) % 2 == 0 { 0.0 } else { 180.0 };
            let placement = SpatialTransform::translate(origin).with_rotation(rotation);
            tree.add_reference(top, unit, placement).unwrap();
        }
    }
    (tree, top)
}

fn grid(rows: usize, step: f64) -> (Vec<f64>, Vec<f64>) {
    let xs = arange(-6.0, 20.0 * rows as f64, step).unwrap();
    let ys = arange(-1.0, 3.0 * rows as f64, step).unwrap();
    meshgrid(&xs, &ys)
}

fn bench_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_f64");
    for rows in [1_usize, 4, 8] {
        let (tree, top) = array(rows, ripple(0.4));
        let (xs, ys) = grid(rows, 0.1);
        group.throughput(Throughput::Elements(xs.len() as u64));
        group.bench_function(format!("array_{rows}x{rows}"), |b| {
            b.iter(|| raster(black_box(&tree), top, SPEC, black_box(&xs), black_box(&ys)).unwrap());
        });
    }
    group.finish();
}

fn bench_tracked(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_tape");
    for rows in [1_usize, 4] {
        let (gx, gy) = grid(rows, 0.1);
        group.throughput(Throughput::Elements(gx.len() as u64));
        group.bench_function(format!("array_{rows}x{rows}_gradient"), |b| {
            b.iter_batched(
                Tape::new,
                |tape| {
                    let amplitude = tape.var(0.4);
                    let (tree, top) = array(rows, ripple(amplitude));
                    let xs: Vec<Var<'_>> = lift(&gx);
                    let ys: Vec<Var<'_>> = lift(&gy);
                    let total: Var<'_> = raster(&tree, top, SPEC, &xs, &ys).unwrap().into_iter().sum();
                    black_box(total.gradients().wrt(amplitude))
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plain, bench_tracked);
criterion_main!(benches);
