// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rastrum_contour::{DerasterOptions, deraster};
use rastrum_geom::BoundingBox;

fn rings(x: f64, y: f64) -> f64 {
    let r = x.hypot(y);
    0.5 + 0.5 * (r * 3.0).cos() * (-0.1 * r).exp()
}

fn bench_deraster(c: &mut Criterion) {
    let mut group = c.benchmark_group("deraster");
    let bbox = BoundingBox::new((-8.0, -8.0), (8.0, 8.0)).unwrap();
    for resolution in [0.2, 0.1, 0.05] {
        let per_axis = (16.0 / resolution) as u64 + 3;
        group.throughput(Throughput::Elements(per_axis * per_axis));
        let options = DerasterOptions::new(resolution);
        group.bench_function(format!("rings_res{resolution}"), |b| {
            b.iter(|| deraster(&rings, black_box(&bbox), black_box(options)).unwrap());
        });
    }
    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("deraster_threshold");
    let bbox = BoundingBox::new((-8.0, -8.0), (8.0, 8.0)).unwrap();
    for threshold in [0.2, 0.5, 0.8] {
        let options = DerasterOptions::default().with_threshold(threshold);
        group.bench_function(format!("rings_t{threshold}"), |b| {
            b.iter(|| deraster(&rings, black_box(&bbox), black_box(options)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deraster, bench_threshold);
criterion_main!(benches);
