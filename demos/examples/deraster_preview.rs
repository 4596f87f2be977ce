// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deraster preview.
//!
//! Derasterize a ring-shaped field at a few resolutions and compare the polygon area with the
//! exact area of the thresholded ring.
//!
//! Run:
//! - `cargo run -p rastrum_demos --example deraster_preview`

use rastrum_contour::{DerasterOptions, deraster};
use rastrum_geom::BoundingBox;

fn ring(x: f64, y: f64) -> f64 {
    let r = x.hypot(y);
    1.0 - (r - 1.5).abs()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bbox = BoundingBox::new((-3.0, -3.0), (3.0, 3.0))?;
    // Above 0.5 for 1 < r < 2.
    let exact = core::f64::consts::PI * (4.0 - 1.0);
    for resolution in [0.4, 0.2, 0.1, 0.05] {
        let polygons = deraster(&ring, &bbox, DerasterOptions::new(resolution))?;
        let area: f64 = polygons.iter().map(|p| p.area()).sum();
        let vertices: usize = polygons.iter().map(|p| p.vertex_count()).sum();
        tracing::info!(resolution, polygons = polygons.len(), vertices, "derasterized ring");
        println!(
            "resolution {resolution:>5}: area {area:.4} (exact {exact:.4}, error {:+.4})",
            area - exact
        );
    }

    let tight = DerasterOptions::new(0.05).with_threshold(0.9);
    let polygons = deraster(&ring, &bbox, tight)?;
    let area: f64 = polygons.iter().map(|p| p.area()).sum();
    println!("threshold 0.9: area {area:.4}");
    Ok(())
}
