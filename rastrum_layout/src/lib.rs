// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rastrum_layout --heading-base-level=0

//! Rastrum Layout: device hierarchies mixing explicit polygons and implicit density fields.
//!
//! A [`DeviceTree`] is an arena of devices. A [`Device::Cell`] holds polygons tagged with a
//! [`LayerSpec`] and [`Reference`]s that place other devices with a
//! [`SpatialTransform`](rastrum_geom::SpatialTransform). A [`Device::Implicit`] leaf holds an
//! [`ImplicitShape`]: a density field restricted to a bounding box, plus a polygon preview of
//! it.
//!
//! [`raster`] samples the whole hierarchy on arbitrary points. Explicit polygons contribute a
//! hard `0`/`1` coverage, implicit leaves contribute their bounded field value pulled back
//! through the reference chain, and the result is the pointwise maximum. Rasterization is
//! generic over [`Scalar`](rastrum_diff::Scalar): with tracked values it is differentiable
//! with respect to whatever the fields capture.
//!
//! ## API overview
//!
//! - [`DeviceTree::add_cell`], [`DeviceTree::add_polygon`], [`DeviceTree::add_reference`]:
//!   explicit hierarchy.
//! - [`DeviceTree::add_implicit_device`]: derasterize a shape into its preview and wrap the leaf
//!   in a cell that can be placed like any other.
//! - [`DeviceTree::extract_implicit`]: every implicit leaf below a root with its root-to-leaf
//!   transform chain.
//! - [`DeviceTree::filter_implicit`]: a fresh tree without implicit leaves.
//! - [`DeviceTree::polygons`]: flattened world-space polygons on one layer spec, previews
//!   included.
//! - [`raster`], [`raster_explicit`], [`raster_implicit`].
//!
//! Every traversal checks that the reference graph is acyclic and fails with
//! [`LayoutError::MalformedHierarchy`] otherwise.
//!
//! # Example
//!
//! ```rust
//! use rastrum_geom::{BoundingBox, Polygon, SpatialTransform};
//! use rastrum_layout::{DeviceTree, ImplicitShape, LayerSpec, raster};
//!
//! let spec = LayerSpec::new(1, 0);
//! let mut tree = DeviceTree::new();
//!
//! let pad = tree.add_cell("pad");
//! tree.add_polygon(pad, spec, Polygon::rectangle((0.0, 0.0), (1.0, 1.0)).unwrap()).unwrap();
//!
//! let bbox = BoundingBox::new((0.0, 0.0), (2.0, 1.0)).unwrap();
//! let taper = ImplicitShape::new(spec, |x: f64, _y: f64| 1.0 - 0.5 * x, bbox);
//! let taper = tree.add_implicit_device("taper", taper, 0.05).unwrap();
//!
//! let top = tree.add_cell("top");
//! tree.add_reference(top, pad, SpatialTransform::IDENTITY).unwrap();
//! tree.add_reference(top, taper, SpatialTransform::translate((1.0, 0.0))).unwrap();
//!
//! let values = raster(&tree, top, spec, &[0.5, 1.5, 2.5, 3.5], &[0.5; 4]).unwrap();
//! assert_eq!(values, [1.0, 0.75, 0.25, 0.0]);
//! ```

mod error;
mod raster;
mod shape;
mod tree;
mod types;

pub use error::LayoutError;
pub use raster::{raster, raster_explicit, raster_implicit};
pub use shape::ImplicitShape;
pub use tree::{Cell, Device, DeviceTree, ImplicitDevice, ImplicitLeaf};
pub use types::{DeviceId, LayerSpec, Reference};
