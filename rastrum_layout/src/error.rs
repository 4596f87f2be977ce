// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors from building and traversing device trees.

use rastrum_contour::DerasterError;
use rastrum_geom::GeomError;

use crate::DeviceId;

/// Errors raised while building or traversing a device tree.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Invalid geometry, transform, or query arrays.
    #[error(transparent)]
    Geom(#[from] GeomError),
    /// Derasterizing an implicit device's preview failed.
    #[error(transparent)]
    Deraster(#[from] DerasterError),
    /// A traversal reached a device that is already on the current path.
    #[error("reference cycle through device {device}")]
    MalformedHierarchy {
        /// The device that closes the cycle.
        device: DeviceId,
    },
    /// The id does not name a device of this tree.
    #[error("no device {device} in this tree")]
    UnknownDevice {
        /// The rejected id.
        device: DeviceId,
    },
    /// Polygons and references can only be added to cells.
    #[error("device {device} is an implicit leaf, not a cell")]
    NotACell {
        /// The implicit leaf.
        device: DeviceId,
    },
}
